//! Pass-2 recognizer (component F): document-local dictionary recall over
//! the [`NameCache`] populated by pass-1's `PATIENT_NAME` spans. Runs only
//! when the cache is initialized; emits spans in two tiers.
//!
//! Tier A (full-name exact match) and Tier B (name-part match) both search
//! the raw text directly. This pass has no tokens or dependency data of its
//! own: it is a cheap substring recall pass, not a second annotation.

use regex::{escape, Regex, RegexBuilder};

use crate::catalog::PatternCatalog;
use crate::error::RedactError;
use crate::name_cache::NameCache;
use crate::nlp::AnnotatedDocument;
use crate::types::{EntityType, NerLabel, Span};

const TIER_A_SCORE: f32 = 0.95;
const TIER_B_SCORE: f32 = 0.85;
const TIER_A_RULE: &str = "pass2_full_name_match";
const TIER_B_RULE: &str = "pass2_name_part_match";
const TITLE_LOOKBEHIND_CHARS: usize = 15;

fn floor_char_boundary(s: &str, mut idx: usize) -> usize {
    while idx > 0 && !s.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

/// Whether the span at `[start, end)` falls inside a `PERSON` entity that
/// the Annotator tagged with at least one `provider` token.
///
/// Not part of Tier A's name-matching algorithm as originally scoped, which has no
/// provider check at all. Added because, without it, a single-word cached
/// name (e.g. "Smith" from a one-token pass-1 span) matches every bare
/// occurrence of that surname in the raw text, including ones inside a
/// provider's own name ("Dr. Smith"). Tier B already has an equivalent
/// safeguard via its title lookbehind; this extends the same protection to
/// Tier A using data the Annotator already computed, which is cheaper and
/// more precise than a second lookbehind scan over multi-word names.
fn overlaps_provider_entity(doc: &AnnotatedDocument, start: usize, end: usize) -> bool {
    doc.entities.iter().any(|entity| {
        entity.label == NerLabel::Person
            && entity.char_start < end
            && start < entity.char_end
            && doc.entity_any_provider(entity)
    })
}

fn tier_a(doc: &AnnotatedDocument, cache: &NameCache) -> Result<Vec<Span>, RedactError> {
    let mut spans = Vec::new();
    for name in &cache.full_names {
        let pattern = format!(r"(?i)\b{}\b", escape(name));
        let re = Regex::new(&pattern).map_err(|_| RedactError::InternalError)?;
        for m in re.find_iter(&doc.text) {
            if overlaps_provider_entity(doc, m.start(), m.end()) {
                continue;
            }
            spans.push(Span::new(m.start(), m.end(), EntityType::PatientName, TIER_A_SCORE, TIER_A_RULE));
        }
    }
    Ok(spans)
}

fn tier_b(doc: &AnnotatedDocument, cache: &NameCache, catalog: &PatternCatalog) -> Result<Vec<Span>, RedactError> {
    if cache.parts.is_empty() {
        return Ok(Vec::new());
    }

    let mut parts: Vec<&String> = cache.parts.iter().collect();
    parts.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    let alternation = parts.iter().map(|p| escape(p)).collect::<Vec<_>>().join("|");
    let pattern = format!(r"\b(?:{})\b", alternation);
    let re = RegexBuilder::new(&pattern)
        .case_insensitive(true)
        .build()
        .map_err(|_| RedactError::InternalError)?;

    let mut spans = Vec::new();
    for m in re.find_iter(&doc.text) {
        let window_start = m.start().saturating_sub(TITLE_LOOKBEHIND_CHARS);
        let window_start = floor_char_boundary(&doc.text, window_start);
        let window = doc.text[window_start..m.start()].to_lowercase();

        let protected = catalog.vocab.titles.iter().any(|title| {
            let title = title.strip_suffix('.').unwrap_or(title).to_lowercase();
            window
                .split(|c: char| !c.is_alphanumeric())
                .any(|word| word == title)
        });
        if protected {
            continue;
        }

        spans.push(Span::new(m.start(), m.end(), EntityType::PatientName, TIER_B_SCORE, TIER_B_RULE));
    }
    Ok(spans)
}

/// Run pass-2 over `doc` using the cache pass-1 populated. A no-op if the
/// cache never initialized (no patient name was found in pass-1).
pub fn run(doc: &AnnotatedDocument, cache: &NameCache, catalog: &PatternCatalog) -> Vec<Span> {
    if !cache.initialized {
        return Vec::new();
    }

    let mut spans = Vec::new();
    match tier_a(doc, cache) {
        Ok(found) => spans.extend(found),
        Err(e) => tracing::warn!(rule_name = TIER_A_RULE, error_class = e.class(), "pass-2 tier A faulted, skipping"),
    }
    match tier_b(doc, cache, catalog) {
        Ok(found) => spans.extend(found),
        Err(e) => tracing::warn!(rule_name = TIER_B_RULE, error_class = e.class(), "pass-2 tier B faulted, skipping"),
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::PatternCatalog;
    use crate::nlp::{heuristic::HeuristicNlpFacility, Annotator, NlpFacility};

    async fn annotate(text: &str, catalog: &PatternCatalog) -> AnnotatedDocument {
        let facility = HeuristicNlpFacility::new(&catalog.vocab.patient_verbs_active, &catalog.vocab.patient_verbs_passive);
        let annotator = Annotator::new(&facility as &dyn NlpFacility, catalog);
        annotator.annotate(text).await.unwrap()
    }

    #[tokio::test]
    async fn tier_a_finds_repeated_full_name_but_skips_provider() {
        let catalog = PatternCatalog::load_default().unwrap();
        let text = "Dr. Smith treated patient Smith. Smith was discharged.";
        let doc = annotate(text, &catalog).await;

        let mut cache = NameCache::new();
        cache.full_names.insert("smith".to_string());
        cache.initialized = true;

        let spans = run(&doc, &cache, &catalog);
        let a_spans: Vec<&Span> = spans.iter().filter(|s| s.rule_name == TIER_A_RULE).collect();

        assert_eq!(a_spans.len(), 2, "should match the two bare 'Smith' occurrences, not the provider's");
        for s in &a_spans {
            assert!(!overlaps_provider_entity(&doc, s.start, s.end));
            assert_eq!(s.score, TIER_A_SCORE);
        }
    }

    #[tokio::test]
    async fn tier_b_respects_title_lookbehind() {
        let catalog = PatternCatalog::load_default().unwrap();
        let text = "Dr. Lee reviewed the chart. Lee will follow up.";
        let doc = annotate(text, &catalog).await;

        let mut cache = NameCache::new();
        cache.parts.insert("lee".to_string());
        cache.initialized = true;

        let spans = run(&doc, &cache, &catalog);
        let b_spans: Vec<&Span> = spans.iter().filter(|s| s.rule_name == TIER_B_RULE).collect();

        assert_eq!(b_spans.len(), 1);
        assert_eq!(&doc.text[b_spans[0].start..b_spans[0].end], "Lee");
        assert_eq!(b_spans[0].score, TIER_B_SCORE);
    }

    #[tokio::test]
    async fn uninitialized_cache_produces_nothing() {
        let catalog = PatternCatalog::load_default().unwrap();
        let doc = annotate("Anything at all.", &catalog).await;
        let cache = NameCache::new();
        assert!(run(&doc, &cache, &catalog).is_empty());
    }
}
