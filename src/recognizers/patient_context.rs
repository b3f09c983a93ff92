//! Patient-context recognizer (pass-1 stage 3): the fallback stage for
//! `PERSON` entities that neither a form-line match nor a dependency edge
//! picked up. Looks at the casefolded window immediately preceding the
//! entity for a configured context keyword.

use super::Recognizer;
use crate::catalog::PatternCatalog;
use crate::error::RedactError;
use crate::nlp::AnnotatedDocument;
use crate::types::{EntityType, NerLabel, Span};

const LOOKBEHIND_CHARS: usize = 30;
const SCORE: f32 = 0.90;
const RULE_NAME: &str = "patient_context_keyword";

pub struct PatientContextRecognizer;

fn contains_keyword_word(window: &str, keyword: &str) -> bool {
    window
        .split(|c: char| !c.is_alphanumeric())
        .any(|word| word == keyword)
}

impl Recognizer for PatientContextRecognizer {
    fn name(&self) -> &'static str {
        RULE_NAME
    }

    fn recognize(&self, doc: &AnnotatedDocument, catalog: &PatternCatalog) -> Result<Vec<Span>, RedactError> {
        let mut spans = Vec::new();
        for entity in &doc.entities {
            if entity.label != NerLabel::Person {
                continue;
            }
            let tokens = doc.entity_tokens(entity);
            if tokens.iter().any(|t| t.provider) {
                continue;
            }

            let window_start = entity.char_start.saturating_sub(LOOKBEHIND_CHARS);
            let window_start = floor_char_boundary(&doc.text, window_start);
            let window = doc.text[window_start..entity.char_start].to_lowercase();

            let matched = catalog
                .vocab
                .context_keywords
                .iter()
                .any(|keyword| contains_keyword_word(&window, keyword));

            if matched {
                spans.push(Span::new(entity.char_start, entity.char_end, EntityType::PatientName, SCORE, RULE_NAME));
            }
        }
        Ok(spans)
    }
}

fn floor_char_boundary(s: &str, mut idx: usize) -> usize {
    while idx > 0 && !s.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}
