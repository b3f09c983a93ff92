//! Orchestrator (component I): drives one request end to end.
//!
//! Owns the per-request [`NameCache`] for the whole call and passes it
//! explicitly between pass-1 and pass-2, never behind a thread-local or a
//! shared global, so concurrent requests never observe each other's names
//! concurrently.

use crate::anonymizer::anonymize;
use crate::catalog::PatternCatalog;
use crate::error::RedactError;
use crate::merger::merge;
use crate::name_cache::NameCache;
use crate::nlp::{Annotator, NlpFacility};
use crate::pass2;
use crate::recognizers;
use crate::types::{EntityType, RedactionMetadata, RedactionResult, Span};

pub const ENGINE_NAME: &str = "care-redact";

/// Run the full pipeline over `text`: annotate, pass-1, populate the cache,
/// pass-2, merge, anonymize.
pub async fn redact(
    text: &str,
    facility: &dyn NlpFacility,
    catalog: &PatternCatalog,
) -> Result<RedactionResult, RedactError> {
    if text.trim().is_empty() {
        return Err(RedactError::InvalidInput);
    }

    let annotator = Annotator::new(facility, catalog);
    let doc = annotator.annotate(text).await?;

    let registry = recognizers::build_registry(catalog);
    let pass1_spans = recognizers::run_all(&registry, &doc, catalog);

    let mut cache = NameCache::new();
    let pass1_patient_spans: Vec<&Span> =
        pass1_spans.iter().filter(|s| s.entity_type == EntityType::PatientName).collect();
    cache.populate_from_pass1(text, &pass1_patient_spans, catalog);

    let pass2_spans = pass2::run(&doc, &cache, catalog);

    let accepted = merge(pass1_spans, pass2_spans);
    let redacted = anonymize(text, &accepted);

    let mut types = std::collections::HashMap::new();
    for span in &accepted {
        *types.entry(span.entity_type.as_str().to_string()).or_insert(0) += 1;
    }

    tracing::info!(span_count = accepted.len(), "request redacted");

    Ok(RedactionResult {
        original: text.to_string(),
        redacted,
        metadata: RedactionMetadata { count: accepted.len(), types, engine_name: ENGINE_NAME.to_string() },
        spans: accepted,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::PatternCatalog;
    use crate::nlp::heuristic::HeuristicNlpFacility;

    fn facility(catalog: &PatternCatalog) -> HeuristicNlpFacility {
        HeuristicNlpFacility::new(&catalog.vocab.patient_verbs_active, &catalog.vocab.patient_verbs_passive)
    }

    #[tokio::test]
    async fn empty_input_is_rejected() {
        let catalog = PatternCatalog::load_default().unwrap();
        let facility = facility(&catalog);
        let err = redact("   ", &facility, &catalog).await.unwrap_err();
        assert_eq!(err.class(), "invalid_input");
    }

    #[tokio::test]
    async fn form_line_scenario_redacts_patient_name() {
        let catalog = PatternCatalog::load_default().unwrap();
        let facility = facility(&catalog);
        let text = "Patient Name: Jane Doe. DOB: 1980-05-12.";
        let result = redact(text, &facility, &catalog).await.unwrap();
        assert!(result.redacted.contains("<PATIENT_NAME>"));
        assert!(!result.redacted.contains("Jane Doe"));
    }

    #[tokio::test]
    async fn provider_mention_survives_pass2_recall() {
        let catalog = PatternCatalog::load_default().unwrap();
        let facility = facility(&catalog);
        let text = "Dr. Smith treated patient Smith. Smith was discharged.";
        let result = redact(text, &facility, &catalog).await.unwrap();
        assert!(result.redacted.starts_with("Dr. Smith treated patient"));
        assert!(result.redacted.contains("<PATIENT_NAME>"));
    }

    #[tokio::test]
    async fn credit_card_failing_luhn_is_not_emitted() {
        let catalog = PatternCatalog::load_default().unwrap();
        let facility = facility(&catalog);
        let text = "Card 4111 1111 1111 1112 expires soon.";
        let result = redact(text, &facility, &catalog).await.unwrap();
        assert!(result.redacted.contains("4111 1111 1111 1112"));
    }
}
