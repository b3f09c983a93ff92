//! Service Façade (component J): the crate's public entry point.
//!
//! `RedactionService` is cheap to clone and safe to share across tasks:
//! the catalog is immutable and the NLP facility is required to be
//! `Send + Sync`. Every call is independent: no state survives past the
//! returned `RedactionResult`, so concurrent callers never observe each
//! other's requests.

use std::sync::Arc;

use crate::catalog::PatternCatalog;
use crate::error::RedactError;
use crate::nlp::NlpFacility;
use crate::orchestrator;
use crate::types::RedactionResult;

#[derive(Clone)]
pub struct RedactionService {
    catalog: Arc<PatternCatalog>,
    facility: Arc<dyn NlpFacility>,
}

impl RedactionService {
    pub fn new(catalog: Arc<PatternCatalog>, facility: Arc<dyn NlpFacility>) -> Self {
        Self { catalog, facility }
    }

    /// Build a service over the process-wide default catalog (shared via
    /// [`crate::catalog::global_catalog`]) and the deterministic heuristic
    /// facility, with no external NLP dependency.
    pub fn with_defaults() -> Result<Self, RedactError> {
        let catalog = crate::catalog::global_catalog();
        let facility: Arc<dyn NlpFacility> = Arc::new(crate::nlp::heuristic::HeuristicNlpFacility::new(
            &catalog.vocab.patient_verbs_active,
            &catalog.vocab.patient_verbs_passive,
        ));
        Ok(Self { catalog, facility })
    }

    /// Redact `text`, returning the redacted copy, the accepted spans, and
    /// summary metadata. Fails closed: any error means no partial output
    /// is returned.
    pub async fn redact(&self, text: &str) -> Result<RedactionResult, RedactError> {
        orchestrator::redact(text, self.facility.as_ref(), &self.catalog).await
    }
}
