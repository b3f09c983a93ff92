//! Recognizers (Pass 1, component D): independent detectors over the
//! annotated document. Each recognizer is modeled as a trait object, one of
//! a small set of trait implementations. A recognizer never reaches into
//! another recognizer's state, and the registry is a flat, ordered list
//! built at startup.

mod pattern;
mod patient_context;
mod patient_pattern;
mod patient_role;

pub use pattern::PatternRecognizer;
pub use patient_context::PatientContextRecognizer;
pub use patient_pattern::PatientPatternRecognizer;
pub use patient_role::PatientRoleRecognizer;

use crate::catalog::PatternCatalog;
use crate::error::RedactError;
use crate::nlp::AnnotatedDocument;
use crate::types::{EntityType, Span};

/// "Given annotated text, produce spans." A recognizer must be pure with
/// respect to its inputs: no access to other recognizers, no mutation of
/// the document.
pub trait Recognizer: Send + Sync {
    fn name(&self) -> &'static str;
    fn recognize(&self, doc: &AnnotatedDocument, catalog: &PatternCatalog) -> Result<Vec<Span>, RedactError>;
}

/// Build the flat, ordered pass-1 recognizer registry: one pattern
/// recognizer per configured non-name entity type, followed by the three
/// patient-name stages.
pub fn build_registry(catalog: &PatternCatalog) -> Vec<Box<dyn Recognizer>> {
    let mut registry: Vec<Box<dyn Recognizer>> = Vec::new();

    for entity_type in EntityType::ALL {
        if *entity_type == EntityType::PatientName {
            continue;
        }
        if catalog.rules_for(*entity_type).is_empty() {
            continue;
        }
        registry.push(Box::new(PatternRecognizer::new(*entity_type)));
    }

    registry.push(Box::new(PatientPatternRecognizer));
    registry.push(Box::new(PatientRoleRecognizer));
    registry.push(Box::new(PatientContextRecognizer));

    registry
}

/// Run every recognizer in the registry, isolating faults:
/// a recognizer that errors is logged (rule name + error class only) and
/// skipped; the rest of the pipeline proceeds with reduced recall.
pub fn run_all(
    registry: &[Box<dyn Recognizer>],
    doc: &AnnotatedDocument,
    catalog: &PatternCatalog,
) -> Vec<Span> {
    let mut spans = Vec::new();
    for recognizer in registry {
        match recognizer.recognize(doc, catalog) {
            Ok(found) => spans.extend(found),
            Err(e) => {
                tracing::warn!(
                    rule_name = recognizer.name(),
                    error_class = e.class(),
                    "recognizer faulted, skipping for this request"
                );
            }
        }
    }
    spans
}
