//! Patient-role recognizer (pass-1 stage 2): promotes every `PERSON`
//! entity the Annotator tagged `role = PATIENT`, and that carries no
//! `provider` token, to a `PATIENT_NAME` span.

use super::Recognizer;
use crate::catalog::PatternCatalog;
use crate::error::RedactError;
use crate::nlp::AnnotatedDocument;
use crate::types::{EntityType, NerLabel, Role, Span};

pub struct PatientRoleRecognizer;

const SCORE: f32 = 0.85;
const RULE_NAME: &str = "patient_role_dependency";

impl Recognizer for PatientRoleRecognizer {
    fn name(&self) -> &'static str {
        RULE_NAME
    }

    fn recognize(&self, doc: &AnnotatedDocument, _catalog: &PatternCatalog) -> Result<Vec<Span>, RedactError> {
        let mut spans = Vec::new();
        for entity in &doc.entities {
            if entity.label != NerLabel::Person {
                continue;
            }
            let tokens = doc.entity_tokens(entity);
            let any_patient = tokens.iter().any(|t| t.role == Some(Role::Patient));
            let any_provider = tokens.iter().any(|t| t.provider);
            if any_patient && !any_provider {
                spans.push(Span::new(entity.char_start, entity.char_end, EntityType::PatientName, SCORE, RULE_NAME));
            }
        }
        Ok(spans)
    }
}
