//! Patient-name pattern recognizer (pass-1 stage 1): explicit form lines
//! such as "Patient Name:" or "Pt Name:", case-insensitive, covering the
//! name up to end of line or punctuation.

use lazy_static::lazy_static;
use regex::Regex;

use super::Recognizer;
use crate::catalog::PatternCatalog;
use crate::error::RedactError;
use crate::nlp::AnnotatedDocument;
use crate::types::{EntityType, Span};

lazy_static! {
    static ref FORM_LINE: Regex =
        Regex::new(r"(?i)\b(?:Patient Name|Pt Name)\s*:\s*([^\n\r.,;]+)").unwrap();
}

pub struct PatientPatternRecognizer;

const SCORE: f32 = 0.95;
const RULE_NAME: &str = "patient_name_form_line";

impl Recognizer for PatientPatternRecognizer {
    fn name(&self) -> &'static str {
        RULE_NAME
    }

    fn recognize(&self, doc: &AnnotatedDocument, _catalog: &PatternCatalog) -> Result<Vec<Span>, RedactError> {
        let mut spans = Vec::new();
        for caps in FORM_LINE.captures_iter(&doc.text) {
            let Some(name) = caps.get(1) else { continue };
            let trimmed_start = name.as_str().len() - name.as_str().trim_start().len();
            let trimmed_end = name.as_str().trim_end().len();
            if trimmed_end <= trimmed_start {
                continue;
            }
            let start = name.start() + trimmed_start;
            let end = name.start() + trimmed_end;
            spans.push(Span::new(start, end, EntityType::PatientName, SCORE, RULE_NAME));
        }
        Ok(spans)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nlp::{heuristic::HeuristicNlpFacility, Annotator, NlpFacility};

    #[tokio::test]
    async fn matches_patient_name_form_line() {
        let catalog = PatternCatalog::load_default().unwrap();
        let facility = HeuristicNlpFacility::new(&catalog.vocab.patient_verbs_active, &catalog.vocab.patient_verbs_passive);
        let annotator = Annotator::new(&facility as &dyn NlpFacility, &catalog);
        let doc = annotator.annotate("Patient Name: Jane Doe. DOB: 1980-05-12.").await.unwrap();

        let recognizer = PatientPatternRecognizer;
        let spans = recognizer.recognize(&doc, &catalog).unwrap();

        assert_eq!(spans.len(), 1);
        assert_eq!(&doc.text[spans[0].start..spans[0].end], "Jane Doe");
        assert_eq!(spans[0].score, SCORE);
    }
}
