//! One recognizer per non-name entity type: evaluates every configured
//! regex alternative and emits a span per non-empty match, with type-
//! specific validation for credit cards and provincial health numbers.
//!
//! The regex list for each entity type comes from the catalog rather than
//! being hard-coded, and provincial numbers run through
//! [`crate::validators::validate_province_number`] the same way credit
//! cards run through [`crate::validators::is_valid_credit_card`].

use super::Recognizer;
use crate::catalog::PatternCatalog;
use crate::error::RedactError;
use crate::nlp::AnnotatedDocument;
use crate::types::{EntityType, Span};
use crate::validators::{is_valid_credit_card, validate_province_number};

pub struct PatternRecognizer {
    entity_type: EntityType,
}

impl PatternRecognizer {
    pub fn new(entity_type: EntityType) -> Self {
        Self { entity_type }
    }

    fn is_provincial_health_number(&self) -> bool {
        !matches!(
            self.entity_type,
            EntityType::PatientName
                | EntityType::Phone
                | EntityType::Email
                | EntityType::Address
                | EntityType::PostalCode
                | EntityType::Dob
                | EntityType::Province
                | EntityType::MedicalRecordNumber
                | EntityType::CreditCard
                | EntityType::BankAccount
                | EntityType::BankName
                | EntityType::TransactionId
        )
    }
}

impl Recognizer for PatternRecognizer {
    fn name(&self) -> &'static str {
        self.entity_type.as_str()
    }

    fn recognize(&self, doc: &AnnotatedDocument, catalog: &PatternCatalog) -> Result<Vec<Span>, RedactError> {
        let mut spans = Vec::new();

        for rule in catalog.rules_for(self.entity_type) {
            for caps in rule.regex.captures_iter(&doc.text) {
                // Rules that isolate a label from its value (e.g. "HCN 1234...")
                // capture the value in group 1; the span covers only that group
                // so the label stays in the redacted text. Rules with no group
                // fall back to the whole match.
                let m = caps.get(1).or_else(|| caps.get(0)).expect("match 0 always present");
                if m.as_str().is_empty() {
                    continue;
                }

                if self.entity_type == EntityType::CreditCard && !is_valid_credit_card(m.as_str()) {
                    continue;
                }

                if self.is_provincial_health_number() && !validate_province_number(self.entity_type, m.as_str()) {
                    continue;
                }

                spans.push(Span::new(m.start(), m.end(), self.entity_type, rule.score, rule.name.clone()));
            }
        }

        Ok(spans)
    }
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
    async fn email_recognizer_matches() {
        let catalog = PatternCatalog::load_default().unwrap();
        let doc = annotate("Contact: john.doe@example.com", &catalog).await;
        let recognizer = PatternRecognizer::new(EntityType::Email);
        let spans = recognizer.recognize(&doc, &catalog).unwrap();
        assert_eq!(spans.len(), 1);
        assert_eq!(&doc.text[spans[0].start..spans[0].end], "john.doe@example.com");
    }

    #[tokio::test]
    async fn credit_card_recognizer_rejects_invalid_luhn() {
        let catalog = PatternCatalog::load_default().unwrap();
        let doc = annotate("Card 4111 1111 1111 1112 expires soon.", &catalog).await;
        let recognizer = PatternRecognizer::new(EntityType::CreditCard);
        let spans = recognizer.recognize(&doc, &catalog).unwrap();
        assert!(spans.is_empty());
    }

    #[tokio::test]
    async fn credit_card_recognizer_accepts_valid_luhn() {
        let catalog = PatternCatalog::load_default().unwrap();
        let doc = annotate("Card 4111 1111 1111 1111 expires soon.", &catalog).await;
        let recognizer = PatternRecognizer::new(EntityType::CreditCard);
        let spans = recognizer.recognize(&doc, &catalog).unwrap();
        assert_eq!(spans.len(), 1);
    }

    #[tokio::test]
    async fn postal_code_recognizer_matches_canadian_format() {
        let catalog = PatternCatalog::load_default().unwrap();
        let doc = annotate("Mailing address postal code: K1A 0B1.", &catalog).await;
        let recognizer = PatternRecognizer::new(EntityType::PostalCode);
        let spans = recognizer.recognize(&doc, &catalog).unwrap();
        assert_eq!(spans.len(), 1);
    }
}
