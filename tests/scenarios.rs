//! End-to-end scenarios against the service façade, one per documented
//! narrative pattern: provider-only mentions, active/passive patient
//! mentions, repeated-name recall via pass-2, explicit form lines, and
//! financial identifiers.

use care_redact::RedactionService;

async fn redact(text: &str) -> String {
    let service = RedactionService::with_defaults().unwrap();
    service.redact(text).await.unwrap().redacted
}

#[tokio::test]
async fn provider_only_mention_is_left_untouched() {
    let out = redact("Dr. John Smith examined the patient.").await;
    assert_eq!(out, "Dr. John Smith examined the patient.");
}

#[tokio::test]
async fn context_keyword_tags_patient_name() {
    let out = redact("The patient John Smith complained of chest pain.").await;
    assert_eq!(out, "The patient <PATIENT_NAME> complained of chest pain.");
}

#[tokio::test]
async fn repeated_surname_recalled_via_pass2_but_provider_preserved() {
    let out = redact("Dr. Smith treated patient Smith. Smith was discharged.").await;
    assert_eq!(out, "Dr. Smith treated patient <PATIENT_NAME>. <PATIENT_NAME> was discharged.");
}

#[tokio::test]
async fn form_line_redacts_name_and_dob_and_health_number() {
    let out = redact("Patient Name: Jane Doe. DOB: 1980-05-12. HCN 1234-567-820-XY.").await;
    assert_eq!(out, "Patient Name: <PATIENT_NAME>. DOB: <DOB>. HCN <ON_HCN>.");
}

#[tokio::test]
async fn passive_voice_tags_subject_as_patient_while_provider_survives() {
    let out = redact("Jane was admitted after Dr. Jane Roe referred her.").await;
    assert_eq!(out, "<PATIENT_NAME> was admitted after Dr. Jane Roe referred her.");
}

#[tokio::test]
async fn credit_card_redacted_bare_expiry_without_year_left_alone() {
    let out = redact("Card 4111 1111 1111 1111 expires 01/30.").await;
    assert_eq!(out, "Card <CREDIT_CARD> expires 01/30.");
}
