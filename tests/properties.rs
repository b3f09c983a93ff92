//! Cross-cutting properties the service façade must uphold regardless of
//! narrative content: input validation, pass-2 gating, provincial
//! checksum enforcement, and overlap-resolution precedence.

use care_redact::RedactionService;

#[tokio::test]
async fn empty_input_is_rejected() {
    let service = RedactionService::with_defaults().unwrap();
    let err = service.redact("").await.unwrap_err();
    assert_eq!(err.class(), "invalid_input");
}

#[tokio::test]
async fn whitespace_only_input_is_rejected() {
    let service = RedactionService::with_defaults().unwrap();
    let err = service.redact("   \n\t  ").await.unwrap_err();
    assert_eq!(err.class(), "invalid_input");
}

#[tokio::test]
async fn pass2_contributes_nothing_when_no_patient_name_found_in_pass1() {
    let service = RedactionService::with_defaults().unwrap();
    let text = "The weather was sunny and the building was quiet.";
    let result = service.redact(text).await.unwrap();
    assert!(!result.spans.iter().any(|s| s.rule_name.starts_with("pass2_")));
    assert_eq!(result.redacted, text);
}

#[tokio::test]
async fn provincial_number_failing_checksum_is_not_emitted() {
    let service = RedactionService::with_defaults().unwrap();
    // "123456789" does not pass the mod-10 checksum the ON_HCN validator requires.
    let text = "HCN 1234-567-890-XY on file.";
    let result = service.redact(text).await.unwrap();
    assert!(!result.spans.iter().any(|s| s.entity_type.as_str() == "ON_HCN"));
    assert!(result.redacted.contains("1234-567-890-XY"));
}

#[tokio::test]
async fn overlapping_pattern_hits_resolve_to_a_single_accepted_span() {
    let service = RedactionService::with_defaults().unwrap();
    let result = service.redact("Email me at john.doe@example.com please.").await.unwrap();

    for (i, a) in result.spans.iter().enumerate() {
        for b in result.spans.iter().skip(i + 1) {
            assert!(!a.overlaps(b), "accepted spans must never overlap");
        }
    }
}

#[tokio::test]
async fn concurrent_requests_never_leak_names_across_calls() {
    let service = RedactionService::with_defaults().unwrap();
    let mut handles = Vec::new();
    for i in 0..8 {
        let svc = service.clone();
        let text = format!("Patient Name: Person{i} Example.");
        handles.push(tokio::spawn(async move { (i, svc.redact(&text).await.unwrap()) }));
    }

    let mut results = Vec::with_capacity(handles.len());
    for h in handles {
        results.push(h.await.unwrap());
    }

    for (i, result) in &results {
        for j in 0..8 {
            if j != *i {
                assert!(!result.redacted.contains(&format!("Person{j}")));
            }
        }
    }
}
