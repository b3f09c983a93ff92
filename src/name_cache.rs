//! Name Cache (component E): request-scoped dictionary of patient names.
//!
//! Exclusively owned by one orchestrator invocation: constructed fresh per
//! request, mutated only while pass-1 runs, read-only afterward, and
//! dropped at the end of the request. It is threaded through the pipeline
//! explicitly as an owned value, never stored behind a global or
//! thread-local.

use std::collections::HashSet;

use crate::catalog::PatternCatalog;
use crate::types::Span;

#[derive(Debug, Default)]
pub struct NameCache {
    pub full_names: HashSet<String>,
    pub parts: HashSet<String>,
    pub initialized: bool,
}

fn casefold_strip_punct(s: &str) -> String {
    s.trim_matches(|c: char| c.is_ascii_punctuation() || c.is_whitespace())
        .to_lowercase()
}

impl NameCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Populate from every pass-1 `PATIENT_NAME` span's surface text.
    pub fn populate_from_pass1(&mut self, text: &str, pass1_patient_spans: &[&Span], catalog: &PatternCatalog) {
        for span in pass1_patient_spans {
            let surface = &text[span.start..span.end];
            let name = casefold_strip_punct(surface);
            if name.is_empty() {
                continue;
            }
            let added_full = self.full_names.insert(name.clone());

            let mut added_part = false;
            for part in name.split_whitespace() {
                let part = part.trim_matches(|c: char| c.is_ascii_punctuation());
                if part.chars().count() >= 3 && !catalog.vocab.stop_words.iter().any(|s| s == part) {
                    added_part |= self.parts.insert(part.to_string());
                }
            }

            if added_full || added_part {
                self.initialized = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::PatternCatalog;
    use crate::types::EntityType;

    #[test]
    fn populate_extracts_full_name_and_parts() {
        let catalog = PatternCatalog::load_default().unwrap();
        let text = "Patient Name: Jane Doe.";
        let span = Span::new(14, 22, EntityType::PatientName, 0.95, "patient_name_pattern");
        let mut cache = NameCache::new();
        cache.populate_from_pass1(text, &[&span], &catalog);

        assert!(cache.initialized);
        assert!(cache.full_names.contains("jane doe"));
        assert!(cache.parts.contains("jane"));
        assert!(cache.parts.contains("doe"));
    }

    #[test]
    fn short_parts_and_stop_words_are_excluded() {
        let catalog = PatternCatalog::load_default().unwrap();
        let text = "Al Fromthe";
        let span = Span::new(0, text.len(), EntityType::PatientName, 0.95, "test");
        let mut cache = NameCache::new();
        cache.populate_from_pass1(text, &[&span], &catalog);

        assert!(!cache.parts.contains("al"));
        assert!(cache.parts.contains("fromthe"));
    }

    #[test]
    fn empty_without_any_patient_spans() {
        let catalog = PatternCatalog::load_default().unwrap();
        let cache = NameCache::new();
        let _ = catalog;
        assert!(!cache.initialized);
    }
}
