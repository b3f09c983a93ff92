//! A deterministic, rule-based stand-in for the external NLP facility.
//!
//! The real facility (a trained dependency parser + NER model) is out of
//! scope here; this gives good enough tokenization, POS, a small set of
//! hand-written dependency rules for the two patient-verb patterns, and
//! capitalized-run NER for `PERSON`. It satisfies the [`super::NlpFacility`]
//! contract exactly, so a real model-backed implementation is a drop-in
//! replacement.

use async_trait::async_trait;

use super::{NlpFacility, RawDocument};
use crate::error::RedactError;
use crate::types::{AnnotatedToken, NerEntity, NerLabel};

/// Abbreviations whose trailing period is kept attached to the token
/// instead of split into its own punctuation token. This is what makes
/// "Dr." a single token the way the provider-tagging boundary case
/// assumes.
const ABBREVIATIONS: &[&str] = &[
    "dr", "mr", "mrs", "ms", "prof", "st", "jr", "sr", "messrs", "gov",
];

/// Common capitalized words that must never start (or stand alone as) a
/// `PERSON` entity, even though they happen to be capitalized: sentence
/// starters, titles (handled separately), and clinical-note boilerplate.
const NON_PERSON_CAPITALIZED: &[&str] = &[
    "the", "a", "an", "this", "that", "these", "those", "patient", "pt",
    "card", "dob", "hcn", "phn", "mrn", "ramq", "dr", "mr", "mrs", "ms",
    "prof", "doctor", "nurse",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RawKind {
    Word,
    Number,
    Punct,
}

struct RawToken {
    text: String,
    kind: RawKind,
    char_start: usize,
    char_end: usize,
    /// True when this token's trailing punctuation ended the sentence.
    ends_sentence: bool,
}

fn tokenize(text: &str) -> Vec<RawToken> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let (start_byte, c) = chars[i];
        if c.is_whitespace() {
            i += 1;
            continue;
        }
        if c.is_alphabetic() {
            let mut j = i;
            while j < chars.len() && (chars[j].1.is_alphabetic() || chars[j].1 == '\'') {
                j += 1;
            }
            let word_end_byte = if j < chars.len() { chars[j].0 } else { text.len() };
            let word = text[start_byte..word_end_byte].to_string();

            // Attach a trailing period if this word is a known abbreviation
            // and the period immediately follows with no space.
            let mut end_byte = word_end_byte;
            let mut consumed_period = false;
            if j < chars.len() && chars[j].1 == '.' {
                let lower = word.to_lowercase();
                if ABBREVIATIONS.contains(&lower.as_str()) {
                    end_byte = if j + 1 < chars.len() { chars[j + 1].0 } else { text.len() };
                    consumed_period = true;
                    j += 1;
                }
            }

            let final_text = text[start_byte..end_byte].to_string();
            tokens.push(RawToken {
                text: final_text,
                kind: RawKind::Word,
                char_start: start_byte,
                char_end: end_byte,
                ends_sentence: false,
            });
            let _ = word; let _ = consumed_period;
            i = j;
            continue;
        }
        if c.is_ascii_digit() {
            let mut j = i;
            while j < chars.len() && (chars[j].1.is_ascii_digit() || chars[j].1 == '-' || chars[j].1 == '/' || chars[j].1 == ':') {
                // keep numeric-ish runs (dates, phone fragments) together,
                // but stop on a trailing separator with no following digit.
                if (chars[j].1 == '-' || chars[j].1 == '/' || chars[j].1 == ':')
                    && (j + 1 >= chars.len() || !chars[j + 1].1.is_ascii_digit())
                {
                    break;
                }
                j += 1;
            }
            let end_byte = if j < chars.len() { chars[j].0 } else { text.len() };
            tokens.push(RawToken {
                text: text[start_byte..end_byte].to_string(),
                kind: RawKind::Number,
                char_start: start_byte,
                char_end: end_byte,
                ends_sentence: false,
            });
            i = j;
            continue;
        }
        // single punctuation character
        let end_byte = if i + 1 < chars.len() { chars[i + 1].0 } else { text.len() };
        let ends_sentence = matches!(c, '.' | '!' | '?');
        tokens.push(RawToken {
            text: c.to_string(),
            kind: RawKind::Punct,
            char_start: start_byte,
            char_end: end_byte,
            ends_sentence,
        });
        i += 1;
    }
    tokens
}

/// Inflected-form -> lemma lookup, generic enough to cover the regular verb
/// forms used by this crate's configured patient-verb vocabulary.
fn lemmatize(word: &str, known_lemmas: &[String]) -> String {
    let lower = word.to_lowercase();
    if known_lemmas.iter().any(|l| l == &lower) {
        return lower;
    }

    let mut candidates: Vec<String> = Vec::new();

    if let Some(stem) = lower.strip_suffix("ied") {
        candidates.push(format!("{stem}y"));
    }
    if let Some(stem) = lower.strip_suffix("ing") {
        candidates.push(stem.to_string());
        candidates.push(format!("{stem}e"));
        if stem.len() >= 2 {
            let bytes = stem.as_bytes();
            if bytes[bytes.len() - 1] == bytes[bytes.len() - 2] {
                candidates.push(stem[..stem.len() - 1].to_string());
            }
        }
    }
    if let Some(stem) = lower.strip_suffix("ed") {
        candidates.push(stem.to_string());
        candidates.push(format!("{stem}e"));
        if stem.len() >= 2 {
            let bytes = stem.as_bytes();
            if bytes[bytes.len() - 1] == bytes[bytes.len() - 2] {
                candidates.push(stem[..stem.len() - 1].to_string());
            }
        }
    }
    if let Some(stem) = lower.strip_suffix('s') {
        candidates.push(stem.to_string());
    }

    candidates
        .into_iter()
        .find(|c| known_lemmas.iter().any(|l| l == c))
        .unwrap_or(lower)
}

/// Rule-based implementation of the NLP facility contract: whitespace/
/// punctuation tokenizer with abbreviation handling, a lemmatizer generic
/// over the configured patient-verb vocabulary, capitalized-run `PERSON`
/// NER, and dependency edges for exactly the two patterns this crate names
/// (`nsubj` for an immediate pre-verb subject, `nsubjpass` for a subject
/// separated from its passive verb by `was`/`were`).
pub struct HeuristicNlpFacility {
    known_lemmas: Vec<String>,
}

impl HeuristicNlpFacility {
    pub fn new(active_verbs: &[String], passive_verbs: &[String]) -> Self {
        let mut known_lemmas = active_verbs.to_vec();
        known_lemmas.extend(passive_verbs.iter().cloned());
        Self { known_lemmas }
    }

    fn is_person_candidate(&self, word: &str) -> bool {
        let first = word.chars().next();
        let starts_upper = matches!(first, Some(c) if c.is_uppercase());
        if !starts_upper {
            return false;
        }
        let bare = word.trim_end_matches('.').to_lowercase();
        !NON_PERSON_CAPITALIZED.contains(&bare.as_str())
    }
}

#[async_trait]
impl NlpFacility for HeuristicNlpFacility {
    async fn annotate(&self, text: &str) -> Result<RawDocument, RedactError> {
        let raw_tokens = tokenize(text);

        let mut tokens: Vec<AnnotatedToken> = Vec::with_capacity(raw_tokens.len());
        let mut sent_id = 0usize;

        for rt in &raw_tokens {
            let is_word = rt.kind == RawKind::Word;
            let lemma = if is_word { lemmatize(&rt.text, &self.known_lemmas) } else { rt.text.to_lowercase() };
            let pos = match rt.kind {
                RawKind::Word => {
                    if self.known_lemmas.iter().any(|l| l == &lemma) { "VERB" } else { "NOUN" }
                }
                RawKind::Number => "NUM",
                RawKind::Punct => "PUNCT",
            };
            tokens.push(AnnotatedToken {
                text: rt.text.clone(),
                lemma,
                pos: pos.to_string(),
                dep: "dep".to_string(),
                head_index: tokens.len(),
                sent_id,
                char_start: rt.char_start,
                char_end: rt.char_end,
                provider: false,
                role: None,
            });
            if rt.ends_sentence {
                sent_id += 1;
            }
        }

        // NER: maximal runs of capitalized, non-excluded word tokens.
        let mut entities = Vec::new();
        let mut i = 0;
        while i < raw_tokens.len() {
            if raw_tokens[i].kind == RawKind::Word && self.is_person_candidate(&raw_tokens[i].text) {
                let start = i;
                let mut j = i + 1;
                while j < raw_tokens.len() {
                    let is_word = raw_tokens[j].kind == RawKind::Word;
                    let is_cap = is_word && raw_tokens[j].text.chars().next().map(|c| c.is_uppercase()).unwrap_or(false);
                    let is_middle_initial = is_word && raw_tokens[j].text.trim_end_matches('.').len() == 1;
                    if is_word && (is_cap || is_middle_initial) {
                        j += 1;
                    } else {
                        break;
                    }
                }
                entities.push(NerEntity {
                    label: NerLabel::Person,
                    token_start: start,
                    token_end: j,
                    char_start: raw_tokens[start].char_start,
                    char_end: raw_tokens[j - 1].char_end,
                });
                i = j;
            } else {
                i += 1;
            }
        }

        // Dependency edges for the two patient-verb patterns. Collected by
        // index first to avoid borrowing `tokens` while mutating it.
        let mut deps: Vec<(usize, usize, &'static str)> = Vec::new();
        for verb_idx in 0..tokens.len() {
            if tokens[verb_idx].pos != "VERB" {
                continue;
            }
            let sent_id = tokens[verb_idx].sent_id;

            // Active: subject is the token immediately preceding the verb.
            if verb_idx > 0
                && tokens[verb_idx - 1].sent_id == sent_id
                && raw_tokens[verb_idx - 1].kind == RawKind::Word
            {
                deps.push((verb_idx - 1, verb_idx, "nsubj"));
            }

            // Passive: "<subject> was/were <verb>".
            if verb_idx >= 2 {
                let aux_idx = verb_idx - 1;
                let aux_text = raw_tokens[aux_idx].text.to_lowercase();
                if (aux_text == "was" || aux_text == "were") && tokens[aux_idx].sent_id == sent_id {
                    let subj_idx = verb_idx - 2;
                    if tokens[subj_idx].sent_id == sent_id && raw_tokens[subj_idx].kind == RawKind::Word {
                        deps.push((subj_idx, verb_idx, "nsubjpass"));
                    }
                }
            }
        }

        for (subj_idx, verb_idx, dep) in deps {
            tokens[subj_idx].dep = dep.to_string();
            tokens[subj_idx].head_index = verb_idx;
        }

        Ok(RawDocument { tokens, entities })
    }
}
