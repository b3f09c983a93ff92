//! NLP Annotator (component C): wraps the external NLP facility and writes
//! the two Annotator-only per-token fields, `provider` and `role`.
//!
//! The real facility (tokenization, POS, dependency parse, NER) is an
//! external collaborator, out of scope the same way the model loader is.
//! [`NlpFacility`] is the contract it must satisfy; this module
//! ships one concrete, deterministic implementation
//! ([`heuristic::HeuristicNlpFacility`]) so the crate is runnable and
//! testable standalone, falling back to built-in regex/heuristic detection
//! when the ML layers are unavailable.

pub mod heuristic;

use async_trait::async_trait;
use tracing::debug;

use crate::catalog::PatternCatalog;
use crate::error::RedactError;
use crate::types::{AnnotatedToken, NerEntity, NerLabel, Role};

/// Raw output of the external NLP facility, before the Annotator's
/// provider/role post-pass has run.
pub struct RawDocument {
    pub tokens: Vec<AnnotatedToken>,
    pub entities: Vec<NerEntity>,
}

/// Contract the external NLP facility must satisfy: character
/// offsets, lemma, POS, dependency labels including `nsubj`/`nsubjpass` and
/// head index, sentence ids, and NER spans including `PERSON`.
#[async_trait]
pub trait NlpFacility: Send + Sync {
    async fn annotate(&self, text: &str) -> Result<RawDocument, RedactError>;
}

/// The annotated document that flows through the rest of the pipeline:
/// tokens (with `provider`/`role` now populated) plus the NER entity list.
pub struct AnnotatedDocument {
    pub text: String,
    pub tokens: Vec<AnnotatedToken>,
    pub entities: Vec<NerEntity>,
}

impl AnnotatedDocument {
    /// Tokens belonging to NER entity `entity`, by index range.
    pub fn entity_tokens(&self, entity: &NerEntity) -> &[AnnotatedToken] {
        &self.tokens[entity.token_start..entity.token_end]
    }

    pub fn entity_any_provider(&self, entity: &NerEntity) -> bool {
        self.entity_tokens(entity).iter().any(|t| t.provider)
    }

    pub fn entity_text(&self, entity: &NerEntity) -> &str {
        &self.text[entity.char_start..entity.char_end]
    }
}

/// Runs the external facility, then the deterministic post-pass from
/// provider tagging by preceding-title lookup, and patient
/// role tagging by the two dependency patterns (active `nsubj`, passive
/// `nsubjpass`).
pub struct Annotator<'a> {
    facility: &'a dyn NlpFacility,
    catalog: &'a PatternCatalog,
}

impl<'a> Annotator<'a> {
    pub fn new(facility: &'a dyn NlpFacility, catalog: &'a PatternCatalog) -> Self {
        Self { facility, catalog }
    }

    pub async fn annotate(&self, text: &str) -> Result<AnnotatedDocument, RedactError> {
        let raw = self.facility.annotate(text).await?;
        let mut tokens = raw.tokens;
        let entities = raw.entities;

        self.tag_providers(text, &mut tokens, &entities);
        self.tag_patient_roles(&mut tokens, &entities);

        debug!(token_count = tokens.len(), entity_count = entities.len(), "document annotated");

        Ok(AnnotatedDocument { text: text.to_string(), tokens, entities })
    }

    /// For every `PERSON` entity, inspect the token immediately preceding
    /// its start. If that token, casefolded and stripped of a trailing
    /// `.`, matches a configured healthcare title, mark every token of the
    /// entity `provider = true`. Punctuation between the title and the name
    /// defeats the match; this is intentional conservatism.
    fn tag_providers(&self, _text: &str, tokens: &mut [AnnotatedToken], entities: &[NerEntity]) {
        for entity in entities {
            if entity.label != NerLabel::Person {
                continue;
            }
            if entity.token_start == 0 {
                continue;
            }
            let preceding = &tokens[entity.token_start - 1];
            let candidate = preceding.text.to_lowercase();
            let candidate = candidate.strip_suffix('.').unwrap_or(&candidate);
            if self.catalog.vocab.titles.iter().any(|t| {
                let t = t.strip_suffix('.').unwrap_or(t);
                t.eq_ignore_ascii_case(candidate)
            }) {
                for tok in &mut tokens[entity.token_start..entity.token_end] {
                    tok.provider = true;
                }
            }
        }
    }

    /// Matches the active (`nsubj`) and passive (`nsubjpass`) patient-verb
    /// dependency patterns against the whole document, in sentence-then-
    /// token order, and sets `role = PATIENT` on qualifying subjects,
    /// unless the subject (or its enclosing `PERSON` entity) is already
    /// provider-tagged.
    fn tag_patient_roles(&self, tokens: &mut [AnnotatedToken], entities: &[NerEntity]) {
        let mut subject_indices: Vec<usize> = Vec::new();

        // processing order: sentence-ascending, then token-ascending.
        let mut order: Vec<usize> = (0..tokens.len()).collect();
        order.sort_by_key(|&i| (tokens[i].sent_id, i));

        for &head_idx in &order {
            let lemma = tokens[head_idx].lemma.clone();
            let is_active_verb = self.catalog.vocab.patient_verbs_active.iter().any(|v| v == &lemma);
            let is_passive_verb = self.catalog.vocab.patient_verbs_passive.iter().any(|v| v == &lemma);
            if !is_active_verb && !is_passive_verb {
                continue;
            }
            for &i in &order {
                if tokens[i].head_index != head_idx || i == head_idx {
                    continue;
                }
                let dep = tokens[i].dep.as_str();
                if (is_active_verb && dep == "nsubj") || (is_passive_verb && dep == "nsubjpass") {
                    subject_indices.push(i);
                }
            }
        }

        for idx in subject_indices {
            if tokens[idx].provider {
                continue;
            }
            tokens[idx].role = Some(Role::Patient);

            if let Some(entity) = entities.iter().find(|e| {
                e.label == NerLabel::Person && idx >= e.token_start && idx < e.token_end
            }) {
                let any_provider = tokens[entity.token_start..entity.token_end].iter().any(|t| t.provider);
                if !any_provider {
                    for tok in &mut tokens[entity.token_start..entity.token_end] {
                        tok.role = Some(Role::Patient);
                    }
                }
            }
        }
    }
}
