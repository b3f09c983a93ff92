//! Pattern Catalog (component A): immutable, process-wide configuration.
//!
//! Loaded once from a declarative TOML file (either the compiled-in
//! default or a caller-supplied override) and published through a
//! [`once_cell::sync::OnceCell`], matching the crate's existing `once_cell`
//! dependency and the "lazily initialized module-level value with a
//! one-time initializer" guidance. Concurrent reads are lock-free; there is
//! no mutation path after [`PatternCatalog::load`] returns.

use once_cell::sync::OnceCell;
use regex::Regex;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::warn;

use crate::error::RedactError;
use crate::types::EntityType;

const DEFAULT_CATALOG_TOML: &str = include_str!("../config/patterns.toml");

#[derive(Debug, Deserialize)]
struct RawCatalog {
    vocabulary: RawVocabulary,
    #[serde(default)]
    patterns: HashMap<String, RawPatternGroup>,
    #[serde(default)]
    provinces: HashMap<String, RawProvince>,
}

#[derive(Debug, Deserialize)]
struct RawVocabulary {
    healthcare_titles: Vec<String>,
    patient_verbs_active: Vec<String>,
    patient_verbs_passive: Vec<String>,
    patient_context_keywords: Vec<String>,
    credit_card_context: Vec<String>,
    stop_words: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawPatternGroup {
    rules: Vec<RawRule>,
}

#[derive(Debug, Deserialize)]
struct RawRule {
    name: String,
    regex: String,
    score: f32,
}

#[derive(Debug, Deserialize)]
struct RawProvince {
    keywords: Vec<String>,
}

/// One compiled pattern alternative for an entity type.
pub struct CompiledRule {
    pub name: String,
    pub regex: Regex,
    pub score: f32,
}

/// Vocabulary lists used by the Annotator and the pattern-free recognizers.
pub struct Vocabulary {
    pub titles: Vec<String>,
    pub patient_verbs_active: Vec<String>,
    pub patient_verbs_passive: Vec<String>,
    pub context_keywords: Vec<String>,
    pub cc_context: Vec<String>,
    pub stop_words: Vec<String>,
}

pub struct ProvinceEntry {
    pub keywords: Vec<String>,
}

/// The process-wide, immutable configuration: compiled regexes, vocabulary,
/// per-province keyword lists, and the fixed placeholder table.
pub struct PatternCatalog {
    patterns: HashMap<EntityType, Vec<CompiledRule>>,
    pub vocab: Vocabulary,
    pub provinces: HashMap<String, ProvinceEntry>,
}

impl PatternCatalog {
    /// Compile a catalog from a TOML document. Required sections missing
    /// cause a `ConfigError`; a malformed regex does too. Missing *optional*
    /// pattern groups (an entity type simply absent from `[patterns.*]`)
    /// are logged and silently skipped rather than fatal.
    pub fn load_from_str(toml_text: &str) -> Result<Self, RedactError> {
        let raw: RawCatalog = toml::from_str(toml_text).map_err(|_| {
            tracing::error!(error_class = "config_error", "pattern catalog failed to parse");
            RedactError::ConfigError
        })?;

        let mut patterns: HashMap<EntityType, Vec<CompiledRule>> = HashMap::new();
        for (type_name, group) in raw.patterns {
            let Some(entity_type) = EntityType::from_str_id(&type_name) else {
                warn!(type_name = %type_name, "pattern catalog references unknown entity type, skipping");
                continue;
            };
            let mut compiled = Vec::with_capacity(group.rules.len());
            for rule in group.rules {
                let regex = Regex::new(&rule.regex).map_err(|_| RedactError::ConfigError)?;
                compiled.push(CompiledRule { name: rule.name, regex, score: rule.score });
            }
            patterns.insert(entity_type, compiled);
        }

        let vocab = Vocabulary {
            titles: raw.vocabulary.healthcare_titles,
            patient_verbs_active: raw.vocabulary.patient_verbs_active,
            patient_verbs_passive: raw.vocabulary.patient_verbs_passive,
            context_keywords: raw.vocabulary.patient_context_keywords,
            cc_context: raw.vocabulary.credit_card_context,
            stop_words: raw.vocabulary.stop_words,
        };

        let provinces = raw
            .provinces
            .into_iter()
            .map(|(code, p)| (code, ProvinceEntry { keywords: p.keywords }))
            .collect();

        Ok(Self { patterns, vocab, provinces })
    }

    /// Load the compiled-in default catalog.
    pub fn load_default() -> Result<Self, RedactError> {
        Self::load_from_str(DEFAULT_CATALOG_TOML)
    }

    /// Rules configured for `entity_type`, or an empty slice if none were
    /// configured (entity types with no patterns are legal: some only
    /// exist via pass-2/name-based recognition, e.g. `PATIENT_NAME`).
    pub fn rules_for(&self, entity_type: EntityType) -> &[CompiledRule] {
        self.patterns.get(&entity_type).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn placeholder_for(&self, entity_type: EntityType) -> String {
        entity_type.placeholder()
    }

    /// All entity types that carry at least one configured pattern rule.
    pub fn configured_pattern_types(&self) -> impl Iterator<Item = EntityType> + '_ {
        self.patterns.keys().copied()
    }
}

static GLOBAL_CATALOG: OnceCell<std::sync::Arc<PatternCatalog>> = OnceCell::new();

/// Process-wide shared catalog, initialized exactly once from the default
/// configuration on first use. Returns a cheap `Arc` clone of the single
/// underlying instance, so every caller shares the same compiled regexes.
pub fn global_catalog() -> std::sync::Arc<PatternCatalog> {
    GLOBAL_CATALOG
        .get_or_init(|| {
            std::sync::Arc::new(
                PatternCatalog::load_default().expect("default pattern catalog must be well-formed"),
            )
        })
        .clone()
}
