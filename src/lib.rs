// Library exports for care-redact
// This allows tests and external crates to use the modules

pub mod anonymizer;
pub mod catalog;
pub mod error;
pub mod merger;
pub mod name_cache;
pub mod nlp;
pub mod orchestrator;
pub mod pass2;
pub mod recognizers;
pub mod service;
pub mod types;
pub mod validators;

// Re-export commonly used types
pub use catalog::PatternCatalog;
pub use error::{RedactError, Result};
pub use nlp::NlpFacility;
pub use service::RedactionService;
pub use types::{EntityType, RedactionMetadata, RedactionResult, Span};
