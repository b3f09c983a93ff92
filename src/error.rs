//! Closed error taxonomy for the redaction service.
//!
//! Error messages are intentionally generic: per the logging contract, no
//! exception text or input fragments may reach a caller or a log sink.

use thiserror::Error;

/// Classified failure modes for a redaction request.
///
/// `RecognizerFault` never escapes the orchestrator: a faulting recognizer
/// is logged and skipped, and the request continues with reduced recall.
/// It is part of this enum so the orchestrator can use the same vocabulary
/// internally, but [`RedactError`] as returned by the service façade is
/// always one of the other four variants.
#[derive(Debug, Error)]
pub enum RedactError {
    /// Empty text, non-string input, or an empty entity-type configuration.
    #[error("invalid input")]
    InvalidInput,

    /// The pattern catalog is missing a required section, carries a
    /// malformed regex, or references a placeholder that cannot be
    /// resolved. Fatal at startup.
    #[error("configuration error")]
    ConfigError,

    /// The NLP facility could not be initialized or failed mid-call.
    #[error("nlp facility unavailable")]
    NlpUnavailable,

    /// A single recognizer raised unexpectedly. Internal only: callers see
    /// this folded into [`RedactError::InternalError`] if it is not
    /// contained by the orchestrator's skip-and-continue policy.
    #[error("recognizer fault: {rule_name}")]
    RecognizerFault { rule_name: String },

    /// Any unclassified failure. The whole request fails; no partial
    /// redaction is returned.
    #[error("internal error")]
    InternalError,
}

impl RedactError {
    /// Error class label for structured logs, never the `Display` text of
    /// an underlying cause, only this fixed tag.
    pub fn class(&self) -> &'static str {
        match self {
            RedactError::InvalidInput => "invalid_input",
            RedactError::ConfigError => "config_error",
            RedactError::NlpUnavailable => "nlp_unavailable",
            RedactError::RecognizerFault { .. } => "recognizer_fault",
            RedactError::InternalError => "internal_error",
        }
    }
}

pub type Result<T> = std::result::Result<T, RedactError>;
