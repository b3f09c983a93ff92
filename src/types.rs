//! Core data model shared by every pipeline stage.
//!
//! Spans are half-open character ranges `[start, end)` over the original
//! text. Positions are stable for the lifetime of one request; nothing in
//! this module reorders or rewrites `original`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Closed set of entity types the catalog may emit a span for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityType {
    PatientName,
    Phone,
    Email,
    Address,
    PostalCode,
    Dob,
    Province,
    MedicalRecordNumber,
    CreditCard,
    BankAccount,
    BankName,
    TransactionId,
    OnHcn,
    BcPhn,
    QcRamq,
    AbPhn,
    SkHsn,
    MbPhin,
    NsHcn,
    NbMedicare,
    NlMcp,
    PeHealth,
    NtHsn,
    NuHealth,
    YtYhcip,
}

impl EntityType {
    /// All variants, in a stable order. Used for catalog validation and for
    /// building the default placeholder table.
    pub const ALL: &'static [EntityType] = &[
        EntityType::PatientName,
        EntityType::Phone,
        EntityType::Email,
        EntityType::Address,
        EntityType::PostalCode,
        EntityType::Dob,
        EntityType::Province,
        EntityType::MedicalRecordNumber,
        EntityType::CreditCard,
        EntityType::BankAccount,
        EntityType::BankName,
        EntityType::TransactionId,
        EntityType::OnHcn,
        EntityType::BcPhn,
        EntityType::QcRamq,
        EntityType::AbPhn,
        EntityType::SkHsn,
        EntityType::MbPhin,
        EntityType::NsHcn,
        EntityType::NbMedicare,
        EntityType::NlMcp,
        EntityType::PeHealth,
        EntityType::NtHsn,
        EntityType::NuHealth,
        EntityType::YtYhcip,
    ];

    /// The config-file / wire identifier for this type, e.g. `"ON_HCN"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::PatientName => "PATIENT_NAME",
            EntityType::Phone => "PHONE",
            EntityType::Email => "EMAIL",
            EntityType::Address => "ADDRESS",
            EntityType::PostalCode => "POSTAL_CODE",
            EntityType::Dob => "DOB",
            EntityType::Province => "PROVINCE",
            EntityType::MedicalRecordNumber => "MEDICAL_RECORD_NUMBER",
            EntityType::CreditCard => "CREDIT_CARD",
            EntityType::BankAccount => "BANK_ACCOUNT",
            EntityType::BankName => "BANK_NAME",
            EntityType::TransactionId => "TRANSACTION_ID",
            EntityType::OnHcn => "ON_HCN",
            EntityType::BcPhn => "BC_PHN",
            EntityType::QcRamq => "QC_RAMQ",
            EntityType::AbPhn => "AB_PHN",
            EntityType::SkHsn => "SK_HSN",
            EntityType::MbPhin => "MB_PHIN",
            EntityType::NsHcn => "NS_HCN",
            EntityType::NbMedicare => "NB_MEDICARE",
            EntityType::NlMcp => "NL_MCP",
            EntityType::PeHealth => "PE_HEALTH",
            EntityType::NtHsn => "NT_HSN",
            EntityType::NuHealth => "NU_HEALTH",
            EntityType::YtYhcip => "YT_YHCIP",
        }
    }

    /// Parse a config-file identifier back into an `EntityType`.
    pub fn from_str_id(s: &str) -> Option<EntityType> {
        EntityType::ALL.iter().copied().find(|t| t.as_str() == s)
    }

    /// The literal placeholder substituted for a span of this type, e.g.
    /// `"<PATIENT_NAME>"`. Fixed, not configurable.
    pub fn placeholder(&self) -> String {
        format!("<{}>", self.as_str())
    }
}

/// A candidate or accepted detection: a half-open character range tagged
/// with an entity type, a confidence score, and the rule that produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub entity_type: EntityType,
    /// Monotone within one rule: higher means stronger evidence.
    pub score: f32,
    pub rule_name: String,
}

impl Span {
    pub fn new(start: usize, end: usize, entity_type: EntityType, score: f32, rule_name: impl Into<String>) -> Self {
        Self { start, end, entity_type, score, rule_name: rule_name.into() }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Two spans overlap iff their ranges intersect on at least one character.
    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Grammatical role assigned to a token by the patient-role dependency
/// patterns (§4.3). There is no provider role: providers are recognized by
/// the absence of `PATIENT` plus the `provider?` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Patient,
}

/// One token produced by the NLP facility, enriched with the two
/// Annotator-only fields `provider` and `role`.
///
/// `provider` and `role` are written exclusively by [`crate::nlp::Annotator`]
/// and must be treated as read-only by every recognizer.
#[derive(Debug, Clone)]
pub struct AnnotatedToken {
    pub text: String,
    pub lemma: String,
    pub pos: String,
    pub dep: String,
    pub head_index: usize,
    pub sent_id: usize,
    pub char_start: usize,
    pub char_end: usize,
    pub provider: bool,
    pub role: Option<Role>,
}

/// A contiguous named-entity span over the token stream, as produced by the
/// NLP facility's NER layer. `PERSON` is the only type this crate reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NerLabel {
    Person,
    Other(String),
}

#[derive(Debug, Clone)]
pub struct NerEntity {
    pub label: NerLabel,
    /// Index range into the token array, end-exclusive.
    pub token_start: usize,
    pub token_end: usize,
    pub char_start: usize,
    pub char_end: usize,
}

/// The full output of the redaction operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedactionResult {
    pub original: String,
    pub redacted: String,
    pub spans: Vec<Span>,
    pub metadata: RedactionMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedactionMetadata {
    pub count: usize,
    pub types: HashMap<String, usize>,
    pub engine_name: String,
}
