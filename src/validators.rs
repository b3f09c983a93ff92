//! Pure, deterministic, side-effect-free validators.
//!
//! A Luhn checksum plus a small set of per-province digit-count/prefix/
//! checksum rules. A validator returning `false` causes its calling
//! recognizer to drop or downgrade the candidate; the policy lives with the
//! recognizer, not here.

use crate::types::EntityType;

/// Luhn (mod-10) checksum over the digit characters of `s`, ignoring any
/// other characters (spaces, hyphens). Used for credit cards and several
/// provincial health-number formats.
pub fn luhn_check(s: &str) -> bool {
    let digits: Vec<u32> = s.chars().filter_map(|c| c.to_digit(10)).collect();
    if digits.is_empty() {
        return false;
    }

    let mut sum = 0u32;
    let mut alternate = false;
    for &digit in digits.iter().rev() {
        let mut d = digit;
        if alternate {
            d *= 2;
            if d > 9 {
                d -= 9;
            }
        }
        sum += d;
        alternate = !alternate;
    }
    sum % 10 == 0
}

fn digits_only(s: &str) -> String {
    s.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Credit-card specific gate: 13-19 digits, leading digit in {3,4,5,6},
/// Luhn-valid.
pub fn is_valid_credit_card(s: &str) -> bool {
    let digits = digits_only(s);
    let len = digits.len();
    if !(13..=19).contains(&len) {
        return false;
    }
    match digits.chars().next() {
        Some(c) if matches!(c, '3' | '4' | '5' | '6') => {}
        _ => return false,
    }
    luhn_check(&digits)
}

/// Province-specific validators, selected by entity type. `false` means the
/// pass-1 provincial-health recognizer drops the candidate outright.
pub fn validate_province_number(entity_type: EntityType, digits_and_seps: &str) -> bool {
    let digits = digits_only(digits_and_seps);
    match entity_type {
        EntityType::OnHcn => digits.len() == 10 && luhn_check(&digits[..9]),
        EntityType::BcPhn => digits.len() == 10 && digits.starts_with('9'),
        EntityType::QcRamq => digits.len() == 8,
        EntityType::AbPhn => digits.len() == 9,
        EntityType::SkHsn => digits.len() == 9,
        EntityType::MbPhin => digits.len() == 9,
        EntityType::NsHcn => digits.len() == 10,
        EntityType::NbMedicare => digits.len() == 9,
        EntityType::NlMcp => digits.len() == 9,
        EntityType::PeHealth => digits.len() == 8,
        EntityType::NtHsn => digits.len() == 9,
        EntityType::NuHealth => digits.len() == 9,
        EntityType::YtYhcip => digits.len() == 9,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn luhn_accepts_known_valid_card() {
        assert!(luhn_check("4111111111111111"));
    }

    #[test]
    fn luhn_rejects_tampered_card() {
        assert!(!luhn_check("4111111111111112"));
    }

    #[test]
    fn credit_card_requires_valid_leading_digit() {
        assert!(!is_valid_credit_card("2111 1111 1111 1111"));
    }

    #[test]
    fn credit_card_requires_length_window() {
        assert!(!is_valid_credit_card("4111 1111 1111"));
    }

    #[test]
    fn on_hcn_requires_luhn_valid_prefix() {
        // First 9 digits must be luhn-valid; the 10th is a separate check digit.
        assert!(validate_province_number(EntityType::OnHcn, "1234567820X"));
    }

    #[test]
    fn on_hcn_rejects_bad_checksum() {
        assert!(!validate_province_number(EntityType::OnHcn, "1234567890X"));
    }

    #[test]
    fn qc_ramq_accepts_four_letters_eight_digits() {
        assert!(validate_province_number(EntityType::QcRamq, "ABCD12345678"));
    }

    #[test]
    fn qc_ramq_rejects_wrong_digit_count() {
        assert!(!validate_province_number(EntityType::QcRamq, "ABCD1234"));
    }
}
