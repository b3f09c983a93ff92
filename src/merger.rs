//! Merger (component G): resolves overlapping spans from pass-1 and pass-2
//! into a non-overlapping accepted set.
//!
//! Precedence: pass-1 unconditionally beats pass-2. Within a
//! pass, higher score wins, then longer span, then earliest start, then
//! rule-name lexicographic order as the final tie-break. Implemented as a
//! sort-then-sweep: sort candidates best-first by that precedence, then walk
//! in that order accepting a span only if it doesn't overlap anything
//! already accepted.

use crate::types::Span;

#[derive(Clone, Copy, PartialEq, Eq)]
enum PassRank {
    One,
    Two,
}

fn pass_rank(rule_name: &str) -> PassRank {
    if rule_name.starts_with("pass2_") {
        PassRank::Two
    } else {
        PassRank::One
    }
}

/// Merge pass-1 and pass-2 spans into the accepted, non-overlapping set.
pub fn merge(pass1: Vec<Span>, pass2: Vec<Span>) -> Vec<Span> {
    let mut candidates: Vec<Span> = Vec::with_capacity(pass1.len() + pass2.len());
    candidates.extend(pass1);
    candidates.extend(pass2);

    candidates.sort_by(|a, b| {
        let rank_a = pass_rank(&a.rule_name);
        let rank_b = pass_rank(&b.rule_name);
        let a_is_one = rank_a == PassRank::One;
        let b_is_one = rank_b == PassRank::One;

        b_is_one
            .cmp(&a_is_one)
            .then_with(|| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal))
            .then_with(|| b.len().cmp(&a.len()))
            .then_with(|| a.start.cmp(&b.start))
            .then_with(|| a.rule_name.cmp(&b.rule_name))
    });

    let mut accepted: Vec<Span> = Vec::new();
    for candidate in candidates {
        if accepted.iter().any(|a| a.overlaps(&candidate)) {
            continue;
        }
        accepted.push(candidate);
    }

    accepted.sort_by_key(|s| s.start);
    accepted
}
