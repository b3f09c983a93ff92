//! Anonymizer (component H): left-to-right substitution of accepted spans
//! with their entity type's fixed placeholder. The original text is never
//! mutated; a new string is assembled.

use crate::types::Span;

/// Walk `text` left to right, copying verbatim between spans and emitting
/// each span's placeholder in its place. `spans` must already be sorted by
/// `start` and non-overlapping, as [`crate::merger::merge`] guarantees.
pub fn anonymize(text: &str, spans: &[Span]) -> String {
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;

    for span in spans {
        if span.start < cursor {
            continue;
        }
        out.push_str(&text[cursor..span.start]);
        out.push_str(&span.entity_type.placeholder());
        cursor = span.end;
    }
    out.push_str(&text[cursor..]);

    out
}
