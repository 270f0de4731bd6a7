//! Offset/length text edits pushed by the Razor server.
//!
//! A batch of [`TextChange`]s is emitted in ascending offset order, every span
//! addressing the buffer as it was *before* the batch. Replaying the batch from
//! the last edit to the first keeps the offsets of the not-yet-applied edits
//! valid, so no offset adjustment is ever required.

use log::warn;
use serde::{Deserialize, Serialize};

use super::position::clamp_utf16_to_byte;

/// A region of a document expressed as UTF-16 `start` + `length`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TextSpan {
    pub start: usize,
    pub length: usize,
}

impl TextSpan {
    pub fn new(start: usize, length: usize) -> Self {
        Self { start, length }
    }

    /// Exclusive end offset of the span.
    pub fn end(&self) -> usize {
        self.start + self.length
    }
}

/// Replace the text covered by `span` with `new_text`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextChange {
    pub new_text: String,
    pub span: TextSpan,
}

impl TextChange {
    pub fn new(new_text: impl Into<String>, start: usize, length: usize) -> Self {
        Self {
            new_text: new_text.into(),
            span: TextSpan::new(start, length),
        }
    }

    /// Pure insertion of `new_text` at `offset`.
    pub fn insert(offset: usize, new_text: impl Into<String>) -> Self {
        Self::new(new_text, offset, 0)
    }
}

/// Apply one edit to `content` in place.
///
/// Spans outside the buffer are clamped rather than rejected: the server
/// computes them from a projection version it knows to be current.
pub fn apply_change(content: &mut String, change: &TextChange) {
    let (start, start_clamped) = clamp_utf16_to_byte(content, change.span.start);
    let (end, end_clamped) = clamp_utf16_to_byte(content, change.span.end());
    if start_clamped || end_clamped {
        warn!(
            target: "razor_bridge::text",
            "Clamped edit span {}..{} to a buffer of {} bytes",
            change.span.start,
            change.span.end(),
            content.len()
        );
    }

    content.replace_range(start..end.max(start), &change.new_text);
}

/// Apply a batch of edits in place, last edit first.
pub fn apply_changes(content: &mut String, changes: &[TextChange]) {
    for change in changes.iter().rev() {
        apply_change(content, change);
    }
}
