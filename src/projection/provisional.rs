//! Speculative single-character edits on the C# projection.
//!
//! Typing `.` in a Razor file only reaches the C# projection after the Razor
//! server regenerates it. Completion asks the C# server right away, so a `.`
//! is inserted into the projection ahead of time and rolled back before the
//! next real edit. A second "resolve" dot is re-applied at the last
//! provisional position while completion items are resolved.
//!
//! At most one of the two dots is applied at any moment. Each records the
//! content it replaced, so rolling back is a plain restore.

use super::buffer::ProjectionBuffer;
use crate::text::TextChange;

const PROVISIONAL_TEXT: &str = ".";

/// An applied speculative edit and the content it replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionalEdit {
    /// UTF-16 offset of the inserted dot.
    pub position: usize,
    saved_content: String,
}

impl ProvisionalEdit {
    fn begin(buffer: &mut ProjectionBuffer, position: usize) -> Self {
        let saved_content = buffer.content().to_string();
        buffer.apply_batch(&[TextChange::insert(position, PROVISIONAL_TEXT)]);
        Self {
            position,
            saved_content,
        }
    }

    fn rollback(self, buffer: &mut ProjectionBuffer) -> usize {
        buffer.set_content(self.saved_content);
        self.position
    }
}

#[derive(Debug, Default)]
pub(crate) struct ProvisionalOverlay {
    provisional: Option<ProvisionalEdit>,
    resolve: Option<ProvisionalEdit>,
    last_position: Option<usize>,
}

impl ProvisionalOverlay {
    pub(crate) fn provisional_position(&self) -> Option<usize> {
        self.provisional.as_ref().map(|edit| edit.position)
    }

    pub(crate) fn resolve_position(&self) -> Option<usize> {
        self.resolve.as_ref().map(|edit| edit.position)
    }

    pub(crate) fn last_position(&self) -> Option<usize> {
        self.last_position
    }

    /// Returns false when a dot is already applied at `position`.
    pub(crate) fn add_dot_at(&mut self, buffer: &mut ProjectionBuffer, position: usize) -> bool {
        if self.provisional_position() == Some(position) {
            return false;
        }

        self.remove_resolve_dot(buffer, true);
        self.remove_dot(buffer);
        self.last_position = None;

        self.provisional = Some(ProvisionalEdit::begin(buffer, position));
        true
    }

    /// Roll back the provisional dot, remembering where it was.
    pub(crate) fn remove_dot(&mut self, buffer: &mut ProjectionBuffer) -> bool {
        match self.provisional.take() {
            Some(edit) => {
                self.last_position = Some(edit.rollback(buffer));
                true
            }
            None => false,
        }
    }

    /// Re-apply a dot at the last provisional position.
    pub(crate) fn ensure_resolve_dot(&mut self, buffer: &mut ProjectionBuffer) -> bool {
        self.remove_dot(buffer);
        self.remove_resolve_dot(buffer, false);

        match self.last_position {
            Some(position) => {
                self.resolve = Some(ProvisionalEdit::begin(buffer, position));
                true
            }
            None => false,
        }
    }

    pub(crate) fn remove_resolve_dot(
        &mut self,
        buffer: &mut ProjectionBuffer,
        clear_position: bool,
    ) -> bool {
        if clear_position {
            self.last_position = None;
        }
        match self.resolve.take() {
            Some(edit) => {
                edit.rollback(buffer);
                true
            }
            None => false,
        }
    }

    /// Roll back whatever is applied so a real edit sees clean content.
    pub(crate) fn remove_all(&mut self, buffer: &mut ProjectionBuffer) {
        self.remove_dot(buffer);
        self.remove_resolve_dot(buffer, false);
    }
}
