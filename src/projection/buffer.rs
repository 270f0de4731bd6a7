//! Text buffer shared by both projection kinds.

use log::debug;

use super::checksum::ChecksumInfo;
use crate::text::{TextChange, apply_changes, utf16_len};

/// An edit batch received while the host document was closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferedUpdate {
    pub changes: Vec<TextChange>,
    pub host_document_version: i32,
    pub checksum: Option<ChecksumInfo>,
}

/// Content plus the version bookkeeping every projection carries.
#[derive(Debug, Default)]
pub(crate) struct ProjectionBuffer {
    content: String,
    host_document_version: Option<i32>,
    projected_document_version: u64,
    pending: Vec<BufferedUpdate>,
}

impl ProjectionBuffer {
    pub(crate) fn content(&self) -> &str {
        &self.content
    }

    /// Length in UTF-16 code units.
    pub(crate) fn len(&self) -> usize {
        utf16_len(&self.content)
    }

    pub(crate) fn host_document_version(&self) -> Option<i32> {
        self.host_document_version
    }

    pub(crate) fn projected_document_version(&self) -> u64 {
        self.projected_document_version
    }

    pub(crate) fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    pub(crate) fn record_version(&mut self, version: i32) {
        self.host_document_version = Some(version);
    }

    /// Replace the whole content.
    pub(crate) fn set_content(&mut self, content: String) {
        self.content = content;
        self.projected_document_version += 1;
    }

    /// Empty the content and drop every buffered batch.
    pub(crate) fn clear(&mut self) {
        if !self.pending.is_empty() {
            debug!(
                target: "razor_bridge::projection",
                "Discarding {} buffered update(s)",
                self.pending.len()
            );
            self.pending.clear();
        }
        self.set_content(String::new());
    }

    pub(crate) fn apply_batch(&mut self, changes: &[TextChange]) {
        if changes.is_empty() {
            return;
        }
        apply_changes(&mut self.content, changes);
        self.projected_document_version += 1;
    }

    pub(crate) fn buffer_update(&mut self, update: BufferedUpdate) {
        self.pending.push(update);
    }

    /// Apply every buffered batch in arrival order and hand them back.
    pub(crate) fn drain_pending(&mut self) -> Vec<BufferedUpdate> {
        let pending = std::mem::take(&mut self.pending);
        if !pending.is_empty() {
            debug!(
                target: "razor_bridge::projection",
                "Flushing {} buffered update(s)",
                pending.len()
            );
        }
        for update in &pending {
            self.apply_batch(&update.changes);
        }
        pending
    }
}
