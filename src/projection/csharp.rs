use log::debug;
use url::Url;

use super::buffer::{BufferedUpdate, ProjectionBuffer};
use super::checksum::ChecksumInfo;
use super::provisional::ProvisionalOverlay;
use super::{ProjectedDocument, ProjectionUpdate, UpdateOutcome};
use crate::error::RazorResult;
use crate::language::ProjectionKind;
use crate::text::TextChange;

/// Result of [`CSharpProjectedDocument::apply_edits`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppliedEdits {
    /// Flushed batches in the order they were applied.
    pub edits: Vec<Vec<TextChange>>,
    /// Checksum metadata as it was before the flush.
    pub original_checksum: Option<ChecksumInfo>,
}

/// The C# view of a Razor document.
#[derive(Debug)]
pub struct CSharpProjectedDocument {
    uri: Url,
    buffer: ProjectionBuffer,
    checksum: Option<ChecksumInfo>,
    overlay: ProvisionalOverlay,
}

impl CSharpProjectedDocument {
    pub fn new(uri: Url) -> Self {
        Self {
            uri,
            buffer: ProjectionBuffer::default(),
            checksum: None,
            overlay: ProvisionalOverlay::default(),
        }
    }

    pub fn checksum(&self) -> Option<&ChecksumInfo> {
        self.checksum.as_ref()
    }

    /// Flush buffered updates for the C# workspace.
    pub fn apply_edits(&mut self) -> AppliedEdits {
        let original_checksum = self.checksum.clone();
        let edits = self
            .flush_pending()
            .into_iter()
            .map(|update| update.changes)
            .collect();

        AppliedEdits {
            edits,
            original_checksum,
        }
    }

    /// Insert a provisional `.` at the UTF-16 offset `index`.
    ///
    /// Returns false if a provisional dot is already at `index`.
    pub fn add_provisional_dot_at(&mut self, index: usize) -> bool {
        self.overlay.add_dot_at(&mut self.buffer, index)
    }

    pub fn remove_provisional_dot(&mut self) -> bool {
        self.overlay.remove_dot(&mut self.buffer)
    }

    /// Re-apply a dot at the last provisional position for completion resolve.
    pub fn ensure_resolve_provisional_dot(&mut self) -> bool {
        self.overlay.ensure_resolve_dot(&mut self.buffer)
    }

    pub fn remove_resolve_provisional_dot(&mut self, clear_position: bool) -> bool {
        self.overlay
            .remove_resolve_dot(&mut self.buffer, clear_position)
    }

    pub fn provisional_dot_position(&self) -> Option<usize> {
        self.overlay.provisional_position()
    }

    pub fn resolve_provisional_dot_position(&self) -> Option<usize> {
        self.overlay.resolve_position()
    }

    pub fn last_provisional_position(&self) -> Option<usize> {
        self.overlay.last_position()
    }
}

impl ProjectedDocument for CSharpProjectedDocument {
    fn kind(&self) -> ProjectionKind {
        ProjectionKind::CSharp
    }

    fn uri(&self) -> &Url {
        &self.uri
    }

    fn content(&self) -> &str {
        self.buffer.content()
    }

    fn len(&self) -> usize {
        self.buffer.len()
    }

    fn host_document_sync_version(&self) -> Option<i32> {
        self.buffer.host_document_version()
    }

    fn projected_document_sync_version(&self) -> u64 {
        self.buffer.projected_document_version()
    }

    fn has_pending_updates(&self) -> bool {
        self.buffer.has_pending()
    }

    fn update(&mut self, update: ProjectionUpdate) -> RazorResult<UpdateOutcome> {
        self.check_host_document_version(update.host_document_version)?;
        self.buffer.record_version(update.host_document_version);

        if !update.host_document_is_open {
            self.buffer.buffer_update(BufferedUpdate {
                changes: update.changes,
                host_document_version: update.host_document_version,
                checksum: update.checksum,
            });
            return Ok(UpdateOutcome::Buffered);
        }

        self.flush_pending();
        self.buffer.apply_batch(&update.changes);
        if update.checksum.is_some() {
            self.checksum = update.checksum;
        }

        debug!(
            target: "razor_bridge::projection",
            "Applied {} C# edit(s) to {} at host version {}",
            update.changes.len(),
            self.uri,
            update.host_document_version
        );
        Ok(UpdateOutcome::Applied)
    }

    fn flush_pending(&mut self) -> Vec<BufferedUpdate> {
        self.overlay.remove_all(&mut self.buffer);
        let flushed = self.buffer.drain_pending();
        if let Some(checksum) = flushed.iter().rev().find_map(|update| update.checksum.clone()) {
            self.checksum = Some(checksum);
        }
        flushed
    }

    fn clear(&mut self) {
        self.overlay.remove_all(&mut self.buffer);
        self.buffer.clear();
    }
}
