use log::debug;
use url::Url;

use super::buffer::{BufferedUpdate, ProjectionBuffer};
use super::{ProjectedDocument, ProjectionUpdate, UpdateOutcome};
use crate::error::RazorResult;
use crate::language::ProjectionKind;

/// The HTML view of a Razor document.
#[derive(Debug)]
pub struct HtmlProjectedDocument {
    uri: Url,
    buffer: ProjectionBuffer,
}

impl HtmlProjectedDocument {
    pub fn new(uri: Url) -> Self {
        Self {
            uri,
            buffer: ProjectionBuffer::default(),
        }
    }
}

impl ProjectedDocument for HtmlProjectedDocument {
    fn kind(&self) -> ProjectionKind {
        ProjectionKind::Html
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
                checksum: None,
            });
            return Ok(UpdateOutcome::Buffered);
        }

        self.buffer.drain_pending();
        self.buffer.apply_batch(&update.changes);
        debug!(
            target: "razor_bridge::projection",
            "Applied {} HTML edit(s) to {} at host version {}",
            update.changes.len(),
            self.uri,
            update.host_document_version
        );
        Ok(UpdateOutcome::Applied)
    }

    fn flush_pending(&mut self) -> Vec<BufferedUpdate> {
        self.buffer.drain_pending()
    }

    fn clear(&mut self) {
        self.buffer.clear();
    }
}
