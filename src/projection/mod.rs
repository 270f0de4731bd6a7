//! Projected documents: the C# and HTML views of a Razor host document.
//!
//! Each projection is a text buffer the Razor server keeps current through
//! incremental edits. Edits are fenced by the host document version they were
//! generated from and buffered while the host document is closed in the
//! editor.

mod buffer;
pub mod checksum;
pub mod csharp;
pub mod html;
mod provisional;
pub mod virtual_uri;

pub use buffer::BufferedUpdate;
pub use checksum::{ChecksumAlgorithm, ChecksumInfo};
pub use csharp::{AppliedEdits, CSharpProjectedDocument};
pub use html::HtmlProjectedDocument;
pub use provisional::ProvisionalEdit;
pub use virtual_uri::VirtualUriFormat;

use url::Url;

use crate::error::{RazorError, RazorResult};
use crate::language::ProjectionKind;
use crate::text::TextChange;

/// One edit batch addressed to a projection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProjectionUpdate {
    pub host_document_is_open: bool,
    pub changes: Vec<TextChange>,
    pub host_document_version: i32,
    /// Only meaningful for the C# projection.
    pub checksum: Option<ChecksumInfo>,
}

/// What [`ProjectedDocument::update`] did with an accepted batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Applied,
    Buffered,
}

/// Capabilities shared by both projections.
pub trait ProjectedDocument: Send + Sync {
    fn kind(&self) -> ProjectionKind;

    fn uri(&self) -> &Url;

    fn content(&self) -> &str;

    /// Content length in UTF-16 code units.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Host document version the content reflects; `None` until first update.
    fn host_document_sync_version(&self) -> Option<i32>;

    /// Counter bumped on every content mutation, provisional ones included.
    fn projected_document_sync_version(&self) -> u64;

    fn has_pending_updates(&self) -> bool;

    /// Fail if `incoming` is older than the recorded host version.
    ///
    /// Equal versions pass so the server can re-send content after project or
    /// import changes.
    fn check_host_document_version(&self, incoming: i32) -> RazorResult<()> {
        match self.host_document_sync_version() {
            Some(current) if incoming < current => Err(RazorError::stale_update(
                self.uri().as_str(),
                incoming,
                current,
            )),
            _ => Ok(()),
        }
    }

    /// Apply or buffer an edit batch.
    ///
    /// Fails with [`crate::error::RazorError::StaleUpdate`] when the batch is
    /// older than the recorded host version; the content is left untouched.
    fn update(&mut self, update: ProjectionUpdate) -> RazorResult<UpdateOutcome>;

    /// Apply every buffered batch, oldest first, and return them.
    fn flush_pending(&mut self) -> Vec<BufferedUpdate>;

    /// Empty the content and discard any buffered batches.
    fn clear(&mut self);
}
