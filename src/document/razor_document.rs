use ulid::Ulid;
use url::Url;

use super::path::host_path;
use crate::error::RazorResult;
use crate::language::ProjectionKind;
use crate::projection::{
    CSharpProjectedDocument, HtmlProjectedDocument, ProjectedDocument, VirtualUriFormat,
};

/// A Razor host document together with its two projections.
#[derive(Debug)]
pub struct RazorDocument {
    uri: Url,
    path: String,
    /// Distinguishes a recreated document from the one it replaced.
    instance_id: Ulid,
    is_open: bool,
    csharp_document: CSharpProjectedDocument,
    html_document: HtmlProjectedDocument,
}

impl RazorDocument {
    /// Create a document and derive both projection URIs from `uri`.
    pub fn create(uri: Url, format: &VirtualUriFormat) -> RazorResult<Self> {
        let csharp_uri = format.projection_uri(&uri, ProjectionKind::CSharp)?;
        let html_uri = format.projection_uri(&uri, ProjectionKind::Html)?;

        Ok(Self {
            path: host_path(&uri),
            uri,
            instance_id: Ulid::new(),
            is_open: false,
            csharp_document: CSharpProjectedDocument::new(csharp_uri),
            html_document: HtmlProjectedDocument::new(html_uri),
        })
    }

    pub fn uri(&self) -> &Url {
        &self.uri
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn instance_id(&self) -> Ulid {
        self.instance_id
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub(crate) fn set_open(&mut self, is_open: bool) {
        self.is_open = is_open;
    }

    pub fn csharp_document(&self) -> &CSharpProjectedDocument {
        &self.csharp_document
    }

    pub fn csharp_document_mut(&mut self) -> &mut CSharpProjectedDocument {
        &mut self.csharp_document
    }

    pub fn html_document(&self) -> &HtmlProjectedDocument {
        &self.html_document
    }

    pub fn projection(&self, kind: ProjectionKind) -> &dyn ProjectedDocument {
        match kind {
            ProjectionKind::CSharp => &self.csharp_document,
            ProjectionKind::Html => &self.html_document,
        }
    }

    pub fn projection_mut(&mut self, kind: ProjectionKind) -> &mut dyn ProjectedDocument {
        match kind {
            ProjectionKind::CSharp => &mut self.csharp_document,
            ProjectionKind::Html => &mut self.html_document,
        }
    }

    /// Snapshot of the identifying URIs, cheap to send across tasks.
    pub fn identity(&self) -> DocumentIdentity {
        DocumentIdentity {
            uri: self.uri.clone(),
            path: self.path.clone(),
            instance_id: self.instance_id,
            csharp_uri: self.csharp_document.uri().clone(),
            html_uri: self.html_document.uri().clone(),
        }
    }
}

/// Owned identity of a [`RazorDocument`], carried by change events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentIdentity {
    pub uri: Url,
    pub path: String,
    pub instance_id: Ulid,
    pub csharp_uri: Url,
    pub html_uri: Url,
}

impl DocumentIdentity {
    pub fn projection_uri(&self, kind: ProjectionKind) -> &Url {
        match kind {
            ProjectionKind::CSharp => &self.csharp_uri,
            ProjectionKind::Html => &self.html_uri,
        }
    }
}
