//! Virtual document URIs for projected documents.
//!
//! Each Razor host document owns two synthetic documents. Their URIs are
//! derived from the host by suffixing the host path and switching to a
//! projection-specific scheme:
//!
//! - `file:///app/Index.razor` → `razor-csharp:///app/Index.razor__virtual.cs`
//! - `file:///app/Index.razor` → `razor-html:///app/Index.razor__virtual.html`
//!
//! Hosts that are not `file:` URIs (`untitled:`, remote schemes) cannot be
//! flattened into a path, so the whole host URI is percent-encoded below a
//! `/virtual/` segment:
//!
//! - `untitled:Untitled-1` → `razor-csharp:///virtual/untitled%3AUntitled%2D1__virtual.cs`

use percent_encoding::{NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use url::Url;

use crate::config::defaults::{
    DEFAULT_CSHARP_SCHEME, DEFAULT_CSHARP_SUFFIX, DEFAULT_HTML_SCHEME, DEFAULT_HTML_SUFFIX,
};
use crate::error::{RazorError, RazorResult};
use crate::language::ProjectionKind;

/// Segment used for hosts that are not plain files.
const ENCODED_HOST_SEGMENT: &str = "/virtual/";

/// Scheme and suffix conventions for projected document URIs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualUriFormat {
    pub csharp_scheme: String,
    pub html_scheme: String,
    pub csharp_suffix: String,
    pub html_suffix: String,
}

impl Default for VirtualUriFormat {
    fn default() -> Self {
        Self {
            csharp_scheme: DEFAULT_CSHARP_SCHEME.to_string(),
            html_scheme: DEFAULT_HTML_SCHEME.to_string(),
            csharp_suffix: DEFAULT_CSHARP_SUFFIX.to_string(),
            html_suffix: DEFAULT_HTML_SUFFIX.to_string(),
        }
    }
}

impl VirtualUriFormat {
    pub fn scheme(&self, kind: ProjectionKind) -> &str {
        match kind {
            ProjectionKind::CSharp => &self.csharp_scheme,
            ProjectionKind::Html => &self.html_scheme,
        }
    }

    pub fn suffix(&self, kind: ProjectionKind) -> &str {
        match kind {
            ProjectionKind::CSharp => &self.csharp_suffix,
            ProjectionKind::Html => &self.html_suffix,
        }
    }

    /// Build the projection URI of `kind` for a host document.
    pub fn projection_uri(&self, host: &Url, kind: ProjectionKind) -> RazorResult<Url> {
        let scheme = self.scheme(kind);
        let suffix = self.suffix(kind);

        let uri_string = if host.scheme() == "file" {
            format!("{scheme}://{}{suffix}", host.path())
        } else {
            let encoded_host = utf8_percent_encode(host.as_str(), NON_ALPHANUMERIC);
            format!("{scheme}://{ENCODED_HOST_SEGMENT}{encoded_host}{suffix}")
        };

        Url::parse(&uri_string).map_err(|_| RazorError::invalid_uri(uri_string))
    }

    /// Which projection `uri` addresses, if it is a projection URI at all.
    pub fn projection_kind(&self, uri: &Url) -> Option<ProjectionKind> {
        [ProjectionKind::CSharp, ProjectionKind::Html]
            .into_iter()
            .find(|kind| uri.scheme() == self.scheme(*kind) && uri.path().ends_with(self.suffix(*kind)))
    }

    /// Whether `uri` names a generated C# projection.
    pub fn is_razor_csharp_file(&self, uri: &Url) -> bool {
        self.projection_kind(uri) == Some(ProjectionKind::CSharp)
    }

    /// Recover the host document URI from a projection URI.
    pub fn host_uri(&self, projection: &Url) -> Option<Url> {
        let kind = self.projection_kind(projection)?;
        let path = projection.path();
        let stripped = &path[..path.len() - self.suffix(kind).len()];

        if let Some(encoded) = stripped.strip_prefix(ENCODED_HOST_SEGMENT)
            && !encoded.contains('/')
            && let Ok(decoded) = percent_decode_str(encoded).decode_utf8()
            && let Ok(host) = Url::parse(&decoded)
        {
            return Some(host);
        }

        Url::parse(&format!("file://{stripped}")).ok()
    }
}
