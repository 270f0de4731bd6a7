//! Wire payloads exchanged with the Razor server and the C# workspace.
//!
//! All payloads are camelCase JSON. Ranges the server reports back may carry
//! negative coordinates to mean "no mapping", so responses use [`WireRange`]
//! instead of [`tower_lsp_server::ls_types::Range`].

mod buffer;
mod dynamic_file;
mod mapping;

pub use buffer::UpdateBufferRequest;
pub use dynamic_file::{
    NamedPipeConnectParams, ProvideDynamicFileParams, ProvideDynamicFileResponse,
    RazorInitializeParams, RemoveDynamicFileParams,
};
pub use mapping::{
    LanguageQueryParams, LanguageQueryResponse, MapSpansParams, MapSpansResponse,
    MapTextChangesParams, MapTextChangesResponse, MapToDocumentEditsParams,
    MapToDocumentEditsResponse, MapToDocumentRangesParams, MapToDocumentRangesResponse,
    MappingBehavior, WirePosition, WireRange,
};

use std::str::FromStr;

use tower_lsp_server::ls_types::Uri;
use url::Url;

use crate::error::{RazorError, RazorResult};

pub const LANGUAGE_QUERY: &str = "razor/languageQuery";
pub const MAP_TO_DOCUMENT_RANGES: &str = "razor/mapToDocumentRanges";
pub const MAP_TO_DOCUMENT_EDITS: &str = "razor/mapToDocumentEdits";
pub const UPDATE_CSHARP_BUFFER: &str = "razor/updateCSharpBuffer";
pub const UPDATE_HTML_BUFFER: &str = "razor/updateHtmlBuffer";
pub const NAMED_PIPE_CONNECT: &str = "razor/namedPipeConnect";
pub const RAZOR_INITIALIZE: &str = "razor/initialize";
pub const MAP_SPANS: &str = "razor/mapSpans";
pub const MAP_TEXT_CHANGES: &str = "razor/mapTextChanges";
pub const PROVIDE_DYNAMIC_FILE_INFO: &str = "razor.provideDynamicFileInfo";
pub const REMOVE_DYNAMIC_FILE_INFO: &str = "razor.removeDynamicFileInfo";

pub fn url_to_uri(url: &Url) -> RazorResult<Uri> {
    Uri::from_str(url.as_str()).map_err(|_| RazorError::invalid_uri(url.as_str()))
}

pub fn uri_to_url(uri: &Uri) -> RazorResult<Url> {
    Url::parse(uri.as_str()).map_err(|_| RazorError::invalid_uri(uri.as_str()))
}
