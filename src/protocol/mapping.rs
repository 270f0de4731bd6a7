use serde::{Deserialize, Serialize};
use tower_lsp_server::ls_types::{Position, Range, TextDocumentIdentifier, Uri};

use crate::language::LanguageKind;
use crate::text::{TextChange, TextSpan};

/// A position that may be negative when the server has no mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WirePosition {
    pub line: i64,
    pub character: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WireRange {
    pub start: WirePosition,
    pub end: WirePosition,
}

impl WireRange {
    /// The `(-1,-1)-(-1,-1)` sentinel used for unmappable ranges.
    pub const UNDEFINED: WireRange = WireRange {
        start: WirePosition {
            line: -1,
            character: -1,
        },
        end: WirePosition {
            line: -1,
            character: -1,
        },
    };

    /// Convert to an LSP range, or `None` if any coordinate is out of range.
    pub fn to_range(self) -> Option<Range> {
        let coordinate = |value: i64| u32::try_from(value).ok();
        Some(Range::new(
            Position::new(coordinate(self.start.line)?, coordinate(self.start.character)?),
            Position::new(coordinate(self.end.line)?, coordinate(self.end.character)?),
        ))
    }
}

impl From<Range> for WireRange {
    fn from(range: Range) -> Self {
        let position = |position: Position| WirePosition {
            line: i64::from(position.line),
            character: i64::from(position.character),
        };
        Self {
            start: position(range.start),
            end: position(range.end),
        }
    }
}

/// How strictly the server should map ranges that straddle generated code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum MappingBehavior {
    #[default]
    Strict,
    Inclusive,
}

impl TryFrom<u8> for MappingBehavior {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(MappingBehavior::Strict),
            1 => Ok(MappingBehavior::Inclusive),
            other => Err(format!("unknown mapping behavior: {other}")),
        }
    }
}

impl From<MappingBehavior> for u8 {
    fn from(behavior: MappingBehavior) -> Self {
        match behavior {
            MappingBehavior::Strict => 0,
            MappingBehavior::Inclusive => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageQueryParams {
    pub uri: Uri,
    pub position: Position,
}

/// Which language owns a host position, and where it lands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageQueryResponse {
    pub kind: LanguageKind,
    /// UTF-16 offset of `position` in the host document.
    pub position_index: usize,
    pub position: Position,
    #[serde(default)]
    pub host_document_version: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapToDocumentRangesParams {
    pub kind: LanguageKind,
    pub razor_document_uri: Uri,
    pub projected_ranges: Vec<Range>,
    #[serde(default)]
    pub mapping_behavior: MappingBehavior,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapToDocumentRangesResponse {
    pub ranges: Vec<WireRange>,
    #[serde(default)]
    pub spans: Vec<TextSpan>,
    #[serde(default)]
    pub host_document_version: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapToDocumentEditsParams {
    pub kind: LanguageKind,
    pub razor_document_uri: Uri,
    pub text_changes: Vec<TextChange>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapToDocumentEditsResponse {
    pub text_changes: Vec<TextChange>,
    #[serde(default)]
    pub host_document_version: Option<i32>,
}

/// `razor/mapSpans` request from the C# workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapSpansParams {
    pub csharp_document: TextDocumentIdentifier,
    pub ranges: Vec<Range>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapSpansResponse {
    pub razor_document: TextDocumentIdentifier,
    pub mapped_ranges: Vec<WireRange>,
    pub mapped_spans: Vec<TextSpan>,
}

/// `razor/mapTextChanges` request from the C# workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapTextChangesParams {
    pub csharp_document: TextDocumentIdentifier,
    pub text_changes: Vec<TextChange>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapTextChangesResponse {
    pub razor_document: TextDocumentIdentifier,
    pub mapped_text_changes: Vec<TextChange>,
}
