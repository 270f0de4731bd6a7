//! Shared test utilities for unit tests.
//!
//! Import from module tests via `use crate::test_support::*;`

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tower_lsp_server::ls_types::Position;

use crate::error::{RazorError, RazorResult};
use crate::language::LanguageKind;
use crate::protocol::{
    LanguageQueryParams, LanguageQueryResponse, MapToDocumentEditsParams,
    MapToDocumentEditsResponse, MapToDocumentRangesParams, MapToDocumentRangesResponse,
    NamedPipeConnectParams, RazorInitializeParams, WirePosition, WireRange,
};
use crate::server::RazorServer;

/// Number of generated lines the fake server pretends precede host content.
pub(crate) const PREAMBLE_LINES: i64 = 10;

/// In-process stand-in for the Razor server.
///
/// Projected ranges map back by subtracting [`PREAMBLE_LINES`]; ranges that
/// land inside the preamble are reported as unmappable. Edits map unchanged.
#[derive(Default)]
pub(crate) struct FakeRazorServer {
    calls: Mutex<Vec<&'static str>>,
    fail_next_initialize: AtomicBool,
    fail_requests: AtomicBool,
    language: Mutex<Option<LanguageQueryResponse>>,
}

impl FakeRazorServer {
    pub(crate) fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn fail_next_initialize(&self) {
        self.fail_next_initialize.store(true, Ordering::SeqCst);
    }

    pub(crate) fn fail_requests(&self) {
        self.fail_requests.store(true, Ordering::SeqCst);
    }

    pub(crate) fn set_language(&self, kind: LanguageKind, position_index: usize) {
        *self.language.lock().unwrap() = Some(LanguageQueryResponse {
            kind,
            position_index,
            position: Position::default(),
            host_document_version: None,
        });
    }

    fn record(&self, method: &'static str) -> RazorResult<()> {
        self.calls.lock().unwrap().push(method);
        if self.fail_requests.load(Ordering::SeqCst) {
            return Err(RazorError::server(format!("{method} failed")));
        }
        Ok(())
    }
}

fn unshift(range: WireRange) -> WireRange {
    let line = |position: WirePosition| WirePosition {
        line: position.line - PREAMBLE_LINES,
        character: position.character,
    };
    let shifted = WireRange {
        start: line(range.start),
        end: line(range.end),
    };
    if shifted.start.line < 0 {
        WireRange::UNDEFINED
    } else {
        shifted
    }
}

#[async_trait]
impl RazorServer for FakeRazorServer {
    async fn language_query(
        &self,
        params: LanguageQueryParams,
    ) -> RazorResult<LanguageQueryResponse> {
        self.record("razor/languageQuery")?;
        Ok(self
            .language
            .lock()
            .unwrap()
            .clone()
            .unwrap_or(LanguageQueryResponse {
                kind: LanguageKind::Html,
                position_index: 0,
                position: params.position,
                host_document_version: None,
            }))
    }

    async fn map_to_document_ranges(
        &self,
        params: MapToDocumentRangesParams,
    ) -> RazorResult<MapToDocumentRangesResponse> {
        self.record("razor/mapToDocumentRanges")?;
        Ok(MapToDocumentRangesResponse {
            ranges: params
                .projected_ranges
                .into_iter()
                .map(|range| unshift(WireRange::from(range)))
                .collect(),
            spans: Vec::new(),
            host_document_version: Some(1),
        })
    }

    async fn map_to_document_edits(
        &self,
        params: MapToDocumentEditsParams,
    ) -> RazorResult<MapToDocumentEditsResponse> {
        self.record("razor/mapToDocumentEdits")?;
        Ok(MapToDocumentEditsResponse {
            text_changes: params.text_changes,
            host_document_version: Some(1),
        })
    }

    async fn initialize_razor(&self, _params: RazorInitializeParams) -> RazorResult<()> {
        self.record("razor/initialize")?;
        if self.fail_next_initialize.swap(false, Ordering::SeqCst) {
            return Err(RazorError::server("razor/initialize failed"));
        }
        Ok(())
    }

    async fn connect_named_pipe(&self, _params: NamedPipeConnectParams) -> RazorResult<()> {
        self.record("razor/namedPipeConnect")
    }
}
