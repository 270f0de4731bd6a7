use std::sync::atomic::{AtomicU64, Ordering};

use log::warn;
use url::Url;

use crate::language::ProjectionKind;

/// Sink for events worth reporting upstream.
pub trait TelemetryReporter: Send + Sync {
    /// The server announced an empty projection that was not empty locally.
    fn report_buffers_out_of_sync(&self, uri: &Url, kind: ProjectionKind);
}

/// Reports through the `log` facade and keeps counts.
#[derive(Debug, Default)]
pub struct LogTelemetryReporter {
    buffers_out_of_sync: AtomicU64,
}

impl LogTelemetryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn buffers_out_of_sync(&self) -> u64 {
        self.buffers_out_of_sync.load(Ordering::Relaxed)
    }
}

impl TelemetryReporter for LogTelemetryReporter {
    fn report_buffers_out_of_sync(&self, uri: &Url, kind: ProjectionKind) {
        let count = self.buffers_out_of_sync.fetch_add(1, Ordering::Relaxed) + 1;
        warn!(
            target: "razor_bridge::telemetry",
            "{} buffer for {} was out of sync with the server and has been reset ({} so far)",
            kind.display_name(),
            uri,
            count
        );
    }
}
