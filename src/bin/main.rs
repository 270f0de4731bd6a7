use clap::{Parser, Subcommand};
use log::warn;
use razor_bridge::config::{SettingsEventKind, load_settings};
use razor_bridge::protocol::{UPDATE_CSHARP_BUFFER, UPDATE_HTML_BUFFER, UpdateBufferRequest};
use razor_bridge::{
    BridgeSettings, DocumentManager, LogTelemetryReporter, ProjectionKind, RazorError, RazorResult,
};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use url::Url;

/// Diagnostics for the Razor projection core
#[derive(Parser)]
#[command(name = "razor-bridge")]
#[command(version)]
#[command(about = "Diagnostics for the Razor document projection core")]
struct Cli {
    /// Workspace root used to find razor-bridge.toml
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a JSON-lines log of buffer update notifications and print the projections
    Replay {
        /// File with one `{"method": ..., "params": ...}` object per line
        file: PathBuf,

        /// Leave host documents closed so updates are buffered instead of applied
        #[arg(long)]
        closed: bool,
    },
    /// Print the projection URIs of a Razor file
    VirtualUri {
        /// Path or URI of the Razor file
        path: String,
    },
    /// Print the effective settings as TOML
    Config,
}

#[derive(Deserialize)]
struct ReplayEntry {
    method: String,
    params: serde_json::Value,
}

#[tokio::main]
async fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> RazorResult<()> {
    let settings = settings(cli.root.as_deref());

    match cli.command {
        Commands::Replay { file, closed } => replay(settings, &file, closed).await,
        Commands::VirtualUri { path } => {
            let host = host_url(&path)?;
            let format = &settings.virtual_uri;
            println!("host:   {}", host);
            println!("csharp: {}", format.projection_uri(&host, ProjectionKind::CSharp)?);
            println!("html:   {}", format.projection_uri(&host, ProjectionKind::Html)?);
            Ok(())
        }
        Commands::Config => {
            let text = toml::to_string(&settings.to_layer())
                .map_err(|e| RazorError::config(e.to_string()))?;
            print!("{}", text);
            Ok(())
        }
    }
}

fn settings(root: Option<&Path>) -> BridgeSettings {
    let outcome = load_settings(root, None);
    for event in &outcome.events {
        event.log();
        if event.kind == SettingsEventKind::Warning {
            eprintln!("Warning: {}", event.message);
        }
    }
    outcome.settings
}

fn host_url(path: &str) -> RazorResult<Url> {
    if let Ok(url) = Url::parse(path) {
        return Ok(url);
    }
    let absolute = std::path::absolute(path)?;
    Url::from_file_path(&absolute).map_err(|_| RazorError::invalid_uri(path))
}

async fn replay(settings: BridgeSettings, file: &Path, closed: bool) -> RazorResult<()> {
    let manager = DocumentManager::new(settings, Arc::new(LogTelemetryReporter::new()));
    let contents = tokio::fs::read_to_string(file).await?;

    for (index, line) in contents.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let entry: ReplayEntry = serde_json::from_str(line)?;
        let request: UpdateBufferRequest = match entry.method.as_str() {
            UPDATE_CSHARP_BUFFER | UPDATE_HTML_BUFFER => serde_json::from_value(entry.params)?,
            other => {
                warn!(
                    target: "razor_bridge::replay",
                    "Skipping line {}: unsupported method {}",
                    index + 1,
                    other
                );
                continue;
            }
        };

        if !closed {
            let host = host_url(&request.host_document_file_path)?;
            let is_open = manager
                .find_document(&host)
                .is_some_and(|document| document.is_open());
            if !is_open {
                manager.open_document(&host)?;
            }
        }

        let result = if entry.method == UPDATE_CSHARP_BUFFER {
            manager.update_csharp_buffer(request)
        } else {
            manager.update_html_buffer(request)
        };
        // Stale updates are part of normal traffic
        if let Err(e) = result
            && !e.is_stale_update()
        {
            return Err(e);
        }
    }

    for identity in manager.documents() {
        let Some(document) = manager.find_document(&identity.uri) else {
            continue;
        };
        println!("== {}", identity.uri);
        for kind in [ProjectionKind::CSharp, ProjectionKind::Html] {
            let projection = document.projection(kind);
            println!(
                "-- {} (host version {:?}, projected version {}, pending {})",
                projection.uri(),
                projection.host_document_sync_version(),
                projection.projected_document_sync_version(),
                projection.has_pending_updates()
            );
            println!("{}", projection.content());
        }
    }
    Ok(())
}
