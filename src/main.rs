//! Command-line host for the overlay.
//!
//! Drives one overlay instance against a live search peer the way an embedding
//! page would: it mounts the overlay, submits a query, feeds worker outcomes back
//! as events, optionally pages forward with `Next`, and prints what the popup
//! would show.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────┐
//! │   Host (main thread)     │
//! │  ┌────────────────────┐  │
//! │  │ AppState (overlay) │  │  ← events in, actions out
//! │  └────────────────────┘  │
//! │        │ IssueRequest    │
//! │        ▼                 │
//! │  ┌────────────────────┐  │
//! │  │ SearchWorker       │  │  ← one thread per request
//! │  └────────────────────┘  │
//! │        │ SearchOutcome (crossbeam channel)
//! └────────┴─────────────────┘
//! ```
//!
//! # Configuration
//!
//! Settings are layered: the TOML file (`--config`, or `portalsearch.toml` in the
//! platform config directory when present), then command-line flags.
//!
//! ```text
//! portalsearch --url http://localhost:8090 --pages 2 weather
//! ```

#![allow(clippy::multiple_crate_versions)]

use clap::Parser;
use crossbeam_channel::{Receiver, RecvTimeoutError};
use portalsearch::client::{HttpTransport, SearchOutcome, SearchWorker, REQUEST_TIMEOUT_SECS};
use portalsearch::domain::form::{MAXIMUM_RECORDS_FIELD, RESOURCE_FIELD};
use portalsearch::domain::{HostForm, Scope};
use portalsearch::infrastructure::{default_config_file, load_assets, Asset, AssetLoader};
use portalsearch::ui::{render, BodyView};
use portalsearch::{handle_event, initialize, Action, AppState, DialogState, Event, PartialConfig, Result};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "portalsearch", version, about = "Query a YaCy peer through the live-search overlay")]
struct CliArgs {
    /// Query text.
    query: String,

    /// Base URL of the search peer.
    #[arg(short, long, env = "PORTALSEARCH_URL")]
    url: Option<String>,

    /// TOML configuration file.
    #[arg(short, long, value_name = "FILE", env = "PORTALSEARCH_CONFIG")]
    config: Option<PathBuf>,

    /// Search the global index.
    #[arg(short, long)]
    global: bool,

    /// Results per page.
    #[arg(short = 'n', long, default_value_t = 10)]
    maximum_records: u64,

    /// Number of pages to fetch, following `Next` after the first.
    #[arg(short, long, default_value_t = 1)]
    pages: u32,

    /// Print the rendered HTML fragments instead of plain text.
    #[arg(long)]
    html: bool,

    /// Apply every outcome in arrival order instead of only the newest.
    #[arg(long)]
    unfenced: bool,

    /// Tracing filter, e.g. `debug`.
    #[arg(long)]
    trace_level: Option<String>,
}

impl CliArgs {
    fn overrides(&self) -> PartialConfig {
        PartialConfig {
            url: self.url.clone(),
            global: self.global.then_some(true),
            fence_responses: self.unfenced.then_some(false),
            trace_level: self.trace_level.clone(),
            ..PartialConfig::default()
        }
    }

    fn config_file(&self) -> Option<PathBuf> {
        self.config
            .clone()
            .or_else(|| default_config_file().ok().filter(|path| path.exists()))
    }
}

/// Asset injection has no meaning in a terminal; requested assets are only logged.
struct LoggingAssetLoader;

impl AssetLoader for LoggingAssetLoader {
    fn load(&self, asset: &Asset) -> Result<()> {
        tracing::debug!(url = %asset.url, kind = ?asset.kind, "asset requested");
        Ok(())
    }
}

struct Host {
    app: AppState,
    worker: SearchWorker,
    outcomes: Receiver<SearchOutcome>,
    in_flight: usize,
}

impl Host {
    /// Delivers one event and executes the resulting actions.
    fn update(&mut self, event: &Event) -> bool {
        match handle_event(&mut self.app, event) {
            Ok((should_render, actions)) => {
                tracing::debug!(action_count = actions.len(), should_render, "event handled");
                for action in &actions {
                    self.execute_action(action);
                }
                should_render
            }
            Err(e) => {
                tracing::warn!(error = %e, "error handling event");
                false
            }
        }
    }

    fn execute_action(&mut self, action: &Action) {
        match action {
            Action::LoadAssets(manifest) => {
                load_assets(&LoggingAssetLoader, manifest);
            }
            Action::IssueRequest(request) => {
                self.in_flight += 1;
                self.worker.dispatch(request.clone());
            }
            Action::ClearQueryField => tracing::debug!("query field cleared"),
            Action::FocusQueryField => tracing::trace!("query field focused"),
            Action::MountSidePanel(geometry) => tracing::debug!(?geometry, "side panel mounted"),
            Action::MoveSidePanel(geometry) => tracing::trace!(?geometry, "side panel moved"),
            Action::RemoveSidePanel => tracing::debug!("side panel removed"),
            Action::DecorateFavicons { links, .. } => {
                tracing::debug!(count = links.len(), "favicon decoration requested");
            }
        }
    }

    /// Feeds outcomes back until the popup leaves `Loading`.
    fn settle(&mut self) -> Result<()> {
        let patience = Duration::from_secs(REQUEST_TIMEOUT_SECS + 1);
        while self.app.dialog.state() == DialogState::Loading && self.in_flight > 0 {
            match self.outcomes.recv_timeout(patience) {
                Ok(outcome) => {
                    self.in_flight -= 1;
                    self.update(&Event::SearchOutcome(outcome));
                }
                Err(RecvTimeoutError::Timeout) => {
                    return Err(portalsearch::PortalSearchError::Timeout(patience.as_secs()));
                }
                Err(RecvTimeoutError::Disconnected) => {
                    return Err(portalsearch::PortalSearchError::Network("worker channel closed".to_string()));
                }
            }
        }
        Ok(())
    }

    fn print(&self, html: bool) {
        if html {
            let overlay = render(&self.app);
            println!("{}", overlay.button_pane);
            println!("{}", overlay.body);
            return;
        }

        let view = self.app.compute_viewmodel();
        if let Some(pane) = &view.button_pane {
            println!("{}", pane.summary.text());
        }
        match &view.body {
            BodyView::Results(items) => {
                for item in items {
                    println!("\n{}\n  {}\n  {} | {}", item.title, item.link, item.date, item.size);
                }
            }
            BodyView::Error { message, .. } => eprintln!("{message}"),
            BodyView::Empty | BodyView::Loading { .. } => {}
        }
    }
}

fn run(args: &CliArgs) -> Result<ExitCode> {
    let file = match args.config_file() {
        Some(path) => PartialConfig::from_file(&path)?,
        None => PartialConfig::default(),
    };
    let config = file.merge(args.overrides()).resolve()?;

    portalsearch::observability::init_tracing(&config);
    let span = tracing::debug_span!("cli_run", url = %config.url);
    let _guard = span.entered();

    let resource = Scope::from_flag(config.global);
    let form = HostForm::new(config.query_field.as_str())
        .with_field(config.query_field.as_str(), "")
        .with_field(MAXIMUM_RECORDS_FIELD, args.maximum_records.to_string())
        .with_field(RESOURCE_FIELD, resource.as_str());

    let (worker, outcomes) = SearchWorker::new(Arc::new(HttpTransport::new()?));
    let mut host = Host {
        app: initialize(&config, form),
        worker,
        outcomes,
        in_flight: 0,
    };

    host.update(&Event::Mounted);
    host.update(&Event::Submit {
        query: args.query.clone(),
    });

    for page in 0..args.pages.max(1) {
        if page > 0 {
            host.update(&Event::Next);
        }
        host.settle()?;
        host.print(args.html);

        if host.app.dialog.state() == DialogState::Error {
            return Ok(ExitCode::FAILURE);
        }
        if host.app.dialog.state() == DialogState::Closed {
            break;
        }
    }

    host.update(&Event::CloseDialog);
    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    let args = CliArgs::parse();
    match run(&args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("portalsearch: {e}");
            ExitCode::from(2)
        }
    }
}
