use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use once_cell::sync::OnceCell;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

static LOGGER_INIT: OnceCell<()> = OnceCell::new();

#[derive(Clone, Debug)]
pub struct LoggerConfig {
    pub service_name: &'static str,

    /// Emit console output as JSON lines instead of human-readable text.
    pub json: bool,

    /// Append-only log file. `None` keeps output on the console only.
    pub log_file: Option<PathBuf>,
}

impl LoggerConfig {
    pub fn new(service_name: &'static str) -> Self {
        Self {
            service_name,
            json: false,
            log_file: None,
        }
    }

    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    pub fn with_log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_file = Some(path.into());
        self
    }
}

/// Installs the process-wide subscriber. Subsequent calls are no-ops.
///
/// Layers:
/// - `RUST_LOG` filter, falling back to `info`
/// - console (pretty or JSON)
/// - optional append-only file sink without ANSI colours
pub fn init_logger(cfg: LoggerConfig) {
    LOGGER_INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        let mut file_error = None;
        let file = cfg.log_file.as_ref().and_then(|path| {
            match OpenOptions::new().create(true).append(true).open(path) {
                Ok(f) => Some(f),
                Err(e) => {
                    file_error = Some((path.clone(), e));
                    None
                }
            }
        });

        let console_json = cfg.json.then(|| fmt::layer().json().with_target(true));
        let console_text = (!cfg.json).then(|| fmt::layer().with_target(true));
        let file_layer = file.map(|f| {
            fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_writer(Mutex::new(f))
        });

        // Another subscriber may already be installed (e.g. by a test harness).
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(console_json)
            .with(console_text)
            .with(file_layer)
            .try_init();

        if let Some((path, e)) = file_error {
            tracing::warn!(path = %path.display(), error = %e, "log file unavailable; console only");
        }

        tracing::info!(service = cfg.service_name, "logger initialized");
    });
}
