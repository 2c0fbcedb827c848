use anyhow::Context;
use common::logger::{LoggerConfig, init_logger};
use spread_monitor::{
    config::MonitorConfig, monitor::MonitorLoop, notify::PushPlusClient,
    quote::TencentQuoteClient,
};
use tokio::sync::watch;

const DEFAULT_LOG_FILE: &str = "stock_monitor.log";

/// Raises the shutdown flag on Ctrl-C.
fn spawn_interrupt_listener(tx: watch::Sender<bool>) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("interrupt received; stopping after current step");
                let _ = tx.send(true);
            }
            Err(e) => tracing::error!(error = %e, "failed to listen for interrupt"),
        }
    });
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let is_production = std::env::var("APP_ENV").unwrap_or_default() == "production";
    let log_file =
        std::env::var("MONITOR_LOG_FILE").unwrap_or_else(|_| DEFAULT_LOG_FILE.to_string());

    init_logger(
        LoggerConfig::new("spread-monitor")
            .with_json(is_production)
            .with_log_file(log_file),
    );

    let config_path = MonitorConfig::path_from_env();
    let cfg = MonitorConfig::load(&config_path).with_context(|| {
        format!(
            "failed to load {}; configure stock_pairs and pushplus_token",
            config_path.display()
        )
    })?;

    let quotes = TencentQuoteClient::new().context("failed to build quote client")?;
    let notifier = PushPlusClient::new(cfg.token.clone()).context("failed to build notifier")?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    spawn_interrupt_listener(shutdown_tx);

    MonitorLoop::new(&cfg, quotes, notifier).run(shutdown_rx).await;

    Ok(())
}
