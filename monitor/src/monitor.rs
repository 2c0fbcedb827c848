//! Monitoring loop.
//!
//! Each cycle walks the configured pairs in order:
//! quote A → quote B → change ratios → log line → spread check → optional alert.
//!
//! Failure containment is layered:
//! - a failed or degenerate quote skips its pair for this cycle
//! - a failed alert delivery is logged and the next pair proceeds
//! - anything escaping a cycle is logged and followed by the normal sleep
//!
//! The loop only ends when the shutdown flag is raised. The flag is observed
//! between network calls and during the inter-cycle sleep, never mid-request;
//! once raised, no further request or alert is sent.

use std::panic::AssertUnwindSafe;
use std::time::Duration;

use common::logger::{TraceId, annotate_span, child_span, root_span, warn_if_slow};
use futures::FutureExt;
use tokio::sync::watch;
use tracing::{Instrument, error, info, warn};

use crate::config::MonitorConfig;
use crate::error::CycleError;
use crate::notify::{AlertEvent, Notifier, render_alert};
use crate::quote::{InstrumentCode, Pair, Quote, QuoteSource};
use crate::spread::{evaluate, format_pct};
use crate::time::local_now;

const SLOW_REQUEST: Duration = Duration::from_secs(2);

/// Per-cycle tally, mainly for tests and the cycle summary log.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Pairs whose spread was evaluated.
    pub checked: usize,
    /// Pairs skipped because a quote was unavailable.
    pub skipped: usize,
    pub alerts_sent: usize,
    pub alerts_failed: usize,
    /// Shutdown was observed before the cycle finished its work.
    pub interrupted: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PairOutcome {
    Skipped,
    Quiet,
    Alerted,
    AlertFailed,
    /// Shutdown observed between network calls; nothing further was sent.
    Interrupted,
}

pub struct MonitorLoop<'a, Q, N> {
    config: &'a MonitorConfig,
    quotes: Q,
    notifier: N,
}

impl<'a, Q: QuoteSource, N: Notifier> MonitorLoop<'a, Q, N> {
    pub fn new(config: &'a MonitorConfig, quotes: Q, notifier: N) -> Self {
        Self {
            config,
            quotes,
            notifier,
        }
    }

    /// Runs cycles until `shutdown` becomes `true`.
    ///
    /// The interval is measured from the end of one cycle to the start of the next.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        info!(
            pairs = self.config.pairs.len(),
            interval_secs = self.config.interval.as_secs(),
            threshold = %format_pct(self.config.threshold),
            "monitor started"
        );

        loop {
            if *shutdown.borrow() {
                break;
            }

            match self.guarded_cycle(&shutdown).await {
                Ok(report) if report.interrupted => break,
                Ok(_) => {}
                Err(e) => error!(error = %e, "monitor cycle failed"),
            }

            tokio::select! {
                _ = tokio::time::sleep(self.config.interval) => {}
                _ = shutdown_requested(&mut shutdown) => break,
            }
        }

        info!("monitor stopped");
    }

    /// One cycle with panics converted into [`CycleError`].
    pub async fn guarded_cycle(
        &self,
        shutdown: &watch::Receiver<bool>,
    ) -> Result<CycleReport, CycleError> {
        let trace_id = TraceId::new();
        let span = root_span("cycle", &trace_id);

        AssertUnwindSafe(self.run_cycle(shutdown).instrument(span))
            .catch_unwind()
            .await
            .map_err(|panic| CycleError::Panicked(panic_message(panic.as_ref())))
    }

    /// Processes every configured pair once, in order.
    pub async fn run_cycle(&self, shutdown: &watch::Receiver<bool>) -> CycleReport {
        let mut report = CycleReport::default();

        for pair in &self.config.pairs {
            if *shutdown.borrow() {
                warn!("shutdown requested mid-cycle; remaining pairs not checked");
                report.interrupted = true;
                break;
            }

            let span = child_span("pair");
            annotate_span(&span, &pair.id());

            match self.check_pair(pair, shutdown).instrument(span).await {
                PairOutcome::Skipped => report.skipped += 1,
                PairOutcome::Quiet => report.checked += 1,
                PairOutcome::Alerted => {
                    report.checked += 1;
                    report.alerts_sent += 1;
                }
                PairOutcome::AlertFailed => {
                    report.checked += 1;
                    report.alerts_failed += 1;
                }
                PairOutcome::Interrupted => {
                    warn!("shutdown requested mid-pair; remaining requests not sent");
                    report.interrupted = true;
                    break;
                }
            }
        }

        info!(
            checked = report.checked,
            skipped = report.skipped,
            alerts_sent = report.alerts_sent,
            alerts_failed = report.alerts_failed,
            "cycle complete"
        );

        report
    }

    async fn check_pair(&self, pair: &Pair, shutdown: &watch::Receiver<bool>) -> PairOutcome {
        // Both quotes are requested even if the first fails.
        let a = self.fetch_change(&pair.a).await;
        if *shutdown.borrow() {
            return PairOutcome::Interrupted;
        }
        let b = self.fetch_change(&pair.b).await;
        if *shutdown.borrow() {
            return PairOutcome::Interrupted;
        }

        let (Some((quote_a, change_a)), Some((quote_b, change_b))) = (a, b) else {
            return PairOutcome::Skipped;
        };

        let decision = evaluate(change_a, change_b, self.config.threshold);

        info!(
            "{}({:.2}, {}) vs {}({:.2}, {}), spread: {}",
            pair.a,
            quote_a.latest_price,
            format_pct(change_a),
            pair.b,
            quote_b.latest_price,
            format_pct(change_b),
            format_pct(decision.spread),
        );

        if !decision.should_alert {
            info!(
                spread = %format_pct(decision.spread),
                threshold = %format_pct(self.config.threshold),
                "spread within threshold; no alert"
            );
            return PairOutcome::Quiet;
        }

        let event = AlertEvent {
            pair: pair.clone(),
            price_a: quote_a.latest_price,
            price_b: quote_b.latest_price,
            name_a: quote_a.display_name,
            name_b: quote_b.display_name,
            change_a,
            change_b,
            spread: decision.spread,
            threshold: self.config.threshold,
            timestamp: local_now(),
        };
        let message = render_alert(&event, self.config.img_url.as_deref());

        if *shutdown.borrow() {
            return PairOutcome::Interrupted;
        }

        info!(spread = %format_pct(decision.spread), "spread threshold crossed; sending alert");

        match warn_if_slow("alert_send", SLOW_REQUEST, self.notifier.send(&message)).await {
            Ok(()) => {
                info!("alert delivered");
                PairOutcome::Alerted
            }
            Err(e) => {
                error!(error = %e, "alert delivery failed");
                PairOutcome::AlertFailed
            }
        }
    }

    /// Quote plus its change ratio, or `None` when either is unavailable.
    async fn fetch_change(&self, code: &InstrumentCode) -> Option<(Quote, f64)> {
        let result = warn_if_slow("quote_fetch", SLOW_REQUEST, self.quotes.fetch_quote(code))
            .await
            .and_then(|quote| quote.change_ratio().map(|change| (quote, change)));

        match result {
            Ok(v) => Some(v),
            Err(e) => {
                error!(code = %code, error = %e, "quote unavailable");
                None
            }
        }
    }
}

/// Resolves once shutdown is requested. Never resolves if the sender is gone.
async fn shutdown_requested(rx: &mut watch::Receiver<bool>) {
    if rx.wait_for(|stop| *stop).await.is_err() {
        std::future::pending::<()>().await;
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
