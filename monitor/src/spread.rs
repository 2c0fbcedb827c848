//! Divergence between the same-day changes of two instruments.

/// Outcome of comparing two change ratios against the alert threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpreadDecision {
    /// `change_a - change_b`; sign follows pair order.
    pub spread: f64,
    pub should_alert: bool,
}

/// Signed spread of `change_a` over `change_b`, alerting when its magnitude
/// reaches `threshold`.
///
/// Inputs must be finite; callers exclude undefined ratios before calling.
pub fn evaluate(change_a: f64, change_b: f64, threshold: f64) -> SpreadDecision {
    debug_assert!(change_a.is_finite() && change_b.is_finite());
    debug_assert!(threshold >= 0.0);

    let spread = change_a - change_b;
    SpreadDecision {
        spread,
        should_alert: spread.abs() >= threshold,
    }
}

/// Ratio rendered as a percentage with two decimals, e.g. `0.0512` -> `5.12%`.
pub fn format_pct(ratio: f64) -> String {
    format!("{:.2}%", ratio * 100.0)
}
