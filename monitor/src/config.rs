use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::quote::{InstrumentCode, Pair};

pub const DEFAULT_CONFIG_PATH: &str = "config.json";
pub const DEFAULT_THRESHOLD: f64 = 0.02;
pub const DEFAULT_INTERVAL_SECS: u64 = 60;

/// On-disk shape of `config.json`.
#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    stock_pairs: Vec<Vec<String>>,

    #[serde(default = "default_threshold")]
    threshold: f64,

    #[serde(default = "default_interval")]
    interval: u64,

    #[serde(default)]
    pushplus_token: String,

    #[serde(default)]
    img_url: Option<String>,
}

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

fn default_interval() -> u64 {
    DEFAULT_INTERVAL_SECS
}

/// Validated monitor settings. Loaded once, immutable for the process lifetime.
#[derive(Clone, Debug)]
pub struct MonitorConfig {
    /// Pairs checked every cycle, in this order.
    pub pairs: Vec<Pair>,

    /// PushPlus token used by the notifier.
    pub token: String,

    /// Minimum absolute spread (as a ratio, 0.02 = 2%) that triggers an alert.
    pub threshold: f64,

    /// Sleep between the end of one cycle and the start of the next.
    pub interval: Duration,

    /// Optional image shown at the top of alert messages.
    pub img_url: Option<String>,
}

impl MonitorConfig {
    /// Config path from `MONITOR_CONFIG`, defaulting to `config.json`.
    pub fn path_from_env() -> PathBuf {
        std::env::var("MONITOR_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = serde_json::from_str(raw)?;
        Self::validate(file)
    }

    fn validate(file: ConfigFile) -> Result<Self, ConfigError> {
        if file.stock_pairs.is_empty() {
            return Err(ConfigError::NoPairs);
        }

        let pairs = file
            .stock_pairs
            .into_iter()
            .enumerate()
            .map(|(index, codes)| parse_pair(index, codes))
            .collect::<Result<Vec<_>, _>>()?;

        let token = file.pushplus_token.trim().to_string();
        if token.is_empty() {
            return Err(ConfigError::MissingToken);
        }

        if !file.threshold.is_finite() || file.threshold < 0.0 {
            return Err(ConfigError::InvalidThreshold(file.threshold));
        }

        if file.interval == 0 {
            return Err(ConfigError::InvalidInterval(file.interval));
        }

        let img_url = file
            .img_url
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty());

        Ok(Self {
            pairs,
            token,
            threshold: file.threshold,
            interval: Duration::from_secs(file.interval),
            img_url,
        })
    }
}

fn parse_pair(index: usize, codes: Vec<String>) -> Result<Pair, ConfigError> {
    let [a, b]: [String; 2] = codes.try_into().map_err(|codes: Vec<String>| {
        ConfigError::InvalidPair {
            index,
            reason: format!("expected 2 codes, got {}", codes.len()),
        }
    })?;

    let (a, b) = (InstrumentCode::new(a), InstrumentCode::new(b));
    if a.as_str().is_empty() || b.as_str().is_empty() {
        return Err(ConfigError::InvalidPair {
            index,
            reason: "blank instrument code".into(),
        });
    }

    Ok(Pair::new(a, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn applies_defaults() {
        let cfg = MonitorConfig::from_json(
            r#"{"stock_pairs": [["600000", "000001"]], "pushplus_token": "tok"}"#,
        )
        .unwrap();

        assert_eq!(cfg.pairs.len(), 1);
        assert_eq!(cfg.pairs[0].id(), "600000/000001");
        assert_eq!(cfg.token, "tok");
        assert_eq!(cfg.threshold, DEFAULT_THRESHOLD);
        assert_eq!(cfg.interval, Duration::from_secs(DEFAULT_INTERVAL_SECS));
        assert!(cfg.img_url.is_none());
    }

    #[test]
    fn keeps_pair_order_and_overrides() {
        let cfg = MonitorConfig::from_json(
            r#"{
                "stock_pairs": [["601318", "601628"], ["000858", "600519"]],
                "threshold": 0.05,
                "interval": 30,
                "pushplus_token": "tok",
                "img_url": "https://example.com/a.png"
            }"#,
        )
        .unwrap();

        let ids: Vec<String> = cfg.pairs.iter().map(Pair::id).collect();
        assert_eq!(ids, vec!["601318/601628", "000858/600519"]);
        assert_eq!(cfg.threshold, 0.05);
        assert_eq!(cfg.interval, Duration::from_secs(30));
        assert_eq!(cfg.img_url.as_deref(), Some("https://example.com/a.png"));
    }

    #[test]
    fn empty_pairs_is_fatal() {
        let err = MonitorConfig::from_json(r#"{"stock_pairs": [], "pushplus_token": "tok"}"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::NoPairs));

        let err = MonitorConfig::from_json(r#"{"pushplus_token": "tok"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::NoPairs));
    }

    #[test]
    fn missing_or_blank_token_is_fatal() {
        let err = MonitorConfig::from_json(r#"{"stock_pairs": [["600000", "000001"]]}"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingToken));

        let err = MonitorConfig::from_json(
            r#"{"stock_pairs": [["600000", "000001"]], "pushplus_token": "  "}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingToken));
    }

    #[test]
    fn pair_must_have_two_codes() {
        let err = MonitorConfig::from_json(
            r#"{"stock_pairs": [["600000", "000001"], ["600000"]], "pushplus_token": "tok"}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPair { index: 1, .. }));

        let err = MonitorConfig::from_json(
            r#"{"stock_pairs": [["600000", " "]], "pushplus_token": "tok"}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPair { index: 0, .. }));
    }

    #[test]
    fn rejects_negative_threshold_and_zero_interval() {
        let err = MonitorConfig::from_json(
            r#"{"stock_pairs": [["600000", "000001"]], "pushplus_token": "tok", "threshold": -0.1}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidThreshold(_)));

        let err = MonitorConfig::from_json(
            r#"{"stock_pairs": [["600000", "000001"]], "pushplus_token": "tok", "interval": 0}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidInterval(0)));
    }

    #[test]
    fn malformed_json_is_fatal() {
        let err = MonitorConfig::from_json("{not json").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn blank_img_url_is_absent() {
        let cfg = MonitorConfig::from_json(
            r#"{"stock_pairs": [["600000", "000001"]], "pushplus_token": "tok", "img_url": ""}"#,
        )
        .unwrap();
        assert!(cfg.img_url.is_none());
    }
}
