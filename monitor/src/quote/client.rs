use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, instrument};

use crate::quote::parser::parse_quote_line;
use crate::quote::{InstrumentCode, Quote, QuoteError, QuoteSource};

pub const DEFAULT_QUOTE_URL: &str = "http://qt.gtimg.cn/q=";

/// HTTP client for the tilde-delimited real-time quote endpoint.
#[derive(Clone)]
pub struct TencentQuoteClient {
    http: Client,
    base_url: String,
}

impl TencentQuoteClient {
    pub fn new() -> Result<Self, QuoteError> {
        Self::with_base_url(DEFAULT_QUOTE_URL)
    }

    /// `base_url` is prefixed verbatim to the market symbol, e.g. `http://host/q=`.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, QuoteError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(5))
            .pool_idle_timeout(Duration::from_secs(30))
            .tcp_keepalive(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl QuoteSource for TencentQuoteClient {
    #[instrument(skip(self), fields(code = %code), level = "debug")]
    async fn fetch_quote(&self, code: &InstrumentCode) -> Result<Quote, QuoteError> {
        let url = format!("{}{}", self.base_url, code.symbol());

        let resp = self.http.get(&url).send().await?.error_for_status()?;

        // The endpoint serves GBK; reqwest decodes using the response charset.
        let body = resp.text().await?;
        let quote = parse_quote_line(&body)?;

        debug!(
            name = %quote.display_name,
            latest = quote.latest_price,
            prev_close = quote.previous_close,
            "quote fetched"
        );

        Ok(quote)
    }
}
