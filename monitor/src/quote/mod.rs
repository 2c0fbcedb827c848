pub mod client;
pub mod errors;
pub mod parser;
pub mod types;

use async_trait::async_trait;

pub use client::TencentQuoteClient;
pub use errors::QuoteError;
pub use types::*;

/// Source of the latest quote for a single instrument.
#[async_trait]
pub trait QuoteSource: Send + Sync {
    async fn fetch_quote(&self, code: &InstrumentCode) -> Result<Quote, QuoteError>;
}
