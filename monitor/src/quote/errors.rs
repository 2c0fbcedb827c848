use thiserror::Error;

/// Reasons a quote is unavailable for one instrument in the current cycle.
#[derive(Error, Debug)]
pub enum QuoteError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("malformed quote line: expected at least 5 fields, got {0}")]
    Malformed(usize),

    #[error("invalid number in {field}: {value:?}")]
    InvalidNumber { field: &'static str, value: String },

    #[error("previous close is zero")]
    ZeroPreviousClose,
}
