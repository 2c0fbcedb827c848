use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("push endpoint returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid response from push endpoint: {0}")]
    InvalidResponse(#[from] serde_json::Error),

    #[error("push rejected with code {code}: {msg}")]
    Rejected { code: i64, msg: String },
}
