use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::notify::{DeliveryError, Notifier};

pub const DEFAULT_PUSHPLUS_URL: &str = "http://www.pushplus.plus/send";
pub const ALERT_TITLE: &str = "配对交易阈值差";

/// `code` value PushPlus embeds in the body of an accepted message.
const SUCCESS_CODE: i64 = 200;

#[derive(Debug, Serialize)]
struct PushRequest<'a> {
    token: &'a str,
    title: &'a str,
    content: &'a str,
    template: &'static str,
}

#[derive(Debug, Deserialize)]
struct PushResponse {
    code: i64,
    #[serde(default)]
    msg: Option<String>,
}

/// PushPlus HTML message sender.
#[derive(Clone)]
pub struct PushPlusClient {
    http: Client,
    url: String,
    token: String,
}

impl PushPlusClient {
    pub fn new(token: impl Into<String>) -> Result<Self, DeliveryError> {
        Self::with_url(DEFAULT_PUSHPLUS_URL, token)
    }

    pub fn with_url(url: impl Into<String>, token: impl Into<String>) -> Result<Self, DeliveryError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(5))
            .build()?;

        Ok(Self {
            http,
            url: url.into(),
            token: token.into(),
        })
    }
}

#[async_trait]
impl Notifier for PushPlusClient {
    #[instrument(skip_all, level = "debug")]
    async fn send(&self, content: &str) -> Result<(), DeliveryError> {
        let req = PushRequest {
            token: &self.token,
            title: ALERT_TITLE,
            content,
            template: "html",
        };

        let resp = self.http.post(&self.url).json(&req).send().await?;
        let status = resp.status();
        let body = resp.text().await?;

        debug!(status = status.as_u16(), body = %body, "pushplus response");

        if !status.is_success() {
            return Err(DeliveryError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: PushResponse = serde_json::from_str(&body)?;
        if parsed.code != SUCCESS_CODE {
            return Err(DeliveryError::Rejected {
                code: parsed.code,
                msg: parsed.msg.unwrap_or_default(),
            });
        }

        Ok(())
    }
}
