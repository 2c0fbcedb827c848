pub mod errors;
pub mod pushplus;
pub mod render;

use async_trait::async_trait;

pub use errors::DeliveryError;
pub use pushplus::PushPlusClient;
pub use render::{AlertEvent, render_alert};

/// Push channel for rendered alert messages.
///
/// A failed delivery is reported once and never retried by the caller.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, content: &str) -> Result<(), DeliveryError>;
}
