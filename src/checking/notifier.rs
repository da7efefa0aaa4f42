use crate::checking::retry::RetryPolicy;
use crate::error::Result;
use crate::models::notification::NotificationPayload;
use tracing::info;

/// Posts notifications to an ntfy relay.
///
/// Delivery means the relay accepted the message; nothing confirms that a
/// subscriber actually saw it.
#[derive(Debug, Clone)]
pub struct NotificationSender {
    client: reqwest::Client,
    server: String,
    retry: RetryPolicy,
}

impl NotificationSender {
    pub fn new(client: reqwest::Client, server: impl Into<String>) -> Self {
        NotificationSender {
            client,
            server: server.into(),
            retry: RetryPolicy::default(),
        }
    }

    pub async fn send(&self, topic: &str, message: &str, title: &str) -> Result<()> {
        let payload = NotificationPayload {
            topic,
            message,
            title,
        };

        // relay errors are usually transient, so every status is retried
        self.retry
            .send(
                "ntfy notification",
                || self.client.post(&self.server).json(&payload),
                |_| true,
            )
            .await?;

        info!(topic, "sent notification");
        Ok(())
    }
}
