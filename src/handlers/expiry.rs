use crate::checking::constants::{EXPIRY_BUCKET_MINUTES, SUBSCRIPTION_TTL_DAYS};
use crate::checking::notifier::NotificationSender;
use crate::models::service::ServiceKind;
use crate::store::SubscriberStore;
use anyhow::Result;
use chrono::{DateTime, DurationRound, TimeDelta, Utc};
use tracing::{error, info, warn};

/// The five minute bucket holding subscriptions that turn 30 days old now.
///
/// Start is inclusive, end exclusive.
pub fn expiry_window(now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let threshold = now - TimeDelta::days(SUBSCRIPTION_TTL_DAYS);
    let bucket = TimeDelta::minutes(EXPIRY_BUCKET_MINUTES);
    let start = threshold.duration_trunc(bucket).unwrap_or(threshold);
    (start, start + bucket)
}

/// Notifies and deletes every subscription in the current expiry bucket.
///
/// Notification and delete failures are logged and skipped; only a failed
/// lookup fails the sweep. Returns how many subscriptions were expired.
pub async fn sweep_expired(
    store: &dyn SubscriberStore,
    sender: &NotificationSender,
    service: &ServiceKind,
    now: DateTime<Utc>,
) -> Result<usize> {
    let (start, end) = expiry_window(now);
    let expiring = store.expiring(start, end).await?;
    if expiring.is_empty() {
        return Ok(0);
    }
    info!(count = expiring.len(), %start, %end, "expiring subscriptions");

    let title = service.expiration_title();
    let message = service.expiration_message();
    for sub in &expiring {
        if let Err(e) = sender.send(&sub.ntfy_topic, &message, &title).await {
            warn!(topic = %sub.ntfy_topic, error = %e, "failed to send expiration notification");
        }

        match store.remove_by_id(&sub.id).await {
            Ok(()) => info!(id = %sub.id, location = %sub.location, "deleted expired subscription"),
            Err(e) => error!(id = %sub.id, error = %e, "failed to delete subscription"),
        }
    }

    Ok(expiring.len())
}
