use crate::checking::checker::{AvailabilityChecker, CheckOutcome};
use crate::checking::constants::MULTI_USER_THRESHOLDS;
use crate::checking::fanout::FanOut;
use crate::config::PersonalConfig;
use crate::handlers::Reply;
use crate::handlers::expiry::sweep_expired;
use crate::models::service::ServiceKind;
use crate::store::SubscriberStore;
use actix_web::http::StatusCode;
use chrono::{DateTime, Utc};
use tracing::{error, info};

/// Checks the single configured location against its thresholds
pub async fn personal_tick(checker: &AvailabilityChecker, config: &PersonalConfig) -> Reply {
    let topics = [config.ntfy_topic.clone()];

    match checker
        .check(
            &config.service,
            &config.location_id,
            &topics,
            &config.minimum_slots,
        )
        .await
    {
        Ok(CheckOutcome::Notified {
            minimum,
            start_timestamp,
            delivered,
            failed,
        }) => {
            info!(
                location = %config.location_id,
                minimum,
                start = %start_timestamp,
                delivered,
                failed,
                "personal mode check completed"
            );
            Reply::message(StatusCode::OK, "personal mode check completed")
        }
        Ok(CheckOutcome::NothingAvailable) => {
            info!(location = %config.location_id, "no appointments available");
            Reply::message(StatusCode::OK, "personal mode check completed")
        }
        Err(e) => {
            error!(
                location = %config.location_id,
                minimums = ?config.minimum_slots,
                error = %e,
                "failed to check availability in personal mode"
            );
            Reply::error(StatusCode::INTERNAL_SERVER_ERROR, "failed to check availability")
        }
    }
}

/// Expires old subscriptions, then checks every subscribed location.
///
/// Per-location failures stay inside the fan-out; only store failures
/// fail the tick.
pub async fn multi_user_tick(
    store: &dyn SubscriberStore,
    fan_out: &FanOut,
    service: &ServiceKind,
    now: DateTime<Utc>,
) -> Reply {
    if let Err(e) = sweep_expired(store, fan_out.checker().sender(), service, now).await {
        error!(error = ?e, "failed to handle expiring subscriptions");
        return Reply::error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "failed to handle expiring subscriptions",
        );
    }

    let groups = match store.location_topics().await {
        Ok(groups) => groups,
        Err(e) => {
            error!(error = ?e, "failed to load subscriptions");
            return Reply::error(StatusCode::INTERNAL_SERVER_ERROR, "failed to load subscriptions");
        }
    };

    fan_out.run(service, groups, MULTI_USER_THRESHOLDS).await;
    Reply::message(StatusCode::OK, "scheduled check processed")
}
