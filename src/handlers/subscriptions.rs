use crate::handlers::Reply;
use crate::models::subscription::SubscriptionRequest;
use crate::store::SubscriberStore;
use actix_web::http::StatusCode;
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{error, info};

static VALID_NTFY_TOPIC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9_-]+$").expect("ntfy topic pattern is valid")
});

/// Handles a raw subscribe/unsubscribe request body
pub async fn handle_subscription(
    store: &dyn SubscriberStore,
    body: &[u8],
    now: DateTime<Utc>,
) -> Reply {
    if body.is_empty() {
        error!("invalid request: missing body");
        return Reply::error(StatusCode::BAD_REQUEST, "missing request body").with_cors();
    }

    let request: SubscriptionRequest = match serde_json::from_slice(body) {
        Ok(request) => request,
        Err(e) => {
            error!(error = %e, "failed to parse request body");
            return Reply::error(StatusCode::BAD_REQUEST, "invalid request body").with_cors();
        }
    };

    apply(store, &request, now).await.with_cors()
}

async fn apply(store: &dyn SubscriberStore, request: &SubscriptionRequest, now: DateTime<Utc>) -> Reply {
    if request.action.is_empty() || request.location.is_empty() || request.ntfy_topic.is_empty() {
        return Reply::error(StatusCode::BAD_REQUEST, "missing required fields");
    }

    if !VALID_NTFY_TOPIC.is_match(&request.ntfy_topic) {
        return Reply::error(
            StatusCode::BAD_REQUEST,
            "Ntfy Topic must not contain spaces or special characters",
        );
    }

    let location = request.location.as_str();
    let topic = request.ntfy_topic.as_str();

    match request.action.as_str() {
        "subscribe" => {
            match store.exists(location, topic).await {
                Ok(true) => {
                    return Reply::error(StatusCode::BAD_REQUEST, "subscription already exists");
                }
                Ok(false) => {}
                Err(e) => {
                    error!(location, topic, error = ?e, "failed to check existing subscription");
                    return Reply::error(StatusCode::INTERNAL_SERVER_ERROR, "failed to subscribe");
                }
            }

            if let Err(e) = store.insert(location, topic, now).await {
                error!(location, topic, error = ?e, "failed to insert subscription");
                return Reply::error(StatusCode::INTERNAL_SERVER_ERROR, "failed to subscribe");
            }
            info!(location, topic, "added subscription");
            Reply::message(StatusCode::OK, "Subscribed successfully")
        }
        "unsubscribe" => match store.remove(location, topic).await {
            Ok(true) => {
                info!(location, topic, "removed subscription");
                Reply::message(StatusCode::OK, "Unsubscribed successfully")
            }
            Ok(false) => Reply::error(StatusCode::NOT_FOUND, "subscription not found"),
            Err(e) => {
                error!(location, topic, error = ?e, "failed to delete subscription");
                Reply::error(StatusCode::INTERNAL_SERVER_ERROR, "failed to unsubscribe")
            }
        },
        _ => Reply::error(
            StatusCode::BAD_REQUEST,
            "invalid action, use subscribe or unsubscribe",
        ),
    }
}
