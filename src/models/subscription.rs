use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored interest of one ntfy topic in one location
#[derive(Debug, Clone, PartialEq)]
pub struct Subscription {
    pub id: String,
    pub location: String,
    pub ntfy_topic: String,
    pub created_at: DateTime<Utc>,
}

/// All topics subscribed to a single location
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct LocationTopics {
    #[serde(rename = "_id")]
    pub location: String,
    #[serde(rename = "ntfyTopics")]
    pub ntfy_topics: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct SubscriptionRequest {
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub location: String,
    #[serde(default, rename = "ntfyTopic")]
    pub ntfy_topic: String,
}
