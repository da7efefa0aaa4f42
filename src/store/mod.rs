pub mod mongo;

#[cfg(test)]
pub mod memory;

use crate::models::subscription::{LocationTopics, Subscription};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Persistence for subscriber interest, keyed by (location, topic)
#[async_trait]
pub trait SubscriberStore: Send + Sync {
    /// Every subscribed location with all of its topics
    async fn location_topics(&self) -> Result<Vec<LocationTopics>>;

    /// Subscriptions created in `[start, end)`
    async fn expiring(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<Subscription>>;

    async fn exists(&self, location: &str, topic: &str) -> Result<bool>;

    async fn insert(&self, location: &str, topic: &str, created_at: DateTime<Utc>) -> Result<()>;

    /// Returns false when nothing matched
    async fn remove(&self, location: &str, topic: &str) -> Result<bool>;

    async fn remove_by_id(&self, id: &str) -> Result<()>;
}
