use crate::models::subscription::{LocationTopics, Subscription};
use crate::store::SubscriberStore;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{self, doc};
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::info;

#[derive(Debug, Deserialize, Serialize)]
struct SubscriptionDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<ObjectId>,
    location: String,
    #[serde(rename = "ntfyTopic")]
    ntfy_topic: String,
    #[serde(rename = "createdAt")]
    created_at: bson::DateTime,
}

impl From<SubscriptionDocument> for Subscription {
    fn from(document: SubscriptionDocument) -> Self {
        Subscription {
            id: document.id.map(|id| id.to_hex()).unwrap_or_default(),
            location: document.location,
            ntfy_topic: document.ntfy_topic,
            created_at: DateTime::from_timestamp_millis(document.created_at.timestamp_millis())
                .unwrap_or_default(),
        }
    }
}

fn to_bson(at: DateTime<Utc>) -> bson::DateTime {
    bson::DateTime::from_millis(at.timestamp_millis())
}

pub struct MongoSubscriberStore {
    collection: Collection<SubscriptionDocument>,
}

impl MongoSubscriberStore {
    pub async fn connect(
        uri: &str,
        database: &str,
        collection: &str,
        connect_timeout: Duration,
    ) -> Result<Self> {
        let mut options = ClientOptions::parse(uri)
            .await
            .context("invalid MongoDB connection string")?;
        options.connect_timeout = Some(connect_timeout);
        options.app_name = Some(env!("CARGO_PKG_NAME").to_string());

        let client = Client::with_options(options).context("failed to create MongoDB client")?;
        let database = client.database(database);
        database
            .run_command(doc! { "ping": 1 })
            .await
            .context("failed to reach MongoDB")?;
        info!(database = database.name(), collection, "connected to MongoDB");

        Ok(MongoSubscriberStore {
            collection: database.collection(collection),
        })
    }
}

#[async_trait]
impl SubscriberStore for MongoSubscriberStore {
    async fn location_topics(&self) -> Result<Vec<LocationTopics>> {
        let pipeline = vec![doc! {
            "$group": {
                "_id": "$location",
                "ntfyTopics": { "$push": "$ntfyTopic" },
            }
        }];

        let cursor = self
            .collection
            .aggregate(pipeline)
            .with_type::<LocationTopics>()
            .await
            .context("failed to execute aggregation")?;
        cursor
            .try_collect()
            .await
            .context("failed to decode aggregation results")
    }

    async fn expiring(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<Subscription>> {
        let filter = doc! {
            "createdAt": { "$gte": to_bson(start), "$lt": to_bson(end) }
        };

        let cursor = self
            .collection
            .find(filter)
            .await
            .context("failed to find expiring subscriptions")?;
        let documents: Vec<SubscriptionDocument> = cursor
            .try_collect()
            .await
            .context("failed to decode expiring subscriptions")?;

        Ok(documents.into_iter().map(Subscription::from).collect())
    }

    async fn exists(&self, location: &str, topic: &str) -> Result<bool> {
        let count = self
            .collection
            .count_documents(doc! { "location": location, "ntfyTopic": topic })
            .await
            .context("failed to check existing subscription")?;
        Ok(count > 0)
    }

    async fn insert(&self, location: &str, topic: &str, created_at: DateTime<Utc>) -> Result<()> {
        let document = SubscriptionDocument {
            id: None,
            location: location.to_string(),
            ntfy_topic: topic.to_string(),
            created_at: to_bson(created_at),
        };
        self.collection
            .insert_one(document)
            .await
            .context("failed to insert subscription")?;
        Ok(())
    }

    async fn remove(&self, location: &str, topic: &str) -> Result<bool> {
        let result = self
            .collection
            .delete_one(doc! { "location": location, "ntfyTopic": topic })
            .await
            .context("failed to delete subscription")?;
        Ok(result.deleted_count > 0)
    }

    async fn remove_by_id(&self, id: &str) -> Result<()> {
        let id = ObjectId::parse_str(id).context("invalid subscription id")?;
        self.collection
            .delete_one(doc! { "_id": id })
            .await
            .context("failed to delete subscription")?;
        Ok(())
    }
}
