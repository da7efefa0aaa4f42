use crate::models::subscription::{LocationTopics, Subscription};
use crate::store::SubscriberStore;
use anyhow::{Result, bail};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Store kept in a vector, for exercising handlers without MongoDB
#[derive(Default)]
pub struct MemoryStore {
    subscriptions: Mutex<Vec<Subscription>>,
    next_id: AtomicUsize,
    failing: AtomicBool,
}

impl MemoryStore {
    pub fn with(subscriptions: Vec<Subscription>) -> Self {
        let store = MemoryStore::default();
        store.next_id.store(subscriptions.len(), Ordering::SeqCst);
        *store.subscriptions.lock().unwrap() = subscriptions;
        store
    }

    pub fn fail_queries(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    pub fn snapshot(&self) -> Vec<Subscription> {
        self.subscriptions.lock().unwrap().clone()
    }

    fn check_available(&self) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            bail!("store unavailable");
        }
        Ok(())
    }
}

pub fn subscription(id: &str, location: &str, topic: &str, created_at: DateTime<Utc>) -> Subscription {
    Subscription {
        id: id.to_string(),
        location: location.to_string(),
        ntfy_topic: topic.to_string(),
        created_at,
    }
}

#[async_trait]
impl SubscriberStore for MemoryStore {
    async fn location_topics(&self) -> Result<Vec<LocationTopics>> {
        self.check_available()?;
        let mut groups: Vec<LocationTopics> = Vec::new();
        for sub in self.subscriptions.lock().unwrap().iter() {
            match groups.iter_mut().find(|g| g.location == sub.location) {
                Some(group) => group.ntfy_topics.push(sub.ntfy_topic.clone()),
                None => groups.push(LocationTopics {
                    location: sub.location.clone(),
                    ntfy_topics: vec![sub.ntfy_topic.clone()],
                }),
            }
        }
        Ok(groups)
    }

    async fn expiring(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<Subscription>> {
        self.check_available()?;
        Ok(self
            .subscriptions
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.created_at >= start && s.created_at < end)
            .cloned()
            .collect())
    }

    async fn exists(&self, location: &str, topic: &str) -> Result<bool> {
        self.check_available()?;
        Ok(self
            .subscriptions
            .lock()
            .unwrap()
            .iter()
            .any(|s| s.location == location && s.ntfy_topic == topic))
    }

    async fn insert(&self, location: &str, topic: &str, created_at: DateTime<Utc>) -> Result<()> {
        self.check_available()?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst).to_string();
        self.subscriptions
            .lock()
            .unwrap()
            .push(subscription(&id, location, topic, created_at));
        Ok(())
    }

    async fn remove(&self, location: &str, topic: &str) -> Result<bool> {
        self.check_available()?;
        let mut subscriptions = self.subscriptions.lock().unwrap();
        match subscriptions
            .iter()
            .position(|s| s.location == location && s.ntfy_topic == topic)
        {
            Some(index) => {
                subscriptions.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn remove_by_id(&self, id: &str) -> Result<()> {
        self.check_available()?;
        self.subscriptions.lock().unwrap().retain(|s| s.id != id);
        Ok(())
    }
}
