use crate::checking::checker::AvailabilityChecker;
use crate::checking::fanout::FanOut;
use crate::checking::notifier::NotificationSender;
use crate::checking::prober::AvailabilityProber;
use crate::config::{Config, Mode, PersonalConfig};
use crate::handlers::Reply;
use crate::handlers::check::{multi_user_tick, personal_tick};
use crate::handlers::subscriptions::handle_subscription;
use crate::models::service::ServiceKind;
use crate::store::SubscriberStore;
use crate::store::mongo::MongoSubscriberStore;
use actix_web::http::StatusCode;
use anyhow::{Context, Result};
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{error, info};

/// What triggered an invocation
#[derive(Debug, Clone)]
pub enum Invocation {
    TimerTick,
    Preflight,
    Subscription(Vec<u8>),
}

pub enum Engine {
    Personal {
        checker: AvailabilityChecker,
        config: PersonalConfig,
    },
    MultiUser {
        store: Arc<dyn SubscriberStore>,
        fan_out: FanOut,
        service: ServiceKind,
    },
}

/// Routes invocations to the flow selected by the configured mode
pub struct ModeRouter {
    engine: Engine,
    invocation_timeout: Duration,
    cors_allowed_origin: String,
}

impl ModeRouter {
    pub fn new(engine: Engine, invocation_timeout: Duration) -> Self {
        ModeRouter {
            engine,
            invocation_timeout,
            cors_allowed_origin: "*".to_string(),
        }
    }

    pub fn with_cors_origin(mut self, origin: impl Into<String>) -> Self {
        self.cors_allowed_origin = origin.into();
        self
    }

    /// Builds the engine for the configured mode, connecting to MongoDB
    /// only in multi-user mode.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()
            .context("failed to build HTTP client")?;
        let checker = AvailabilityChecker::new(
            AvailabilityProber::new(client.clone(), config.scheduler_api_base.clone()),
            NotificationSender::new(client, config.ntfy_server.clone()),
        );

        let engine = match &config.mode {
            Mode::Personal(personal) => {
                info!("running in personal mode, no database connection needed");
                Engine::Personal {
                    checker,
                    config: personal.clone(),
                }
            }
            Mode::MultiUser(multi_user) => {
                let store = MongoSubscriberStore::connect(
                    &multi_user.mongodb_uri,
                    &multi_user.database,
                    &multi_user.collection,
                    config.http_timeout,
                )
                .await?;
                Engine::MultiUser {
                    store: Arc::new(store),
                    fan_out: FanOut::new(Arc::new(checker)),
                    service: multi_user.service.clone(),
                }
            }
        };

        Ok(ModeRouter::new(engine, config.invocation_timeout)
            .with_cors_origin(config.cors_allowed_origin.clone()))
    }

    pub fn cors_allowed_origin(&self) -> &str {
        &self.cors_allowed_origin
    }

    pub async fn dispatch(&self, invocation: Invocation) -> Reply {
        match (&self.engine, invocation) {
            (_, Invocation::TimerTick) => self.tick().await,
            (Engine::Personal { .. }, _) => Reply::error(
                StatusCode::BAD_REQUEST,
                "personal mode only handles scheduled events",
            ),
            (Engine::MultiUser { .. }, Invocation::Preflight) => Reply::preflight(),
            (Engine::MultiUser { store, .. }, Invocation::Subscription(body)) => {
                handle_subscription(store.as_ref(), &body, Utc::now()).await
            }
        }
    }

    /// Runs one timer tick under the invocation deadline. Hitting the
    /// deadline drops the tick, which aborts every in-flight check.
    async fn tick(&self) -> Reply {
        let run = async {
            match &self.engine {
                Engine::Personal { checker, config } => personal_tick(checker, config).await,
                Engine::MultiUser {
                    store,
                    fan_out,
                    service,
                } => multi_user_tick(store.as_ref(), fan_out, service, Utc::now()).await,
            }
        };

        match timeout(self.invocation_timeout, run).await {
            Ok(reply) => reply,
            Err(_) => {
                error!(timeout = ?self.invocation_timeout, "invocation deadline exceeded");
                Reply::error(StatusCode::INTERNAL_SERVER_ERROR, "invocation deadline exceeded")
            }
        }
    }
}
