//! Concurrent availability checks across every subscribed location.

use crate::checking::checker::{AvailabilityChecker, CheckOutcome};
use crate::checking::constants::MAX_IN_FLIGHT_LOCATIONS;
use crate::error::Result;
use crate::models::service::ServiceKind;
use crate::models::subscription::LocationTopics;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{error, info};

/// Outcome of one location's check, tagged with the location
#[derive(Debug)]
pub struct LocationReport {
    pub location: String,
    pub outcome: Result<CheckOutcome>,
}

#[derive(Debug, Clone)]
pub struct FanOut {
    checker: Arc<AvailabilityChecker>,
    max_in_flight: usize,
}

impl FanOut {
    pub fn new(checker: Arc<AvailabilityChecker>) -> Self {
        FanOut {
            checker,
            max_in_flight: MAX_IN_FLIGHT_LOCATIONS,
        }
    }

    pub fn checker(&self) -> &AvailabilityChecker {
        &self.checker
    }

    /// Checks every location and returns once all of them have finished.
    /// Failures are logged per location and never cancel the others.
    pub async fn run(
        &self,
        service: &ServiceKind,
        groups: Vec<LocationTopics>,
        minimums: &[u32],
    ) -> Vec<LocationReport> {
        let service = service.clone();
        let minimums: Arc<[u32]> = minimums.into();
        let checker = Arc::clone(&self.checker);

        let reports = run_bounded(groups, self.max_in_flight, move |group| {
            let checker = Arc::clone(&checker);
            let service = service.clone();
            let minimums = Arc::clone(&minimums);
            async move {
                checker
                    .check(&service, &group.location, &group.ntfy_topics, &minimums)
                    .await
            }
        })
        .await;

        let failed = reports.iter().filter(|r| r.outcome.is_err()).count();
        info!(locations = reports.len(), failed, "fan-out complete");
        reports
    }
}

/// Runs `check` for every group with at most `max_in_flight` running at once.
///
/// Each task only starts its check after taking a permit, so queued groups
/// wait without touching the network. Dropping the returned future aborts
/// every spawned task.
pub async fn run_bounded<F, Fut>(
    groups: Vec<LocationTopics>,
    max_in_flight: usize,
    check: F,
) -> Vec<LocationReport>
where
    F: Fn(LocationTopics) -> Fut,
    Fut: Future<Output = Result<CheckOutcome>> + Send + 'static,
{
    let permits = Arc::new(Semaphore::new(max_in_flight.max(1)));
    let mut tasks = JoinSet::new();
    let mut locations = HashMap::new();

    for group in groups {
        let location = group.location.clone();
        let permits = Arc::clone(&permits);
        let pending = check(group);

        let task_location = location.clone();
        let handle = tasks.spawn(async move {
            let _permit = permits.acquire_owned().await;
            LocationReport {
                location: task_location,
                outcome: pending.await,
            }
        });
        locations.insert(handle.id(), location);
    }

    let mut reports = Vec::with_capacity(tasks.len());
    while let Some(joined) = tasks.join_next_with_id().await {
        match joined {
            Ok((_, report)) => {
                if let Err(e) = &report.outcome {
                    error!(location = %report.location, error = %e, "failed to check availability");
                }
                reports.push(report);
            }
            Err(e) => {
                let location = locations.get(&e.id()).map(String::as_str).unwrap_or("unknown");
                error!(location, error = %e, "location check task did not complete");
            }
        }
    }

    reports
}
