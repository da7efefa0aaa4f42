use crate::checking::notifier::NotificationSender;
use crate::checking::prober::{Availability, AvailabilityProber};
use crate::error::{CheckError, Result};
use crate::models::service::ServiceKind;
use tracing::{error, info, warn};

/// Result of checking one location against its thresholds
#[derive(Debug, Clone, PartialEq)]
pub enum CheckOutcome {
    /// A threshold was satisfied and its topics were notified
    Notified {
        minimum: u32,
        start_timestamp: String,
        delivered: usize,
        failed: usize,
    },
    NothingAvailable,
}

pub fn availability_message(
    service: &ServiceKind,
    location: &str,
    start_timestamp: &str,
    minimum: u32,
) -> String {
    format!(
        "{} appointment available at {} on {} (minimum {} slots)",
        service.name(),
        location,
        start_timestamp,
        minimum
    )
}

/// Probes a location threshold by threshold and notifies on the first hit
#[derive(Debug, Clone)]
pub struct AvailabilityChecker {
    prober: AvailabilityProber,
    sender: NotificationSender,
}

impl AvailabilityChecker {
    pub fn new(prober: AvailabilityProber, sender: NotificationSender) -> Self {
        AvailabilityChecker { prober, sender }
    }

    pub fn sender(&self) -> &NotificationSender {
        &self.sender
    }

    /// Thresholds are tried in order and the first available one wins. A
    /// failed probe moves on to the next threshold; its error is only
    /// returned when no threshold turned up a slot.
    pub async fn check(
        &self,
        service: &ServiceKind,
        location: &str,
        topics: &[String],
        minimums: &[u32],
    ) -> Result<CheckOutcome> {
        let mut last_err: Option<CheckError> = None;

        for &minimum in minimums {
            match self.prober.probe(service, location, minimum).await {
                Ok(Availability::Available(slot)) => {
                    let message =
                        availability_message(service, location, &slot.start_timestamp, minimum);
                    let title = service.notification_title();
                    info!(
                        location,
                        minimum,
                        location_id = slot.location_id,
                        start = %slot.start_timestamp,
                        end = %slot.end_timestamp,
                        duration = slot.duration,
                        remote = slot.remote_ind,
                        "appointment found"
                    );
                    let (delivered, failed) = self.notify_all(topics, &message, &title).await;

                    return Ok(CheckOutcome::Notified {
                        minimum,
                        start_timestamp: slot.start_timestamp,
                        delivered,
                        failed,
                    });
                }
                Ok(Availability::NotAvailable) => {}
                Err(e) => {
                    error!(location, minimum, error = %e, "failed to check minimum");
                    last_err = Some(e);
                }
            }
        }

        match last_err {
            Some(e) => Err(e),
            None => Ok(CheckOutcome::NothingAvailable),
        }
    }

    async fn notify_all(&self, topics: &[String], message: &str, title: &str) -> (usize, usize) {
        let mut delivered = 0;
        let mut failed = 0;
        for topic in topics {
            match self.sender.send(topic, message, title).await {
                Ok(()) => delivered += 1,
                Err(e) => {
                    warn!(topic = %topic, error = %e, "giving up on notification");
                    failed += 1;
                }
            }
        }
        (delivered, failed)
    }
}
