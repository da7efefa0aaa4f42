use crate::checking::constants::{AS_LOCATIONS_LIMIT, SLOTS_AS_LOCATIONS_PATH, SLOTS_PATH};
use crate::checking::retry::RetryPolicy;
use crate::error::{CheckError, Result};
use crate::models::appointment::AppointmentSlot;
use crate::models::service::ServiceKind;
use tracing::debug;

/// What a single probe found
#[derive(Debug, Clone, PartialEq)]
pub enum Availability {
    /// The first returned slot is active
    Available(AppointmentSlot),
    NotAvailable,
}

/// Builds the scheduler API URL for one probe.
///
/// NEXUS without a location asks the `asLocations` endpoint; every other
/// combination, unknown service names included, uses the Global Entry shape.
pub fn slots_url(base: &str, service: &ServiceKind, location: &str, minimum: u32) -> String {
    let base = base.trim_end_matches('/');
    match service {
        ServiceKind::Nexus if location.is_empty() => format!(
            "{base}{SLOTS_AS_LOCATIONS_PATH}?minimum={minimum}&limit={AS_LOCATIONS_LIMIT}&serviceName=NEXUS"
        ),
        _ => format!(
            "{base}{SLOTS_PATH}?orderBy=soonest&limit=1&locationId={location}&minimum={minimum}"
        ),
    }
}

/// Queries the scheduler API for one (location, threshold) pair
#[derive(Debug, Clone)]
pub struct AvailabilityProber {
    client: reqwest::Client,
    api_base: String,
    retry: RetryPolicy,
}

impl AvailabilityProber {
    pub fn new(client: reqwest::Client, api_base: impl Into<String>) -> Self {
        AvailabilityProber {
            client,
            api_base: api_base.into(),
            retry: RetryPolicy::default(),
        }
    }

    pub async fn probe(
        &self,
        service: &ServiceKind,
        location: &str,
        minimum: u32,
    ) -> Result<Availability> {
        let url = slots_url(&self.api_base, service, location, minimum);

        // a non-success status from the scheduler API is never retried
        let response = self
            .retry
            .send("appointment slots", || self.client.get(&url), |_| false)
            .await?;

        let body = response.bytes().await.map_err(CheckError::Body)?;
        let slots: Vec<AppointmentSlot> = serde_json::from_slice(&body)?;
        debug!(location, minimum, slots = slots.len(), "decoded appointment slots");

        // only the soonest slot is consulted
        match slots.into_iter().next() {
            Some(slot) if slot.active => Ok(Availability::Available(slot)),
            _ => Ok(Availability::NotAvailable),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn prober(server: &MockServer, timeout: Duration) -> AvailabilityProber {
        let client = reqwest::Client::builder().timeout(timeout).build().unwrap();
        AvailabilityProber::new(client, server.uri())
    }

    #[test]
    fn global_entry_url_shape() {
        assert_eq!(
            slots_url("https://ttp.cbp.dhs.gov", &ServiceKind::GlobalEntry, "5300", 2),
            "https://ttp.cbp.dhs.gov/schedulerapi/slots?orderBy=soonest&limit=1&locationId=5300&minimum=2"
        );
    }

    #[test]
    fn nexus_url_shapes() {
        assert_eq!(
            slots_url("https://ttp.cbp.dhs.gov", &ServiceKind::Nexus, "5020", 1),
            "https://ttp.cbp.dhs.gov/schedulerapi/slots?orderBy=soonest&limit=1&locationId=5020&minimum=1"
        );
        assert_eq!(
            slots_url("https://ttp.cbp.dhs.gov/", &ServiceKind::Nexus, "", 3),
            "https://ttp.cbp.dhs.gov/schedulerapi/slots/asLocations?minimum=3&limit=5&serviceName=NEXUS"
        );
    }

    #[test]
    fn unset_and_unknown_services_fall_back_to_default_shape() {
        let default = slots_url("http://api", &ServiceKind::GlobalEntry, "JFK", 1);
        for name in ["", "SENTRI"] {
            let service = ServiceKind::from_name(name);
            assert_eq!(slots_url("http://api", &service, "JFK", 1), default);
        }
        // no location still uses the location-scoped shape outside NEXUS
        assert_eq!(
            slots_url("http://api", &ServiceKind::from_name(""), "", 1),
            "http://api/schedulerapi/slots?orderBy=soonest&limit=1&locationId=&minimum=1"
        );
    }

    #[test]
    fn url_is_a_pure_function_of_inputs() {
        for name in ["Global Entry", "NEXUS", "", "unrecognized"] {
            let service = ServiceKind::from_name(name);
            for location in ["", "5300"] {
                for minimum in [1, 2, 3] {
                    assert_eq!(
                        slots_url("http://api", &service, location, minimum),
                        slots_url("http://api", &service, location, minimum)
                    );
                }
            }
        }
    }

    #[tokio::test]
    async fn active_first_slot_is_available() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/schedulerapi/slots"))
            .and(query_param("locationId", "5300"))
            .and(query_param("minimum", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"locationId": 5300, "startTimestamp": "2025-05-04T10:00", "endTimestamp": "2025-05-04T10:15", "active": true, "duration": 15, "remoteInd": false}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let result = prober(&server, Duration::from_secs(2))
            .probe(&ServiceKind::GlobalEntry, "5300", 1)
            .await
            .unwrap();

        match result {
            Availability::Available(slot) => {
                assert_eq!(slot.location_id, 5300);
                assert_eq!(slot.start_timestamp, "2025-05-04T10:00");
                assert_eq!(slot.duration, 15);
            }
            other => panic!("expected availability, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_or_inactive_is_not_available() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("locationId", "empty"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(query_param("locationId", "inactive"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"locationId": 1, "startTimestamp": "2025-05-04T10:00", "active": false},
                {"locationId": 1, "startTimestamp": "2025-05-05T10:00", "active": true}
            ])))
            .mount(&server)
            .await;

        let prober = prober(&server, Duration::from_secs(2));
        for location in ["empty", "inactive"] {
            let result = prober
                .probe(&ServiceKind::GlobalEntry, location, 1)
                .await
                .unwrap();
            assert_eq!(result, Availability::NotAvailable, "location {location}");
        }
    }

    #[tokio::test]
    async fn server_error_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let err = prober(&server, Duration::from_secs(2))
            .probe(&ServiceKind::GlobalEntry, "5300", 1)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("500"), "{err}");
    }

    #[tokio::test]
    async fn malformed_body_is_a_decode_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
            .expect(1)
            .mount(&server)
            .await;

        let err = prober(&server, Duration::from_secs(2))
            .probe(&ServiceKind::GlobalEntry, "5300", 1)
            .await
            .unwrap_err();

        assert!(matches!(err, CheckError::Decode(_)));
    }

    #[tokio::test]
    async fn two_timeouts_then_success_is_available() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([]))
                    .set_delay(Duration::from_millis(600)),
            )
            .up_to_n_times(2)
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"locationId": 5300, "startTimestamp": "2025-05-04T10:00", "active": true}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let result = prober(&server, Duration::from_millis(200))
            .probe(&ServiceKind::GlobalEntry, "5300", 1)
            .await
            .unwrap();

        assert!(matches!(result, Availability::Available(_)));
    }

    #[tokio::test]
    async fn three_timeouts_surface_attempt_count() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(600)))
            .expect(3)
            .mount(&server)
            .await;

        let err = prober(&server, Duration::from_millis(200))
            .probe(&ServiceKind::GlobalEntry, "5300", 1)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("3 attempts"), "{err}");
    }
}
