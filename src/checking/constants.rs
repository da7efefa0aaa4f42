use std::time::Duration;

// scheduler api
pub const DEFAULT_SCHEDULER_API_BASE: &str = "https://ttp.cbp.dhs.gov";
pub const SLOTS_PATH: &str = "/schedulerapi/slots";
pub const SLOTS_AS_LOCATIONS_PATH: &str = "/schedulerapi/slots/asLocations";
pub const AS_LOCATIONS_LIMIT: u32 = 5;

// ntfy relay
pub const DEFAULT_NTFY_SERVER: &str = "https://ntfy.sh";

// retry budget shared by probes and notifications
pub const MAX_ATTEMPTS: u32 = 3;
pub const BACKOFF_STEP: Duration = Duration::from_millis(100);

pub const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

// fan-out
pub const MAX_IN_FLIGHT_LOCATIONS: usize = 10;
pub const MULTI_USER_THRESHOLDS: &[u32] = &[1];

// expiry
pub const SUBSCRIPTION_TTL_DAYS: i64 = 30;
pub const EXPIRY_BUCKET_MINUTES: i64 = 5;
