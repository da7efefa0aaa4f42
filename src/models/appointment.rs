use serde::{Deserialize, Serialize};

/// One bookable slot as returned by the scheduler API
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentSlot {
    #[serde(default)]
    pub location_id: i64,
    #[serde(default)]
    pub start_timestamp: String,
    #[serde(default)]
    pub end_timestamp: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub duration: i64,
    #[serde(default)]
    pub remote_ind: bool,
}
