use serde::{Deserialize, Serialize};

/// An authorized exam location: a geofence center plus radius. Immutable
/// after load; admission tokens map 1:1 onto these.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamCenter {
    pub latitude: f64,
    pub longitude: f64,
    pub radius_meters: f64,
    pub display_name: String,
    /// Emergency escape hatch: skips the geofence check entirely for this
    /// center's token. Every bypass admission is logged.
    #[serde(default)]
    pub bypass_location: bool,
}

/// Configuration shape for one registry entry: an admission token bound to
/// its center.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisteredCenter {
    pub token: String,
    #[serde(flatten)]
    pub center: ExamCenter,
}
