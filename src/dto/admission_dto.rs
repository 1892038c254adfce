use serde::{Deserialize, Serialize};
use validator::Validate;

/// Coordinates are optional so bypass centers can admit a candidate whose
/// device produced no fix at all; non-bypass centers reject the absence.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AdmissionCheckRequest {
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdmissionCheckResponse {
    pub authorized: bool,
    pub distance_meters: Option<i64>,
    pub center: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
