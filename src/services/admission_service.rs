use crate::error::{Error, Result};
use crate::models::exam_center::{ExamCenter, RegisteredCenter};
use crate::utils::geo;
use std::collections::HashMap;
use std::sync::Arc;

/// Immutable token → center map, built once at startup from configuration
/// and injected into the handlers that need it.
pub struct CenterRegistry {
    centers: HashMap<String, ExamCenter>,
}

impl CenterRegistry {
    /// With no configured centers the registry falls back to a single
    /// built-in center. Fail-open by design for operational continuity;
    /// logged loudly so a production deployment can't miss it.
    pub fn from_config(configured: &[RegisteredCenter]) -> Self {
        let mut centers = HashMap::new();

        if configured.is_empty() {
            tracing::warn!(
                "no exam centers configured; falling back to the built-in default center"
            );
            centers.insert(
                "ExamCenter1".to_string(),
                ExamCenter {
                    latitude: 22.3151,
                    longitude: 73.1444,
                    radius_meters: 300.0,
                    display_name: "Main Examination Center".to_string(),
                    bypass_location: false,
                },
            );
        } else {
            for entry in configured {
                centers.insert(entry.token.clone(), entry.center.clone());
            }
        }

        Self { centers }
    }

    pub fn resolve(&self, token: &str) -> Option<&ExamCenter> {
        self.centers.get(token)
    }
}

#[derive(Debug, Clone)]
pub struct AdmissionDecision {
    pub authorized: bool,
    /// Nearest-meter distance to the center; absent on bypass admissions.
    pub distance_meters: Option<i64>,
    pub center_name: String,
}

/// Gates access to the exam surface: resolves the admission token and
/// evaluates the geofence. Gate failures never touch session state.
#[derive(Clone)]
pub struct AdmissionService {
    registry: Arc<CenterRegistry>,
}

impl AdmissionService {
    pub fn new(configured: &[RegisteredCenter]) -> Self {
        Self {
            registry: Arc::new(CenterRegistry::from_config(configured)),
        }
    }

    pub fn resolve(&self, token: &str) -> Result<ExamCenter> {
        self.registry
            .resolve(token)
            .cloned()
            .ok_or_else(|| Error::NotFound("Unknown admission token".to_string()))
    }

    /// Decides presence for `token`. A `bypass_location` center admits
    /// regardless of coordinates (including absent ones) and the admission
    /// is audit-logged with the token and whatever identity was presented.
    pub fn check(
        &self,
        token: &str,
        coordinates: Option<(f64, f64)>,
        identity: Option<&str>,
    ) -> Result<AdmissionDecision> {
        let center = self.resolve(token)?;

        if center.bypass_location {
            tracing::warn!(
                token,
                candidate = identity.unwrap_or("unknown"),
                center = %center.display_name,
                "admission granted via location bypass"
            );
            return Ok(AdmissionDecision {
                authorized: true,
                distance_meters: None,
                center_name: center.display_name,
            });
        }

        let (latitude, longitude) = coordinates.ok_or_else(|| {
            Error::BadRequest("Location is required for this exam center".to_string())
        })?;
        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(Error::BadRequest("Coordinates must be finite".to_string()));
        }

        let check = geo::within_radius(
            latitude,
            longitude,
            center.latitude,
            center.longitude,
            center.radius_meters,
        );

        if !check.within {
            tracing::info!(
                token,
                distance_meters = check.distance_meters,
                radius_meters = center.radius_meters,
                "admission denied outside geofence"
            );
        }

        Ok(AdmissionDecision {
            authorized: check.within,
            distance_meters: Some(check.distance_meters),
            center_name: center.display_name,
        })
    }
}
