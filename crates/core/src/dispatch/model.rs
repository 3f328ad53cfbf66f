//! Dispatch cases.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::facilities::FacilityId;
use crate::fleet::VehicleId;
use crate::geo::LngLat;

/// Stable case identifier assigned by the dispatch service.
pub type CaseId = i64;

/// Lifecycle status of a dispatch case.
///
/// Only [`Closed`](CaseStatus::Closed) is terminal: closed cases disappear
/// from live tracking. Completed and canceled cases remain listed (and keep
/// their route drawn while geometry is present) until the service closes
/// them. Statuses this build does not know deserialize to `Unknown` rather
/// than failing the whole snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CaseStatus {
    Open,
    Enroute,
    Completed,
    Canceled,
    Closed,
    #[serde(other)]
    Unknown,
}

impl CaseStatus {
    /// True when the case is excluded from live tracking.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Closed)
    }
}

impl std::fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "OPEN"),
            Self::Enroute => write!(f, "ENROUTE"),
            Self::Completed => write!(f, "COMPLETED"),
            Self::Canceled => write!(f, "CANCELED"),
            Self::Closed => write!(f, "CLOSED"),
            Self::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// A dispatch case as reported by the snapshot endpoint.
///
/// Cases are snapshot-only: the push channel never mutates them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Case {
    pub id: CaseId,
    /// Incident location.
    pub latitude: f64,
    pub longitude: f64,
    /// Capability requested for this case.
    pub specialization: String,
    pub status: CaseStatus,
    #[serde(default)]
    pub assigned_vehicle_id: Option<VehicleId>,
    #[serde(default)]
    pub assigned_facility_id: Option<FacilityId>,
    /// Planned travel time in seconds.
    #[serde(default)]
    pub estimated_duration: Option<f64>,
    /// Planned travel distance in meters.
    #[serde(default)]
    pub estimated_distance: Option<f64>,
    /// Encoded polyline of the planned route, when one has been computed.
    #[serde(default)]
    pub route_geometry: Option<String>,
    /// Actual travel time in seconds, filled in after completion.
    #[serde(default)]
    pub real_duration: Option<f64>,
    pub created_at: DateTime<Utc>,
}

impl Case {
    /// Incident location in renderer (lng, lat) order.
    pub fn position(&self) -> LngLat {
        LngLat::new(self.longitude, self.latitude)
    }

    /// Route geometry with empty and whitespace-only strings filtered out.
    pub fn route_geometry_trimmed(&self) -> Option<&str> {
        self.route_geometry
            .as_deref()
            .map(str::trim)
            .filter(|g| !g.is_empty())
    }
}
