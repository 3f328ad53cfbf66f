//! Vehicle records and incremental position events.

use serde::{Deserialize, Serialize};

use crate::dispatch::CaseId;
use crate::geo::LngLat;

/// Stable vehicle identifier assigned by the fleet service.
pub type VehicleId = i64;

/// A fleet vehicle as reported by the snapshot endpoint.
///
/// Snapshots are the only source of full vehicle records; the push channel
/// carries position-only updates and never creates or removes vehicles.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: VehicleId,
    pub driver_name: String,
    pub available: bool,
    pub latitude: f64,
    pub longitude: f64,
    /// Case this vehicle is currently assigned to, if any.
    #[serde(default)]
    pub current_case_id: Option<CaseId>,
}

impl Vehicle {
    /// Position in renderer (lng, lat) order.
    pub fn position(&self) -> LngLat {
        LngLat::new(self.longitude, self.latitude)
    }

    /// Marker label shown in the rendered view.
    pub fn label(&self) -> String {
        format!("Vehicle {} ({})", self.id, self.driver_name)
    }
}

/// A position-only update delivered over the push channel.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionUpdate {
    pub vehicle_id: VehicleId,
    pub latitude: f64,
    pub longitude: f64,
}

impl PositionUpdate {
    /// Position in renderer (lng, lat) order.
    pub fn position(&self) -> LngLat {
        LngLat::new(self.longitude, self.latitude)
    }
}
