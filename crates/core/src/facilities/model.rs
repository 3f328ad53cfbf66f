//! Dispatch facilities.

use serde::{Deserialize, Serialize};

use crate::fleet::VehicleId;
use crate::geo::LngLat;

/// Stable facility identifier assigned by the facility service.
pub type FacilityId = i64;

/// A receiving facility (station, depot, clinic) shown on the live map.
///
/// Facilities are snapshot-only and carry no route or push-channel state;
/// they reconcile with the same upsert/remove marker discipline as vehicles.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Facility {
    pub id: FacilityId,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub available: bool,
    pub address: String,
    /// Capability this facility accepts.
    pub speciality: String,
    /// Vehicles home-based at this facility.
    #[serde(default)]
    pub vehicle_ids: Vec<VehicleId>,
}

impl Facility {
    /// Position in renderer (lng, lat) order.
    pub fn position(&self) -> LngLat {
        LngLat::new(self.longitude, self.latitude)
    }

    /// Marker label shown in the rendered view.
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.speciality)
    }
}
