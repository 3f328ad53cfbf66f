//! Render command types.

use serde::{Deserialize, Serialize};

use crate::dispatch::CaseId;
use crate::facilities::FacilityId;
use crate::fleet::VehicleId;
use crate::geo::LngLat;

/// Typed key for a rendered marker.
///
/// Vehicle, facility, and route-endpoint markers live in separate
/// namespaces, so a vehicle and a facility sharing a numeric id can never
/// collide on the map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum MarkerId {
    Vehicle(VehicleId),
    Facility(FacilityId),
    RouteStart(CaseId),
    RouteEnd(CaseId),
}

impl std::fmt::Display for MarkerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Vehicle(id) => write!(f, "vehicle:{}", id),
            Self::Facility(id) => write!(f, "facility:{}", id),
            Self::RouteStart(id) => write!(f, "route-start:{}", id),
            Self::RouteEnd(id) => write!(f, "route-end:{}", id),
        }
    }
}

/// Presentation attributes attached to a marker upsert.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarkerMeta {
    /// Human-readable marker label.
    pub label: String,
    /// Availability flag, for markers that carry one.
    pub available: Option<bool>,
}

/// Commands emitted by the reconciliation engine toward the map renderer.
///
/// The renderer is a black box: it applies each command and holds no
/// reconciliation logic. Upserting an existing id moves or restyles the
/// element in place; the engine never sends a command with no visible
/// effect.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RenderCommand {
    /// Create or move/restyle a marker.
    UpsertMarker {
        id: MarkerId,
        position: LngLat,
        meta: MarkerMeta,
    },

    /// Remove a marker.
    RemoveMarker { id: MarkerId },

    /// Create or replace the drawn line for one case.
    UpsertRouteLayer {
        id: CaseId,
        coordinates: Vec<LngLat>,
        color: String,
    },

    /// Remove the drawn line for one case.
    RemoveRouteLayer { id: CaseId },

    /// Adjust the viewport to contain every given coordinate.
    FitView { coordinates: Vec<LngLat> },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_id_namespaces_do_not_collide() {
        assert_ne!(MarkerId::Vehicle(1), MarkerId::Facility(1));
        assert_ne!(MarkerId::RouteStart(1), MarkerId::RouteEnd(1));
        assert_eq!(format!("{}", MarkerId::RouteStart(12)), "route-start:12");
    }

    #[test]
    fn test_command_serializes_tagged() {
        let command = RenderCommand::RemoveMarker {
            id: MarkerId::Vehicle(4),
        };
        let json = serde_json::to_value(&command).unwrap();
        assert_eq!(json["type"], "remove_marker");
        assert_eq!(json["id"]["kind"], "vehicle");
        assert_eq!(json["id"]["id"], 4);
    }
}
