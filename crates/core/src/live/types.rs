//! Update payloads flowing from the feeders into the engine.

use crate::dispatch::Case;
use crate::errors::FetchError;
use crate::facilities::Facility;
use crate::fleet::{PositionUpdate, Vehicle};

/// Resource kinds served by the snapshot endpoints.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResourceKind {
    Vehicles,
    Cases,
    Facilities,
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Vehicles => write!(f, "vehicles"),
            Self::Cases => write!(f, "cases"),
            Self::Facilities => write!(f, "facilities"),
        }
    }
}

/// One immutable update delivered to the engine's apply loop.
///
/// Feeders never touch engine state directly; everything they learn travels
/// through this enum, which keeps the engine a single-writer and makes every
/// mutation replayable in tests.
#[derive(Clone, Debug)]
pub enum LiveUpdate {
    /// Full vehicle snapshot from one poll tick.
    VehicleSnapshot(Vec<Vehicle>),
    /// Full case snapshot from one poll tick.
    CaseSnapshot(Vec<Case>),
    /// Full facility snapshot from one poll tick.
    FacilitySnapshot(Vec<Facility>),
    /// Incremental position event from the push channel.
    Position(PositionUpdate),
    /// A snapshot fetch failed; the previous snapshot stays authoritative.
    RefreshFailed {
        kind: ResourceKind,
        error: FetchError,
    },
}
