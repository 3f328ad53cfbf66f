//! Fleet vehicles.

pub mod model;

pub use model::{PositionUpdate, Vehicle, VehicleId};
