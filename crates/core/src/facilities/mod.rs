//! Dispatch facilities.

pub mod model;

pub use model::{Facility, FacilityId};
