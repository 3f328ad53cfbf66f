//! Geographic types and the encoded polyline codec.

pub mod polyline;
pub mod types;

pub use polyline::{decode, encode};
pub use types::LngLat;
