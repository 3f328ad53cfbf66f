//! Dispatch cases.

pub mod model;

pub use model::{Case, CaseId, CaseStatus};
