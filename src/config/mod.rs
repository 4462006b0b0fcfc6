//! Competition data and snapshot files
//!
//! Record types for competitions and their timelines, the snapshot file
//! loader, and the timeline validator run before any edit is saved.

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{ConfigLimits, LoadResult, LoadWarning, LoaderOptions, SnapshotLoader};
pub use schema::*;
pub use validation::{ValidationResult, Validator, validate_timeline};
