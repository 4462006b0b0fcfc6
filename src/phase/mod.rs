//! Phase resolution
//!
//! Derives what a competition should display from its stored status and
//! the wall clock.
//!
//! # Architecture
//!
//! - [`Timeline`]: Periods, rounds, and finale as one ordered segment list
//! - [`Phase`]: Status with the time-driven sub-phase nested under `Live`
//! - [`engine`]: The pure resolver and the [`PhaseReport`] display summary

pub mod engine;
pub mod state;
pub mod timeline;

pub use engine::{PhaseReport, resolve_phase, resolve_phase_from_config};
pub use state::{Phase, TimelinePhase};
pub use timeline::{Segment, SegmentSource, Timeline};
