//! Status state machine
//!
//! Administrator transitions are checked by [`check_transition`]; the two
//! time-driven ones are detected by [`evaluate_auto_transition`]. Neither
//! persists anything.

pub mod transition;
pub mod trigger;

pub use transition::{TransitionCheck, check_transition};
pub use trigger::{
    TriggerResult, evaluate_auto_transition, should_auto_transition_to_completed,
    should_auto_transition_to_live,
};
