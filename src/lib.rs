//! `podium` - Competition lifecycle engine
//!
//! Derives what a competition shows from its administrative status and
//! its timeline of nomination periods, voting and judging rounds, and
//! finale. Validates edited timelines, guards status transitions, and
//! decides who advances from a round, including ties at the cutoff.
//!
//! The engine modules (`phase`, `status`, `advancement`, and
//! `config::validation`) are pure functions of their inputs and an
//! explicit `now`. Reads and writes go through [`store::CompetitionStore`],
//! driven by [`service::LifecycleService`].

pub mod advancement;
pub mod cli;
pub mod config;
pub mod error;
pub mod observability;
pub mod phase;
pub mod service;
pub mod status;
pub mod store;
