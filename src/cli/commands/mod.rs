//! CLI command dispatch and handlers
//!
//! Each command loads one snapshot file into a [`MemoryStore`], runs the
//! lifecycle service against it, and writes the snapshot back when the
//! command mutates it.

pub mod advancement;
pub mod phase;
pub mod status;
pub mod tie_break;
pub mod validate;
pub mod version;

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::cli::args::{Cli, Commands};
use crate::config::loader::{SnapshotLoader, write_snapshot};
use crate::config::schema::CompetitionSnapshot;
use crate::error::{PodiumError, StoreError};
use crate::observability::EventEmitter;
use crate::service::LifecycleService;
use crate::store::MemoryStore;

/// Dispatch a parsed CLI invocation to the appropriate command handler.
///
/// # Errors
///
/// Returns an error if the dispatched command handler fails.
pub async fn dispatch(cli: Cli) -> Result<(), PodiumError> {
    match cli.command {
        Commands::Phase(args) => phase::run(&args).await,
        Commands::Validate(args) => validate::run(&args),
        Commands::Status(args) => status::run(&args).await,
        Commands::Advancement(args) => advancement::run(&args).await,
        Commands::TieBreak(args) => tie_break::run(&args).await,
        Commands::Version(args) => {
            version::run(&args);
            Ok(())
        }
    }
}

// ============================================================================
// Shared Helpers
// ============================================================================

/// A snapshot file loaded into a service.
pub(crate) struct Session {
    pub competition_id: String,
    pub competition_name: String,
    pub service: LifecycleService<MemoryStore>,
}

impl Session {
    /// Loads `path`, logging loader warnings.
    pub(crate) fn open(path: &Path, events_file: Option<&Path>) -> Result<Self, PodiumError> {
        let snapshot = load_snapshot(path)?;
        let events = match events_file {
            Some(file) => EventEmitter::from_file(file)?,
            None => EventEmitter::noop(),
        };
        Ok(Self {
            competition_id: snapshot.competition.id.clone(),
            competition_name: snapshot.competition.name.clone(),
            service: LifecycleService::new(MemoryStore::with_snapshot(snapshot))
                .with_events(Arc::new(events)),
        })
    }

    /// Writes the current state back to `path`.
    pub(crate) fn save(&self, path: &Path) -> Result<(), PodiumError> {
        let snapshot = self
            .service
            .store()
            .snapshot(&self.competition_id)
            .ok_or_else(|| StoreError::NotFound {
                kind: "competition",
                id: self.competition_id.clone(),
            })?;
        write_snapshot(path, &snapshot)?;
        tracing::info!(file = %path.display(), "snapshot written");
        Ok(())
    }

    /// Display heading: `Name (id)`, or just the id.
    pub(crate) fn heading(&self) -> String {
        if self.competition_name.is_empty() {
            self.competition_id.clone()
        } else {
            format!("{} ({})", self.competition_name, self.competition_id)
        }
    }
}

/// Loads a snapshot file, logging loader warnings.
pub(crate) fn load_snapshot(path: &Path) -> Result<CompetitionSnapshot, PodiumError> {
    tracing::debug!(file = %path.display(), "loading snapshot");
    let result = SnapshotLoader::with_defaults().load(path)?;
    for warning in &result.warnings {
        tracing::warn!(
            location = warning.location.as_deref().unwrap_or("<unknown>"),
            "{}",
            warning.message
        );
    }
    Ok(result.snapshot)
}

/// The instant to evaluate at: `--at` if given, else the current time.
pub(crate) fn evaluation_instant(at: Option<DateTime<Utc>>) -> DateTime<Utc> {
    at.unwrap_or_else(Utc::now)
}

/// Prints a value as pretty JSON on stdout.
pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<(), PodiumError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
