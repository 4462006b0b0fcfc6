//! Snapshot loader
//!
//! Reads competition snapshot files:
//! 1. Size check against [`ConfigLimits`]
//! 2. YAML parsing into a [`CompetitionSnapshot`]
//! 3. Count limits and identity checks
//! 4. Contestant ownership fill-in
//!
//! Timeline validation is not part of loading. The phase resolver
//! tolerates malformed windows, and `podium validate` reports on them.

use crate::config::schema::CompetitionSnapshot;
use crate::error::{ConfigError, PodiumError};

use std::collections::HashSet;
use std::path::Path;

// ============================================================================
// Public API
// ============================================================================

/// Options for the snapshot loader.
#[derive(Debug, Clone, Default)]
pub struct LoaderOptions {
    /// Limits for snapshot size.
    pub config_limits: ConfigLimits,
}

/// Limits for snapshot size to prevent resource exhaustion.
#[derive(Debug, Clone)]
pub struct ConfigLimits {
    /// Maximum number of nomination periods.
    pub max_periods: usize,

    /// Maximum number of voting rounds.
    pub max_rounds: usize,

    /// Maximum number of contestants.
    pub max_contestants: usize,

    /// Maximum snapshot file size in bytes.
    pub max_file_size: usize,
}

impl Default for ConfigLimits {
    fn default() -> Self {
        Self {
            max_periods: env_or("PODIUM_MAX_PERIODS", 50),
            max_rounds: env_or("PODIUM_MAX_ROUNDS", 50),
            max_contestants: env_or("PODIUM_MAX_CONTESTANTS", 10_000),
            max_file_size: env_or("PODIUM_MAX_FILE_SIZE", 5 * 1024 * 1024),
        }
    }
}

/// Result of loading a snapshot file.
#[derive(Debug)]
pub struct LoadResult {
    /// The loaded snapshot.
    pub snapshot: CompetitionSnapshot,

    /// Warnings encountered during loading.
    pub warnings: Vec<LoadWarning>,
}

/// Warning during snapshot loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadWarning {
    /// Warning message.
    pub message: String,

    /// Location where the warning occurred.
    pub location: Option<String>,
}

/// Competition snapshot loader.
#[derive(Debug, Default)]
pub struct SnapshotLoader {
    options: LoaderOptions,
}

impl SnapshotLoader {
    /// Creates a loader with the given options.
    #[must_use]
    pub const fn new(options: LoaderOptions) -> Self {
        Self { options }
    }

    /// Creates a loader with default options.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(LoaderOptions::default())
    }

    /// Loads a snapshot file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read or is larger than the size limit
    /// - The file is empty or is not a valid snapshot
    /// - A count limit is exceeded
    /// - Contestant ids are missing or duplicated
    pub fn load(&self, path: &Path) -> Result<LoadResult, ConfigError> {
        let metadata = std::fs::metadata(path).map_err(|_| ConfigError::MissingFile {
            path: path.to_path_buf(),
        })?;

        let limit = self.options.config_limits.max_file_size;
        let file_size = usize::try_from(metadata.len()).unwrap_or(usize::MAX);
        if file_size > limit {
            return Err(ConfigError::LimitExceeded {
                what: "file size".to_string(),
                actual: file_size,
                limit,
            });
        }

        let raw = std::fs::read_to_string(path).map_err(|_| ConfigError::MissingFile {
            path: path.to_path_buf(),
        })?;

        self.parse(&raw, path)
    }

    /// Parses snapshot text. `path` is used for error reporting only.
    ///
    /// # Errors
    ///
    /// Same as [`load`](Self::load), minus the file access failures.
    pub fn parse(&self, raw: &str, path: &Path) -> Result<LoadResult, ConfigError> {
        let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);
        if raw.trim().is_empty() {
            return Err(ConfigError::EmptyFile {
                path: path.to_path_buf(),
            });
        }

        let mut snapshot: CompetitionSnapshot =
            serde_yaml::from_str(raw).map_err(|e| ConfigError::ParseError {
                path: path.to_path_buf(),
                line: e.location().map(|l| l.line()),
                message: e.to_string(),
            })?;

        self.check_limits(&snapshot)?;

        if snapshot.competition.id.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "competition.id".to_string(),
                value: snapshot.competition.id,
                expected: "a non-empty identifier".to_string(),
            });
        }

        let warnings = assign_contestants(&mut snapshot)?;
        Ok(LoadResult { snapshot, warnings })
    }

    fn check_limits(&self, snapshot: &CompetitionSnapshot) -> Result<(), ConfigError> {
        let limits = &self.options.config_limits;
        let counts = [
            (
                "nomination_periods",
                snapshot.timeline.nomination_periods.len(),
                limits.max_periods,
            ),
            (
                "voting_rounds",
                snapshot.timeline.voting_rounds.len(),
                limits.max_rounds,
            ),
            (
                "contestants",
                snapshot.contestants.len(),
                limits.max_contestants,
            ),
        ];
        for (what, actual, limit) in counts {
            if actual > limit {
                return Err(ConfigError::LimitExceeded {
                    what: what.to_string(),
                    actual,
                    limit,
                });
            }
        }
        Ok(())
    }
}

/// Writes a snapshot back to disk as YAML.
///
/// The file is written next to its destination and renamed into place so
/// a failed write never leaves a truncated snapshot.
///
/// # Errors
///
/// Returns an error if serialization or any file operation fails.
pub fn write_snapshot(path: &Path, snapshot: &CompetitionSnapshot) -> Result<(), PodiumError> {
    let yaml = serde_yaml::to_string(snapshot)?;
    let mut staging = path.as_os_str().to_owned();
    staging.push(".tmp");
    std::fs::write(&staging, yaml)?;
    std::fs::rename(&staging, path)?;
    Ok(())
}

// ============================================================================
// Helpers
// ============================================================================

/// Fills in contestant ownership and rejects duplicate ids.
fn assign_contestants(snapshot: &mut CompetitionSnapshot) -> Result<Vec<LoadWarning>, ConfigError> {
    let competition_id = snapshot.competition.id.clone();
    let mut warnings = Vec::new();
    let mut seen = HashSet::new();

    for (i, contestant) in snapshot.contestants.iter_mut().enumerate() {
        if contestant.id.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: format!("contestants[{i}].id"),
                value: contestant.id.clone(),
                expected: "a non-empty identifier".to_string(),
            });
        }
        if !seen.insert(contestant.id.clone()) {
            return Err(ConfigError::InvalidValue {
                field: format!("contestants[{i}].id"),
                value: contestant.id.clone(),
                expected: "an identifier unique within the competition".to_string(),
            });
        }

        if contestant.competition_id.is_empty() {
            contestant.competition_id.clone_from(&competition_id);
        } else if contestant.competition_id != competition_id {
            warnings.push(LoadWarning {
                message: format!(
                    "contestant '{}' belongs to competition '{}', reassigned to '{competition_id}'",
                    contestant.id, contestant.competition_id
                ),
                location: Some(format!("contestants[{i}].competition_id")),
            });
            contestant.competition_id.clone_from(&competition_id);
        }

        if contestant.name.trim().is_empty() {
            warnings.push(LoadWarning {
                message: format!("contestant '{}' has no name", contestant.id),
                location: Some(format!("contestants[{i}].name")),
            });
        }
    }

    Ok(warnings)
}

/// Reads an environment variable, falling back to `default` when unset or
/// unparseable.
fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
