//! Lifecycle event stream.
//!
//! Every mutation made through the lifecycle service is recorded as a
//! typed event, serialized as one JSON line with a monotonically
//! increasing sequence number.

use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::schema::CompetitionStatus;

// ---------------------------------------------------------------------------
// Event variants
// ---------------------------------------------------------------------------

/// What caused a status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionTrigger {
    /// Time-driven transition detected by the trigger evaluation
    Auto,
    /// Administrator request
    Manual,
}

impl TransitionTrigger {
    /// Label value used in logs and metrics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Manual => "manual",
        }
    }
}

/// A persisted lifecycle change.
///
/// Tagged with `"type"` when serialized so consumers can dispatch on the
/// event kind.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum Event {
    /// A competition's status was written.
    StatusChanged {
        /// When the change was persisted.
        timestamp: DateTime<Utc>,
        /// Competition id.
        competition_id: String,
        /// Previous status.
        from: CompetitionStatus,
        /// New status.
        to: CompetitionStatus,
        /// Auto or manual.
        trigger: TransitionTrigger,
        /// Trigger reason, for auto transitions.
        #[serde(skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },

    /// An edited timeline passed validation and replaced the stored one.
    TimelineSaved {
        /// When the timeline was saved.
        timestamp: DateTime<Utc>,
        /// Competition id.
        competition_id: String,
        /// Number of nomination periods saved.
        periods: usize,
        /// Number of rounds saved.
        rounds: usize,
        /// Whether a finale is scheduled.
        has_finale: bool,
        /// Validation warnings that did not block the save.
        warnings: usize,
    },

    /// A tie at the cutoff was broken in favour of one contestant.
    TieBroken {
        /// When the tie-break was persisted.
        timestamp: DateTime<Utc>,
        /// Competition id.
        competition_id: String,
        /// Round the tie was in.
        #[serde(skip_serializing_if = "Option::is_none")]
        round: Option<String>,
        /// Contestant chosen to advance.
        contestant_id: String,
        /// Every contestant that was tied.
        tied: Vec<String>,
        /// The chosen contestant's new vote total.
        votes: u64,
    },

    /// A contestant's votes were adjusted by hand.
    VotesAdjusted {
        /// When the adjustment was persisted.
        timestamp: DateTime<Utc>,
        /// Competition id.
        competition_id: String,
        /// Contestant id.
        contestant_id: String,
        /// Requested change.
        delta: i64,
        /// New vote total.
        votes: u64,
    },

    /// A round was opened.
    RoundOpened {
        /// When the round was opened.
        timestamp: DateTime<Utc>,
        /// Competition id.
        competition_id: String,
        /// Round title.
        round: String,
        /// Round order index.
        order_index: u32,
        /// Whether vote totals were reset to zero.
        votes_reset: bool,
    },
}

// ---------------------------------------------------------------------------
// Envelope (adds sequence number via serde flatten)
// ---------------------------------------------------------------------------

/// Wraps an [`Event`] with a monotonically increasing sequence number.
#[derive(Debug, Serialize)]
struct EventEnvelope {
    /// Zero-based, monotonically increasing sequence counter.
    sequence: u64,
    /// The wrapped event (flattened into the same JSON object).
    #[serde(flatten)]
    event: Event,
}

// ---------------------------------------------------------------------------
// Emitter
// ---------------------------------------------------------------------------

/// Thread-safe, buffered JSONL event writer.
///
/// Serialization or I/O failures are dropped: a lost event line never
/// fails the mutation it describes.
pub struct EventEmitter {
    writer: Mutex<BufWriter<Box<dyn Write + Send>>>,
    sequence: AtomicU64,
}

impl std::fmt::Debug for EventEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventEmitter")
            .field("sequence", &self.sequence.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl EventEmitter {
    /// Creates an emitter that writes to the given writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: Mutex::new(BufWriter::new(writer)),
            sequence: AtomicU64::new(0),
        }
    }

    /// Creates an emitter that writes to stdout.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(Box::new(std::io::stdout()))
    }

    /// Creates an emitter that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(Box::new(std::io::stderr()))
    }

    /// Creates an emitter that discards all events.
    #[must_use]
    pub fn noop() -> Self {
        Self::new(Box::new(std::io::sink()))
    }

    /// Creates an emitter that appends to the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be created or opened.
    pub fn from_file(path: &Path) -> std::io::Result<Self> {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        Ok(Self::new(Box::new(file)))
    }

    /// Emits an event as a single JSONL line.
    pub fn emit(&self, event: Event) {
        let seq = self.sequence.fetch_add(1, Ordering::SeqCst);
        let envelope = EventEnvelope {
            sequence: seq,
            event,
        };

        if let Ok(mut w) = self.writer.lock() {
            if let Ok(line) = serde_json::to_string(&envelope) {
                let _ = writeln!(w, "{line}");
                let _ = w.flush();
            }
        }
    }

    /// Returns the number of events emitted so far.
    #[must_use]
    pub fn event_count(&self) -> u64 {
        self.sequence.load(Ordering::Relaxed)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex as StdMutex};

    use super::*;

    /// In-memory writer for capturing emitter output in tests.
    #[derive(Clone)]
    struct TestWriter(Arc<StdMutex<Vec<u8>>>);

    impl TestWriter {
        fn new() -> Self {
            Self(Arc::new(StdMutex::new(Vec::new())))
        }

        fn contents(&self) -> String {
            let buf = self.0.lock().unwrap();
            String::from_utf8_lossy(&buf).into_owned()
        }
    }

    impl Write for TestWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn status_changed() -> Event {
        Event::StatusChanged {
            timestamp: DateTime::parse_from_rfc3339("2026-02-01T00:00:00Z")
                .unwrap()
                .with_timezone(&Utc),
            competition_id: "spring".to_owned(),
            from: CompetitionStatus::Publish,
            to: CompetitionStatus::Live,
            trigger: TransitionTrigger::Auto,
            reason: Some("nominations opened".to_owned()),
        }
    }

    #[test]
    fn emitter_writes_flat_jsonl_with_sequence() {
        let tw = TestWriter::new();
        let emitter = EventEmitter::new(Box::new(tw.clone()));
        emitter.emit(status_changed());
        emitter.emit(Event::VotesAdjusted {
            timestamp: Utc::now(),
            competition_id: "spring".to_owned(),
            contestant_id: "c1".to_owned(),
            delta: -3,
            votes: 7,
        });

        assert_eq!(emitter.event_count(), 2);

        let lines: Vec<serde_json::Value> = tw
            .contents()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines[0]["sequence"], 0);
        assert_eq!(lines[0]["type"], "StatusChanged");
        assert_eq!(lines[0]["from"], "publish");
        assert_eq!(lines[0]["trigger"], "auto");
        assert!(lines[0].get("event").is_none());
        assert_eq!(lines[1]["sequence"], 1);
        assert_eq!(lines[1]["delta"], -3);
    }

    #[test]
    fn optional_fields_are_omitted() {
        let json = serde_json::to_value(Event::TieBroken {
            timestamp: Utc::now(),
            competition_id: "spring".to_owned(),
            round: None,
            contestant_id: "c2".to_owned(),
            tied: vec!["c2".to_owned(), "c3".to_owned()],
            votes: 91,
        })
        .unwrap();
        assert!(json.get("round").is_none());
        assert_eq!(json["tied"][1], "c3");
    }

    #[test]
    fn file_emitter_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.jsonl");
        EventEmitter::from_file(&path).unwrap().emit(status_changed());
        EventEmitter::from_file(&path).unwrap().emit(status_changed());
        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 2);
    }
}
