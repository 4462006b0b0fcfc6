//! `podium status`: report, apply, or request status transitions.

use serde::Serialize;

use super::{Session, evaluation_instant, print_json};
use crate::cli::args::{OutputFormat, StatusArgs};
use crate::config::schema::CompetitionStatus;
use crate::error::PodiumError;
use crate::status::TriggerResult;
use crate::store::CompetitionStore;

#[derive(Debug, Serialize)]
struct StatusReport {
    competition_id: String,
    previous: CompetitionStatus,
    status: CompetitionStatus,
    changed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    due: Option<DueTransition>,
}

#[derive(Debug, Serialize)]
struct DueTransition {
    to: CompetitionStatus,
    reason: String,
}

/// Runs the status command.
///
/// Without flags this only reports. `--apply` persists a due time-driven
/// transition; `--to` requests a manual change. Either writes the
/// snapshot back when the status actually changed.
///
/// # Errors
///
/// Returns an error if the snapshot cannot be loaded or written, or if a
/// requested change is refused.
pub async fn run(args: &StatusArgs) -> Result<(), PodiumError> {
    let session = Session::open(&args.file, args.events_file.as_deref())?;
    let id = session.competition_id.as_str();
    let now = evaluation_instant(args.at);
    let previous = session.service.store().competition(id).await?.status;

    let status = if let Some(to) = args.to {
        session.service.change_status(id, to).await?
    } else if args.apply {
        session
            .service
            .sync_status(id, now)
            .await?
            .unwrap_or(previous)
    } else {
        previous
    };

    let changed = status != previous;
    if changed {
        session.save(&args.file)?;
    }

    let due = match session.service.pending_transition(id, now).await? {
        TriggerResult::Fired { to, reason } => Some(DueTransition { to, reason }),
        TriggerResult::NotMet => None,
    };

    let report = StatusReport {
        competition_id: session.competition_id.clone(),
        previous,
        status,
        changed,
        due,
    };
    match args.format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Human => print_report(&session.heading(), &report),
    }
    Ok(())
}

fn print_report(heading: &str, report: &StatusReport) {
    println!("{heading}");
    if report.changed {
        println!("  status: {} -> {}", report.previous, report.status);
    } else {
        println!("  status: {}", report.status);
    }
    match &report.due {
        Some(due) => println!("  due:    {} ({})", due.to, due.reason),
        None => println!("  due:    nothing"),
    }
}
