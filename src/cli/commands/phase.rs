//! `podium phase`: resolve what a competition displays.

use chrono::{DateTime, Utc};

use super::{Session, evaluation_instant, print_json};
use crate::cli::args::{OutputFormat, PhaseArgs};
use crate::error::PodiumError;
use crate::phase::PhaseReport;

/// Prints the resolved phase.
///
/// # Errors
///
/// Returns an error if the snapshot cannot be loaded.
pub async fn run(args: &PhaseArgs) -> Result<(), PodiumError> {
    let session = Session::open(&args.file, None)?;
    let now = evaluation_instant(args.at);
    let report = session.service.phase(&session.competition_id, now).await?;

    match args.format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Human => print_report(&session.heading(), &report),
    }
    Ok(())
}

fn print_report(heading: &str, report: &PhaseReport) {
    println!("{heading}");
    println!("  status: {}", report.status);
    println!("  phase:  {} ({})", report.phase, report.label);
    if let Some(round) = &report.active_round {
        println!("  round:  {round}");
    }
    if let Some(boundary) = report.next_boundary {
        println!(
            "  next:   {} ({})",
            boundary.to_rfc3339(),
            countdown(report.evaluated_at, boundary)
        );
    }
}

/// Human countdown such as `in 6days 23h 59m`, to whole minutes.
pub(crate) fn countdown(now: DateTime<Utc>, then: DateTime<Utc>) -> String {
    let seconds = (then - now).num_seconds().max(0).unsigned_abs();
    let rounded = std::time::Duration::from_secs(seconds - seconds % 60);
    if rounded.is_zero() {
        "in under a minute".to_string()
    } else {
        format!("in {}", humantime::format_duration(rounded))
    }
}
