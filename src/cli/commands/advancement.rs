//! `podium advancement`: who moves on from a round.

use super::{Session, evaluation_instant, print_json};
use crate::advancement::AdvancementView;
use crate::cli::args::{AdvancementArgs, OutputFormat};
use crate::error::PodiumError;

/// Prints the advancement view of the selected round.
///
/// # Errors
///
/// Returns an error if the snapshot cannot be loaded or the round does
/// not exist.
pub async fn run(args: &AdvancementArgs) -> Result<(), PodiumError> {
    let session = Session::open(&args.file, None)?;
    let now = evaluation_instant(args.at);
    let view = session
        .service
        .advancement(&session.competition_id, args.round, now)
        .await?;

    match args.format {
        OutputFormat::Json => print_json(&view)?,
        OutputFormat::Human => print_view(&session.heading(), &view),
    }
    Ok(())
}

/// Ranked table with a marker per contestant: `+` advancing, `=` tied at
/// the cutoff, `-` eliminated.
pub(crate) fn print_view(heading: &str, view: &AdvancementView) {
    println!("{heading}");
    if let Some(round) = &view.round {
        println!("  round:  {round}");
    }
    match view.cutoff {
        Some(n) => println!("  cutoff: top {n}"),
        None => println!("  cutoff: none, everyone advances"),
    }

    for entry in &view.ranked {
        let mark = if view.advancing.contains(&entry.id) {
            '+'
        } else if view.tie.as_ref().is_some_and(|t| t.includes(&entry.id)) {
            '='
        } else {
            '-'
        };
        let name = if entry.name.is_empty() {
            entry.id.as_str()
        } else {
            entry.name.as_str()
        };
        println!(
            "  {mark} {:>3}. {name:<24} {:>8}",
            entry.position, entry.votes
        );
    }

    if let Some(tie) = &view.tie {
        println!(
            "  tie: {} contestants on {} votes for {} slot(s); run `podium tie-break`",
            tie.contestant_ids.len(),
            tie.cutoff_votes,
            tie.open_slots
        );
    }
}
