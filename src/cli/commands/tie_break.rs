//! `podium tie-break`: advance one tied contestant.

use super::advancement::print_view;
use super::{Session, evaluation_instant, print_json};
use crate::cli::args::{OutputFormat, TieBreakArgs};
use crate::config::schema::Contestant;
use crate::error::PodiumError;
use crate::store::CompetitionStore;

/// Largest edit distance still offered as a "did you mean" suggestion.
const MAX_SUGGESTION_DISTANCE: usize = 3;

/// Breaks the tie in favour of the selected contestant and writes the
/// snapshot back.
///
/// # Errors
///
/// Returns a usage error for an unknown contestant, a lifecycle error
/// when there is no tie or the contestant is not in it, or an I/O error
/// if the snapshot cannot be written.
pub async fn run(args: &TieBreakArgs) -> Result<(), PodiumError> {
    let session = Session::open(&args.file, args.events_file.as_deref())?;
    let contestants = session
        .service
        .store()
        .contestants(&session.competition_id)
        .await?;
    let contestant_id = resolve_contestant(&contestants, &args.contestant)?;

    let now = evaluation_instant(args.at);
    let view = session
        .service
        .break_tie(&session.competition_id, args.round, &contestant_id, now)
        .await?;
    session.save(&args.file)?;

    match args.format {
        OutputFormat::Json => print_json(&view)?,
        OutputFormat::Human => print_view(&session.heading(), &view),
    }
    Ok(())
}

/// Finds a contestant by exact id, then by case-insensitive name.
fn resolve_contestant(contestants: &[Contestant], query: &str) -> Result<String, PodiumError> {
    if let Some(c) = contestants.iter().find(|c| c.id == query) {
        return Ok(c.id.clone());
    }

    let by_name: Vec<&Contestant> = contestants
        .iter()
        .filter(|c| c.name.eq_ignore_ascii_case(query))
        .collect();
    match by_name.as_slice() {
        [one] => Ok(one.id.clone()),
        [] => Err(PodiumError::Usage(unknown_contestant(contestants, query))),
        many => Err(PodiumError::Usage(format!(
            "'{query}' matches {} contestants; use an id ({})",
            many.len(),
            many.iter().map(|c| c.id.as_str()).collect::<Vec<_>>().join(", ")
        ))),
    }
}

fn unknown_contestant(contestants: &[Contestant], query: &str) -> String {
    let needle = query.to_lowercase();
    let suggestion = contestants
        .iter()
        .flat_map(|c| [c.id.as_str(), c.name.as_str()])
        .filter(|candidate| !candidate.is_empty())
        .map(|candidate| {
            let distance = strsim::damerau_levenshtein(&needle, &candidate.to_lowercase());
            (candidate, distance)
        })
        .filter(|(_, distance)| *distance <= MAX_SUGGESTION_DISTANCE)
        .min_by_key(|(_, distance)| *distance);

    match suggestion {
        Some((candidate, _)) => format!("unknown contestant '{query}' (did you mean '{candidate}'?)"),
        None => format!("unknown contestant '{query}'"),
    }
}
