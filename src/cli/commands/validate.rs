//! `podium validate`: check snapshot timelines before they are saved.

use serde::Serialize;

use super::{load_snapshot, print_json};
use crate::cli::args::{OutputFormat, ValidateArgs};
use crate::config::validation::validate_timeline;
use crate::error::{ConfigError, PodiumError, Severity, ValidationIssue};

/// Validation outcome for one file.
#[derive(Debug, Serialize)]
struct FileReport {
    file: String,
    valid: bool,
    errors: Vec<Issue>,
    warnings: Vec<Issue>,
}

#[derive(Debug, Serialize)]
struct Issue {
    path: String,
    message: String,
}

impl From<&ValidationIssue> for Issue {
    fn from(issue: &ValidationIssue) -> Self {
        Self {
            path: issue.path.clone(),
            message: issue.message.clone(),
        }
    }
}

/// Validates every file and reports all problems.
///
/// # Errors
///
/// Returns the first failure once every file has been reported: a load
/// error, or a validation error for the first invalid timeline.
pub fn run(args: &ValidateArgs) -> Result<(), PodiumError> {
    let mut reports = Vec::with_capacity(args.files.len());
    let mut first_failure: Option<PodiumError> = None;

    for path in &args.files {
        let file = path.display().to_string();
        tracing::info!(file, "validating timeline");

        let snapshot = match load_snapshot(path) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                reports.push(FileReport {
                    file,
                    valid: false,
                    errors: vec![Issue {
                        path: String::new(),
                        message: e.to_string(),
                    }],
                    warnings: Vec::new(),
                });
                first_failure.get_or_insert(e);
                continue;
            }
        };

        let mut result = validate_timeline(&snapshot.competition, &snapshot.timeline);
        if args.strict {
            result.errors.extend(result.warnings.drain(..).map(|w| ValidationIssue {
                severity: Severity::Error,
                ..w
            }));
        }

        let valid = result.is_valid();
        if !valid && first_failure.is_none() {
            first_failure = Some(
                ConfigError::ValidationError {
                    path: file.clone(),
                    errors: result.errors.clone(),
                }
                .into(),
            );
        }
        reports.push(FileReport {
            file,
            valid,
            errors: result.errors.iter().map(Issue::from).collect(),
            warnings: result.warnings.iter().map(Issue::from).collect(),
        });
    }

    match args.format {
        OutputFormat::Json => print_json(&reports)?,
        OutputFormat::Human => print_reports(&reports),
    }

    first_failure.map_or(Ok(()), Err)
}

fn print_reports(reports: &[FileReport]) {
    for report in reports {
        let mark = if report.valid { "ok" } else { "FAILED" };
        println!("{}: {mark}", report.file);
        for issue in &report.errors {
            print_issue("error", issue);
        }
        for issue in &report.warnings {
            print_issue("warning", issue);
        }
    }
}

fn print_issue(level: &str, issue: &Issue) {
    if issue.path.is_empty() {
        println!("  {level}: {}", issue.message);
    } else {
        println!("  {level}: {} ({})", issue.message, issue.path);
    }
}
