use crate::domain::model::Outcome;
use crate::utils::error::RunnerError;
use std::io::Write;

pub const SUCCESS_MARKER: &str = "✅";
pub const FAILURE_MARKER: &str = "❌";
pub const HINT_MARKER: &str = "💡";

/// Payloads that know how to describe themselves in the final report.
pub trait Reportable {
    fn headline(&self) -> String;
    fn details(&self) -> Vec<String> {
        Vec::new()
    }
}

/// Lines printed for a failed call, first line carries the failure marker.
pub fn failure_lines(action: &str, error: &RunnerError) -> Vec<String> {
    let mut lines = match error {
        RunnerError::MissingCredential { var } => {
            vec![format!("{} {} environment variable not set", FAILURE_MARKER, var)]
        }
        RunnerError::NonSuccessStatus { status, body } => vec![
            format!("{} {} failed: {}", FAILURE_MARKER, action, status),
            format!("Error: {}", body),
        ],
        RunnerError::Network(e) => vec![format!("{} Error during {}: {}", FAILURE_MARKER, action, e)],
        RunnerError::Provider { status, message } => vec![format!(
            "{} {} rejected by provider ({}): {}",
            FAILURE_MARKER, action, status, message
        )],
        other => vec![format!("{} {}: {}", FAILURE_MARKER, action, other)],
    };
    lines.push(format!("{} {}", HINT_MARKER, error.recovery_suggestion()));
    lines
}

pub fn success_lines<T: Reportable>(payload: &T) -> Vec<String> {
    let mut lines = vec![format!("{} {}", SUCCESS_MARKER, payload.headline())];
    lines.extend(payload.details());
    lines
}

pub fn write_outcome<W: Write, T: Reportable>(
    out: &mut W,
    action: &str,
    outcome: &Outcome<T>,
) -> std::io::Result<()> {
    let lines = match outcome {
        Ok(payload) => success_lines(payload),
        Err(error) => failure_lines(action, error),
    };
    for line in lines {
        writeln!(out, "{}", line)?;
    }
    Ok(())
}
