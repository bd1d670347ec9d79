//! What each `sale-calc` subcommand does, independent of argument parsing.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use profit_core::{CalcInput, CalcOutput, InputField, Provenance, compute, with_overrides};
use profit_data::AppConfig;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::render::{money, render_entry, render_output, render_progress};
use crate::session::{Session, SessionReply};
use crate::tracker::{GoalTracker, LogEntry, ProgressSummary};
use crate::utils::{parse_amount, parse_overrides};

// --- compute ---

/// A sale and, when overrides were given, the same sale under them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComputeReport {
    pub base: CalcOutput,
    pub scenario: Option<CalcOutput>,
}

impl ComputeReport {
    /// Scenario net minus base net.
    pub fn net_change(&self) -> Option<Decimal> {
        self.scenario.as_ref().map(|s| s.net - self.base.net)
    }
}

/// Starts from the configured fee profile, applies `fields` leniently, then
/// computes the base sale and the scenario built from `overrides`.
///
/// # Errors
///
/// A malformed override, or an input that breaks a calculator rule.
pub fn run_compute<S: AsRef<str>>(
    config: &AppConfig,
    fields: &[(InputField, String)],
    overrides: &[S],
) -> Result<ComputeReport> {
    let mut input = CalcInput::default();
    config.fees.apply_to(&mut input);
    for (field, raw) in fields {
        input.set(*field, parse_amount(raw));
    }

    let base = compute(&input).context("cannot compute sale")?;

    let scenario = if overrides.is_empty() {
        None
    } else {
        let overrides = parse_overrides(overrides)?.with_provenance(Provenance::Scenario);
        let scenario_input = with_overrides(&input, &overrides).context("invalid scenario")?;
        Some(compute(&scenario_input).context("cannot compute scenario")?)
    };

    Ok(ComputeReport { base, scenario })
}

pub fn render_compute(report: &ComputeReport) -> String {
    let mut out = render_output(&report.base);
    if let (Some(scenario), Some(change)) = (&report.scenario, report.net_change()) {
        out.push_str("\nScenario\n\n");
        out.push_str(&render_output(scenario));
        let sign = if change > Decimal::ZERO { "+" } else { "" };
        out.push_str(&format!("\nNet change: {sign}{}\n", money(change)));
    }
    out
}

// --- log ---

/// Result of logging a batch of sales against the goal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogReport {
    /// In input order.
    pub entries: Vec<LogEntry>,
    /// Rows with no gross, which are never logged.
    pub skipped: usize,
    pub summary: ProgressSummary,
}

/// Computes each sale independently and logs it; `goal` replaces the
/// configured gross goal.
///
/// # Errors
///
/// A negative `goal`, or an input that breaks a calculator rule.
pub fn run_log(
    config: &AppConfig,
    inputs: &[CalcInput],
    goal: Option<Decimal>,
) -> Result<LogReport> {
    let mut tracker = GoalTracker::from_config(config);
    if let Some(goal) = goal {
        tracker.set_gross_goal(goal)?;
    }

    let mut skipped = 0;
    for input in inputs {
        let output = compute(input)?;
        if tracker.log_item(input, &output).is_none() {
            skipped += 1;
        }
    }

    let mut entries = tracker.entries().to_vec();
    entries.reverse();
    info!(logged = entries.len(), skipped, "logged sales");

    Ok(LogReport {
        entries,
        skipped,
        summary: tracker.summary(),
    })
}

pub fn render_log(report: &LogReport) -> String {
    let mut out = String::new();
    for entry in &report.entries {
        out.push_str(&render_entry(entry));
        out.push('\n');
    }
    if report.skipped > 0 {
        out.push_str(&format!("Skipped {} sale(s) with no gross\n", report.skipped));
    }
    out.push_str(&render_progress(&report.summary));
    out.push('\n');
    out
}

// --- session ---

/// Feeds each line of `input` to a [`Session`] and writes the rendered
/// replies to `output`. Command errors are reported and the session goes on.
///
/// Returns the final goal progress.
///
/// # Errors
///
/// Only I/O failures on `input` or `output`.
pub fn run_session<R: BufRead, W: Write>(
    config: &AppConfig,
    input: R,
    mut output: W,
) -> Result<ProgressSummary> {
    let mut session = Session::new(config);

    for (idx, line) in input.lines().enumerate() {
        let line = line.context("cannot read session input")?;
        let text = match session.handle(&line) {
            Ok(SessionReply::Quit) => {
                debug!(line = idx + 1, "session ended by quit");
                break;
            }
            Ok(reply) => render_reply(&reply),
            Err(e) => {
                warn!(line = idx + 1, "{}", e);
                Some(format!("error: {e}"))
            }
        };
        if let Some(text) = text {
            writeln!(output, "{}", text.trim_end()).context("cannot write session output")?;
        }
    }

    Ok(session.tracker().summary())
}

fn render_reply(reply: &SessionReply) -> Option<String> {
    match reply {
        SessionReply::Updated { .. } | SessionReply::Nothing | SessionReply::Quit => None,
        SessionReply::Output(output) => Some(render_output(output)),
        SessionReply::Logged(entry) => Some(render_entry(entry)),
        SessionReply::Skipped => Some("Nothing to log: sale has no gross".to_string()),
        SessionReply::Cleared => Some("Cleared".to_string()),
        SessionReply::Progress(summary) => Some(render_progress(summary)),
    }
}
