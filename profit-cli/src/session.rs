//! Line-oriented calculator session: edit the current sale, log it against
//! the goal, move on to the next one.
//!
//! | Command | Effect |
//! |--------------------------|----------------------------------------------|
//! | `set <field> <value>`    | Set a field (also `<field>=<value>` or `set <field>=<value>`) |
//! | `show`                   | Compute the current sale |
//! | `log`                    | Log the current sale and clear for the next |
//! | `clear`                  | Clear for the next sale without logging |
//! | `goal <amount>`          | Change the gross goal |
//! | `lock on` / `lock off`   | Keep or reset fees between items |
//! | `progress`               | Show goal progress |
//! | `reset`                  | Forget every logged sale |
//! | `quit`                   | End the session |
//!
//! Values are parsed like form input: anything unparsable becomes 0.

use profit_core::{CalcInput, CalcOutput, InputField, ValidationError, compute};
use profit_data::AppConfig;
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::debug;

use crate::tracker::{GoalTracker, LogEntry, ProgressSummary};
use crate::utils::parse_amount;

/// Errors a single session command can produce. None of them end the session.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("unknown command '{0}' (try: set, show, log, clear, goal, lock, progress, reset, quit)")]
    UnknownCommand(String),

    #[error("unknown field '{0}'")]
    UnknownField(String),

    #[error("'{command}' needs {what}")]
    MissingArgument {
        command: &'static str,
        what: &'static str,
    },

    #[error("expected 'on' or 'off', got '{0}'")]
    InvalidLock(String),

    #[error("gross goal must be non-negative, got {0}")]
    NegativeGoal(Decimal),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// What a command did, for the caller to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionReply {
    Updated { field: InputField },
    Output(Box<CalcOutput>),
    Logged(Box<LogEntry>),
    Skipped,
    Cleared,
    Progress(ProgressSummary),
    Nothing,
    Quit,
}

/// The sale being edited plus the goal tracker.
#[derive(Debug, Clone)]
pub struct Session {
    input: CalcInput,
    tracker: GoalTracker,
}

impl Session {
    /// Starts with an empty sale carrying the configured fee rates.
    pub fn new(config: &AppConfig) -> Self {
        let mut input = CalcInput::default();
        config.fees.apply_to(&mut input);
        Self {
            input,
            tracker: GoalTracker::from_config(config),
        }
    }

    pub fn input(&self) -> &CalcInput {
        &self.input
    }

    pub fn tracker(&self) -> &GoalTracker {
        &self.tracker
    }

    /// Runs one command line.
    pub fn handle(
        &mut self,
        line: &str,
    ) -> Result<SessionReply, SessionError> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(SessionReply::Nothing);
        }

        let assignment = line.strip_prefix("set ").unwrap_or(line);
        if let Some((field, value)) = assignment.split_once('=') {
            return self.set(field, value);
        }

        let mut words = line.split_whitespace();
        let command = words.next().unwrap_or_default();
        let arg = words.next();
        debug!(command, ?arg, "session command");

        match command {
            "set" => {
                let field = arg.ok_or(SessionError::MissingArgument {
                    command: "set",
                    what: "a field",
                })?;
                self.set(field, words.next().unwrap_or_default())
            }
            "show" => Ok(SessionReply::Output(Box::new(compute(&self.input)?))),
            "log" => self.log(),
            "clear" => {
                self.input = self.tracker.clear_for_next_item(&self.input);
                Ok(SessionReply::Cleared)
            }
            "goal" => {
                let amount = arg.ok_or(SessionError::MissingArgument {
                    command: "goal",
                    what: "an amount",
                })?;
                let goal = parse_amount(amount);
                self.tracker
                    .set_gross_goal(goal)
                    .map_err(|_| SessionError::NegativeGoal(goal))?;
                Ok(SessionReply::Progress(self.tracker.summary()))
            }
            "lock" => {
                let lock = match arg {
                    Some("on") => true,
                    Some("off") => false,
                    other => return Err(SessionError::InvalidLock(other.unwrap_or_default().to_string())),
                };
                self.tracker.set_lock_fees(lock);
                Ok(SessionReply::Nothing)
            }
            "progress" => Ok(SessionReply::Progress(self.tracker.summary())),
            "reset" => {
                self.tracker.reset_progress();
                Ok(SessionReply::Progress(self.tracker.summary()))
            }
            "quit" | "exit" => Ok(SessionReply::Quit),
            other => Err(SessionError::UnknownCommand(other.to_string())),
        }
    }

    fn set(
        &mut self,
        field: &str,
        value: &str,
    ) -> Result<SessionReply, SessionError> {
        let field = field.trim();
        let field = InputField::parse(field).ok_or_else(|| SessionError::UnknownField(field.to_string()))?;
        self.input.set(field, parse_amount(value));
        Ok(SessionReply::Updated { field })
    }

    /// Logs the current sale and clears the form. A sale with no gross is
    /// left as it is.
    fn log(&mut self) -> Result<SessionReply, SessionError> {
        let output = compute(&self.input)?;
        let reply = match self.tracker.log_item(&self.input, &output) {
            Some(entry) => SessionReply::Logged(Box::new(entry.clone())),
            None => return Ok(SessionReply::Skipped),
        };
        self.input = self.tracker.clear_for_next_item(&self.input);
        Ok(reply)
    }
}
