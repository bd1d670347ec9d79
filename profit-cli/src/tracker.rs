//! Gross sales goal tracking across logged items.
//!
//! The tracker only reads calculator outputs; nothing it holds is ever fed
//! back into [`compute`](profit_core::compute).

use chrono::{DateTime, Utc};
use profit_core::{CalcInput, CalcOutput, Provenance};
use profit_data::{AppConfig, ConfigError, FeeProfile};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

/// One logged sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub id: Uuid,
    pub ts: DateTime<Utc>,
    pub gross: Decimal,
    pub net: Decimal,
    pub inputs: CalcInput,
}

/// Snapshot of goal progress, for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSummary {
    pub items: usize,
    pub gross_goal: Decimal,
    pub gross_progress: Decimal,
    pub net_total: Decimal,
    /// Percent of goal reached, capped at 100.
    pub progress_pct: Decimal,
}

/// Running log of sales measured against a gross goal.
#[derive(Debug, Clone)]
pub struct GoalTracker {
    gross_goal: Decimal,
    lock_fees: bool,
    fees: FeeProfile,
    /// Newest first.
    entries: Vec<LogEntry>,
}

impl GoalTracker {
    pub fn new(
        gross_goal: Decimal,
        lock_fees: bool,
        fees: FeeProfile,
    ) -> Self {
        Self {
            gross_goal,
            lock_fees,
            fees,
            entries: Vec::new(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.gross_goal, config.lock_fees, config.fees.clone())
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn gross_goal(&self) -> Decimal {
        self.gross_goal
    }

    /// # Errors
    ///
    /// [`ConfigError::NegativeGoal`] if `goal` is below zero; the goal is left
    /// unchanged.
    pub fn set_gross_goal(
        &mut self,
        goal: Decimal,
    ) -> Result<(), ConfigError> {
        if goal < Decimal::ZERO {
            return Err(ConfigError::NegativeGoal(goal));
        }
        self.gross_goal = goal;
        Ok(())
    }

    pub fn lock_fees(&self) -> bool {
        self.lock_fees
    }

    pub fn set_lock_fees(
        &mut self,
        lock: bool,
    ) {
        self.lock_fees = lock;
    }

    /// Sum of gross over every logged item.
    pub fn progress(&self) -> Decimal {
        self.entries.iter().map(|e| e.gross).sum()
    }

    pub fn net_total(&self) -> Decimal {
        self.entries.iter().map(|e| e.net).sum()
    }

    /// Percent of the goal reached, capped at 100; zero when there is no goal.
    ///
    /// A goal so small that the ratio overflows counts as reached.
    pub fn progress_pct(&self) -> Decimal {
        if self.gross_goal <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        let hundred = Decimal::ONE_HUNDRED;
        self.progress()
            .checked_div(self.gross_goal)
            .and_then(|share| share.checked_mul(hundred))
            .map_or(hundred, |pct| pct.min(hundred))
    }

    pub fn summary(&self) -> ProgressSummary {
        ProgressSummary {
            items: self.entries.len(),
            gross_goal: self.gross_goal,
            gross_progress: self.progress(),
            net_total: self.net_total(),
            progress_pct: self.progress_pct(),
        }
    }

    /// Records a sale. Items with no gross are not logged and `None` is
    /// returned.
    pub fn log_item(
        &mut self,
        inputs: &CalcInput,
        output: &CalcOutput,
    ) -> Option<&LogEntry> {
        if output.gross <= Decimal::ZERO {
            debug!(gross = %output.gross, "not logging item without gross");
            return None;
        }

        let entry = LogEntry {
            id: Uuid::new_v4(),
            ts: Utc::now(),
            gross: output.gross,
            net: output.net,
            inputs: inputs.clone(),
        };
        info!(id = %entry.id, gross = %entry.gross, net = %entry.net, "logged item");

        self.entries.insert(0, entry);
        self.entries.first()
    }

    /// Builds the form for the next item from the current one.
    ///
    /// Per-item amounts are cleared and provenance goes back to manual. With
    /// fees locked, rates, taxes and adjustments carry over; otherwise taxes
    /// and adjustments are zeroed and rates reset to the fee profile.
    pub fn clear_for_next_item(
        &self,
        current: &CalcInput,
    ) -> CalcInput {
        let mut next = CalcInput {
            item_price: Decimal::ZERO,
            shipping_charged: Decimal::ZERO,
            shipping_cost: Decimal::ZERO,
            cogs: Decimal::ZERO,
            provenance: Provenance::Manual,
            ..current.clone()
        };

        if !self.lock_fees {
            next.taxes = Decimal::ZERO;
            next.adjustments = Decimal::ZERO;
            self.fees.apply_to(&mut next);
        }

        next
    }

    pub fn reset_progress(&mut self) {
        info!(items = self.entries.len(), "reset goal progress");
        self.entries.clear();
    }
}
