//! Field constraints for [`CalcInput`](crate::CalcInput) and the error that
//! reports every field breaking them.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest magnitude any field may take: one trillion.
///
/// Keeps every intermediate of [`compute`](crate::compute) well inside
/// `Decimal`'s range, so no input that validates can overflow.
pub const MAX_MAGNITUDE: Decimal = Decimal::from_parts(0xD4A5_1000, 0xE8, 0, false, 0);

/// Numeric fields of a [`CalcInput`](crate::CalcInput).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputField {
    ItemPrice,
    ShippingCharged,
    ShippingCost,
    Cogs,
    EbayFeePct,
    PromotedPct,
    PaymentProcPct,
    PaymentProcFixed,
    RefundsPct,
    Taxes,
    Adjustments,
}

impl InputField {
    /// Every field, in record order.
    pub const ALL: [InputField; 11] = [
        Self::ItemPrice,
        Self::ShippingCharged,
        Self::ShippingCost,
        Self::Cogs,
        Self::EbayFeePct,
        Self::PromotedPct,
        Self::PaymentProcPct,
        Self::PaymentProcFixed,
        Self::RefundsPct,
        Self::Taxes,
        Self::Adjustments,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ItemPrice => "item_price",
            Self::ShippingCharged => "shipping_charged",
            Self::ShippingCost => "shipping_cost",
            Self::Cogs => "cogs",
            Self::EbayFeePct => "ebay_fee_pct",
            Self::PromotedPct => "promoted_pct",
            Self::PaymentProcPct => "payment_proc_pct",
            Self::PaymentProcFixed => "payment_proc_fixed",
            Self::RefundsPct => "refunds_pct",
            Self::Taxes => "taxes",
            Self::Adjustments => "adjustments",
        }
    }

    /// Accepts the snake_case name, or the camelCase record key.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| {
            field.as_str() == s || field.as_str().replace('_', "") == s.to_ascii_lowercase()
        })
    }

    /// The constraint the field must satisfy, if any.
    ///
    /// `taxes` and `adjustments` may take either sign.
    pub fn rule(&self) -> Option<Rule> {
        match self {
            Self::RefundsPct => Some(Rule::Fraction),
            Self::Taxes | Self::Adjustments => None,
            _ => Some(Rule::NonNegative),
        }
    }

    /// The first rule `value` breaks: the field's own rule, then
    /// [`Rule::Bounded`], which every field is subject to.
    pub fn violated_rule(
        &self,
        value: Decimal,
    ) -> Option<Rule> {
        self.rule()
            .into_iter()
            .chain([Rule::Bounded])
            .find(|rule| !rule.check(value))
    }
}

impl fmt::Display for InputField {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A constraint on a numeric input field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    /// Value must be `>= 0`.
    NonNegative,
    /// Value must lie in `[0, 1]`.
    Fraction,
    /// Magnitude must not exceed [`MAX_MAGNITUDE`].
    Bounded,
}

impl Rule {
    pub fn check(
        &self,
        value: Decimal,
    ) -> bool {
        match self {
            Self::NonNegative => value >= Decimal::ZERO,
            Self::Fraction => value >= Decimal::ZERO && value <= Decimal::ONE,
            Self::Bounded => value.abs() <= MAX_MAGNITUDE,
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::NonNegative => f.write_str("must be non-negative"),
            Self::Fraction => f.write_str("must be between 0 and 1"),
            Self::Bounded => write!(f, "must be within ±{MAX_MAGNITUDE}"),
        }
    }
}

/// One field that failed its [`Rule`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    pub field: InputField,
    pub value: Decimal,
    pub rule: Rule,
}

impl fmt::Display for FieldViolation {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{} {}, got {}", self.field, self.rule, self.value)
    }
}

/// Raised when one or more input fields break their constraints.
///
/// Validation is all-or-nothing: every violated field is listed, in record
/// order, and no output is produced.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid input: {}", join_violations(.violations))]
pub struct ValidationError {
    pub violations: Vec<FieldViolation>,
}

impl ValidationError {
    /// Returns `true` if `field` is among the violations.
    pub fn has_field(
        &self,
        field: InputField,
    ) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }
}

fn join_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
