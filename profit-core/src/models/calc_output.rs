use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Itemized fees charged against a sale, each rounded to cents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeBreakdown {
    pub ebay_fee: Decimal,
    pub promoted_fee: Decimal,
    pub payment_processing_fee: Decimal,
    pub refunds: Decimal,
}

impl FeeBreakdown {
    /// Sum of all four lines.
    pub fn total(&self) -> Decimal {
        self.ebay_fee + self.promoted_fee + self.payment_processing_fee + self.refunds
    }
}

/// One step of the gross-to-net waterfall.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaterfallStep {
    pub label: String,
    /// Signed change applied at this step (deductions are negative).
    pub delta: Decimal,
    pub running_total: Decimal,
}

impl WaterfallStep {
    pub(crate) fn new(
        label: &str,
        delta: Decimal,
        running_total: Decimal,
    ) -> Self {
        Self {
            label: label.to_string(),
            delta,
            running_total,
        }
    }
}

/// Profitability of a single sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalcOutput {
    /// Item price plus shipping charged.
    pub gross: Decimal,
    pub fees: FeeBreakdown,
    pub shipping_cost: Decimal,
    pub cogs: Decimal,
    pub taxes: Decimal,
    pub adjustments: Decimal,
    pub net: Decimal,
    /// `net / gross` as a fraction; zero when gross is zero.
    pub margin_pct: Decimal,
    /// Average selling price. Equals the item price for a single sale.
    pub asp: Decimal,
    /// `Gross`, eight deductions, then `Net`.
    pub waterfall: Vec<WaterfallStep>,
}
