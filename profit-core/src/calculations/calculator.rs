//! Gross-to-net profit calculation for one sale.
//!
//! # Steps
//!
//! Every step is rounded to cents (half a cent away from zero) except the
//! fee base, which stays unrounded.
//!
//! | Step | Value |
//! |------|-------|
//! | 1    | Gross: item price + shipping charged |
//! | 2    | Refunds: gross × refunds rate |
//! | 3    | Fee base: gross − refunds, floored at zero |
//! | 4    | eBay fee: fee base × eBay rate |
//! | 5    | Promoted fee: fee base × promoted rate |
//! | 6    | Payment processing: fee base × processing rate + fixed charge |
//! | 7    | Net: gross − COGS − shipping cost − fees − refunds − taxes − adjustments |
//! | 8    | Margin: net ÷ gross (zero when gross is zero) |
//! | 9    | ASP: item price |
//! | 10   | Waterfall from gross down to net |
//!
//! Percentage fees are charged on gross less refunds, not on gross.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use profit_core::{CalcInput, compute};
//!
//! let input = CalcInput {
//!     item_price: dec!(100),
//!     shipping_charged: dec!(10),
//!     shipping_cost: dec!(5),
//!     cogs: dec!(20),
//!     ebay_fee_pct: dec!(0.13),
//!     promoted_pct: dec!(0.05),
//!     payment_proc_pct: dec!(0.029),
//!     payment_proc_fixed: dec!(0.30),
//!     ..CalcInput::default()
//! };
//!
//! let output = compute(&input).unwrap();
//!
//! assert_eq!(output.gross, dec!(110.00));
//! assert_eq!(output.fees.payment_processing_fee, dec!(3.49));
//! assert_eq!(output.net, dec!(61.71));
//! assert_eq!(output.margin_pct, dec!(0.56));
//! ```

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::calculations::common::{floor_at_zero, round_cents};
use crate::models::{CalcInput, CalcOutput, FeeBreakdown, ValidationError, WaterfallStep};

/// Labels of the waterfall, in order.
pub const WATERFALL_LABELS: [&str; 10] = [
    "Gross",
    "COGS",
    "Shipping Cost",
    "eBay Fee",
    "Promoted Fee",
    "Payment Processing",
    "Refunds",
    "Taxes",
    "Adjustments",
    "Net",
];

/// Computes gross, fees, net, margin and the waterfall for one sale.
///
/// The input is validated first; nothing is computed if any field is out of
/// range. The input is never modified and the output shares nothing with it,
/// so the same input always yields an identical output.
///
/// # Errors
///
/// Returns [`ValidationError`] listing every field that breaks its rule.
///
/// # Example: Zero Gross
///
/// ```
/// use rust_decimal::Decimal;
/// use profit_core::{CalcInput, compute};
///
/// let output = compute(&CalcInput::default()).unwrap();
///
/// assert_eq!(output.gross, Decimal::ZERO);
/// assert_eq!(output.margin_pct, Decimal::ZERO);
/// ```
pub fn compute(input: &CalcInput) -> Result<CalcOutput, ValidationError> {
    input.validate()?;

    let gross = gross(input);
    let refunds = refunds(gross, input.refunds_pct);
    let fee_base = fee_base(gross, refunds);

    let fees = FeeBreakdown {
        ebay_fee: percentage_fee(fee_base, input.ebay_fee_pct),
        promoted_fee: percentage_fee(fee_base, input.promoted_pct),
        payment_processing_fee: payment_processing_fee(
            fee_base,
            input.payment_proc_pct,
            input.payment_proc_fixed,
        ),
        refunds,
    };

    let net = net(gross, input, &fees);
    let margin_pct = margin(net, gross);
    let waterfall = waterfall(gross, net, input, &fees);

    debug!(
        provenance = %input.provenance,
        gross = %gross,
        fees = %fees.total(),
        net = %net,
        margin_pct = %margin_pct,
        "computed sale profit"
    );

    Ok(CalcOutput {
        gross,
        fees,
        shipping_cost: round_cents(input.shipping_cost),
        cogs: round_cents(input.cogs),
        taxes: round_cents(input.taxes),
        adjustments: round_cents(input.adjustments),
        net,
        margin_pct,
        asp: round_cents(input.item_price),
        waterfall,
    })
}

/// Step 1: what the buyer paid, item plus shipping.
fn gross(input: &CalcInput) -> Decimal {
    round_cents(input.item_price + input.shipping_charged)
}

/// Step 2: refunds as a share of gross.
fn refunds(
    gross: Decimal,
    refunds_pct: Decimal,
) -> Decimal {
    round_cents(gross * refunds_pct)
}

/// Step 3: the amount percentage fees are charged on. Not rounded.
fn fee_base(
    gross: Decimal,
    refunds: Decimal,
) -> Decimal {
    let base = gross - refunds;
    if base < Decimal::ZERO {
        warn!(
            gross = %gross,
            refunds = %refunds,
            "Refunds exceed gross; fee base floored at zero"
        );
    }
    floor_at_zero(base)
}

/// Steps 4 and 5: a plain rate applied to the fee base.
fn percentage_fee(
    fee_base: Decimal,
    rate: Decimal,
) -> Decimal {
    round_cents(fee_base * rate)
}

/// Step 6: processing rate plus the fixed per-order charge.
///
/// The fixed charge applies even when the fee base is zero.
fn payment_processing_fee(
    fee_base: Decimal,
    rate: Decimal,
    fixed: Decimal,
) -> Decimal {
    round_cents(fee_base * rate + fixed)
}

/// Step 7: gross less every cost, fee and adjustment.
///
/// Costs, taxes and adjustments enter unrounded; fees are already in cents.
fn net(
    gross: Decimal,
    input: &CalcInput,
    fees: &FeeBreakdown,
) -> Decimal {
    let net = round_cents(
        gross
            - input.cogs
            - input.shipping_cost
            - fees.ebay_fee
            - fees.promoted_fee
            - fees.payment_processing_fee
            - fees.refunds
            - input.taxes
            - input.adjustments,
    );

    if net < Decimal::ZERO {
        warn!(gross = %gross, net = %net, "Sale loses money");
    }

    net
}

/// Step 8: net as a fraction of gross.
fn margin(
    net: Decimal,
    gross: Decimal,
) -> Decimal {
    if gross > Decimal::ZERO {
        round_cents(net / gross)
    } else {
        Decimal::ZERO
    }
}

/// Step 10: gross, each deduction with its running total, then net.
///
/// Each running total is rounded from the previous one plus the rounded
/// delta. The closing `Net` step carries the computed net, so any rounding
/// drift shows up as a gap between the last deduction and `Net`.
fn waterfall(
    gross: Decimal,
    net: Decimal,
    input: &CalcInput,
    fees: &FeeBreakdown,
) -> Vec<WaterfallStep> {
    let deductions = [
        input.cogs,
        input.shipping_cost,
        fees.ebay_fee,
        fees.promoted_fee,
        fees.payment_processing_fee,
        fees.refunds,
        input.taxes,
        input.adjustments,
    ];

    let mut steps = Vec::with_capacity(WATERFALL_LABELS.len());
    steps.push(WaterfallStep::new(WATERFALL_LABELS[0], Decimal::ZERO, gross));

    let mut running = gross;
    for (label, amount) in WATERFALL_LABELS[1..].iter().zip(deductions) {
        let delta = round_cents(-amount);
        running = round_cents(running + delta);
        steps.push(WaterfallStep::new(label, delta, running));
    }

    if running != net {
        debug!(
            running = %running,
            net = %net,
            "Waterfall running total drifted from net"
        );
    }

    steps.push(WaterfallStep::new(WATERFALL_LABELS[9], Decimal::ZERO, net));
    steps
}
