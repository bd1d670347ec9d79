//! Plain-text rendering of calculator results and goal progress.

use std::fmt::Write;

use profit_core::{CalcOutput, calculations::common::round_cents};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::tracker::{LogEntry, ProgressSummary};

/// `$1234.50`, `-$25.30`.
pub fn money(value: Decimal) -> String {
    let cents = round_cents(value);
    if cents < Decimal::ZERO {
        format!("-${:.2}", cents.abs())
    } else {
        format!("${:.2}", cents)
    }
}

/// A fraction shown as a percentage: `0.56` becomes `56.00%`.
pub fn percent(fraction: Decimal) -> String {
    format!("{:.2}%", round_cents(fraction * Decimal::ONE_HUNDRED))
}

/// Summary lines, fee lines and the waterfall table.
pub fn render_output(output: &CalcOutput) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Gross:   {}", money(output.gross));
    let _ = writeln!(out, "Net:     {}", money(output.net));
    let _ = writeln!(out, "Margin:  {}", percent(output.margin_pct));
    let _ = writeln!(out, "ASP:     {}", money(output.asp));
    let _ = writeln!(out);

    let fees = &output.fees;
    let _ = writeln!(out, "Fees:");
    for (label, amount) in [
        ("eBay fee", fees.ebay_fee),
        ("Promoted fee", fees.promoted_fee),
        ("Payment processing", fees.payment_processing_fee),
        ("Refunds", fees.refunds),
    ] {
        let _ = writeln!(out, "  {label:<20}{:>12}", money(amount));
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "{:<20}{:>12}{:>14}", "Waterfall", "Change", "Running");
    for step in &output.waterfall {
        let _ = writeln!(
            out,
            "{:<20}{:>12}{:>14}",
            step.label,
            money(step.delta),
            money(step.running_total)
        );
    }
    out
}

/// `Progress: $160.00 / $1000.00 (16.0%), 2 items, net $98.76`.
pub fn render_progress(summary: &ProgressSummary) -> String {
    format!(
        "Progress: {} / {} ({:.1}%), {} item{}, net {}",
        money(summary.gross_progress),
        money(summary.gross_goal),
        summary
            .progress_pct
            .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero),
        summary.items,
        if summary.items == 1 { "" } else { "s" },
        money(summary.net_total)
    )
}

pub fn render_entry(entry: &LogEntry) -> String {
    format!(
        "Logged {} at {}: gross {}, net {}",
        entry.id,
        entry.ts.format("%Y-%m-%d %H:%M:%S"),
        money(entry.gross),
        money(entry.net)
    )
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use profit_core::{CalcInput, compute};
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn money_formats_sign_and_cents() {
        assert_eq!(money(dec!(61.71)), "$61.71");
        assert_eq!(money(dec!(5)), "$5.00");
        assert_eq!(money(dec!(-25.3)), "-$25.30");
        assert_eq!(money(Decimal::ZERO), "$0.00");
    }

    #[test]
    fn money_rounds_half_cents_away_from_zero() {
        assert_eq!(money(dec!(0.125)), "$0.13");
        assert_eq!(money(dec!(-0.125)), "-$0.13");
        assert_eq!(money(dec!(2.345)), "$2.35");
    }

    #[test]
    fn percent_scales_fraction() {
        assert_eq!(percent(dec!(0.56)), "56.00%");
        assert_eq!(percent(dec!(-0.125)), "-12.50%");
        assert_eq!(percent(dec!(0.00125)), "0.13%");
    }

    #[test]
    fn render_output_includes_every_waterfall_label() {
        let output = compute(&CalcInput {
            item_price: dec!(100),
            shipping_charged: dec!(10),
            ..CalcInput::default()
        })
        .unwrap();

        let text = render_output(&output);

        assert!(text.contains("Gross:   $110.00"));
        assert!(text.contains("Margin:  100.00%"));
        for step in &output.waterfall {
            assert!(text.contains(&step.label), "missing {}", step.label);
        }
    }

    #[test]
    fn render_progress_pluralizes_items() {
        let summary = ProgressSummary {
            items: 2,
            gross_goal: dec!(1000),
            gross_progress: dec!(160),
            net_total: dec!(98.76),
            progress_pct: dec!(16),
        };

        assert_eq!(
            render_progress(&summary),
            "Progress: $160.00 / $1000.00 (16.0%), 2 items, net $98.76"
        );
    }

    #[test]
    fn render_progress_rounds_half_percent_up() {
        let summary = ProgressSummary {
            items: 1,
            gross_goal: dec!(1000),
            gross_progress: dec!(162.50),
            net_total: dec!(100),
            progress_pct: dec!(16.25),
        };

        assert!(render_progress(&summary).contains("(16.3%), 1 item, "));
    }
}
