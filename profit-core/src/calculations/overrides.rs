//! What-if scenarios built from an existing input.

use tracing::debug;

use crate::models::{CalcInput, CalcInputOverrides, ValidationError};

/// Returns a copy of `base` with `overrides` applied, validated with the same
/// rules as [`compute`](crate::compute).
///
/// `base` is left untouched. Provenance is kept unless the overrides set it.
///
/// # Errors
///
/// Returns [`ValidationError`] if the merged record breaks any rule.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use profit_core::{CalcInput, CalcInputOverrides, InputField, with_overrides};
///
/// let base = CalcInput {
///     item_price: dec!(100),
///     ..CalcInput::default()
/// };
/// let overrides = CalcInputOverrides::default().with(InputField::RefundsPct, dec!(0.1));
///
/// let scenario = with_overrides(&base, &overrides).unwrap();
///
/// assert_eq!(scenario.refunds_pct, dec!(0.1));
/// assert_eq!(scenario.item_price, dec!(100));
/// assert_eq!(base.refunds_pct, dec!(0));
/// ```
pub fn with_overrides(
    base: &CalcInput,
    overrides: &CalcInputOverrides,
) -> Result<CalcInput, ValidationError> {
    let merged = overrides.merge_onto(base).validated()?;
    debug!(provenance = %merged.provenance, "derived input with overrides");
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::{InputField, Provenance, Rule};

    fn base() -> CalcInput {
        CalcInput {
            item_price: dec!(100),
            shipping_charged: dec!(10),
            shipping_cost: dec!(5),
            cogs: dec!(20),
            ebay_fee_pct: dec!(0.13),
            promoted_pct: dec!(0.05),
            payment_proc_pct: dec!(0.029),
            payment_proc_fixed: dec!(0.30),
            provenance: Provenance::Csv,
            ..CalcInput::default()
        }
    }

    #[test]
    fn override_changes_only_named_field() {
        let base = base();

        for field in InputField::ALL {
            let overrides = CalcInputOverrides::default().with(field, dec!(0.5));

            let merged = with_overrides(&base, &overrides).unwrap();

            let mut expected = base.clone();
            expected.set(field, dec!(0.5));
            assert_eq!(merged, expected, "override {field}");
        }
    }

    #[test]
    fn override_keeps_provenance_unless_set() {
        let base = base();

        let kept = with_overrides(&base, &CalcInputOverrides::default()).unwrap();
        let changed = with_overrides(
            &base,
            &CalcInputOverrides::default().with_provenance(Provenance::Scenario),
        )
        .unwrap();

        assert_eq!(kept.provenance, Provenance::Csv);
        assert_eq!(changed.provenance, Provenance::Scenario);
    }

    #[test]
    fn override_rejects_out_of_range_value() {
        let overrides = CalcInputOverrides::default().with(InputField::RefundsPct, dec!(1.1));

        let result = with_overrides(&base(), &overrides);

        assert_eq!(
            result.unwrap_err().violations[0].rule,
            Rule::Fraction
        );
    }

    #[test]
    fn override_leaves_base_untouched() {
        let base = base();
        let before = base.clone();

        let _ = with_overrides(
            &base,
            &CalcInputOverrides::default().with(InputField::Cogs, dec!(99)),
        )
        .unwrap();

        assert_eq!(base, before);
    }

    #[test]
    fn override_can_repair_invalid_base() {
        let broken = CalcInput {
            cogs: dec!(-1),
            ..base()
        };

        let fixed = with_overrides(
            &broken,
            &CalcInputOverrides::default().with(InputField::Cogs, dec!(1)),
        );

        assert_eq!(fixed.map(|input| input.cogs), Ok(dec!(1)));
    }
}
