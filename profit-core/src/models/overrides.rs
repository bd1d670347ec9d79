use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::calc_input::CalcInput;
use super::provenance::Provenance;
use super::validation::InputField;

/// A partial [`CalcInput`]: `Some` fields replace the base value, `None`
/// fields keep it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CalcInputOverrides {
    pub item_price: Option<Decimal>,
    pub shipping_charged: Option<Decimal>,
    pub shipping_cost: Option<Decimal>,
    pub cogs: Option<Decimal>,
    pub ebay_fee_pct: Option<Decimal>,
    pub promoted_pct: Option<Decimal>,
    pub payment_proc_pct: Option<Decimal>,
    pub payment_proc_fixed: Option<Decimal>,
    pub refunds_pct: Option<Decimal>,
    pub taxes: Option<Decimal>,
    pub adjustments: Option<Decimal>,
    pub provenance: Option<Provenance>,
}

impl CalcInputOverrides {
    /// Builder-style setter for a single numeric field.
    pub fn with(
        mut self,
        field: InputField,
        value: Decimal,
    ) -> Self {
        *self.slot(field) = Some(value);
        self
    }

    pub fn with_provenance(
        mut self,
        provenance: Provenance,
    ) -> Self {
        self.provenance = Some(provenance);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Shallow merge onto `base`. Does not validate.
    pub(crate) fn merge_onto(
        &self,
        base: &CalcInput,
    ) -> CalcInput {
        let mut merged = base.clone();
        for field in InputField::ALL {
            if let Some(value) = self.get(field) {
                merged.set(field, value);
            }
        }
        if let Some(provenance) = self.provenance {
            merged.provenance = provenance;
        }
        merged
    }

    fn get(
        &self,
        field: InputField,
    ) -> Option<Decimal> {
        match field {
            InputField::ItemPrice => self.item_price,
            InputField::ShippingCharged => self.shipping_charged,
            InputField::ShippingCost => self.shipping_cost,
            InputField::Cogs => self.cogs,
            InputField::EbayFeePct => self.ebay_fee_pct,
            InputField::PromotedPct => self.promoted_pct,
            InputField::PaymentProcPct => self.payment_proc_pct,
            InputField::PaymentProcFixed => self.payment_proc_fixed,
            InputField::RefundsPct => self.refunds_pct,
            InputField::Taxes => self.taxes,
            InputField::Adjustments => self.adjustments,
        }
    }

    fn slot(
        &mut self,
        field: InputField,
    ) -> &mut Option<Decimal> {
        match field {
            InputField::ItemPrice => &mut self.item_price,
            InputField::ShippingCharged => &mut self.shipping_charged,
            InputField::ShippingCost => &mut self.shipping_cost,
            InputField::Cogs => &mut self.cogs,
            InputField::EbayFeePct => &mut self.ebay_fee_pct,
            InputField::PromotedPct => &mut self.promoted_pct,
            InputField::PaymentProcPct => &mut self.payment_proc_pct,
            InputField::PaymentProcFixed => &mut self.payment_proc_fixed,
            InputField::RefundsPct => &mut self.refunds_pct,
            InputField::Taxes => &mut self.taxes,
            InputField::Adjustments => &mut self.adjustments,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn empty_overrides_merge_to_base() {
        let base = CalcInput {
            item_price: dec!(40),
            taxes: dec!(2.10),
            ..CalcInput::default()
        };

        let overrides = CalcInputOverrides::default();

        assert!(overrides.is_empty());
        assert_eq!(overrides.merge_onto(&base), base);
    }

    #[test]
    fn with_sets_only_named_field() {
        let overrides = CalcInputOverrides::default().with(InputField::Cogs, dec!(7.25));

        assert_eq!(overrides.cogs, Some(dec!(7.25)));
        assert_eq!(overrides.item_price, None);
        assert!(!overrides.is_empty());
    }

    #[test]
    fn merge_replaces_provenance_when_given() {
        let base = CalcInput::default();
        let overrides = CalcInputOverrides::default().with_provenance(Provenance::Scenario);

        assert_eq!(overrides.merge_onto(&base).provenance, Provenance::Scenario);
    }
}
