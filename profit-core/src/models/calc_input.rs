use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::provenance::Provenance;
use super::validation::{FieldViolation, InputField, ValidationError};

/// One sale, as entered by the seller.
///
/// Amounts are unrounded; rounding only happens inside
/// [`compute`](crate::compute). Rates are decimal proportions, so `0.13`
/// means 13%. Missing fields deserialize to zero (and `manual` provenance).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CalcInput {
    /// Sale price of the item, excluding tax.
    pub item_price: Decimal,
    /// What the buyer paid for shipping.
    pub shipping_charged: Decimal,
    /// What the seller paid for the label.
    pub shipping_cost: Decimal,
    /// Cost of goods sold.
    pub cogs: Decimal,
    /// Marketplace final value fee rate.
    pub ebay_fee_pct: Decimal,
    /// Promoted listing fee rate.
    pub promoted_pct: Decimal,
    /// Payment processing rate.
    pub payment_proc_pct: Decimal,
    /// Payment processing fixed charge per order.
    pub payment_proc_fixed: Decimal,
    /// Fraction of gross refunded, in `[0, 1]`.
    pub refunds_pct: Decimal,
    /// Positive when it reduces what the seller keeps.
    pub taxes: Decimal,
    /// Catch-all: debits positive, credits negative.
    pub adjustments: Decimal,
    pub provenance: Provenance,
}

impl CalcInput {
    /// Returns the value of a numeric field.
    pub fn get(
        &self,
        field: InputField,
    ) -> Decimal {
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

    /// Sets a numeric field without validating it.
    pub fn set(
        &mut self,
        field: InputField,
        value: Decimal,
    ) {
        let slot = match field {
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
        };
        *slot = value;
    }

    /// Checks every field against its rule and against [`MAX_MAGNITUDE`](crate::MAX_MAGNITUDE).
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] listing every field that failed, in record
    /// order.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use profit_core::{CalcInput, InputField};
    ///
    /// let input = CalcInput {
    ///     cogs: dec!(-1),
    ///     refunds_pct: dec!(2),
    ///     ..CalcInput::default()
    /// };
    ///
    /// let error = input.validate().unwrap_err();
    /// assert_eq!(error.violations.len(), 2);
    /// assert!(error.has_field(InputField::Cogs));
    /// assert!(error.has_field(InputField::RefundsPct));
    /// ```
    pub fn validate(&self) -> Result<(), ValidationError> {
        let violations: Vec<FieldViolation> = InputField::ALL
            .into_iter()
            .filter_map(|field| {
                let value = self.get(field);
                let rule = field.violated_rule(value)?;
                Some(FieldViolation { field, value, rule })
            })
            .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { violations })
        }
    }

    /// Consumes the record, returning it unchanged if it is valid.
    pub fn validated(self) -> Result<Self, ValidationError> {
        self.validate()?;
        Ok(self)
    }
}
