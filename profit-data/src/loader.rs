//! CSV loader for sale records.
//!
//! ## CSV Format
//!
//! Headers are matched by name, so column order does not matter. Every column
//! is optional and an empty cell counts as missing. Whitespace around headers
//! and values is trimmed.
//!
//! | Column | Type | When missing |
//! |----------------------|---------|-------------------------------------|
//! | `item_price` | decimal | `0` |
//! | `shipping_charged` | decimal | `0` |
//! | `shipping_cost` | decimal | `0` |
//! | `cogs` | decimal | `0` |
//! | `ebay_fee_pct` | decimal | fee profile rate, else `0` |
//! | `promoted_pct` | decimal | fee profile rate, else `0` |
//! | `payment_proc_pct` | decimal | fee profile rate, else `0` |
//! | `payment_proc_fixed` | decimal | fee profile rate, else `0` |
//! | `refunds_pct` | decimal | fee profile rate, else `0` |
//! | `taxes` | decimal | `0` |
//! | `adjustments` | decimal | `0` |
//!
//! Every loaded record is tagged with `csv` provenance and validated with the
//! calculator's rules.
//!
//! ### Example
//!
//! ```csv
//! item_price,shipping_charged,shipping_cost,cogs,ebay_fee_pct
//! 100.00,10.00,5.00,20.00,0.13
//! 42.50,0,4.25,12.00,
//! ```

use std::io::Read;
use std::path::{Path, PathBuf};

use profit_core::{CalcInput, Provenance, ValidationError};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::config::FeeProfile;

// ---------------------------------------------------------------------------
// Serde-compatible row that mirrors the CSV layout
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
struct CsvRow {
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    item_price: Option<Decimal>,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    shipping_charged: Option<Decimal>,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    shipping_cost: Option<Decimal>,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    cogs: Option<Decimal>,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    ebay_fee_pct: Option<Decimal>,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    promoted_pct: Option<Decimal>,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    payment_proc_pct: Option<Decimal>,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    payment_proc_fixed: Option<Decimal>,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    refunds_pct: Option<Decimal>,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    taxes: Option<Decimal>,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    adjustments: Option<Decimal>,
}

/// Parses the cell as text so decimals never pass through `f64`.
fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

// ---------------------------------------------------------------------------
// Public error type
// ---------------------------------------------------------------------------

/// Errors that can occur while loading sale records from CSV.
#[derive(Debug, Error)]
pub enum CsvLoadError {
    /// The CSV is structurally invalid or a cell is not a decimal.
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    /// The file could not be read.
    #[error("cannot read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A row parsed but broke a calculator rule. `row` is 1-based, not
    /// counting the header.
    #[error("row {row}: {source}")]
    Invalid {
        row: usize,
        #[source]
        source: ValidationError,
    },
}

// ---------------------------------------------------------------------------
// Loader
// ---------------------------------------------------------------------------

/// Reads sale records from CSV, filling missing rates from a fee profile.
#[derive(Debug, Clone, Default)]
pub struct SaleCsvLoader {
    fees: Option<FeeProfile>,
}

impl SaleCsvLoader {
    /// A loader that treats missing rates as zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// A loader that fills missing rate columns from `fees`.
    pub fn with_fee_profile(fees: FeeProfile) -> Self {
        Self { fees: Some(fees) }
    }

    /// Parse CSV from any reader. Rows are returned in file order.
    ///
    /// # Errors
    ///
    /// * [`CsvLoadError::Parse`] if the CSV is malformed or a cell is not a
    ///   decimal.
    /// * [`CsvLoadError::Invalid`] if a row breaks a calculator rule.
    pub fn load<R: Read>(
        &self,
        reader: R,
    ) -> Result<Vec<CalcInput>, CsvLoadError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .flexible(false)
            .from_reader(reader);

        let inputs = reader
            .deserialize::<CsvRow>()
            .enumerate()
            .map(|(idx, result)| {
                let row = result?;
                self.convert_row(row, idx + 1)
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!(rows = inputs.len(), "loaded sales from CSV");
        Ok(inputs)
    }

    /// Parse CSV text held in memory.
    pub fn load_from_str(
        &self,
        input: &str,
    ) -> Result<Vec<CalcInput>, CsvLoadError> {
        self.load(input.as_bytes())
    }

    /// Read a file from disk and delegate to [`SaleCsvLoader::load`].
    pub fn load_from_file(
        &self,
        path: &Path,
    ) -> Result<Vec<CalcInput>, CsvLoadError> {
        let file = std::fs::File::open(path).map_err(|source| CsvLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.load(file)
    }

    fn convert_row(
        &self,
        row: CsvRow,
        row_number: usize,
    ) -> Result<CalcInput, CsvLoadError> {
        let fees = self.fees.as_ref();

        let input = CalcInput {
            item_price: row.item_price.unwrap_or_default(),
            shipping_charged: row.shipping_charged.unwrap_or_default(),
            shipping_cost: row.shipping_cost.unwrap_or_default(),
            cogs: row.cogs.unwrap_or_default(),
            ebay_fee_pct: or_profile(row.ebay_fee_pct, fees, |p| p.ebay_fee_pct),
            promoted_pct: or_profile(row.promoted_pct, fees, |p| p.promoted_pct),
            payment_proc_pct: or_profile(row.payment_proc_pct, fees, |p| p.payment_proc_pct),
            payment_proc_fixed: or_profile(row.payment_proc_fixed, fees, |p| p.payment_proc_fixed),
            refunds_pct: or_profile(row.refunds_pct, fees, |p| p.refunds_pct),
            taxes: row.taxes.unwrap_or_default(),
            adjustments: row.adjustments.unwrap_or_default(),
            provenance: Provenance::Csv,
        };

        input.validated().map_err(|source| CsvLoadError::Invalid {
            row: row_number,
            source,
        })
    }
}

/// The cell if present, else the profile's rate, else zero.
fn or_profile(
    cell: Option<Decimal>,
    fees: Option<&FeeProfile>,
    pick: impl Fn(&FeeProfile) -> Decimal,
) -> Decimal {
    cell.or_else(|| fees.map(pick)).unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use profit_core::InputField;
    use rust_decimal_macros::dec;

    use super::*;

    const FULL_CSV: &str = "\
item_price,shipping_charged,shipping_cost,cogs,ebay_fee_pct,promoted_pct,payment_proc_pct,payment_proc_fixed,refunds_pct,taxes,adjustments
100.00,10.00,5.00,20.00,0.13,0.05,0.029,0.30,0,1.25,-0.50
";

    const SPARSE_CSV: &str = "\
item_price,cogs,promoted_pct
42.50,12.00,
19.99,,0.02
";

    // -----------------------------------------------------------------------
    // 1. Every column populated
    // -----------------------------------------------------------------------
    #[test]
    fn full_row_maps_every_field() {
        let inputs = SaleCsvLoader::new().load_from_str(FULL_CSV).expect("should parse");

        assert_eq!(
            inputs,
            vec![CalcInput {
                item_price: dec!(100.00),
                shipping_charged: dec!(10.00),
                shipping_cost: dec!(5.00),
                cogs: dec!(20.00),
                ebay_fee_pct: dec!(0.13),
                promoted_pct: dec!(0.05),
                payment_proc_pct: dec!(0.029),
                payment_proc_fixed: dec!(0.30),
                refunds_pct: dec!(0),
                taxes: dec!(1.25),
                adjustments: dec!(-0.50),
                provenance: Provenance::Csv,
            }]
        );
    }

    // -----------------------------------------------------------------------
    // 2. Missing columns and empty cells
    // -----------------------------------------------------------------------
    #[test]
    fn missing_columns_default_to_zero_without_profile() {
        let inputs = SaleCsvLoader::new().load_from_str(SPARSE_CSV).expect("should parse");

        assert_eq!(inputs.len(), 2);
        assert_eq!(inputs[0].item_price, dec!(42.50));
        assert_eq!(inputs[0].cogs, dec!(12.00));
        assert_eq!(inputs[0].promoted_pct, Decimal::ZERO);
        assert_eq!(inputs[0].ebay_fee_pct, Decimal::ZERO);
        assert_eq!(inputs[1].cogs, Decimal::ZERO);
        assert_eq!(inputs[1].promoted_pct, dec!(0.02));
    }

    #[test]
    fn missing_rates_come_from_fee_profile() {
        let loader = SaleCsvLoader::with_fee_profile(FeeProfile::default());

        let inputs = loader.load_from_str(SPARSE_CSV).expect("should parse");

        // Empty cell falls back to the profile
        assert_eq!(inputs[0].promoted_pct, dec!(0));
        assert_eq!(inputs[0].ebay_fee_pct, dec!(0.13));
        assert_eq!(inputs[0].payment_proc_fixed, dec!(0.30));
        // Populated cell wins over the profile
        assert_eq!(inputs[1].promoted_pct, dec!(0.02));
        // Non-rate columns never come from the profile
        assert_eq!(inputs[1].cogs, Decimal::ZERO);
    }

    #[test]
    fn every_row_is_tagged_csv() {
        let inputs = SaleCsvLoader::new().load_from_str(SPARSE_CSV).unwrap();

        assert!(inputs.iter().all(|i| i.provenance == Provenance::Csv));
    }

    // -----------------------------------------------------------------------
    // 3. Validation errors carry the row number
    // -----------------------------------------------------------------------
    #[test]
    fn invalid_row_reports_row_and_fields() {
        let csv = "\
item_price,refunds_pct
10.00,0.5
10.00,1.5
";
        let result = SaleCsvLoader::new().load_from_str(csv);

        match result {
            Err(CsvLoadError::Invalid { row, source }) => {
                assert_eq!(row, 2);
                assert!(source.has_field(InputField::RefundsPct));
            }
            other => panic!("expected Invalid, got {:?}", other),
        }
    }

    #[test]
    fn negative_taxes_are_accepted() {
        let csv = "item_price,taxes\n10.00,-2.00\n";

        let inputs = SaleCsvLoader::new().load_from_str(csv).expect("taxes may be negative");

        assert_eq!(inputs[0].taxes, dec!(-2.00));
    }

    // -----------------------------------------------------------------------
    // 4. Parse errors
    // -----------------------------------------------------------------------
    #[test]
    fn non_numeric_cell_returns_parse_error() {
        let csv = "item_price,cogs\nabc,1.00\n";

        let result = SaleCsvLoader::new().load_from_str(csv);

        assert!(matches!(result, Err(CsvLoadError::Parse(_))));
    }

    #[test]
    fn ragged_row_returns_parse_error() {
        let csv = "item_price,cogs\n10.00,1.00,5\n";

        let result = SaleCsvLoader::new().load_from_str(csv);

        assert!(matches!(result, Err(CsvLoadError::Parse(_))));
    }

    // -----------------------------------------------------------------------
    // 5. Layout tolerance
    // -----------------------------------------------------------------------
    #[test]
    fn header_only_returns_empty_vec() {
        let inputs = SaleCsvLoader::new().load_from_str("item_price,cogs\n").unwrap();

        assert!(inputs.is_empty());
    }

    #[test]
    fn completely_empty_string_returns_empty_vec() {
        let inputs = SaleCsvLoader::new().load_from_str("").unwrap();

        assert!(inputs.is_empty());
    }

    #[test]
    fn whitespace_and_column_order_are_tolerated() {
        let csv = "\
 cogs , item_price
 3.00 , 25.00
";
        let inputs = SaleCsvLoader::new().load_from_str(csv).unwrap();

        assert_eq!(inputs[0].item_price, dec!(25.00));
        assert_eq!(inputs[0].cogs, dec!(3.00));
    }

    #[test]
    fn decimal_precision_is_preserved() {
        let csv = "item_price,payment_proc_pct\n12.345,0.0299\n";

        let inputs = SaleCsvLoader::new().load_from_str(csv).unwrap();

        assert_eq!(inputs[0].item_price, "12.345".parse::<Decimal>().unwrap());
        assert_eq!(inputs[0].payment_proc_pct, "0.0299".parse::<Decimal>().unwrap());
    }

    #[test]
    fn unknown_columns_are_ignored() {
        let csv = "sku,item_price\nABC-1,9.99\n";

        let inputs = SaleCsvLoader::new().load_from_str(csv).unwrap();

        assert_eq!(inputs[0].item_price, dec!(9.99));
    }
}
