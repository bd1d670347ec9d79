use profit_core::{CalcInputOverrides, InputField};
use rust_decimal::Decimal;
use thiserror::Error;

/// Error returned when a string cannot be parsed as a [`Decimal`].
#[derive(Debug, Error)]
#[error("invalid amount '{input}': {source}")]
pub struct ParseAmountError {
    input: String,
    #[source]
    source: rust_decimal::Error,
}

/// Error returned for a malformed `field=value` override.
#[derive(Debug, Error)]
pub enum OverrideError {
    #[error("override '{0}' must look like field=value")]
    Malformed(String),

    #[error("unknown field '{0}'")]
    UnknownField(String),

    #[error(transparent)]
    Amount(#[from] ParseAmountError),
}

/// Trims whitespace, a leading `$` and thousands separators.
fn normalize_amount_input(s: &str) -> String {
    let trimmed = s.trim();
    let unsigned = trimmed.strip_prefix('-').unwrap_or(trimmed);
    let without_symbol = unsigned.strip_prefix('$').unwrap_or(unsigned).replace(',', "");
    if unsigned.len() != trimmed.len() {
        format!("-{without_symbol}")
    } else {
        without_symbol
    }
}

/// Parses a string into a [`Decimal`].
///
/// Accepts `"1,234.56"`, `"$19.99"` and `"-$2.50"`. Empty or whitespace-only
/// input is treated as 0.
pub fn parse_decimal(s: &str) -> Result<Decimal, ParseAmountError> {
    let normalized = normalize_amount_input(s);
    if normalized.is_empty() {
        return Ok(Decimal::ZERO);
    }
    normalized
        .parse::<Decimal>()
        .or_else(|_| Decimal::from_scientific(&normalized))
        .map_err(|source| ParseAmountError {
            input: s.to_string(),
            source,
        })
}

/// Parses form input the way a numeric field does: anything unparsable is 0.
///
/// Logs a warning when non-empty input had to be discarded.
pub fn parse_amount(s: &str) -> Decimal {
    parse_decimal(s).unwrap_or_else(|e| {
        tracing::warn!(input = %s, "treating unparsable amount as 0: {}", e);
        Decimal::ZERO
    })
}

/// Parses one `field=value` pair. Unlike [`parse_amount`], a bad value is an
/// error rather than zero.
pub fn parse_override(s: &str) -> Result<(InputField, Decimal), OverrideError> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| OverrideError::Malformed(s.to_string()))?;
    let name = name.trim();
    let field = InputField::parse(name).ok_or_else(|| OverrideError::UnknownField(name.to_string()))?;
    Ok((field, parse_decimal(value)?))
}

/// Folds a list of `field=value` pairs into overrides; later pairs win.
pub fn parse_overrides<S: AsRef<str>>(pairs: &[S]) -> Result<CalcInputOverrides, OverrideError> {
    pairs.iter().try_fold(CalcInputOverrides::default(), |acc, pair| {
        let (field, value) = parse_override(pair.as_ref())?;
        Ok(acc.with(field, value))
    })
}
