use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Where a [`CalcInput`](crate::CalcInput) came from.
///
/// Carried through untouched for traceability; it never changes the arithmetic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    #[default]
    Manual,
    Csv,
    Scenario,
}

impl Provenance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Csv => "csv",
            Self::Scenario => "scenario",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "manual" => Some(Self::Manual),
            "csv" => Some(Self::Csv),
            "scenario" => Some(Self::Scenario),
            _ => None,
        }
    }
}

impl fmt::Display for Provenance {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not one of `manual`, `csv` or `scenario`.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unrecognised provenance '{0}' (expected manual, csv or scenario)")]
pub struct ParseProvenanceError(pub String);

impl FromStr for Provenance {
    type Err = ParseProvenanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s.trim()).ok_or_else(|| ParseProvenanceError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parse_accepts_every_code() {
        let cases = [
            ("manual", Provenance::Manual),
            ("csv", Provenance::Csv),
            ("scenario", Provenance::Scenario),
        ];

        for (code, expected) in cases {
            assert_eq!(Provenance::parse(code), Some(expected), "code '{code}'");
            assert_eq!(expected.as_str(), code);
        }
    }

    #[test]
    fn parse_is_case_sensitive() {
        assert_eq!(Provenance::parse("CSV"), None);
    }

    #[test]
    fn from_str_trims_and_reports_bad_value() {
        assert_eq!(" csv ".parse::<Provenance>(), Ok(Provenance::Csv));
        assert_eq!(
            "upload".parse::<Provenance>(),
            Err(ParseProvenanceError("upload".to_string()))
        );
    }

    #[test]
    fn default_is_manual() {
        assert_eq!(Provenance::default(), Provenance::Manual);
    }

    #[test]
    fn serializes_lowercase() {
        let json = serde_json::to_string(&Provenance::Scenario).unwrap();

        assert_eq!(json, "\"scenario\"");
    }
}
