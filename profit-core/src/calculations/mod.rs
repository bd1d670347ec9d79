//! Profit calculation for a single marketplace sale.
//!
//! [`compute`] turns a [`CalcInput`](crate::CalcInput) into a
//! [`CalcOutput`](crate::CalcOutput); [`with_overrides`] derives what-if
//! inputs from an existing one.

pub mod calculator;
pub mod common;
pub mod overrides;

pub use calculator::{WATERFALL_LABELS, compute};
pub use overrides::with_overrides;
