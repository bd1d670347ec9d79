mod calc_input;
mod calc_output;
mod overrides;
mod provenance;
mod validation;

pub use calc_input::CalcInput;
pub use calc_output::{CalcOutput, FeeBreakdown, WaterfallStep};
pub use overrides::CalcInputOverrides;
pub use provenance::{ParseProvenanceError, Provenance};
pub use validation::{FieldViolation, InputField, MAX_MAGNITUDE, Rule, ValidationError};
