pub mod calculations;
pub mod models;

pub use calculations::{compute, with_overrides};
pub use models::*;
