//! Parameter layouts understood by the external binary.

mod count;
mod rate;

pub use count::{CountKey, CountParams, CountScheme};
pub use rate::{RateKey, RateParams, RateScheme};
