//! Sweep generation for the kangaroo experiment tooling.
//!
//! Data flows range generation -> enumeration -> deduplication -> ordered
//! sequence, which the launcher later reads back from disk.

pub mod bound;
pub mod dedup;
pub mod enumerate;
pub mod plan;
pub mod range;
pub mod scheme;
pub mod schemes;
pub mod sequence;
pub mod serde;
mod sweep;

pub use bound::{secret_modulus, table_bound};
pub use dedup::{deduplicate, Assignment, Partition, TableRegistry};
pub use enumerate::{enumerate, grid_len, Dimension};
pub use self::serde::stable_hash_string;
pub use plan::{load_plan, SweepPlan};
pub use range::{geometric_f64, geometric_i64, linear_f64, linear_i64, EmptyRange, ParamValue, RangeSpec};
pub use scheme::{FloatKey, ParameterScheme, SchemeArgs};
pub use schemes::{CountKey, CountParams, CountScheme, RateKey, RateParams, RateScheme};
pub use sequence::{ConfigurationRecord, ConfigurationSequence};
pub use sweep::{build_sequence, SweepOutcome, SweepSummary};
