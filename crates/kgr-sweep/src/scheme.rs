use std::fmt::Debug;
use std::hash::Hash;

use kgr_core::errors::KgrError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::enumerate::Dimension;

/// Maps a typed record onto the scheme-specific part of the binary's flags.
pub trait SchemeArgs {
    /// `(flag, value)` pairs in wire order, e.g. `("-r", "64")`.
    fn scheme_args(&self) -> Vec<(&'static str, String)>;
}

/// A parameter layout: its dimensions, typed record and table projection.
///
/// The dimension order returned by [`ParameterScheme::dimensions`] is the
/// nesting order of the sweep (outermost first). It decides which record
/// becomes a table owner and therefore every table id and file index.
pub trait ParameterScheme: Serialize {
    /// One sweep point.
    type Params: Clone + Debug + PartialEq + Serialize + DeserializeOwned + SchemeArgs + Send + Sync;
    /// Projection onto the fields that determine table contents.
    type Key: Clone + Debug + Eq + Hash;

    /// Short identifier used in logs and plan files.
    fn name(&self) -> &'static str;

    /// Materialised dimensions in nesting order.
    fn dimensions(&self) -> Result<Vec<Dimension>, KgrError>;

    /// Canonical table-defining key of `params`.
    fn work_key(&self, params: &Self::Params) -> Result<Self::Key, KgrError>;
}

/// Hashable view of an `f64` key component.
///
/// Equality follows `==` on the original values: `-0.0` and `0.0` collapse
/// to one key. Sweep ranges never contain NaN.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FloatKey(u64);

impl FloatKey {
    pub fn new(value: f64) -> Self {
        if value == 0.0 {
            FloatKey(0.0f64.to_bits())
        } else {
            FloatKey(value.to_bits())
        }
    }

    pub fn value(&self) -> f64 {
        f64::from_bits(self.0)
    }
}

/// Formats a real-valued flag the way the external binary has always seen it.
pub(crate) fn fmt_real(value: f64) -> String {
    format!("{value:.6}")
}
