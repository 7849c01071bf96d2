use kgr_core::errors::KgrError;
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

use crate::bound::table_bound;
use crate::enumerate::Dimension;
use crate::range::RangeSpec;
use crate::scheme::{fmt_real, FloatKey, ParameterScheme, SchemeArgs};

/// Multiplier / tame / rate layout written by the sweep generator.
///
/// Nesting order (outermost first): `alpha`, `m`, `i`, `tame`, `d`, `r`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateScheme {
    /// Bit length of the secrets the sweep targets.
    pub secret_bits: u32,
    /// Step bound multiplier.
    pub alpha: RangeSpec,
    /// Upper bound multiplier for preprocessing slogs.
    pub m: RangeSpec,
    /// Maximum number of steps.
    pub i: RangeSpec,
    /// Number of tame kangaroos.
    pub tame: RangeSpec,
    /// N / T rate.
    pub d: RangeSpec,
    /// Number of slogs for preprocessing.
    pub r: RangeSpec,
}

impl Default for RateScheme {
    fn default() -> Self {
        Self {
            secret_bits: 48,
            alpha: RangeSpec::Linear {
                min: 0.1,
                max: 1.5,
                count: 12,
            },
            m: RangeSpec::Linear {
                min: 0.1,
                max: 2.0,
                count: 12,
            },
            i: RangeSpec::Linear {
                min: 4.0,
                max: 64.0,
                count: 24,
            },
            tame: RangeSpec::LinearInt {
                min: 16384,
                max: 65536,
                count: 4,
            },
            d: RangeSpec::LinearInt {
                min: 1,
                max: 12,
                count: 4,
            },
            r: RangeSpec::LinearInt {
                min: 64,
                max: 256,
                count: 4,
            },
        }
    }
}

/// One point of a [`RateScheme`] sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateParams {
    pub r: i64,
    pub alpha: f64,
    pub m: f64,
    pub tame: i64,
    pub d: i64,
    pub i: f64,
}

/// Table-defining projection of [`RateParams`]; `alpha` only enters through `w`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RateKey {
    pub w: BigUint,
    pub d: i64,
    pub m: FloatKey,
    pub r: i64,
    pub tame: i64,
}

impl ParameterScheme for RateScheme {
    type Params = RateParams;
    type Key = RateKey;

    fn name(&self) -> &'static str {
        "rate"
    }

    fn dimensions(&self) -> Result<Vec<Dimension>, KgrError> {
        Ok(vec![
            Dimension::new("alpha", self.alpha.values()?),
            Dimension::new("m", self.m.values()?),
            Dimension::new("i", self.i.values()?),
            Dimension::new("tame", self.tame.values()?),
            Dimension::new("d", self.d.values()?),
            Dimension::new("r", self.r.values()?),
        ])
    }

    fn work_key(&self, params: &RateParams) -> Result<RateKey, KgrError> {
        Ok(RateKey {
            w: table_bound(params.alpha, self.secret_bits, params.tame)?,
            d: params.d,
            m: FloatKey::new(params.m),
            r: params.r,
            tame: params.tame,
        })
    }
}

impl SchemeArgs for RateParams {
    fn scheme_args(&self) -> Vec<(&'static str, String)> {
        vec![
            ("-r", self.r.to_string()),
            ("-a", fmt_real(self.alpha)),
            ("-m", fmt_real(self.m)),
            ("-i", fmt_real(self.i)),
            ("-t", self.tame.to_string()),
            ("-d", self.d.to_string()),
        ]
    }
}
