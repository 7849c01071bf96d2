use kgr_core::errors::KgrError;
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

use crate::bound::table_bound;
use crate::enumerate::Dimension;
use crate::range::RangeSpec;
use crate::scheme::{fmt_real, FloatKey, ParameterScheme, SchemeArgs};

/// Count / width layout read by the experiment launcher.
///
/// `d` is a real rate passed through `-i`, `c` an integer count passed
/// through `-d`. Nesting order (outermost first): `alpha`, `m`, `d`,
/// `tame`, `c`, `r`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CountScheme {
    pub secret_bits: u32,
    pub alpha: RangeSpec,
    pub m: RangeSpec,
    pub d: RangeSpec,
    pub tame: RangeSpec,
    pub c: RangeSpec,
    pub r: RangeSpec,
}

impl Default for CountScheme {
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
            d: RangeSpec::Linear {
                min: 4.0,
                max: 64.0,
                count: 24,
            },
            tame: RangeSpec::LinearInt {
                min: 16384,
                max: 65536,
                count: 4,
            },
            c: RangeSpec::LinearInt {
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

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountParams {
    pub r: i64,
    pub alpha: f64,
    pub m: f64,
    pub tame: i64,
    pub c: i64,
    pub d: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CountKey {
    pub w: BigUint,
    pub c: i64,
    pub m: FloatKey,
    pub r: i64,
    pub tame: i64,
}

impl ParameterScheme for CountScheme {
    type Params = CountParams;
    type Key = CountKey;

    fn name(&self) -> &'static str {
        "count"
    }

    fn dimensions(&self) -> Result<Vec<Dimension>, KgrError> {
        Ok(vec![
            Dimension::new("alpha", self.alpha.values()?),
            Dimension::new("m", self.m.values()?),
            Dimension::new("d", self.d.values()?),
            Dimension::new("tame", self.tame.values()?),
            Dimension::new("c", self.c.values()?),
            Dimension::new("r", self.r.values()?),
        ])
    }

    fn work_key(&self, params: &CountParams) -> Result<CountKey, KgrError> {
        Ok(CountKey {
            w: table_bound(params.alpha, self.secret_bits, params.tame)?,
            c: params.c,
            m: FloatKey::new(params.m),
            r: params.r,
            tame: params.tame,
        })
    }
}

impl SchemeArgs for CountParams {
    fn scheme_args(&self) -> Vec<(&'static str, String)> {
        vec![
            ("-r", self.r.to_string()),
            ("-a", fmt_real(self.alpha)),
            ("-m", fmt_real(self.m)),
            ("-i", fmt_real(self.d)),
            ("-t", self.tame.to_string()),
            ("-d", self.c.to_string()),
        ]
    }
}
