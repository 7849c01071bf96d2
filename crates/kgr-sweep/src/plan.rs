use std::fs;
use std::path::Path;

use kgr_core::errors::KgrError;
use serde::{Deserialize, Serialize};

use crate::schemes::{CountScheme, RateScheme};
use crate::serde::{from_yaml_slice, to_yaml_string};

/// Sweep plan as stored on disk, tagged by scheme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "scheme", rename_all = "kebab-case")]
pub enum SweepPlan {
    Rate(RateScheme),
    Count(CountScheme),
}

impl SweepPlan {
    /// Built-in ranges for the named scheme.
    pub fn builtin(scheme: &str) -> Option<Self> {
        match scheme {
            "rate" => Some(SweepPlan::Rate(RateScheme::default())),
            "count" => Some(SweepPlan::Count(CountScheme::default())),
            _ => None,
        }
    }

    pub fn scheme_name(&self) -> &'static str {
        match self {
            SweepPlan::Rate(_) => "rate",
            SweepPlan::Count(_) => "count",
        }
    }

    pub fn secret_bits(&self) -> u32 {
        match self {
            SweepPlan::Rate(scheme) => scheme.secret_bits,
            SweepPlan::Count(scheme) => scheme.secret_bits,
        }
    }

    /// Overrides the secret bit length the table bounds are computed for.
    pub fn with_secret_bits(mut self, bits: u32) -> Self {
        match &mut self {
            SweepPlan::Rate(scheme) => scheme.secret_bits = bits,
            SweepPlan::Count(scheme) => scheme.secret_bits = bits,
        }
        self
    }

    pub fn to_yaml_string(&self) -> Result<String, KgrError> {
        to_yaml_string(self)
    }
}

/// Loads a sweep plan from a YAML file. Omitted ranges fall back to the
/// scheme defaults.
pub fn load_plan<P: AsRef<Path>>(path: P) -> Result<SweepPlan, KgrError> {
    let plan_path = path.as_ref();
    let bytes = fs::read(plan_path).map_err(|err| KgrError::io("plan_read", plan_path, err))?;
    from_yaml_slice(&bytes)
}
