//! Per-dimension value sequences.
//!
//! Real-valued interpolation computes `min + i * (max - min) / (count - 1)`
//! in `f64`, with the last point pinned to `max`. Integer interpolation
//! computes `min + trunc(i * (max - min) / (count - 1))`, truncating toward
//! zero at every step, so `value[0] == min`, `value[count - 1] == max`, and
//! narrow ranges asked for many steps repeat values.

use kgr_core::errors::{ErrorInfo, KgrError};
use serde::{Deserialize, Serialize};

/// Whether a zero-length range is acceptable to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyRange {
    /// `count == 0` is a domain error.
    #[default]
    Reject,
    /// `count == 0` yields an empty sequence.
    Allow,
}

/// A single value of a tunable dimension.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// Discrete parameter value.
    Int(i64),
    /// Continuous parameter value.
    Float(f64),
}

fn count_error(count: usize) -> KgrError {
    KgrError::Domain(
        ErrorInfo::new("range_count", "interpolated ranges need at least two points")
            .with_context("count", count.to_string())
            .with_hint("use a `values` range for a single fixed value"),
    )
}

fn check_count(count: usize, empty: EmptyRange) -> Result<bool, KgrError> {
    match (count, empty) {
        (0, EmptyRange::Allow) => Ok(false),
        (0, EmptyRange::Reject) | (1, _) => Err(count_error(count)),
        _ => Ok(true),
    }
}

/// Evenly spaced real values from `min` to `max` inclusive.
pub fn linear_f64(min: f64, max: f64, count: usize, empty: EmptyRange) -> Result<Vec<f64>, KgrError> {
    if !min.is_finite() || !max.is_finite() {
        return Err(KgrError::Domain(
            ErrorInfo::new("range_bounds", "range bounds must be finite")
                .with_context("min", min.to_string())
                .with_context("max", max.to_string()),
        ));
    }
    if !check_count(count, empty)? {
        return Ok(Vec::new());
    }
    let last = count - 1;
    let steps = last as f64;
    // The final point is pinned so rounding never moves it off `max`.
    Ok((0..count)
        .map(|i| {
            if i == last {
                max
            } else {
                min + (i as f64 * (max - min) / steps)
            }
        })
        .collect())
}

/// Evenly spaced integers from `min` to `max` inclusive, truncating per step.
pub fn linear_i64(min: i64, max: i64, count: usize, empty: EmptyRange) -> Result<Vec<i64>, KgrError> {
    if !check_count(count, empty)? {
        return Ok(Vec::new());
    }
    let overflow = || {
        KgrError::Domain(
            ErrorInfo::new("range_overflow", "integer range overflows i64")
                .with_context("min", min.to_string())
                .with_context("max", max.to_string())
                .with_context("count", count.to_string()),
        )
    };
    let span = max.checked_sub(min).ok_or_else(overflow)?;
    let steps = i64::try_from(count - 1).map_err(|_| overflow())?;
    (0..steps + 1)
        .map(|i| {
            let offset = i.checked_mul(span).ok_or_else(overflow)? / steps;
            min.checked_add(offset).ok_or_else(overflow)
        })
        .collect()
}

/// `[base * 1, base * 2, ..., base * count]`.
pub fn geometric_f64(base: f64, count: usize) -> Vec<f64> {
    (1..=count).map(|k| base * k as f64).collect()
}

/// `[base * 1, base * 2, ..., base * count]` over integers.
pub fn geometric_i64(base: i64, count: usize) -> Result<Vec<i64>, KgrError> {
    (1..=count)
        .map(|k| {
            i64::try_from(k)
                .ok()
                .and_then(|k| base.checked_mul(k))
                .ok_or_else(|| {
                    KgrError::Domain(
                        ErrorInfo::new("range_overflow", "geometric range overflows i64")
                            .with_context("base", base.to_string())
                            .with_context("count", count.to_string()),
                    )
                })
        })
        .collect()
}

/// Declarative range description used in sweep plans.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum RangeSpec {
    /// Real-valued interpolation.
    Linear { min: f64, max: f64, count: usize },
    /// Truncating integer interpolation.
    LinearInt { min: i64, max: i64, count: usize },
    /// Real multiples of `base`.
    Geometric { base: f64, count: usize },
    /// Integer multiples of `base`.
    GeometricInt { base: i64, count: usize },
    /// Explicit list, typically a single fixed value.
    Values { values: Vec<ParamValue> },
}

impl RangeSpec {
    /// Materialises the range. Sweep dimensions never accept empty ranges.
    pub fn values(&self) -> Result<Vec<ParamValue>, KgrError> {
        let values: Vec<ParamValue> = match self {
            RangeSpec::Linear { min, max, count } => {
                linear_f64(*min, *max, *count, EmptyRange::Reject)?
                    .into_iter()
                    .map(ParamValue::Float)
                    .collect()
            }
            RangeSpec::LinearInt { min, max, count } => {
                linear_i64(*min, *max, *count, EmptyRange::Reject)?
                    .into_iter()
                    .map(ParamValue::Int)
                    .collect()
            }
            RangeSpec::Geometric { base, count } => geometric_f64(*base, *count)
                .into_iter()
                .map(ParamValue::Float)
                .collect(),
            RangeSpec::GeometricInt { base, count } => geometric_i64(*base, *count)?
                .into_iter()
                .map(ParamValue::Int)
                .collect(),
            RangeSpec::Values { values } => values.clone(),
        };
        if values.is_empty() {
            return Err(count_error(0));
        }
        if values
            .iter()
            .any(|value| matches!(value, ParamValue::Float(v) if !v.is_finite()))
        {
            return Err(KgrError::domain("range_value", "range values must be finite"));
        }
        Ok(values)
    }

    /// Shorthand for a fixed single-value dimension.
    pub fn fixed(value: ParamValue) -> Self {
        RangeSpec::Values {
            values: vec![value],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_real_hits_both_ends() {
        let values = linear_f64(0.1, 1.5, 12, EmptyRange::Reject).unwrap();
        assert_eq!(values.len(), 12);
        assert_eq!(values[0], 0.1);
        assert_eq!(values[11], 1.5);
    }

    #[test]
    fn linear_int_truncates_each_step() {
        assert_eq!(
            linear_i64(1, 12, 4, EmptyRange::Reject).unwrap(),
            vec![1, 4, 8, 12]
        );
        assert_eq!(
            linear_i64(0, 2, 5, EmptyRange::Reject).unwrap(),
            vec![0, 0, 1, 1, 2]
        );
        assert_eq!(
            linear_i64(16384, 65536, 4, EmptyRange::Reject).unwrap(),
            vec![16384, 32768, 49152, 65536]
        );
    }

    #[test]
    fn linear_int_truncates_toward_zero_when_descending() {
        assert_eq!(
            linear_i64(2, 0, 5, EmptyRange::Reject).unwrap(),
            vec![2, 2, 1, 1, 0]
        );
    }

    #[test]
    fn count_one_is_a_domain_error() {
        let err = linear_f64(1.0, 2.0, 1, EmptyRange::Allow).unwrap_err();
        assert_eq!(err.info().code, "range_count");
        assert!(linear_i64(1, 2, 1, EmptyRange::Allow).is_err());
    }

    #[test]
    fn count_zero_depends_on_caller() {
        assert!(linear_f64(1.0, 2.0, 0, EmptyRange::Reject).is_err());
        assert!(linear_f64(1.0, 2.0, 0, EmptyRange::Allow).unwrap().is_empty());
        assert!(linear_i64(1, 2, 0, EmptyRange::Allow).unwrap().is_empty());
    }

    #[test]
    fn geometric_multiplies_base() {
        assert_eq!(geometric_i64(65536, 3).unwrap(), vec![65536, 131072, 196608]);
        assert_eq!(geometric_f64(0.5, 2), vec![0.5, 1.0]);
        assert!(geometric_i64(i64::MAX, 2).is_err());
    }

    #[test]
    fn spec_rejects_empty_values() {
        let spec = RangeSpec::Values { values: vec![] };
        assert!(spec.values().is_err());
        let fixed = RangeSpec::fixed(ParamValue::Int(7));
        assert_eq!(fixed.values().unwrap(), vec![ParamValue::Int(7)]);
    }
}
