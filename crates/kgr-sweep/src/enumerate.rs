use kgr_core::errors::{ErrorInfo, KgrError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::range::ParamValue;

/// One tunable dimension with its materialised values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dimension {
    pub name: String,
    pub values: Vec<ParamValue>,
}

impl Dimension {
    pub fn new(name: impl Into<String>, values: Vec<ParamValue>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }
}

/// Number of points in the cartesian product of `dimensions`.
pub fn grid_len(dimensions: &[Dimension]) -> Result<usize, KgrError> {
    dimensions.iter().try_fold(1usize, |acc, dim| {
        acc.checked_mul(dim.values.len()).ok_or_else(|| {
            KgrError::Domain(
                ErrorInfo::new("grid_overflow", "parameter space is too large to enumerate")
                    .with_context("dimension", dim.name.clone()),
            )
        })
    })
}

/// Enumerates the cartesian product of `dimensions` in nested-loop order.
///
/// The first dimension is the outermost loop and the last one varies
/// fastest. Each point is decoded into `P` by dimension name.
pub fn enumerate<P: DeserializeOwned>(dimensions: &[Dimension]) -> Result<Vec<P>, KgrError> {
    let total = grid_len(dimensions)?;
    let mut records = Vec::with_capacity(total);
    let mut cursor = vec![0usize; dimensions.len()];
    for _ in 0..total {
        let mut point = Map::with_capacity(dimensions.len());
        for (dim, &pos) in dimensions.iter().zip(&cursor) {
            let value = serde_json::to_value(dim.values[pos])
                .map_err(|err| KgrError::schema("point_encode", err))?;
            point.insert(dim.name.clone(), value);
        }
        let record = serde_json::from_value(Value::Object(point)).map_err(|err| {
            KgrError::Schema(
                ErrorInfo::new("point_decode", err.to_string())
                    .with_context("position", records.len().to_string()),
            )
        })?;
        records.push(record);
        advance(&mut cursor, dimensions);
    }
    Ok(records)
}

fn advance(cursor: &mut [usize], dimensions: &[Dimension]) {
    for (slot, dim) in cursor.iter_mut().zip(dimensions).rev() {
        *slot += 1;
        if *slot < dim.values.len() {
            return;
        }
        *slot = 0;
    }
}
