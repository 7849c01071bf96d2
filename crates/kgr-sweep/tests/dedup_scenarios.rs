use std::collections::HashMap;

use kgr_sweep::{
    build_sequence, deduplicate, enumerate, ConfigurationRecord, ConfigurationSequence, Dimension,
    ParamValue, ParameterScheme, Partition, RangeSpec, RateScheme, SchemeArgs,
};
use kgr_core::errors::KgrError;
use proptest::prelude::*;
use serde::{Deserialize, Serialize};

/// Two-dimensional layout whose tables depend on `r` alone.
#[derive(Serialize)]
struct SlogOnly;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct SlogParams {
    r: i64,
    m: f64,
}

impl SchemeArgs for SlogParams {
    fn scheme_args(&self) -> Vec<(&'static str, String)> {
        vec![("-r", self.r.to_string()), ("-m", format!("{:.6}", self.m))]
    }
}

impl ParameterScheme for SlogOnly {
    type Params = SlogParams;
    type Key = i64;

    fn name(&self) -> &'static str {
        "slog-only"
    }

    fn dimensions(&self) -> Result<Vec<Dimension>, KgrError> {
        Ok(vec![
            Dimension::new("r", vec![ParamValue::Int(64), ParamValue::Int(256)]),
            Dimension::new("m", vec![ParamValue::Float(0.1), ParamValue::Float(2.0)]),
        ])
    }

    fn work_key(&self, params: &SlogParams) -> Result<i64, KgrError> {
        Ok(params.r)
    }
}

#[test]
fn two_slog_counts_give_two_tables() {
    let outcome = build_sequence(&SlogOnly).expect("sweep");
    let records = outcome.sequence.records();
    assert_eq!(records.len(), 4);
    assert_eq!(outcome.summary.tables, 2);
    assert_eq!(outcome.summary.reuse, 2);

    let summary: Vec<(i64, f64, usize, bool)> = records
        .iter()
        .map(|rec| (rec.params.r, rec.params.m, rec.table_id, rec.is_table_owner))
        .collect();
    assert_eq!(
        summary,
        vec![
            (64, 0.1, 0, true),
            (256, 0.1, 1, true),
            (64, 2.0, 0, false),
            (256, 2.0, 1, false),
        ]
    );
}

#[test]
fn registry_is_returned_to_the_caller() {
    let points: Vec<SlogParams> = enumerate(&SlogOnly.dimensions().unwrap()).unwrap();
    let (partition, registry) = deduplicate(&SlogOnly, points).expect("dedup");
    assert_eq!(registry.len(), partition.owners.len());
    assert_eq!(registry.table_id(&256), Some(1));
}

#[test]
fn every_deduplication_starts_from_table_zero() {
    let points: Vec<SlogParams> = enumerate(&SlogOnly.dimensions().unwrap()).unwrap();
    let (first, _) = deduplicate(&SlogOnly, points.clone()).expect("dedup");
    let later: Vec<SlogParams> = points.iter().filter(|p| p.m == 2.0).cloned().collect();
    let (second, _) = deduplicate(&SlogOnly, later).expect("dedup");
    assert_eq!(first.owners[0].table_id, 0);
    assert_eq!(second.owners.len(), 2);
    assert_eq!(second.owners[0].table_id, 0);
    assert!(second.reuse.is_empty());
    ConfigurationSequence::from_partition(second).expect("valid sequence");
}

#[test]
fn partition_with_foreign_ids_is_rejected() {
    let record = |r: i64, table_id: usize, is_table_owner: bool| ConfigurationRecord {
        params: SlogParams { r, m: 0.1 },
        table_id,
        is_table_owner,
    };
    // Owner ids continue a previous sweep and the reuse record has no owner.
    let partition = Partition {
        owners: vec![record(512, 10, true)],
        reuse: vec![record(64, 0, false)],
    };
    let err = ConfigurationSequence::from_partition(partition).unwrap_err();
    assert!(matches!(err, KgrError::Schema(_)));
    assert_eq!(err.info().code, "sequence_invariant");
}

#[test]
fn large_security_parameters_still_sweep() {
    // Bounds here exceed 2^64.
    let scheme = RateScheme {
        secret_bits: 160,
        i: RangeSpec::fixed(ParamValue::Float(16.0)),
        ..RateScheme::default()
    };
    let outcome = build_sequence(&scheme).expect("sweep");
    assert_eq!(outcome.summary.total, 12 * 12 * 4 * 4 * 4);
    assert!(outcome.summary.tables > 0);
    assert_eq!(outcome.sequence.validate().unwrap(), outcome.summary.tables);
}

#[test]
fn alpha_only_matters_through_the_bound() {
    // Both alphas truncate to the same bound, so they share every table.
    let scheme = RateScheme {
        secret_bits: 48,
        alpha: RangeSpec::Values {
            values: vec![ParamValue::Float(1.0), ParamValue::Float(1.000001)],
        },
        m: RangeSpec::fixed(ParamValue::Float(0.5)),
        i: RangeSpec::Linear {
            min: 4.0,
            max: 64.0,
            count: 3,
        },
        tame: RangeSpec::fixed(ParamValue::Int(1 << 20)),
        d: RangeSpec::fixed(ParamValue::Int(1)),
        r: RangeSpec::fixed(ParamValue::Int(64)),
    };
    // sqrt(2^48 / 2^20) = 16384, and 16384 * 1.000001 < 16385.
    let outcome = build_sequence(&scheme).expect("sweep");
    assert_eq!(outcome.summary.total, 6);
    assert_eq!(outcome.summary.tables, 1);
    assert!(outcome.sequence.records()[0].is_table_owner);
    assert!(outcome.sequence.records()[1..]
        .iter()
        .all(|rec| !rec.is_table_owner && rec.table_id == 0));
}

#[test]
fn default_rate_plan_sizes() {
    let dims = RateScheme::default().dimensions().unwrap();
    let lens: Vec<usize> = dims.iter().map(|dim| dim.values.len()).collect();
    assert_eq!(lens, vec![12, 12, 24, 4, 4, 4]);
    assert_eq!(kgr_sweep::grid_len(&dims).unwrap(), 221_184);
    let names: Vec<&str> = dims.iter().map(|dim| dim.name.as_str()).collect();
    assert_eq!(names, vec!["alpha", "m", "i", "tame", "d", "r"]);
}

fn pick<T: Clone + std::fmt::Debug + 'static>(pool: Vec<T>) -> impl Strategy<Value = Vec<T>> {
    prop::collection::vec(prop::sample::select(pool), 1..4)
}

fn floats(values: Vec<f64>) -> RangeSpec {
    RangeSpec::Values {
        values: values.into_iter().map(ParamValue::Float).collect(),
    }
}

fn ints(values: Vec<i64>) -> RangeSpec {
    RangeSpec::Values {
        values: values.into_iter().map(ParamValue::Int).collect(),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn every_table_has_exactly_one_owner(
        alpha in pick(vec![0.1, 0.5, 0.9, 1.5]),
        m in pick(vec![0.1, 1.0, 2.0]),
        i in pick(vec![4.0, 32.0]),
        tame in pick(vec![16384i64, 32768, 65536]),
        d in pick(vec![1i64, 4]),
        r in pick(vec![64i64, 128, 256]),
    ) {
        let expected_len = alpha.len() * m.len() * i.len() * tame.len() * d.len() * r.len();
        let scheme = RateScheme {
            secret_bits: 40,
            alpha: floats(alpha),
            m: floats(m),
            i: floats(i),
            tame: ints(tame),
            d: ints(d),
            r: ints(r),
        };
        let outcome = build_sequence(&scheme).unwrap();
        let records = outcome.sequence.records();
        prop_assert_eq!(records.len(), expected_len);

        let tables = outcome.sequence.validate().unwrap();
        prop_assert_eq!(tables, outcome.summary.tables);
        for (pos, rec) in records[..tables].iter().enumerate() {
            prop_assert!(rec.is_table_owner);
            prop_assert_eq!(rec.table_id, pos);
        }

        let mut owner_of = HashMap::new();
        for rec in &records[..tables] {
            let key = scheme.work_key(&rec.params).unwrap();
            prop_assert!(owner_of.insert(key, rec.table_id).is_none());
        }
        for rec in &records[tables..] {
            prop_assert!(!rec.is_table_owner);
            let key = scheme.work_key(&rec.params).unwrap();
            prop_assert_eq!(owner_of.get(&key).copied(), Some(rec.table_id));
        }
    }
}
