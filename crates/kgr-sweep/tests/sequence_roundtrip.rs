use std::path::PathBuf;

use kgr_sweep::{
    build_sequence, load_plan, ConfigurationSequence, CountParams, CountScheme, RateParams,
    SweepPlan,
};

fn fixture_path(relative: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join(relative)
}

#[test]
fn sequence_survives_disk_roundtrip() {
    let plan = load_plan(fixture_path("plans/rate-smoke.yaml")).expect("plan");
    let SweepPlan::Rate(scheme) = plan else {
        panic!("fixture is a rate plan");
    };
    let outcome = build_sequence(&scheme).expect("sweep");
    assert_eq!(outcome.sequence.len(), 2 * 2 * 2 * 2);

    let temp = tempfile::tempdir().expect("tmp dir");
    let path = temp.path().join("nested").join("config.json");
    outcome.sequence.write_json(&path).expect("write");
    let restored = ConfigurationSequence::<RateParams>::read_json(&path).expect("read");
    assert_eq!(restored, outcome.sequence);
}

#[test]
fn persisted_records_use_wire_field_names() {
    let outcome = build_sequence(&CountScheme {
        alpha: kgr_sweep::RangeSpec::fixed(kgr_sweep::ParamValue::Float(0.5)),
        m: kgr_sweep::RangeSpec::fixed(kgr_sweep::ParamValue::Float(1.0)),
        d: kgr_sweep::RangeSpec::fixed(kgr_sweep::ParamValue::Float(8.0)),
        tame: kgr_sweep::RangeSpec::fixed(kgr_sweep::ParamValue::Int(16384)),
        c: kgr_sweep::RangeSpec::fixed(kgr_sweep::ParamValue::Int(3)),
        r: kgr_sweep::RangeSpec::fixed(kgr_sweep::ParamValue::Int(64)),
        ..CountScheme::default()
    })
    .expect("sweep");
    let temp = tempfile::tempdir().expect("tmp dir");
    let path = temp.path().join("config.json");
    outcome.sequence.write_json(&path).expect("write");

    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).expect("read")).expect("json");
    let first = &value.as_array().expect("array")[0];
    assert_eq!(first["tableNum"], 0);
    assert_eq!(first["allowWriteTable"], true);
    assert_eq!(first["c"], 3);
    assert_eq!(first["d"], 8.0);
    assert_eq!(first["tame"], 16384);

    let restored = ConfigurationSequence::<CountParams>::read_json(&path).expect("read back");
    assert_eq!(restored.records()[0].params.c, 3);
}

#[test]
fn hand_edited_sequences_are_validated_on_read() {
    let temp = tempfile::tempdir().expect("tmp dir");
    let path = temp.path().join("config.json");
    std::fs::write(
        &path,
        r#"[{"r":64,"alpha":0.5,"m":1.0,"tame":16384,"d":1,"i":4.0,"tableNum":0,"allowWriteTable":false}]"#,
    )
    .expect("write");
    let err = ConfigurationSequence::<RateParams>::read_json(&path).unwrap_err();
    assert_eq!(err.info().code, "sequence_invariant");
}

#[test]
fn plans_round_trip_through_yaml() {
    let plan = load_plan(fixture_path("plans/count-default.yaml")).expect("plan");
    assert_eq!(plan, SweepPlan::Count(CountScheme::default()));
    let yaml = plan.to_yaml_string().expect("yaml");
    let reparsed: SweepPlan = kgr_sweep::serde::from_yaml_slice(yaml.as_bytes()).expect("reparse");
    assert_eq!(reparsed, plan);
    assert_eq!(reparsed.clone().with_secret_bits(40).secret_bits(), 40);
}

#[test]
fn partial_plans_fall_back_to_defaults() {
    let plan: SweepPlan =
        kgr_sweep::serde::from_yaml_slice(b"scheme: rate\nsecret_bits: 40\n").expect("plan");
    let SweepPlan::Rate(scheme) = plan else {
        panic!("rate plan expected");
    };
    assert_eq!(scheme.secret_bits, 40);
    assert_eq!(scheme.alpha, kgr_sweep::RateScheme::default().alpha);
}
