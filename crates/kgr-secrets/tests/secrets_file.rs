use kgr_secrets::{create_secrets, decode, encode, read_secrets, SecretsRequest};
use num_bigint::BigUint;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[test]
fn created_file_reads_back() {
    let dir = tempfile::tempdir().unwrap();
    let request = SecretsRequest {
        size: 48,
        amount: 10,
        path: dir.path().join("nested/secrets.bin"),
    };
    let mut rng = StdRng::seed_from_u64(42);
    let secrets = create_secrets(&request, &mut rng).expect("create");
    assert_eq!(secrets.len(), 10);

    let read = read_secrets(&request.path).expect("read");
    assert_eq!(read, secrets);
    let bytes = std::fs::read(&request.path).unwrap();
    assert_eq!(&bytes[..8], &10u64.to_be_bytes());
}

#[test]
fn invalid_request_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let request = SecretsRequest {
        size: 48,
        amount: 0,
        path: dir.path().join("secrets.bin"),
    };
    let mut rng = StdRng::seed_from_u64(1);
    assert!(create_secrets(&request, &mut rng).is_err());
    assert!(!request.path.exists());
}

#[test]
fn corrupt_file_reports_its_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.bin");
    std::fs::write(&path, [0, 0, 0, 0, 0, 0, 0, 3, 0]).unwrap();
    let err = read_secrets(&path).unwrap_err();
    assert_eq!(err.info().code, "secrets_truncated");
    assert!(err.info().context.contains_key("path"));
}

proptest! {
    #[test]
    fn magnitudes_are_minimal(values in prop::collection::vec(any::<u128>(), 0..16)) {
        let secrets: Vec<BigUint> = values.iter().map(|v| BigUint::from(*v)).collect();
        let bytes = encode(&secrets);
        let mut offset = 8;
        for value in &values {
            let len = u64::from_be_bytes(bytes[offset..offset + 8].try_into().unwrap()) as usize;
            let expected = (128 - value.leading_zeros() as usize).div_ceil(8);
            prop_assert_eq!(len, expected);
            if len > 0 {
                prop_assert_ne!(bytes[offset + 8], 0);
            }
            offset += 8 + len;
        }
        prop_assert_eq!(decode(&bytes).unwrap(), secrets);
    }
}
