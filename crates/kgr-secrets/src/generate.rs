use std::path::{Path, PathBuf};

use kgr_core::errors::{ErrorInfo, KgrError};
use num_bigint::{BigUint, RandBigInt};
use num_traits::One;
use rand::Rng;
use tracing::info;

use crate::codec::write_secrets;

/// Parameters of one secrets resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretsRequest {
    /// Bit length; secrets are drawn uniformly from `[0, 2^size)`.
    pub size: u64,
    pub amount: usize,
    pub path: PathBuf,
}

impl SecretsRequest {
    pub fn validate(&self) -> Result<(), KgrError> {
        if self.path.extension().and_then(|ext| ext.to_str()) != Some("bin") {
            return Err(KgrError::Secrets(
                ErrorInfo::new("secrets_extension", "secrets filename extension should be .bin")
                    .with_context("path", self.path.display().to_string()),
            ));
        }
        if self.size == 0 {
            return Err(KgrError::domain("secrets_size", "secret size should be more than 0"));
        }
        if self.amount == 0 {
            return Err(KgrError::domain(
                "secrets_amount",
                "amount of secrets should be more than 0",
            ));
        }
        Ok(())
    }
}

/// Draws `amount` uniform secrets below `2^bits`.
pub fn generate_secrets<R: Rng + ?Sized>(
    bits: u64,
    amount: usize,
    rng: &mut R,
) -> Result<Vec<BigUint>, KgrError> {
    if bits == 0 {
        return Err(KgrError::domain("secrets_size", "secret size should be more than 0"));
    }
    let bound = BigUint::one() << bits;
    Ok((0..amount).map(|_| rng.gen_biguint_below(&bound)).collect())
}

/// Validates `request`, generates the secrets and writes them to its path.
pub fn create_secrets<R: Rng + ?Sized>(
    request: &SecretsRequest,
    rng: &mut R,
) -> Result<Vec<BigUint>, KgrError> {
    request.validate()?;
    info!(
        amount = request.amount,
        size = request.size,
        path = %request.path.display(),
        "generating secrets"
    );
    let secrets = generate_secrets(request.size, request.amount, rng)?;
    if let Some(parent) = parent_dir(&request.path) {
        std::fs::create_dir_all(parent).map_err(|err| KgrError::io("secrets_dir", parent, err))?;
    }
    write_secrets(&request.path, &secrets)?;
    Ok(secrets)
}

fn parent_dir(path: &Path) -> Option<&Path> {
    path.parent().filter(|p| !p.as_os_str().is_empty())
}
