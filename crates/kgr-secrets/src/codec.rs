//! Binary layout of the secrets resource.
//!
//! ```text
//! u64 BE count
//! repeat count times:
//!     u64 BE length
//!     length bytes: minimal big-endian magnitude (empty for zero)
//! ```

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use kgr_core::errors::{ErrorInfo, KgrError};
use num_bigint::BigUint;
use num_traits::Zero;

const WORD: usize = 8;

fn magnitude(secret: &BigUint) -> Vec<u8> {
    if secret.is_zero() {
        Vec::new()
    } else {
        secret.to_bytes_be()
    }
}

/// Encodes `secrets` into the resource layout.
pub fn encode(secrets: &[BigUint]) -> Vec<u8> {
    let mut out = Vec::with_capacity(WORD + secrets.len() * (WORD + 8));
    out.extend_from_slice(&(secrets.len() as u64).to_be_bytes());
    for secret in secrets {
        let bytes = magnitude(secret);
        out.extend_from_slice(&(bytes.len() as u64).to_be_bytes());
        out.extend_from_slice(&bytes);
    }
    out
}

fn truncated(offset: usize, wanted: u64, available: usize) -> KgrError {
    KgrError::Secrets(
        ErrorInfo::new("secrets_truncated", "secrets resource ends early")
            .with_context("offset", offset.to_string())
            .with_context("wanted", wanted.to_string())
            .with_context("available", available.to_string()),
    )
}

struct Cursor<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> Cursor<'a> {
    fn remaining(&self) -> usize {
        self.bytes.len() - self.offset
    }

    fn take(&mut self, len: u64) -> Result<&'a [u8], KgrError> {
        let available = self.remaining();
        let len = usize::try_from(len)
            .ok()
            .filter(|len| *len <= available)
            .ok_or_else(|| truncated(self.offset, len, available))?;
        let slice = &self.bytes[self.offset..self.offset + len];
        self.offset += len;
        Ok(slice)
    }

    fn word(&mut self) -> Result<u64, KgrError> {
        let slice = self.take(WORD as u64)?;
        let mut buf = [0u8; WORD];
        buf.copy_from_slice(slice);
        Ok(u64::from_be_bytes(buf))
    }
}

/// Decodes a complete resource. Truncated input and trailing bytes are errors.
pub fn decode(bytes: &[u8]) -> Result<Vec<BigUint>, KgrError> {
    let mut cursor = Cursor { bytes, offset: 0 };
    let count = cursor.word()?;
    // Every entry needs at least its length prefix.
    let capacity = usize::try_from(count)
        .unwrap_or(usize::MAX)
        .min(cursor.remaining() / WORD);
    let mut secrets = Vec::with_capacity(capacity);
    for _ in 0..count {
        let len = cursor.word()?;
        secrets.push(BigUint::from_bytes_be(cursor.take(len)?));
    }
    if cursor.remaining() != 0 {
        return Err(KgrError::Secrets(
            ErrorInfo::new("secrets_trailing", "unexpected bytes after the last secret")
                .with_context("offset", cursor.offset.to_string())
                .with_context("trailing", cursor.remaining().to_string()),
        ));
    }
    Ok(secrets)
}

/// Writes `secrets` to `path`, replacing any existing file.
pub fn write_secrets(path: &Path, secrets: &[BigUint]) -> Result<(), KgrError> {
    let file = File::create(path).map_err(|err| KgrError::io("secrets_create", path, err))?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(&encode(secrets))
        .and_then(|()| writer.flush())
        .map_err(|err| KgrError::io("secrets_write", path, err))
}

pub fn read_secrets(path: &Path) -> Result<Vec<BigUint>, KgrError> {
    let bytes = std::fs::read(path).map_err(|err| KgrError::io("secrets_read", path, err))?;
    decode(&bytes).map_err(|err| match err {
        KgrError::Secrets(info) => {
            KgrError::Secrets(info.with_context("path", path.display().to_string()))
        }
        other => other,
    })
}
