//! Pre-generated secrets consumed by the external search binary.

pub mod codec;
pub mod generate;

pub use codec::{decode, encode, read_secrets, write_secrets};
pub use generate::{create_secrets, generate_secrets, SecretsRequest};
