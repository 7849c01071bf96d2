use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use kgr_secrets::{create_secrets, SecretsRequest};
use tracing::info;

#[derive(Args, Debug)]
pub struct SecretsArgs {
    /// Secret bit length.
    #[arg(long, default_value_t = 48)]
    pub size: u64,
    /// Number of secrets.
    #[arg(long, default_value_t = 10)]
    pub amount: usize,
    /// Output file, must end in `.bin`.
    #[arg(long, default_value = "secrets.bin")]
    pub path: PathBuf,
}

pub fn run(args: &SecretsArgs) -> Result<(), Box<dyn Error>> {
    let request = SecretsRequest {
        size: args.size,
        amount: args.amount,
        path: args.path.clone(),
    };
    let secrets = create_secrets(&request, &mut rand::rngs::OsRng)?;
    info!(
        amount = secrets.len(),
        size = args.size,
        path = %args.path.display(),
        "secrets written"
    );
    Ok(())
}
