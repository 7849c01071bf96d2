use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::{Args, ValueEnum};
use kgr_core::errors::KgrError;
use kgr_launch::{
    default_workers, dispatch, DispatchOpts, DispatchReport, LaunchSettings, OrderingPolicy,
    OutputMode, ProcessExecutor,
};
use kgr_sweep::{ConfigurationSequence, CountParams, RateParams, SchemeArgs};
use serde::de::DeserializeOwned;
use tracing::{info, warn};

use super::SchemeName;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Ordering {
    /// Reuse runs may overlap the run building their table.
    BestEffort,
    /// Reuse runs wait for their table and are skipped if it was not built.
    AwaitOwner,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Output {
    /// Child output goes to `<log>/test-<i>.console.log`.
    Capture,
    /// Child output shares this process's streams.
    Inherit,
}

#[derive(Args, Debug)]
pub struct LaunchArgs {
    /// Concurrent runs [default: half the available cores].
    #[arg(long)]
    pub cpu: Option<usize>,
    /// Configuration sequence written by `generate`.
    #[arg(long, default_value = "config.json")]
    pub config: PathBuf,
    /// Search binary.
    #[arg(long = "bin", default_value = "binary/test")]
    pub binary: PathBuf,
    /// Directory for per-run logs.
    #[arg(long = "log", default_value = "logs")]
    pub logs: PathBuf,
    /// Directory for per-run tables.
    #[arg(long = "table", default_value = "tables")]
    pub tables: PathBuf,
    #[arg(long, default_value_t = 48)]
    pub secrets_size: u32,
    #[arg(long, default_value = "binary/secrets.bin")]
    pub secrets_path: PathBuf,
    /// Record layout of the configuration sequence.
    #[arg(long, value_enum, default_value_t = SchemeName::Rate)]
    pub scheme: SchemeName,
    #[arg(long, value_enum, default_value_t = Ordering::BestEffort)]
    pub ordering: Ordering,
    #[arg(long, value_enum, default_value_t = Output::Capture)]
    pub output: Output,
    /// Optional path for the JSON dispatch report.
    #[arg(long)]
    pub report: Option<PathBuf>,
}

impl LaunchArgs {
    fn opts(&self) -> DispatchOpts {
        DispatchOpts {
            workers: self.cpu.unwrap_or_else(default_workers),
            settings: LaunchSettings {
                binary: self.binary.clone(),
                logs_dir: self.logs.clone(),
                tables_dir: self.tables.clone(),
                secret_size: self.secrets_size,
                secrets_path: self.secrets_path.clone(),
            },
            ordering: match self.ordering {
                Ordering::BestEffort => OrderingPolicy::BestEffort,
                Ordering::AwaitOwner => OrderingPolicy::AwaitOwner,
            },
        }
    }

    fn executor(&self) -> ProcessExecutor {
        ProcessExecutor::new(match self.output {
            Output::Capture => OutputMode::Capture,
            Output::Inherit => OutputMode::Inherit,
        })
    }
}

/// Setup problems are returned as errors. Failed runs are only logged and
/// reported; the command still succeeds.
pub fn run(args: &LaunchArgs) -> Result<(), Box<dyn Error>> {
    for dir in [&args.logs, &args.tables] {
        fs::create_dir_all(dir).map_err(|err| KgrError::io("launch_dir", dir, err))?;
    }
    let report = match args.scheme {
        SchemeName::Rate => launch_sequence::<RateParams>(args)?,
        SchemeName::Count => launch_sequence::<CountParams>(args)?,
    };
    if let Some(path) = &args.report {
        report.write_json(path)?;
        info!(path = %path.display(), "dispatch report written");
    }
    if report.failed() > 0 {
        warn!(
            failed = ?report.failed_indices(),
            not_attempted = report.not_attempted(),
            "some runs did not complete"
        );
    }
    Ok(())
}

fn launch_sequence<P: SchemeArgs + DeserializeOwned>(
    args: &LaunchArgs,
) -> Result<DispatchReport, KgrError> {
    let sequence = ConfigurationSequence::<P>::read_json(&args.config)?;
    info!(
        records = sequence.len(),
        tables = sequence.table_count(),
        path = %args.config.display(),
        "configuration sequence loaded"
    );
    dispatch(&sequence, &args.opts(), &args.executor())
}
