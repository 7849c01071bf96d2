use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use kgr_logscan::{render_table, write_csv, LogScanner};
use tracing::info;

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Directory holding the `test-<i>.txt` run logs.
    #[arg(long, default_value = "../experiment-launcher/logs")]
    pub log: PathBuf,
    /// Number of fastest runs to print.
    #[arg(long, default_value_t = 10)]
    pub top: usize,
    /// Also write the full ranking to this CSV file.
    #[arg(long)]
    pub csv: Option<PathBuf>,
}

pub fn run(args: &AnalyzeArgs) -> Result<(), Box<dyn Error>> {
    let scanner = LogScanner::new()?;
    let ranking = scanner.scan_dir(&args.log)?;
    let table = render_table(&ranking, args.top, &args.log)?;
    print!("{table}");
    if let Some(path) = &args.csv {
        write_csv(path, &ranking)?;
        info!(rows = ranking.len(), path = %path.display(), "ranking exported");
    }
    Ok(())
}
