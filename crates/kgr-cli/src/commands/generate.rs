use std::error::Error;
use std::path::{Path, PathBuf};

use clap::Args;
use kgr_core::errors::{ErrorInfo, KgrError};
use kgr_sweep::{build_sequence, load_plan, secret_modulus, ParameterScheme, SweepPlan, SweepSummary};
use tracing::info;

use super::SchemeName;

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Secret bit length used for the table bounds [default: 48, or the plan's value].
    #[arg(long)]
    pub secret_size: Option<u32>,
    /// Output path of the configuration sequence.
    #[arg(long, default_value = "config.json")]
    pub config: PathBuf,
    /// YAML sweep plan. Without one the built-in ranges of `--scheme` are used.
    #[arg(long)]
    pub plan: Option<PathBuf>,
    /// Parameter layout [default: rate]. Must match the plan's scheme when both are given.
    #[arg(long, value_enum)]
    pub scheme: Option<SchemeName>,
}

/// Loads `--plan` or falls back to the built-in ranges of `--scheme`.
fn select_plan(args: &GenerateArgs) -> Result<SweepPlan, KgrError> {
    let Some(path) = &args.plan else {
        let scheme = args.scheme.unwrap_or(SchemeName::Rate);
        return SweepPlan::builtin(scheme.as_str()).ok_or_else(|| {
            KgrError::domain(
                "scheme_unknown",
                format!("no built-in plan for scheme {}", scheme.as_str()),
            )
        });
    };
    let plan = load_plan(path)?;
    match args.scheme {
        Some(scheme) if scheme.as_str() != plan.scheme_name() => Err(KgrError::Domain(
            ErrorInfo::new("scheme_mismatch", "--scheme disagrees with the plan")
                .with_context("scheme", scheme.as_str())
                .with_context("plan_scheme", plan.scheme_name())
                .with_context("plan", path.display().to_string()),
        )),
        _ => Ok(plan),
    }
}

pub fn run(args: &GenerateArgs) -> Result<(), Box<dyn Error>> {
    let plan = select_plan(args)?;
    let plan = match args.secret_size {
        Some(bits) => plan.with_secret_bits(bits),
        None => plan,
    };
    info!(
        scheme = plan.scheme_name(),
        modulus = %secret_modulus(plan.secret_bits()),
        "generating sweep"
    );
    let summary = match &plan {
        SweepPlan::Rate(scheme) => emit(scheme, &args.config)?,
        SweepPlan::Count(scheme) => emit(scheme, &args.config)?,
    };
    info!(
        variants = summary.total,
        tables = summary.tables,
        reuse = summary.reuse,
        plan_hash = %summary.plan_hash,
        path = %args.config.display(),
        "configuration sequence written"
    );
    Ok(())
}

fn emit<S: ParameterScheme>(scheme: &S, out: &Path) -> Result<SweepSummary, KgrError> {
    let outcome = build_sequence(scheme)?;
    outcome.sequence.write_json(out)?;
    Ok(outcome.summary)
}
