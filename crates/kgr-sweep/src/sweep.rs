use kgr_core::errors::KgrError;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dedup::deduplicate;
use crate::enumerate::enumerate;
use crate::serde::stable_hash_string;
use crate::scheme::ParameterScheme;
use crate::sequence::ConfigurationSequence;

/// Counts describing a generated sweep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepSummary {
    pub scheme: String,
    pub plan_hash: String,
    pub total: usize,
    pub tables: usize,
    pub reuse: usize,
}

/// A generated sequence together with its summary.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepOutcome<P> {
    pub sequence: ConfigurationSequence<P>,
    pub summary: SweepSummary,
}

/// Enumerates, deduplicates and orders every point of `scheme`.
///
/// The table registry lives only for the duration of this call.
pub fn build_sequence<S: ParameterScheme>(scheme: &S) -> Result<SweepOutcome<S::Params>, KgrError> {
    let plan_hash = stable_hash_string(scheme)?;
    let dimensions = scheme.dimensions()?;
    let points: Vec<S::Params> = enumerate(&dimensions)?;
    debug!(scheme = scheme.name(), points = points.len(), "enumerated parameter space");

    let (partition, registry) = deduplicate(scheme, points)?;
    let summary = SweepSummary {
        scheme: scheme.name().to_string(),
        plan_hash,
        total: partition.len(),
        tables: registry.len(),
        reuse: partition.reuse.len(),
    };
    Ok(SweepOutcome {
        sequence: ConfigurationSequence::from_partition(partition)?,
        summary,
    })
}
