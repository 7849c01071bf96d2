use std::sync::{Mutex, PoisonError};
use std::thread;
use std::time::Instant;

use crossbeam_channel::{unbounded, Receiver};
use kgr_core::errors::{ErrorInfo, KgrError};
use kgr_sweep::{ConfigurationSequence, SchemeArgs};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::executor::RunExecutor;
use crate::gate::TableGate;
use crate::invocation::{Invocation, LaunchSettings};
use crate::report::{DispatchReport, RunReport, RunStatus};

/// How reuse runs are ordered relative to the owner of their table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderingPolicy {
    /// Start order follows the sequence; a reuse run may overlap its owner.
    #[default]
    BestEffort,
    /// A reuse run waits until its owner has exited and is skipped if the
    /// owner failed.
    AwaitOwner,
}

/// Options governing one dispatch.
#[derive(Debug, Clone)]
pub struct DispatchOpts {
    /// Number of concurrent runs.
    pub workers: usize,
    pub settings: LaunchSettings,
    pub ordering: OrderingPolicy,
}

/// Half of the available hardware threads, at least one.
pub fn default_workers() -> usize {
    thread::available_parallelism()
        .map(|n| n.get() / 2)
        .unwrap_or(1)
        .max(1)
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

/// Runs every record of `sequence` through `executor` on a pool of
/// `opts.workers` threads and returns once all workers have stopped.
///
/// Items are taken in sequence order. A worker whose run fails stops taking
/// work; the others carry on with the rest of the queue. Run failures are
/// reported in the returned [`DispatchReport`], not as an `Err`.
pub fn dispatch<P: SchemeArgs>(
    sequence: &ConfigurationSequence<P>,
    opts: &DispatchOpts,
    executor: &dyn RunExecutor,
) -> Result<DispatchReport, KgrError> {
    if opts.workers == 0 {
        return Err(KgrError::domain(
            "dispatch_workers",
            "worker count must be at least one",
        ));
    }
    sequence.validate()?;
    let started = Instant::now();

    let invocations: Vec<Invocation> = sequence
        .records()
        .iter()
        .enumerate()
        .map(|(index, record)| Invocation::build(index, record, &opts.settings))
        .collect();
    let reports = Mutex::new(
        invocations
            .iter()
            .map(|inv| RunReport {
                index: inv.index,
                table_id: inv.table_id,
                is_table_owner: inv.is_table_owner,
                worker: None,
                status: RunStatus::NotAttempted,
            })
            .collect::<Vec<_>>(),
    );

    // Dropping the sender closes the queue once it has drained.
    let (sender, queue) = unbounded();
    for index in 0..invocations.len() {
        sender
            .send(index)
            .map_err(|err| KgrError::Dispatch(ErrorInfo::new("queue_send", err.to_string())))?;
    }
    drop(sender);

    let gate = TableGate::new();
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(opts.workers)
        .thread_name(|i| format!("kgr-worker-{i}"))
        .build()
        .map_err(|err| KgrError::Dispatch(ErrorInfo::new("thread_pool", err.to_string())))?;

    info!(
        runs = invocations.len(),
        workers = opts.workers,
        ordering = ?opts.ordering,
        "dispatch started"
    );
    let worker = Worker {
        invocations: &invocations,
        queue: &queue,
        gate: &gate,
        reports: &reports,
        executor,
        ordering: opts.ordering,
    };
    pool.scope(|scope| {
        for id in 0..opts.workers {
            let worker = &worker;
            scope.spawn(move |_| worker.run(id));
        }
    });

    let runs = reports.into_inner().unwrap_or_else(PoisonError::into_inner);
    let report = DispatchReport {
        workers: opts.workers,
        ordering: opts.ordering,
        runs,
        elapsed_ms: elapsed_ms(started),
    };
    info!(
        completed = report.completed(),
        failed = report.failed(),
        skipped = report.skipped(),
        not_attempted = report.not_attempted(),
        elapsed_ms = report.elapsed_ms,
        "dispatch finished"
    );
    Ok(report)
}

struct Worker<'a> {
    invocations: &'a [Invocation],
    queue: &'a Receiver<usize>,
    gate: &'a TableGate,
    reports: &'a Mutex<Vec<RunReport>>,
    executor: &'a dyn RunExecutor,
    ordering: OrderingPolicy,
}

impl Worker<'_> {
    fn record(&self, index: usize, worker: usize, status: RunStatus) {
        let mut reports = self.reports.lock().unwrap_or_else(PoisonError::into_inner);
        reports[index].worker = Some(worker);
        reports[index].status = status;
    }

    fn run(&self, id: usize) {
        while let Ok(index) = self.queue.recv() {
            let inv = &self.invocations[index];
            if self.ordering == OrderingPolicy::AwaitOwner
                && !inv.is_table_owner
                && !self.gate.wait(inv.table_id)
            {
                warn!(worker = id, index, table = inv.table_id, "owner run failed, skipping");
                self.record(
                    index,
                    id,
                    RunStatus::Skipped {
                        reason: format!("table {} was not built", inv.table_id),
                    },
                );
                continue;
            }

            info!(
                worker = id,
                index,
                table = inv.table_id,
                owner = inv.is_table_owner,
                "run started"
            );
            let started = Instant::now();
            let result = self.executor.execute(inv);
            if inv.is_table_owner {
                self.gate.resolve(inv.table_id, result.is_ok());
            }
            match result {
                Ok(()) => {
                    let elapsed_ms = elapsed_ms(started);
                    info!(worker = id, index, elapsed_ms, "run completed");
                    self.record(index, id, RunStatus::Completed { elapsed_ms });
                }
                Err(err) => {
                    error!(worker = id, index, error = %err, "run failed, worker stopping");
                    self.record(
                        index,
                        id,
                        RunStatus::Failed {
                            error: err.info().clone(),
                        },
                    );
                    break;
                }
            }
        }
    }
}
