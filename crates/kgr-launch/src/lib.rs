//! Launches the external search binary once per sequence record on a
//! bounded worker pool.

pub mod dispatch;
pub mod executor;
pub mod gate;
pub mod invocation;
pub mod report;

pub use dispatch::{default_workers, dispatch, DispatchOpts, OrderingPolicy};
pub use executor::{OutputMode, ProcessExecutor, RunExecutor};
pub use invocation::{console_path, log_path, table_path, Invocation, LaunchSettings};
pub use report::{DispatchReport, RunReport, RunStatus};
