use std::collections::HashMap;
use std::sync::{Condvar, Mutex, PoisonError};

/// Per-table completion signal shared by the workers.
///
/// Owner runs resolve their table once the binary has exited; reuse runs
/// may wait on that resolution before starting.
#[derive(Default)]
pub struct TableGate {
    resolved: Mutex<HashMap<usize, bool>>,
    changed: Condvar,
}

impl TableGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records whether the owner run of `table_id` produced its table.
    pub fn resolve(&self, table_id: usize, built: bool) {
        self.resolved
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(table_id, built);
        self.changed.notify_all();
    }

    /// Blocks until `table_id` is resolved and reports whether it was built.
    pub fn wait(&self, table_id: usize) -> bool {
        let mut resolved = self.resolved.lock().unwrap_or_else(PoisonError::into_inner);
        loop {
            if let Some(built) = resolved.get(&table_id) {
                return *built;
            }
            resolved = self
                .changed
                .wait(resolved)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn waiter_sees_resolution() {
        let gate = Arc::new(TableGate::new());
        let waiter = {
            let gate = Arc::clone(&gate);
            thread::spawn(move || gate.wait(4))
        };
        gate.resolve(3, true);
        gate.resolve(4, false);
        assert!(!waiter.join().unwrap());
        assert!(gate.wait(3));
    }
}
