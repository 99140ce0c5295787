//! Deferred execution seam

use std::time::Duration;

/// A one-shot deferred task
pub type Task = Box<dyn FnOnce()>;

/// Hosts able to run a task later.
///
/// A zero delay still defers the task to a later turn of the host's event
/// loop; implementations must never run `task` synchronously inside
/// `schedule`.
pub trait Scheduler {
    fn schedule(&self, delay: Duration, task: Task);
}
