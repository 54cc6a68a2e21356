//! chirpbot-sched: recurring task scheduling.
//!
//! A min-heap of due times drives any number of periodic tasks on a single
//! tokio task, so task bodies never overlap and fire in nondecreasing
//! due-time order.

pub mod scheduler;

pub use scheduler::Scheduler;

use async_trait::async_trait;

/// A unit of recurring work driven by the [`Scheduler`].
///
/// `run` is invoked to completion before any other task can fire; a slow
/// or blocking body delays every other task. Returned errors are logged
/// by the scheduler and swallowed — they never stop the loop.
#[async_trait]
pub trait Task: Send {
    /// Name used in log output.
    fn name(&self) -> &str;

    /// Execute one firing of the task.
    async fn run(&mut self) -> anyhow::Result<()>;
}
