use crate::pool::ShutdownMode;

/// Receiver for pool diagnostics.
///
/// Every method defaults to a no-op, so implementors override only the events
/// they care about. The pool never invokes a hook while its internal lock is
/// held, but hooks run on the worker or producer thread that fired them, so a
/// slow hook stalls that thread.
pub trait PoolObserver: Send + Sync {
    /// A worker thread entered its run loop.
    fn worker_started(&self, _worker: usize) {}

    /// A worker thread is about to exit.
    fn worker_stopped(&self, _worker: usize) {}

    /// A task was accepted; `queued` is the queue depth just after the
    /// enqueue.
    fn task_enqueued(&self, _queued: usize) {}

    /// A worker dequeued a task and is about to run it.
    fn task_started(&self, _worker: usize) {}

    /// A worker finished running a task.
    fn task_finished(&self, _worker: usize) {}

    /// Shutdown began in the given mode.
    fn shutdown_started(&self, _mode: ShutdownMode) {}
}

/// Observer that discards every event. The default when none is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NopObserver;

impl PoolObserver for NopObserver {}

/// Observer that forwards every event to the `log` facade.
///
/// Worker and shutdown events log at debug level, per-task events at trace.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl PoolObserver for LogObserver {
    fn worker_started(&self, worker: usize) {
        debug!("worker {} started", worker);
    }

    fn worker_stopped(&self, worker: usize) {
        debug!("worker {} stopped", worker);
    }

    fn task_enqueued(&self, queued: usize) {
        trace!("task enqueued, {} queued", queued);
    }

    fn task_started(&self, worker: usize) {
        trace!("worker {} running task", worker);
    }

    fn task_finished(&self, worker: usize) {
        trace!("worker {} finished task", worker);
    }

    fn shutdown_started(&self, mode: ShutdownMode) {
        debug!("shutdown started in {:?} mode", mode);
    }
}
