use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::error::Result;
use crate::pool::{Lifecycle, Shared};

pub(crate) struct Worker {
    pub(crate) id: usize,
    pub(crate) handle: JoinHandle<()>,
}

impl Worker {
    /// Spawns a named worker thread running the pool loop.
    pub(crate) fn spawn(id: usize, shared: Arc<Shared>) -> Result<Worker> {
        let handle = thread::Builder::new()
            .name(format!("workpool-{}", id))
            .spawn(move || run(&shared, id))?;
        Ok(Worker { id, handle })
    }
}

/// The worker run loop. Every exit path releases the lock through the guard
/// going out of scope, so no branch can leave the pool locked.
fn run(shared: &Shared, id: usize) {
    shared.observer.worker_started(id);
    loop {
        let mut state = shared.state.lock().unwrap();
        // Sleep while there is no task to take and no reason to exit.
        while state.queue.is_empty()
            && state.lifecycle == Lifecycle::Accepting
            && state.live_workers <= state.target_workers
        {
            state = shared.not_empty.wait(state).unwrap();
        }
        if state.live_workers > state.target_workers {
            // Surplus after a shrinking resize: retire between tasks.
            state.live_workers -= 1;
            break;
        }
        if state.lifecycle == Lifecycle::Stopping {
            break;
        }
        let task = match state.queue.try_dequeue() {
            Some(task) => task,
            // Draining and the queue is already empty.
            None => break,
        };
        drop(state);
        shared.not_full.notify_one();
        // The task runs outside the lock; a slow or blocking task ties up
        // this worker, never the pool.
        shared.observer.task_started(id);
        task();
        shared.observer.task_finished(id);
    }
    shared.observer.worker_stopped(id);
}
