use std::mem;
use std::sync::{Arc, Condvar, Mutex};

use crate::builder::PoolBuilder;
use crate::error::{PoolError, Result};
use crate::observer::{NopObserver, PoolObserver};
use crate::queue::{Task, TaskQueue};
use crate::worker::Worker;

/// How shutdown treats tasks that are queued but not yet started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownMode {
    /// Finish every queued and in-flight task before stopping the workers.
    Drain,
    /// Abandon queued tasks; in-flight tasks still run to completion.
    Discard,
}

/// Pool lifecycle. `Accepting` is the only state that admits work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Lifecycle {
    Accepting,
    Draining,
    Stopping,
}

/// Everything the pool mutex protects. Workers mutate the queue and the live
/// count; the handle side owns the worker vector and the lifecycle.
pub(crate) struct PoolState {
    pub(crate) queue: TaskQueue,
    pub(crate) lifecycle: Lifecycle,
    pub(crate) target_workers: usize,
    pub(crate) live_workers: usize,
    workers: Vec<Worker>,
    next_worker_id: usize,
}

/// State shared between the pool handle and its worker threads.
pub(crate) struct Shared {
    pub(crate) state: Mutex<PoolState>,
    pub(crate) not_empty: Condvar,
    pub(crate) not_full: Condvar,
    pub(crate) observer: Box<dyn PoolObserver>,
}

/// A fixed-capacity worker pool over a bounded task queue.
///
/// `submit` blocks while the queue is full, so producers feel backpressure
/// instead of growing an unbounded backlog. Workers take tasks in FIFO order
/// and run them outside the pool lock. Shutting down is explicit via
/// [`shutdown`](WorkerPool::shutdown); a pool dropped without one drains
/// first, so worker threads are never leaked.
pub struct WorkerPool {
    shared: Arc<Shared>,
}

impl WorkerPool {
    /// Creates a pool with `threads` workers and a queue capacity matching
    /// the thread count. Returns an error if any thread fails to spawn; all
    /// previously-spawned threads are stopped and joined first.
    pub fn new(threads: u32) -> Result<Self> {
        Self::with_queue_capacity(threads, 0)
    }

    /// Creates a pool with `threads` workers and room for `queue_capacity`
    /// pending tasks. A capacity of zero means "match the thread count".
    pub fn with_queue_capacity(threads: u32, queue_capacity: usize) -> Result<Self> {
        Self::build(threads, queue_capacity, Box::new(NopObserver))
    }

    /// Returns a builder. Defaults: one worker per logical CPU, a queue
    /// capacity matching the worker count, no observer.
    pub fn builder() -> PoolBuilder {
        PoolBuilder::default()
    }

    pub(crate) fn build(
        threads: u32,
        queue_capacity: usize,
        observer: Box<dyn PoolObserver>,
    ) -> Result<Self> {
        if threads == 0 {
            return Err(PoolError::InvalidArgument("thread count must be positive"));
        }
        let target = threads as usize;
        let capacity = if queue_capacity == 0 {
            target
        } else {
            queue_capacity
        };
        let shared = Arc::new(Shared {
            state: Mutex::new(PoolState {
                queue: TaskQueue::with_capacity(capacity),
                lifecycle: Lifecycle::Accepting,
                target_workers: target,
                live_workers: 0,
                workers: Vec::with_capacity(target),
                next_worker_id: 0,
            }),
            not_empty: Condvar::new(),
            not_full: Condvar::new(),
            observer,
        });
        let pool = WorkerPool { shared };
        let mut state = pool.shared.state.lock().unwrap();
        for _ in 0..target {
            if let Err(err) = pool.spawn_worker(&mut state) {
                // Stop and join the workers that did start before surfacing
                // the spawn failure.
                state.lifecycle = Lifecycle::Stopping;
                let workers = mem::take(&mut state.workers);
                drop(state);
                pool.shared.not_empty.notify_all();
                join_workers(workers);
                return Err(err);
            }
        }
        drop(state);
        Ok(pool)
    }

    fn spawn_worker(&self, state: &mut PoolState) -> Result<()> {
        let id = state.next_worker_id;
        state.next_worker_id += 1;
        let worker = Worker::spawn(id, Arc::clone(&self.shared))?;
        state.workers.push(worker);
        state.live_workers += 1;
        Ok(())
    }

    /// Hands a task to the pool, blocking while the queue is full.
    ///
    /// A successful return means the task is durably queued and will run
    /// unless the pool is shut down with [`ShutdownMode::Discard`] first; it
    /// does not mean the task has started. Fails with
    /// [`PoolError::PoolClosed`] once shutdown has begun, including when the
    /// call was already blocked waiting for a slot; the task is then dropped
    /// without having been queued.
    ///
    /// Panics inside the task are not caught. A panicking task unwinds its
    /// worker thread, and the pool runs with one worker fewer until a resize
    /// or shutdown.
    pub fn submit<F>(&self, job: F) -> Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        let mut task: Task = Box::new(job);
        let mut state = self.shared.state.lock().unwrap();
        loop {
            if state.lifecycle != Lifecycle::Accepting {
                return Err(PoolError::PoolClosed);
            }
            match state.queue.try_enqueue(task) {
                Ok(()) => break,
                Err(rejected) => {
                    task = rejected;
                    state = self.shared.not_full.wait(state).unwrap();
                }
            }
        }
        let queued = state.queue.len();
        drop(state);
        self.shared.not_empty.notify_one();
        self.shared.observer.task_enqueued(queued);
        Ok(())
    }

    /// Changes the worker count and queue capacity of a running pool.
    ///
    /// The whole operation holds the pool lock, so no submission or dequeue
    /// races the structural change. Queued tasks survive with their order
    /// intact; `queue_capacity` below the current queue length is refused.
    /// Growing spawns new workers immediately. Shrinking retires surplus
    /// workers cooperatively: each finishes its current task and exits
    /// before taking another, and is never killed mid-task. A capacity of
    /// zero means "match the new thread count".
    ///
    /// If a worker thread fails to spawn mid-grow, the pool keeps the
    /// workers it reached, the target is set to that count, and the error is
    /// returned.
    pub fn resize(&self, threads: u32, queue_capacity: usize) -> Result<()> {
        if threads == 0 {
            return Err(PoolError::InvalidArgument("thread count must be positive"));
        }
        let new_target = threads as usize;
        let new_capacity = if queue_capacity == 0 {
            new_target
        } else {
            queue_capacity
        };
        let mut state = self.shared.state.lock().unwrap();
        if state.lifecycle != Lifecycle::Accepting {
            return Err(PoolError::InvalidState("resize requires an accepting pool"));
        }
        state.queue.resize(new_capacity)?;
        while state.live_workers < new_target {
            if let Err(err) = self.spawn_worker(&mut state) {
                state.target_workers = state.live_workers;
                drop(state);
                self.wake_all();
                return Err(err);
            }
        }
        state.target_workers = new_target;
        drop(state);
        // Blocked producers re-check against the new capacity, idle workers
        // against the new target.
        self.wake_all();
        Ok(())
    }

    /// Stops the pool and joins every worker.
    ///
    /// [`ShutdownMode::Drain`] blocks until every queued and in-flight task
    /// has completed. [`ShutdownMode::Discard`] drops queued tasks but still
    /// waits for in-flight ones; a worker never abandons a task it already
    /// started. Either way, concurrent and later `submit` calls fail with
    /// [`PoolError::PoolClosed`]. A second shutdown fails with
    /// [`PoolError::InvalidState`]; workers are joined exactly once.
    ///
    /// A worker lost to a panicking task joins as an error, which is logged
    /// and does not fail the shutdown.
    pub fn shutdown(&self, mode: ShutdownMode) -> Result<()> {
        let mut state = self.shared.state.lock().unwrap();
        if state.lifecycle != Lifecycle::Accepting {
            return Err(PoolError::InvalidState("pool already shut down"));
        }
        state.lifecycle = match mode {
            ShutdownMode::Drain => Lifecycle::Draining,
            ShutdownMode::Discard => Lifecycle::Stopping,
        };
        let workers = mem::take(&mut state.workers);
        drop(state);
        self.wake_all();
        self.shared.observer.shutdown_started(mode);
        join_workers(workers);
        Ok(())
    }

    /// Number of workers the pool is currently sized to.
    pub fn thread_count(&self) -> usize {
        self.shared.state.lock().unwrap().target_workers
    }

    /// Number of tasks sitting in the queue right now.
    pub fn queued_tasks(&self) -> usize {
        self.shared.state.lock().unwrap().queue.len()
    }

    /// Capacity of the task queue.
    pub fn queue_capacity(&self) -> usize {
        self.shared.state.lock().unwrap().queue.capacity()
    }

    fn wake_all(&self) {
        self.shared.not_empty.notify_all();
        self.shared.not_full.notify_all();
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        // Drain fallback for pools dropped without an explicit shutdown; a
        // no-op after one (the workers are already joined).
        let _ = self.shutdown(ShutdownMode::Drain);
    }
}

fn join_workers(workers: Vec<Worker>) {
    for worker in workers {
        if worker.handle.join().is_err() {
            error!("worker {} exited by panic", worker.id);
        }
    }
}
