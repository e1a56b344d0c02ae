use crate::error::Result;
use crate::observer::{NopObserver, PoolObserver};
use crate::pool::WorkerPool;

/// WorkerPool builder that can set:
///   - the number of worker threads, default: one per logical CPU
///   - the task queue capacity, default: match the thread count
///   - the observer receiving pool diagnostics, default: none
pub struct PoolBuilder {
    threads: u32,
    queue_capacity: usize,
    observer: Box<dyn PoolObserver>,
}

impl Default for PoolBuilder {
    fn default() -> Self {
        Self {
            threads: num_cpus::get() as u32,
            queue_capacity: 0,
            observer: Box::new(NopObserver),
        }
    }
}

impl PoolBuilder {
    /// creates a builder with the default configuration
    pub fn new() -> Self {
        Self::default()
    }
    /// set the number of worker threads
    pub fn set_threads(mut self, threads: u32) -> Self {
        self.threads = threads;
        self
    }
    /// set the queue capacity, zero meaning "match the thread count"
    pub fn set_queue_capacity(mut self, queue_capacity: usize) -> Self {
        self.queue_capacity = queue_capacity;
        self
    }
    /// set the observer receiving pool diagnostics
    pub fn set_observer(mut self, observer: impl PoolObserver + 'static) -> Self {
        self.observer = Box::new(observer);
        self
    }
    /// consume this builder, create the pool and spawn its workers
    pub fn build(self) -> Result<WorkerPool> {
        WorkerPool::build(self.threads, self.queue_capacity, self.observer)
    }
}
