#![deny(missing_docs)]
//! A fixed-capacity worker pool over a bounded task queue

#[macro_use]
extern crate log;

mod builder;
mod error;
mod observer;
mod pool;
mod queue;
mod worker;

pub use builder::PoolBuilder;
pub use error::{PoolError, Result};
pub use observer::{LogObserver, NopObserver, PoolObserver};
pub use pool::{ShutdownMode, WorkerPool};
