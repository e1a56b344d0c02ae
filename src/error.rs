use std::io;

use thiserror::Error;

/// WorkerPool Error
#[derive(Error, Debug)]
pub enum PoolError {
    /// A sizing argument was out of range.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    /// Operation attempted in a lifecycle state that forbids it.
    #[error("invalid state: {0}")]
    InvalidState(&'static str),
    /// The pool has begun shutting down and accepts no new tasks.
    #[error("pool is closed")]
    PoolClosed,
    /// A worker thread could not be spawned.
    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[from] io::Error),
}

/// WorkerPool Error Result
pub type Result<T> = std::result::Result<T, PoolError>;
