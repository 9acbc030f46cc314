//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Persist: Sweeps expired entries and snapshots the cache to disk

mod persist;

pub use persist::spawn_persist_task;
