//! Filesystem helpers for chunkflow.
//!
//! Step outputs are written atomically so a crash or a failing later step
//! never leaves a half-written artifact behind for inspection or resumption.

pub mod atomic;

pub use atomic::{atomic_write, atomic_write_file};
