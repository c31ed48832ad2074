//! Atomic filesystem primitives backing the disk cache.
//!
//! Every write goes through a temp-file-then-rename so readers never observe a
//! partial file.

mod error;
mod primitives;

pub use error::{Error, Result};

pub use primitives::{atomic_read, atomic_write, AtomicWriteOptions};
