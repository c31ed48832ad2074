pub mod atomic_write;

pub use atomic_write::{atomic_read, atomic_write, AtomicWriteOptions};
