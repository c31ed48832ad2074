//! Turns a raw proxy request path into a validated [`modcache_resource::FetchDescriptor`],
//! gated by the sumdb trust policy read from the environment.

mod classify;
mod sumdb;

pub use classify::{classify, ClassifyError};
pub use sumdb::SumdbConfig;
