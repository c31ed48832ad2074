//! Driver adapter and result materializer for the module proxy.
//!
//! [`ModuleDriver`] is the boundary to the upstream build tool: this crate
//! never reimplements version-control access, it only ever re-invokes the
//! build tool as a subprocess ([`ProcessDriver`]) or hands back a canned
//! answer for tests ([`FakeDriver`]). [`FetchResult::open`] renders a
//! completed operation into a byte stream shaped by its `FetchOps`.

mod driver;
mod error;
mod result;

pub use driver::{FakeDriver, FakeDriverBuilder, ModuleDriver, ProcessDriver};
pub use error::{FetchError, Result};
pub use result::{marshal_info, FetchResult};
