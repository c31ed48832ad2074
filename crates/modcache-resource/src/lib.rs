//! Types shared by the request classifier, driver adapter, and result
//! materializer: the case-escape path codec, the closed set of fetch
//! operations, and the descriptor that ties a validated request together.

mod descriptor;
mod ops;
mod path;

pub use descriptor::FetchDescriptor;
pub use ops::FetchOps;
pub use path::{decode, decode_version, encode, PathError};
