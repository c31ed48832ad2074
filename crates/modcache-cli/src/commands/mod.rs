mod cleanup;
mod completions;
mod fetch;

pub use cleanup::run as cleanup;
pub use completions::run as completions;
pub use fetch::run as fetch;
