//! Request extractors used by the handlers.

mod reject;

pub use reject::{Json, Path, Query};
