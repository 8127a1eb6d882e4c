//! Extractors with contextual rejection-to-error conversion.

mod enhanced_json;
mod enhanced_path;
mod enhanced_query;

pub use enhanced_json::Json;
pub use enhanced_path::Path;
pub use enhanced_query::Query;
