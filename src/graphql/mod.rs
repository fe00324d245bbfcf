pub mod compact;
pub mod models;
pub mod query;

pub use compact::compact;
pub use models::{Field, UNREQUESTED_MARKER};
pub use query::{OperationType, QueryArgs, Selection, build_query, format_strings};
