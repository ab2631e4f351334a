pub mod config;
pub mod content;
pub mod error;
pub mod ingest;
pub mod logger;
pub mod paginator;
pub mod scroll_index;
pub mod scroll_list;
pub mod text_utils;
pub mod view;
mod test_data;

pub use content::{RawDocument, ScrollPost, ScrollType};
pub use error::{IngestionError, QueryError};
pub use ingest::{ingest, IngestOptions};
pub use scroll_index::{Neighbors, Page, ScrollIndex, DEFAULT_SIMILAR_LIMIT};
pub use text_utils::format_date;
