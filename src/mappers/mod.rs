//! src/mappers/mod.rs
mod line_indexer;
pub use line_indexer::{LINE_INDEXER, LineCursor, LineIndexer};
