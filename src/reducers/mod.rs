//! src/reducers/mod.rs
mod line_aggregator;
pub use line_aggregator::{LINE_AGGREGATOR, LineAggregator};

mod line_combiner;
pub use line_combiner::{LINE_COMBINER, LineCombiner};
