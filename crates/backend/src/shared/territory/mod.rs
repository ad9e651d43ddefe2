pub mod filter;
pub mod tree_builder;

pub use filter::TerritoryFilter;
pub use tree_builder::{aggregate, merge_counters, CounterSelector, LevelSelector, TreeBuilder};
