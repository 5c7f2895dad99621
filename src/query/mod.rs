//! Query-side helpers over resolved graphs

mod neighborhood;

pub use neighborhood::{filter_bridging, NeighborhoodResult};
