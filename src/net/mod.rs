mod graph;
mod load;
mod metrics;
pub(crate) mod parse;

pub use graph::{AggregatedLink, StateNetwork};
pub use load::{NetworkBundle, default_tree_name, load_bundle};
pub use metrics::entropy_rate;
pub use parse::Partition;
