pub mod traits;
pub mod matrix;
pub mod labels;
pub mod parse;
pub mod generators;

pub use traits::Graph;
pub use matrix::DenseGraph;
pub use labels::{NodeId, NodeLabels, NodeRef};
pub use parse::{parse_matrix, GraphDocument};
