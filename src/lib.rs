//! Matrix SSSP - single-source shortest paths over dense adjacency matrices
//!
//! This library computes shortest distances and shortest routes from one source node
//! of a weighted directed graph given as an n×n matrix of non-negative weights, where
//! a zero entry means "no edge".
//!
//! The engine runs the dense-matrix variant of Dijkstra's algorithm (O(n²) per query):
//! each round finalizes the unvisited node with the globally smallest distance and
//! relaxes its row of the matrix. Unreachable nodes are reported as
//! [`Distance::Unreachable`], never as a large finite number.
//!
//! ```
//! use matrix_sssp::ShortestPathEngine;
//!
//! let engine = ShortestPathEngine::new(
//!     vec![
//!         vec![0.0, 3.0, 0.0, 1.0],
//!         vec![0.0, 0.0, 1.0, 0.0],
//!         vec![0.0, 0.0, 0.0, 0.0],
//!         vec![0.0, 1.0, 2.0, 0.0],
//!     ],
//!     None,
//! )?;
//!
//! let distances = engine.shortest_distances(0)?;
//! assert_eq!(distances.distance(1)?.finite(), Some(2.0));
//!
//! let route = engine.shortest_route(0, 2)?.expect("node 2 is reachable");
//! assert_eq!(route.labels(), ["0", "3", "2"]);
//! # Ok::<(), matrix_sssp::Error>(())
//! ```

pub mod algorithm;
pub mod engine;
#[cfg(feature = "ffi")]
pub mod ffi;
pub mod graph;
#[cfg(feature = "python")]
mod python;
pub mod web;

pub use algorithm::{
    dense_dijkstra::{DenseDijkstra, RouteTracking},
    CancelToken, Distance, ShortestPathAlgorithm, ShortestPathResult,
};
pub use engine::{Route, ShortestDistances, ShortestPathEngine, WeightedEdge};
/// Re-export main types for convenient use
pub use graph::{DenseGraph, GraphDocument, NodeId, NodeLabels, NodeRef};

/// Error types for the library
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Invalid graph: {0}")]
    InvalidGraph(String),

    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error("Query cancelled")]
    Cancelled,

    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for the library
pub type Result<T> = std::result::Result<T, Error>;
