pub mod traits;
pub mod cancel;
pub mod dense_dijkstra;

pub use cancel::CancelToken;
pub use traits::{Distance, ShortestPathAlgorithm, ShortestPathResult};
