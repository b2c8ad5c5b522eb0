use std::cmp::Ordering;
use std::fmt::Debug;
use num_traits::{Float, Zero};
use crate::graph::Graph;
use crate::Result;

/// Shortest distance to a node: a finite cost, or no path at all
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Distance<W> {
    Finite(W),
    Unreachable,
}

impl<W> Distance<W>
where
    W: Float + Zero + Debug + Copy,
{
    /// Returns true if the node has a path from the source
    pub fn is_reachable(&self) -> bool {
        matches!(self, Distance::Finite(_))
    }

    /// The finite distance, or `None` when unreachable
    pub fn finite(self) -> Option<W> {
        match self {
            Distance::Finite(d) => Some(d),
            Distance::Unreachable => None,
        }
    }

    /// The distance as `f64`, with `+∞` for unreachable nodes
    ///
    /// Meant for numeric consumers (plots, C callers) that have no other encoding.
    pub fn to_f64(self) -> f64 {
        match self {
            Distance::Finite(d) => d.to_f64().unwrap_or(f64::INFINITY),
            Distance::Unreachable => f64::INFINITY,
        }
    }
}

impl<W> From<Option<W>> for Distance<W> {
    fn from(value: Option<W>) -> Self {
        match value {
            Some(d) => Distance::Finite(d),
            None => Distance::Unreachable,
        }
    }
}

/// Unreachable sorts after every finite distance
impl<W: PartialOrd> PartialOrd for Distance<W> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Distance::Finite(a), Distance::Finite(b)) => a.partial_cmp(b),
            (Distance::Finite(_), Distance::Unreachable) => Some(Ordering::Less),
            (Distance::Unreachable, Distance::Finite(_)) => Some(Ordering::Greater),
            (Distance::Unreachable, Distance::Unreachable) => Some(Ordering::Equal),
        }
    }
}

/// Result of a shortest path algorithm execution
#[derive(Debug, Clone, PartialEq)]
pub struct ShortestPathResult<W>
where
    W: Float + Zero + Debug + Copy,
{
    /// Distances from source to each vertex
    pub distances: Vec<Distance<W>>,

    /// Predecessor vertices in the shortest path tree
    pub predecessors: Vec<Option<usize>>,

    /// Full route to each vertex, present only when route tracking is enabled
    pub routes: Option<Vec<Option<Vec<usize>>>>,

    /// Vertices in the order they were finalized
    pub visit_order: Vec<usize>,

    /// Source vertex ID
    pub source: usize,
}

/// Trait for shortest path algorithms
pub trait ShortestPathAlgorithm<W, G>
where
    W: Float + Zero + Debug + Copy,
    G: Graph<W>,
{
    /// Compute shortest paths from a source vertex to all other vertices
    fn compute_shortest_paths(&self, graph: &G, source: usize) -> Result<ShortestPathResult<W>>;

    /// Get the name of the algorithm
    fn name(&self) -> &'static str;

    /// Get the shortest path from source to target as a sequence of vertices
    fn get_path(&self, result: &ShortestPathResult<W>, target: usize) -> Option<Vec<usize>> {
        if target >= result.predecessors.len() || !result.distances[target].is_reachable() {
            return None;
        }

        if let Some(routes) = &result.routes {
            return routes[target].clone();
        }

        let mut path = Vec::new();
        let mut current = target;

        // Build path in reverse order
        while current != result.source {
            path.push(current);

            // A chain longer than the graph can only come from a corrupted result
            if path.len() > result.predecessors.len() {
                log::warn!("predecessor chain from {} exceeds graph size, likely a cycle", target);
                return None;
            }

            match result.predecessors[current] {
                Some(pred) if pred != current => current = pred,
                _ => {
                    log::warn!("broken predecessor chain at vertex {}", current);
                    return None;
                }
            }
        }

        path.push(result.source);
        path.reverse();

        Some(path)
    }
}
