use std::fmt::Debug;
use num_traits::{Float, Zero};

use crate::algorithm::{CancelToken, Distance, ShortestPathAlgorithm, ShortestPathResult};
use crate::graph::Graph;
use crate::{Error, Result};

/// How much route information a query records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RouteTracking {
    /// Record one predecessor per node and rebuild routes on demand
    #[default]
    Predecessors,
    /// Also keep a full route table, updated on every improving relaxation
    FullRoutes,
}

/// Dijkstra's algorithm, dense-matrix variant
///
/// Each round scans every unvisited node for the smallest tentative distance
/// (ties go to the lowest index), finalizes it and relaxes its outgoing edges.
/// That is O(n²) per query with no priority queue, which suits dense matrices.
/// The loop stops as soon as the frontier holds only unreachable nodes.
#[derive(Debug, Default, Clone)]
pub struct DenseDijkstra {
    tracking: RouteTracking,
}

/// Per-query working state; never shared between queries
struct QueryState<W> {
    distances: Vec<Distance<W>>,
    visited: Vec<bool>,
    predecessors: Vec<Option<usize>>,
    routes: Option<Vec<Option<Vec<usize>>>>,
    visit_order: Vec<usize>,
    /// Nodes offered a path whose length is not representable in `W`
    overflowed: Vec<bool>,
}

impl<W> QueryState<W>
where
    W: Float + Zero + Debug + Copy,
{
    fn new(n: usize, source: usize, tracking: RouteTracking) -> Self {
        let mut distances = vec![Distance::Unreachable; n];
        distances[source] = Distance::Finite(W::zero());

        let routes = match tracking {
            RouteTracking::Predecessors => None,
            RouteTracking::FullRoutes => {
                let mut routes = vec![None; n];
                routes[source] = Some(vec![source]);
                Some(routes)
            }
        };

        QueryState {
            distances,
            visited: vec![false; n],
            predecessors: vec![None; n],
            routes,
            visit_order: Vec::with_capacity(n),
            overflowed: vec![false; n],
        }
    }

    /// Unvisited node with the smallest finite distance, lowest index on ties
    fn select_next(&self) -> Option<(usize, W)> {
        let mut best: Option<(usize, W)> = None;
        for (v, distance) in self.distances.iter().enumerate() {
            if self.visited[v] {
                continue;
            }
            if let Distance::Finite(d) = *distance {
                match best {
                    Some((_, best_d)) if best_d <= d => {}
                    _ => best = Some((v, d)),
                }
            }
        }
        best
    }

    fn relax(&mut self, u: usize, dist_u: W, v: usize, weight: W) -> bool {
        let candidate = dist_u + weight;
        if !candidate.is_finite() {
            // Another path may still reach v; checked once the loop ends
            self.overflowed[v] = true;
            log::trace!("overflow relaxing {} -> {}", u, v);
            return false;
        }

        let improves = match self.distances[v] {
            Distance::Unreachable => true,
            Distance::Finite(current) => candidate < current,
        };

        if improves {
            self.distances[v] = Distance::Finite(candidate);
            self.predecessors[v] = Some(u);
            if let Some(routes) = self.routes.as_mut() {
                let mut route = routes[u].clone().unwrap_or_default();
                route.push(v);
                routes[v] = Some(route);
            }
        }
        improves
    }

    /// First node that is only reachable through an overflowing sum
    fn overflowed_node(&self) -> Option<usize> {
        (0..self.distances.len()).find(|&v| self.overflowed[v] && !self.distances[v].is_reachable())
    }

    fn into_result(self, source: usize) -> ShortestPathResult<W> {
        ShortestPathResult {
            distances: self.distances,
            predecessors: self.predecessors,
            routes: self.routes,
            visit_order: self.visit_order,
            source,
        }
    }
}

impl DenseDijkstra {
    /// Creates a new instance that records predecessors only
    pub fn new() -> Self {
        DenseDijkstra::default()
    }

    /// Set how much route information each query records
    pub fn with_route_tracking(mut self, tracking: RouteTracking) -> Self {
        self.tracking = tracking;
        self
    }

    /// Returns the configured route tracking mode
    pub fn route_tracking(&self) -> RouteTracking {
        self.tracking
    }

    /// Runs one query, checking `cancel` before each node is finalized
    pub fn compute_with_cancel<W, G>(
        &self,
        graph: &G,
        source: usize,
        cancel: Option<&CancelToken>,
    ) -> Result<ShortestPathResult<W>>
    where
        W: Float + Zero + Debug + Copy,
        G: Graph<W>,
    {
        if !graph.has_vertex(source) {
            return Err(Error::NodeNotFound(format!("index {}", source)));
        }

        let n = graph.vertex_count();
        let mut state = QueryState::new(n, source, self.tracking);
        let mut relaxations = 0usize;

        log::debug!("dense dijkstra: source={} n={} tracking={:?}", source, n, self.tracking);

        while state.visit_order.len() < n {
            if cancel.map_or(false, CancelToken::is_cancelled) {
                log::debug!("dense dijkstra: cancelled after {} nodes", state.visit_order.len());
                return Err(Error::Cancelled);
            }

            // Only unreachable nodes left on the frontier
            let Some((u, dist_u)) = state.select_next() else {
                break;
            };

            state.visited[u] = true;
            state.visit_order.push(u);
            log::trace!("finalized {} at {:?}", u, dist_u);

            for (v, weight) in graph.outgoing_edges(u) {
                if state.visited[v] || weight <= W::zero() {
                    continue;
                }
                if state.relax(u, dist_u, v, weight) {
                    relaxations += 1;
                    log::trace!("relaxed {} -> {} to {:?}", u, v, dist_u + weight);
                }
            }
        }

        log::debug!(
            "dense dijkstra: source={} reached={} relaxations={}",
            source,
            state.visit_order.len(),
            relaxations
        );

        if let Some(v) = state.overflowed_node() {
            return Err(Error::InvalidGraph(format!(
                "distance overflow: shortest distance from {} to {} is not finite",
                source, v
            )));
        }

        Ok(state.into_result(source))
    }
}

impl<W, G> ShortestPathAlgorithm<W, G> for DenseDijkstra
where
    W: Float + Zero + Debug + Copy,
    G: Graph<W>,
{
    fn name(&self) -> &'static str {
        "Dense Dijkstra"
    }

    fn compute_shortest_paths(&self, graph: &G, source: usize) -> Result<ShortestPathResult<W>> {
        self.compute_with_cancel(graph, source, None)
    }
}
