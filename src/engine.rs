use std::collections::{BTreeSet, HashMap};
use std::fmt::Debug;

use num_traits::{Float, Zero};
use ordered_float::OrderedFloat;
use rayon::prelude::*;

use crate::algorithm::dense_dijkstra::{DenseDijkstra, RouteTracking};
use crate::algorithm::{CancelToken, Distance, ShortestPathAlgorithm, ShortestPathResult};
use crate::graph::{DenseGraph, Graph, NodeId, NodeLabels, NodeRef};
use crate::{Error, Result};

/// Shortest-path queries over one immutable dense graph
///
/// The engine only holds the graph and its labels. Every query allocates its own
/// working tables, so a shared engine can serve queries from many threads at once.
#[derive(Debug, Clone)]
pub struct ShortestPathEngine<W = f64>
where
    W: Float + Zero + Debug + Copy,
{
    graph: DenseGraph<W>,
    labels: NodeLabels,
    algorithm: DenseDijkstra,
}

/// A positive-weight edge, as handed to drawing code
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedEdge<W> {
    pub from: NodeId,
    pub to: NodeId,
    pub weight: W,
}

impl<W> ShortestPathEngine<W>
where
    W: Float + Zero + Debug + Copy,
{
    /// Builds an engine from a square weight matrix (`0` = no edge) and optional labels
    ///
    /// Fails with [`Error::InvalidGraph`] for an empty or non-square matrix, negative or
    /// non-finite weights, or labels that do not match the node count or repeat.
    pub fn new(matrix: Vec<Vec<W>>, labels: Option<Vec<String>>) -> Result<Self> {
        let graph = DenseGraph::from_matrix(matrix)?;
        let labels = NodeLabels::new(labels, graph.vertex_count())?;
        Ok(Self::assemble(graph, labels))
    }

    /// Builds an engine from an already validated graph and label table
    pub fn from_graph(graph: DenseGraph<W>, labels: NodeLabels) -> Result<Self> {
        if labels.len() != graph.vertex_count() {
            return Err(Error::InvalidGraph(format!(
                "expected {} labels, got {}",
                graph.vertex_count(),
                labels.len()
            )));
        }
        Ok(Self::assemble(graph, labels))
    }

    fn assemble(graph: DenseGraph<W>, labels: NodeLabels) -> Self {
        log::debug!(
            "engine ready: {} nodes, {} edges",
            graph.vertex_count(),
            graph.edge_count()
        );
        ShortestPathEngine {
            graph,
            labels,
            algorithm: DenseDijkstra::new(),
        }
    }

    /// Set how much route information each query records
    pub fn with_route_tracking(mut self, tracking: RouteTracking) -> Self {
        self.algorithm = self.algorithm.with_route_tracking(tracking);
        self
    }

    pub fn node_count(&self) -> usize {
        self.graph.vertex_count()
    }

    pub fn graph(&self) -> &DenseGraph<W> {
        &self.graph
    }

    pub fn labels(&self) -> &NodeLabels {
        &self.labels
    }

    /// Resolves an index or label, failing with [`Error::NodeNotFound`]
    pub fn resolve<'a>(&self, node: impl Into<NodeRef<'a>>) -> Result<NodeId> {
        self.labels.resolve(node.into())
    }

    /// Shortest distance from `source` to every node
    pub fn shortest_distances<'a>(
        &self,
        source: impl Into<NodeRef<'a>>,
    ) -> Result<ShortestDistances<W>> {
        let source = self.resolve(source)?;
        self.run(source, None)
    }

    /// Like [`shortest_distances`](Self::shortest_distances), aborting with
    /// [`Error::Cancelled`] once `token` is cancelled
    pub fn shortest_distances_cancellable<'a>(
        &self,
        source: impl Into<NodeRef<'a>>,
        token: &CancelToken,
    ) -> Result<ShortestDistances<W>> {
        let source = self.resolve(source)?;
        self.run(source, Some(token))
    }

    /// One shortest route from `source` to `target`, or `None` when unreachable
    ///
    /// When several routes tie, the one found first in visitation order wins.
    pub fn shortest_route<'a, 'b>(
        &self,
        source: impl Into<NodeRef<'a>>,
        target: impl Into<NodeRef<'b>>,
    ) -> Result<Option<Route<W>>> {
        let source = self.resolve(source)?;
        let target = self.resolve(target)?;
        Ok(self.run(source, None)?.route_to(target))
    }

    /// Every positive-weight edge as `(from, to, weight)`, row-major
    pub fn edges(&self) -> Vec<WeightedEdge<W>> {
        self.graph
            .edges()
            .map(|(from, to, weight)| WeightedEdge {
                from: NodeId::new(from),
                to: NodeId::new(to),
                weight,
            })
            .collect()
    }

    fn run(&self, source: NodeId, cancel: Option<&CancelToken>) -> Result<ShortestDistances<W>> {
        let result = self
            .algorithm
            .compute_with_cancel(&self.graph, source.index(), cancel)?;
        Ok(ShortestDistances {
            result,
            labels: self.labels.clone(),
            algorithm: self.algorithm.clone(),
        })
    }
}

impl<W> ShortestPathEngine<W>
where
    W: Float + Zero + Debug + Copy + Send + Sync,
{
    /// Runs one query per node in parallel; entry `i` is the query from node `i`
    pub fn all_sources(&self) -> Result<Vec<ShortestDistances<W>>> {
        (0..self.node_count())
            .into_par_iter()
            .map(|source| self.run(NodeId::new(source), None))
            .collect()
    }
}

/// Snapshot of one single-source query
#[derive(Debug, Clone)]
pub struct ShortestDistances<W>
where
    W: Float + Zero + Debug + Copy,
{
    result: ShortestPathResult<W>,
    labels: NodeLabels,
    algorithm: DenseDijkstra,
}

impl<W> ShortestDistances<W>
where
    W: Float + Zero + Debug + Copy,
{
    pub fn source(&self) -> NodeId {
        NodeId::new(self.result.source)
    }

    /// Distance to one node
    pub fn distance<'a>(&self, node: impl Into<NodeRef<'a>>) -> Result<Distance<W>> {
        let id = self.labels.resolve(node.into())?;
        Ok(self.result.distances[id.index()])
    }

    /// `(node, label, distance)` for every node, in index order
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &str, Distance<W>)> + '_ {
        self.result
            .distances
            .iter()
            .enumerate()
            .map(move |(i, d)| {
                let id = NodeId::new(i);
                (id, self.labels.get(id), *d)
            })
    }

    /// Distances keyed by node label
    pub fn by_label(&self) -> HashMap<String, Distance<W>> {
        self.iter()
            .map(|(_, label, distance)| (label.to_string(), distance))
            .collect()
    }

    /// Reachable nodes sorted by distance, ties by index
    pub fn sorted_by_distance(&self) -> Vec<(NodeId, W)> {
        let mut reached: Vec<(NodeId, W)> = self
            .iter()
            .filter_map(|(id, _, d)| d.finite().map(|d| (id, d)))
            .collect();
        reached.sort_by_key(|(id, d)| (OrderedFloat(*d), *id));
        reached
    }

    /// Number of nodes with a path from the source, the source included
    pub fn reachable_count(&self) -> usize {
        self.result.distances.iter().filter(|d| d.is_reachable()).count()
    }

    /// Nodes in the order the query finalized them
    pub fn visit_order(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.result.visit_order.iter().map(|&v| NodeId::new(v))
    }

    /// Previous node on the shortest route to `node`
    pub fn predecessor<'a>(&self, node: impl Into<NodeRef<'a>>) -> Result<Option<NodeId>> {
        let id = self.labels.resolve(node.into())?;
        Ok(self.result.predecessors[id.index()].map(NodeId::new))
    }

    /// Shortest route from the source to `target`, or `None` when unreachable
    pub fn route_to(&self, target: NodeId) -> Option<Route<W>> {
        let distance = self.result.distances.get(target.index())?.finite()?;
        let path = <DenseDijkstra as ShortestPathAlgorithm<W, DenseGraph<W>>>::get_path(
            &self.algorithm,
            &self.result,
            target.index(),
        )?;

        let nodes: Vec<NodeId> = path.into_iter().map(NodeId::new).collect();
        let labels = nodes.iter().map(|&id| self.labels.get(id).to_string()).collect();
        Some(Route {
            nodes,
            labels,
            distance,
        })
    }

    /// The raw index-based result
    pub fn as_result(&self) -> &ShortestPathResult<W> {
        &self.result
    }
}

/// A shortest route: node sequence from source to target plus its total weight
#[derive(Debug, Clone, PartialEq)]
pub struct Route<W> {
    nodes: Vec<NodeId>,
    labels: Vec<String>,
    distance: W,
}

impl<W: Copy> Route<W> {
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn distance(&self) -> W {
        self.distance
    }

    /// Number of edges on the route
    pub fn hop_count(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }

    /// Consecutive `(from, to)` pairs along the route
    pub fn edges(&self) -> Vec<(NodeId, NodeId)> {
        self.nodes.windows(2).map(|pair| (pair[0], pair[1])).collect()
    }

    /// The route's edges as a set, for highlighting
    pub fn highlight_set(&self) -> BTreeSet<(NodeId, NodeId)> {
        self.edges().into_iter().collect()
    }
}
