use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::graph::NodeRef;
use crate::web::api::WebEngine;

/// Represents a node in the graph for web visualization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebNode {
    pub id: usize,
    pub label: String,
    /// Distance from the last queried source; `null` when unreachable or not queried
    #[serde(default)]
    pub distance: Option<f64>,
    #[serde(default)]
    pub is_source: bool,
    #[serde(default)]
    pub is_target: bool,
}

/// Represents an edge in the graph for web visualization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebEdge {
    pub source: usize,
    pub target: usize,
    pub weight: f64,
    #[serde(default)]
    pub is_path: bool,
}

/// Represents a complete graph for web visualization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebGraph {
    pub nodes: Vec<WebNode>,
    pub links: Vec<WebEdge>,
}

/// A node picked by index (JSON number) or label (JSON string)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeSelector {
    Index(usize),
    Label(String),
}

impl NodeSelector {
    pub fn as_node_ref(&self) -> NodeRef<'_> {
        match self {
            NodeSelector::Index(index) => NodeRef::Index(*index),
            NodeSelector::Label(label) => NodeRef::Label(label),
        }
    }
}

/// Body of `POST /api/graphs`
#[derive(Debug, Deserialize)]
pub struct CreateGraphRequest {
    pub matrix: Vec<Vec<f64>>,
    #[serde(default)]
    pub labels: Option<Vec<String>>,
}

/// Body of `POST /api/graphs/generate`
#[derive(Debug, Deserialize)]
pub struct GraphGenerationRequest {
    pub node_count: usize,
    #[serde(default = "default_density")]
    pub density: f64,
    #[serde(default = "default_max_weight")]
    pub max_weight: f64,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub alphabetic_labels: bool,
}

fn default_density() -> f64 {
    0.3
}

fn default_max_weight() -> f64 {
    10.0
}

/// Body of `POST /api/distances/:session_id`
#[derive(Debug, Deserialize)]
pub struct DistancesRequest {
    pub source: NodeSelector,
}

/// Body of `POST /api/route/:session_id`
#[derive(Debug, Deserialize)]
pub struct RouteRequest {
    pub source: NodeSelector,
    pub target: NodeSelector,
}

/// Distance to one node in a query response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeDistance {
    pub node: usize,
    pub label: String,
    pub reachable: bool,
    pub distance: Option<f64>,
    pub predecessor: Option<usize>,
}

/// Response of a single-source distance query
#[derive(Debug, Clone, Serialize)]
pub struct DistancesResponse {
    pub execution_id: Uuid,
    pub source: usize,
    pub source_label: String,
    pub execution_time_ms: f64,
    pub reachable_count: usize,
    pub distances: Vec<NodeDistance>,
    pub visit_order: Vec<usize>,
}

/// Response of a route query
#[derive(Debug, Clone, Serialize)]
pub struct RouteResponse {
    pub execution_id: Uuid,
    pub source: usize,
    pub target: usize,
    pub reachable: bool,
    pub distance: Option<f64>,
    pub nodes: Vec<usize>,
    pub labels: Vec<String>,
    /// The session graph with `is_path` set on the route's edges
    pub graph: WebGraph,
}

/// Error response for API
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub details: Option<serde_json::Value>,
}

/// Session containing a graph and its query engine
///
/// Graph and engine are shared, so cloning a session copies two pointers.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub id: Uuid,
    pub graph: Arc<WebGraph>,
    pub created_at: DateTime<Utc>,
    #[serde(skip)]
    pub engine: Arc<WebEngine>,
}

impl Session {
    pub fn new(graph: WebGraph, engine: WebEngine) -> Self {
        Self {
            id: Uuid::new_v4(),
            graph: Arc::new(graph),
            created_at: Utc::now(),
            engine: Arc::new(engine),
        }
    }
}
