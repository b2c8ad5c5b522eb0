use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use ordered_float::OrderedFloat;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;
use uuid::Uuid;

use crate::engine::{Route, ShortestPathEngine};
use crate::graph::generators::{random_dense_matrix, seeded_dense_matrix};
use crate::graph::{DenseGraph, NodeId, NodeLabels};
use crate::web::models::*;
use crate::Error;

/// Weight type used by the web layer
pub type WebWeight = OrderedFloat<f64>;

/// Engine type stored in sessions
pub type WebEngine = ShortestPathEngine<WebWeight>;

/// Largest graph the generate endpoint will build; one session then holds
/// at most a million matrix cells
pub const MAX_GENERATED_NODES: usize = 1_000;

type ApiError = (StatusCode, Json<ErrorResponse>);
type ApiResult<T> = Result<Json<T>, ApiError>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<Mutex<HashMap<Uuid, Session>>>,
    pub max_sessions: usize,
}

impl AppState {
    pub fn new(max_sessions: usize) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            max_sessions,
        }
    }

    fn lock_sessions(&self) -> Result<MutexGuard<'_, HashMap<Uuid, Session>>, ApiError> {
        self.sessions.lock().map_err(|_| {
            api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "session store is unavailable".to_string(),
            )
        })
    }

    fn insert_session(&self, session: Session) -> Result<(), ApiError> {
        let mut sessions = self.lock_sessions()?;
        if sessions.len() >= self.max_sessions {
            log::warn!("session limit of {} reached", self.max_sessions);
            return Err(api_error(
                StatusCode::SERVICE_UNAVAILABLE,
                "session_limit_reached",
                format!("At most {} sessions may be open", self.max_sessions),
            ));
        }
        sessions.insert(session.id, session);
        Ok(())
    }

    /// Clones only the session's `Arc` handles while the lock is held
    fn session(&self, session_id: Uuid) -> Result<Session, ApiError> {
        self.lock_sessions()?
            .get(&session_id)
            .cloned()
            .ok_or_else(session_not_found)
    }

    fn engine(&self, session_id: Uuid) -> Result<Arc<WebEngine>, ApiError> {
        self.lock_sessions()?
            .get(&session_id)
            .map(|session| Arc::clone(&session.engine))
            .ok_or_else(session_not_found)
    }
}

/// Create the API router
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/api/graphs", post(create_graph))
        .route("/api/graphs/generate", post(generate_graph))
        .route("/api/graphs/:session_id", get(get_graph))
        .route("/api/distances/:session_id", post(run_distances))
        .route("/api/route/:session_id", post(run_route))
        .route("/api/sessions", get(list_sessions))
        .route("/api/sessions/:session_id", get(get_session).delete(delete_session))
        .route("/api/health", get(health_check))
}

/// Create a session from a user-supplied matrix
pub async fn create_graph(
    State(state): State<AppState>,
    Json(request): Json<CreateGraphRequest>,
) -> ApiResult<Session> {
    let matrix = request
        .matrix
        .into_iter()
        .map(|row| row.into_iter().map(OrderedFloat).collect())
        .collect();
    let engine = WebEngine::new(matrix, request.labels).map_err(engine_error)?;

    let session = Session::new(convert_engine_to_web(&engine), engine);
    state.insert_session(session.clone())?;
    log::info!("created session {} ({} nodes)", session.id, session.graph.nodes.len());

    Ok(Json(session))
}

/// Create a session from a random dense matrix
pub async fn generate_graph(
    State(state): State<AppState>,
    Json(request): Json<GraphGenerationRequest>,
) -> ApiResult<Session> {
    if request.node_count == 0 || request.node_count > MAX_GENERATED_NODES {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            "invalid_graph",
            format!("node_count must be between 1 and {}", MAX_GENERATED_NODES),
        ));
    }

    let matrix = match request.seed {
        Some(seed) => seeded_dense_matrix(request.node_count, request.density, request.max_weight, seed),
        None => random_dense_matrix(
            request.node_count,
            request.density,
            request.max_weight,
            &mut rand::thread_rng(),
        ),
    };

    let labels = if request.alphabetic_labels {
        NodeLabels::alphabetic(request.node_count)
    } else {
        NodeLabels::numeric(request.node_count)
    };

    let matrix = matrix
        .into_iter()
        .map(|row| row.into_iter().map(OrderedFloat).collect())
        .collect();
    let engine = DenseGraph::from_matrix(matrix)
        .and_then(|graph| WebEngine::from_graph(graph, labels))
        .map_err(engine_error)?;

    let session = Session::new(convert_engine_to_web(&engine), engine);
    state.insert_session(session.clone())?;
    log::info!("generated session {} ({} nodes)", session.id, request.node_count);

    Ok(Json(session))
}

/// Get graph data for a session
pub async fn get_graph(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> ApiResult<Arc<WebGraph>> {
    Ok(Json(state.session(session_id)?.graph))
}

/// Shortest distances from one source
pub async fn run_distances(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<DistancesRequest>,
) -> ApiResult<DistancesResponse> {
    let engine = state.engine(session_id)?;
    let query_engine = Arc::clone(&engine);

    let start_time = Instant::now();
    let distances =
        run_blocking(move || query_engine.shortest_distances(request.source.as_node_ref())).await?;
    let execution_time = start_time.elapsed();

    let source = distances.source();
    let response = DistancesResponse {
        execution_id: Uuid::new_v4(),
        source: source.index(),
        source_label: engine.labels().get(source).to_string(),
        execution_time_ms: execution_time.as_secs_f64() * 1000.0,
        reachable_count: distances.reachable_count(),
        distances: distances
            .iter()
            .map(|(id, label, distance)| NodeDistance {
                node: id.index(),
                label: label.to_string(),
                reachable: distance.is_reachable(),
                distance: distance.finite().map(OrderedFloat::into_inner),
                predecessor: distances.predecessor(id).ok().flatten().map(NodeId::index),
            })
            .collect(),
        visit_order: distances.visit_order().map(NodeId::index).collect(),
    };

    Ok(Json(response))
}

/// Shortest route between two nodes, with the route's edges flagged for drawing
pub async fn run_route(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<RouteRequest>,
) -> ApiResult<RouteResponse> {
    let session = state.session(session_id)?;
    let engine = session.engine.clone();

    let (distances, source, target) = run_blocking(move || {
        let source = engine.resolve(request.source.as_node_ref())?;
        let target = engine.resolve(request.target.as_node_ref())?;
        Ok((engine.shortest_distances(source)?, source, target))
    })
    .await?;

    // Per-response copy, taken outside the session lock
    let route = distances.route_to(target);
    let mut graph = WebGraph::clone(&session.graph);
    for node in graph.nodes.iter_mut() {
        let id = NodeId::new(node.id);
        node.distance = distances
            .distance(id)
            .ok()
            .and_then(|d| d.finite())
            .map(OrderedFloat::into_inner);
        node.is_source = id == source;
        node.is_target = id == target;
    }
    if let Some(route) = &route {
        highlight_route(&mut graph, route);
    }

    let response = RouteResponse {
        execution_id: Uuid::new_v4(),
        source: source.index(),
        target: target.index(),
        reachable: route.is_some(),
        distance: route.as_ref().map(|r| r.distance().into_inner()),
        nodes: route
            .as_ref()
            .map(|r| r.nodes().iter().map(|id| id.index()).collect())
            .unwrap_or_default(),
        labels: route.as_ref().map(|r| r.labels().to_vec()).unwrap_or_default(),
        graph,
    };

    Ok(Json(response))
}

/// List all active sessions
pub async fn list_sessions(State(state): State<AppState>) -> ApiResult<Vec<Uuid>> {
    let sessions = state.lock_sessions()?;
    let mut session_ids: Vec<Uuid> = sessions.keys().cloned().collect();
    session_ids.sort();
    Ok(Json(session_ids))
}

/// Get session information
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> ApiResult<Session> {
    Ok(Json(state.session(session_id)?))
}

/// Drop a session and its engine
pub async fn delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    match state.lock_sessions()?.remove(&session_id) {
        Some(_) => Ok(StatusCode::NO_CONTENT),
        None => Err(session_not_found()),
    }
}

/// Health check endpoint
pub async fn health_check() -> ApiResult<serde_json::Value> {
    Ok(Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION")
    })))
}

// Helper functions

fn api_error(status: StatusCode, error: &str, message: String) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
            message,
            details: None,
        }),
    )
}

fn session_not_found() -> ApiError {
    api_error(
        StatusCode::NOT_FOUND,
        "session_not_found",
        "Session not found".to_string(),
    )
}

fn engine_error(err: Error) -> ApiError {
    let (status, code) = match &err {
        Error::InvalidGraph(_) => (StatusCode::BAD_REQUEST, "invalid_graph"),
        Error::Parse { .. } | Error::Json(_) => (StatusCode::BAD_REQUEST, "parse_error"),
        Error::NodeNotFound(_) => (StatusCode::NOT_FOUND, "node_not_found"),
        Error::Cancelled | Error::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
    };
    log::warn!("request rejected: {}", err);
    api_error(status, code, err.to_string())
}

/// Runs a CPU-bound query off the async executor
async fn run_blocking<T, F>(query: F) -> Result<T, ApiError>
where
    F: FnOnce() -> crate::Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(query)
        .await
        .map_err(|e| {
            api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                format!("query task failed: {}", e),
            )
        })?
        .map_err(engine_error)
}

fn convert_engine_to_web(engine: &WebEngine) -> WebGraph {
    let labels = engine.labels();
    let nodes = labels
        .as_slice()
        .iter()
        .enumerate()
        .map(|(i, label)| WebNode {
            id: i,
            label: label.clone(),
            distance: None,
            is_source: false,
            is_target: false,
        })
        .collect();

    let links = engine
        .edges()
        .into_iter()
        .map(|edge| WebEdge {
            source: edge.from.index(),
            target: edge.to.index(),
            weight: edge.weight.into_inner(),
            is_path: false,
        })
        .collect();

    WebGraph { nodes, links }
}

fn highlight_route(graph: &mut WebGraph, route: &Route<WebWeight>) {
    let on_route = route.highlight_set();
    for link in graph.links.iter_mut() {
        link.is_path = on_route.contains(&(NodeId::new(link.source), NodeId::new(link.target)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_node_session() -> Session {
        let engine = WebEngine::new(
            vec![
                vec![OrderedFloat(0.0), OrderedFloat(2.0)],
                vec![OrderedFloat(0.0), OrderedFloat(0.0)],
            ],
            None,
        )
        .unwrap();
        Session::new(convert_engine_to_web(&engine), engine)
    }

    #[test]
    fn session_lookup_shares_graph_and_engine() {
        let state = AppState::new(4);
        let session = two_node_session();
        let id = session.id;
        state.insert_session(session).unwrap();

        let first = state.session(id).unwrap();
        let second = state.session(id).unwrap();
        assert!(Arc::ptr_eq(&first.graph, &second.graph));
        assert!(Arc::ptr_eq(&first.engine, &second.engine));
        assert!(Arc::ptr_eq(&state.engine(id).unwrap(), &first.engine));

        let (status, _) = state.engine(Uuid::new_v4()).unwrap_err();
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn highlighting_a_copy_leaves_the_stored_graph_untouched() {
        let session = two_node_session();
        let route = session.engine.shortest_route(0, 1).unwrap().unwrap();

        let mut graph = WebGraph::clone(&session.graph);
        highlight_route(&mut graph, &route);

        assert!(graph.links[0].is_path);
        assert!(!session.graph.links[0].is_path);
    }
}
