use matrix_sssp::graph::generators::chain_matrix;
use matrix_sssp::{CancelToken, Error, NodeId, RouteTracking, ShortestPathEngine};

fn scenario_a() -> ShortestPathEngine {
    ShortestPathEngine::new(
        vec![
            vec![0.0, 3.0, 0.0, 1.0],
            vec![0.0, 0.0, 1.0, 0.0],
            vec![0.0, 0.0, 0.0, 0.0],
            vec![0.0, 1.0, 2.0, 0.0],
        ],
        None,
    )
    .unwrap()
}

fn ids(route: &[NodeId]) -> Vec<usize> {
    route.iter().map(|id| id.index()).collect()
}

#[test]
fn test_route_takes_first_discovered_tie() {
    let engine = scenario_a();

    // 0->3->2 and 0->3->1->2 both cost 3; 3 is finalized first and claims 2
    let route = engine.shortest_route(0, 2).unwrap().unwrap();
    assert_eq!(ids(route.nodes()), vec![0, 3, 2]);
    assert_eq!(route.distance(), 3.0);
    assert_eq!(route.hop_count(), 2);

    let route = engine.shortest_route(0, 1).unwrap().unwrap();
    assert_eq!(ids(route.nodes()), vec![0, 3, 1]);
    assert_eq!(route.labels(), ["0", "3", "1"]);
}

#[test]
fn test_route_to_self() {
    let engine = scenario_a();
    let route = engine.shortest_route(2, 2).unwrap().unwrap();
    assert_eq!(ids(route.nodes()), vec![2]);
    assert_eq!(route.distance(), 0.0);
    assert!(route.edges().is_empty());
}

#[test]
fn test_unreachable_target_has_no_route() {
    let engine = scenario_a();
    assert!(engine.shortest_route(2, 0).unwrap().is_none());

    let result = engine.shortest_distances(2).unwrap();
    assert!(result.route_to(NodeId::new(0)).is_none());
    assert_eq!(result.predecessor(0).unwrap(), None);
}

#[test]
fn test_route_edges_and_highlight_set() {
    let engine = ShortestPathEngine::new(chain_matrix(5, 2.5), Some(vec![
        "a".into(), "b".into(), "c".into(), "d".into(), "e".into(),
    ]))
    .unwrap();

    let route = engine.shortest_route("a", "e").unwrap().unwrap();
    assert_eq!(route.distance(), 10.0);
    assert_eq!(route.labels(), ["a", "b", "c", "d", "e"]);

    let edges: Vec<(usize, usize)> = route.edges().into_iter().map(|(u, v)| (u.index(), v.index())).collect();
    assert_eq!(edges, vec![(0, 1), (1, 2), (2, 3), (3, 4)]);

    let set = route.highlight_set();
    assert_eq!(set.len(), 4);
    assert!(set.contains(&(NodeId::new(2), NodeId::new(3))));
    assert!(!set.contains(&(NodeId::new(3), NodeId::new(2))));
}

#[test]
fn test_route_weights_sum_to_distance() {
    let engine = ShortestPathEngine::new(
        vec![
            vec![0.0, 4.0, 0.0, 2.0, 0.0],
            vec![0.0, 0.0, 5.0, 0.0, 0.0],
            vec![0.0, 0.0, 0.0, 0.0, 3.0],
            vec![0.0, 1.0, 0.0, 0.0, 6.0],
            vec![0.0, 0.0, 0.0, 0.0, 0.0],
        ],
        None,
    )
    .unwrap();

    let matrix = engine.graph().to_matrix();
    for target in 0..5usize {
        let route = engine.shortest_route(0, target).unwrap().unwrap();
        let total: f64 = route
            .edges()
            .into_iter()
            .map(|(u, v)| matrix[u.index()][v.index()])
            .sum();
        assert!(route.edges().iter().all(|(u, v)| matrix[u.index()][v.index()] > 0.0));
        assert_eq!(total, route.distance());
    }
}

#[test]
fn test_full_route_table_matches_predecessor_routes() {
    let plain = scenario_a();
    let tracked = scenario_a().with_route_tracking(RouteTracking::FullRoutes);

    for source in 0..4usize {
        let a = plain.shortest_distances(source).unwrap();
        let b = tracked.shortest_distances(source).unwrap();
        assert!(a.as_result().routes.is_none());
        assert!(b.as_result().routes.is_some());
        for target in 0..4 {
            assert_eq!(a.route_to(NodeId::new(target)), b.route_to(NodeId::new(target)));
        }
    }
}

#[test]
fn test_cancelled_query_returns_error() {
    let engine = scenario_a();
    let token = CancelToken::new();

    let result = engine.shortest_distances_cancellable(0, &token).unwrap();
    assert_eq!(result.reachable_count(), 4);

    let shared = token.clone();
    shared.cancel();
    assert!(token.is_cancelled());
    assert!(matches!(engine.shortest_distances_cancellable(0, &token), Err(Error::Cancelled)));
}
