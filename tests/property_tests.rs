use matrix_sssp::graph::generators::{complete_matrix, random_dense_matrix, seeded_dense_matrix};
use matrix_sssp::{Distance, NodeId, ShortestPathEngine};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;

// Reference distances by repeated relaxation over every edge
fn bellman_ford(matrix: &[Vec<f64>], source: usize) -> Vec<Option<f64>> {
    let n = matrix.len();
    let mut dist = vec![None; n];
    dist[source] = Some(0.0);
    for _ in 0..n {
        let mut changed = false;
        for u in 0..n {
            let Some(du) = dist[u] else { continue };
            for v in 0..n {
                let w = matrix[u][v];
                if w > 0.0 && dist[v].map_or(true, |dv| du + w < dv) {
                    dist[v] = Some(du + w);
                    changed = true;
                }
            }
        }
        if !changed {
            break;
        }
    }
    dist
}

fn reachable(matrix: &[Vec<f64>], source: usize) -> Vec<bool> {
    let mut seen = vec![false; matrix.len()];
    let mut queue = VecDeque::from([source]);
    seen[source] = true;
    while let Some(u) = queue.pop_front() {
        for (v, &w) in matrix[u].iter().enumerate() {
            if w > 0.0 && !seen[v] {
                seen[v] = true;
                queue.push_back(v);
            }
        }
    }
    seen
}

#[test]
fn test_matches_reference_on_random_graphs() {
    let mut rng = StdRng::seed_from_u64(42);

    for _ in 0..40 {
        let n = rng.gen_range(1..25);
        let density = rng.gen_range(0.05..0.6);
        // Integer weights keep sums exact
        let matrix: Vec<Vec<f64>> = random_dense_matrix(n, density, 20.0, &mut rng)
            .into_iter()
            .map(|row| row.into_iter().map(f64::floor).collect())
            .collect();
        let engine = ShortestPathEngine::new(matrix.clone(), None).unwrap();
        let source = rng.gen_range(0..n);

        let result = engine.shortest_distances(source).unwrap();
        let expected = bellman_ford(&matrix, source);
        let reach = reachable(&matrix, source);

        for v in 0..n {
            let d = result.distance(v).unwrap();
            assert_eq!(d.finite(), expected[v], "node {} from {} in {:?}", v, source, matrix);
            assert_eq!(d.is_reachable(), reach[v]);
        }
    }
}

#[test]
fn test_relaxation_fixpoint_holds() {
    for seed in 0..20 {
        let matrix = seeded_dense_matrix(30, 0.2, 50.0, seed);
        let engine = ShortestPathEngine::new(matrix.clone(), None).unwrap();
        let result = engine.shortest_distances(0).unwrap();

        assert_eq!(result.distance(0).unwrap(), Distance::Finite(0.0));

        for edge in engine.edges() {
            let du = result.distance(edge.from).unwrap();
            let dv = result.distance(edge.to).unwrap();
            if let Distance::Finite(du) = du {
                let dv = dv.finite().expect("successor of a reachable node is reachable");
                assert!(dv <= du + edge.weight + 1e-9);
                assert!(dv >= 0.0);
            }
        }
    }
}

#[test]
fn test_routes_follow_predecessors() {
    let matrix = seeded_dense_matrix(40, 0.15, 10.0, 7);
    let engine = ShortestPathEngine::new(matrix, None).unwrap();
    let result = engine.shortest_distances(3).unwrap();

    for (id, _, distance) in result.iter() {
        match result.route_to(id) {
            Some(route) => {
                assert_eq!(route.nodes().first(), Some(&NodeId::new(3)));
                assert_eq!(route.nodes().last(), Some(&id));
                assert_eq!(Distance::Finite(route.distance()), distance);
            }
            None => assert_eq!(distance, Distance::Unreachable),
        }
    }
}

#[test]
fn test_all_sources_matches_sequential_queries() {
    let matrix = seeded_dense_matrix(25, 0.3, 10.0, 99);
    let engine = ShortestPathEngine::new(matrix, None).unwrap();

    let parallel = engine.all_sources().unwrap();
    assert_eq!(parallel.len(), 25);

    for (source, result) in parallel.iter().enumerate() {
        assert_eq!(result.source(), NodeId::new(source));
        let sequential = engine.shortest_distances(source).unwrap();
        assert_eq!(result.as_result(), sequential.as_result());
    }
}

#[test]
fn test_uniform_complete_graph_is_one_hop_everywhere() {
    let engine = ShortestPathEngine::new(complete_matrix(12, 1.5), None).unwrap();
    let result = engine.shortest_distances(5).unwrap();
    for (id, _, distance) in result.iter() {
        let expected = if id.index() == 5 { 0.0 } else { 1.5 };
        assert_eq!(distance, Distance::Finite(expected));
    }
}
