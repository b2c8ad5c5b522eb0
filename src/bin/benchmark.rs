use std::time::{Duration, Instant};
use ordered_float::OrderedFloat;
use matrix_sssp::graph::generators::seeded_dense_matrix;
use matrix_sssp::ShortestPathEngine;

// Build an engine over a random dense matrix with the given edge density
fn generate_engine(num_vertices: usize, density: f64, seed: u64) -> ShortestPathEngine<OrderedFloat<f64>> {
    let matrix = seeded_dense_matrix(num_vertices, density, 100.0, seed)
        .into_iter()
        .map(|row| row.into_iter().map(OrderedFloat).collect())
        .collect();

    match ShortestPathEngine::new(matrix, None) {
        Ok(engine) => engine,
        Err(err) => {
            eprintln!("failed to build benchmark graph: {}", err);
            std::process::exit(1);
        }
    }
}

fn time_single_source(engine: &ShortestPathEngine<OrderedFloat<f64>>) -> (Duration, usize) {
    let start = Instant::now();
    let reachable = match engine.shortest_distances(0) {
        Ok(result) => result.reachable_count(),
        Err(err) => {
            eprintln!("query failed: {}", err);
            0
        }
    };
    (start.elapsed(), reachable)
}

fn time_all_sources_sequential(engine: &ShortestPathEngine<OrderedFloat<f64>>) -> Duration {
    let start = Instant::now();
    for source in 0..engine.node_count() {
        if let Err(err) = engine.shortest_distances(source) {
            eprintln!("query from {} failed: {}", source, err);
        }
    }
    start.elapsed()
}

fn time_all_sources_parallel(engine: &ShortestPathEngine<OrderedFloat<f64>>) -> Duration {
    let start = Instant::now();
    if let Err(err) = engine.all_sources() {
        eprintln!("parallel queries failed: {}", err);
    }
    start.elapsed()
}

fn main() {
    env_logger::init();

    let graph_sizes = vec![100, 250, 500, 1_000, 2_000];
    let density = 0.25;

    println!("=====================================================");
    println!("Benchmark: dense Dijkstra, density {}", density);
    println!("=====================================================");

    let mut results = Vec::new();

    for (i, &size) in graph_sizes.iter().enumerate() {
        let engine = generate_engine(size, density, i as u64);
        println!(
            "\n{} vertices, {} edges",
            engine.node_count(),
            engine.edges().len()
        );

        let (single, reachable) = time_single_source(&engine);
        println!("  single source: {:?} ({} reachable)", single, reachable);

        let sequential = time_all_sources_sequential(&engine);
        let parallel = time_all_sources_parallel(&engine);
        let speedup = sequential.as_secs_f64() / parallel.as_secs_f64().max(f64::EPSILON);
        println!("  all sources: sequential {:?}, parallel {:?} ({:.2}x)", sequential, parallel, speedup);

        results.push((size, single, sequential, parallel, speedup));
    }

    // Print summary table
    println!("\n=====================================================");
    println!("Summary of Results");
    println!("=====================================================");
    println!("{:<10} | {:<12} | {:<15} | {:<15} | {:<8}",
             "Vertices", "Single (us)", "All seq (ms)", "All par (ms)", "Speedup");
    println!("-----------------------------------------------------");

    for (size, single, sequential, parallel, speedup) in &results {
        println!("{:<10} | {:<12} | {:<15} | {:<15} | {:<8.2}",
                 size,
                 single.as_micros(),
                 sequential.as_millis(),
                 parallel.as_millis(),
                 speedup);
    }
}
