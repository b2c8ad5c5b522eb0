use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use matrix_sssp::graph::parse_matrix;
use matrix_sssp::web::models::NodeDistance;
use matrix_sssp::{GraphDocument, NodeId, NodeLabels, ShortestPathEngine};

const USAGE: &str = "usage: sssp <matrix-file> <source> [target] [--labels A,B,...] [--letters] [--json]";

#[derive(Debug, Default)]
struct Options {
    matrix_file: PathBuf,
    source: String,
    target: Option<String>,
    labels: Option<Vec<String>>,
    letters: bool,
    json: bool,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Options, String> {
    let mut options = Options::default();
    let mut positional = Vec::new();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--labels" => {
                let list = args.next().ok_or("--labels needs a value")?;
                options.labels = Some(list.split(',').map(|s| s.trim().to_string()).collect());
            }
            "--letters" => options.letters = true,
            "--json" => options.json = true,
            "-h" | "--help" => return Err(USAGE.to_string()),
            flag if flag.starts_with("--") => return Err(format!("unknown flag {}\n{}", flag, USAGE)),
            other => positional.push(other.to_string()),
        }
    }

    let mut positional = positional.into_iter();
    options.matrix_file = positional.next().ok_or(USAGE)?.into();
    options.source = positional.next().ok_or(USAGE)?;
    options.target = positional.next();
    if positional.next().is_some() {
        return Err(USAGE.to_string());
    }
    Ok(options)
}

fn load_document(path: &Path) -> matrix_sssp::Result<GraphDocument> {
    let text = fs::read_to_string(path)?;
    if path.extension().map_or(false, |ext| ext == "json") {
        GraphDocument::from_json(&text)
    } else {
        Ok(GraphDocument {
            matrix: parse_matrix(&text)?,
            labels: None,
        })
    }
}

/// Labels from the command line win over labels in the file
fn build_engine(options: &Options) -> matrix_sssp::Result<ShortestPathEngine<f64>> {
    let mut document = load_document(&options.matrix_file)?;
    if options.labels.is_some() {
        document.labels = options.labels.clone();
    } else if options.letters {
        document.labels = Some(NodeLabels::alphabetic(document.matrix.len()).as_slice().to_vec());
    }
    document.into_engine()
}

/// Numeric arguments are indices unless they name a label
fn resolve(engine: &ShortestPathEngine<f64>, node: &str) -> matrix_sssp::Result<NodeId> {
    engine.resolve(node).or_else(|err| match node.parse::<usize>() {
        Ok(index) => engine.resolve(index),
        Err(_) => Err(err),
    })
}

fn run(options: &Options) -> matrix_sssp::Result<()> {
    let engine = build_engine(options)?;
    let source = resolve(&engine, &options.source)?;
    let target = options
        .target
        .as_deref()
        .map(|t| resolve(&engine, t))
        .transpose()?;

    let distances = engine.shortest_distances(source)?;
    let route = target.and_then(|t| distances.route_to(t));

    if options.json {
        let rows: Vec<NodeDistance> = distances
            .iter()
            .map(|(id, label, d)| NodeDistance {
                node: id.index(),
                label: label.to_string(),
                reachable: d.is_reachable(),
                distance: d.finite(),
                predecessor: distances.predecessor(id).ok().flatten().map(NodeId::index),
            })
            .collect();
        let route_json = match (target, &route) {
            (Some(_), Some(r)) => serde_json::json!({ "labels": r.labels(), "distance": r.distance() }),
            (Some(_), None) => serde_json::json!("unreachable"),
            (None, _) => serde_json::Value::Null,
        };
        let output = serde_json::json!({
            "source": engine.labels().get(source),
            "distances": rows,
            "route": route_json,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("Shortest distances from {}:", engine.labels().get(source));
    for (_, label, distance) in distances.iter() {
        match distance.finite() {
            Some(d) => println!("  {:<8} {}", label, d),
            None => println!("  {:<8} unreachable", label),
        }
    }

    if let Some(target) = target {
        match &route {
            Some(route) => println!(
                "\nRoute to {}: {} (distance {})",
                engine.labels().get(target),
                route.labels().join(" -> "),
                route.distance()
            ),
            None => println!("\nRoute to {}: unreachable", engine.labels().get(target)),
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    let options = match parse_args(env::args().skip(1)) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("{}", message);
            return ExitCode::from(2);
        }
    };

    match run(&options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> impl Iterator<Item = String> {
        list.iter().map(|s| s.to_string()).collect::<Vec<_>>().into_iter()
    }

    #[test]
    fn parses_positionals_and_flags() {
        let options = parse_args(args(&["graph.txt", "A", "E", "--labels", "A, B,C", "--json"])).unwrap();
        assert_eq!(options.matrix_file, PathBuf::from("graph.txt"));
        assert_eq!(options.source, "A");
        assert_eq!(options.target.as_deref(), Some("E"));
        assert_eq!(options.labels, Some(vec!["A".to_string(), "B".to_string(), "C".to_string()]));
        assert!(options.json);
        assert!(!options.letters);
    }

    #[test]
    fn usage_errors() {
        assert_eq!(parse_args(args(&[])).unwrap_err(), USAGE);
        assert_eq!(parse_args(args(&["graph.txt"])).unwrap_err(), USAGE);
        assert_eq!(parse_args(args(&["g", "0", "1", "2"])).unwrap_err(), USAGE);
        assert_eq!(parse_args(args(&["--help"])).unwrap_err(), USAGE);
        assert!(parse_args(args(&["g", "0", "--labels"])).unwrap_err().contains("--labels"));
        assert!(parse_args(args(&["g", "0", "--verbose"])).unwrap_err().starts_with("unknown flag --verbose"));
    }

    #[test]
    fn labels_win_over_indices() {
        let engine = ShortestPathEngine::new(
            vec![vec![0.0, 1.0, 0.0], vec![0.0, 0.0, 1.0], vec![0.0, 0.0, 0.0]],
            Some(vec!["2".into(), "0".into(), "x".into()]),
        )
        .unwrap();

        // "0" names node 1, "2" names node 0
        assert_eq!(resolve(&engine, "0").unwrap(), NodeId::new(1));
        assert_eq!(resolve(&engine, "2").unwrap(), NodeId::new(0));
        // Not a label, so read as an index
        assert_eq!(resolve(&engine, "1").unwrap(), NodeId::new(1));
        assert_eq!(resolve(&engine, "x").unwrap(), NodeId::new(2));
        assert!(resolve(&engine, "7").is_err());
        assert!(resolve(&engine, "y").is_err());
    }

    #[test]
    fn numeric_labels_resolve_to_matching_indices() {
        let engine = ShortestPathEngine::new(vec![vec![0.0, 1.0], vec![0.0, 0.0]], None).unwrap();
        assert_eq!(resolve(&engine, "1").unwrap(), NodeId::new(1));
    }
}
