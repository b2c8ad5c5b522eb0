use serde::{Deserialize, Serialize};

use crate::engine::ShortestPathEngine;
use crate::{Error, Result};

/// A graph as exchanged in JSON: a weight matrix plus optional labels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphDocument {
    pub matrix: Vec<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
}

impl GraphDocument {
    /// Parses a JSON document of the form `{"matrix": [[...]], "labels": [...]}`
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Validates the document and builds an engine from it
    pub fn into_engine(self) -> Result<ShortestPathEngine<f64>> {
        ShortestPathEngine::new(self.matrix, self.labels)
    }
}

/// Parses a plain-text weight matrix
///
/// One row per line, entries separated by whitespace and/or commas. Blank lines and
/// anything after `#` are ignored. Shape is not checked here; that happens when the
/// graph is built.
pub fn parse_matrix(text: &str) -> Result<Vec<Vec<f64>>> {
    let mut matrix = Vec::new();

    for (line_idx, raw_line) in text.lines().enumerate() {
        let line = match raw_line.find('#') {
            Some(pos) => &raw_line[..pos],
            None => raw_line,
        };

        let mut row = Vec::new();
        for token in line
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|t| !t.is_empty())
        {
            let value = token.parse::<f64>().map_err(|e| Error::Parse {
                line: line_idx + 1,
                message: format!("invalid weight {:?}: {}", token, e),
            })?;
            row.push(value);
        }

        if !row.is_empty() {
            matrix.push(row);
        }
    }

    if matrix.is_empty() {
        return Err(Error::Parse {
            line: 0,
            message: "no matrix rows found".to_string(),
        });
    }

    Ok(matrix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_mixed_separators_and_comments() {
        let text = "# four nodes\n0, 3 0 1\n0 0 1 0   # row b\n\n0,0,0,0\n0 1 2 0\n";
        let matrix = parse_matrix(text).unwrap();
        assert_eq!(
            matrix,
            vec![
                vec![0.0, 3.0, 0.0, 1.0],
                vec![0.0, 0.0, 1.0, 0.0],
                vec![0.0, 0.0, 0.0, 0.0],
                vec![0.0, 1.0, 2.0, 0.0],
            ]
        );
    }

    #[test]
    fn reports_the_offending_line() {
        let err = parse_matrix("0 1\n1 x\n").unwrap_err();
        match err {
            Error::Parse { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(matches!(parse_matrix("# nothing\n\n"), Err(Error::Parse { .. })));
    }

    #[test]
    fn document_round_trips_through_json() {
        let doc = GraphDocument::from_json(r#"{"matrix": [[0, 2], [0, 0]], "labels": ["a", "b"]}"#).unwrap();
        assert_eq!(doc.labels.as_deref(), Some(&["a".to_string(), "b".to_string()][..]));

        let engine = doc.into_engine().unwrap();
        let route = engine.shortest_route("a", "b").unwrap().unwrap();
        assert_eq!(route.distance(), 2.0);
    }
}
