use crate::graph::traits::Graph;
use crate::{Error, Result};
use num_traits::{Float, Zero};
use std::fmt::Debug;

/// A directed graph backed by a dense n×n weight matrix
///
/// Input matrices use `0` for "no edge". That overload is resolved once here:
/// the stored matrix holds `None` for absent edges, so a zero-cost edge can never
/// be confused with a missing one downstream.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseGraph<W>
where
    W: Float + Zero + Debug + Copy,
{
    /// Number of vertices in the graph
    vertex_count: usize,

    /// Row-major weights: `weights[from * n + to]`
    weights: Vec<Option<W>>,

    /// Number of present edges, counted at construction
    edge_count: usize,
}

impl<W> DenseGraph<W>
where
    W: Float + Zero + Debug + Copy,
{
    /// Builds a graph from a square matrix of non-negative, finite weights
    ///
    /// Rows are source nodes and columns are destinations. Fails with
    /// [`Error::InvalidGraph`] on an empty or non-square matrix and on negative,
    /// NaN or infinite entries. Nothing is kept on failure.
    pub fn from_matrix(matrix: Vec<Vec<W>>) -> Result<Self> {
        let n = matrix.len();
        if n == 0 {
            return Err(Error::InvalidGraph(
                "matrix must contain at least one node".to_string(),
            ));
        }

        let mut weights = Vec::with_capacity(n * n);
        let mut edge_count = 0;

        for (row_idx, row) in matrix.into_iter().enumerate() {
            if row.len() != n {
                return Err(Error::InvalidGraph(format!(
                    "matrix is not square: row {} has {} entries, expected {}",
                    row_idx,
                    row.len(),
                    n
                )));
            }

            for (col_idx, weight) in row.into_iter().enumerate() {
                if !weight.is_finite() {
                    return Err(Error::InvalidGraph(format!(
                        "non-finite weight {:?} at ({}, {})",
                        weight, row_idx, col_idx
                    )));
                }
                if weight < W::zero() {
                    return Err(Error::InvalidGraph(format!(
                        "negative weight {:?} at ({}, {})",
                        weight, row_idx, col_idx
                    )));
                }

                if weight > W::zero() {
                    edge_count += 1;
                    weights.push(Some(weight));
                } else {
                    weights.push(None);
                }
            }
        }

        Ok(DenseGraph {
            vertex_count: n,
            weights,
            edge_count,
        })
    }

    /// Returns the matrix back in its input encoding (zero for "no edge")
    pub fn to_matrix(&self) -> Vec<Vec<W>> {
        self.weights
            .chunks(self.vertex_count)
            .map(|row| row.iter().map(|w| w.unwrap_or_else(W::zero)).collect())
            .collect()
    }

    /// Returns one row of the matrix: the outgoing weights of `vertex`
    pub fn row(&self, vertex: usize) -> &[Option<W>] {
        let start = vertex * self.vertex_count;
        &self.weights[start..start + self.vertex_count]
    }

    /// Iterates over every present edge as `(from, to, weight)`, row-major
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize, W)> + '_ {
        let n = self.vertex_count;
        self.weights
            .iter()
            .enumerate()
            .filter_map(move |(idx, w)| w.map(|weight| (idx / n, idx % n, weight)))
    }
}

impl<W> Graph<W> for DenseGraph<W>
where
    W: Float + Zero + Debug + Copy,
{
    fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    fn edge_count(&self) -> usize {
        self.edge_count
    }

    fn outgoing_edges(&self, vertex: usize) -> Box<dyn Iterator<Item = (usize, W)> + '_> {
        if !self.has_vertex(vertex) {
            return Box::new(std::iter::empty());
        }

        Box::new(
            self.row(vertex)
                .iter()
                .enumerate()
                .filter_map(|(target, w)| w.map(|weight| (target, weight))),
        )
    }

    fn incoming_edges(&self, vertex: usize) -> Box<dyn Iterator<Item = (usize, W)> + '_> {
        if !self.has_vertex(vertex) {
            return Box::new(std::iter::empty());
        }

        let n = self.vertex_count;
        Box::new(
            (0..n).filter_map(move |source| self.weights[source * n + vertex].map(|w| (source, w))),
        )
    }

    fn get_edge_weight(&self, from: usize, to: usize) -> Option<W> {
        if !self.has_vertex(from) || !self.has_vertex(to) {
            return None;
        }
        self.weights[from * self.vertex_count + to]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_entries_are_absent_edges() {
        let graph = DenseGraph::from_matrix(vec![vec![0.0, 2.0], vec![0.0, 0.0]]).unwrap();
        assert_eq!(graph.vertex_count(), 2);
        assert_eq!(graph.edge_count(), 1);
        assert!(graph.has_edge(0, 1));
        assert!(!graph.has_edge(1, 0));
        assert_eq!(graph.get_edge_weight(0, 0), None);
        assert_eq!(graph.get_edge_weight(0, 1), Some(2.0));
    }

    #[test]
    fn rejects_ragged_rows() {
        let err = DenseGraph::from_matrix(vec![vec![0.0, 1.0], vec![0.0]]).unwrap_err();
        assert!(matches!(err, Error::InvalidGraph(_)));
    }

    #[test]
    fn rejects_non_finite_weights() {
        let err = DenseGraph::from_matrix(vec![vec![f64::NAN]]).unwrap_err();
        assert!(matches!(err, Error::InvalidGraph(_)));

        let err = DenseGraph::from_matrix(vec![vec![0.0, f64::INFINITY], vec![0.0, 0.0]]).unwrap_err();
        assert!(matches!(err, Error::InvalidGraph(_)));
    }

    #[test]
    fn incoming_edges_read_the_column() {
        let graph = DenseGraph::from_matrix(vec![
            vec![0.0, 1.0, 0.0],
            vec![0.0, 0.0, 0.0],
            vec![0.0, 4.0, 0.0],
        ])
        .unwrap();

        let incoming: Vec<_> = graph.incoming_edges(1).collect();
        assert_eq!(incoming, vec![(0, 1.0), (2, 4.0)]);
        assert_eq!(graph.outgoing_edges(1).count(), 0);
        assert_eq!(graph.outgoing_edges(7).count(), 0);
    }

    #[test]
    fn to_matrix_restores_zero_encoding() {
        let matrix = vec![vec![0.0, 3.0], vec![5.0, 0.0]];
        let graph = DenseGraph::from_matrix(matrix.clone()).unwrap();
        assert_eq!(graph.to_matrix(), matrix);
        assert_eq!(graph.edges().collect::<Vec<_>>(), vec![(0, 1, 3.0), (1, 0, 5.0)]);
    }
}
