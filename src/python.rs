use crate::engine::ShortestPathEngine;
use crate::graph::NodeRef;
use crate::Error;
use ordered_float::OrderedFloat;
use pyo3::exceptions::{PyKeyError, PyRuntimeError, PyValueError};
use pyo3::prelude::*;

/// A node given from Python as an index or a label
#[derive(FromPyObject)]
enum PyNode {
    Index(usize),
    Label(String),
}

impl PyNode {
    fn as_node_ref(&self) -> NodeRef<'_> {
        match self {
            PyNode::Index(index) => NodeRef::Index(*index),
            PyNode::Label(label) => NodeRef::Label(label),
        }
    }
}

fn to_py_err(err: Error) -> PyErr {
    match err {
        Error::InvalidGraph(_) | Error::Parse { .. } => PyValueError::new_err(err.to_string()),
        Error::NodeNotFound(_) => PyKeyError::new_err(err.to_string()),
        _ => PyRuntimeError::new_err(err.to_string()),
    }
}

#[pyclass(name = "ShortestPathEngine")]
pub struct PyShortestPathEngine {
    inner: ShortestPathEngine<OrderedFloat<f64>>,
}

#[pymethods]
impl PyShortestPathEngine {
    #[new]
    #[pyo3(signature = (matrix, labels = None))]
    fn new(matrix: Vec<Vec<f64>>, labels: Option<Vec<String>>) -> PyResult<Self> {
        let matrix = matrix
            .into_iter()
            .map(|row| row.into_iter().map(OrderedFloat).collect())
            .collect();
        let inner = ShortestPathEngine::new(matrix, labels).map_err(to_py_err)?;
        Ok(PyShortestPathEngine { inner })
    }

    fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    /// Returns `[(label, distance)]` in node order; unreachable nodes have `None`
    fn shortest_distances(&self, source: PyNode) -> PyResult<Vec<(String, Option<f64>)>> {
        let result = self
            .inner
            .shortest_distances(source.as_node_ref())
            .map_err(to_py_err)?;
        Ok(result
            .iter()
            .map(|(_, label, d)| (label.to_string(), d.finite().map(|w| w.into_inner())))
            .collect())
    }

    /// Returns `(labels, distance)` or `None` when the target is unreachable
    fn shortest_route(&self, source: PyNode, target: PyNode) -> PyResult<Option<(Vec<String>, f64)>> {
        let route = self
            .inner
            .shortest_route(source.as_node_ref(), target.as_node_ref())
            .map_err(to_py_err)?;
        Ok(route.map(|r| (r.labels().to_vec(), r.distance().into_inner())))
    }

    /// Returns `[(from, to, weight)]` for every edge
    fn edges(&self) -> Vec<(usize, usize, f64)> {
        self.inner
            .edges()
            .into_iter()
            .map(|e| (e.from.index(), e.to.index(), e.weight.into_inner()))
            .collect()
    }
}

/// Exported as `PyInit_matrix_sssp`; must match `[lib] name` for `import matrix_sssp`
#[pymodule]
fn matrix_sssp(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_class::<PyShortestPathEngine>()?;
    Ok(())
}
