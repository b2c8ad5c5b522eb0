use crate::{Error, Result};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

/// Index of a node in the matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Wraps a raw index; it is range-checked when used in a query
    pub fn new(index: usize) -> Self {
        NodeId(index)
    }

    /// Returns the row/column index of this node
    pub fn index(self) -> usize {
        self.0
    }
}

impl From<NodeId> for usize {
    fn from(id: NodeId) -> usize {
        id.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A node reference supplied by a caller: either a matrix index or a label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRef<'a> {
    Index(usize),
    Label(&'a str),
}

impl From<usize> for NodeRef<'_> {
    fn from(index: usize) -> Self {
        NodeRef::Index(index)
    }
}

impl From<NodeId> for NodeRef<'_> {
    fn from(id: NodeId) -> Self {
        NodeRef::Index(id.index())
    }
}

impl<'a> From<&'a str> for NodeRef<'a> {
    fn from(label: &'a str) -> Self {
        NodeRef::Label(label)
    }
}

impl<'a> From<&'a String> for NodeRef<'a> {
    fn from(label: &'a String) -> Self {
        NodeRef::Label(label.as_str())
    }
}

impl fmt::Display for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeRef::Index(index) => write!(f, "index {}", index),
            NodeRef::Label(label) => write!(f, "label {:?}", label),
        }
    }
}

/// Display labels for the nodes of a graph, with a reverse lookup table
///
/// Cloning is cheap: both tables are shared.
#[derive(Debug, Clone)]
pub struct NodeLabels {
    names: Arc<[String]>,
    index: Arc<HashMap<String, usize>>,
}

impl NodeLabels {
    /// Builds labels for `n` nodes, defaulting to `"0".."n-1"` when none are given
    ///
    /// Fails with [`Error::InvalidGraph`] if the count differs from `n` or a label
    /// repeats.
    pub fn new(labels: Option<Vec<String>>, n: usize) -> Result<Self> {
        match labels {
            Some(names) => Self::from_names(names, n),
            None => Ok(Self::numeric(n)),
        }
    }

    /// Labels nodes by their index
    pub fn numeric(n: usize) -> Self {
        Self::build((0..n).map(|i| i.to_string()).collect())
    }

    /// Labels nodes `A`, `B`, ..., `Z`, `AA`, `AB`, ... like spreadsheet columns
    pub fn alphabetic(n: usize) -> Self {
        Self::build((0..n).map(alphabetic_label).collect())
    }

    fn from_names(names: Vec<String>, n: usize) -> Result<Self> {
        if names.len() != n {
            return Err(Error::InvalidGraph(format!(
                "expected {} labels, got {}",
                n,
                names.len()
            )));
        }

        let labels = Self::build(names);
        if labels.index.len() != n {
            let mut seen = HashSet::with_capacity(n);
            for name in labels.names.iter() {
                if !seen.insert(name.as_str()) {
                    return Err(Error::InvalidGraph(format!("duplicate label {:?}", name)));
                }
            }
        }
        Ok(labels)
    }

    fn build(names: Vec<String>) -> Self {
        let index = names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect();
        NodeLabels {
            names: names.into(),
            index: Arc::new(index),
        }
    }

    /// Number of labelled nodes
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns true if there are no labels
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Label of a node
    pub fn get(&self, id: NodeId) -> &str {
        &self.names[id.index()]
    }

    /// All labels in index order
    pub fn as_slice(&self) -> &[String] {
        &self.names
    }

    /// Resolves an index or label to a [`NodeId`]
    pub fn resolve(&self, node: NodeRef<'_>) -> Result<NodeId> {
        match node {
            NodeRef::Index(index) if index < self.names.len() => Ok(NodeId(index)),
            NodeRef::Label(label) => self
                .index
                .get(label)
                .map(|&i| NodeId(i))
                .ok_or_else(|| Error::NodeNotFound(node.to_string())),
            NodeRef::Index(_) => Err(Error::NodeNotFound(node.to_string())),
        }
    }
}

fn alphabetic_label(mut index: usize) -> String {
    let mut label = Vec::new();
    loop {
        label.push(b'A' + (index % 26) as u8);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    label.reverse();
    String::from_utf8_lossy(&label).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alphabetic_labels_roll_over() {
        let labels = NodeLabels::alphabetic(28);
        assert_eq!(labels.get(NodeId(0)), "A");
        assert_eq!(labels.get(NodeId(25)), "Z");
        assert_eq!(labels.get(NodeId(26)), "AA");
        assert_eq!(labels.get(NodeId(27)), "AB");
        assert_eq!(alphabetic_label(26 * 27), "AAA");
    }

    #[test]
    fn resolves_by_index_and_label() {
        let labels = NodeLabels::new(Some(vec!["x".into(), "y".into()]), 2).unwrap();
        assert_eq!(labels.resolve(NodeRef::Label("y")).unwrap(), NodeId(1));
        assert_eq!(labels.resolve(1.into()).unwrap(), NodeId(1));
        assert!(matches!(labels.resolve(2.into()), Err(Error::NodeNotFound(_))));
        assert!(matches!(labels.resolve("z".into()), Err(Error::NodeNotFound(_))));
    }

    #[test]
    fn rejects_duplicates_and_wrong_count() {
        let dup = NodeLabels::new(Some(vec!["a".into(), "a".into()]), 2);
        assert!(matches!(dup, Err(Error::InvalidGraph(_))));

        let short = NodeLabels::new(Some(vec!["a".into()]), 2);
        assert!(matches!(short, Err(Error::InvalidGraph(_))));
    }
}
