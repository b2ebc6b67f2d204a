//! Regression trees with fixed-point thresholds and leaves

use serde::{Deserialize, Serialize};

/// A tree node, either a split or a leaf
///
/// Splits carry a feature index `>= 0` and child indices. Leaves carry
/// `feature_idx == -1` and a `leaf` value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Node {
    /// Node ID, informational
    pub id: i32,

    /// Left child index (-1 for leaves)
    pub left: i32,

    /// Right child index (-1 for leaves)
    pub right: i32,

    /// Feature index to split on (-1 for leaves)
    #[serde(rename = "feature_idx", alias = "feature")]
    pub feature_idx: i32,

    /// Split threshold, fixed-point
    pub threshold: i64,

    /// Leaf value, fixed-point
    pub leaf: Option<i64>,
}

impl Node {
    pub fn split(id: i32, feature_idx: i32, threshold: i64, left: i32, right: i32) -> Self {
        Self {
            id,
            left,
            right,
            feature_idx,
            threshold,
            leaf: None,
        }
    }

    pub fn leaf(id: i32, value: i64) -> Self {
        Self {
            id,
            left: -1,
            right: -1,
            feature_idx: -1,
            threshold: 0,
            leaf: Some(value),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.feature_idx == -1 || self.leaf.is_some()
    }

    fn child(&self, go_left: bool, len: usize) -> Option<usize> {
        let idx = if go_left { self.left } else { self.right };
        usize::try_from(idx).ok().filter(|idx| *idx < len)
    }
}

/// A single weighted regression tree; node 0 is the root
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Tree {
    pub nodes: Vec<Node>,

    /// Ensemble weight, fixed-point
    pub weight: i64,
}

impl Tree {
    pub fn new(nodes: Vec<Node>, weight: i64) -> Self {
        Self { nodes, weight }
    }

    /// Walk from the root to a leaf and return its value
    ///
    /// Goes left when `feature <= threshold`. A malformed path (bad child or
    /// feature index) yields `None`; `validate` rules those out at load time.
    pub fn evaluate(&self, features: &[i64]) -> Option<i64> {
        let mut idx = 0usize;
        // A valid path visits each node at most once
        for _ in 0..self.nodes.len() {
            let node = self.nodes.get(idx)?;
            if node.is_leaf() {
                return node.leaf;
            }
            let value = *features.get(usize::try_from(node.feature_idx).ok()?)?;
            idx = node.child(value <= node.threshold, self.nodes.len())?;
        }
        None
    }

    /// Check structure against a model with `feature_count` inputs
    pub fn validate(&self, feature_count: usize) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }

        for (i, node) in self.nodes.iter().enumerate() {
            if node.is_leaf() {
                if node.leaf.is_none() {
                    return Err(format!("leaf node {i} has no value"));
                }
                continue;
            }
            if node.child(true, self.nodes.len()).is_none() {
                return Err(format!("node {i} has invalid left child {}", node.left));
            }
            if node.child(false, self.nodes.len()).is_none() {
                return Err(format!("node {i} has invalid right child {}", node.right));
            }
            match usize::try_from(node.feature_idx) {
                Ok(feature) if feature < feature_count => {}
                _ => {
                    return Err(format!(
                        "node {i} splits on feature {} but the model has {feature_count} inputs",
                        node.feature_idx
                    ))
                }
            }
        }

        Ok(())
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stump() -> Tree {
        Tree::new(
            vec![Node::split(0, 0, 50, 1, 2), Node::leaf(1, 100), Node::leaf(2, 200)],
            1_000_000,
        )
    }

    #[test]
    fn threshold_ties_go_left() {
        let tree = stump();
        assert_eq!(tree.evaluate(&[30]), Some(100));
        assert_eq!(tree.evaluate(&[50]), Some(100));
        assert_eq!(tree.evaluate(&[60]), Some(200));
    }

    #[test]
    fn missing_feature_yields_none() {
        assert_eq!(stump().evaluate(&[]), None);
    }

    #[test]
    fn cycles_terminate() {
        let tree = Tree::new(vec![Node::split(0, 0, 50, 0, 0)], 1);
        assert_eq!(tree.evaluate(&[1]), None);
    }

    #[test]
    fn validation_catches_bad_children_and_features() {
        assert!(stump().validate(1).is_ok());
        assert!(stump().validate(0).is_err());

        let bad_child = Tree::new(
            vec![Node::split(0, 0, 50, 5, 2), Node::leaf(1, 100), Node::leaf(2, 200)],
            1,
        );
        assert!(bad_child.validate(11).unwrap_err().contains("left child"));

        assert!(Tree::new(Vec::new(), 1).validate(11).is_err());
    }

    #[test]
    fn leaf_alias_deserializes() {
        let node: Node = serde_json::from_str(
            r#"{"id":0,"left":-1,"right":-1,"feature":-1,"threshold":0,"leaf":7}"#,
        )
        .unwrap();
        assert!(node.is_leaf());
        assert_eq!(node.leaf, Some(7));
    }
}
