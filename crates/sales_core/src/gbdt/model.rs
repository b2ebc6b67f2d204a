//! Gradient boosted tree ensemble
//!
//! Inputs are quantised to fixed-point integers before traversal, so a given
//! artifact produces bit-identical scores on every platform. The file format
//! is plain JSON; hashing goes through the canonical form.

use super::canon::{canonical_hash_hex, to_canonical_json};
use super::tree::Tree;
use crate::errors::PredictError;
use crate::features::{FeatureVector, FEATURE_COUNT, FEATURE_NAMES};
use crate::model::SalesModel;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Model validation failed: {0}")]
    ValidationFailed(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Tree {tree} has no reachable leaf for this input")]
    MalformedPath { tree: usize },

    #[error("Score overflowed fixed-point range")]
    Overflow,
}

/// Default fixed-point scale (1e6)
pub const SCALE: i64 = 1_000_000;

/// Supported file format version
pub const FORMAT_VERSION: i32 = 1;

/// Fixed-point GBDT regressor
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GbdtModel {
    pub version: i32,

    /// Scale applied to inputs, thresholds, leaves and weights
    pub scale: i64,

    pub trees: Vec<Tree>,

    /// Bias term, fixed-point
    pub bias: i64,

    /// Divisor turning the summed score back into sales units
    pub post_scale: i64,

    /// Column names the model was trained on, when exported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names: Option<Vec<String>>,
}

impl GbdtModel {
    pub fn new(trees: Vec<Tree>, bias: i64) -> Self {
        Self {
            version: FORMAT_VERSION,
            scale: SCALE,
            trees,
            bias,
            post_scale: SCALE,
            feature_names: None,
        }
    }

    /// Attach the training column names
    pub fn with_feature_names(mut self) -> Self {
        self.feature_names = Some(FEATURE_NAMES.iter().map(|s| s.to_string()).collect());
        self
    }

    /// Check format, scales, tree structure and the feature contract
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.version != FORMAT_VERSION {
            return Err(ModelError::ValidationFailed(format!(
                "unsupported model version {}",
                self.version
            )));
        }
        if self.scale <= 0 || self.post_scale <= 0 {
            return Err(ModelError::ValidationFailed(format!(
                "scales must be positive (scale {}, post_scale {})",
                self.scale, self.post_scale
            )));
        }
        if self.trees.is_empty() {
            return Err(ModelError::ValidationFailed("model has no trees".to_string()));
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate(FEATURE_COUNT)
                .map_err(|e| ModelError::ValidationFailed(format!("tree {i}: {e}")))?;
        }
        if let Some(names) = &self.feature_names {
            if names.iter().map(String::as_str).ne(FEATURE_NAMES.iter().copied()) {
                return Err(ModelError::ValidationFailed(format!(
                    "feature names {names:?} do not match expected order {FEATURE_NAMES:?}"
                )));
            }
        }
        Ok(())
    }

    /// Quantise a real-valued input to this model's fixed-point scale
    pub fn quantize(&self, value: f64) -> i64 {
        (value * self.scale as f64).round() as i64
    }

    /// Raw fixed-point score: `bias + sum(leaf * weight / scale)`
    pub fn score(&self, features: &[i64]) -> Result<i64, ModelError> {
        self.trees
            .iter()
            .enumerate()
            .try_fold(self.bias, |sum, (i, tree)| {
                let leaf = tree
                    .evaluate(features)
                    .ok_or(ModelError::MalformedPath { tree: i })?;
                let contribution = leaf
                    .checked_mul(tree.weight)
                    .and_then(|product| product.checked_div(self.scale))
                    .ok_or(ModelError::Overflow)?;
                sum.checked_add(contribution).ok_or(ModelError::Overflow)
            })
    }

    /// Score a feature vector and return the prediction in sales units
    pub fn evaluate(&self, features: &FeatureVector) -> Result<f64, ModelError> {
        let quantised: Vec<i64> = features
            .as_slice()
            .iter()
            .map(|v| self.quantize(*v))
            .collect();
        Ok(self.score(&quantised)? as f64 / self.post_scale as f64)
    }

    pub fn to_canonical_json(&self) -> Result<String, ModelError> {
        Ok(to_canonical_json(self)?)
    }

    /// Blake3 hash of the canonical JSON, hex encoded
    pub fn hash_hex(&self) -> Result<String, ModelError> {
        Ok(canonical_hash_hex(self)?)
    }

    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<(), ModelError> {
        fs::write(path, self.to_canonical_json()?)?;
        Ok(())
    }

    /// Load and validate a model file
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self, ModelError> {
        let json = fs::read_to_string(path)?;
        let model: GbdtModel = serde_json::from_str(&json)?;
        model.validate()?;
        Ok(model)
    }

    pub fn num_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn num_nodes(&self) -> usize {
        self.trees.iter().map(Tree::num_nodes).sum()
    }
}

impl SalesModel for GbdtModel {
    fn predict(&self, features: &FeatureVector) -> Result<f64, PredictError> {
        self.evaluate(features)
            .map_err(|e| PredictError::Prediction(e.to_string()))
    }

    fn fingerprint(&self) -> Option<String> {
        self.hash_hex().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gbdt::tree::Node;

    fn mrp_model() -> GbdtModel {
        // Item_MRP is feature 5, Outlet_Type is feature 10
        let by_mrp = Tree::new(
            vec![
                Node::split(0, 5, 100 * SCALE, 1, 2),
                Node::leaf(1, 1_000 * SCALE),
                Node::leaf(2, 3_000 * SCALE),
            ],
            SCALE,
        );
        let by_outlet = Tree::new(
            vec![
                Node::split(0, 10, 0, 1, 2),
                Node::leaf(1, -500 * SCALE),
                Node::leaf(2, 250 * SCALE),
            ],
            SCALE,
        );
        GbdtModel::new(vec![by_mrp, by_outlet], 10 * SCALE)
    }

    fn vector(mrp: f64, outlet_type: f64) -> FeatureVector {
        let mut values = [0.0; FEATURE_COUNT];
        values[5] = mrp;
        values[10] = outlet_type;
        FeatureVector::new(values)
    }

    #[test]
    fn scores_sum_trees_and_bias() {
        let model = mrp_model();
        assert!(model.validate().is_ok());
        assert_eq!(model.evaluate(&vector(50.0, 0.0)).unwrap(), 510.0);
        assert_eq!(model.evaluate(&vector(249.8, 1.0)).unwrap(), 3_260.0);
        assert_eq!(model.evaluate(&vector(100.0, 3.0)).unwrap(), 1_260.0);
    }

    #[test]
    fn quantisation_rounds_to_scale() {
        let model = mrp_model();
        assert_eq!(model.quantize(0.016), 16_000);
        assert_eq!(model.quantize(-1.5), -1_500_000);
        assert_eq!(model.quantize(100.0000004), 100 * SCALE);
    }

    #[test]
    fn tree_weights_scale_contributions() {
        let tree = Tree::new(vec![Node::leaf(0, 200 * SCALE)], SCALE / 2);
        let model = GbdtModel::new(vec![tree], 0);
        assert_eq!(model.evaluate(&vector(0.0, 0.0)).unwrap(), 100.0);
    }

    #[test]
    fn feature_index_beyond_contract_is_rejected() {
        let tree = Tree::new(
            vec![Node::split(0, 11, 0, 1, 2), Node::leaf(1, 1), Node::leaf(2, 2)],
            SCALE,
        );
        let err = GbdtModel::new(vec![tree], 0).validate().unwrap_err();
        assert!(err.to_string().contains("feature 11"));
    }

    #[test]
    fn feature_names_must_match_order() {
        let model = mrp_model().with_feature_names();
        assert!(model.validate().is_ok());

        let mut swapped = model.clone();
        if let Some(names) = swapped.feature_names.as_mut() {
            names.swap(1, 3);
        }
        assert!(swapped.validate().is_err());
    }

    #[test]
    fn bad_headers_are_rejected() {
        let mut model = mrp_model();
        model.version = 2;
        assert!(model.validate().is_err());

        let mut model = mrp_model();
        model.post_scale = 0;
        assert!(model.validate().is_err());

        assert!(GbdtModel::new(Vec::new(), 0).validate().is_err());
    }

    #[test]
    fn overflow_is_an_error() {
        let tree = Tree::new(vec![Node::leaf(0, i64::MAX)], i64::MAX);
        let model = GbdtModel::new(vec![tree], 0);
        assert!(matches!(model.score(&[]), Err(ModelError::Overflow)));
    }

    #[test]
    fn unvalidated_scale_is_an_error() {
        let mut model = GbdtModel::new(vec![Tree::new(vec![Node::leaf(0, 5)], SCALE)], 0);
        model.scale = 0;
        let zeros = FeatureVector::new([0.0; FEATURE_COUNT]);
        assert!(matches!(model.evaluate(&zeros), Err(ModelError::Overflow)));

        let mut model = GbdtModel::new(vec![Tree::new(vec![Node::leaf(0, i64::MIN)], 1)], 0);
        model.scale = -1;
        assert!(matches!(model.score(&[]), Err(ModelError::Overflow)));
    }

    #[test]
    fn save_and_load_preserve_hash() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        let model = mrp_model().with_feature_names();
        model.save_json(&path).unwrap();

        let loaded = GbdtModel::load_json(&path).unwrap();
        assert_eq!(loaded, model);
        assert_eq!(loaded.hash_hex().unwrap(), model.hash_hex().unwrap());
        assert_eq!(loaded.num_trees(), 2);
        assert_eq!(loaded.num_nodes(), 6);
    }

    #[test]
    fn load_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(GbdtModel::load_json(&path), Err(ModelError::JsonError(_))));
        assert!(matches!(
            GbdtModel::load_json(dir.path().join("missing.json")),
            Err(ModelError::IoError(_))
        ));
    }
}
