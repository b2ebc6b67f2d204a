//! Deterministic categorical encoder
//!
//! Reproduces the label encoding used when the model was trained: each
//! vocabulary is sorted in byte order and a value's code is its position in
//! the sorted list. Tables for all features are built together, once, the
//! first time the shared encoder is touched.

use crate::errors::EncodeError;
use crate::vocabulary::CategoricalFeature;
use once_cell::sync::Lazy;
use std::collections::HashMap;

static ENCODER: Lazy<CategoryEncoder> = Lazy::new(CategoryEncoder::new);

/// String to integer code tables for every categorical feature
#[derive(Debug, Clone)]
pub struct CategoryEncoder {
    tables: HashMap<CategoricalFeature, EncodingTable>,
}

#[derive(Debug, Clone)]
struct EncodingTable {
    classes: Vec<&'static str>,
    codes: HashMap<&'static str, u32>,
}

impl EncodingTable {
    fn fit(values: &[&'static str]) -> Self {
        let mut classes = values.to_vec();
        classes.sort_unstable();
        classes.dedup();
        let codes = classes
            .iter()
            .enumerate()
            .map(|(code, class)| (*class, code as u32))
            .collect();
        Self { classes, codes }
    }
}

impl CategoryEncoder {
    /// Build tables for all categorical features
    pub fn new() -> Self {
        let tables = CategoricalFeature::ALL
            .into_iter()
            .map(|feature| (feature, EncodingTable::fit(feature.values())))
            .collect();
        Self { tables }
    }

    /// Process-wide encoder
    pub fn global() -> &'static CategoryEncoder {
        &ENCODER
    }

    /// Encode a single value
    pub fn encode(&self, feature: CategoricalFeature, value: &str) -> Result<u32, EncodeError> {
        self.tables
            .get(&feature)
            .and_then(|table| table.codes.get(value).copied())
            .ok_or_else(|| EncodeError::UnknownValue {
                feature: feature.name().to_string(),
                value: value.to_string(),
            })
    }

    /// Encode a value for a feature given by its column name
    pub fn encode_by_name(&self, feature: &str, value: &str) -> Result<u32, EncodeError> {
        let feature = CategoricalFeature::from_name(feature)
            .ok_or_else(|| EncodeError::UnknownFeature(feature.to_string()))?;
        self.encode(feature, value)
    }

    /// Classes in code order
    pub fn classes(&self, feature: CategoricalFeature) -> &[&'static str] {
        self.tables
            .get(&feature)
            .map(|table| table.classes.as_slice())
            .unwrap_or_default()
    }
}

impl Default for CategoryEncoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Encode with the process-wide encoder
pub fn encode(feature: CategoricalFeature, value: &str) -> Result<u32, EncodeError> {
    CategoryEncoder::global().encode(feature, value)
}
