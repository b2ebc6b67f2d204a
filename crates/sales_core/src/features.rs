//! Feature vector assembly
//!
//! The model artifact was trained on exactly these eleven columns in exactly
//! this order. Reordering them does not fail, it silently mispredicts.

use crate::encoder::CategoryEncoder;
use crate::errors::PredictError;
use crate::validation::{Field, FieldKind, ValidatedRecord};
use serde::Serialize;

/// Number of model inputs
pub const FEATURE_COUNT: usize = 11;

/// Training-time column names, in model order
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "Item_Identifier",
    "Item_Weight",
    "Item_Fat_Content",
    "Item_Visibility",
    "Item_Type",
    "Item_MRP",
    "Outlet_Identifier",
    "Outlet_Establishment_Year",
    "Outlet_Size",
    "Outlet_Location_Type",
    "Outlet_Type",
];

/// Item identifiers are folded into this many buckets
pub const IDENTIFIER_BUCKETS: u64 = 1_000_000;

/// Fixed-order numeric model input
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    pub fn new(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }

    /// Assemble the vector from a fully validated record
    pub fn assemble(
        record: &ValidatedRecord,
        encoder: &CategoryEncoder,
    ) -> Result<Self, PredictError> {
        let mut values = [0.0; FEATURE_COUNT];
        for (slot, field) in Field::ALL.into_iter().enumerate() {
            values[slot] = match field.kind() {
                FieldKind::Text => {
                    identifier_code(required_text(record, field)?) as f64
                }
                FieldKind::Categorical(feature) => {
                    encoder.encode(feature, required_text(record, field)?)? as f64
                }
                FieldKind::Number(_) | FieldKind::Integer(_) => record
                    .number(field)
                    .ok_or_else(|| missing(field))?,
            };
        }
        Ok(Self(values))
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn get(&self, field: Field) -> f64 {
        self.0[field as usize]
    }
}

fn required_text(record: &ValidatedRecord, field: Field) -> Result<&str, PredictError> {
    record.text(field).ok_or_else(|| missing(field))
}

fn missing(field: Field) -> PredictError {
    PredictError::Validation(vec![format!("{} is required", field.title())])
}

/// Stable numeric code for a free-text item identifier
///
/// First eight bytes of the blake3 digest, little endian, reduced into
/// `IDENTIFIER_BUCKETS`. Identical across runs and platforms.
pub fn identifier_code(identifier: &str) -> u64 {
    let digest = blake3::hash(identifier.as_bytes());
    let mut head = [0u8; 8];
    head.copy_from_slice(&digest.as_bytes()[..8]);
    u64::from_le_bytes(head) % IDENTIFIER_BUCKETS
}
