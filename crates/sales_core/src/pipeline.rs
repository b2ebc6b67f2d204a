//! End-to-end prediction
//!
//! validate -> encode -> assemble -> model -> clamp/format. Stateless apart
//! from the shared encoder and the read-only model.

use crate::encoder::CategoryEncoder;
use crate::errors::{PredictError, Result};
use crate::features::FeatureVector;
use crate::model::SalesModel;
use crate::validation::{validate, RawRecord};
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// A successful prediction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    /// Non-negative sales figure rounded to 2 decimals
    pub prediction: f64,
    /// Currency rendering, e.g. `$1,234.56`
    pub formatted_prediction: String,
}

impl PredictionResult {
    /// Clamp a raw model output and shape it for display
    pub fn from_raw(raw: f64) -> Result<Self> {
        if raw.is_infinite() {
            return Err(PredictError::Prediction(format!(
                "model returned a non-finite value: {raw}"
            )));
        }
        // NaN and -0.0 both land on +0.0
        let clamped = if raw > 0.0 { raw } else { 0.0 };
        Ok(Self {
            prediction: round_cents(clamped),
            formatted_prediction: format_currency(clamped),
        })
    }
}

/// Round to two decimals the way the currency string does
pub fn round_cents(value: f64) -> f64 {
    format!("{value:.2}").parse().unwrap_or(value)
}

/// `$` + comma-grouped integer part + two decimals
pub fn format_currency(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}${grouped}.{cents}")
}

/// Validation, encoding and inference over a shared model
#[derive(Clone)]
pub struct PredictionPipeline {
    model: Arc<dyn SalesModel>,
    encoder: &'static CategoryEncoder,
}

impl PredictionPipeline {
    pub fn new(model: Arc<dyn SalesModel>) -> Self {
        Self {
            model,
            encoder: CategoryEncoder::global(),
        }
    }

    /// Validate and encode raw input into the model's feature vector
    pub fn features(&self, raw: &RawRecord) -> Result<FeatureVector> {
        let record = validate(raw).into_result()?;
        FeatureVector::assemble(&record, self.encoder)
    }

    /// Run the whole pipeline for one raw record
    pub fn predict(&self, raw: &RawRecord) -> Result<PredictionResult> {
        let features = self.features(raw)?;
        let raw_output = self.model.predict(&features)?;
        let result = PredictionResult::from_raw(raw_output)?;
        debug!(
            raw = raw_output,
            prediction = result.prediction,
            "Prediction computed"
        );
        Ok(result)
    }
}
