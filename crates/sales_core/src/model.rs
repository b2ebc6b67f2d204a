//! Model seam
//!
//! The pipeline only knows a model as something that maps an ordered
//! feature vector to a number. The artifact is loaded once at startup and
//! shared read-only between requests.

use crate::errors::PredictError;
use crate::features::FeatureVector;
use crate::gbdt::GbdtModel;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// A loaded regression model
pub trait SalesModel: Send + Sync {
    /// Predict sales for one feature vector
    fn predict(&self, features: &FeatureVector) -> Result<f64, PredictError>;

    /// Stable identifier of the loaded artifact, if it has one
    fn fingerprint(&self) -> Option<String> {
        None
    }
}

/// Load the model artifact at `path`
///
/// Any failure here means the service cannot serve predictions at all.
pub fn load_model(path: impl AsRef<Path>) -> Result<Arc<dyn SalesModel>, PredictError> {
    let path = path.as_ref();
    let model = GbdtModel::load_json(path).map_err(|e| {
        PredictError::ModelUnavailable(format!("{}: {e}", path.display()))
    })?;

    info!(
        path = %path.display(),
        trees = model.num_trees(),
        nodes = model.num_nodes(),
        hash = %model.hash_hex().unwrap_or_default(),
        "Model loaded"
    );

    Ok(Arc::new(model))
}
