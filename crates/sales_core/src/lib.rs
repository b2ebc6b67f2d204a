//! SalesCast prediction core
//!
//! Sits between untrusted form input and a pre-trained item-outlet sales
//! regressor.
//!
//! Modules:
//! - `vocabulary`: the fixed categorical vocabularies (single source)
//! - `encoder`: deterministic string-to-code tables built once per process
//! - `validation`: typed coercion and range checks, all errors collected
//! - `features`: fixed-order 11-input feature vector
//! - `model`: the model seam and artifact loading
//! - `gbdt`: fixed-point gradient boosted tree regressor (artifact format)
//! - `pipeline`: validate, encode, predict, clamp and format

pub mod encoder;
pub mod errors;
pub mod features;
pub mod gbdt;
pub mod model;
pub mod pipeline;
pub mod validation;
pub mod vocabulary;

pub use encoder::{encode, CategoryEncoder};
pub use errors::{EncodeError, PredictError, Result};
pub use features::{identifier_code, FeatureVector, FEATURE_COUNT, FEATURE_NAMES};
pub use gbdt::{GbdtModel, ModelError, Node, Tree, SCALE};
pub use model::{load_model, SalesModel};
pub use pipeline::{format_currency, PredictionPipeline, PredictionResult};
pub use validation::{validate, Field, FieldValue, RawRecord, ValidatedRecord, Validation};
pub use vocabulary::CategoricalFeature;

/// Crate version string
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
