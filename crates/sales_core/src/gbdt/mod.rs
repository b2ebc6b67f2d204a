//! Fixed-point GBDT regressor
//!
//! The shipped model artifact format. All thresholds, leaves, weights and
//! the bias are integers at `scale` (typically 1e6); inputs are quantised to
//! the same scale before traversal.
//!
//! ```json
//! {
//!   "version": 1,
//!   "scale": 1000000,
//!   "post_scale": 1000000,
//!   "bias": 0,
//!   "feature_names": ["Item_Identifier", "..."],
//!   "trees": [
//!     {
//!       "weight": 1000000,
//!       "nodes": [
//!         {"id":0,"left":1,"right":2,"feature_idx":5,"threshold":100000000,"leaf":null},
//!         {"id":1,"left":-1,"right":-1,"feature_idx":-1,"threshold":0,"leaf":1200000000},
//!         {"id":2,"left":-1,"right":-1,"feature_idx":-1,"threshold":0,"leaf":3400000000}
//!       ]
//!     }
//!   ]
//! }
//! ```

pub mod canon;
pub mod model;
pub mod tree;

pub use model::{GbdtModel, ModelError, SCALE};
pub use tree::{Node, Tree};
