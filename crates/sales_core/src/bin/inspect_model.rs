use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use salescast_core::{GbdtModel, FEATURE_NAMES};

fn main() -> Result<()> {
    let model_path = env::args()
        .nth(1)
        .map(PathBuf::from)
        .context("Usage: inspect_model <model_path>")?;

    let model = GbdtModel::load_json(&model_path)
        .with_context(|| format!("Failed to load model from {}", model_path.display()))?;

    println!("path:      {}", model_path.display());
    println!("hash:      {}", model.hash_hex()?);
    println!("version:   {}", model.version);
    println!("scale:     {} (post {})", model.scale, model.post_scale);
    println!("trees:     {}", model.num_trees());
    println!("nodes:     {}", model.num_nodes());
    match &model.feature_names {
        Some(_) => println!("features:  {} (names embedded, order verified)", FEATURE_NAMES.len()),
        None => println!("features:  {} (no names embedded)", FEATURE_NAMES.len()),
    }
    for (idx, name) in FEATURE_NAMES.iter().enumerate() {
        println!("  [{idx:2}] {name}");
    }
    Ok(())
}
