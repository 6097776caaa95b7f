//! Subcommand implementations.

use std::{error::Error, fs};

use electrum_store::Store;
use tracing::{debug, info};

use crate::cli::{Mode, SourceArgs};

pub mod apply;
pub mod keys;

/// Creates a fresh store and reconciles every input file into it, in order.
pub fn load_store(source: &SourceArgs, mode: Mode, default_key: &str) -> Result<Store, Box<dyn Error>> {
    let store = Store::create(source.store_id.as_str());
    for file in &source.files {
        let text = fs::read_to_string(file)
            .map_err(|e| format!("Failed to read {}: {e}", file.display()))?;
        let data: serde_json::Value = serde_json::from_str(&text)
            .map_err(|e| format!("Invalid JSON in {}: {e}", file.display()))?;

        debug!(file = %file.display(), ?mode, at = %source.at, "Reconciling file");
        match mode {
            Mode::Apply => store.apply(&source.at, &data)?,
            Mode::Merge => store.merge(&source.at, &data)?,
            Mode::Collection => store.apply_collection(&source.at, Some(&data), default_key)?,
            Mode::Changes => store.apply_changes(&source.at, Some(&data), default_key)?,
        }
    }
    info!(
        store = store.id(),
        states = store.state_count(),
        generation = store.generation(),
        "Loaded store"
    );
    Ok(store)
}
