use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::phrases::domain::difficulty::Difficulty;
use crate::phrases::domain::phrase_catalog::{PhraseCatalog, PhraseCatalogError};

/// Loads a catalog from `{"basic": [...], "intermediate": [...], "advanced": [...]}`.
///
/// Missing levels are treated as empty.
pub fn load_catalog(path: &Path) -> Result<PhraseCatalog, PhraseCatalogError> {
    let json = fs::read_to_string(path).map_err(|source| PhraseCatalogError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_catalog(&json)
}

pub fn parse_catalog(json: &str) -> Result<PhraseCatalog, PhraseCatalogError> {
    let levels: BTreeMap<Difficulty, Vec<String>> = serde_json::from_str(json)?;
    let catalog = PhraseCatalog::from_levels(levels)?;
    log::info!("Loaded {} practice phrases", catalog.total());
    Ok(catalog)
}
