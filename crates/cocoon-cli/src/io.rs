//! Snippet collections on disk.
//!
//! Input is a JSON object mapping snippet ids to source code; output is a
//! pretty-printed JSON array of snippets with their transformation counts
//! and rename maps.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use cocoon_core::Snippet;
use indexmap::IndexMap;
use tracing::debug;

/// Load `{ "id": "code", ... }`, keeping file order
pub fn load_snippets(path: &Path) -> Result<Vec<Snippet>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading snippets from {}", path.display()))?;
    let codes: IndexMap<String, String> = serde_json::from_str(&text)
        .with_context(|| format!("{} is not a JSON object of id to code", path.display()))?;
    debug!(path = %path.display(), count = codes.len(), "loaded snippets");
    Ok(codes
        .into_iter()
        .map(|(id, code)| Snippet::new(id, code))
        .collect())
}

/// Overwrite `path` with every snippet, creating parent directories
pub fn write_snippets(path: &Path, snippets: &[Snippet]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating output directory {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(snippets)?;
    fs::write(path, json).with_context(|| format!("writing snippets to {}", path.display()))?;
    Ok(())
}
