use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::Path;
use tokio::fs;

/// Load a flat `{user_id: integer}` record from disk.
///
/// A missing file is not an error: the bot starts with an empty map on first
/// run. A file that exists but fails to parse is a startup-fatal error.
pub async fn load_map(path: &Path) -> Result<HashMap<String, u64>> {
    match fs::read_to_string(path).await {
        Ok(content) => serde_json::from_str(&content)
            .with_context(|| format!("corrupt data file {}", path.display())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
        Err(e) => Err(e).with_context(|| format!("failed to read {}", path.display())),
    }
}

/// Overwrite the record with the current map, pretty-printed so it stays
/// hand-editable. Called after every mutation; write failures propagate.
pub async fn save_map(path: &Path, map: &HashMap<String, u64>) -> Result<()> {
    let content = serde_json::to_string_pretty(map)?;
    fs::write(path, content)
        .await
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}
