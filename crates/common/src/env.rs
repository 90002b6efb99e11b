//! Environment/runtime helpers
//!
//! Sanity checks to ensure expected directories exist at startup.

use std::path::Path;

use tracing::debug;

/// Ensure the directory holding `file_path` exists so a file store can be created in it.
pub async fn ensure_parent_dir(file_path: &Path) -> std::io::Result<()> {
    let Some(parent) = file_path.parent().filter(|p| !p.as_os_str().is_empty()) else {
        return Ok(());
    };
    tokio::fs::create_dir_all(parent).await?;
    debug!(dir = %parent.display(), "data directory ready");
    Ok(())
}
