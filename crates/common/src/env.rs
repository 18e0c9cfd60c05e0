//! Environment/runtime helpers
//!
//! Sanity checks run once at startup before the database is opened.

use std::path::Path;

use tracing::{debug, warn};

/// Ensure the directory holding a file-backed SQLite database exists.
///
/// `url` is the configured database URL. Non-SQLite URLs and in-memory
/// databases need no directory and are ignored.
pub async fn ensure_data_dir(url: &str) -> anyhow::Result<()> {
    let Some(file) = sqlite_file_path(url) else {
        debug!(%url, "database url has no local file; skipping data dir check");
        return Ok(());
    };
    let Some(dir) = Path::new(file).parent().filter(|p| !p.as_os_str().is_empty()) else {
        return Ok(());
    };
    if tokio::fs::metadata(dir).await.is_err() {
        warn!(dir = %dir.display(), "data directory not found; creating it");
    }
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| anyhow::anyhow!("cannot create {}: {e}", dir.display()))?;
    Ok(())
}

/// Extract the file path from a `sqlite:` URL, if it names a file.
pub fn sqlite_file_path(url: &str) -> Option<&str> {
    let rest = url.strip_prefix("sqlite://").or_else(|| url.strip_prefix("sqlite:"))?;
    let path = rest.split('?').next().unwrap_or_default();
    if path.is_empty() || path == ":memory:" {
        return None;
    }
    Some(path)
}
