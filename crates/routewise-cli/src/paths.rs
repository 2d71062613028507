use anyhow::Result;
use std::path::PathBuf;

const ROUTEWISE_DIR: &str = ".routewise";
const INDEX_FILE: &str = "index.json";
const LOGS_DIR: &str = "logs";

/// Environment variable to override the Routewise data directory.
const ROUTEWISE_DIR_ENV: &str = "ROUTEWISE_DIR";

/// Resolve the Routewise data directory.
/// Priority: ROUTEWISE_DIR env var > ~/.routewise/
pub fn resolve_routewise_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(ROUTEWISE_DIR_ENV)
        && !dir.trim().is_empty()
    {
        return Ok(PathBuf::from(dir));
    }
    dirs::home_dir()
        .map(|h| h.join(ROUTEWISE_DIR))
        .ok_or_else(|| anyhow::anyhow!("Failed to determine home directory"))
}

/// Default document index: ~/.routewise/index.json
pub fn default_index_path() -> Result<PathBuf> {
    Ok(resolve_routewise_dir()?.join(INDEX_FILE))
}

/// Get the logs directory: ~/.routewise/logs/
pub fn logs_dir() -> Result<PathBuf> {
    let dir = resolve_routewise_dir()?.join(LOGS_DIR);
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
