use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::config;

pub fn home_dir() -> anyhow::Result<PathBuf> {
    if let Ok(v) = std::env::var("HOME") {
        if !v.is_empty() {
            return Ok(PathBuf::from(v));
        }
    }
    if let Ok(v) = std::env::var("USERPROFILE") {
        if !v.is_empty() {
            return Ok(PathBuf::from(v));
        }
    }
    anyhow::bail!("cannot determine home directory")
}

/// Per-user data directory (~/.amharic-embed).
pub fn app_dir() -> anyhow::Result<PathBuf> {
    Ok(home_dir()?.join(config::APP_DIR_REL))
}

pub fn log_dir() -> anyhow::Result<PathBuf> {
    Ok(app_dir()?.join(config::logging::LOG_DIR_REL))
}

pub fn model_dir() -> anyhow::Result<PathBuf> {
    Ok(app_dir()?.join(config::embedding::MODEL_DIR_REL))
}

/// Resolve which vector file to load.
///
/// Precedence: explicit `--model` flag, then `AMHARIC_EMBED_MODEL`, then the
/// default file inside the model directory.
pub fn resolve_model_path(explicit: Option<&Path>) -> anyhow::Result<PathBuf> {
    if let Some(p) = explicit {
        return Ok(p.to_path_buf());
    }
    if let Ok(v) = std::env::var(config::embedding::MODEL_ENV) {
        if !v.is_empty() {
            return Ok(PathBuf::from(v));
        }
    }
    Ok(model_dir()?.join(config::embedding::DEFAULT_MODEL_FILE))
}

pub fn ensure_dir(dir: &Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(dir).with_context(|| format!("failed to create dir {}", dir.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_model_path_wins() {
        let p = resolve_model_path(Some(Path::new("/tmp/custom.vec"))).unwrap();
        assert_eq!(p, PathBuf::from("/tmp/custom.vec"));
    }

    #[test]
    fn test_ensure_dir_creates_nested() {
        let dir = tempfile::TempDir::new().unwrap();
        let nested = dir.path().join("a/b/c");
        ensure_dir(&nested).unwrap();
        assert!(nested.is_dir());
        // Idempotent
        ensure_dir(&nested).unwrap();
    }
}
