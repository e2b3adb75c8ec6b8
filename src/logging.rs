use anyhow::Context;
use flexi_logger::{Cleanup, Criterion, Duplicate, FileSpec, Logger, LoggerHandle, Naming};

use crate::{config, paths};

/// The returned handle must stay alive for the lifetime of the process.
pub fn init_logging() -> anyhow::Result<LoggerHandle> {
    let log_dir = paths::log_dir()?;
    paths::ensure_dir(&log_dir).with_context(|| format!("failed creating log dir {}", log_dir.display()))?;

    // Stdout carries embeddings, so the console only sees warnings and errors (on stderr).
    let spec = std::env::var(config::logging::LEVEL_ENV)
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| config::logging::DEFAULT_LEVEL.to_string());

    let handle = Logger::try_with_str(&spec)
        .with_context(|| format!("invalid log spec {spec:?}"))?
        .log_to_file(FileSpec::default().directory(log_dir).basename(config::logging::LOG_FILE_NAME))
        .rotate(
            Criterion::Size(config::logging::LOG_ROTATE_SIZE_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(config::logging::LOG_ROTATE_KEEP_FILES),
        )
        .duplicate_to_stderr(Duplicate::Warn)
        .format(flexi_logger::detailed_format)
        .start()
        .context("failed to start logger")?;

    log::info!("{}", "=".repeat(60));
    log::info!("amharic-embed starting");
    log::info!("Version: {}", config::VERSION);
    log::info!("Platform: {}", std::env::consts::OS);
    log::info!("{}", "=".repeat(60));

    Ok(handle)
}
