//! tracing setup: stderr plus a log file truncated at startup.
//!
//! stdout belongs to the protocol, so nothing here may write to it.

use anyhow::Context;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable holding the log filter directive.
pub const ENV_FILTER: &str = "CHECKLIST_LOG";

const DEFAULT_FILTER: &str = "info";

/// Install the global subscriber. Returns the log file in use, if any.
///
/// A log file that cannot be opened is reported and skipped.
pub fn init(log_file: Option<&Path>) -> anyhow::Result<Option<PathBuf>> {
    let filter =
        EnvFilter::try_from_env(ENV_FILTER).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let (file, file_error) = match log_file.map(|p| (p, open_log_file(p))) {
        Some((path, Ok(file))) => (Some((path.to_path_buf(), file)), None),
        Some((path, Err(err))) => (None, Some((path.to_path_buf(), err))),
        None => (None, None),
    };

    let file_layer = file
        .as_ref()
        .and_then(|(_, file)| file.try_clone().ok())
        .map(|writer| fmt::layer().with_ansi(false).with_writer(Mutex::new(writer)));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_ansi(false))
        .with(file_layer)
        .try_init()
        .context("Failed to install log subscriber")?;

    if let Some((path, err)) = file_error {
        warn!(path = %path.display(), "Log file unavailable, logging to stderr only: {:#}", err);
    }
    Ok(file.map(|(path, _)| path))
}

/// Create (or truncate) the log file and write the session banner.
pub fn open_log_file(path: &Path) -> anyhow::Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
    }
    let mut file = File::create(path)
        .with_context(|| format!("Failed to create log file {}", path.display()))?;
    writeln!(
        file,
        "=== Checklist MCP Server Log ({}) ===",
        chrono::Utc::now().to_rfc3339()
    )?;
    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_open_log_file_truncates_and_writes_banner() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("logs/checklist-mcp.log");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "stale session\n").unwrap();

        drop(open_log_file(&path).unwrap());

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("=== Checklist MCP Server Log ("));
        assert!(!content.contains("stale session"));
    }

    #[test]
    fn test_open_log_file_creates_parents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a/b/c.log");
        open_log_file(&path).unwrap();
        assert!(path.exists());
    }
}
