//! Writing checklist files.

use crate::error::ChecklistError;
use std::fs;
use std::path::Path;

/// Stores a rendered checklist at a path.
pub trait Persister {
    fn persist(&self, path: &Path, content: &str) -> Result<(), ChecklistError>;
}

/// Writes UTF-8 files, creating parent directories as needed.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsPersister;

impl Persister for FsPersister {
    fn persist(&self, path: &Path, content: &str) -> Result<(), ChecklistError> {
        let wrap = |source| ChecklistError::Persistence {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(wrap)?;
        }
        fs::write(path, content.as_bytes()).map_err(wrap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_writes_file_and_parents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/lists/web-app-checklist.md");
        FsPersister.persist(&path, "- [ ] Ship it\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "- [ ] Ship it\n");
    }

    #[test]
    fn test_overwrites_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.md");
        FsPersister.persist(&path, "old").unwrap();
        FsPersister.persist(&path, "new").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
    }

    #[test]
    fn test_failure_reports_path() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "x").unwrap();
        // A regular file cannot act as a directory.
        let path = blocker.join("child.md");
        let err = FsPersister.persist(&path, "x").unwrap_err();
        match err {
            ChecklistError::Persistence { path: p, .. } => assert_eq!(p, path),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
