//! Error taxonomy for a checklist request.
//!
//! `MissingCredential` and `Completion` end a request early with an
//! error-flagged response. `Persistence` is downgraded by the service to an
//! unpersisted response and never reaches the client as an error.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ChecklistError {
    #[error("Missing OpenAI API key. Please set the OPENAI_API_KEY environment variable.")]
    MissingCredential,

    #[error("Error creating checklist: {0}")]
    Completion(String),

    #[error("Failed to write {}: {source}", .path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unknown tool: {0}")]
    UnknownOperation(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl ChecklistError {
    /// Whether the request can still produce a checklist after this error.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, ChecklistError::Persistence { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_are_human_readable() {
        assert!(ChecklistError::MissingCredential
            .to_string()
            .contains("OPENAI_API_KEY"));
        assert_eq!(
            ChecklistError::UnknownOperation("delete_everything".into()).to_string(),
            "Unknown tool: delete_everything"
        );
        assert_eq!(
            ChecklistError::Completion("timed out".into()).to_string(),
            "Error creating checklist: timed out"
        );
    }

    #[test]
    fn test_only_persistence_is_non_fatal() {
        let persist = ChecklistError::Persistence {
            path: PathBuf::from("/nope/x.md"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(!persist.is_fatal());
        assert!(ChecklistError::MissingCredential.is_fatal());
        assert!(ChecklistError::Completion("boom".into()).is_fatal());
    }
}
