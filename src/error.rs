//! Error types for codex

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the codex application
#[derive(Debug, Error)]
pub enum CodexError {
    #[error("Not a codex home: {0}")]
    NotInitialized(PathBuf),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Unknown lumber type: {0}")]
    UnknownLumber(String),

    #[error("Module disabled: {0}")]
    ModuleDisabled(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CodexError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CodexError::NotInitialized(_) => 2,
            CodexError::InvalidInput(_)
            | CodexError::InvalidDate(_)
            | CodexError::UnknownLumber(_) => 3,
            CodexError::NotFound(_) => 4,
            _ => 1,
        }
    }

    /// Errors caused by what the user typed, as opposed to the machine
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            CodexError::InvalidInput(_)
                | CodexError::InvalidDate(_)
                | CodexError::NotFound(_)
                | CodexError::UnknownLumber(_)
                | CodexError::Config(_)
        )
    }

    /// Get a user-friendly error message with suggestions
    pub fn display_with_suggestions(&self) -> String {
        match self {
            CodexError::NotInitialized(path) => {
                format!(
                    "Not a codex home: {}\n\n\
                    Suggestions:\n\
                    • Run 'codex init' in this directory to create a new codex\n\
                    • Pass --home to point at an existing codex\n\
                    • Set CODEX_HOME environment variable to your codex path",
                    path.display()
                )
            }
            CodexError::InvalidDate(input) => {
                format!(
                    "Invalid date: '{}'\n\n\
                    Valid dates:\n\
                    • today, yesterday, tomorrow\n\
                    • monday, tuesday, ..., sunday (most recent)\n\
                    • last monday, next friday, etc.\n\
                    • Specific dates: YYYY-MM-DD (e.g., 2025-01-17)",
                    input
                )
            }
            CodexError::UnknownLumber(key) => {
                format!(
                    "Unknown lumber type: '{}'\n\n\
                    Suggestions:\n\
                    • Dimensional lumber keys look like 2x4x8 (size x length in feet)\n\
                    • Sheet goods: plywood_1/2, plywood_3/4, osb_7/16\n\
                    • The Reference tab of the Carpentry page lists every product",
                    key
                )
            }
            CodexError::ModuleDisabled(name) => {
                format!(
                    "The {} module is disabled\n\n\
                    Enable it with: codex config modules.{}.enabled true",
                    name, name
                )
            }
            CodexError::Config(msg) => {
                if msg.contains("Unknown config key") {
                    format!(
                        "{}\n\n\
                        Example keys: user.name, user.currency, server.port, modules.finance.enabled\n\
                        List everything with: codex config --list",
                        msg
                    )
                } else {
                    msg.clone()
                }
            }
            _ => self.to_string(),
        }
    }
}

/// Result type using CodexError
pub type Result<T> = std::result::Result<T, CodexError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_initialized_suggestion() {
        let err = CodexError::NotInitialized(PathBuf::from("/tmp/test"));
        let msg = err.display_with_suggestions();
        assert!(msg.contains("codex init"));
        assert!(msg.contains("CODEX_HOME"));
        assert!(msg.contains("Suggestions"));
    }

    #[test]
    fn test_invalid_date_examples() {
        let err = CodexError::InvalidDate("someday".to_string());
        let msg = err.display_with_suggestions();
        assert!(msg.contains("yesterday"));
        assert!(msg.contains("YYYY-MM-DD"));
    }

    #[test]
    fn test_unknown_lumber_suggestions() {
        let err = CodexError::UnknownLumber("2x3x7".to_string());
        let msg = err.display_with_suggestions();
        assert!(msg.contains("2x4x8"));
        assert!(msg.contains("plywood_3/4"));
    }

    #[test]
    fn test_config_unknown_key_suggestions() {
        let err = CodexError::Config("Unknown config key: 'user.shoe_size'".to_string());
        let msg = err.display_with_suggestions();
        assert!(msg.contains("codex config --list"));
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(CodexError::NotInitialized(PathBuf::new()).exit_code(), 2);
        assert_eq!(CodexError::InvalidInput("x".into()).exit_code(), 3);
        assert_eq!(CodexError::NotFound("x".into()).exit_code(), 4);
        assert_eq!(CodexError::Config("x".into()).exit_code(), 1);
    }

    #[test]
    fn test_user_errors() {
        assert!(CodexError::UnknownLumber("x".into()).is_user_error());
        assert!(CodexError::Config("x".into()).is_user_error());
        assert!(!CodexError::ModuleDisabled("finance".into()).is_user_error());
        assert!(!CodexError::Io(std::io::Error::other("disk")).is_user_error());
    }

    #[test]
    fn test_other_errors_fallback() {
        let err = CodexError::InvalidInput("Amount must be positive".to_string());
        let msg = err.display_with_suggestions();
        assert_eq!(msg, "Invalid input: Amount must be positive");
    }
}
