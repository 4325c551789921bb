use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while bootstrapping or reconciling a source directory.
#[derive(Error, Debug)]
pub enum SrcinitError {
    #[error("Unknown VCS: '{identifier}'. Supported identifiers are: git, hg, svn, p4")]
    UnknownVcs { identifier: String },

    #[error("{command}: {operation} not supported")]
    UnsupportedOperation { command: String, operation: String },

    #[error("Source directory error: {message}{}", display_path(.path))]
    DirectoryError {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("{}", display_process_error(.command, .exit_code, .stderr))]
    ProcessError {
        command: String,
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error("Reconciliation failed: {message}{}", display_path(.path))]
    ReconciliationError {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Validation error: {field} - {message}")]
    ValidationError {
        field: String,
        message: String,
        value: Option<String>,
    },

    #[error("Internal error: {message}")]
    InternalError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

fn display_path(path: &Option<PathBuf>) -> String {
    match path {
        Some(path) => format!(" ({})", path.display()),
        None => String::new(),
    }
}

fn display_process_error(command: &str, exit_code: &Option<i32>, stderr: &str) -> String {
    let mut message = match exit_code {
        Some(code) => format!("Command '{}' exited with status {}", command, code),
        None => format!("Command '{}' failed to launch", command),
    };
    let stderr = stderr.trim();
    if !stderr.is_empty() {
        message.push_str(": ");
        message.push_str(stderr);
    }
    message
}

impl SrcinitError {
    pub fn unknown_vcs(identifier: impl Into<String>) -> Self {
        Self::UnknownVcs {
            identifier: identifier.into(),
        }
    }

    pub fn unsupported_operation(command: impl Into<String>, operation: impl Into<String>) -> Self {
        Self::UnsupportedOperation {
            command: command.into(),
            operation: operation.into(),
        }
    }

    pub fn directory_error(message: impl Into<String>, path: Option<PathBuf>) -> Self {
        Self::DirectoryError {
            message: message.into(),
            path,
            source: None,
        }
    }

    pub fn directory_error_with_source(
        message: impl Into<String>,
        path: Option<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::DirectoryError {
            message: message.into(),
            path,
            source: Some(source),
        }
    }

    pub fn process_error(
        command: impl Into<String>,
        exit_code: Option<i32>,
        stderr: impl Into<String>,
    ) -> Self {
        Self::ProcessError {
            command: command.into(),
            exit_code,
            stderr: stderr.into(),
        }
    }

    pub fn reconciliation_error(message: impl Into<String>, path: Option<PathBuf>) -> Self {
        Self::ReconciliationError {
            message: message.into(),
            path,
            source: None,
        }
    }

    pub fn reconciliation_error_with_source(
        message: impl Into<String>,
        path: Option<PathBuf>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::ReconciliationError {
            message: message.into(),
            path,
            source: Some(Box::new(source)),
        }
    }

    pub fn config_error(message: impl Into<String>, path: Option<PathBuf>) -> Self {
        Self::ConfigError {
            message: message.into(),
            path,
            source: None,
        }
    }

    pub fn config_error_with_source(
        message: impl Into<String>,
        path: Option<PathBuf>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::ConfigError {
            message: message.into(),
            path,
            source: Some(Box::new(source)),
        }
    }

    pub fn validation_error(
        field: impl Into<String>,
        message: impl Into<String>,
        value: Option<String>,
    ) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
            value,
        }
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
            source: None,
        }
    }

    pub fn internal_error_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::InternalError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Exit code and captured stderr of a failed external command.
    pub fn process_failure(&self) -> Option<(Option<i32>, &str)> {
        match self {
            Self::ProcessError {
                exit_code, stderr, ..
            } => Some((*exit_code, stderr.as_str())),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SrcinitError {
    fn from(error: std::io::Error) -> Self {
        Self::internal_error_with_source("I/O operation failed", error)
    }
}

impl From<serde_yaml::Error> for SrcinitError {
    fn from(error: serde_yaml::Error) -> Self {
        Self::config_error_with_source("YAML parsing failed", None, error)
    }
}
