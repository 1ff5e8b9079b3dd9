use colored::*;
use std::error::Error as StdError;
use std::fmt;
use std::io;

/// CLI-specific error type with semantic exit codes
#[derive(Debug)]
pub struct CliError {
    /// The main error message
    message: String,

    /// Error category for exit code determination
    category: ErrorCategory,

    /// Additional context information
    context: Vec<(String, String)>,

    /// Suggestions for recovery
    pub suggestions: Vec<String>,

    /// Source error if any
    source: Option<Box<dyn StdError + Send + Sync>>,
}

/// Error categories that map to exit codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ErrorCategory {
    General,
    Misuse,
    Network,
    Filesystem,
}

/// Semantic exit codes for the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    Success = 0,
    GeneralError = 1,
    Misuse = 2,
    NetworkError = 3,
    FilesystemError = 4,
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Create a general error
    pub fn general(message: &str) -> Self {
        Self {
            message: message.to_string(),
            category: ErrorCategory::General,
            context: Vec::new(),
            suggestions: Vec::new(),
            source: None,
        }
    }

    /// Create a command misuse error
    pub fn misuse(message: &str) -> Self {
        Self {
            message: message.to_string(),
            category: ErrorCategory::Misuse,
            context: Vec::new(),
            suggestions: vec!["Run 'gwadm --help' for usage information".to_string()],
            source: None,
        }
    }

    /// Create a network error
    pub fn network(message: &str) -> Self {
        Self {
            message: message.to_string(),
            category: ErrorCategory::Network,
            context: Vec::new(),
            suggestions: vec![
                "Check your internet connection".to_string(),
                "Verify the provisioning API base URL in your configuration".to_string(),
                "Try again later".to_string(),
            ],
            source: None,
        }
    }

    /// Create a filesystem error
    pub fn filesystem(message: &str) -> Self {
        let mut error = Self {
            message: message.to_string(),
            category: ErrorCategory::Filesystem,
            context: Vec::new(),
            suggestions: Vec::new(),
            source: None,
        };

        if message.contains("not found") {
            error
                .suggestions
                .push("Check if the file or directory exists".to_string());
        } else if message.contains("permission") || message.contains("denied") {
            error.suggestions.push("Check file permissions".to_string());
        }

        error
    }

    /// Create an error from an IO error
    pub fn from_io_error(error: io::Error, path: &str) -> Self {
        let message = format!("IO error on '{path}': {error}");
        let mut cli_error = match error.kind() {
            io::ErrorKind::NotFound => Self::filesystem(&message),
            io::ErrorKind::PermissionDenied => Self::filesystem(&message),
            io::ErrorKind::TimedOut => Self::network(&message),
            _ => Self::general(&message),
        };

        cli_error.source = Some(Box::new(error));
        cli_error
            .context
            .push(("path".to_string(), path.to_string()));
        cli_error
    }

    /// Attach a context key/value pair
    pub fn with_context(mut self, key: &str, value: &str) -> Self {
        self.context.push((key.to_string(), value.to_string()));
        self
    }

    /// Attach a recovery suggestion
    pub fn with_suggestion(mut self, suggestion: &str) -> Self {
        self.suggestions.push(suggestion.to_string());
        self
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        match self.category {
            ErrorCategory::General => ExitCode::GeneralError,
            ErrorCategory::Misuse => ExitCode::Misuse,
            ErrorCategory::Network => ExitCode::NetworkError,
            ErrorCategory::Filesystem => ExitCode::FilesystemError,
        }
    }

    /// Format the error for user display
    pub fn format_for_user(&self, debug: bool) -> String {
        let mut output = String::new();

        let prefix = match self.category {
            ErrorCategory::General => "Error".red(),
            ErrorCategory::Misuse => "Usage Error".yellow(),
            ErrorCategory::Network => "Network Error".red(),
            ErrorCategory::Filesystem => "File Error".red(),
        };

        output.push_str(&format!("{}: {}\n", prefix, self.message));

        if !self.context.is_empty() {
            output.push_str("\nContext:\n");
            for (key, value) in &self.context {
                output.push_str(&format!("  {}: {}\n", key.bold(), value));
            }
        }

        if debug && let Some(source) = &self.source {
            output.push_str("\nCaused by:\n");
            let mut current: Option<&dyn StdError> = Some(source.as_ref());
            let mut level = 1;

            while let Some(err) = current {
                output.push_str(&format!("  {level}: {err}\n"));
                current = err.source();
                level += 1;
            }
        }

        if !self.suggestions.is_empty() {
            output.push_str("\nSuggestions:\n");
            for suggestion in &self.suggestions {
                output.push_str(&format!("  • {suggestion}\n"));
            }
        }

        output
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}",
            match self.category {
                ErrorCategory::General => "Error",
                ErrorCategory::Misuse => "Usage Error",
                ErrorCategory::Network => "Network Error",
                ErrorCategory::Filesystem => "File Error",
            },
            self.message
        )?;

        for (key, value) in &self.context {
            write!(f, " ({key}: {value})")?;
        }

        Ok(())
    }
}

impl StdError for CliError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

/// Map core errors onto CLI categories
impl From<gwadm_client_core::Error> for CliError {
    fn from(error: gwadm_client_core::Error) -> Self {
        use gwadm_client_core::{Error, ServiceError};

        let mut cli_error = match &error {
            Error::Service(ServiceError::Transport { message }) => Self::network(message),
            Error::Service(_) => Self::general(&error.to_string()),
            Error::Validation(_) => Self::misuse(&error.to_string()),
            Error::Batch(batch) => {
                let mut e = Self::general(&batch.to_string());
                if let Some(index) = batch.batch_index() {
                    e = e.with_context("batch", &index.to_string()).with_suggestion(
                        "Earlier batches stayed committed; correct the source list and re-run",
                    );
                }
                e
            }
        };
        cli_error.source = Some(Box::new(error));
        cli_error
    }
}

/// Convert anyhow errors to CLI errors
impl From<anyhow::Error> for CliError {
    fn from(error: anyhow::Error) -> Self {
        // Surface a core error's category when one is at the root
        match error.downcast::<gwadm_client_core::Error>() {
            Ok(core) => core.into(),
            Err(other) => Self::general(&format!("{other:#}")),
        }
    }
}
