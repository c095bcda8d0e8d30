use thiserror::Error;

#[derive(Error, Debug)]
pub enum CleanupError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}' ({value}): {reason}")]
    ValidationError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Command '{program}' failed: {message}")]
    CommandError { program: String, message: String },

    #[error("Registry operation on '{path}' failed: {message}")]
    RegistryError { path: String, message: String },

    #[error("Failed to {action} service '{service}': {message}")]
    ServiceError {
        service: String,
        action: String,
        message: String,
    },

    #[error("Print subsystem error: {message}")]
    PrintSubsystemError { message: String },

    #[error("{capability} is not supported on this platform")]
    Unsupported { capability: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Host,
    Service,
    PrintSubsystem,
    Platform,
}

impl CleanupError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            CleanupError::ConfigError { .. }
            | CleanupError::ValidationError { .. }
            | CleanupError::TomlError(_) => ErrorCategory::Configuration,
            CleanupError::ServiceError { .. } => ErrorCategory::Service,
            CleanupError::PrintSubsystemError { .. } | CleanupError::JsonError(_) => {
                ErrorCategory::PrintSubsystem
            }
            CleanupError::Unsupported { .. } => ErrorCategory::Platform,
            CleanupError::IoError(_)
            | CleanupError::CommandError { .. }
            | CleanupError::RegistryError { .. } => ErrorCategory::Host,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Configuration => {
                "Check the command line flags and the settings file passed with --config"
            }
            ErrorCategory::Service => {
                "Run 'sc query Spooler' and start the Print Spooler service manually if it is stopped"
            }
            ErrorCategory::PrintSubsystem => {
                "Make sure the PrintManagement PowerShell module is available and the spooler is running"
            }
            ErrorCategory::Platform => "This tool only performs cleanup on Windows hosts",
            ErrorCategory::Host => "Re-run from an elevated prompt and check the log above for the failing path",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            CleanupError::ServiceError {
                service, action, ..
            } => format!("Could not {} the '{}' service", action, service),
            CleanupError::ValidationError { field, reason, .. } => {
                format!("Invalid setting '{}': {}", field, reason)
            }
            CleanupError::Unsupported { capability } => {
                format!("{} is only available on Windows", capability)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CleanupError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categories() {
        let service = CleanupError::ServiceError {
            service: "Spooler".to_string(),
            action: "stop".to_string(),
            message: "access denied".to_string(),
        };
        assert_eq!(service.category(), ErrorCategory::Service);

        let printer = CleanupError::PrintSubsystemError {
            message: "printer not found".to_string(),
        };
        assert_eq!(printer.category(), ErrorCategory::PrintSubsystem);
    }

    #[test]
    fn test_user_friendly_message() {
        let err = CleanupError::ServiceError {
            service: "Spooler".to_string(),
            action: "start".to_string(),
            message: "timeout".to_string(),
        };
        assert_eq!(err.user_friendly_message(), "Could not start the 'Spooler' service");
    }
}
