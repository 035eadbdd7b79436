use std::path::PathBuf;
use thiserror::Error;

/// Process exit codes of the `stack-aggregator` binary
///
/// clap exits with `InvalidArguments` on its own; everything that fails
/// after argument parsing maps to `ApplicationError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success - the report was produced and persisted
    Success = 0,
    /// Invalid command-line arguments (clap parsing errors)
    InvalidArguments = 2,
    /// Application error (graph service error, file I/O error, invalid config, etc.)
    ApplicationError = 3,
}

impl ExitCode {
    /// Convert to i32 for use with std::process::exit
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

/// Application-specific errors for stack aggregation.
///
/// The first four variants are the pipeline's failure taxonomy; only
/// `GraphService` and `MalformedRecord` ever abort a request; the license
/// and ingestion variants are recovered where they occur and only logged.
#[derive(Debug, Error)]
pub enum AggregatorError {
    #[error("Graph service query failed for batch {batch}\nDetails: {details}\n\n💡 Hint: Verify that the graph service is reachable and the configured graph_url is correct")]
    GraphService { batch: usize, details: String },

    #[error("License scoring service failed\nDetails: {details}")]
    LicenseService { details: String },

    #[error("Failed to ingest unknown package {ecosystem}/{name}@{version}\nDetails: {details}")]
    Ingestion {
        ecosystem: String,
        name: String,
        version: String,
        details: String,
    },

    #[error("Malformed package record: {details}")]
    MalformedRecord { details: String },

    /// Validation error for builder patterns and request envelopes
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Invalid configuration: {path}\nDetails: {details}\n\n💡 Hint: Check the values in your stack-aggregator config file")]
    InvalidConfig { path: PathBuf, details: String },

    #[error("Failed to read file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the file exists and you have read permissions")]
    FileReadError { path: PathBuf, details: String },

    #[error("Failed to write to file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the directory exists and you have write permissions")]
    FileWriteError { path: PathBuf, details: String },

    #[error("Security violation: {path}\nReason: {reason}\n\n💡 Hint: {hint}")]
    SecurityError {
        path: PathBuf,
        reason: String,
        hint: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        let codes: Vec<i32> = [
            ExitCode::Success,
            ExitCode::InvalidArguments,
            ExitCode::ApplicationError,
        ]
        .into_iter()
        .map(ExitCode::as_i32)
        .collect();
        assert_eq!(codes, vec![0, 2, 3]);
    }

    #[test]
    fn test_graph_service_display() {
        let error = AggregatorError::GraphService {
            batch: 2,
            details: "connection refused".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("batch 2"));
        assert!(display.contains("connection refused"));
        assert!(display.contains("💡 Hint:"));
    }

    #[test]
    fn test_ingestion_display() {
        let error = AggregatorError::Ingestion {
            ecosystem: "pypi".to_string(),
            name: "flask".to_string(),
            version: "0.12".to_string(),
            details: "503".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("pypi/flask@0.12"));
        assert!(display.contains("503"));
    }

    #[test]
    fn test_malformed_record_display() {
        let error = AggregatorError::MalformedRecord {
            details: "missing package name".to_string(),
        };
        assert_eq!(
            format!("{}", error),
            "Malformed package record: missing package name"
        );
    }

    #[test]
    fn test_invalid_config_display() {
        let error = AggregatorError::InvalidConfig {
            path: PathBuf::from("/etc/stack-aggregator.config.yml"),
            details: "batch_size must be at least 1".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("Invalid configuration"));
        assert!(display.contains("batch_size must be at least 1"));
    }

    #[test]
    fn test_report_write_failure_names_path() {
        let error = AggregatorError::FileWriteError {
            path: PathBuf::from("out/report.json"),
            details: "disk full".to_string(),
        };
        let display = error.to_string();
        assert!(display.starts_with("Failed to write to file: out/report.json"));
        assert!(display.contains("disk full"));
    }

    #[test]
    fn test_security_error_carries_custom_hint() {
        let error = AggregatorError::SecurityError {
            path: PathBuf::from("stack.json"),
            reason: "file is a symlink".to_string(),
            hint: "pass the resolved request path".to_string(),
        };
        assert!(error
            .to_string()
            .ends_with("💡 Hint: pass the resolved request path"));
    }
}
