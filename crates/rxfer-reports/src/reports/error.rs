// Report locator error types

use rxfer_core::TransferError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    /// Data source name outside the known set
    #[error("Unsupported data source '{source_name}' (expected one of {expected})")]
    UnsupportedSource { source_name: String, expected: String },

    /// Exact filenames that the remote folder does not list
    #[error("Following files not found: {}", .0.join(", "))]
    MissingFiles(Vec<String>),

    /// No listed file carries this prefix
    #[error("No file found for prefix '{0}'")]
    NoMatch(String),

    /// Argument outside its accepted range
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error(transparent)]
    Transfer(#[from] TransferError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ReportResult<T> = Result<T, ReportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_files_lists_names() {
        let err = ReportError::MissingFiles(vec!["a.parquet".into(), "b.parquet".into()]);
        assert_eq!(err.to_string(), "Following files not found: a.parquet, b.parquet");
    }

    #[test]
    fn test_transfer_error_passes_through() {
        let err: ReportError = TransferError::not_found("gone").into();
        assert!(matches!(err, ReportError::Transfer(_)));
        assert!(err.to_string().contains("gone"));
    }
}
