use crate::application::dto::StackAggregatorRequest;
use crate::ports::outbound::RequestReader;
use crate::shared::error::AggregatorError;
use crate::shared::security::{validate_input_file, MAX_INPUT_FILE_SIZE};
use crate::shared::Result;
use std::fs;
use std::path::Path;

/// FileSystemReader adapter for reading stack requests from the file system
///
/// The request file is checked before it is opened: symbolic links,
/// non-regular files and files over the size limit are rejected.
pub struct FileSystemReader {
    max_file_size: u64,
}

impl FileSystemReader {
    pub fn new() -> Self {
        Self {
            max_file_size: MAX_INPUT_FILE_SIZE,
        }
    }

    #[cfg(test)]
    fn with_max_file_size(max_file_size: u64) -> Self {
        Self { max_file_size }
    }
}

impl Default for FileSystemReader {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestReader for FileSystemReader {
    fn read_request(&self, path: &Path) -> Result<StackAggregatorRequest> {
        validate_input_file(path, self.max_file_size)?;

        let content = fs::read_to_string(path).map_err(|e| AggregatorError::FileReadError {
            path: path.to_path_buf(),
            details: e.to_string(),
        })?;

        let request: StackAggregatorRequest =
            serde_json::from_str(&content).map_err(|e| AggregatorError::FileReadError {
                path: path.to_path_buf(),
                details: format!("invalid stack request: {}", e),
            })?;
        request.validate()?;

        Ok(request)
    }
}
