use crate::shared::error::AggregatorError;
use crate::shared::Result;
use std::fs;
use std::path::Path;

/// Maximum size of a stack request or config file (20 MB)
pub const MAX_INPUT_FILE_SIZE: u64 = 20 * 1024 * 1024;

/// Validates that an input file may be read.
///
/// The path must exist, must not be a symbolic link, must be a regular
/// file and must not exceed `max_size` bytes. `symlink_metadata()` is used
/// so the link itself is inspected rather than its target.
pub fn validate_input_file(path: &Path, max_size: u64) -> Result<()> {
    let metadata = fs::symlink_metadata(path).map_err(|e| AggregatorError::FileReadError {
        path: path.to_path_buf(),
        details: e.to_string(),
    })?;

    if metadata.is_symlink() {
        return Err(AggregatorError::SecurityError {
            path: path.to_path_buf(),
            reason: "Input path is a symbolic link".to_string(),
            hint: "Pass the real file path instead of a link".to_string(),
        }
        .into());
    }

    if !metadata.is_file() {
        return Err(AggregatorError::FileReadError {
            path: path.to_path_buf(),
            details: "not a regular file".to_string(),
        }
        .into());
    }

    if metadata.len() > max_size {
        return Err(AggregatorError::SecurityError {
            path: path.to_path_buf(),
            reason: format!(
                "File is too large ({} bytes). Maximum allowed size is {} bytes.",
                metadata.len(),
                max_size
            ),
            hint: "Split the manifest into smaller stack requests".to_string(),
        }
        .into());
    }

    Ok(())
}

/// Rejects an existing output path that is a symbolic link.
///
/// A missing path is fine; the writer creates it.
pub fn validate_output_path(path: &Path) -> Result<()> {
    match fs::symlink_metadata(path) {
        Ok(metadata) if metadata.is_symlink() => Err(AggregatorError::SecurityError {
            path: path.to_path_buf(),
            reason: "Output path is a symbolic link".to_string(),
            hint: "Write the report to a regular file path".to_string(),
        }
        .into()),
        _ => Ok(()),
    }
}
