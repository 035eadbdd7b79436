use crate::application::dto::StackAggregatorRequest;
use crate::shared::Result;
use std::path::Path;

/// RequestReader port for loading stack aggregation requests
pub trait RequestReader {
    /// Reads and validates a request envelope
    ///
    /// # Arguments
    /// * `path` - Location of the JSON request
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, is not valid JSON, or
    /// fails request validation
    fn read_request(&self, path: &Path) -> Result<StackAggregatorRequest>;
}
