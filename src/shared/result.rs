/// Type alias for Result with anyhow::Error as the error type.
/// Typed failures are raised as `AggregatorError` and converted on `?`.
pub type Result<T> = std::result::Result<T, anyhow::Error>;
