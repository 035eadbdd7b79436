/// Data Transfer Objects for application layer
///
/// DTOs are used to transfer data between the application layer
/// and adapters, keeping the domain layer isolated.
mod aggregation_options;
mod aggregation_settings;
mod stack_request;

pub use aggregation_options::AggregationOptions;
pub use aggregation_settings::{
    AggregationSettings, EnrichmentFailurePolicy, PackageUrlTemplate,
    DEFAULT_MAX_CONCURRENT_BATCHES, DEFAULT_PACKAGE_URL_FORMAT, DEFAULT_REGISTRATION_LINK,
};
pub use stack_request::StackAggregatorRequest;
