mod batch_planner;
mod denormalizer;
mod version_selector;

pub use batch_planner::{BatchPlanner, DEFAULT_BATCH_SIZE};
pub use denormalizer::Denormalizer;
pub use version_selector::VersionSelector;
