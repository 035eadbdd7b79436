/// Network adapters for the graph, license and ingestion services
mod caching_graph_client;
mod gremlin_client;
mod http;
mod ingestion_client;
mod license_scoring_client;

pub use caching_graph_client::CachingGraphRepository;
pub use gremlin_client::GremlinGraphClient;
pub use ingestion_client::IngestionClient;
pub use license_scoring_client::LicenseScoringClient;
