/// Adapters layer - Infrastructure implementations
///
/// Concrete implementations of the outbound ports: the graph, license and
/// ingestion services over HTTP, request and report files, and the console.
pub mod outbound;
