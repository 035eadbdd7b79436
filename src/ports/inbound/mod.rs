/// Inbound ports (Driving ports) - Use case interfaces
///
/// These ports define the interfaces that external adapters (e.g., CLI)
/// use to interact with the application core.
pub mod stack_aggregation_port;

pub use stack_aggregation_port::StackAggregationPort;
