/// Stack analysis domain layer
///
/// Contains the domain model and pure services for aggregating a dependency
/// stack. Nothing in this module performs I/O.
pub mod domain;
pub mod services;
