//! postfeed domain crate
//!
//! This crate contains the core domain logic following hexagonal architecture:
//! - `model`: Domain entities and value objects
//! - `ports`: Trait definitions for external dependencies (adapters)
//! - `listing`: Normalization rules every listing must satisfy
//! - `usecases`: Consumer-facing use cases (feed view-model)

pub mod listing;
pub mod model;
pub mod ports;
pub mod usecases;

pub use model::*;
pub use ports::*;
