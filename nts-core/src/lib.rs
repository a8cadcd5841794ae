#![warn(missing_docs)]
#![doc = include_str!("../README.md")]

/// Core domain models for the time-series query API.
///
/// This module contains the data structures that represent one historical
/// query from wire parameters to external response, together with the
/// validation each of them performs on construction.
///
/// The models are primarily data with minimal business logic, following the
/// principles of the hexagonal architecture to separate domain entities from
/// their retrieval and transport implementations.
pub mod models;

/// Interface traits for the time-series query API.
///
/// This module contains the "ports" in the hexagonal architecture pattern.
///
/// These traits define the contract between the query-resolution core and
/// the storage translator that actually executes queries, without specifying
/// implementation details. This separation allows for easier testing and the
/// ability to swap storage backends without affecting the core logic.
pub mod ports;

mod dispatch;
pub use dispatch::dispatch;
