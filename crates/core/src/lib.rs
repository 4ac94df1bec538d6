//! Moneta Core - Domain entities, services, and traits.
//!
//! This crate contains the core business logic for Moneta: investments,
//! their monthly interest payments, the payment scheduler, and the debt
//! notification engine. It is database-agnostic and defines traits that are
//! implemented by the `storage-sqlite` crate.

pub mod backup;
pub mod constants;
pub mod errors;
pub mod events;
pub mod investments;
pub mod notifications;
pub mod payments;
pub mod settings;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
