//! Outbound adapters implementing domain ports.
//!
//! - **memory**: process-local city store, the default when no database is
//!   configured
//! - **persistence**: PostgreSQL city store using Diesel
//! - **notification**: log-backed mail sender
//!
//! Adapters translate between domain types and infrastructure
//! representations. They contain no business rules.

pub mod memory;
pub mod notification;
pub mod persistence;
