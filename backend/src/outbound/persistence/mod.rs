//! PostgreSQL persistence adapter using Diesel.
//!
//! Diesel row structs (`models.rs`) and table definitions (`schema.rs`) stay
//! private to this module; only the repository, the pool, and the migration
//! runner are exported. Connections come from a `bb8` pool through
//! `diesel-async`.

mod diesel_city_repository;
mod diesel_error_mapping;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_city_repository::DieselCityRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
