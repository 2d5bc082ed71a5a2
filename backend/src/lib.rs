//! CityInfo backend library modules.
//!
//! The crate follows a hexagonal layout: [`domain`] holds entities, rules,
//! and driving/driven ports; [`inbound`] adapts HTTP requests onto the
//! driving ports; [`outbound`] implements the driven ports over memory,
//! PostgreSQL, and the log-backed mail sender.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
