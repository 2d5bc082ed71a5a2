//! Domain primitives, aggregates, and services.
//!
//! Purpose: define the city and point of interest model, the rules that
//! guard it, and the services that implement the driving ports. Nothing in
//! here knows about HTTP or SQL.
//!
//! Public surface:
//! - `City`, `CityDetails`, `PointOfInterest` and their drafts: validated
//!   entities and creation payloads.
//! - `CityFilter`: optional name and search restrictions for listings.
//! - `apply_patch`: two-phase JSON Patch over a point of interest.
//! - `UnitOfWork`: staged, all-or-nothing mutations.
//! - `CityService`, `PointOfInterestService`: driving port implementations.
//! - `Error` / `ErrorCode`: transport-agnostic failure payload.

pub mod auth;
pub mod city;
pub mod city_filter;
pub mod city_service;
pub mod error;
pub mod patch;
pub mod point_of_interest;
pub mod point_of_interest_service;
pub mod ports;
pub mod trace_id;
pub mod unit_of_work;
pub mod validation;

pub use self::auth::{AuthenticatedUser, IdentityValidationError, LoginCredentials, UserId};
pub use self::city::{
    City, CityDetails, CityDraft, CityId, ForeignPointOfInterest, PointsOfInterestInclusion,
};
pub use self::city_filter::CityFilter;
pub use self::city_service::CityService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::patch::{PatchRejection, apply_patch};
pub use self::point_of_interest::{PointOfInterest, PointOfInterestDraft, PointOfInterestId};
pub use self::point_of_interest_service::PointOfInterestService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::unit_of_work::{AddOutcome, ChangeSet, CommitReceipt, PendingChange, UnitOfWork};
pub use self::validation::{DESCRIPTION_MAX, FieldViolation, NAME_MAX, ValidationErrors};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use cityinfo::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
