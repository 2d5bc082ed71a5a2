//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! document for the REST API. It registers:
//!
//! - **Paths**: login, city, point of interest, and health endpoints
//! - **Schemas**: request/response DTOs plus the wrappers in
//!   [`crate::inbound::http::schemas`] that describe domain types without
//!   coupling them to utoipa
//! - **Security**: Session cookie authentication scheme
//!
//! The generated document is served by Swagger UI (debug builds) and
//! exported via `cargo run --bin openapi-dump` for external tooling.

use crate::inbound::http::dto::{
    CityDto, CityForCreationDto, CityResponse, CityWithoutPointsOfInterestDto, PointOfInterestDto,
    PointOfInterestForCreationDto, PointOfInterestForUpdateDto,
};
use crate::inbound::http::schemas::{
    ErrorCodeSchema, ErrorSchema, JsonPatchOpSchema, JsonPatchOperationSchema,
};
use crate::inbound::http::users::LoginRequest;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "CityInfo API",
        description = "Cities and their points of interest, with filtered paging and JSON Patch updates.",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0.html"
        )
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::users::login,
        crate::inbound::http::cities::list_cities,
        crate::inbound::http::cities::get_city,
        crate::inbound::http::cities::create_city,
        crate::inbound::http::cities::delete_city,
        crate::inbound::http::points_of_interest::list_points_of_interest,
        crate::inbound::http::points_of_interest::get_point_of_interest,
        crate::inbound::http::points_of_interest::create_point_of_interest,
        crate::inbound::http::points_of_interest::replace_point_of_interest,
        crate::inbound::http::points_of_interest::patch_point_of_interest,
        crate::inbound::http::points_of_interest::delete_point_of_interest,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        JsonPatchOpSchema,
        JsonPatchOperationSchema,
        LoginRequest,
        CityResponse,
        CityDto,
        CityWithoutPointsOfInterestDto,
        CityForCreationDto,
        PointOfInterestDto,
        PointOfInterestForCreationDto,
        PointOfInterestForUpdateDto,
    )),
    tags(
        (name = "users", description = "Session login"),
        (name = "cities", description = "Listing, fetching, creating, and deleting cities"),
        (name = "points-of-interest", description = "Points of interest nested under a city"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
