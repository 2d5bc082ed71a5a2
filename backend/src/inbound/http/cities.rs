//! City HTTP handlers.
//!
//! ```text
//! GET    /api/v1/cities?name=&searchQuery=&pageNumber=&pageSize=
//! GET    /api/v1/cities/{cityId}?includePointsOfInterest=true
//! POST   /api/v1/cities
//! DELETE /api/v1/cities/{cityId}
//! ```

use actix_web::http::header;
use actix_web::{HttpResponse, delete, get, post, web};
use pagination::PAGINATION_HEADER;
use serde::Deserialize;
use tracing::error;
use utoipa::IntoParams;

use crate::domain::ports::ListCitiesRequest;
use crate::domain::{CityDraft, CityFilter, CityId, Error, PointsOfInterestInclusion};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::{
    CityForCreationDto, CityResponse, CityWithoutPointsOfInterestDto,
};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::page_request;

/// Query parameters for `GET /api/v1/cities`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListCitiesQuery {
    /// Exact city name, ignoring surrounding whitespace.
    pub name: Option<String>,
    /// Substring matched against name or description.
    pub search_query: Option<String>,
    /// One-based page number; defaults to 1.
    pub page_number: Option<u32>,
    /// Items per page; defaults to 10, clamped to 20.
    pub page_size: Option<u32>,
}

/// Query parameters for `GET /api/v1/cities/{cityId}`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct GetCityQuery {
    /// Include the city's points of interest.
    #[serde(default)]
    pub include_points_of_interest: bool,
}

/// List cities with optional filtering and paging.
///
/// Paging metadata is returned in the `X-Pagination` header.
#[utoipa::path(
    get,
    path = "/api/v1/cities",
    params(ListCitiesQuery),
    responses(
        (status = 200, description = "Cities on the requested page", body = [CityWithoutPointsOfInterestDto],
            headers(("X-Pagination" = String, description = "Paging metadata as JSON"))),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["cities"],
    operation_id = "listCities",
    security(("SessionCookie" = []))
)]
#[get("/cities")]
pub async fn list_cities(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<ListCitiesQuery>,
) -> ApiResult<HttpResponse> {
    session.require_user()?;
    let ListCitiesQuery {
        name,
        search_query,
        page_number,
        page_size,
    } = query.into_inner();
    let request = ListCitiesRequest {
        filter: CityFilter::new(name.as_deref(), search_query.as_deref()),
        page: page_request(page_number, page_size)?,
    };

    let (cities, metadata) = state.cities.list_cities(request).await?.into_parts();
    let header_value = metadata.to_header_value().map_err(|err| {
        error!(error = %err, "failed to encode pagination header");
        Error::internal(format!("failed to encode pagination header: {err}"))
    })?;
    let body: Vec<CityWithoutPointsOfInterestDto> = cities.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok()
        .insert_header((PAGINATION_HEADER, header_value))
        .json(body))
}

/// Fetch one city, optionally with its points of interest.
#[utoipa::path(
    get,
    path = "/api/v1/cities/{cityId}",
    params(("cityId" = i32, Path, description = "City identifier"), GetCityQuery),
    responses(
        (status = 200, description = "The city", body = CityResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["cities"],
    operation_id = "getCity",
    security(("SessionCookie" = []))
)]
#[get("/cities/{city_id}")]
pub async fn get_city(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i32>,
    query: web::Query<GetCityQuery>,
) -> ApiResult<web::Json<CityResponse>> {
    session.require_user()?;
    let inclusion = PointsOfInterestInclusion::from(query.include_points_of_interest);
    let details = state
        .cities
        .get_city(CityId::new(path.into_inner()), inclusion)
        .await?;
    Ok(web::Json(details.into()))
}

/// Create a city.
#[utoipa::path(
    post,
    path = "/api/v1/cities",
    request_body = CityForCreationDto,
    responses(
        (status = 201, description = "City created", body = CityWithoutPointsOfInterestDto,
            headers(("Location" = String, description = "URI of the new city"))),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["cities"],
    operation_id = "createCity",
    security(("SessionCookie" = []))
)]
#[post("/cities")]
pub async fn create_city(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CityForCreationDto>,
) -> ApiResult<HttpResponse> {
    session.require_user()?;
    let draft = CityDraft::try_from(payload.into_inner())?;
    let city = state.city_commands.create_city(draft).await?;
    let location = format!("/api/v1/cities/{}", city.id());
    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, location))
        .json(CityWithoutPointsOfInterestDto::from(city)))
}

/// Delete a city and every point of interest it owns.
#[utoipa::path(
    delete,
    path = "/api/v1/cities/{cityId}",
    params(("cityId" = i32, Path, description = "City identifier")),
    responses(
        (status = 204, description = "City deleted"),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 409, description = "Concurrent change", body = ErrorSchema)
    ),
    tags = ["cities"],
    operation_id = "deleteCity",
    security(("SessionCookie" = []))
)]
#[delete("/cities/{city_id}")]
pub async fn delete_city(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    session.require_user()?;
    state
        .city_commands
        .delete_city(CityId::new(path.into_inner()))
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "cities_tests.rs"]
mod tests;
