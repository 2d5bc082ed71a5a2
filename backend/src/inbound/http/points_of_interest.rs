//! Point of interest HTTP handlers.
//!
//! ```text
//! GET    /api/v1/cities/{cityId}/pointsofinterest
//! GET    /api/v1/cities/{cityId}/pointsofinterest/{id}
//! POST   /api/v1/cities/{cityId}/pointsofinterest
//! PUT    /api/v1/cities/{cityId}/pointsofinterest/{id}
//! PATCH  /api/v1/cities/{cityId}/pointsofinterest/{id}
//! DELETE /api/v1/cities/{cityId}/pointsofinterest/{id}
//! ```
//!
//! Every route requires a session; when the server is configured with a
//! required city claim, the session must also carry that claim.

use actix_web::http::header;
use actix_web::{HttpResponse, delete, get, patch, post, put, web};
use serde_json::Value;

use crate::domain::{
    AuthenticatedUser, CityId, Error, PatchRejection, PointOfInterestDraft, PointOfInterestId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::{
    PointOfInterestDto, PointOfInterestForCreationDto, PointOfInterestForUpdateDto,
};
use crate::inbound::http::schemas::{ErrorSchema, JsonPatchOperationSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

fn authorise(state: &HttpState, session: &SessionContext) -> Result<AuthenticatedUser, Error> {
    session.require_city_claim(state.required_city_claim.as_deref())
}

fn ids(path: web::Path<(i32, i32)>) -> (CityId, PointOfInterestId) {
    let (city_id, id) = path.into_inner();
    (CityId::new(city_id), PointOfInterestId::new(id))
}

/// List the points of interest of a city.
#[utoipa::path(
    get,
    path = "/api/v1/cities/{cityId}/pointsofinterest",
    params(("cityId" = i32, Path, description = "City identifier")),
    responses(
        (status = 200, description = "Points of interest of the city", body = [PointOfInterestDto]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "City not found", body = ErrorSchema)
    ),
    tags = ["points-of-interest"],
    operation_id = "listPointsOfInterest",
    security(("SessionCookie" = []))
)]
#[get("/cities/{city_id}/pointsofinterest")]
pub async fn list_points_of_interest(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i32>,
) -> ApiResult<web::Json<Vec<PointOfInterestDto>>> {
    authorise(&state, &session)?;
    let items = state
        .points_of_interest
        .list_points_of_interest(CityId::new(path.into_inner()))
        .await?;
    Ok(web::Json(items.into_iter().map(Into::into).collect()))
}

/// Fetch one point of interest of a city.
#[utoipa::path(
    get,
    path = "/api/v1/cities/{cityId}/pointsofinterest/{id}",
    params(
        ("cityId" = i32, Path, description = "City identifier"),
        ("id" = i32, Path, description = "Point of interest identifier")
    ),
    responses(
        (status = 200, description = "The point of interest", body = PointOfInterestDto),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["points-of-interest"],
    operation_id = "getPointOfInterest",
    security(("SessionCookie" = []))
)]
#[get("/cities/{city_id}/pointsofinterest/{id}")]
pub async fn get_point_of_interest(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<(i32, i32)>,
) -> ApiResult<web::Json<PointOfInterestDto>> {
    authorise(&state, &session)?;
    let (city_id, id) = ids(path);
    let item = state
        .points_of_interest
        .get_point_of_interest(city_id, id)
        .await?;
    Ok(web::Json(item.into()))
}

/// Add a point of interest to a city.
#[utoipa::path(
    post,
    path = "/api/v1/cities/{cityId}/pointsofinterest",
    params(("cityId" = i32, Path, description = "City identifier")),
    request_body = PointOfInterestForCreationDto,
    responses(
        (status = 201, description = "Point of interest created", body = PointOfInterestDto,
            headers(("Location" = String, description = "URI of the new point of interest"))),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "City not found", body = ErrorSchema)
    ),
    tags = ["points-of-interest"],
    operation_id = "createPointOfInterest",
    security(("SessionCookie" = []))
)]
#[post("/cities/{city_id}/pointsofinterest")]
pub async fn create_point_of_interest(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i32>,
    payload: web::Json<PointOfInterestForCreationDto>,
) -> ApiResult<HttpResponse> {
    authorise(&state, &session)?;
    let city_id = CityId::new(path.into_inner());
    let draft = PointOfInterestDraft::try_from(payload.into_inner())?;
    let created = state
        .point_of_interest_commands
        .create_point_of_interest(city_id, draft)
        .await?;
    let location = format!(
        "/api/v1/cities/{}/pointsofinterest/{}",
        created.city_id(),
        created.id()
    );
    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, location))
        .json(PointOfInterestDto::from(created)))
}

/// Replace every field of a point of interest.
#[utoipa::path(
    put,
    path = "/api/v1/cities/{cityId}/pointsofinterest/{id}",
    params(
        ("cityId" = i32, Path, description = "City identifier"),
        ("id" = i32, Path, description = "Point of interest identifier")
    ),
    request_body = PointOfInterestForUpdateDto,
    responses(
        (status = 204, description = "Point of interest replaced"),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 409, description = "Concurrent change", body = ErrorSchema)
    ),
    tags = ["points-of-interest"],
    operation_id = "replacePointOfInterest",
    security(("SessionCookie" = []))
)]
#[put("/cities/{city_id}/pointsofinterest/{id}")]
pub async fn replace_point_of_interest(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<(i32, i32)>,
    payload: web::Json<PointOfInterestForUpdateDto>,
) -> ApiResult<HttpResponse> {
    authorise(&state, &session)?;
    let (city_id, id) = ids(path);
    let draft = PointOfInterestDraft::try_from(payload.into_inner())?;
    state
        .point_of_interest_commands
        .replace_point_of_interest(city_id, id, draft)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Apply a JSON Patch (RFC 6902) document to a point of interest.
///
/// The document addresses `/name` and `/description`. A document that cannot
/// be applied, or whose result fails validation, is rejected with `400` and
/// leaves the stored values unchanged.
#[utoipa::path(
    patch,
    path = "/api/v1/cities/{cityId}/pointsofinterest/{id}",
    params(
        ("cityId" = i32, Path, description = "City identifier"),
        ("id" = i32, Path, description = "Point of interest identifier")
    ),
    request_body(
        content = [JsonPatchOperationSchema],
        content_type = "application/json-patch+json"
    ),
    responses(
        (status = 204, description = "Patch applied"),
        (status = 400, description = "Patch rejected", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 409, description = "Concurrent change", body = ErrorSchema)
    ),
    tags = ["points-of-interest"],
    operation_id = "patchPointOfInterest",
    security(("SessionCookie" = []))
)]
#[patch("/cities/{city_id}/pointsofinterest/{id}")]
pub async fn patch_point_of_interest(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<(i32, i32)>,
    payload: web::Json<Value>,
) -> ApiResult<HttpResponse> {
    authorise(&state, &session)?;
    let (city_id, id) = ids(path);
    let document: json_patch::Patch = serde_json::from_value(payload.into_inner())
        .map_err(|err| Error::from(PatchRejection::structural(err.to_string())))?;
    state
        .point_of_interest_commands
        .patch_point_of_interest(city_id, id, &document)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Delete a point of interest. A notification is sent after the deletion.
#[utoipa::path(
    delete,
    path = "/api/v1/cities/{cityId}/pointsofinterest/{id}",
    params(
        ("cityId" = i32, Path, description = "City identifier"),
        ("id" = i32, Path, description = "Point of interest identifier")
    ),
    responses(
        (status = 204, description = "Point of interest deleted"),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["points-of-interest"],
    operation_id = "deletePointOfInterest",
    security(("SessionCookie" = []))
)]
#[delete("/cities/{city_id}/pointsofinterest/{id}")]
pub async fn delete_point_of_interest(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<(i32, i32)>,
) -> ApiResult<HttpResponse> {
    authorise(&state, &session)?;
    let (city_id, id) = ids(path);
    state
        .point_of_interest_commands
        .delete_point_of_interest(city_id, id)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "points_of_interest_tests.rs"]
mod tests;
