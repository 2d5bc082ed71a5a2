//! Tests for city HTTP handlers.

use super::*;
use crate::domain::PointOfInterestId;
use crate::domain::ports::{CityRepository, MockCityQuery};
use crate::inbound::http::test_utils::{api_app, login_cookie, memory_state, state_over};
use crate::outbound::memory::InMemoryCityRepository;
use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use rstest::rstest;
use serde_json::{Value, json};
use std::sync::Arc;

fn city_routes(scope: actix_web::Scope) -> actix_web::Scope {
    scope
        .service(list_cities)
        .service(get_city)
        .service(create_city)
        .service(delete_city)
}

fn pagination_header(response: &actix_web::dev::ServiceResponse) -> Value {
    let raw = response
        .headers()
        .get(PAGINATION_HEADER)
        .expect("pagination header")
        .to_str()
        .expect("ascii header");
    serde_json::from_str(raw).expect("header holds JSON")
}

#[actix_web::test]
async fn listing_requires_a_session() {
    let app = actix_test::init_service(api_app(memory_state(), city_routes)).await;
    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/cities")
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn listing_by_name_returns_single_page() {
    let app = actix_test::init_service(api_app(memory_state(), city_routes)).await;
    let cookie = login_cookie(&app).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/cities?name=Antwerp")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        pagination_header(&response),
        json!({"currentPage": 1, "totalPages": 1, "pageSize": 10, "totalCount": 1})
    );
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body.as_array().map(Vec::len), Some(1));
    assert_eq!(body[0]["name"], "Antwerp");
    assert!(body[0].get("pointsOfInterest").is_none());
}

#[actix_web::test]
async fn page_size_is_clamped_to_ceiling() {
    let app = actix_test::init_service(api_app(memory_state(), city_routes)).await;
    let cookie = login_cookie(&app).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/cities?pageSize=500")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(pagination_header(&response)["pageSize"], 20);
}

#[rstest]
#[case("/api/v1/cities?pageNumber=0")]
#[case("/api/v1/cities?pageSize=0")]
#[case("/api/v1/cities?pageNumber=first")]
#[actix_web::test]
async fn invalid_paging_is_rejected(#[case] uri: &str) {
    let app = actix_test::init_service(api_app(memory_state(), city_routes)).await;
    let cookie = login_cookie(&app).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(uri)
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["code"], "invalid_request");
}

#[rstest]
#[case("/api/v1/cities/2", false, None)]
#[case("/api/v1/cities/2?includePointsOfInterest=true", true, Some(2))]
#[actix_web::test]
async fn get_city_selects_output_shape(
    #[case] uri: &str,
    #[case] includes: bool,
    #[case] count: Option<u64>,
) {
    let app = actix_test::init_service(api_app(memory_state(), city_routes)).await;
    let cookie = login_cookie(&app).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(uri)
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["name"], "Antwerp");
    assert_eq!(body.get("pointsOfInterest").is_some(), includes);
    assert_eq!(
        body.get("numberOfPointsOfInterest").and_then(Value::as_u64),
        count
    );
}

#[actix_web::test]
async fn unknown_city_is_not_found() {
    let app = actix_test::init_service(api_app(memory_state(), city_routes)).await;
    let cookie = login_cookie(&app).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/cities/999")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(response.headers().contains_key("trace-id"));
}

#[actix_web::test]
async fn create_city_returns_location() {
    let app = actix_test::init_service(api_app(memory_state(), city_routes)).await;
    let cookie = login_cookie(&app).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/cities")
            .cookie(cookie)
            .set_json(json!({"name": "Ghent", "description": "The one with the castle."}))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(
        response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok()),
        Some("/api/v1/cities/4")
    );
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["id"], 4);
}

#[actix_web::test]
async fn create_city_reports_validation_details() {
    let app = actix_test::init_service(api_app(memory_state(), city_routes)).await;
    let cookie = login_cookie(&app).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/cities")
            .cookie(cookie)
            .set_json(json!({"name": "   "}))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["details"]["code"], "validation_failed");
}

#[actix_web::test]
async fn deleting_a_city_removes_its_points_of_interest() {
    let store = InMemoryCityRepository::seeded();
    let app = actix_test::init_service(api_app(state_over(store.clone()), city_routes)).await;
    let cookie = login_cookie(&app).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::delete()
            .uri("/api/v1/cities/3")
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let again = actix_test::call_service(
        &app,
        actix_test::TestRequest::delete()
            .uri("/api/v1/cities/3")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(again.status(), StatusCode::NOT_FOUND);

    let remaining = store
        .find_point_of_interest(CityId::new(3), PointOfInterestId::new(5))
        .await
        .expect("lookup");
    assert!(remaining.is_none());
}

#[actix_web::test]
async fn store_outage_maps_to_service_unavailable() {
    let mut query = MockCityQuery::new();
    query
        .expect_list_cities()
        .times(1)
        .return_once(|_| Err(Error::service_unavailable("city store unavailable")));
    let mut state = memory_state();
    state.cities = Arc::new(query);

    let app = actix_test::init_service(api_app(state, city_routes)).await;
    let cookie = login_cookie(&app).await;
    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/cities")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert!(response.headers().get(PAGINATION_HEADER).is_none());
}
