//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::{App, test as actix_test, web};

use crate::domain::ports::{FixtureLoginService, FixtureNotificationSender};
use crate::domain::{CityService, PointOfInterestService};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::inbound::http::users::{LoginRequest, login};
use crate::inbound::http::validation::{json_config, path_config, query_config};
use crate::outbound::memory::InMemoryCityRepository;

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// HTTP state over `store` with fixture login and notifications.
pub fn state_over(store: InMemoryCityRepository) -> HttpState {
    let store = Arc::new(store);
    let cities = Arc::new(CityService::new(Arc::clone(&store)));
    let points_of_interest = Arc::new(PointOfInterestService::new(
        store,
        Arc::new(FixtureNotificationSender),
    ));
    HttpState::new(HttpStatePorts {
        login: Arc::new(FixtureLoginService),
        cities: cities.clone(),
        city_commands: cities,
        points_of_interest: points_of_interest.clone(),
        point_of_interest_commands: points_of_interest,
    })
}

/// HTTP state over the seeded sample cities.
pub fn memory_state() -> HttpState {
    state_over(InMemoryCityRepository::seeded())
}

/// App exposing login plus `register`'s routes under `/api/v1`.
pub fn api_app<F>(
    state: HttpState,
    register: F,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
>
where
    F: FnOnce(actix_web::Scope) -> actix_web::Scope,
{
    App::new()
        .app_data(web::Data::new(state))
        .app_data(json_config())
        .app_data(query_config())
        .app_data(path_config())
        .wrap(crate::middleware::Trace)
        .wrap(test_session_middleware())
        .service(register(web::scope("/api/v1").service(login)))
}

/// Log in with the fixture account and return the session cookie.
pub async fn login_cookie(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    >,
) -> Cookie<'static> {
    let request = actix_test::TestRequest::post()
        .uri("/api/v1/login")
        .set_json(&LoginRequest {
            username: "admin".into(),
            password: "password".into(),
        })
        .to_request();
    let response = actix_test::call_service(app, request).await;
    assert!(response.status().is_success(), "fixture login succeeds");
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .into_owned()
}
