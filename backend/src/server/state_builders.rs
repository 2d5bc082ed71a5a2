//! Builders for the HTTP state from server configuration.

use std::sync::Arc;

use actix_web::web;
use tracing::info;

use cityinfo::domain::ports::{CityRepository, FixtureLoginService, NotificationSender};
use cityinfo::domain::{CityService, PointOfInterestService};
use cityinfo::inbound::http::state::{HttpState, HttpStatePorts};
use cityinfo::outbound::memory::InMemoryCityRepository;
use cityinfo::outbound::persistence::DieselCityRepository;

use super::ServerConfig;

/// Pick the city store: PostgreSQL when a pool is configured, otherwise the
/// seeded in-memory store.
fn build_repository(config: &ServerConfig) -> Arc<dyn CityRepository> {
    match &config.db_pool {
        Some(pool) => {
            info!(store = "postgres", "city store selected");
            Arc::new(DieselCityRepository::new(pool.clone()))
        }
        None => {
            info!(store = "memory", "city store selected");
            Arc::new(InMemoryCityRepository::seeded())
        }
    }
}

/// Wire the domain services over `repository` and `notifier` into HTTP
/// state.
pub(crate) fn http_state_over(
    repository: Arc<dyn CityRepository>,
    notifier: Arc<dyn NotificationSender>,
    required_city_claim: Option<String>,
) -> HttpState {
    let cities = Arc::new(CityService::new(Arc::clone(&repository)));
    let points_of_interest = Arc::new(PointOfInterestService::new(repository, notifier));
    HttpState::new(HttpStatePorts {
        login: Arc::new(FixtureLoginService),
        cities: cities.clone(),
        city_commands: cities,
        points_of_interest: points_of_interest.clone(),
        point_of_interest_commands: points_of_interest,
    })
    .with_required_city_claim(required_city_claim)
}

/// Build the shared HTTP state for `config`.
pub(crate) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let repository = build_repository(config);
    web::Data::new(http_state_over(
        repository,
        Arc::clone(&config.notifier),
        config.required_city_claim.clone(),
    ))
}
