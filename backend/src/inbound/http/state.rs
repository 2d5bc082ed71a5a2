//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    CityCommand, CityQuery, LoginService, PointOfInterestCommand, PointOfInterestQuery,
};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub login: Arc<dyn LoginService>,
    pub cities: Arc<dyn CityQuery>,
    pub city_commands: Arc<dyn CityCommand>,
    pub points_of_interest: Arc<dyn PointOfInterestQuery>,
    pub point_of_interest_commands: Arc<dyn PointOfInterestCommand>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub cities: Arc<dyn CityQuery>,
    pub city_commands: Arc<dyn CityCommand>,
    pub points_of_interest: Arc<dyn PointOfInterestQuery>,
    pub point_of_interest_commands: Arc<dyn PointOfInterestCommand>,
    /// City claim a session must carry to reach point of interest routes.
    pub required_city_claim: Option<String>,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    /// Construct state with no city claim requirement.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use cityinfo::domain::ports::{FixtureLoginService, FixtureNotificationSender};
    /// use cityinfo::domain::{CityService, PointOfInterestService};
    /// use cityinfo::inbound::http::state::{HttpState, HttpStatePorts};
    /// use cityinfo::outbound::memory::InMemoryCityRepository;
    ///
    /// let store = Arc::new(InMemoryCityRepository::seeded());
    /// let cities = Arc::new(CityService::new(store.clone()));
    /// let pois = Arc::new(PointOfInterestService::new(
    ///     store,
    ///     Arc::new(FixtureNotificationSender),
    /// ));
    /// let state = HttpState::new(HttpStatePorts {
    ///     login: Arc::new(FixtureLoginService),
    ///     cities: cities.clone(),
    ///     city_commands: cities,
    ///     points_of_interest: pois.clone(),
    ///     point_of_interest_commands: pois,
    /// })
    /// .with_required_city_claim(Some("Antwerp".to_owned()));
    /// assert_eq!(state.required_city_claim.as_deref(), Some("Antwerp"));
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            login,
            cities,
            city_commands,
            points_of_interest,
            point_of_interest_commands,
        } = ports;
        Self {
            login,
            cities,
            city_commands,
            points_of_interest,
            point_of_interest_commands,
            required_city_claim: None,
        }
    }

    /// Require sessions to carry `claim` for point of interest routes.
    #[must_use]
    pub fn with_required_city_claim(mut self, claim: Option<String>) -> Self {
        self.required_city_claim = claim;
        self
    }
}
