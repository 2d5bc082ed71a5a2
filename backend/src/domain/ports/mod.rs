//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod city_command;
mod city_query;
mod city_repository;
mod login_service;
mod notification_sender;
mod point_of_interest_command;
mod point_of_interest_query;

pub use city_command::CityCommand;
#[cfg(test)]
pub use city_command::MockCityCommand;
pub use city_query::{CityQuery, ListCitiesRequest};
#[cfg(test)]
pub use city_query::MockCityQuery;
pub use city_repository::{CityRepository, CityRepositoryError};
#[cfg(test)]
pub use city_repository::MockCityRepository;
pub use login_service::{FIXTURE_CITY_CLAIM, FIXTURE_USER_ID, FixtureLoginService, LoginService};
#[cfg(test)]
pub use login_service::MockLoginService;
pub use notification_sender::{FixtureNotificationSender, NotificationError, NotificationSender};
#[cfg(test)]
pub use notification_sender::MockNotificationSender;
pub use point_of_interest_command::PointOfInterestCommand;
#[cfg(test)]
pub use point_of_interest_command::MockPointOfInterestCommand;
pub use point_of_interest_query::PointOfInterestQuery;
#[cfg(test)]
pub use point_of_interest_query::MockPointOfInterestQuery;

#[cfg(test)]
mod tests;
