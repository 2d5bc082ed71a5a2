//! Driving port for point of interest reads.

use async_trait::async_trait;

use crate::domain::{CityId, Error, PointOfInterest, PointOfInterestId};

/// Driving port for reading the points of interest of a city.
///
/// Both operations fail with `not_found` when the city does not exist, and
/// [`get_point_of_interest`](Self::get_point_of_interest) also when the
/// point of interest belongs to another city.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PointOfInterestQuery: Send + Sync {
    /// List the city's points of interest ordered by id.
    async fn list_points_of_interest(
        &self,
        city_id: CityId,
    ) -> Result<Vec<PointOfInterest>, Error>;

    /// Fetch one point of interest of the city.
    async fn get_point_of_interest(
        &self,
        city_id: CityId,
        id: PointOfInterestId,
    ) -> Result<PointOfInterest, Error>;
}
