//! Driven port for the city and point of interest store.
//!
//! Reads return committed state only. Writes arrive as a whole
//! [`ChangeSet`] which adapters apply atomically.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{
    ChangeSet, City, CityDetails, CityFilter, CityId, CommitReceipt, PointOfInterest,
    PointOfInterestId, PointsOfInterestInclusion,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by city store adapters.
    pub enum CityRepositoryError {
        /// Store connection could not be established.
        Connection { message: String } => "city store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "city store query failed: {message}",
        /// A staged change no longer matches committed state.
        StaleChange { message: String } => "staged change is stale: {message}",
    }
}

/// Port for reading and committing cities and their points of interest.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CityRepository: Send + Sync {
    /// Whether a city with `id` exists.
    async fn city_exists(&self, id: CityId) -> Result<bool, CityRepositoryError>;

    /// One page of cities matching `filter`, ordered by name then id.
    ///
    /// The page metadata counts every match, not just the returned slice.
    async fn list_cities(
        &self,
        filter: &CityFilter,
        request: PageRequest,
    ) -> Result<Page<City>, CityRepositoryError>;

    /// Look up a city in the requested shape.
    async fn find_city(
        &self,
        id: CityId,
        inclusion: PointsOfInterestInclusion,
    ) -> Result<Option<CityDetails>, CityRepositoryError>;

    /// Points of interest of a city ordered by id, or `None` when the city
    /// does not exist.
    async fn list_points_of_interest(
        &self,
        city_id: CityId,
    ) -> Result<Option<Vec<PointOfInterest>>, CityRepositoryError>;

    /// Look up a point of interest within its owning city.
    async fn find_point_of_interest(
        &self,
        city_id: CityId,
        id: PointOfInterestId,
    ) -> Result<Option<PointOfInterest>, CityRepositoryError>;

    /// Apply every change or none.
    async fn commit(&self, changes: ChangeSet) -> Result<CommitReceipt, CityRepositoryError>;
}
