//! Driving port for city reads.
//!
//! Inbound adapters list and fetch cities through this port without knowing
//! which store backs it.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{City, CityDetails, CityFilter, CityId, Error, PointsOfInterestInclusion};

/// Request for one filtered page of cities.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListCitiesRequest {
    pub filter: CityFilter,
    pub page: PageRequest,
}

/// Driving port for city read operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CityQuery: Send + Sync {
    /// Return one page of cities plus metadata describing the whole match.
    async fn list_cities(&self, request: ListCitiesRequest) -> Result<Page<City>, Error>;

    /// Fetch a city, failing with `not_found` when it does not exist.
    async fn get_city(
        &self,
        id: CityId,
        inclusion: PointsOfInterestInclusion,
    ) -> Result<CityDetails, Error>;
}
