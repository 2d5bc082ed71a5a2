//! City domain service.
//!
//! Implements the city driving ports over a [`CityRepository`]. Mutations go
//! through a [`UnitOfWork`] so they are applied atomically.

use std::sync::Arc;

use async_trait::async_trait;
use pagination::Page;
use serde_json::json;
use tracing::{error, info, warn};

use crate::domain::ports::{
    CityCommand, CityQuery, CityRepository, CityRepositoryError, ListCitiesRequest,
};
use crate::domain::{
    City, CityDetails, CityDraft, CityId, Error, PointsOfInterestInclusion, UnitOfWork,
};

/// Translate store failures into domain errors, logging the unexpected ones.
pub(crate) fn map_repository_error(error: CityRepositoryError) -> Error {
    match error {
        CityRepositoryError::Connection { message } => {
            warn!(%message, "city store unavailable");
            Error::service_unavailable(format!("city store unavailable: {message}"))
        }
        CityRepositoryError::Query { message } => {
            error!(%message, "city store query failed");
            Error::internal(format!("city store error: {message}"))
        }
        CityRepositoryError::StaleChange { message } => {
            Error::conflict(format!("the resource changed concurrently: {message}"))
                .with_details(json!({ "code": "stale_change" }))
        }
    }
}

pub(crate) fn city_not_found(id: CityId) -> Error {
    Error::not_found(format!("city {id} not found"))
}

/// City service implementing [`CityQuery`] and [`CityCommand`].
pub struct CityService<R: ?Sized> {
    repository: Arc<R>,
}

impl<R: ?Sized> CityService<R> {
    /// Create a service over a shared store.
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }
}

impl<R: ?Sized> Clone for CityService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

#[async_trait]
impl<R> CityQuery for CityService<R>
where
    R: CityRepository + ?Sized,
{
    async fn list_cities(&self, request: ListCitiesRequest) -> Result<Page<City>, Error> {
        self.repository
            .list_cities(&request.filter, request.page)
            .await
            .map_err(map_repository_error)
    }

    async fn get_city(
        &self,
        id: CityId,
        inclusion: PointsOfInterestInclusion,
    ) -> Result<CityDetails, Error> {
        self.repository
            .find_city(id, inclusion)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| city_not_found(id))
    }
}

#[async_trait]
impl<R> CityCommand for CityService<R>
where
    R: CityRepository + ?Sized,
{
    async fn create_city(&self, draft: CityDraft) -> Result<City, Error> {
        let mut uow = UnitOfWork::new(self.repository.as_ref());
        uow.add_city(draft);
        let city = uow
            .commit()
            .await
            .map_err(map_repository_error)?
            .into_created_city()
            .ok_or_else(|| Error::internal("store did not return the created city"))?;
        info!(city_id = %city.id(), "city created");
        Ok(city)
    }

    async fn delete_city(&self, id: CityId) -> Result<(), Error> {
        let mut uow = UnitOfWork::new(self.repository.as_ref());
        if !uow.exists(id).await.map_err(map_repository_error)? {
            return Err(city_not_found(id));
        }
        uow.remove_city(id);
        let receipt = uow.commit().await.map_err(map_repository_error)?;
        info!(city_id = %id, affected = receipt.affected(), "city deleted");
        Ok(())
    }
}

#[cfg(test)]
#[path = "city_service_tests.rs"]
mod tests;
