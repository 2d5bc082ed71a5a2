//! Point of interest domain service.
//!
//! Every operation resolves the owning city first, so a missing city and a
//! point of interest filed under another city are both `not_found`. Updates
//! are staged against the values read at the start of the call; the store
//! rejects the commit when those values changed in the meantime.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::city_service::{city_not_found, map_repository_error};
use crate::domain::ports::{
    CityRepository, NotificationSender, PointOfInterestCommand, PointOfInterestQuery,
};
use crate::domain::{
    AddOutcome, CityId, Error, PointOfInterest, PointOfInterestDraft, PointOfInterestId,
    UnitOfWork, apply_patch,
};

/// Subject of the notification sent after a deletion.
pub const DELETION_SUBJECT: &str = "Point of interest deleted";

fn point_of_interest_not_found(city_id: CityId, id: PointOfInterestId) -> Error {
    Error::not_found(format!("point of interest {id} not found in city {city_id}"))
}

/// Point of interest service implementing the query and command ports.
pub struct PointOfInterestService<R: ?Sized, N: ?Sized> {
    repository: Arc<R>,
    notifier: Arc<N>,
}

impl<R: ?Sized, N: ?Sized> PointOfInterestService<R, N> {
    /// Create a service over a shared store and notification sender.
    pub fn new(repository: Arc<R>, notifier: Arc<N>) -> Self {
        Self {
            repository,
            notifier,
        }
    }
}

impl<R: ?Sized, N: ?Sized> Clone for PointOfInterestService<R, N> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            notifier: Arc::clone(&self.notifier),
        }
    }
}

impl<R, N> PointOfInterestService<R, N>
where
    R: CityRepository + ?Sized,
    N: NotificationSender + ?Sized,
{
    async fn load(&self, city_id: CityId, id: PointOfInterestId) -> Result<PointOfInterest, Error> {
        if !self
            .repository
            .city_exists(city_id)
            .await
            .map_err(map_repository_error)?
        {
            return Err(city_not_found(city_id));
        }
        self.repository
            .find_point_of_interest(city_id, id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| point_of_interest_not_found(city_id, id))
    }

    async fn stage_update(
        &self,
        current: &PointOfInterest,
        replacement: PointOfInterestDraft,
    ) -> Result<(), Error> {
        let mut uow = UnitOfWork::new(self.repository.as_ref());
        uow.update_point_of_interest(current, replacement);
        uow.commit().await.map_err(map_repository_error)?;
        Ok(())
    }

    async fn notify_deleted(&self, deleted: &PointOfInterest) {
        let message = format!(
            "Point of interest {} with id {} was deleted",
            deleted.name(),
            deleted.id()
        );
        if let Err(err) = self.notifier.send(DELETION_SUBJECT, &message).await {
            warn!(
                error = %err,
                point_of_interest_id = %deleted.id(),
                "deletion notification failed"
            );
        }
    }
}

#[async_trait]
impl<R, N> PointOfInterestQuery for PointOfInterestService<R, N>
where
    R: CityRepository + ?Sized,
    N: NotificationSender + ?Sized,
{
    async fn list_points_of_interest(
        &self,
        city_id: CityId,
    ) -> Result<Vec<PointOfInterest>, Error> {
        self.repository
            .list_points_of_interest(city_id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| city_not_found(city_id))
    }

    async fn get_point_of_interest(
        &self,
        city_id: CityId,
        id: PointOfInterestId,
    ) -> Result<PointOfInterest, Error> {
        self.load(city_id, id).await
    }
}

#[async_trait]
impl<R, N> PointOfInterestCommand for PointOfInterestService<R, N>
where
    R: CityRepository + ?Sized,
    N: NotificationSender + ?Sized,
{
    async fn create_point_of_interest(
        &self,
        city_id: CityId,
        draft: PointOfInterestDraft,
    ) -> Result<PointOfInterest, Error> {
        let mut uow = UnitOfWork::new(self.repository.as_ref());
        match uow
            .add_point_of_interest(city_id, draft)
            .await
            .map_err(map_repository_error)?
        {
            AddOutcome::Staged => {}
            AddOutcome::CityMissing => return Err(city_not_found(city_id)),
        }
        let created = uow
            .commit()
            .await
            .map_err(map_repository_error)?
            .into_created_point_of_interest()
            .ok_or_else(|| Error::internal("store did not return the created point of interest"))?;
        info!(
            city_id = %city_id,
            point_of_interest_id = %created.id(),
            "point of interest created"
        );
        Ok(created)
    }

    async fn replace_point_of_interest(
        &self,
        city_id: CityId,
        id: PointOfInterestId,
        replacement: PointOfInterestDraft,
    ) -> Result<(), Error> {
        let current = self.load(city_id, id).await?;
        self.stage_update(&current, replacement).await
    }

    async fn patch_point_of_interest(
        &self,
        city_id: CityId,
        id: PointOfInterestId,
        patch: &json_patch::Patch,
    ) -> Result<PointOfInterest, Error> {
        let current = self.load(city_id, id).await?;
        let replacement = apply_patch(patch, current.details())?;
        self.stage_update(&current, replacement.clone()).await?;
        Ok(current.with_details(replacement))
    }

    async fn delete_point_of_interest(
        &self,
        city_id: CityId,
        id: PointOfInterestId,
    ) -> Result<(), Error> {
        let current = self.load(city_id, id).await?;
        let mut uow = UnitOfWork::new(self.repository.as_ref());
        uow.remove_point_of_interest(&current);
        uow.commit().await.map_err(map_repository_error)?;
        info!(city_id = %city_id, point_of_interest_id = %id, "point of interest deleted");
        self.notify_deleted(&current).await;
        Ok(())
    }
}

#[cfg(test)]
#[path = "point_of_interest_service_tests.rs"]
mod tests;
