//! Driving port for point of interest mutations.
//!
//! Every operation resolves the city first and reports a missing city or a
//! point of interest outside it as `not_found`.

use async_trait::async_trait;

use crate::domain::{CityId, Error, PointOfInterest, PointOfInterestDraft, PointOfInterestId};

/// Driving port for creating, updating, and deleting points of interest.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PointOfInterestCommand: Send + Sync {
    /// Create a point of interest under `city_id`.
    async fn create_point_of_interest(
        &self,
        city_id: CityId,
        draft: PointOfInterestDraft,
    ) -> Result<PointOfInterest, Error>;

    /// Replace every mutable value of a point of interest.
    async fn replace_point_of_interest(
        &self,
        city_id: CityId,
        id: PointOfInterestId,
        replacement: PointOfInterestDraft,
    ) -> Result<(), Error>;

    /// Apply a JSON Patch document to a point of interest.
    ///
    /// Structural and semantic rejections are `invalid_request`; a concurrent
    /// change between read and commit is `conflict`.
    async fn patch_point_of_interest(
        &self,
        city_id: CityId,
        id: PointOfInterestId,
        patch: &json_patch::Patch,
    ) -> Result<PointOfInterest, Error>;

    /// Delete a point of interest and notify about it.
    async fn delete_point_of_interest(
        &self,
        city_id: CityId,
        id: PointOfInterestId,
    ) -> Result<(), Error>;
}
