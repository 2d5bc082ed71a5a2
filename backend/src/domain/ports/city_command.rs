//! Driving port for city mutations.

use async_trait::async_trait;

use crate::domain::{City, CityDraft, CityId, Error};

/// Driving port for creating and deleting cities.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CityCommand: Send + Sync {
    /// Persist a new city and return it with its assigned identifier.
    async fn create_city(&self, draft: CityDraft) -> Result<City, Error>;

    /// Delete a city and every point of interest it owns.
    async fn delete_city(&self, id: CityId) -> Result<(), Error>;
}
