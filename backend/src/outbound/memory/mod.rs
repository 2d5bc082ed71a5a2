//! In-memory city store.
//!
//! One [`InMemoryCityRepository`] is built at startup and shared through
//! `Arc`. Reads take the read lock and copy out what they need. A commit
//! takes the write lock, applies the whole change set to a scratch copy, and
//! swaps it in only when every change succeeded, so readers never observe a
//! partial commit.

mod seed;

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use pagination::{Page, PageRequest, paginate};
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::ports::{CityRepository, CityRepositoryError};
use crate::domain::{
    ChangeSet, City, CityDetails, CityFilter, CityId, CommitReceipt, PendingChange,
    PointOfInterest, PointOfInterestId, PointsOfInterestInclusion,
};

/// Committed store contents plus identity high-water marks.
#[derive(Debug, Clone)]
struct MemoryState {
    cities: BTreeMap<CityId, City>,
    points_of_interest: BTreeMap<PointOfInterestId, PointOfInterest>,
    next_city_id: i32,
    next_point_of_interest_id: i32,
}

impl Default for MemoryState {
    fn default() -> Self {
        Self {
            cities: BTreeMap::new(),
            points_of_interest: BTreeMap::new(),
            next_city_id: 1,
            next_point_of_interest_id: 1,
        }
    }
}

fn allocate(next: &mut i32, table: &str) -> Result<i32, CityRepositoryError> {
    let id = *next;
    *next = id
        .checked_add(1)
        .ok_or_else(|| CityRepositoryError::query(format!("{table} identifiers exhausted")))?;
    Ok(id)
}

fn stale(message: String) -> CityRepositoryError {
    CityRepositoryError::stale_change(message)
}

impl MemoryState {
    fn from_records(cities: Vec<City>, points_of_interest: Vec<PointOfInterest>) -> Self {
        let next_city_id = cities
            .iter()
            .map(|c| c.id().get())
            .max()
            .map_or(1, |max| max.saturating_add(1));
        let next_point_of_interest_id = points_of_interest
            .iter()
            .map(|p| p.id().get())
            .max()
            .map_or(1, |max| max.saturating_add(1));
        Self {
            cities: cities.into_iter().map(|c| (c.id(), c)).collect(),
            points_of_interest: points_of_interest.into_iter().map(|p| (p.id(), p)).collect(),
            next_city_id,
            next_point_of_interest_id,
        }
    }

    fn owned_by(&self, city_id: CityId) -> Vec<PointOfInterest> {
        self.points_of_interest
            .values()
            .filter(|poi| poi.city_id() == city_id)
            .cloned()
            .collect()
    }

    fn apply(
        &mut self,
        change: PendingChange,
        receipt: &mut ReceiptBuilder,
    ) -> Result<(), CityRepositoryError> {
        match change {
            PendingChange::AddCity { draft } => {
                let id = CityId::new(allocate(&mut self.next_city_id, "city")?);
                let city = City::new(id, draft);
                self.cities.insert(id, city.clone());
                receipt.affected += 1;
                receipt.cities.push(city);
            }
            PendingChange::RemoveCity { id } => {
                if self.cities.remove(&id).is_none() {
                    return Err(stale(format!("city {id} no longer exists")));
                }
                let before = self.points_of_interest.len();
                self.points_of_interest.retain(|_, poi| poi.city_id() != id);
                receipt.affected += 1 + before - self.points_of_interest.len();
            }
            PendingChange::AddPointOfInterest { city_id, draft } => {
                if !self.cities.contains_key(&city_id) {
                    return Err(stale(format!("city {city_id} no longer exists")));
                }
                let id = PointOfInterestId::new(allocate(
                    &mut self.next_point_of_interest_id,
                    "point of interest",
                )?);
                let poi = PointOfInterest::new(id, city_id, draft);
                self.points_of_interest.insert(id, poi.clone());
                receipt.affected += 1;
                receipt.points_of_interest.push(poi);
            }
            PendingChange::UpdatePointOfInterest {
                city_id,
                id,
                expected,
                replacement,
            } => {
                let entry = self
                    .points_of_interest
                    .get_mut(&id)
                    .filter(|poi| poi.city_id() == city_id && *poi.details() == expected)
                    .ok_or_else(|| stale(format!("point of interest {id} changed or was removed")))?;
                *entry = PointOfInterest::new(id, city_id, replacement);
                receipt.affected += 1;
            }
            PendingChange::RemovePointOfInterest { city_id, id } => {
                match self.points_of_interest.get(&id) {
                    Some(poi) if poi.city_id() == city_id => {
                        self.points_of_interest.remove(&id);
                        receipt.affected += 1;
                    }
                    _ => return Err(stale(format!("point of interest {id} no longer exists"))),
                }
            }
        }
        Ok(())
    }
}

#[derive(Default)]
struct ReceiptBuilder {
    affected: usize,
    cities: Vec<City>,
    points_of_interest: Vec<PointOfInterest>,
}

/// City store kept entirely in process memory.
///
/// Clones share the same backing state.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCityRepository {
    state: Arc<RwLock<MemoryState>>,
}

impl InMemoryCityRepository {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding the given records.
    ///
    /// Identity generation resumes after the highest identifier present.
    pub fn with_records(cities: Vec<City>, points_of_interest: Vec<PointOfInterest>) -> Self {
        Self {
            state: Arc::new(RwLock::new(MemoryState::from_records(
                cities,
                points_of_interest,
            ))),
        }
    }

    /// Create a store holding the three sample cities and their points of
    /// interest.
    pub fn seeded() -> Self {
        let (cities, points_of_interest) = seed::records();
        Self::with_records(cities, points_of_interest)
    }
}

#[async_trait]
impl CityRepository for InMemoryCityRepository {
    async fn city_exists(&self, id: CityId) -> Result<bool, CityRepositoryError> {
        Ok(self.state.read().await.cities.contains_key(&id))
    }

    async fn list_cities(
        &self,
        filter: &CityFilter,
        request: PageRequest,
    ) -> Result<Page<City>, CityRepositoryError> {
        let mut matches: Vec<City> = {
            let state = self.state.read().await;
            state
                .cities
                .values()
                .filter(|city| filter.matches(city))
                .cloned()
                .collect()
        };
        matches.sort_by(|a, b| a.name().cmp(b.name()).then(a.id().cmp(&b.id())));
        Ok(paginate(matches, request))
    }

    async fn find_city(
        &self,
        id: CityId,
        inclusion: PointsOfInterestInclusion,
    ) -> Result<Option<CityDetails>, CityRepositoryError> {
        let state = self.state.read().await;
        let Some(city) = state.cities.get(&id).cloned() else {
            return Ok(None);
        };
        match inclusion {
            PointsOfInterestInclusion::Exclude => Ok(Some(CityDetails::WithoutPointsOfInterest(city))),
            PointsOfInterestInclusion::Include => CityDetails::including(city, state.owned_by(id))
                .map(Some)
                .map_err(|err| CityRepositoryError::query(err.to_string())),
        }
    }

    async fn list_points_of_interest(
        &self,
        city_id: CityId,
    ) -> Result<Option<Vec<PointOfInterest>>, CityRepositoryError> {
        let state = self.state.read().await;
        Ok(state
            .cities
            .contains_key(&city_id)
            .then(|| state.owned_by(city_id)))
    }

    async fn find_point_of_interest(
        &self,
        city_id: CityId,
        id: PointOfInterestId,
    ) -> Result<Option<PointOfInterest>, CityRepositoryError> {
        let state = self.state.read().await;
        Ok(state
            .points_of_interest
            .get(&id)
            .filter(|poi| poi.city_id() == city_id)
            .cloned())
    }

    async fn commit(&self, changes: ChangeSet) -> Result<CommitReceipt, CityRepositoryError> {
        let mut state = self.state.write().await;
        let mut scratch = state.clone();
        let mut receipt = ReceiptBuilder::default();
        for change in changes {
            scratch.apply(change, &mut receipt)?;
        }
        *state = scratch;
        debug!(affected = receipt.affected, "in-memory commit applied");
        Ok(CommitReceipt::new(
            receipt.affected,
            receipt.cities,
            receipt.points_of_interest,
        ))
    }
}
