//! Staged, all-or-nothing mutations against the city store.
//!
//! A [`UnitOfWork`] records intended changes in memory. Nothing is visible to
//! other readers until [`UnitOfWork::commit`] hands the whole [`ChangeSet`] to
//! the store, which applies every change or none. Dropping an uncommitted
//! unit of work discards it.

use crate::domain::ports::{CityRepository, CityRepositoryError};
use crate::domain::{City, CityDraft, CityId, PointOfInterest, PointOfInterestDraft, PointOfInterestId};

/// One staged mutation.
///
/// Updates and removals carry enough of what the caller read for the store
/// to detect that the target changed in the meantime; such a change fails
/// the commit with [`CityRepositoryError::StaleChange`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingChange {
    /// Create a city.
    AddCity { draft: CityDraft },
    /// Delete a city together with every point of interest it owns.
    RemoveCity { id: CityId },
    /// Create a point of interest owned by `city_id`.
    AddPointOfInterest {
        city_id: CityId,
        draft: PointOfInterestDraft,
    },
    /// Replace the values of a point of interest if they still equal
    /// `expected`.
    UpdatePointOfInterest {
        city_id: CityId,
        id: PointOfInterestId,
        expected: PointOfInterestDraft,
        replacement: PointOfInterestDraft,
    },
    /// Delete a point of interest.
    RemovePointOfInterest {
        city_id: CityId,
        id: PointOfInterestId,
    },
}

/// Ordered batch of staged changes handed to the store on commit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet(Vec<PendingChange>);

impl ChangeSet {
    /// Build a change set from already ordered changes.
    pub fn new(changes: Vec<PendingChange>) -> Self {
        Self(changes)
    }

    /// Staged changes in the order they will be applied.
    pub fn changes(&self) -> &[PendingChange] {
        &self.0
    }
}

impl IntoIterator for ChangeSet {
    type Item = PendingChange;
    type IntoIter = std::vec::IntoIter<PendingChange>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// What a successful commit did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitReceipt {
    affected: usize,
    cities: Vec<City>,
    points_of_interest: Vec<PointOfInterest>,
}

impl CommitReceipt {
    /// Assemble a receipt. `affected` counts every row written or deleted,
    /// including cascaded deletions.
    pub fn new(
        affected: usize,
        cities: Vec<City>,
        points_of_interest: Vec<PointOfInterest>,
    ) -> Self {
        Self {
            affected,
            cities,
            points_of_interest,
        }
    }

    /// Rows written or deleted, cascades included.
    pub fn affected(&self) -> usize {
        self.affected
    }

    /// Consume the receipt, yielding the first created point of interest.
    pub fn into_created_point_of_interest(self) -> Option<PointOfInterest> {
        self.points_of_interest.into_iter().next()
    }

    /// Consume the receipt, yielding the first created city.
    pub fn into_created_city(self) -> Option<City> {
        self.cities.into_iter().next()
    }
}

/// Result of staging a child creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// The change was staged.
    Staged,
    /// The parent city does not exist; nothing was staged.
    CityMissing,
}

/// Per-request mutation coordinator over a shared store.
///
/// # Examples
/// ```no_run
/// use cityinfo::domain::{CityId, PointOfInterestDraft, UnitOfWork};
/// use cityinfo::outbound::memory::InMemoryCityRepository;
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let store = InMemoryCityRepository::seeded();
/// let mut uow = UnitOfWork::new(&store);
/// uow.add_point_of_interest(CityId::new(1), PointOfInterestDraft::try_new("High Line", None)?)
///     .await?;
/// let receipt = uow.commit().await?;
/// assert_eq!(receipt.affected(), 1);
/// # Ok(())
/// # }
/// ```
#[must_use = "staged changes are discarded unless committed"]
pub struct UnitOfWork<'a, R: CityRepository + ?Sized> {
    repository: &'a R,
    changes: Vec<PendingChange>,
}

impl<'a, R: CityRepository + ?Sized> UnitOfWork<'a, R> {
    /// Start an empty unit of work.
    pub fn new(repository: &'a R) -> Self {
        Self {
            repository,
            changes: Vec::new(),
        }
    }

    /// Whether the city currently exists in committed state.
    pub async fn exists(&self, city_id: CityId) -> Result<bool, CityRepositoryError> {
        self.repository.city_exists(city_id).await
    }

    /// Stage a new point of interest under `city_id`.
    ///
    /// A missing city is not an error here; the caller decides how to
    /// surface [`AddOutcome::CityMissing`].
    pub async fn add_point_of_interest(
        &mut self,
        city_id: CityId,
        draft: PointOfInterestDraft,
    ) -> Result<AddOutcome, CityRepositoryError> {
        if !self.exists(city_id).await? {
            return Ok(AddOutcome::CityMissing);
        }
        self.changes
            .push(PendingChange::AddPointOfInterest { city_id, draft });
        Ok(AddOutcome::Staged)
    }

    /// Stage replacing the values of `current` with `replacement`.
    pub fn update_point_of_interest(
        &mut self,
        current: &PointOfInterest,
        replacement: PointOfInterestDraft,
    ) {
        self.changes.push(PendingChange::UpdatePointOfInterest {
            city_id: current.city_id(),
            id: current.id(),
            expected: current.details().clone(),
            replacement,
        });
    }

    /// Stage deleting `point_of_interest`.
    pub fn remove_point_of_interest(&mut self, point_of_interest: &PointOfInterest) {
        self.changes.push(PendingChange::RemovePointOfInterest {
            city_id: point_of_interest.city_id(),
            id: point_of_interest.id(),
        });
    }

    /// Stage creating a city.
    pub fn add_city(&mut self, draft: CityDraft) {
        self.changes.push(PendingChange::AddCity { draft });
    }

    /// Stage deleting a city and, by cascade, its points of interest.
    pub fn remove_city(&mut self, id: CityId) {
        self.changes.push(PendingChange::RemoveCity { id });
    }

    /// Whether nothing has been staged yet.
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Apply every staged change atomically.
    ///
    /// An empty unit of work succeeds without touching the store.
    pub async fn commit(self) -> Result<CommitReceipt, CityRepositoryError> {
        if self.is_empty() {
            return Ok(CommitReceipt::default());
        }
        self.repository.commit(ChangeSet::new(self.changes)).await
    }
}

#[cfg(test)]
#[path = "unit_of_work_tests.rs"]
mod tests;
