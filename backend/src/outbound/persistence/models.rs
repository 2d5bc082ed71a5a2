//! Internal Diesel row structs.
//!
//! These types never leave the persistence layer. Conversions into domain
//! types re-run domain validation so a hand-edited row cannot smuggle an
//! invalid value past the model.

use diesel::prelude::*;

use crate::domain::{
    City, CityDraft, CityId, PointOfInterest, PointOfInterestDraft, PointOfInterestId,
    ValidationErrors,
};

use super::schema::{cities, points_of_interest};

/// Row read from `cities`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = cities)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CityRow {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
}

impl TryFrom<CityRow> for City {
    type Error = ValidationErrors;

    fn try_from(row: CityRow) -> Result<Self, Self::Error> {
        let draft = CityDraft::try_new(row.name, row.description)?;
        Ok(City::new(CityId::new(row.id), draft))
    }
}

/// Insertable city.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = cities)]
pub(crate) struct NewCityRow<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
}

impl<'a> From<&'a CityDraft> for NewCityRow<'a> {
    fn from(draft: &'a CityDraft) -> Self {
        Self {
            name: draft.name(),
            description: draft.description(),
        }
    }
}

/// Row read from `points_of_interest`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = points_of_interest)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PointOfInterestRow {
    pub id: i32,
    pub city_id: i32,
    pub name: String,
    pub description: String,
}

impl TryFrom<PointOfInterestRow> for PointOfInterest {
    type Error = ValidationErrors;

    fn try_from(row: PointOfInterestRow) -> Result<Self, Self::Error> {
        let draft = PointOfInterestDraft::try_new(row.name, Some(row.description))?;
        Ok(PointOfInterest::new(
            PointOfInterestId::new(row.id),
            CityId::new(row.city_id),
            draft,
        ))
    }
}

/// Insertable point of interest.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = points_of_interest)]
pub(crate) struct NewPointOfInterestRow<'a> {
    pub city_id: i32,
    pub name: &'a str,
    pub description: &'a str,
}

/// Changeset replacing the mutable values of a point of interest.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = points_of_interest)]
pub(crate) struct PointOfInterestUpdate<'a> {
    pub name: &'a str,
    pub description: &'a str,
}

impl<'a> From<&'a PointOfInterestDraft> for PointOfInterestUpdate<'a> {
    fn from(draft: &'a PointOfInterestDraft) -> Self {
        Self {
            name: draft.name(),
            description: draft.description(),
        }
    }
}
