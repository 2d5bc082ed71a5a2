//! City aggregate root and its read shapes.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::PointOfInterest;
use crate::domain::validation::{ValidationErrors, Validator};

/// Store-assigned identifier of a city.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CityId(i32);

impl CityId {
    /// Wrap a raw identifier.
    pub const fn new(raw: i32) -> Self {
        Self(raw)
    }

    /// Raw integer value.
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for CityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validated values for creating a city.
///
/// ## Invariants
/// - `name` is non-blank and at most [`NAME_MAX`](crate::domain::NAME_MAX)
///   characters.
/// - `description`, when present, is at most
///   [`DESCRIPTION_MAX`](crate::domain::DESCRIPTION_MAX) characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityDraft {
    name: String,
    description: Option<String>,
}

impl CityDraft {
    /// Validate raw values, collecting every violation.
    pub fn try_new(
        name: impl Into<String>,
        description: Option<String>,
    ) -> Result<Self, ValidationErrors> {
        Self::try_from_parts(Some(name.into()), description)
    }

    /// Validate values that may lack a name, as read from a request body.
    pub fn try_from_parts(
        name: Option<String>,
        description: Option<String>,
    ) -> Result<Self, ValidationErrors> {
        Validator::default()
            .name(name.as_deref())
            .description(description.as_deref())
            .finish()?;
        Ok(Self {
            name: name.unwrap_or_default(),
            description,
        })
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// A city without its points of interest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct City {
    id: CityId,
    draft: CityDraft,
}

impl City {
    /// Assemble a persisted city.
    pub fn new(id: CityId, draft: CityDraft) -> Self {
        Self { id, draft }
    }

    pub fn id(&self) -> CityId {
        self.id
    }

    pub fn name(&self) -> &str {
        self.draft.name()
    }

    pub fn description(&self) -> Option<&str> {
        self.draft.description()
    }
}

/// Whether a city read should load its points of interest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointsOfInterestInclusion {
    /// Load the owned collection.
    Include,
    /// Return the city alone.
    #[default]
    Exclude,
}

impl From<bool> for PointsOfInterestInclusion {
    fn from(include: bool) -> Self {
        if include { Self::Include } else { Self::Exclude }
    }
}

/// Raised when a point of interest is attached to a city it does not
/// belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("point of interest {point_of_interest} belongs to city {owner}, not {city}")]
pub struct ForeignPointOfInterest {
    pub city: CityId,
    pub owner: CityId,
    pub point_of_interest: crate::domain::PointOfInterestId,
}

/// A city read in one of its two output shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CityDetails {
    /// The city alone.
    WithoutPointsOfInterest(City),
    /// The city with its owned collection, ordered by identifier.
    WithPointsOfInterest {
        city: City,
        points_of_interest: Vec<PointOfInterest>,
    },
}

impl CityDetails {
    /// Attach the owned collection, rejecting any foreign entry.
    ///
    /// # Examples
    /// ```
    /// use cityinfo::domain::{City, CityDetails, CityDraft, CityId};
    ///
    /// let city = City::new(CityId::new(1), CityDraft::try_new("Paris", None).unwrap());
    /// let details = CityDetails::including(city, Vec::new()).unwrap();
    /// assert_eq!(details.number_of_points_of_interest(), Some(0));
    /// ```
    pub fn including(
        city: City,
        mut points_of_interest: Vec<PointOfInterest>,
    ) -> Result<Self, ForeignPointOfInterest> {
        if let Some(foreign) = points_of_interest
            .iter()
            .find(|poi| poi.city_id() != city.id())
        {
            return Err(ForeignPointOfInterest {
                city: city.id(),
                owner: foreign.city_id(),
                point_of_interest: foreign.id(),
            });
        }
        points_of_interest.sort_by_key(PointOfInterest::id);
        Ok(Self::WithPointsOfInterest {
            city,
            points_of_interest,
        })
    }

    pub fn city(&self) -> &City {
        match self {
            Self::WithoutPointsOfInterest(city) | Self::WithPointsOfInterest { city, .. } => city,
        }
    }

    /// The owned collection when it was loaded.
    pub fn points_of_interest(&self) -> Option<&[PointOfInterest]> {
        match self {
            Self::WithoutPointsOfInterest(_) => None,
            Self::WithPointsOfInterest {
                points_of_interest, ..
            } => Some(points_of_interest),
        }
    }

    pub fn number_of_points_of_interest(&self) -> Option<usize> {
        self.points_of_interest().map(<[PointOfInterest]>::len)
    }
}
