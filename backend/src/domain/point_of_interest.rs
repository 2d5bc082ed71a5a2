//! Point of interest entity and its update-shaped projection.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::CityId;
use crate::domain::validation::{ValidationErrors, Validator};

/// Store-assigned identifier of a point of interest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PointOfInterestId(i32);

impl PointOfInterestId {
    /// Wrap a raw identifier.
    pub const fn new(raw: i32) -> Self {
        Self(raw)
    }

    /// Raw integer value.
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for PointOfInterestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validated, identity-free values of a point of interest.
///
/// This is both the creation payload and the update-shaped projection that
/// full replacement and patch operate on. Identity and the owning city are
/// not part of it, so neither can be changed through an update.
///
/// ## Invariants
/// - `name` is non-blank and at most [`NAME_MAX`](crate::domain::NAME_MAX)
///   characters.
/// - `description` is at most
///   [`DESCRIPTION_MAX`](crate::domain::DESCRIPTION_MAX) characters and
///   defaults to the empty string.
///
/// # Examples
/// ```
/// use cityinfo::domain::PointOfInterestDraft;
///
/// let draft = PointOfInterestDraft::try_new("Central Park", None).unwrap();
/// assert_eq!(draft.description(), "");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointOfInterestDraft {
    name: String,
    description: String,
}

impl PointOfInterestDraft {
    /// Validate raw values, collecting every violation.
    pub fn try_new(
        name: impl Into<String>,
        description: Option<String>,
    ) -> Result<Self, ValidationErrors> {
        Self::try_from_parts(Some(name.into()), description)
    }

    /// Validate values that may lack a name, as produced by a patch.
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
            description: description.unwrap_or_default(),
        })
    }

    /// Display name.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Free-text description; empty when none was given.
    pub fn description(&self) -> &str {
        self.description.as_str()
    }
}

/// A named location belonging to exactly one city.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointOfInterest {
    id: PointOfInterestId,
    city_id: CityId,
    details: PointOfInterestDraft,
}

impl PointOfInterest {
    /// Assemble a persisted point of interest.
    pub fn new(id: PointOfInterestId, city_id: CityId, details: PointOfInterestDraft) -> Self {
        Self {
            id,
            city_id,
            details,
        }
    }

    /// Store-assigned identifier.
    pub fn id(&self) -> PointOfInterestId {
        self.id
    }

    /// Owning city.
    pub fn city_id(&self) -> CityId {
        self.city_id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        self.details.name()
    }

    /// Description; empty when none was given.
    pub fn description(&self) -> &str {
        self.details.description()
    }

    /// Update-shaped projection of the current values.
    pub fn details(&self) -> &PointOfInterestDraft {
        &self.details
    }

    /// Replace the mutable values, keeping identity and owner.
    pub fn with_details(self, details: PointOfInterestDraft) -> Self {
        Self { details, ..self }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::{DESCRIPTION_MAX, FieldViolation, NAME_MAX};
    use rstest::rstest;

    #[rstest]
    fn missing_description_defaults_to_empty() {
        let draft = PointOfInterestDraft::try_new("Eiffel Tower", None).expect("valid draft");
        assert_eq!(draft.name(), "Eiffel Tower");
        assert_eq!(draft.description(), "");
    }

    #[rstest]
    fn missing_name_is_reported() {
        let errors =
            PointOfInterestDraft::try_from_parts(None, Some("x".to_owned())).expect_err("no name");
        assert_eq!(errors.violations(), &[FieldViolation::NameMissing]);
    }

    #[rstest]
    fn oversized_fields_are_both_reported() {
        let errors = PointOfInterestDraft::try_new(
            "n".repeat(NAME_MAX + 1),
            Some("d".repeat(DESCRIPTION_MAX + 1)),
        )
        .expect_err("both too long");
        assert_eq!(errors.violations().len(), 2);
    }

    #[rstest]
    fn with_details_keeps_identity_and_owner() {
        let original = PointOfInterest::new(
            PointOfInterestId::new(7),
            CityId::new(3),
            PointOfInterestDraft::try_new("The Louvre", None).expect("valid draft"),
        );
        let updated = original.with_details(
            PointOfInterestDraft::try_new("Louvre Museum", Some("Art".to_owned()))
                .expect("valid draft"),
        );
        assert_eq!(updated.id(), PointOfInterestId::new(7));
        assert_eq!(updated.city_id(), CityId::new(3));
        assert_eq!(updated.name(), "Louvre Museum");
        assert_eq!(updated.description(), "Art");
    }
}
