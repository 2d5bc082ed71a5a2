//! Wire representations for cities and points of interest.
//!
//! Field names are camelCase. Domain types stay free of serde derives for the
//! HTTP shape; conversions live here.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    City, CityDetails, CityDraft, PointOfInterest, PointOfInterestDraft, ValidationErrors,
};

/// Point of interest as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PointOfInterestDto {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Central Park")]
    pub name: String,
    #[schema(example = "The most visited urban park in the United States.")]
    pub description: String,
}

impl From<PointOfInterest> for PointOfInterestDto {
    fn from(value: PointOfInterest) -> Self {
        Self {
            id: value.id().get(),
            name: value.name().to_owned(),
            description: value.description().to_owned(),
        }
    }
}

/// City without its points of interest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CityWithoutPointsOfInterestDto {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "New York City")]
    pub name: String,
    #[schema(example = "The one with the big park.")]
    pub description: Option<String>,
}

impl From<City> for CityWithoutPointsOfInterestDto {
    fn from(value: City) -> Self {
        Self {
            id: value.id().get(),
            name: value.name().to_owned(),
            description: value.description().map(str::to_owned),
        }
    }
}

/// City with its points of interest and their count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CityDto {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub number_of_points_of_interest: usize,
    pub points_of_interest: Vec<PointOfInterestDto>,
}

/// Either output shape of a single-city read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(untagged)]
pub enum CityResponse {
    WithPointsOfInterest(CityDto),
    WithoutPointsOfInterest(CityWithoutPointsOfInterestDto),
}

impl From<CityDetails> for CityResponse {
    fn from(value: CityDetails) -> Self {
        match value {
            CityDetails::WithoutPointsOfInterest(city) => {
                Self::WithoutPointsOfInterest(city.into())
            }
            CityDetails::WithPointsOfInterest {
                city,
                points_of_interest,
            } => {
                let points_of_interest: Vec<PointOfInterestDto> =
                    points_of_interest.into_iter().map(Into::into).collect();
                let CityWithoutPointsOfInterestDto {
                    id,
                    name,
                    description,
                } = city.into();
                Self::WithPointsOfInterest(CityDto {
                    id,
                    name,
                    description,
                    number_of_points_of_interest: points_of_interest.len(),
                    points_of_interest,
                })
            }
        }
    }
}

/// Request body for creating a city.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CityForCreationDto {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl TryFrom<CityForCreationDto> for CityDraft {
    type Error = ValidationErrors;

    fn try_from(value: CityForCreationDto) -> Result<Self, Self::Error> {
        CityDraft::try_from_parts(value.name, value.description)
    }
}

/// Request body for creating a point of interest. Carries no identifier.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PointOfInterestForCreationDto {
    #[serde(default)]
    #[schema(example = "Grote Markt")]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl TryFrom<PointOfInterestForCreationDto> for PointOfInterestDraft {
    type Error = ValidationErrors;

    fn try_from(value: PointOfInterestForCreationDto) -> Result<Self, Self::Error> {
        PointOfInterestDraft::try_from_parts(value.name, value.description)
    }
}

/// Request body for fully replacing a point of interest. Carries neither an
/// identifier nor the owning city.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PointOfInterestForUpdateDto {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl TryFrom<PointOfInterestForUpdateDto> for PointOfInterestDraft {
    type Error = ValidationErrors;

    fn try_from(value: PointOfInterestForUpdateDto) -> Result<Self, Self::Error> {
        PointOfInterestDraft::try_from_parts(value.name, value.description)
    }
}
