//! Sample cities loaded by [`super::InMemoryCityRepository::seeded`].
//!
//! Mirrors the rows inserted by the initial database migration.

use crate::domain::{
    City, CityDraft, CityId, PointOfInterest, PointOfInterestDraft, PointOfInterestId,
};

const CITIES: [(i32, &str, &str); 3] = [
    (1, "New York City", "The one with the big park."),
    (
        2,
        "Antwerp",
        "The one with the cathedral that was never really finished.",
    ),
    (3, "Paris", "The one with the big tower."),
];

const POINTS_OF_INTEREST: [(i32, i32, &str, &str); 6] = [
    (
        1,
        1,
        "Central Park",
        "The most visited urban park in the United States.",
    ),
    (
        2,
        1,
        "Empire State Building",
        "A 102-story skyscraper located in Midtown Manhattan.",
    ),
    (
        3,
        2,
        "Cathedral of Our Lady",
        "A Gothic style cathedral, conceived by architects Jan and Pieter Appelmans.",
    ),
    (
        4,
        2,
        "Antwerp Central Station",
        "The finest example of railway architecture in Belgium.",
    ),
    (
        5,
        3,
        "Eiffel Tower",
        "A wrought iron lattice tower on the Champ de Mars, named after engineer Gustave Eiffel.",
    ),
    (6, 3, "The Louvre", "The world's largest museum."),
];

/// Seed rows; entries failing validation are skipped.
pub(super) fn records() -> (Vec<City>, Vec<PointOfInterest>) {
    let cities = CITIES
        .iter()
        .filter_map(|&(id, name, description)| {
            CityDraft::try_new(name, Some(description.to_owned()))
                .ok()
                .map(|draft| City::new(CityId::new(id), draft))
        })
        .collect();
    let points_of_interest = POINTS_OF_INTEREST
        .iter()
        .filter_map(|&(id, city_id, name, description)| {
            PointOfInterestDraft::try_new(name, Some(description.to_owned()))
                .ok()
                .map(|draft| {
                    PointOfInterest::new(PointOfInterestId::new(id), CityId::new(city_id), draft)
                })
        })
        .collect();
    (cities, points_of_interest)
}
