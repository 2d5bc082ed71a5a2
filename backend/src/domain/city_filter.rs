//! Optional name and free-text restrictions over the city collection.
//!
//! A [`CityFilter`] is a value, not a closure, so each store can translate it
//! into its own deferred predicate: an iterator `filter` in memory, a SQL
//! `WHERE` clause in PostgreSQL.

use crate::domain::City;

/// Normalized filter parameters for listing cities.
///
/// ## Invariants
/// - Both values are trimmed.
/// - Empty or whitespace-only inputs are stored as `None`, meaning "no
///   restriction".
///
/// # Examples
/// ```
/// use cityinfo::domain::CityFilter;
///
/// let filter = CityFilter::new(Some("  Antwerp "), Some("   "));
/// assert_eq!(filter.name(), Some("Antwerp"));
/// assert!(filter.search_query().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CityFilter {
    name: Option<String>,
    search_query: Option<String>,
}

fn normalize(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|trimmed| !trimmed.is_empty())
        .map(str::to_owned)
}

impl CityFilter {
    /// Build a filter from raw query parameters.
    pub fn new(name: Option<&str>, search_query: Option<&str>) -> Self {
        Self {
            name: normalize(name),
            search_query: normalize(search_query),
        }
    }

    /// Exact, case-sensitive name to match.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Case-sensitive substring matched against name or description.
    pub fn search_query(&self) -> Option<&str> {
        self.search_query.as_deref()
    }

    /// Whether the filter restricts nothing.
    pub fn is_unrestricted(&self) -> bool {
        self.name.is_none() && self.search_query.is_none()
    }

    /// Evaluate the filter against one city.
    ///
    /// Both restrictions combine with logical AND. A city without a
    /// description only matches a search through its name.
    pub fn matches(&self, city: &City) -> bool {
        let name_matches = self.name().is_none_or(|name| city.name() == name);
        let search_matches = self.search_query().is_none_or(|query| {
            city.name().contains(query) || city.description().is_some_and(|d| d.contains(query))
        });
        name_matches && search_matches
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::{CityDraft, CityId};
    use rstest::{fixture, rstest};

    #[fixture]
    fn cities() -> Vec<City> {
        [
            (1, "New York City", Some("The one with that big park.")),
            (2, "Antwerp", Some("The one with the cathedral that was never really finished.")),
            (3, "Paris", Some("The one with that big tower.")),
            (4, "Ghent", None),
        ]
        .into_iter()
        .map(|(id, name, description)| {
            City::new(
                CityId::new(id),
                CityDraft::try_new(name, description.map(str::to_owned)).expect("valid city"),
            )
        })
        .collect()
    }

    fn names(filter: &CityFilter, cities: &[City]) -> Vec<String> {
        cities
            .iter()
            .filter(|city| filter.matches(city))
            .map(|city| city.name().to_owned())
            .collect()
    }

    #[rstest]
    #[case(None, None)]
    #[case(Some(""), Some("  "))]
    #[case(Some("\t"), None)]
    fn blank_parameters_mean_no_filter(
        #[case] name: Option<&str>,
        #[case] search: Option<&str>,
        cities: Vec<City>,
    ) {
        let filter = CityFilter::new(name, search);
        assert!(filter.is_unrestricted());
        assert_eq!(names(&filter, &cities).len(), cities.len());
    }

    #[rstest]
    fn name_is_exact_and_case_sensitive(cities: Vec<City>) {
        assert_eq!(
            names(&CityFilter::new(Some(" Antwerp "), None), &cities),
            vec!["Antwerp"]
        );
        assert!(names(&CityFilter::new(Some("antwerp"), None), &cities).is_empty());
        assert!(names(&CityFilter::new(Some("Antw"), None), &cities).is_empty());
    }

    #[rstest]
    fn search_matches_name_or_description(cities: Vec<City>) {
        assert_eq!(
            names(&CityFilter::new(None, Some("big")), &cities),
            vec!["New York City", "Paris"]
        );
        assert_eq!(
            names(&CityFilter::new(None, Some("Ghe")), &cities),
            vec!["Ghent"]
        );
    }

    #[rstest]
    fn restrictions_combine_with_and(cities: Vec<City>) {
        assert_eq!(
            names(&CityFilter::new(Some("Paris"), Some("tower")), &cities),
            vec!["Paris"]
        );
        assert!(names(&CityFilter::new(Some("Paris"), Some("park")), &cities).is_empty());
    }

    #[rstest]
    fn filtered_results_are_a_subset_and_idempotent(cities: Vec<City>) {
        let filter = CityFilter::new(None, Some("The one"));
        let once: Vec<City> = cities
            .iter()
            .filter(|c| filter.matches(c))
            .cloned()
            .collect();
        let twice: Vec<City> = once.iter().filter(|c| filter.matches(c)).cloned().collect();
        assert!(once.iter().all(|c| cities.contains(c)));
        assert_eq!(once, twice);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn city_strategy() -> impl Strategy<Value = City> {
            ("[A-Ca-c]{1,6}", proptest::option::of("[a-c ]{0,12}")).prop_map(
                |(name, description)| {
                    City::new(
                        CityId::new(1),
                        CityDraft::try_new(name, description).expect("generated city is valid"),
                    )
                },
            )
        }

        proptest! {
            #[test]
            fn filtering_never_adds_and_is_stable(
                cities in proptest::collection::vec(city_strategy(), 0..16),
                name in proptest::option::of("[A-Ca-c]{1,3}"),
                search in proptest::option::of("[a-c]{1,2}"),
            ) {
                let filter = CityFilter::new(name.as_deref(), search.as_deref());
                let once: Vec<City> = cities.iter().filter(|c| filter.matches(c)).cloned().collect();
                let twice: Vec<City> = once.iter().filter(|c| filter.matches(c)).cloned().collect();
                prop_assert!(once.len() <= cities.len());
                prop_assert!(once.iter().all(|c| cities.contains(c)));
                prop_assert_eq!(once, twice);
            }
        }
    }
}
