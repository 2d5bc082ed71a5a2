//! Tests for the city service.

use std::sync::Arc;

use pagination::{PageRequest, PaginationMetadata};
use rstest::rstest;

use super::*;
use crate::domain::ports::MockCityRepository;
use crate::domain::{CityFilter, CommitReceipt, ErrorCode, PendingChange};

fn city(id: i32, name: &str) -> City {
    City::new(
        CityId::new(id),
        CityDraft::try_new(name, None).expect("valid city"),
    )
}

#[rstest]
#[tokio::test]
async fn list_forwards_filter_and_page() {
    let mut repo = MockCityRepository::new();
    repo.expect_list_cities()
        .withf(|filter, page| filter.name() == Some("Antwerp") && page.page_number() == 2)
        .times(1)
        .returning(|_, page| {
            Ok(Page::new(
                vec![city(2, "Antwerp")],
                PaginationMetadata::new(11, page),
            ))
        });

    let service = CityService::new(Arc::new(repo));
    let page = service
        .list_cities(ListCitiesRequest {
            filter: CityFilter::new(Some("Antwerp"), None),
            page: PageRequest::new(2, 10).expect("valid page"),
        })
        .await
        .expect("listing succeeds");

    assert_eq!(page.items().len(), 1);
    assert_eq!(page.metadata().total_pages(), 2);
}

#[rstest]
#[tokio::test]
async fn get_missing_city_is_not_found() {
    let mut repo = MockCityRepository::new();
    repo.expect_find_city().returning(|_, _| Ok(None));

    let service = CityService::new(Arc::new(repo));
    let err = service
        .get_city(CityId::new(42), PointsOfInterestInclusion::Include)
        .await
        .expect_err("missing city");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[case(CityRepositoryError::connection("refused"), ErrorCode::ServiceUnavailable)]
#[case(CityRepositoryError::query("bad sql"), ErrorCode::InternalError)]
#[case(CityRepositoryError::stale_change("gone"), ErrorCode::Conflict)]
#[tokio::test]
async fn repository_errors_map_to_codes(
    #[case] failure: CityRepositoryError,
    #[case] expected: ErrorCode,
) {
    let mut repo = MockCityRepository::new();
    repo.expect_find_city()
        .return_once(move |_, _| Err(failure));

    let service = CityService::new(Arc::new(repo));
    let err = service
        .get_city(CityId::new(1), PointsOfInterestInclusion::Exclude)
        .await
        .expect_err("store failure");
    assert_eq!(err.code(), expected);
}

#[rstest]
#[tokio::test]
async fn create_returns_city_with_assigned_id() {
    let mut repo = MockCityRepository::new();
    repo.expect_commit()
        .withf(|changes| matches!(changes.changes(), [PendingChange::AddCity { .. }]))
        .times(1)
        .returning(|_| Ok(CommitReceipt::new(1, vec![city(4, "Ghent")], Vec::new())));

    let service = CityService::new(Arc::new(repo));
    let created = service
        .create_city(CityDraft::try_new("Ghent", None).expect("valid draft"))
        .await
        .expect("create succeeds");
    assert_eq!(created.id(), CityId::new(4));
}

#[rstest]
#[tokio::test]
async fn delete_missing_city_commits_nothing() {
    let mut repo = MockCityRepository::new();
    repo.expect_city_exists().returning(|_| Ok(false));
    repo.expect_commit().never();

    let service = CityService::new(Arc::new(repo));
    let err = service
        .delete_city(CityId::new(9))
        .await
        .expect_err("missing city");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn delete_stages_city_removal() {
    let mut repo = MockCityRepository::new();
    repo.expect_city_exists().returning(|_| Ok(true));
    repo.expect_commit()
        .withf(|changes| {
            matches!(
                changes.changes(),
                [PendingChange::RemoveCity { id }] if *id == CityId::new(1)
            )
        })
        .times(1)
        .returning(|_| Ok(CommitReceipt::new(3, Vec::new(), Vec::new())));

    let service = CityService::new(Arc::new(repo));
    service
        .delete_city(CityId::new(1))
        .await
        .expect("delete succeeds");
}
