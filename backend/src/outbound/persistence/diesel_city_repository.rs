//! PostgreSQL-backed `CityRepository` using Diesel.
//!
//! Listing filters are translated into SQL `WHERE` clauses so PostgreSQL
//! restricts, counts, orders, and slices the rows. Reads that issue more than
//! one statement run in a read-only `REPEATABLE READ` transaction so every
//! statement sees the same snapshot. Each commit runs in one transaction; a
//! stale change aborts it and rolls back every earlier change of the same
//! batch.
//!
//! City names use the `"C"` collation, so ordering is by code point and
//! agrees with the in-memory store.

use async_trait::async_trait;
use diesel::dsl::exists;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use pagination::{Page, PageRequest, PaginationMetadata};

use crate::domain::ports::{CityRepository, CityRepositoryError};
use crate::domain::{
    ChangeSet, City, CityDetails, CityFilter, CityId, CommitReceipt, PendingChange,
    PointOfInterest, PointOfInterestId, PointsOfInterestInclusion,
};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{
    CityRow, NewCityRow, NewPointOfInterestRow, PointOfInterestRow, PointOfInterestUpdate,
};
use super::pool::DbPool;
use super::schema::{cities, points_of_interest};

/// Diesel-backed implementation of the city store port.
#[derive(Clone)]
pub struct DieselCityRepository {
    pool: DbPool,
}

impl DieselCityRepository {
    /// Create a repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Failure inside a transaction closure.
#[derive(Debug)]
enum TxError {
    Diesel(diesel::result::Error),
    Stale(String),
}

impl From<diesel::result::Error> for TxError {
    fn from(value: diesel::result::Error) -> Self {
        Self::Diesel(value)
    }
}

impl From<TxError> for CityRepositoryError {
    fn from(value: TxError) -> Self {
        match value {
            TxError::Diesel(err) => map_diesel_error(err),
            TxError::Stale(message) => CityRepositoryError::stale_change(message),
        }
    }
}

/// Escape `LIKE` metacharacters using PostgreSQL's default `\` escape.
fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Deferred `WHERE` clause for `filter`.
fn filtered(filter: &CityFilter) -> cities::BoxedQuery<'static, Pg> {
    let mut query = cities::table.into_boxed();
    if let Some(name) = filter.name() {
        query = query.filter(cities::name.eq(name.to_owned()));
    }
    if let Some(search) = filter.search_query() {
        let pattern = format!("%{}%", escape_like(search));
        query = query.filter(
            cities::name
                .like(pattern.clone())
                .or(cities::description.assume_not_null().like(pattern)),
        );
    }
    query
}

fn city_from_row(row: CityRow) -> Result<City, CityRepositoryError> {
    City::try_from(row).map_err(|err| CityRepositoryError::query(format!("invalid city row: {err}")))
}

fn point_of_interest_from_row(
    row: PointOfInterestRow,
) -> Result<PointOfInterest, CityRepositoryError> {
    PointOfInterest::try_from(row).map_err(|err| {
        CityRepositoryError::query(format!("invalid point of interest row: {err}"))
    })
}

async fn load_points_of_interest(
    conn: &mut AsyncPgConnection,
    city_id: CityId,
) -> Result<Vec<PointOfInterestRow>, diesel::result::Error> {
    points_of_interest::table
        .filter(points_of_interest::city_id.eq(city_id.get()))
        .order(points_of_interest::id.asc())
        .select(PointOfInterestRow::as_select())
        .load(conn)
        .await
}

async fn city_row_exists(
    conn: &mut AsyncPgConnection,
    city_id: CityId,
) -> Result<bool, diesel::result::Error> {
    diesel::select(exists(cities::table.find(city_id.get())))
        .get_result(conn)
        .await
}

#[derive(Default)]
struct ReceiptRows {
    affected: usize,
    cities: Vec<CityRow>,
    points_of_interest: Vec<PointOfInterestRow>,
}

async fn apply_change(
    conn: &mut AsyncPgConnection,
    change: PendingChange,
    receipt: &mut ReceiptRows,
) -> Result<(), TxError> {
    match change {
        PendingChange::AddCity { draft } => {
            let row = diesel::insert_into(cities::table)
                .values(NewCityRow::from(&draft))
                .returning(CityRow::as_returning())
                .get_result(conn)
                .await?;
            receipt.affected += 1;
            receipt.cities.push(row);
        }
        PendingChange::RemoveCity { id } => {
            let children = diesel::delete(
                points_of_interest::table.filter(points_of_interest::city_id.eq(id.get())),
            )
            .execute(conn)
            .await?;
            let removed = diesel::delete(cities::table.find(id.get()))
                .execute(conn)
                .await?;
            if removed == 0 {
                return Err(TxError::Stale(format!("city {id} no longer exists")));
            }
            receipt.affected += removed + children;
        }
        PendingChange::AddPointOfInterest { city_id, draft } => {
            if !city_row_exists(conn, city_id).await? {
                return Err(TxError::Stale(format!("city {city_id} no longer exists")));
            }
            let row = diesel::insert_into(points_of_interest::table)
                .values(NewPointOfInterestRow {
                    city_id: city_id.get(),
                    name: draft.name(),
                    description: draft.description(),
                })
                .returning(PointOfInterestRow::as_returning())
                .get_result(conn)
                .await?;
            receipt.affected += 1;
            receipt.points_of_interest.push(row);
        }
        PendingChange::UpdatePointOfInterest {
            city_id,
            id,
            expected,
            replacement,
        } => {
            let updated = diesel::update(
                points_of_interest::table
                    .filter(points_of_interest::id.eq(id.get()))
                    .filter(points_of_interest::city_id.eq(city_id.get()))
                    .filter(points_of_interest::name.eq(expected.name()))
                    .filter(points_of_interest::description.eq(expected.description())),
            )
            .set(PointOfInterestUpdate::from(&replacement))
            .execute(conn)
            .await?;
            if updated == 0 {
                return Err(TxError::Stale(format!(
                    "point of interest {id} changed or was removed"
                )));
            }
            receipt.affected += updated;
        }
        PendingChange::RemovePointOfInterest { city_id, id } => {
            let removed = diesel::delete(
                points_of_interest::table
                    .filter(points_of_interest::id.eq(id.get()))
                    .filter(points_of_interest::city_id.eq(city_id.get())),
            )
            .execute(conn)
            .await?;
            if removed == 0 {
                return Err(TxError::Stale(format!(
                    "point of interest {id} no longer exists"
                )));
            }
            receipt.affected += removed;
        }
    }
    Ok(())
}

#[async_trait]
impl CityRepository for DieselCityRepository {
    async fn city_exists(&self, id: CityId) -> Result<bool, CityRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        city_row_exists(&mut conn, id)
            .await
            .map_err(map_diesel_error)
    }

    async fn list_cities(
        &self,
        filter: &CityFilter,
        request: PageRequest,
    ) -> Result<Page<City>, CityRepositoryError> {
        let offset = i64::try_from(request.offset())
            .map_err(|_| CityRepositoryError::query("page offset out of range"))?;
        let limit = i64::from(request.limit());
        let filter = filter.clone();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let (total, rows) = conn
            .build_transaction()
            .read_only()
            .repeatable_read()
            .run::<_, TxError, _>(|conn| {
                async move {
                    let total: i64 = filtered(&filter).count().get_result(conn).await?;
                    let rows = filtered(&filter)
                        .order((cities::name.asc(), cities::id.asc()))
                        .offset(offset)
                        .limit(limit)
                        .select(CityRow::as_select())
                        .load(conn)
                        .await?;
                    Ok((total, rows))
                }
                .scope_boxed()
            })
            .await?;

        let total_count = u64::try_from(total)
            .map_err(|_| CityRepositoryError::query("negative row count"))?;
        let items = rows
            .into_iter()
            .map(city_from_row)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page::new(items, PaginationMetadata::new(total_count, request)))
    }

    async fn find_city(
        &self,
        id: CityId,
        inclusion: PointsOfInterestInclusion,
    ) -> Result<Option<CityDetails>, CityRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let loaded = conn
            .build_transaction()
            .read_only()
            .repeatable_read()
            .run::<_, TxError, _>(|conn| {
                async move {
                    let Some(city) = cities::table
                        .find(id.get())
                        .select(CityRow::as_select())
                        .first(conn)
                        .await
                        .optional()?
                    else {
                        return Ok(None);
                    };
                    let children = match inclusion {
                        PointsOfInterestInclusion::Include => {
                            Some(load_points_of_interest(conn, id).await?)
                        }
                        PointsOfInterestInclusion::Exclude => None,
                    };
                    Ok(Some((city, children)))
                }
                .scope_boxed()
            })
            .await?;

        let Some((city, children)) = loaded else {
            return Ok(None);
        };
        let city = city_from_row(city)?;
        let details = match children {
            None => CityDetails::WithoutPointsOfInterest(city),
            Some(rows) => {
                let points_of_interest = rows
                    .into_iter()
                    .map(point_of_interest_from_row)
                    .collect::<Result<Vec<_>, _>>()?;
                CityDetails::including(city, points_of_interest)
                    .map_err(|err| CityRepositoryError::query(err.to_string()))?
            }
        };
        Ok(Some(details))
    }

    async fn list_points_of_interest(
        &self,
        city_id: CityId,
    ) -> Result<Option<Vec<PointOfInterest>>, CityRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = conn
            .build_transaction()
            .read_only()
            .repeatable_read()
            .run::<_, TxError, _>(|conn| {
                async move {
                    if !city_row_exists(conn, city_id).await? {
                        return Ok(None);
                    }
                    Ok(Some(load_points_of_interest(conn, city_id).await?))
                }
                .scope_boxed()
            })
            .await?;
        rows.map(|rows| {
            rows.into_iter()
                .map(point_of_interest_from_row)
                .collect::<Result<Vec<_>, _>>()
        })
        .transpose()
    }

    async fn find_point_of_interest(
        &self,
        city_id: CityId,
        id: PointOfInterestId,
    ) -> Result<Option<PointOfInterest>, CityRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = points_of_interest::table
            .filter(points_of_interest::id.eq(id.get()))
            .filter(points_of_interest::city_id.eq(city_id.get()))
            .select(PointOfInterestRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(point_of_interest_from_row).transpose()
    }

    async fn commit(&self, changes: ChangeSet) -> Result<CommitReceipt, CityRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = conn
            .transaction::<_, TxError, _>(|conn| {
                async move {
                    let mut receipt = ReceiptRows::default();
                    for change in changes {
                        apply_change(conn, change, &mut receipt).await?;
                    }
                    Ok(receipt)
                }
                .scope_boxed()
            })
            .await?;

        let cities = rows
            .cities
            .into_iter()
            .map(city_from_row)
            .collect::<Result<Vec<_>, _>>()?;
        let points_of_interest = rows
            .points_of_interest
            .into_iter()
            .map(point_of_interest_from_row)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(CommitReceipt::new(rows.affected, cities, points_of_interest))
    }
}

#[cfg(test)]
mod tests {
    //! SQL generation checks that need no database.
    use super::*;
    use diesel::debug_query;
    use rstest::rstest;

    #[rstest]
    #[case("plain", "plain")]
    #[case("100%", "100\\%")]
    #[case("a_b", "a\\_b")]
    #[case("back\\slash", "back\\\\slash")]
    fn like_metacharacters_are_escaped(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(escape_like(raw), expected);
    }

    #[rstest]
    fn unrestricted_filter_has_no_where_clause() {
        let sql = debug_query::<Pg, _>(&filtered(&CityFilter::default())).to_string();
        assert!(!sql.contains("WHERE"), "{sql}");
    }

    #[rstest]
    fn both_restrictions_are_combined() {
        let filter = CityFilter::new(Some("Paris"), Some("tower"));
        let sql = debug_query::<Pg, _>(&filtered(&filter)).to_string();
        assert!(sql.contains("\"cities\".\"name\" = $1"), "{sql}");
        assert!(sql.contains("LIKE"), "{sql}");
        assert!(sql.contains("%tower%"), "{sql}");
    }
}
