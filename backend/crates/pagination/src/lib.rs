//! Offset pagination primitives shared by CityInfo list endpoints.
//!
//! A [`PageRequest`] captures the one-based page number and page size
//! requested by a client. Stores use [`PageRequest::offset`] and
//! [`PageRequest::limit`] to slice an ordered, filtered collection, then wrap
//! the slice in a [`Page`] together with [`PaginationMetadata`] computed from
//! the filtered count before slicing.
//!
//! The crate performs no page-size clamping. Inbound adapters
//! apply [`MAX_PAGE_SIZE`] before constructing a request.
//!
//! # Examples
//! ```
//! use pagination::{PageRequest, paginate};
//!
//! let request = PageRequest::new(2, 10).expect("non-zero page size");
//! let page = paginate(1..=25, request);
//! assert_eq!(page.items().first(), Some(&11));
//! assert_eq!(page.metadata().total_pages(), 3);
//! ```

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Page number used when a client omits `pageNumber`.
pub const DEFAULT_PAGE_NUMBER: u32 = 1;

/// Page size used when a client omits `pageSize`.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Largest page size a client may request; larger values are clamped.
pub const MAX_PAGE_SIZE: u32 = 20;

/// Response header carrying the serialized [`PaginationMetadata`].
pub const PAGINATION_HEADER: &str = "X-Pagination";

/// Errors raised while building pagination requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PaginationError {
    /// A page must hold at least one item.
    #[error("page size must be greater than zero")]
    ZeroPageSize,
}

/// One-based page selection over an ordered collection.
///
/// ## Invariants
/// - `page_size` is at least one.
/// - A `page_number` of zero is accepted and behaves like the first page when
///   computing the offset, while still being reported back verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageRequest {
    page_number: u32,
    page_size: NonZeroU32,
}

impl PageRequest {
    /// Build a request for `page_number` holding `page_size` items.
    ///
    /// # Errors
    /// Returns [`PaginationError::ZeroPageSize`] when `page_size` is zero.
    pub const fn new(page_number: u32, page_size: u32) -> Result<Self, PaginationError> {
        match NonZeroU32::new(page_size) {
            Some(size) => Ok(Self {
                page_number,
                page_size: size,
            }),
            None => Err(PaginationError::ZeroPageSize),
        }
    }

    /// Requested one-based page number.
    #[must_use]
    pub const fn page_number(&self) -> u32 {
        self.page_number
    }

    /// Requested number of items per page.
    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size.get()
    }

    /// Number of items to skip: `page_size * (page_number - 1)`, never
    /// negative.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page_size.get()) * u64::from(self.page_number.saturating_sub(1))
    }

    /// Maximum number of items on the page.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.page_size.get()
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page_number: DEFAULT_PAGE_NUMBER,
            page_size: NonZeroU32::MIN.saturating_add(DEFAULT_PAGE_SIZE - 1),
        }
    }
}

/// Paging envelope returned alongside a page of results.
///
/// Serialized as `{"currentPage", "totalPages", "pageSize", "totalCount"}`.
/// `total_pages` is always derived from `total_count` and `page_size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMetadata {
    current_page: u32,
    total_pages: u64,
    page_size: u32,
    total_count: u64,
}

impl PaginationMetadata {
    /// Derive metadata for `request` over a filtered collection of
    /// `total_count` items.
    ///
    /// # Examples
    /// ```
    /// use pagination::{PageRequest, PaginationMetadata};
    ///
    /// let request = PageRequest::new(1, 10).expect("non-zero page size");
    /// let metadata = PaginationMetadata::new(25, request);
    /// assert_eq!(metadata.total_pages(), 3);
    /// ```
    #[must_use]
    pub fn new(total_count: u64, request: PageRequest) -> Self {
        let page_size = request.page_size();
        Self {
            current_page: request.page_number(),
            total_pages: total_count.div_ceil(u64::from(page_size)),
            page_size,
            total_count,
        }
    }

    /// Page number the client asked for.
    #[must_use]
    pub const fn current_page(&self) -> u32 {
        self.current_page
    }

    /// `ceil(total_count / page_size)`.
    #[must_use]
    pub const fn total_pages(&self) -> u64 {
        self.total_pages
    }

    /// Items per page used for the computation.
    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Filtered item count before slicing.
    #[must_use]
    pub const fn total_count(&self) -> u64 {
        self.total_count
    }

    /// Render the metadata as the JSON value of the [`PAGINATION_HEADER`].
    ///
    /// # Errors
    /// Propagates serialization failures from `serde_json`.
    pub fn to_header_value(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// A slice of an ordered collection together with its paging envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    items: Vec<T>,
    metadata: PaginationMetadata,
}

impl<T> Page<T> {
    /// Pair an already-sliced set of items with its metadata.
    #[must_use]
    pub const fn new(items: Vec<T>, metadata: PaginationMetadata) -> Self {
        Self { items, metadata }
    }

    /// Items on this page, in collection order.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Paging envelope for this page.
    #[must_use]
    pub const fn metadata(&self) -> &PaginationMetadata {
        &self.metadata
    }

    /// Transform each item while keeping the metadata.
    #[must_use]
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            items: self.items.into_iter().map(f).collect(),
            metadata: self.metadata,
        }
    }

    /// Split the page into its items and metadata.
    #[must_use]
    pub fn into_parts(self) -> (Vec<T>, PaginationMetadata) {
        (self.items, self.metadata)
    }
}

/// Slice an already filtered and ordered collection.
///
/// The total count is taken before slicing, so metadata is returned even when
/// the requested page lies beyond the last one and the slice is empty.
#[must_use]
pub fn paginate<I>(ordered: I, request: PageRequest) -> Page<I::Item>
where
    I: IntoIterator,
{
    let all: Vec<I::Item> = ordered.into_iter().collect();
    let total_count = u64::try_from(all.len()).unwrap_or(u64::MAX);
    let skip = usize::try_from(request.offset()).unwrap_or(usize::MAX);
    let take = usize::try_from(request.limit()).unwrap_or(usize::MAX);
    let items = all.into_iter().skip(skip).take(take).collect();
    Page::new(items, PaginationMetadata::new(total_count, request))
}

#[cfg(test)]
#[expect(
    clippy::expect_used,
    reason = "tests construct requests from known-valid literals"
)]
mod tests {
    //! Regression coverage for offset and metadata arithmetic.

    use std::collections::BTreeSet;

    use proptest::prelude::*;
    use rstest::rstest;

    use super::*;

    fn request(page_number: u32, page_size: u32) -> PageRequest {
        PageRequest::new(page_number, page_size).expect("non-zero page size")
    }

    #[rstest]
    fn zero_page_size_is_rejected() {
        assert_eq!(PageRequest::new(1, 0), Err(PaginationError::ZeroPageSize));
    }

    #[rstest]
    fn default_request_is_first_page_of_ten() {
        let defaults = PageRequest::default();
        assert_eq!(defaults.page_number(), DEFAULT_PAGE_NUMBER);
        assert_eq!(defaults.page_size(), DEFAULT_PAGE_SIZE);
    }

    #[rstest]
    #[case(1, 10, 0)]
    #[case(2, 10, 10)]
    #[case(3, 7, 14)]
    #[case(0, 10, 0)]
    fn offset_follows_page_number(
        #[case] page_number: u32,
        #[case] page_size: u32,
        #[case] expected: u64,
    ) {
        assert_eq!(request(page_number, page_size).offset(), expected);
    }

    #[rstest]
    #[case(25, 10, 3)]
    #[case(20, 10, 2)]
    #[case(0, 10, 0)]
    #[case(1, 20, 1)]
    #[case(12, 10, 2)]
    fn total_pages_rounds_up(
        #[case] total_count: u64,
        #[case] page_size: u32,
        #[case] expected: u64,
    ) {
        let metadata = PaginationMetadata::new(total_count, request(1, page_size));
        assert_eq!(metadata.total_pages(), expected);
    }

    #[rstest]
    fn second_page_of_twelve_holds_two_items() {
        let page = paginate(1..=12, request(2, 10));
        assert_eq!(page.items(), &[11, 12]);
        let metadata = page.metadata();
        assert_eq!(metadata.current_page(), 2);
        assert_eq!(metadata.total_pages(), 2);
        assert_eq!(metadata.page_size(), 10);
        assert_eq!(metadata.total_count(), 12);
    }

    #[rstest]
    fn page_beyond_the_end_is_empty_with_metadata() {
        let page = paginate(1..=5, request(4, 2));
        assert!(page.items().is_empty());
        assert_eq!(page.metadata().total_count(), 5);
        assert_eq!(page.metadata().total_pages(), 3);
        assert_eq!(page.metadata().current_page(), 4);
    }

    #[rstest]
    fn header_value_uses_camel_case_fields() {
        let metadata = PaginationMetadata::new(12, request(2, 10));
        let header = metadata.to_header_value().expect("metadata serializes");
        let value: serde_json::Value = serde_json::from_str(&header).expect("valid JSON");
        assert_eq!(
            value,
            serde_json::json!({
                "currentPage": 2,
                "totalPages": 2,
                "pageSize": 10,
                "totalCount": 12
            })
        );
    }

    #[rstest]
    fn map_preserves_metadata() {
        let page = paginate(vec!["a", "b", "c"], request(1, 2)).map(str::len);
        assert_eq!(page.items(), &[1, 1]);
        assert_eq!(page.metadata().total_count(), 3);
    }

    proptest! {
        #[test]
        fn walking_every_page_covers_each_item_once(
            total in 0_u32..200,
            page_size in 1_u32..=MAX_PAGE_SIZE,
        ) {
            let first = paginate(0..total, request(1, page_size));
            let total_pages = u32::try_from(first.metadata().total_pages())
                .expect("page count fits in u32");

            let mut seen = BTreeSet::new();
            let mut visited = 0_usize;
            for page_number in 1..=total_pages {
                let page = paginate(0..total, request(page_number, page_size));
                prop_assert!(page.items().len() <= usize::try_from(page_size).expect("fits"));
                for item in page.items() {
                    prop_assert!(seen.insert(*item), "item {} appeared twice", item);
                    visited += 1;
                }
            }
            prop_assert_eq!(visited, usize::try_from(total).expect("fits"));
        }
    }
}
