//! Wire [`Payload`] of paginated list endpoints.

use serde::Deserialize;

use crate::{pagination, PageResult, QueryState};

/// Response body of a list endpoint, in any of the supported shapes.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(untagged)]
pub enum Payload<T> {
    /// Server-side paginated object.
    Paginated(Paginated<T>),

    /// Bare array of all the records, paginated on the client side.
    Bare(Vec<T>),
}

/// Server-side paginated response body.
///
/// Only `results` is required, any missing metadata is either derived or
/// defaulted.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct Paginated<T> {
    /// Records of the page.
    pub results: Vec<T>,

    /// Total number of records.
    #[serde(default)]
    pub count: Option<u64>,

    /// Total number of records, as named by some endpoints.
    #[serde(default)]
    pub total_count: Option<u64>,

    /// Total number of records, as named by legacy endpoints.
    #[serde(default)]
    pub total: Option<u64>,

    /// Number of the returned page.
    #[serde(default)]
    pub current_page: Option<u32>,

    /// Total number of pages.
    #[serde(default)]
    pub total_pages: Option<u32>,

    /// Indicator whether a previous page exists.
    #[serde(default)]
    pub has_previous: Option<bool>,

    /// Indicator whether a next page exists.
    #[serde(default)]
    pub has_next: Option<bool>,

    /// Number of the previous page, if any.
    #[serde(default)]
    pub previous_page_number: Option<u32>,

    /// Number of the next page, if any.
    #[serde(default)]
    pub next_page_number: Option<u32>,
}

impl<T> Payload<T> {
    /// Normalizes this [`Payload`] into a [`PageResult`] answering the
    /// provided [`QueryState`].
    #[must_use]
    pub fn normalize(self, state: &QueryState) -> PageResult<T> {
        match self {
            Self::Paginated(p) => p.normalize(state),
            Self::Bare(items) => paginate(items, state),
        }
    }
}

impl<T> Paginated<T> {
    /// Normalizes this [`Paginated`] body into a [`PageResult`] answering the
    /// provided [`QueryState`].
    #[must_use]
    pub fn normalize(self, state: &QueryState) -> PageResult<T> {
        let Self {
            results,
            count,
            total_count,
            total,
            current_page,
            total_pages,
            has_previous,
            has_next,
            previous_page_number,
            next_page_number,
        } = self;

        let total_count = count.or(total_count).or(total).unwrap_or(0);
        PageResult {
            items: results,
            total_count,
            current_page: current_page.unwrap_or(state.page).max(1),
            total_pages: total_pages.unwrap_or_else(|| {
                pagination::total_pages(total_count, state.page_size)
            }),
            has_previous: has_previous
                .unwrap_or(previous_page_number.is_some()),
            has_next: has_next.unwrap_or(next_page_number.is_some()),
            page_size: state.page_size,
        }
    }
}

/// Slices the requested page out of all the `items`.
///
/// A page beyond the last one is clamped to the last one.
fn paginate<T>(items: Vec<T>, state: &QueryState) -> PageResult<T> {
    let total_count = u64::try_from(items.len()).unwrap_or(u64::MAX);
    let total_pages = pagination::total_pages(total_count, state.page_size);
    let page = state.page.clamp(1, total_pages.max(1));

    let size = usize::try_from(state.page_size).unwrap_or(usize::MAX);
    let skip = usize::try_from(page - 1)
        .unwrap_or(usize::MAX)
        .saturating_mul(size);
    let items = items.into_iter().skip(skip).take(size).collect();

    PageResult::new(items, total_count, page, state.page_size)
}
