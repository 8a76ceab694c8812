//! Abstractions for page-based pagination.

use std::fmt;

/// A single page of records along with its pagination metadata.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PageResult<T> {
    /// Records on this page.
    pub items: Vec<T>,

    /// Total number of records matching the query.
    pub total_count: u64,

    /// Number of this page, starting from `1`.
    pub current_page: u32,

    /// Total number of pages.
    pub total_pages: u32,

    /// Indicator whether a previous page exists.
    pub has_previous: bool,

    /// Indicator whether a next page exists.
    pub has_next: bool,

    /// Requested number of records per page.
    pub page_size: u32,
}

impl<T> PageResult<T> {
    /// Creates a new [`PageResult`] from the provided `items`, computing the
    /// rest of pagination metadata out of the `total_count`.
    #[must_use]
    pub fn new(
        items: Vec<T>,
        total_count: u64,
        current_page: u32,
        page_size: u32,
    ) -> Self {
        let total_pages = total_pages(total_count, page_size);
        let current_page = current_page.max(1);
        Self {
            items,
            total_count,
            current_page,
            total_pages,
            has_previous: current_page > 1,
            has_next: current_page < total_pages,
            page_size,
        }
    }

    /// Indicates whether there is more than one page, so a [`Pager`] should
    /// be shown.
    #[must_use]
    pub fn is_paginated(&self) -> bool {
        self.total_pages > 1
    }

    /// Returns a [`Pager`] of this [`PageResult`] showing the first and the
    /// last pages, and `window` pages around the current one.
    ///
    /// [`None`] is returned if there is nothing to paginate.
    #[must_use]
    pub fn pager(&self, window: u32) -> Option<Pager> {
        if !self.is_paginated() {
            return None;
        }

        let last = self.total_pages;
        let current = self.current_page.clamp(1, last);

        let mut numbers = vec![1, last];
        numbers.extend(
            current.saturating_sub(window).max(1)
                ..=current.saturating_add(window).min(last),
        );
        numbers.sort_unstable();
        numbers.dedup();

        let mut items = Vec::with_capacity(numbers.len() + 4);
        items.push(PagerItem::Previous(
            (self.has_previous || current > 1)
                .then(|| current.saturating_sub(1))
                .filter(|&n| n >= 1),
        ));
        let mut prev = 0;
        for number in numbers {
            if number > prev + 1 {
                items.push(PagerItem::Gap);
            }
            items.push(PagerItem::Page {
                number,
                current: number == current,
            });
            prev = number;
        }
        items.push(PagerItem::Next(
            current.checked_add(1).filter(|&n| n <= last),
        ));

        Some(Pager { items })
    }

    /// Returns the records-info [`Summary`] of this [`PageResult`].
    #[must_use]
    pub fn summary(&self) -> Summary {
        let count = u64::try_from(self.items.len()).unwrap_or(u64::MAX);
        if count == 0 {
            return Summary {
                first: 0,
                last: 0,
                total: self.total_count,
            };
        }
        let first = u64::from(self.current_page.saturating_sub(1))
            * u64::from(self.page_size)
            + 1;
        Summary {
            first,
            last: first + count - 1,
            total: self.total_count.max(first + count - 1),
        }
    }
}

/// Calculates number of pages required to hold `total_count` records.
#[must_use]
pub fn total_pages(total_count: u64, page_size: u32) -> u32 {
    if page_size == 0 {
        return 0;
    }
    u32::try_from(total_count.div_ceil(u64::from(page_size)))
        .unwrap_or(u32::MAX)
}

/// Navigation controls of a [`PageResult`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Pager {
    /// [`PagerItem`]s in display order.
    pub items: Vec<PagerItem>,
}

/// Single control of a [`Pager`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PagerItem {
    /// Link to the previous page, [`None`] if disabled.
    Previous(Option<u32>),

    /// Link to a numbered page.
    Page {
        /// Number of the page.
        number: u32,

        /// Indicator whether this is the page being displayed.
        current: bool,
    },

    /// Run of omitted pages.
    Gap,

    /// Link to the next page, [`None`] if disabled.
    Next(Option<u32>),
}

impl fmt::Display for Pager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            match item {
                PagerItem::Previous(Some(_)) => f.write_str("<")?,
                PagerItem::Previous(None) | PagerItem::Next(None) => {
                    f.write_str("-")?;
                }
                PagerItem::Page {
                    number,
                    current: true,
                } => write!(f, "[{number}]")?,
                PagerItem::Page {
                    number,
                    current: false,
                } => write!(f, "{number}")?,
                PagerItem::Gap => f.write_str("...")?,
                PagerItem::Next(Some(_)) => f.write_str(">")?,
            }
        }
        Ok(())
    }
}

/// Records-info line of a [`PageResult`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Summary {
    /// Ordinal of the first record on the page, `0` if the page is empty.
    pub first: u64,

    /// Ordinal of the last record on the page, `0` if the page is empty.
    pub last: u64,

    /// Total number of records.
    pub total: u64,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self { first, last, total } = self;
        if *last == 0 {
            f.write_str("No entries")
        } else {
            write!(f, "Showing {first} to {last} of {total} entries")
        }
    }
}
