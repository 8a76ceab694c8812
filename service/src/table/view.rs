//! [`View`] rendering a [`DataTable`].
//!
//! [`DataTable`]: super::DataTable

use common::{PageResult, QueryState};

use super::FetchError;

/// Rendering target of a [`DataTable`].
///
/// [`DataTable`] holds no output of its own: everything it displays goes
/// through these callbacks.
///
/// [`DataTable`]: super::DataTable
pub trait View<T> {
    /// Renders the table body.
    fn render_rows(&self, rows: Rows<'_, T>);

    /// Renders pagination controls of the provided page.
    fn render_pager(&self, page: &PageResult<T>);

    /// Renders the records-info line of the provided page.
    fn render_summary(&self, page: &PageResult<T>);

    /// Reports a failed fetch.
    ///
    /// Renders an inline error row by default.
    fn on_error(&self, err: &FetchError) {
        self.render_rows(Rows::Failed(err));
    }
}

impl<T, V: View<T> + ?Sized> View<T> for Box<V> {
    fn render_rows(&self, rows: Rows<'_, T>) {
        (**self).render_rows(rows);
    }

    fn render_pager(&self, page: &PageResult<T>) {
        (**self).render_pager(page);
    }

    fn render_summary(&self, page: &PageResult<T>) {
        (**self).render_summary(page);
    }

    fn on_error(&self, err: &FetchError) {
        (**self).on_error(err);
    }
}

/// Content of a table body.
#[derive(Debug)]
pub enum Rows<'a, T> {
    /// Page is being fetched.
    Loading,

    /// Page holds no records.
    Empty(Empty<'a>),

    /// Records of the page.
    Items(&'a [T]),

    /// Page failed to be fetched.
    Failed(&'a FetchError),
}

/// Reason of a page being empty.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Empty<'a> {
    /// There are no records at all.
    NoRecords,

    /// No records match the search term.
    NoSearchResults {
        /// Search term that matched nothing.
        term: &'a str,
    },

    /// No records match the filters.
    NoFilterResults,
}

impl<'a> Empty<'a> {
    /// Explains an empty page answering the provided [`QueryState`].
    #[must_use]
    pub fn of(state: &'a QueryState) -> Self {
        if !state.search.is_empty() {
            Self::NoSearchResults {
                term: &state.search,
            }
        } else if !state.filters.is_empty() {
            Self::NoFilterResults
        } else {
            Self::NoRecords
        }
    }
}
