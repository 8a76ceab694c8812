//! [`QueryState`] definitions.

use std::collections::{btree_map, BTreeMap};

/// Default key of the page size query parameter.
pub const DEFAULT_PAGE_SIZE_PARAM: &str = "per_page";

/// State of a paginated query: which page of which records is requested.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct QueryState {
    /// Requested page number, starting from `1`.
    pub page: u32,

    /// Number of records on a single page.
    pub page_size: u32,

    /// Search term, empty if no search is applied.
    pub search: String,

    /// Named filter values.
    pub filters: Filters,
}

impl QueryState {
    /// Creates a new [`QueryState`] for the first page of the provided size.
    ///
    /// [`None`] is returned if the `page_size` is `0`.
    #[must_use]
    pub fn new(page_size: u32) -> Option<Self> {
        (page_size > 0).then(|| Self {
            page: 1,
            page_size,
            search: String::new(),
            filters: Filters::default(),
        })
    }

    /// Returns the number of records preceding the requested page.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.page_size)
    }

    /// Renders this [`QueryState`] as query parameters.
    ///
    /// The search term is omitted when empty. Filters follow in key order.
    #[must_use]
    pub fn to_params(&self, page_size_key: &str) -> Vec<(String, String)> {
        let mut params = vec![
            ("page".to_owned(), self.page.to_string()),
            (page_size_key.to_owned(), self.page_size.to_string()),
        ];
        if !self.search.is_empty() {
            params.push(("search".to_owned(), self.search.clone()));
        }
        params.extend(self.filters.iter().map(|(k, v)| (k.into(), v.into())));
        params
    }
}

/// Named filter values of a [`QueryState`].
///
/// Empty values are never stored: setting one clears the filter.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Filters(BTreeMap<String, String>);

impl Filters {
    /// Sets the `key` filter to the provided `value`, or clears it if the
    /// `value` is empty.
    ///
    /// Returns whether the stored value has changed.
    pub fn set(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> bool {
        let (key, value) = (key.into(), value.into());
        if value.is_empty() {
            return self.remove(&key);
        }
        self.0.insert(key, value.clone()).as_ref() != Some(&value)
    }

    /// Clears the `key` filter.
    ///
    /// Returns whether there was a value to clear.
    pub fn remove(&mut self, key: &str) -> bool {
        self.0.remove(key).is_some()
    }

    /// Returns the value of the `key` filter, if set.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Clears all the filters.
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Indicates whether no filter is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of set filters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates over the set filters in key order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, String> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a Filters {
    type Item = (&'a String, &'a String);
    type IntoIter = btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Filters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut filters = Self::default();
        for (k, v) in iter {
            _ = filters.set(k, v);
        }
        filters
    }
}

#[cfg(test)]
mod spec {
    use super::{Filters, QueryState, DEFAULT_PAGE_SIZE_PARAM};

    #[test]
    fn rejects_zero_page_size() {
        assert!(QueryState::new(0).is_none());
        assert_eq!(QueryState::new(25).unwrap().page, 1);
    }

    #[test]
    fn empty_value_clears_filter() {
        let mut filters = Filters::default();

        assert!(filters.set("location", "3"));
        assert!(!filters.set("location", "3"));
        assert_eq!(filters.get("location"), Some("3"));

        assert!(filters.set("location", ""));
        assert!(filters.is_empty());
        assert!(!filters.set("location", ""));
    }

    #[test]
    fn filters_ignore_insertion_order() {
        let a: Filters = [("b", "2"), ("a", "1")].into_iter().collect();
        let b: Filters = [("a", "1"), ("b", "2")].into_iter().collect();

        assert_eq!(a, b);
    }

    #[test]
    fn renders_params() {
        let mut state = QueryState::new(10).unwrap();
        state.page = 3;

        assert_eq!(
            state.to_params(DEFAULT_PAGE_SIZE_PARAM),
            [("page", "3"), ("per_page", "10")]
                .map(|(k, v)| (k.to_owned(), v.to_owned())),
        );

        state.search = "coriolis".into();
        _ = state.filters.set("location", "7");
        _ = state.filters.set("criticality", "high");

        assert_eq!(
            state.to_params("page_size"),
            [
                ("page", "3"),
                ("page_size", "10"),
                ("search", "coriolis"),
                ("criticality", "high"),
                ("location", "7"),
            ]
            .map(|(k, v)| (k.to_owned(), v.to_owned())),
        );
        assert_eq!(state.offset(), 20);
    }
}
