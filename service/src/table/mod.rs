//! [`DataTable`] controller of paginated listings.

mod config;
mod fetch;
mod view;

use std::{
    cell::RefCell,
    collections::{HashMap, HashSet},
    fmt,
    marker::PhantomData,
    rc::Rc,
};

use common::{Filters, PageResult, QueryState};
use derive_more::{Debug, Display, Error};
use tokio::{sync::watch, task, time};
use tracing as log;

pub use self::{
    config::Config,
    fetch::{Fetch, FetchError, IntoPage},
    view::{Empty, Rows, View},
};

/// Controller of a paginated, searchable and filterable table.
///
/// Owns the [`QueryState`], [`Fetch`]es pages for it and drives a [`View`].
/// Every mutator is fire-and-forget: fetching happens on a
/// [`task::spawn_local`]ed task, so a [`DataTable`] must be used inside a
/// [`task::LocalSet`]. Results of superseded requests are never rendered.
pub struct DataTable<T, F, V> {
    /// State shared with spawned tasks.
    shared: Rc<Shared<T, F, V>>,
}

/// State of a [`DataTable`] shared with its spawned tasks.
#[derive(Debug)]
struct Shared<T, F, V> {
    /// [`Config`] of the [`DataTable`].
    config: Config,

    /// [`Fetch`] implementation providing pages.
    #[debug(skip)]
    fetcher: F,

    /// [`View`] rendering pages.
    #[debug(skip)]
    view: V,

    /// Filters to be cleared once the keyed filter changes.
    dependents: HashMap<String, Vec<String>>,

    /// Mutable state.
    state: RefCell<State>,

    /// Number of pending debounce timers and in-flight fetches.
    pending: watch::Sender<usize>,

    /// Type of the records.
    #[debug(skip)]
    _items: PhantomData<fn() -> T>,
}

/// Mutable state of a [`DataTable`].
#[derive(Debug)]
struct State {
    /// Latest [`QueryState`].
    query: QueryState,

    /// Total pages of the latest applied page for the current [`QueryState`],
    /// if known.
    total_pages: Option<u32>,

    /// Generation of the latest issued request.
    issued: u64,

    /// Generation of the latest applied response.
    applied: u64,

    /// Number of fetches in flight.
    in_flight: usize,

    /// Pending debounced search.
    debounce: Option<task::JoinHandle<()>>,
}

/// Status of a [`DataTable`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Status {
    /// Nothing is pending.
    Idle,

    /// A fetch is in flight or a search is debounced.
    Loading,
}

impl<T, F, V> DataTable<T, F, V> {
    /// Starts building a new [`DataTable`].
    #[must_use]
    pub fn builder() -> Builder<T, F, V> {
        Builder::default()
    }

    /// Returns a snapshot of the current [`QueryState`].
    #[must_use]
    pub fn state(&self) -> QueryState {
        self.shared.state.borrow().query.clone()
    }

    /// Returns the current [`Status`].
    #[must_use]
    pub fn status(&self) -> Status {
        let st = self.shared.state.borrow();
        if st.in_flight > 0 || st.debounce.is_some() {
            Status::Loading
        } else {
            Status::Idle
        }
    }

    /// Waits until no search is debounced and no fetch is in flight.
    pub async fn settled(&self) {
        let mut pending = self.shared.pending.subscribe();
        _ = pending.wait_for(|n| *n == 0).await;
    }

    /// Returns keys of all the filters depending on the `key` one,
    /// transitively.
    fn dependents_of(&self, key: &str) -> Vec<String> {
        let mut seen = HashSet::from([key.to_owned()]);
        let mut queue = vec![key.to_owned()];
        let mut found = vec![];
        while let Some(next) = queue.pop() {
            for child in self.shared.dependents.get(&next).into_iter().flatten()
            {
                if seen.insert(child.clone()) {
                    found.push(child.clone());
                    queue.push(child.clone());
                }
            }
        }
        found
    }
}

impl<T, F, V> DataTable<T, F, V>
where
    T: 'static,
    F: Fetch<QueryState, Ok: IntoPage<T>, Err: Into<FetchError>> + 'static,
    V: View<T> + 'static,
{
    /// Sets the search term, resetting to the first page.
    ///
    /// The search is performed once the input pauses for
    /// [`Config::debounce`].
    pub fn set_search_term(&self, term: impl Into<String>) {
        let term = term.into();
        let term = term.trim();
        {
            let mut st = self.shared.state.borrow_mut();
            term.clone_into(&mut st.query.search);
            st.query.page = 1;
            st.total_pages = None;
        }
        log::debug!("search term set to `{term}`");
        self.debounce();
    }

    /// Sets the `key` filter to the provided `value` (clearing it if empty),
    /// clears its dependent filters, and reloads the first page.
    pub fn set_filter(&self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let dependents = self.dependents_of(&key);
        {
            let mut st = self.shared.state.borrow_mut();
            _ = st.query.filters.set(key.clone(), value);
            for dependent in &dependents {
                _ = st.query.filters.remove(dependent);
            }
            st.query.page = 1;
            st.total_pages = None;
        }
        log::debug!("filter `{key}` changed");
        self.reload();
    }

    /// Clears the `key` filter along with its dependent filters, and reloads
    /// the first page.
    pub fn clear_filter(&self, key: impl Into<String>) {
        self.set_filter(key, String::new());
    }

    /// Sets the number of records per page, and reloads the first page.
    ///
    /// Ignored if the `size` is `0`.
    pub fn set_page_size(&self, size: u32) {
        if size == 0 {
            log::debug!("ignoring invalid page size `{size}`");
            return;
        }
        {
            let mut st = self.shared.state.borrow_mut();
            st.query.page_size = size;
            st.query.page = 1;
            st.total_pages = None;
        }
        self.reload();
    }

    /// Navigates to the provided `page`.
    ///
    /// Ignored if the `page` is the current one, or is out of the known
    /// range.
    pub fn go_to_page(&self, page: u32) {
        let accepted = {
            let mut st = self.shared.state.borrow_mut();
            let beyond = st.total_pages.is_some_and(|total| page > total);
            if page < 1 || page == st.query.page || beyond {
                false
            } else {
                st.query.page = page;
                true
            }
        };
        if accepted {
            self.reload();
        } else {
            log::debug!("ignoring navigation to page `{page}`");
        }
    }

    /// Navigates to the next page, if any.
    pub fn next_page(&self) {
        self.go_to_page(self.state().page.saturating_add(1));
    }

    /// Navigates to the previous page, if any.
    pub fn previous_page(&self) {
        self.go_to_page(self.state().page.saturating_sub(1));
    }

    /// Clears the search term and all the filters, and reloads the first
    /// page.
    pub fn reset(&self) {
        {
            let mut st = self.shared.state.borrow_mut();
            st.query.search.clear();
            st.query.filters.clear();
            st.query.page = 1;
            st.total_pages = None;
        }
        self.reload();
    }

    /// Immediately reloads the current page, superseding any pending search.
    pub fn reload(&self) {
        self.cancel_debounce();
        self.load();
    }

    /// (Re)starts the debounce timer of a search.
    fn debounce(&self) {
        self.cancel_debounce();

        self.shared.pending.send_modify(|n| *n += 1);
        let this = self.clone();
        let delay = self.shared.config.debounce;
        let handle = task::spawn_local(async move {
            time::sleep(delay).await;
            let fired = this.shared.state.borrow_mut().debounce.take();
            drop(fired);
            this.load();
            this.shared.pending.send_modify(|n| *n -= 1);
        });
        self.shared.state.borrow_mut().debounce = Some(handle);
    }

    /// Cancels the pending debounced search, if any.
    fn cancel_debounce(&self) {
        let pending = self.shared.state.borrow_mut().debounce.take();
        if let Some(handle) = pending {
            handle.abort();
            self.shared.pending.send_modify(|n| *n -= 1);
        }
    }

    /// Issues a fetch of the current [`QueryState`].
    fn load(&self) {
        let (snapshot, generation) = {
            let mut st = self.shared.state.borrow_mut();
            st.issued += 1;
            st.in_flight += 1;
            (st.query.clone(), st.issued)
        };
        self.shared.pending.send_modify(|n| *n += 1);
        log::debug!("fetching page {} (request #{generation})", snapshot.page);

        self.shared.view.render_rows(Rows::Loading);

        let this = self.clone();
        drop(task::spawn_local(async move {
            let result: Result<PageResult<T>, FetchError> =
                match this.shared.fetcher.execute(snapshot.clone()).await {
                    Ok(ok) => IntoPage::<T>::into_page(ok, &snapshot),
                    Err(e) => Err(e.into()),
                };
            this.apply(&snapshot, generation, result);
            this.shared.pending.send_modify(|n| *n -= 1);
        }));
    }

    /// Renders the `result` of the `generation` request, unless it has been
    /// superseded.
    fn apply(
        &self,
        snapshot: &QueryState,
        generation: u64,
        result: Result<PageResult<T>, FetchError>,
    ) {
        let is_current = {
            let mut st = self.shared.state.borrow_mut();
            st.in_flight -= 1;
            let is_current =
                st.query == *snapshot && generation > st.applied;
            if is_current {
                st.applied = generation;
                if let Ok(page) = &result {
                    st.total_pages = Some(page.total_pages);
                }
            }
            is_current
        };
        if !is_current {
            log::debug!("discarding stale response of request #{generation}");
            return;
        }

        let view = &self.shared.view;
        match result {
            Ok(page) => {
                if page.items.is_empty() {
                    view.render_rows(Rows::Empty(Empty::of(snapshot)));
                } else {
                    view.render_rows(Rows::Items(&page.items));
                }
                view.render_pager(&page);
                view.render_summary(&page);
            }
            Err(e) => {
                log::warn!("failed to fetch page {}: {e}", snapshot.page);
                view.on_error(&e);
            }
        }
    }
}

impl<T, F, V> Clone for DataTable<T, F, V> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
        }
    }
}

impl<T, F, V> fmt::Debug for DataTable<T, F, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataTable")
            .field("state", &self.state())
            .field("status", &self.status())
            .finish_non_exhaustive()
    }
}

/// Builder of a [`DataTable`].
#[derive(Debug)]
pub struct Builder<T, F, V> {
    /// [`Config`] of the [`DataTable`].
    config: Config,

    /// [`Fetch`] implementation providing pages.
    #[debug(skip)]
    fetcher: Option<F>,

    /// [`View`] rendering pages.
    #[debug(skip)]
    view: Option<V>,

    /// Filters to be cleared once the keyed filter changes.
    dependents: HashMap<String, Vec<String>>,

    /// Initial search term.
    search: String,

    /// Initial filters.
    filters: Filters,

    /// Type of the records.
    #[debug(skip)]
    _items: PhantomData<fn() -> T>,
}

impl<T, F, V> Default for Builder<T, F, V> {
    fn default() -> Self {
        Self {
            config: Config::default(),
            fetcher: None,
            view: None,
            dependents: HashMap::new(),
            search: String::new(),
            filters: Filters::default(),
            _items: PhantomData,
        }
    }
}

impl<T, F, V> Builder<T, F, V> {
    /// Sets the [`Fetch`] implementation providing pages.
    #[must_use]
    pub fn fetch_page(mut self, fetcher: F) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    /// Sets the [`View`] rendering pages.
    #[must_use]
    pub fn view(mut self, view: V) -> Self {
        self.view = Some(view);
        self
    }

    /// Sets the [`Config`].
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Declares the `child` filter as depending on the `parent` one, so
    /// changing the `parent` clears the `child`.
    #[must_use]
    pub fn dependent_filter(
        mut self,
        parent: impl Into<String>,
        child: impl Into<String>,
    ) -> Self {
        self.dependents
            .entry(parent.into())
            .or_default()
            .push(child.into());
        self
    }

    /// Sets the initial search term, without fetching anything.
    #[must_use]
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = term.into().trim().to_owned();
        self
    }

    /// Sets the initial value of the `key` filter, without fetching
    /// anything.
    #[must_use]
    pub fn filter(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        _ = self.filters.set(key, value);
        self
    }

    /// Builds the [`DataTable`].
    ///
    /// # Errors
    ///
    /// If no fetcher or view is set, or the initial page size is `0`.
    pub fn build(self) -> Result<DataTable<T, F, V>, ConfigError> {
        let Self {
            config,
            fetcher,
            view,
            dependents,
            search,
            filters,
            _items,
        } = self;

        let fetcher = fetcher.ok_or(ConfigError::MissingFetcher)?;
        let view = view.ok_or(ConfigError::MissingView)?;
        let query = QueryState {
            search,
            filters,
            ..QueryState::new(config.page_size)
                .ok_or(ConfigError::ZeroPageSize)?
        };

        Ok(DataTable {
            shared: Rc::new(Shared {
                config,
                fetcher,
                view,
                dependents,
                state: RefCell::new(State {
                    query,
                    total_pages: None,
                    issued: 0,
                    applied: 0,
                    in_flight: 0,
                    debounce: None,
                }),
                pending: watch::Sender::new(0),
                _items,
            }),
        })
    }
}

/// Error of building a [`DataTable`].
#[derive(Clone, Copy, Debug, Display, Eq, Error, PartialEq)]
pub enum ConfigError {
    /// No [`Fetch`] implementation is set.
    #[display("no page fetcher is configured")]
    MissingFetcher,

    /// No [`View`] is set.
    #[display("no view is configured")]
    MissingView,

    /// Initial page size is `0`.
    #[display("page size must be positive")]
    ZeroPageSize,
}

#[cfg(test)]
mod spec {
    use std::{
        cell::{Cell, RefCell},
        fmt, future, mem,
        rc::Rc,
        time::Duration,
    };

    use common::{handler, PageResult, QueryState};
    use serde_json::json;
    use tokio::{
        sync::oneshot,
        task::{self, LocalSet},
        time,
    };

    use super::{
        Config, ConfigError, DataTable, Empty, Fetch, FetchError, Rows,
        Status, View,
    };

    #[derive(Clone, Debug, PartialEq)]
    enum Event {
        Loading,
        Empty(String),
        Items(Vec<String>),
        Failed(String),
        Pager {
            page: u32,
            has_next: bool,
            hidden: bool,
        },
        Summary(String),
    }

    #[derive(Clone, Debug, Default)]
    struct Recorder(Rc<RefCell<Vec<Event>>>);

    impl Recorder {
        fn take(&self) -> Vec<Event> {
            mem::take(&mut *self.0.borrow_mut())
        }
    }

    impl<T: fmt::Debug> View<T> for Recorder {
        fn render_rows(&self, rows: Rows<'_, T>) {
            self.0.borrow_mut().push(match rows {
                Rows::Loading => Event::Loading,
                Rows::Empty(Empty::NoRecords) => Event::Empty("no records".into()),
                Rows::Empty(Empty::NoSearchResults { term }) => {
                    Event::Empty(format!("no results for {term}"))
                }
                Rows::Empty(Empty::NoFilterResults) => {
                    Event::Empty("no filter results".into())
                }
                Rows::Items(items) => {
                    Event::Items(items.iter().map(|i| format!("{i:?}")).collect())
                }
                Rows::Failed(e) => Event::Failed(e.to_string()),
            });
        }

        fn render_pager(&self, page: &PageResult<T>) {
            self.0.borrow_mut().push(Event::Pager {
                page: page.current_page,
                has_next: page.has_next,
                hidden: page.pager(2).is_none(),
            });
        }

        fn render_summary(&self, page: &PageResult<T>) {
            self.0
                .borrow_mut()
                .push(Event::Summary(page.summary().to_string()));
        }
    }

    type Calls = Rc<RefCell<Vec<QueryState>>>;

    type Reply = oneshot::Sender<Result<PageResult<u32>, FetchError>>;

    fn items(range: impl IntoIterator<Item = u32>) -> Event {
        Event::Items(range.into_iter().map(|n| n.to_string()).collect())
    }

    fn page_of(q: &QueryState, total: u64) -> PageResult<u32> {
        let first = q.offset();
        let last = total.min(first + u64::from(q.page_size));
        let items = (first..last).map(|n| u32::try_from(n).unwrap()).collect();
        PageResult::new(items, total, q.page, q.page_size)
    }

    fn instant(
        calls: &Calls,
        total: u64,
    ) -> impl Fetch<QueryState, Ok = PageResult<u32>, Err = FetchError> {
        let calls = Rc::clone(calls);
        handler::from_fn(move |q: QueryState| {
            calls.borrow_mut().push(q.clone());
            future::ready(Ok(page_of(&q, total)))
        })
    }

    fn controlled(
        requests: &Rc<RefCell<Vec<(QueryState, Reply)>>>,
    ) -> impl Fetch<QueryState, Ok = PageResult<u32>, Err = FetchError> {
        let requests = Rc::clone(requests);
        handler::from_fn(move |q: QueryState| {
            let (tx, rx) = oneshot::channel();
            requests.borrow_mut().push((q, tx));
            async move {
                rx.await
                    .unwrap_or_else(|_| Err(FetchError::other("cancelled")))
            }
        })
    }

    async fn run_tasks() {
        for _ in 0..8 {
            task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn resets_page_on_size_and_filter_changes() {
        LocalSet::new()
            .run_until(async {
                let calls = Calls::default();
                let table: DataTable<u32, _, _> = DataTable::builder()
                    .fetch_page(instant(&calls, 95))
                    .view(Recorder::default())
                    .build()
                    .unwrap();

                table.go_to_page(3);
                assert_eq!(table.state().page, 3);

                table.set_page_size(25);
                assert_eq!(table.state().page, 1);
                assert_eq!(table.state().page_size, 25);

                table.go_to_page(2);
                table.set_filter("location", "7");
                assert_eq!(table.state().page, 1);
                assert_eq!(table.state().filters.get("location"), Some("7"));

                table.go_to_page(4);
                table.set_page_size(0);
                assert_eq!(table.state().page, 4);
                assert_eq!(table.state().page_size, 25);

                table.settled().await;
                assert_eq!(calls.borrow().len(), 5);
                assert_eq!(table.status(), Status::Idle);
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn same_page_fetches_nothing() {
        LocalSet::new()
            .run_until(async {
                let calls = Calls::default();
                let table: DataTable<u32, _, _> = DataTable::builder()
                    .fetch_page(instant(&calls, 35))
                    .view(Recorder::default())
                    .build()
                    .unwrap();

                table.reload();
                table.settled().await;
                table.go_to_page(table.state().page);
                table.settled().await;

                assert_eq!(calls.borrow().len(), 1);
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn ignores_out_of_range_pages() {
        LocalSet::new()
            .run_until(async {
                let calls = Calls::default();
                let view = Recorder::default();
                let table: DataTable<u32, _, _> = DataTable::builder()
                    .fetch_page(instant(&calls, 35))
                    .view(view.clone())
                    .build()
                    .unwrap();

                table.reload();
                table.settled().await;
                _ = view.take();

                table.go_to_page(0);
                table.go_to_page(5);
                table.previous_page();
                table.settled().await;

                assert_eq!(calls.borrow().len(), 1);
                assert_eq!(table.state().page, 1);
                assert!(view.take().is_empty());

                table.go_to_page(4);
                table.next_page();
                table.settled().await;

                assert_eq!(calls.borrow().len(), 2);
                assert_eq!(table.state().page, 4);
                assert_eq!(
                    view.take(),
                    [
                        Event::Loading,
                        items(30..35),
                        Event::Pager {
                            page: 4,
                            has_next: false,
                            hidden: false,
                        },
                        Event::Summary("Showing 31 to 35 of 35 entries".into()),
                    ],
                );
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn discards_response_arriving_after_newer_one() {
        LocalSet::new()
            .run_until(async {
                let requests = Rc::default();
                let view = Recorder::default();
                let table: DataTable<u32, _, _> = DataTable::builder()
                    .fetch_page(controlled(&requests))
                    .view(view.clone())
                    .build()
                    .unwrap();

                table.go_to_page(2);
                table.go_to_page(3);
                run_tasks().await;

                let (b, b_reply) = requests.borrow_mut().pop().unwrap();
                let (a, a_reply) = requests.borrow_mut().pop().unwrap();
                assert_eq!((a.page, b.page), (2, 3));

                _ = b_reply.send(Ok(page_of(&b, 35)));
                run_tasks().await;
                _ = a_reply.send(Ok(page_of(&a, 35)));
                table.settled().await;

                assert_eq!(
                    view.take(),
                    [
                        Event::Loading,
                        Event::Loading,
                        items(20..30),
                        Event::Pager {
                            page: 3,
                            has_next: true,
                            hidden: false,
                        },
                        Event::Summary("Showing 21 to 30 of 35 entries".into()),
                    ],
                );
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn discards_response_of_superseded_state() {
        LocalSet::new()
            .run_until(async {
                let requests = Rc::default();
                let view = Recorder::default();
                let table: DataTable<u32, _, _> = DataTable::builder()
                    .fetch_page(controlled(&requests))
                    .view(view.clone())
                    .build()
                    .unwrap();

                table.go_to_page(2);
                table.go_to_page(3);
                run_tasks().await;

                let (b, b_reply) = requests.borrow_mut().pop().unwrap();
                let (a, a_reply) = requests.borrow_mut().pop().unwrap();

                _ = a_reply.send(Err(FetchError::other("too late")));
                run_tasks().await;
                assert_eq!(view.take(), [Event::Loading, Event::Loading]);

                _ = b_reply.send(Ok(page_of(&b, 35)));
                table.settled().await;

                assert_eq!(view.take()[0], items(20..30));
                assert_eq!(a.page, 2);
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn debounces_search() {
        LocalSet::new()
            .run_until(async {
                let calls = Calls::default();
                let table: DataTable<u32, _, _> = DataTable::builder()
                    .fetch_page(instant(&calls, 35))
                    .view(Recorder::default())
                    .config(Config {
                        debounce: Duration::from_millis(300),
                        ..Config::default()
                    })
                    .build()
                    .unwrap();

                table.go_to_page(2);
                table.settled().await;
                calls.borrow_mut().clear();

                for term in ["c", "co", "cor", "cori", " coriolis "] {
                    table.set_search_term(term);
                    assert_eq!(table.state().page, 1);
                    time::sleep(Duration::from_millis(50)).await;
                }
                assert!(calls.borrow().is_empty());
                assert_eq!(table.status(), Status::Loading);

                table.settled().await;

                let calls = calls.borrow();
                assert_eq!(calls.len(), 1);
                assert_eq!(calls[0].search, "coriolis");
                assert_eq!(calls[0].page, 1);
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn immediate_trigger_replaces_pending_search() {
        LocalSet::new()
            .run_until(async {
                let calls = Calls::default();
                let table: DataTable<u32, _, _> = DataTable::builder()
                    .fetch_page(instant(&calls, 35))
                    .view(Recorder::default())
                    .build()
                    .unwrap();

                table.set_search_term("flow");
                table.set_filter("location", "1");
                table.settled().await;
                time::sleep(Duration::from_secs(1)).await;

                let calls = calls.borrow();
                assert_eq!(calls.len(), 1);
                assert_eq!(calls[0].search, "flow");
                assert_eq!(calls[0].filters.get("location"), Some("1"));
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn distinguishes_empty_results() {
        LocalSet::new()
            .run_until(async {
                let calls = Calls::default();
                let view = Recorder::default();
                let table: DataTable<u32, _, _> = DataTable::builder()
                    .fetch_page(instant(&calls, 0))
                    .view(view.clone())
                    .build()
                    .unwrap();

                table.reload();
                table.settled().await;
                assert_eq!(view.take()[1], Event::Empty("no records".into()));

                table.set_search_term("zzz");
                table.settled().await;
                assert_eq!(
                    view.take()[1],
                    Event::Empty("no results for zzz".into()),
                );

                table.set_search_term("");
                table.set_filter("location", "9");
                table.settled().await;
                assert_eq!(
                    view.take()[1],
                    Event::Empty("no filter results".into()),
                );
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn hides_pager_of_single_page() {
        LocalSet::new()
            .run_until(async {
                let view = Recorder::default();
                let table: DataTable<serde_json::Value, _, _> =
                    DataTable::builder()
                        .fetch_page(handler::from_fn(|_: QueryState| {
                            future::ready(Ok::<_, FetchError>(json!({
                                "results": [{"id": 1, "name": "A"}],
                                "count": 1,
                                "current_page": 1,
                                "total_pages": 1,
                                "has_previous": false,
                                "has_next": false,
                            })))
                        }))
                        .view(view.clone())
                        .build()
                        .unwrap();

                table.reload();
                table.settled().await;

                let events = view.take();
                assert_eq!(events.len(), 4);
                assert_eq!(
                    events[2],
                    Event::Pager {
                        page: 1,
                        has_next: false,
                        hidden: true,
                    },
                );
                assert_eq!(
                    events[3],
                    Event::Summary("Showing 1 to 1 of 1 entries".into()),
                );
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn reports_malformed_payload() {
        LocalSet::new()
            .run_until(async {
                let view = Recorder::default();
                let table: DataTable<serde_json::Value, _, _> =
                    DataTable::builder()
                        .fetch_page(handler::from_fn(|_: QueryState| {
                            future::ready(Ok::<_, FetchError>(
                                json!({"detail": "nope"}),
                            ))
                        }))
                        .view(view.clone())
                        .build()
                        .unwrap();

                table.reload();
                table.settled().await;

                let events = view.take();
                assert_eq!(events.len(), 2);
                assert!(matches!(
                    &events[1],
                    Event::Failed(msg) if msg.starts_with("malformed payload"),
                ));
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn reports_failure_and_recovers_on_reload() {
        LocalSet::new()
            .run_until(async {
                let attempts = Rc::new(Cell::new(0));
                let view = Recorder::default();
                let table: DataTable<u32, _, _> = DataTable::builder()
                    .fetch_page(handler::from_fn({
                        let attempts = Rc::clone(&attempts);
                        move |q: QueryState| {
                            let n = attempts.get();
                            attempts.set(n + 1);
                            future::ready(if n == 0 {
                                Err(FetchError::other("network down"))
                            } else {
                                Ok(page_of(&q, 5))
                            })
                        }
                    }))
                    .view(view.clone())
                    .build()
                    .unwrap();
                let before = table.state();

                table.reload();
                table.settled().await;

                assert_eq!(
                    view.take(),
                    [Event::Loading, Event::Failed("network down".into())],
                );
                assert_eq!(table.state(), before);

                table.reload();
                table.settled().await;

                assert_eq!(attempts.get(), 2);
                assert_eq!(
                    view.take(),
                    [
                        Event::Loading,
                        items(0..5),
                        Event::Pager {
                            page: 1,
                            has_next: false,
                            hidden: true,
                        },
                        Event::Summary("Showing 1 to 5 of 5 entries".into()),
                    ],
                );
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn clears_dependent_filters() {
        LocalSet::new()
            .run_until(async {
                let calls = Calls::default();
                let table: DataTable<u32, _, _> = DataTable::builder()
                    .fetch_page(instant(&calls, 35))
                    .view(Recorder::default())
                    .dependent_filter("location", "equipment_type")
                    .dependent_filter("equipment_type", "meter")
                    .dependent_filter("meter", "location")
                    .build()
                    .unwrap();

                table.set_filter("equipment_type", "2");
                table.set_filter("meter", "5");
                table.set_filter("criticality", "high");
                table.set_filter("location", "1");

                let filters = table.state().filters;
                assert_eq!(filters.get("location"), Some("1"));
                assert_eq!(filters.get("criticality"), Some("high"));
                assert_eq!(filters.len(), 2);

                table.clear_filter("location");
                assert_eq!(table.state().filters.len(), 1);

                table.reset();
                let state = table.state();
                assert!(state.filters.is_empty());
                assert!(state.search.is_empty());

                table.settled().await;
            })
            .await;
    }

    type EmptyPage = future::Ready<Result<PageResult<u32>, FetchError>>;

    fn empty_page(q: QueryState) -> EmptyPage {
        future::ready(Ok(PageResult::new(vec![], 0, q.page, q.page_size)))
    }

    #[tokio::test(start_paused = true)]
    async fn seeds_initial_query_without_fetching() {
        LocalSet::new()
            .run_until(async {
                let calls = Calls::default();
                let table: DataTable<u32, _, _> = DataTable::builder()
                    .fetch_page(instant(&calls, 35))
                    .view(Recorder::default())
                    .search(" meter ")
                    .filter("location", "2")
                    .build()
                    .unwrap();

                let state = table.state();
                assert_eq!(state.search, "meter");
                assert_eq!(state.filters.get("location"), Some("2"));
                assert_eq!(table.status(), Status::Idle);

                table.go_to_page(2);
                table.settled().await;

                assert_eq!(calls.borrow().len(), 1);
                assert_eq!(calls.borrow()[0].search, "meter");
            })
            .await;
    }

    #[test]
    fn requires_fetcher_and_view() {
        type NoFetch = handler::FromFn<fn(QueryState) -> EmptyPage>;

        let fetch: NoFetch =
            handler::from_fn::<fn(QueryState) -> EmptyPage>(empty_page);

        assert_eq!(
            DataTable::<u32, NoFetch, Recorder>::builder()
                .view(Recorder::default())
                .build()
                .unwrap_err(),
            ConfigError::MissingFetcher,
        );
        assert_eq!(
            DataTable::<u32, NoFetch, Recorder>::builder()
                .fetch_page(fetch)
                .build()
                .unwrap_err(),
            ConfigError::MissingView,
        );
        assert_eq!(
            DataTable::<u32, NoFetch, Recorder>::builder()
                .fetch_page(fetch)
                .view(Recorder::default())
                .config(Config {
                    page_size: 0,
                    ..Config::default()
                })
                .build()
                .unwrap_err(),
            ConfigError::ZeroPageSize,
        );
    }
}
