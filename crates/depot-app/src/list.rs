// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};
use tracing::{debug, warn};

use crate::paging::{DEFAULT_PAGE_SIZE, PageWindow, PageWindowMode};
use crate::{Entity, EntityKind, FilterSet, FilterValue, Refiner, RowKey};
use crate::{SelectionState, SelectionTracker};

pub const UNKNOWN_ERROR: &str = "Unknown error";

/// One page of rows as returned by a list endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<R> {
    pub items: Vec<R>,
    pub total: Option<usize>,
}

impl<R> Page<R> {
    pub fn new(items: Vec<R>, total: Option<usize>) -> Self {
        Self { items, total }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageQuery {
    pub filters: Vec<(String, String)>,
    pub page: usize,
    pub page_size: usize,
}

impl PageQuery {
    pub fn filter(&self, name: &str) -> Option<&str> {
        self.filters
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = self.filters.clone();
        pairs.push(("page".to_owned(), self.page.to_string()));
        pairs.push(("pageSize".to_owned(), self.page_size.to_string()));
        pairs
    }
}

/// A fetch the engine wants performed, tagged with its issue order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub generation: u64,
    pub query: PageQuery,
}

pub trait ListSource<R> {
    fn fetch_page(&mut self, query: &PageQuery) -> Result<Page<R>>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    Applied { fetched: usize, total: usize },
    Failed(String),
    /// A newer request was issued after this one; the result was dropped.
    Stale { generation: u64, latest: u64 },
    /// The total shrank below the current page. The page moved back to the
    /// new last page and this fetch must run next.
    Reissued(FetchRequest),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListCommand {
    SetServerFilter {
        name: String,
        value: Option<FilterValue>,
    },
    SetClientFilter {
        name: String,
        value: Option<FilterValue>,
    },
    Refetch,
    GoToPage(usize),
    NextPage,
    PrevPage,
    SetPageSize(usize),
    Toggle(RowKey),
    ToggleAllVisible(bool),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListEvent {
    FetchIssued(FetchRequest),
    Rejected(String),
    ClientFilterChanged { name: String, visible: usize },
    SelectionChanged(SelectionState),
    Ignored,
}

/// Paged list state for one entity screen: filters, page window, fetched
/// rows and the page-scoped selection.
#[derive(Debug, Clone)]
pub struct ListQuery<R: Entity> {
    server_filters: FilterSet,
    client_filters: FilterSet,
    window: PageWindow,
    items: Vec<R>,
    is_loading: bool,
    last_error: Option<String>,
    selection: SelectionTracker,
    refiner: Refiner<R>,
    latest_generation: u64,
}

impl<R: Entity> Default for ListQuery<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Entity> ListQuery<R> {
    pub fn new() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }

    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            server_filters: FilterSet::new(),
            client_filters: FilterSet::new(),
            window: PageWindow {
                page_size: page_size.max(1),
                ..PageWindow::default()
            },
            items: Vec::new(),
            is_loading: false,
            last_error: None,
            selection: SelectionTracker::new(),
            refiner: R::refiner(),
            latest_generation: 0,
        }
    }

    pub const fn kind(&self) -> EntityKind {
        R::KIND
    }

    pub fn dispatch(&mut self, command: ListCommand) -> Vec<ListEvent> {
        match command {
            ListCommand::SetServerFilter { name, value } => {
                match self.set_server_filter(&name, value) {
                    Ok(request) => vec![ListEvent::FetchIssued(request)],
                    Err(error) => vec![ListEvent::Rejected(error.to_string())],
                }
            }
            ListCommand::SetClientFilter { name, value } => {
                match self.set_client_filter(&name, value) {
                    Ok(()) => vec![
                        ListEvent::ClientFilterChanged {
                            name,
                            visible: self.visible_rows().count(),
                        },
                        ListEvent::SelectionChanged(self.selection_state()),
                    ],
                    Err(error) => vec![ListEvent::Rejected(error.to_string())],
                }
            }
            ListCommand::Refetch => vec![ListEvent::FetchIssued(self.refetch())],
            ListCommand::GoToPage(page) => issued(self.go_to_page(page)),
            ListCommand::NextPage => issued(self.next_page()),
            ListCommand::PrevPage => issued(self.prev_page()),
            ListCommand::SetPageSize(size) => issued(self.set_page_size(size)),
            ListCommand::Toggle(key) => {
                self.toggle(&key);
                vec![ListEvent::SelectionChanged(self.selection_state())]
            }
            ListCommand::ToggleAllVisible(checked) => {
                self.toggle_all_visible(checked);
                vec![ListEvent::SelectionChanged(self.selection_state())]
            }
        }
    }

    /// Always resets to page 1 and refetches, even when the value is unchanged.
    pub fn set_server_filter(
        &mut self,
        name: &str,
        value: Option<FilterValue>,
    ) -> Result<FetchRequest> {
        if !R::KIND.accepts_server_filter(name) {
            bail!(
                "{} has no server filter {name:?} -- use one of: {}",
                R::KIND.label(),
                R::KIND.server_filters().join(", ")
            );
        }
        if R::KIND.is_numeric_filter(name)
            && let Some(value) = &value
            && !value.to_string().trim().is_empty()
            && !value.is_integer()
        {
            bail!("{name} must be a whole number, got {value:?}", value = value.to_string());
        }
        self.server_filters.set(name, value);
        self.window.page = 1;
        Ok(self.refetch())
    }

    /// Narrows the fetched page only; never refetches or moves the page.
    pub fn set_client_filter(&mut self, name: &str, value: Option<FilterValue>) -> Result<()> {
        if !self.refiner.accepts(name) {
            let known = self.refiner.names().collect::<Vec<_>>();
            if known.is_empty() {
                bail!("{} has no client filters", R::KIND.label());
            }
            bail!(
                "{} has no client filter {name:?} -- use one of: {}",
                R::KIND.label(),
                known.join(", ")
            );
        }
        self.client_filters.set(name, value);
        Ok(())
    }

    pub fn refetch(&mut self) -> FetchRequest {
        self.latest_generation += 1;
        self.is_loading = true;
        self.last_error = None;
        let request = FetchRequest {
            generation: self.latest_generation,
            query: self.query(),
        };
        debug!(
            kind = R::KIND.as_str(),
            generation = request.generation,
            page = request.query.page,
            "fetch issued"
        );
        request
    }

    pub fn query(&self) -> PageQuery {
        PageQuery {
            filters: self.server_filters.to_query_pairs(),
            page: self.window.page,
            page_size: self.window.page_size,
        }
    }

    /// Applies a fetch result unless a newer request has been issued since.
    pub fn complete(&mut self, generation: u64, result: Result<Page<R>>) -> Completion {
        if generation != self.latest_generation {
            debug!(
                kind = R::KIND.as_str(),
                generation,
                latest = self.latest_generation,
                "stale fetch result discarded"
            );
            return Completion::Stale {
                generation,
                latest: self.latest_generation,
            };
        }

        self.is_loading = false;
        self.selection.clear();
        match result {
            Ok(page) => {
                let fetched = page.items.len();
                let total = page.total.unwrap_or(fetched);
                self.items = page.items;
                self.window.total_items = total;
                self.window.fetched = fetched;
                let last_page = self.window.total_pages();
                if self.window.page > last_page {
                    debug!(
                        kind = R::KIND.as_str(),
                        page = self.window.page,
                        last_page,
                        "page past the end after total shrank"
                    );
                    self.window.page = last_page;
                    return Completion::Reissued(self.refetch());
                }
                Completion::Applied { fetched, total }
            }
            Err(error) => {
                let message = error_message(&error);
                warn!(kind = R::KIND.as_str(), generation, "fetch failed: {message}");
                self.items.clear();
                self.window.total_items = 0;
                self.window.fetched = 0;
                self.last_error = Some(message.clone());
                Completion::Failed(message)
            }
        }
    }

    pub fn load<S>(&mut self, source: &mut S, request: FetchRequest) -> Completion
    where
        S: ListSource<R> + ?Sized,
    {
        let mut request = request;
        loop {
            let result = source.fetch_page(&request.query);
            match self.complete(request.generation, result) {
                Completion::Reissued(next) => request = next,
                other => return other,
            }
        }
    }

    pub fn refresh<S>(&mut self, source: &mut S) -> Completion
    where
        S: ListSource<R> + ?Sized,
    {
        let request = self.refetch();
        self.load(source, request)
    }

    pub fn go_to_page(&mut self, page: usize) -> Option<FetchRequest> {
        if page == self.window.page || !self.window.contains_page(page) {
            return None;
        }
        self.window.page = page;
        Some(self.refetch())
    }

    pub fn next_page(&mut self) -> Option<FetchRequest> {
        if self.is_loading || self.window.is_last_page() {
            return None;
        }
        self.window.page += 1;
        Some(self.refetch())
    }

    pub fn prev_page(&mut self) -> Option<FetchRequest> {
        if self.is_loading || self.window.page == 1 {
            return None;
        }
        self.window.page -= 1;
        Some(self.refetch())
    }

    pub fn set_page_size(&mut self, page_size: usize) -> Option<FetchRequest> {
        if page_size == 0 {
            return None;
        }
        self.window.page_size = page_size;
        self.window.page = 1;
        Some(self.refetch())
    }

    pub fn page(&self) -> usize {
        self.window.page
    }

    pub fn page_size(&self) -> usize {
        self.window.page_size
    }

    pub fn total_items(&self) -> usize {
        self.window.total_items
    }

    pub fn total_pages(&self) -> usize {
        self.window.total_pages()
    }

    pub fn is_last_page(&self) -> bool {
        self.window.is_last_page()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn window(&self) -> PageWindow {
        self.window
    }

    pub fn from_index(&self) -> usize {
        self.window.from_index()
    }

    pub fn to_index(&self) -> usize {
        self.window.to_index()
    }

    pub fn page_window(&self, mode: PageWindowMode) -> Vec<usize> {
        mode.pages(self.window.page, self.total_pages())
    }

    pub fn items(&self) -> &[R] {
        &self.items
    }

    pub fn server_filters(&self) -> &FilterSet {
        &self.server_filters
    }

    pub fn client_filters(&self) -> &FilterSet {
        &self.client_filters
    }

    pub fn refiner(&self) -> &Refiner<R> {
        &self.refiner
    }

    pub fn visible_rows(&self) -> impl Iterator<Item = &R> {
        self.refiner.apply(&self.items, &self.client_filters)
    }

    pub fn visible_keys(&self) -> Vec<RowKey> {
        self.visible_rows().map(Entity::row_key).collect()
    }

    pub fn toggle(&mut self, key: &RowKey) {
        self.selection.toggle(key);
    }

    pub fn toggle_all_visible(&mut self, checked: bool) {
        let visible = self.visible_keys();
        self.selection.toggle_all_visible(checked, &visible);
    }

    pub fn is_selected(&self, key: &RowKey) -> bool {
        self.selection.is_selected(key)
    }

    pub fn is_all_selected(&self) -> bool {
        self.selection.is_all_selected(&self.visible_keys())
    }

    pub fn is_some_selected(&self) -> bool {
        self.selection.is_some_selected(&self.visible_keys())
    }

    pub fn selection_state(&self) -> SelectionState {
        self.selection.state(&self.visible_keys())
    }

    pub fn selected_keys(&self) -> Vec<RowKey> {
        self.selection.keys().cloned().collect()
    }

    pub fn selection(&self) -> &SelectionTracker {
        &self.selection
    }
}

fn issued(request: Option<FetchRequest>) -> Vec<ListEvent> {
    match request {
        Some(request) => vec![ListEvent::FetchIssued(request)],
        None => vec![ListEvent::Ignored],
    }
}

fn error_message(error: &anyhow::Error) -> String {
    let message = error.to_string();
    if message.trim().is_empty() {
        UNKNOWN_ERROR.to_owned()
    } else {
        message
    }
}
