//! Client list view-model: filters, ordering, pagination and selection

mod sort;

pub use sort::*;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::clients::{ClientApi, ClientQuery, ClientRecord, ClientType};
use crate::error::Error;

/// Page sizes offered by the table footer
pub const PAGE_SIZE_OPTIONS: [usize; 3] = [5, 10, 25];

/// Quiet period between the last search keystroke and the list fetch
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

/// Mutable list state behind the registry
#[derive(Debug, Clone)]
struct ListState {
    filter_text: String,
    filter_type: Option<ClientType>,
    sort_key: SortKey,
    sort_direction: SortDirection,
    page: usize,
    page_size: usize,
    selected: Vec<String>,
    records: Vec<ClientRecord>,
}

impl ListState {
    fn new(page_size: usize) -> Self {
        Self {
            filter_text: String::new(),
            filter_type: None,
            sort_key: SortKey::Name,
            sort_direction: SortDirection::Asc,
            page: 0,
            page_size,
            selected: Vec::new(),
            records: Vec::new(),
        }
    }
}

/// View-model of the client list screen.
///
/// Filtering is delegated to the server; ordering, pagination and
/// selection are local. Clones are cheap and share the same state, which
/// is what the debounced fetch task relies on.
#[derive(Clone)]
pub struct ClientRegistry {
    /// API collaborator the list is fetched through
    api: Arc<dyn ClientApi>,
    /// Current list state
    state: Arc<Mutex<ListState>>,
    /// Quiet period of the debounced search fetch
    debounce: Duration,
    /// Stamp of the most recently issued list fetch
    issued: Arc<AtomicU64>,
    /// Scheduled debounced fetch, aborted when a newer keystroke arrives
    pending: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl ClientRegistry {
    /// Create a registry fetching through the given API collaborator
    pub fn new(api: Arc<dyn ClientApi>) -> Self {
        Self::with_settings(api, PAGE_SIZE_OPTIONS[0], SEARCH_DEBOUNCE)
    }

    /// Create a registry with a custom initial page size and debounce
    /// window. A page size outside the footer options falls back to the
    /// smallest one.
    pub fn with_settings(api: Arc<dyn ClientApi>, page_size: usize, debounce: Duration) -> Self {
        let page_size = if PAGE_SIZE_OPTIONS.contains(&page_size) {
            page_size
        } else {
            PAGE_SIZE_OPTIONS[0]
        };

        Self {
            api,
            state: Arc::new(Mutex::new(ListState::new(page_size))),
            debounce,
            issued: Arc::new(AtomicU64::new(0)),
            pending: Arc::new(Mutex::new(None)),
        }
    }

    /// Fetch the list under the current filters and replace the loaded
    /// records wholesale.
    ///
    /// A failed fetch leaves the previous records untouched. A response
    /// overtaken by a newer fetch is discarded.
    pub async fn refresh(&self) -> Result<(), Error> {
        let seq = self.next_seq();
        self.fetch_and_apply(seq).await
    }

    /// Update the search text.
    ///
    /// Resets to the first page and schedules a fetch after the quiet
    /// period; only the last call within that window actually fires.
    pub fn set_filter_text(&self, text: &str) {
        {
            let mut state = self.state.lock().unwrap();
            state.filter_text = text.to_string();
            state.page = 0;
        }

        let registry = self.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(registry.debounce).await;
            let seq = registry.next_seq();
            // failures are logged where the fetch is applied
            let _ = registry.fetch_and_apply(seq).await;
        });

        let mut pending = self.pending.lock().unwrap();
        if let Some(previous) = pending.replace(handle) {
            previous.abort();
        }
    }

    /// Update the category constraint.
    ///
    /// Resets to the first page and refreshes immediately; category
    /// changes are discrete events, not keystrokes.
    pub async fn set_filter_type(&self, filter: Option<ClientType>) -> Result<(), Error> {
        {
            let mut state = self.state.lock().unwrap();
            state.filter_type = filter;
            state.page = 0;
        }
        self.refresh().await
    }

    /// Order by the given column, toggling the direction when it is
    /// already the active sort. Local only, nothing is refetched.
    pub fn set_sort(&self, key: SortKey) {
        let mut state = self.state.lock().unwrap();
        if state.sort_key == key {
            state.sort_direction = state.sort_direction.toggled();
        } else {
            state.sort_key = key;
            state.sort_direction = SortDirection::Asc;
        }
    }

    /// Move to the given page of the sorted records
    pub fn set_page(&self, page: usize) {
        self.state.lock().unwrap().page = page;
    }

    /// Change the page size.
    ///
    /// Values outside the footer options are ignored; an accepted change
    /// resets to the first page.
    pub fn set_page_size(&self, page_size: usize) {
        if !PAGE_SIZE_OPTIONS.contains(&page_size) {
            return;
        }

        let mut state = self.state.lock().unwrap();
        state.page_size = page_size;
        state.page = 0;
    }

    /// Toggle one row in or out of the selection
    pub fn toggle_select(&self, id: &str) {
        let mut state = self.state.lock().unwrap();
        if let Some(position) = state.selected.iter().position(|selected| selected == id) {
            state.selected.remove(position);
        } else {
            state.selected.push(id.to_string());
        }
    }

    /// Select every loaded row, or clear the selection
    pub fn select_all(&self, checked: bool) {
        let mut state = self.state.lock().unwrap();
        state.selected = if checked {
            state.records.iter().map(|record| record.client_id.clone()).collect()
        } else {
            Vec::new()
        };
    }

    /// Delete one record, then refresh under the current filters.
    ///
    /// A failed delete is logged and propagated without refreshing.
    pub async fn delete_one(&self, id: &str) -> Result<(), Error> {
        if let Err(err) = self.api.delete(id).await {
            log::error!("failed to delete client {}: {}", id, err);
            return Err(err);
        }
        self.refresh().await
    }

    /// Delete every selected record, one id at a time in selection order.
    ///
    /// The first failing delete halts the run: ids before it are gone on
    /// the server, the selection is left as it was and nothing is
    /// refreshed. A complete run clears the selection and refreshes.
    pub async fn delete_selected(&self) -> Result<(), Error> {
        let selected = self.selected();
        for id in &selected {
            if let Err(err) = self.api.delete(id).await {
                log::error!("failed to delete client {}: {}", id, err);
                return Err(err);
            }
        }

        self.select_all(false);
        self.refresh().await
    }

    /// Records of the current page, ordered by the active sort
    pub fn visible_slice(&self) -> Vec<ClientRecord> {
        let state = self.state.lock().unwrap();
        let sorted = sort_records(&state.records, state.sort_key, state.sort_direction);
        page_slice(&sorted, state.page, state.page_size)
    }

    /// Whether the current search produced no rows, as opposed to no
    /// data being loaded at all
    pub fn is_empty_result(&self) -> bool {
        let state = self.state.lock().unwrap();
        let visible = page_slice(
            &sort_records(&state.records, state.sort_key, state.sort_direction),
            state.page,
            state.page_size,
        );
        visible.is_empty() && !state.filter_text.is_empty()
    }

    /// Filler rows needed to keep the last page the same height
    pub fn empty_rows(&self) -> usize {
        let state = self.state.lock().unwrap();
        empty_rows(state.page, state.page_size, state.records.len())
    }

    /// Loaded records in fetched order
    pub fn records(&self) -> Vec<ClientRecord> {
        self.state.lock().unwrap().records.clone()
    }

    /// Selected row ids in the order they were picked
    pub fn selected(&self) -> Vec<String> {
        self.state.lock().unwrap().selected.clone()
    }

    /// Current search text
    pub fn filter_text(&self) -> String {
        self.state.lock().unwrap().filter_text.clone()
    }

    /// Current category constraint
    pub fn filter_type(&self) -> Option<ClientType> {
        self.state.lock().unwrap().filter_type
    }

    /// Active sort column and direction
    pub fn sort(&self) -> (SortKey, SortDirection) {
        let state = self.state.lock().unwrap();
        (state.sort_key, state.sort_direction)
    }

    /// Current page index
    pub fn page(&self) -> usize {
        self.state.lock().unwrap().page
    }

    /// Current page size
    pub fn page_size(&self) -> usize {
        self.state.lock().unwrap().page_size
    }

    /// Stamp the next fetch
    fn next_seq(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Fetch under the current filters and apply the response unless a
    /// newer fetch has been issued since
    async fn fetch_and_apply(&self, seq: u64) -> Result<(), Error> {
        let query = self.current_query();
        match self.api.list(&query).await {
            Ok(records) => {
                let mut state = self.state.lock().unwrap();
                if self.issued.load(Ordering::SeqCst) != seq {
                    log::debug!("discarding client list response overtaken by fetch {}", seq);
                    return Ok(());
                }

                // selections only survive if their row came back
                state
                    .selected
                    .retain(|id| records.iter().any(|record| record.client_id == *id));
                state.records = records;
                Ok(())
            }
            Err(err) => {
                log::error!("failed to fetch clients: {}", err);
                Err(err)
            }
        }
    }

    /// Constraints the next fetch is issued under
    fn current_query(&self) -> ClientQuery {
        let state = self.state.lock().unwrap();
        ClientQuery {
            client_type: state.filter_type,
            search: if state.filter_text.is_empty() {
                None
            } else {
                Some(state.filter_text.clone())
            },
            ..ClientQuery::default()
        }
    }
}
