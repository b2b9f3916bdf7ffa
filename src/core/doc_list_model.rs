//! Request/response lifecycle for the paginated document list.
//!
//! Fetches run on spawned tasks and report back over a channel that the UI
//! drains on tick. Every request is stamped with a sequence number and only
//! the newest one may change state, so a slow early response can never
//! overwrite a later one. Dropping the model closes the channel; answers
//! arriving after that are discarded by the sender.

use std::sync::Arc;

use tokio::sync::mpsc;

use super::documents::{ApiError, Document, DocumentOrdering, DocumentsApi, ListError, Page, PageRequest};

// ── Listing ─────────────────────────────────────────────────────────────────

/// Pages fetched so far, concatenated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    /// Total matching documents on the server.
    pub count: usize,
    pub documents: Vec<Document>,
    /// Highest page number folded into `documents`.
    pub last_page: u32,
    exhausted: bool,
}

impl Listing {
    pub fn from_page(page_number: u32, page: Page) -> Self {
        let exhausted = page.results.is_empty() || page.next.is_none();
        Self {
            count: page.count,
            documents: page.results,
            last_page: page_number,
            exhausted,
        }
    }

    fn append(&mut self, page_number: u32, page: Page) {
        self.exhausted = page.results.is_empty() || page.next.is_none();
        self.count = page.count;
        self.last_page = page_number;
        self.documents.extend(page.results);
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Whether another page can be requested.
    pub fn has_more(&self) -> bool {
        !self.exhausted && self.documents.len() < self.count
    }
}

// ── State ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListState {
    /// Nothing requested yet.
    Idle,
    /// A request is in flight. `previous` is the content kept on screen
    /// during a refresh or next-page fetch; `None` on the first load.
    Loading { previous: Option<Listing> },
    Success(Listing),
    Error(ListError),
}

impl ListState {
    pub fn is_loading(&self) -> bool {
        matches!(self, ListState::Loading { .. })
    }

    pub fn listing(&self) -> Option<&Listing> {
        match self {
            ListState::Success(listing) => Some(listing),
            ListState::Loading { previous } => previous.as_ref(),
            ListState::Idle | ListState::Error(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FetchKind {
    Replace,
    Append,
}

#[derive(Debug)]
struct FetchOutcome {
    seq: u64,
    page: u32,
    kind: FetchKind,
    result: Result<Page, ApiError>,
}

// ── Model ───────────────────────────────────────────────────────────────────

pub struct DocListModel {
    api: Arc<dyn DocumentsApi>,
    ordering: DocumentOrdering,
    state: ListState,
    latest_seq: u64,
    outcome_tx: mpsc::UnboundedSender<FetchOutcome>,
    outcome_rx: mpsc::UnboundedReceiver<FetchOutcome>,
}

impl DocListModel {
    pub fn new(api: Arc<dyn DocumentsApi>) -> Self {
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        Self {
            api,
            ordering: DocumentOrdering::default(),
            state: ListState::Idle,
            latest_seq: 0,
            outcome_tx,
            outcome_rx,
        }
    }

    pub fn state(&self) -> &ListState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    /// Fetch page 1 from scratch. Nothing from an earlier request is shown
    /// while it loads.
    pub fn load_first(&mut self) {
        self.state = ListState::Loading { previous: None };
        self.spawn_fetch(1, FetchKind::Replace);
    }

    /// Re-fetch page 1 while keeping the current documents on screen.
    pub fn refresh(&mut self) {
        let previous = self.state.listing().cloned();
        self.state = ListState::Loading { previous };
        self.spawn_fetch(1, FetchKind::Replace);
    }

    /// Fetch the page after the last loaded one. Returns false when there is
    /// nothing more to load or a request is already running.
    pub fn next_page(&mut self) -> bool {
        let ListState::Success(listing) = &self.state else {
            return false;
        };
        if !listing.has_more() {
            return false;
        }
        let page = listing.last_page + 1;
        let previous = Some(listing.clone());
        self.state = ListState::Loading { previous };
        self.spawn_fetch(page, FetchKind::Append);
        true
    }

    fn spawn_fetch(&mut self, page: u32, kind: FetchKind) {
        self.latest_seq += 1;
        let seq = self.latest_seq;
        let mut request = PageRequest::new(page);
        request.ordering = self.ordering;

        log::debug!("Fetching documents page {page} (request #{seq})");

        let api = Arc::clone(&self.api);
        let tx = self.outcome_tx.clone();
        tokio::spawn(async move {
            let result = api.list(request).await;
            // Receiver gone means the list was torn down; nothing to update.
            let _ = tx.send(FetchOutcome {
                seq,
                page: request.page(),
                kind,
                result,
            });
        });
    }

    /// Apply finished fetches. Call from on_tick. Returns true when the
    /// state changed.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        while let Ok(outcome) = self.outcome_rx.try_recv() {
            changed |= self.apply(outcome);
        }
        changed
    }

    /// Wait until the latest request has been applied.
    pub async fn settle(&mut self) {
        while self.state.is_loading() {
            match self.outcome_rx.recv().await {
                Some(outcome) => {
                    self.apply(outcome);
                }
                None => break,
            }
        }
    }

    fn apply(&mut self, outcome: FetchOutcome) -> bool {
        if outcome.seq != self.latest_seq {
            log::debug!(
                "Dropping stale documents response #{} (latest is #{})",
                outcome.seq,
                self.latest_seq
            );
            return false;
        }

        let previous = match std::mem::replace(&mut self.state, ListState::Idle) {
            ListState::Loading { previous } => previous,
            // Latest request already applied; keep what we have.
            other => {
                self.state = other;
                return false;
            }
        };

        self.state = match (outcome.result, outcome.kind) {
            (Ok(page), FetchKind::Replace) => {
                log::debug!("Loaded documents page {} ({} total)", outcome.page, page.count);
                ListState::Success(Listing::from_page(outcome.page, page))
            }
            (Ok(page), FetchKind::Append) => match previous {
                Some(mut listing) => {
                    listing.append(outcome.page, page);
                    ListState::Success(listing)
                }
                None => ListState::Success(Listing::from_page(outcome.page, page)),
            },
            (Err(e), _) => {
                log::warn!("Failed to load documents page {}: {e}", outcome.page);
                ListState::Error(e.reason())
            }
        };
        true
    }
}
