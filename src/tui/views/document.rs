//! `/docs/{id}`: a single document, or the not-found page.

use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};
use tokio::sync::oneshot;
use tokio::time::Instant;

use crate::core::documents::{ApiError, Document, DocumentId, DocumentsApi, ListError};
use crate::tui::theme;

pub const NOT_FOUND_MESSAGE: &str =
    "It seems that the page you are looking for does not exist or cannot be displayed correctly.";
const LOADING_MESSAGE: &str = "Loading the document...";

#[derive(Debug, Clone, PartialEq)]
pub enum DocumentPhase {
    Loading { since: Instant },
    Loaded(Document),
    /// The server said 404; shown as not-found once the grace period is over.
    Missing { since: Instant },
    Failed(ListError),
}

/// What the view draws right now.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DocumentDisplay<'a> {
    Loading,
    Loaded(&'a Document),
    NotFound,
    Failed(ListError),
}

pub enum DocumentResult {
    Consumed,
    Home,
}

pub struct DocumentViewState {
    id: DocumentId,
    phase: DocumentPhase,
    grace: Duration,
    pending: Option<oneshot::Receiver<Result<Document, ApiError>>>,
    api: Arc<dyn DocumentsApi>,
}

impl DocumentViewState {
    /// Start fetching `id`. The state is tied to the route: dropping it
    /// discards a late answer.
    pub fn open(api: Arc<dyn DocumentsApi>, id: DocumentId, grace: Duration) -> Self {
        let mut state = Self {
            id,
            phase: DocumentPhase::Loading {
                since: Instant::now(),
            },
            grace,
            pending: None,
            api,
        };
        state.fetch();
        state
    }

    fn fetch(&mut self) {
        let (tx, rx) = oneshot::channel();
        let api = Arc::clone(&self.api);
        let id = self.id.clone();
        log::debug!("Fetching document {id}");
        tokio::spawn(async move {
            let _ = tx.send(api.retrieve(id).await);
        });
        self.pending = Some(rx);
        self.phase = DocumentPhase::Loading {
            since: Instant::now(),
        };
    }

    pub fn id(&self) -> &DocumentId {
        &self.id
    }

    pub fn phase(&self) -> &DocumentPhase {
        &self.phase
    }

    pub fn display(&self) -> DocumentDisplay<'_> {
        match &self.phase {
            DocumentPhase::Loading { .. } => DocumentDisplay::Loading,
            DocumentPhase::Loaded(doc) => DocumentDisplay::Loaded(doc),
            DocumentPhase::Missing { since } => {
                if since.elapsed() >= self.grace {
                    DocumentDisplay::NotFound
                } else {
                    DocumentDisplay::Loading
                }
            }
            DocumentPhase::Failed(reason) => DocumentDisplay::Failed(*reason),
        }
    }

    pub fn poll(&mut self) -> bool {
        let Some(rx) = self.pending.as_mut() else {
            return false;
        };
        match rx.try_recv() {
            Ok(result) => {
                self.pending = None;
                self.apply(result);
                true
            }
            Err(oneshot::error::TryRecvError::Empty) => false,
            Err(oneshot::error::TryRecvError::Closed) => {
                self.pending = None;
                self.apply(Err(ApiError::Network("request task ended".into())));
                true
            }
        }
    }

    pub async fn settle(&mut self) {
        if let Some(rx) = self.pending.take() {
            let result = rx
                .await
                .unwrap_or_else(|_| Err(ApiError::Network("request task ended".into())));
            self.apply(result);
        }
    }

    fn apply(&mut self, result: Result<Document, ApiError>) {
        let since = match self.phase {
            DocumentPhase::Loading { since } => since,
            _ => Instant::now(),
        };
        self.phase = match result {
            Ok(doc) => DocumentPhase::Loaded(doc),
            Err(e) if e.is_not_found() => {
                log::info!("Document {} not found", self.id);
                DocumentPhase::Missing { since }
            }
            Err(e) => {
                log::warn!("Failed to load document {}: {e}", self.id);
                DocumentPhase::Failed(e.reason())
            }
        };
    }

    pub fn handle_input(&mut self, event: &Event) -> Option<DocumentResult> {
        let Event::Key(KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            ..
        }) = event
        else {
            return None;
        };
        match code {
            KeyCode::Esc | KeyCode::Char('h') => Some(DocumentResult::Home),
            KeyCode::Char('r') if matches!(self.phase, DocumentPhase::Failed(_)) => {
                self.fetch();
                Some(DocumentResult::Consumed)
            }
            _ => None,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, focused: bool) {
        match self.display() {
            DocumentDisplay::NotFound => render_not_found(frame, area, focused),
            DocumentDisplay::Loading => {
                let block = theme::block(self.id.as_str(), focused);
                let inner = block.inner(area);
                frame.render_widget(block, area);
                frame.render_widget(
                    Paragraph::new(Line::from(Span::styled(LOADING_MESSAGE, theme::muted()))),
                    inner,
                );
            }
            DocumentDisplay::Failed(reason) => {
                let block = theme::block(self.id.as_str(), focused);
                let inner = block.inner(area);
                frame.render_widget(block, area);
                let lines = vec![
                    Line::from(Span::styled(
                        format!("Could not load the document ({}).", reason.as_str()),
                        theme::error(),
                    )),
                    Line::raw(""),
                    Line::from(vec![
                        Span::styled("r", theme::key_hint()),
                        Span::raw(":retry  "),
                        Span::styled("Esc", theme::key_hint()),
                        Span::raw(":home"),
                    ]),
                ];
                frame.render_widget(Paragraph::new(lines), inner);
            }
            DocumentDisplay::Loaded(doc) => {
                let block = theme::block("Document", focused);
                let inner = block.inner(area);
                frame.render_widget(block, area);
                frame.render_widget(
                    Paragraph::new(build_document_lines(doc)).wrap(Wrap { trim: false }),
                    inner,
                );
            }
        }
    }
}

fn build_document_lines(doc: &Document) -> Vec<Line<'_>> {
    let mut lines = vec![
        Line::from(Span::styled(doc.name.as_str(), theme::heading())),
        Line::raw(""),
        Line::from(Span::styled(
            if doc.is_public { "Public" } else { "Private" },
            theme::visibility(doc.is_public),
        )),
    ];
    if let Some(created_at) = doc.created_at {
        lines.push(Line::from(Span::styled(
            format!("Created {}", created_at.format("%Y-%m-%d %H:%M")),
            theme::muted(),
        )));
    }
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled("Accesses", theme::subheading())));
    if doc.accesses.is_empty() {
        lines.push(Line::from(Span::styled("  none", theme::muted())));
    }
    for access in &doc.accesses {
        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::styled(access.role.label(), theme::role(&access.role)),
        ]));
    }
    lines
}

/// Shared with unknown routes.
pub fn render_not_found(frame: &mut Frame, area: Rect, focused: bool) {
    let block = theme::block("Not found", focused);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    let lines = vec![
        Line::raw(""),
        Line::from(Span::styled(NOT_FOUND_MESSAGE, theme::subheading())),
        Line::raw(""),
        Line::from(Span::styled("Esc to go home", theme::key_hint())),
    ];
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        inner,
    );
}
