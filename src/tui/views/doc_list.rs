//! Document list — the body of the documents panel.
//!
//! [`DocListView`] is a pure projection of the model's state onto exactly
//! one visible variant (pending, empty, populated, error) plus an
//! independent loading flag, so rendering never has to guess which async
//! result is authoritative.

use std::sync::Arc;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{List, ListState as RowState, Paragraph, Wrap},
    Frame,
};

use crate::core::doc_list_model::{DocListModel, ListState};
use crate::core::documents::{Document, DocumentId, DocumentsApi, ListError};
use crate::tui::theme;

pub const EMPTY_MESSAGE: &str =
    "Create your first document by clicking on the \"Create a new document\" button.";
pub const ERROR_MESSAGE: &str = "Something bad happens, please retry.";
pub const LOADING_MESSAGE: &str = "Loading documents...";

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

// ── Icon selection ──────────────────────────────────────────────────────────

/// Icon shown next to listed documents. It tells whether anyone besides the
/// owner works on the listed documents, not whether documents exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocsIcon {
    Empty,
    Collaborative,
}

impl DocsIcon {
    pub fn label(self) -> &'static str {
        match self {
            DocsIcon::Empty => "Empty docs icon",
            DocsIcon::Collaborative => "Docs icon",
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            DocsIcon::Empty => "○",
            DocsIcon::Collaborative => "◉",
        }
    }
}

pub fn has_collaborator(documents: &[Document]) -> bool {
    documents.iter().any(Document::has_collaborators)
}

pub fn select_icon(documents: &[Document]) -> DocsIcon {
    if has_collaborator(documents) {
        DocsIcon::Collaborative
    } else {
        DocsIcon::Empty
    }
}

// ── View model ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocListBody<'a> {
    /// First fetch in flight, nothing to show yet.
    Pending,
    Empty,
    Populated {
        icon: DocsIcon,
        documents: &'a [Document],
        has_more: bool,
    },
    Error(ListError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocListView<'a> {
    /// The status region is present while a request is in flight.
    pub loading: bool,
    pub body: DocListBody<'a>,
}

impl<'a> DocListView<'a> {
    pub fn from_state(state: &'a ListState) -> Self {
        let body = match state {
            ListState::Idle => DocListBody::Pending,
            ListState::Error(reason) => DocListBody::Error(*reason),
            ListState::Loading { previous: None } => DocListBody::Pending,
            ListState::Loading {
                previous: Some(listing),
            }
            | ListState::Success(listing) => {
                if listing.is_empty() {
                    DocListBody::Empty
                } else {
                    DocListBody::Populated {
                        icon: select_icon(&listing.documents),
                        documents: &listing.documents,
                        has_more: listing.has_more(),
                    }
                }
            }
        };
        Self {
            loading: state.is_loading(),
            body,
        }
    }

    /// Fixed message shown instead of a list, if any.
    pub fn message(&self) -> Option<&'static str> {
        match self.body {
            DocListBody::Empty => Some(EMPTY_MESSAGE),
            DocListBody::Error(_) => Some(ERROR_MESSAGE),
            DocListBody::Pending | DocListBody::Populated { .. } => None,
        }
    }

    pub fn icon(&self) -> Option<DocsIcon> {
        match self.body {
            DocListBody::Populated { icon, .. } => Some(icon),
            _ => None,
        }
    }
}

// ── State ───────────────────────────────────────────────────────────────────

pub enum DocListResult {
    /// Input consumed, nothing for the parent to do.
    Consumed,
    /// User picked a document.
    Select(DocumentId),
}

pub struct DocListState {
    model: DocListModel,
    selected: usize,
    spinner: usize,
}

impl DocListState {
    pub fn new(api: Arc<dyn DocumentsApi>) -> Self {
        Self {
            model: DocListModel::new(api),
            selected: 0,
            spinner: 0,
        }
    }

    /// Initial fetch of page 1.
    pub fn load(&mut self) {
        self.selected = 0;
        self.model.load_first();
    }

    /// Re-fetch page 1, or retry after an error.
    pub fn refresh(&mut self) {
        match self.model.state() {
            ListState::Idle | ListState::Error(_) => self.load(),
            _ => self.model.refresh(),
        }
    }

    pub fn request_next_page(&mut self) -> bool {
        self.model.next_page()
    }

    /// Poll for finished requests. Call from on_tick.
    pub fn poll(&mut self) -> bool {
        let changed = self.model.poll();
        if changed {
            self.clamp_selection();
        }
        changed
    }

    pub fn on_tick(&mut self) {
        self.spinner = (self.spinner + 1) % SPINNER.len();
    }

    pub async fn settle(&mut self) {
        self.model.settle().await;
        self.clamp_selection();
    }

    pub fn model(&self) -> &DocListModel {
        &self.model
    }

    pub fn view(&self) -> DocListView<'_> {
        DocListView::from_state(self.model.state())
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    fn document_count(&self) -> usize {
        self.model
            .state()
            .listing()
            .map(|l| l.documents.len())
            .unwrap_or(0)
    }

    fn clamp_selection(&mut self) {
        self.selected = self.selected.min(self.document_count().saturating_sub(1));
    }

    fn selected_document(&self) -> Option<&Document> {
        self.model
            .state()
            .listing()
            .and_then(|l| l.documents.get(self.selected))
    }

    // ── Input ────────────────────────────────────────────────────────────

    pub fn handle_input(&mut self, event: &Event) -> Option<DocListResult> {
        let Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) = event
        else {
            return None;
        };

        match (*modifiers, *code) {
            (KeyModifiers::NONE, KeyCode::Char('j') | KeyCode::Down) => {
                self.select_next();
                Some(DocListResult::Consumed)
            }
            (KeyModifiers::NONE, KeyCode::Char('k') | KeyCode::Up) => {
                self.selected = self.selected.saturating_sub(1);
                Some(DocListResult::Consumed)
            }
            (KeyModifiers::NONE, KeyCode::Char('g') | KeyCode::Home) => {
                self.selected = 0;
                Some(DocListResult::Consumed)
            }
            (KeyModifiers::NONE, KeyCode::Enter) => Some(match self.selected_document() {
                Some(doc) => DocListResult::Select(doc.id.clone()),
                None => DocListResult::Consumed,
            }),
            (KeyModifiers::NONE, KeyCode::Char('n')) => {
                self.request_next_page();
                Some(DocListResult::Consumed)
            }
            (KeyModifiers::NONE, KeyCode::Char('r')) => {
                self.refresh();
                Some(DocListResult::Consumed)
            }
            _ => None,
        }
    }

    /// Moving past the last loaded row asks for the next page.
    fn select_next(&mut self) {
        let count = self.document_count();
        if count == 0 {
            return;
        }
        if self.selected + 1 < count {
            self.selected += 1;
        } else {
            self.request_next_page();
        }
    }

    // ── Rendering ────────────────────────────────────────────────────────

    pub fn render(&self, frame: &mut Frame, area: Rect, focused: bool) {
        let view = self.view();
        let lines = build_lines(&view, self.selected, focused, SPINNER[self.spinner]);

        if !matches!(view.body, DocListBody::Populated { .. }) {
            // Messages wrap; nothing is selectable.
            frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
            return;
        }

        // One row per line, so the list keeps the selection in view.
        let header = usize::from(view.loading);
        let mut rows = RowState::default();
        rows.select(Some(header + self.selected));
        frame.render_stateful_widget(List::new(lines), area, &mut rows);
    }
}

// ── Line builders ────────────────────────────────────────────────────────────

fn build_lines(
    view: &DocListView<'_>,
    selected: usize,
    focused: bool,
    spinner: &'static str,
) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    if view.loading {
        lines.push(Line::from(vec![
            Span::styled(format!("{spinner} "), theme::highlight()),
            Span::styled(LOADING_MESSAGE, theme::muted()),
        ]));
    }

    match &view.body {
        DocListBody::Pending => {}
        DocListBody::Empty => {
            lines.push(Line::from(Span::styled(EMPTY_MESSAGE, theme::muted())));
        }
        DocListBody::Error(reason) => {
            log::trace!("Rendering list error ({})", reason.as_str());
            lines.push(Line::from(Span::styled(ERROR_MESSAGE, theme::error())));
        }
        DocListBody::Populated {
            icon,
            documents,
            has_more,
        } => {
            for (i, doc) in documents.iter().enumerate() {
                let is_selected = i == selected;
                let cursor = if is_selected && focused { "▸ " } else { "  " };
                let name_style = if is_selected {
                    theme::highlight()
                } else {
                    Style::default()
                };
                lines.push(Line::from(vec![
                    Span::styled(cursor, theme::highlight()),
                    Span::styled(format!("{} ", icon.glyph()), theme::muted()),
                    Span::styled(doc.name.clone(), name_style),
                ]));
            }
            if *has_more {
                lines.push(Line::from(Span::styled(
                    "  … more (n)",
                    theme::key_hint(),
                )));
            }
        }
    }

    lines
}
