//! Documents panel: the collapsible left column listing documents, plus
//! the creation slot shared with the home view.

use std::sync::Arc;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tokio::sync::{mpsc, oneshot};

use crate::core::doc_list_model::ListState;
use crate::core::documents::{ApiError, Document, DocumentsApi};
use crate::core::routing::{Navigator, Route, ROOT_PATH};
use crate::tui::events::{AppEvent, Notification, NotificationLevel};
use crate::tui::services::Services;
use crate::tui::theme;

use super::create_doc::{CardResult, CreateDocState, CreatePhase, PendingCreate};
use super::doc_list::{DocListResult, DocListState};

pub const PANEL_LABEL: &str = "Documents panel";
pub const PANEL_HEADING: &str = "Documents";
pub const CLOSE_LABEL: &str = "Close the documents panel";
pub const OPEN_LABEL: &str = "Open the documents panel";
pub const ADD_LABEL: &str = "Add a document";
pub const TRIGGER_LABEL: &str = "Create a new document";

/// What occupies the creation spot on the home view.
pub enum CreationSlot {
    Trigger,
    Card(Box<CreateDocState>),
}

pub enum PanelResult {
    Consumed,
    /// "Add a document" ran. The card on the home view wants the keyboard.
    AddDocument,
}

pub struct PanelState {
    open: bool,
    list: DocListState,
    creation: CreationSlot,
    /// Submissions cancelled while in flight. The server may still create
    /// the document, in which case the list must show it.
    abandoned: Vec<PendingCreate>,
    api: Arc<dyn DocumentsApi>,
    navigator: Arc<dyn Navigator>,
    events: mpsc::UnboundedSender<AppEvent>,
}

impl PanelState {
    pub fn new(services: &Services, open: bool) -> Self {
        Self {
            open,
            list: DocListState::new(Arc::clone(&services.api)),
            creation: CreationSlot::Trigger,
            abandoned: Vec::new(),
            api: Arc::clone(&services.api),
            navigator: Arc::clone(&services.navigator),
            events: services.event_tx.clone(),
        }
    }

    /// Mount the list: fetch page 1.
    pub fn load(&mut self) {
        self.list.load();
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Visibility only. The list and any open card are left as they are.
    pub fn toggle(&mut self) {
        self.open = !self.open;
        log::debug!("Documents panel {}", if self.open { "opened" } else { "closed" });
    }

    /// Label of the control that flips the panel from its current state.
    pub fn toggle_label(&self) -> &'static str {
        if self.open {
            CLOSE_LABEL
        } else {
            OPEN_LABEL
        }
    }

    pub fn list(&self) -> &DocListState {
        &self.list
    }

    pub fn card(&self) -> Option<&CreateDocState> {
        match &self.creation {
            CreationSlot::Card(card) => Some(&**card),
            CreationSlot::Trigger => None,
        }
    }

    pub fn card_mut(&mut self) -> Option<&mut CreateDocState> {
        match &mut self.creation {
            CreationSlot::Card(card) => Some(&mut **card),
            CreationSlot::Trigger => None,
        }
    }

    /// The home view shows the "Create a new document" trigger.
    pub fn trigger_visible(&self) -> bool {
        matches!(self.creation, CreationSlot::Trigger)
    }

    /// Mount the creation card. An already open card is kept, along with
    /// whatever it holds.
    pub fn open_creation(&mut self) -> bool {
        if self.card().is_some() {
            return false;
        }
        log::debug!("Opening the creation card");
        self.creation = CreationSlot::Card(Box::new(CreateDocState::new(
            Arc::clone(&self.api),
            Arc::clone(&self.navigator),
        )));
        true
    }

    /// "Add a document": open the card and bring the home view forward.
    pub fn add_document(&mut self, current: &Route) {
        self.open_creation();
        if !current.is_home() {
            self.navigator.navigate(ROOT_PATH);
        }
    }

    fn notify(&self, message: String, level: NotificationLevel) {
        let event = AppEvent::Notification(Notification::new(message, level));
        if self.events.send(event).is_err() {
            log::debug!("Notification dropped: event loop gone");
        }
    }

    fn on_created(&mut self, doc: &Document) {
        log::info!("Refreshing the documents list after creating {}", doc.id);
        self.creation = CreationSlot::Trigger;
        self.list.refresh();
        self.notify(
            format!("Document \"{}\" created", doc.name),
            NotificationLevel::Success,
        );
    }

    /// A submission just finished, one way or the other.
    fn on_submission_finished(&mut self, created: Option<Document>) {
        if let Some(doc) = created {
            self.on_created(&doc);
        } else if let Some(CreatePhase::Failed(e)) = self.card().map(CreateDocState::phase) {
            let message = e.to_string();
            self.notify(message, NotificationLevel::Error);
        }
    }

    /// The server answered a request whose card was cancelled meanwhile.
    fn on_abandoned_answer(&mut self, result: Result<Document, ApiError>) {
        match result {
            Ok(doc) => {
                log::info!("Cancelled creation still produced {}", doc.id);
                self.list.refresh();
                self.notify(
                    format!("Document \"{}\" was created before the cancel", doc.name),
                    NotificationLevel::Info,
                );
            }
            Err(e) => log::debug!("Cancelled creation failed: {e}"),
        }
    }

    fn report_list_error(&self) {
        if let ListState::Error(reason) = self.list.model().state() {
            self.notify(
                format!("Documents could not be loaded ({} error)", reason.as_str()),
                NotificationLevel::Warning,
            );
        }
    }

    /// Poll the list, the card, and any abandoned submissions. Returns true
    /// when something changed.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        if self.list.poll() {
            self.report_list_error();
            changed = true;
        }
        changed |= self.poll_card();
        changed |= self.poll_abandoned();
        changed
    }

    fn poll_card(&mut self) -> bool {
        let Some(card) = self.card_mut() else {
            return false;
        };
        if !card.is_submitting() {
            return false;
        }
        let created = card.poll();
        if card.is_submitting() {
            return false;
        }
        self.on_submission_finished(created);
        true
    }

    fn poll_abandoned(&mut self) -> bool {
        let mut answers = Vec::new();
        self.abandoned.retain_mut(|rx| match rx.try_recv() {
            Ok(result) => {
                answers.push(result);
                false
            }
            Err(oneshot::error::TryRecvError::Empty) => true,
            Err(oneshot::error::TryRecvError::Closed) => false,
        });
        let changed = !answers.is_empty();
        for result in answers {
            self.on_abandoned_answer(result);
        }
        changed
    }

    pub fn on_tick(&mut self) {
        self.list.on_tick();
    }

    /// Wait for any pending submission, then for the list.
    pub async fn settle(&mut self) {
        if let Some(card) = self.card_mut().filter(|card| card.is_submitting()) {
            let created = card.settle().await;
            self.on_submission_finished(created);
        }
        for rx in std::mem::take(&mut self.abandoned) {
            if let Ok(result) = rx.await {
                self.on_abandoned_answer(result);
            }
        }
        let was_loading = self.list.model().state().is_loading();
        self.list.settle().await;
        if was_loading {
            self.report_list_error();
        }
    }

    // ── Input ────────────────────────────────────────────────────────────

    /// Keys while the panel column has focus.
    pub fn handle_panel_input(&mut self, event: &Event, current: &Route) -> Option<PanelResult> {
        if let Event::Key(KeyEvent {
            code: KeyCode::Char('a'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            ..
        }) = event
        {
            self.add_document(current);
            return Some(PanelResult::AddDocument);
        }

        match self.list.handle_input(event)? {
            DocListResult::Select(id) => self.navigator.navigate_to_document(&id),
            DocListResult::Consumed => {}
        }
        Some(PanelResult::Consumed)
    }

    /// Keys for the home view's creation slot.
    pub fn handle_home_input(&mut self, event: &Event) -> bool {
        match &mut self.creation {
            CreationSlot::Card(card) => match card.handle_input(event) {
                Some(CardResult::Cancelled(abandoned)) => {
                    self.abandoned.extend(abandoned);
                    self.creation = CreationSlot::Trigger;
                    true
                }
                Some(CardResult::Consumed) => true,
                None => false,
            },
            CreationSlot::Trigger => match event {
                Event::Key(KeyEvent {
                    code: KeyCode::Enter | KeyCode::Char('c'),
                    modifiers: KeyModifiers::NONE,
                    kind: KeyEventKind::Press,
                    ..
                }) => {
                    self.open_creation();
                    true
                }
                _ => false,
            },
        }
    }

    // ── Rendering ────────────────────────────────────────────────────────

    pub fn render(&self, frame: &mut Frame, area: Rect, focused: bool) {
        if self.open {
            self.render_open(frame, area, focused);
        } else {
            self.render_collapsed(frame, area);
        }
    }

    fn render_open(&self, frame: &mut Frame, area: Rect, focused: bool) {
        let block = theme::block(PANEL_LABEL, focused);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::vertical([
            Constraint::Length(1), // Heading + close control
            Constraint::Length(2), // Add a document
            Constraint::Min(1),    // List
        ])
        .split(inner);

        let header = Line::from(vec![
            Span::styled(format!(" {PANEL_HEADING}"), theme::heading()),
            Span::raw(" "),
            Span::styled("«", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(header), chunks[0]);

        let add = Line::from(vec![
            Span::raw(" "),
            Span::styled(format!("+ {ADD_LABEL}"), theme::button(false)),
            Span::styled(" (a)", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(add), chunks[1]);

        self.list.render(frame, chunks[2], focused);
    }

    fn render_collapsed(&self, frame: &mut Frame, area: Rect) {
        let lines = vec![Line::from(Span::styled(" »", theme::key_hint()))];
        frame.render_widget(
            Paragraph::new(lines).style(Style::default().bg(theme::BG_BASE)),
            area,
        );
    }

    /// The home view: the trigger button, or the open card.
    pub fn render_home(&self, frame: &mut Frame, area: Rect, focused: bool) {
        match &self.creation {
            CreationSlot::Card(card) => {
                let [card_area] = Layout::vertical([Constraint::Max(18)]).areas(area);
                card.render(frame, card_area, focused);
            }
            CreationSlot::Trigger => {
                let block = theme::block("Home", focused);
                let inner = block.inner(area);
                frame.render_widget(block, area);
                let lines = vec![
                    Line::raw(""),
                    Line::from(Span::styled(
                        format!("[ {TRIGGER_LABEL} ]"),
                        theme::button(focused),
                    )),
                    Line::raw(""),
                    Line::from(Span::styled("Enter to start", theme::key_hint())),
                ];
                frame.render_widget(
                    Paragraph::new(lines).alignment(Alignment::Center),
                    inner,
                );
            }
        }
    }
}
