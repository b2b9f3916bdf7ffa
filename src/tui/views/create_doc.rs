//! "Create new document card" — name, visibility, create/cancel.
//!
//! Phases: `Idle → Submitting → Created | Failed`, and `Cancelled` from
//! anywhere but `Created`. One submission at a time per card. The pending
//! answer travels over a oneshot owned by the card. Dropping the card
//! discards it; cancelling hands it back to the caller.

use std::sync::Arc;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use thiserror::Error;
use tokio::sync::oneshot;

use crate::core::documents::{ApiError, CreateDocument, Document, DocumentsApi};
use crate::core::routing::Navigator;
use crate::tui::theme;
use crate::tui::widgets::text_field::TextField;

pub const CARD_LABEL: &str = "Create new document card";
pub const CARD_HEADING: &str = "Name the document";
pub const NAME_LABEL: &str = "Document name";
/// Accessible name of the decorative icon row.
pub const ICON_GROUP_LABEL: &str = "icon group";
pub const PUBLIC_LABEL: &str = "Is it public ?";
pub const CREATE_LABEL: &str = "Create the document";
pub const CANCEL_LABEL: &str = "Cancel";

const NAME_MAX_CHARS: usize = 255;

// ── Errors ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please give the document a name.")]
    EmptyName,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CreateError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("The document could not be created: {0}")]
    Api(#[from] ApiError),
}

// ── State ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreatePhase {
    Idle,
    Submitting,
    Created(Document),
    Failed(CreateError),
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardFocus {
    Name,
    Visibility,
    Create,
    Cancel,
}

impl CardFocus {
    fn next(self) -> Self {
        match self {
            CardFocus::Name => CardFocus::Visibility,
            CardFocus::Visibility => CardFocus::Create,
            CardFocus::Create => CardFocus::Cancel,
            CardFocus::Cancel => CardFocus::Name,
        }
    }

    fn prev(self) -> Self {
        match self {
            CardFocus::Name => CardFocus::Cancel,
            CardFocus::Visibility => CardFocus::Name,
            CardFocus::Create => CardFocus::Visibility,
            CardFocus::Cancel => CardFocus::Create,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Sent,
    /// A submission is already pending; nothing was sent.
    AlreadySubmitting,
    Rejected(ValidationError),
}

/// Answer of an in-flight creation request.
pub type PendingCreate = oneshot::Receiver<Result<Document, ApiError>>;

pub enum CardResult {
    Consumed,
    /// The card was dismissed. Carries the submission that was still in
    /// flight, if any.
    Cancelled(Option<PendingCreate>),
}

pub struct CreateDocState {
    name: TextField,
    is_public: bool,
    focus: CardFocus,
    phase: CreatePhase,
    pending: Option<PendingCreate>,
    api: Arc<dyn DocumentsApi>,
    navigator: Arc<dyn Navigator>,
}

impl CreateDocState {
    pub fn new(api: Arc<dyn DocumentsApi>, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            name: TextField::new(NAME_MAX_CHARS),
            is_public: false,
            focus: CardFocus::Name,
            phase: CreatePhase::Idle,
            pending: None,
            api,
            navigator,
        }
    }

    pub fn phase(&self) -> &CreatePhase {
        &self.phase
    }

    pub fn name(&self) -> &str {
        self.name.text()
    }

    pub fn is_public(&self) -> bool {
        self.is_public
    }

    pub fn focus(&self) -> CardFocus {
        self.focus
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == CreatePhase::Submitting
    }

    /// Fields accept edits until the card is done with.
    fn is_editable(&self) -> bool {
        matches!(self.phase, CreatePhase::Idle | CreatePhase::Failed(_))
    }

    pub fn set_name(&mut self, name: &str) {
        if self.is_editable() {
            self.name.set_text(name);
        }
    }

    pub fn toggle_public(&mut self) {
        if self.is_editable() {
            self.is_public = !self.is_public;
        }
    }

    /// Validate and send the creation request.
    pub fn submit(&mut self) -> SubmitOutcome {
        if self.is_submitting() {
            log::debug!("Ignoring submit while a creation is pending");
            return SubmitOutcome::AlreadySubmitting;
        }
        if !self.is_editable() {
            return SubmitOutcome::AlreadySubmitting;
        }
        if self.name.is_blank() {
            self.phase = CreatePhase::Failed(ValidationError::EmptyName.into());
            return SubmitOutcome::Rejected(ValidationError::EmptyName);
        }

        let request = CreateDocument {
            name: self.name.trimmed().to_string(),
            is_public: self.is_public,
        };
        log::info!(
            "Creating document {:?} (public: {})",
            request.name,
            request.is_public
        );

        let (tx, rx) = oneshot::channel();
        let api = Arc::clone(&self.api);
        tokio::spawn(async move {
            let _ = tx.send(api.create(request).await);
        });

        self.pending = Some(rx);
        self.phase = CreatePhase::Submitting;
        SubmitOutcome::Sent
    }

    /// Drop everything typed so far. No request is made. A submission
    /// still in flight is returned; the card no longer acts on its answer.
    pub fn cancel(&mut self) -> Option<PendingCreate> {
        if matches!(self.phase, CreatePhase::Created(_)) {
            return None;
        }
        let abandoned = self.pending.take();
        if abandoned.is_some() {
            log::info!("Creation cancelled while pending");
        }
        self.name.clear();
        self.is_public = false;
        self.focus = CardFocus::Name;
        self.phase = CreatePhase::Cancelled;
        abandoned
    }

    /// Check for the submission's answer. Returns the document once, when
    /// it is created. Call from on_tick.
    pub fn poll(&mut self) -> Option<Document> {
        let rx = self.pending.as_mut()?;
        match rx.try_recv() {
            Ok(result) => {
                self.pending = None;
                self.finish(result)
            }
            Err(oneshot::error::TryRecvError::Empty) => None,
            Err(oneshot::error::TryRecvError::Closed) => {
                self.pending = None;
                self.finish(Err(ApiError::Network("request task ended".into())))
            }
        }
    }

    /// Wait for the pending submission, if any.
    pub async fn settle(&mut self) -> Option<Document> {
        let rx = self.pending.take()?;
        let result = rx
            .await
            .unwrap_or_else(|_| Err(ApiError::Network("request task ended".into())));
        self.finish(result)
    }

    fn finish(&mut self, result: Result<Document, ApiError>) -> Option<Document> {
        match result {
            Ok(doc) => {
                log::info!("Document created: id={}, public={}", doc.id, doc.is_public);
                self.navigator.navigate_to_document(&doc.id);
                self.phase = CreatePhase::Created(doc.clone());
                Some(doc)
            }
            Err(e) => {
                log::warn!("Document creation failed: {e}");
                self.phase = CreatePhase::Failed(e.into());
                None
            }
        }
    }

    // ── Input ────────────────────────────────────────────────────────────

    pub fn handle_input(&mut self, event: &Event) -> Option<CardResult> {
        let Event::Key(key @ KeyEvent {
            kind: KeyEventKind::Press,
            ..
        }) = event
        else {
            return None;
        };

        match (key.modifiers, key.code) {
            (_, KeyCode::Esc) => {
                return Some(CardResult::Cancelled(self.cancel()));
            }
            (KeyModifiers::NONE, KeyCode::Tab) | (KeyModifiers::NONE, KeyCode::Down) => {
                self.focus = self.focus.next();
                return Some(CardResult::Consumed);
            }
            (_, KeyCode::BackTab) | (KeyModifiers::NONE, KeyCode::Up) => {
                self.focus = self.focus.prev();
                return Some(CardResult::Consumed);
            }
            (KeyModifiers::CONTROL, KeyCode::Char('p')) => {
                self.toggle_public();
                return Some(CardResult::Consumed);
            }
            _ => {}
        }

        match self.focus {
            CardFocus::Name => {
                if key.code == KeyCode::Enter {
                    self.submit();
                } else if self.is_editable() {
                    self.name.handle_key(key);
                }
                Some(CardResult::Consumed)
            }
            CardFocus::Visibility => {
                if matches!(key.code, KeyCode::Char(' ') | KeyCode::Enter) {
                    self.toggle_public();
                }
                Some(CardResult::Consumed)
            }
            CardFocus::Create => {
                if key.code == KeyCode::Enter {
                    self.submit();
                }
                Some(CardResult::Consumed)
            }
            CardFocus::Cancel => {
                if key.code == KeyCode::Enter {
                    return Some(CardResult::Cancelled(self.cancel()));
                }
                Some(CardResult::Consumed)
            }
        }
    }

    // ── Rendering ────────────────────────────────────────────────────────

    pub fn render(&self, frame: &mut Frame, area: Rect, focused: bool) {
        let block = theme::block(CARD_LABEL, focused);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::vertical([
            Constraint::Length(1), // ICON_GROUP_LABEL
            Constraint::Length(2), // Heading
            Constraint::Length(3), // Name field
            Constraint::Length(2), // Visibility
            Constraint::Length(2), // Buttons
            Constraint::Min(1),    // Status
        ])
        .split(inner);

        frame.render_widget(
            Paragraph::new(Line::from(Span::styled("  ▤ ▤ ▤", theme::muted()))),
            chunks[0],
        );
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                format!("  {CARD_HEADING}"),
                theme::subheading(),
            ))),
            chunks[1],
        );

        let name_focused = focused && self.focus == CardFocus::Name;
        let field_area = chunks[2].inner(ratatui::layout::Margin::new(2, 0));
        let name_block = Block::default()
            .title(format!(" {NAME_LABEL} "))
            .borders(Borders::ALL)
            .border_style(if name_focused {
                theme::border_focused()
            } else {
                theme::border_default()
            });
        let name_inner = name_block.inner(field_area);
        frame.render_widget(Paragraph::new(self.name.text()).block(name_block), field_area);
        if name_focused && self.is_editable() {
            let x = name_inner.x + (self.name.cursor_column() as u16).min(name_inner.width);
            frame.set_cursor_position((x, name_inner.y));
        }

        let checkbox = if self.is_public { "[x]" } else { "[ ]" };
        let visibility_style = if focused && self.focus == CardFocus::Visibility {
            theme::highlight()
        } else {
            theme::visibility(self.is_public)
        };
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::raw("  "),
                Span::styled(format!("{checkbox} {PUBLIC_LABEL}"), visibility_style),
            ])),
            chunks[3],
        );

        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::raw("  "),
                Span::styled(
                    format!("[ {CREATE_LABEL} ]"),
                    theme::button(focused && self.focus == CardFocus::Create),
                ),
                Span::raw("  "),
                Span::styled(
                    format!("[ {CANCEL_LABEL} ]"),
                    theme::button(focused && self.focus == CardFocus::Cancel),
                ),
            ])),
            chunks[4],
        );

        let status = match &self.phase {
            CreatePhase::Submitting => Some(Line::from(Span::styled(
                "  Creating the document...",
                theme::muted(),
            ))),
            CreatePhase::Failed(e) => Some(Line::from(Span::styled(
                format!("  {e}"),
                theme::error(),
            ))),
            CreatePhase::Idle | CreatePhase::Created(_) | CreatePhase::Cancelled => None,
        };
        let mut lines: Vec<Line> = status.into_iter().collect();
        lines.push(Line::from(vec![
            Span::styled("  Tab", theme::key_hint()),
            Span::raw(":next  "),
            Span::styled("Ctrl+P", theme::key_hint()),
            Span::raw(":public  "),
            Span::styled("Enter", theme::key_hint()),
            Span::raw(":create  "),
            Span::styled("Esc", theme::key_hint()),
            Span::raw(":cancel"),
        ]));
        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), chunks[5]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::documents::{DocumentId, MockDocumentsApi};
    use crate::core::routing::MockNavigator;
    use crate::tests::fakes::{RecordingNavigator, ScriptedApi};
    use crate::tests::{buffer_text, draw};

    fn created(id: &str, name: &str, is_public: bool) -> Document {
        Document {
            id: DocumentId::from(id),
            name: name.to_string(),
            is_public,
            accesses: vec![],
            created_at: None,
        }
    }

    fn press(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_text(card: &mut CreateDocState, text: &str) {
        for c in text.chars() {
            card.handle_input(&press(KeyCode::Char(c)));
        }
    }

    #[tokio::test]
    async fn test_blank_name_sends_nothing() {
        let mut api = MockDocumentsApi::new();
        api.expect_create().times(0);
        let mut navigator = MockNavigator::new();
        navigator.expect_navigate_to_document().times(0);
        navigator.expect_navigate().times(0);

        let mut card = CreateDocState::new(Arc::new(api), Arc::new(navigator));
        card.set_name("   ");
        assert_eq!(
            card.submit(),
            SubmitOutcome::Rejected(ValidationError::EmptyName)
        );
        assert_eq!(
            card.phase(),
            &CreatePhase::Failed(CreateError::Validation(ValidationError::EmptyName))
        );
        assert!(card.settle().await.is_none());
    }

    #[tokio::test]
    async fn test_submit_sends_trimmed_name_and_navigates() {
        let mut api = MockDocumentsApi::new();
        api.expect_create()
            .withf(|req| req.name == "My routing doc" && !req.is_public)
            .times(1)
            .returning(|req| Ok(created("new-id", &req.name, req.is_public)));
        let mut navigator = MockNavigator::new();
        navigator
            .expect_navigate_to_document()
            .withf(|id| id.as_str() == "new-id")
            .times(1)
            .return_const(());

        let mut card = CreateDocState::new(Arc::new(api), Arc::new(navigator));
        card.set_name("  My routing doc ");
        assert_eq!(card.submit(), SubmitOutcome::Sent);
        assert!(card.is_submitting());

        let doc = card.settle().await.unwrap();
        assert_eq!(doc.id.as_str(), "new-id");
        assert!(matches!(card.phase(), CreatePhase::Created(d) if d.id.as_str() == "new-id"));
    }

    #[tokio::test]
    async fn test_public_flag_round_trips_through_server() {
        let api = Arc::new(ScriptedApi::new().with_create(Ok(created("p1", "Public doc", true))));
        let navigator = Arc::new(RecordingNavigator::default());
        let mut card = CreateDocState::new(api.clone(), navigator.clone());

        type_text(&mut card, "Public doc");
        card.toggle_public();
        card.toggle_public();
        card.toggle_public();
        assert!(card.is_public());
        card.submit();

        let doc = card.settle().await.unwrap();
        assert!(doc.is_public);
        assert!(api.create_calls()[0].is_public);
        assert_eq!(navigator.paths(), vec!["/docs/p1".to_string()]);
    }

    #[tokio::test]
    async fn test_server_decides_visibility() {
        let api = Arc::new(ScriptedApi::new().with_create(Ok(created("p2", "Doc", false))));
        let mut card = CreateDocState::new(api, Arc::new(RecordingNavigator::default()));
        card.set_name("Doc");
        card.toggle_public();
        card.submit();
        match card.settle().await {
            Some(doc) => assert!(!doc.is_public),
            None => panic!("creation should succeed"),
        }
    }

    #[tokio::test]
    async fn test_second_submit_while_pending_is_ignored() {
        let api = Arc::new(ScriptedApi::new().with_create(Ok(created("once", "X", false))));
        let navigator = Arc::new(RecordingNavigator::default());
        let mut card = CreateDocState::new(api.clone(), navigator.clone());
        card.set_name("X");

        assert_eq!(card.submit(), SubmitOutcome::Sent);
        assert_eq!(card.submit(), SubmitOutcome::AlreadySubmitting);
        card.handle_input(&press(KeyCode::Enter));

        card.settle().await;
        assert_eq!(api.create_calls().len(), 1);
        assert_eq!(navigator.paths().len(), 1);
        // Done cards don't submit again either.
        assert_eq!(card.submit(), SubmitOutcome::AlreadySubmitting);
    }

    #[tokio::test]
    async fn test_failure_keeps_card_editable() {
        let api = Arc::new(
            ScriptedApi::new()
                .with_create(Err(ApiError::server(400)))
                .with_create(Ok(created("retry", "Fixed", false))),
        );
        let navigator = Arc::new(RecordingNavigator::default());
        let mut card = CreateDocState::new(api.clone(), navigator.clone());
        card.set_name("Broken");
        card.submit();
        assert!(card.settle().await.is_none());
        assert_eq!(
            card.phase(),
            &CreatePhase::Failed(CreateError::Api(ApiError::server(400)))
        );
        assert!(navigator.paths().is_empty());

        card.set_name("Fixed");
        assert_eq!(card.name(), "Fixed");
        assert_eq!(card.submit(), SubmitOutcome::Sent);
        assert!(card.settle().await.is_some());
        assert_eq!(api.create_calls().len(), 2);
    }

    #[tokio::test]
    async fn test_cancel_before_submit_makes_no_call() {
        let mut api = MockDocumentsApi::new();
        api.expect_create().times(0);
        let mut card = CreateDocState::new(Arc::new(api), Arc::new(RecordingNavigator::default()));
        type_text(&mut card, "Draft");
        card.toggle_public();

        assert!(matches!(
            card.handle_input(&press(KeyCode::Esc)),
            Some(CardResult::Cancelled(None))
        ));
        assert_eq!(card.phase(), &CreatePhase::Cancelled);
        assert_eq!(card.name(), "");
        assert!(!card.is_public());
    }

    #[tokio::test]
    async fn test_cancel_discards_pending_answer() {
        let api = Arc::new(ScriptedApi::new().with_create(Ok(created("late", "Late", false))));
        let navigator = Arc::new(RecordingNavigator::default());
        let mut card = CreateDocState::new(api, navigator.clone());
        card.set_name("Late");
        card.submit();
        let abandoned = card.cancel().expect("submission was in flight");

        // The server still answers; the card ignores it.
        let answer = abandoned.await.unwrap();
        assert_eq!(answer.unwrap().id.as_str(), "late");
        assert!(card.poll().is_none());
        assert_eq!(card.phase(), &CreatePhase::Cancelled);
        assert!(navigator.paths().is_empty());
    }

    #[tokio::test]
    async fn test_escape_while_submitting_hands_back_request() {
        let api = Arc::new(ScriptedApi::new().with_create(Ok(created("esc", "Esc", false))));
        let mut card = CreateDocState::new(api, Arc::new(RecordingNavigator::default()));
        card.set_name("Esc");
        card.submit();
        assert!(matches!(
            card.handle_input(&press(KeyCode::Esc)),
            Some(CardResult::Cancelled(Some(_)))
        ));
        assert!(!card.is_submitting());
    }

    #[tokio::test]
    async fn test_keyboard_flow() {
        let api = Arc::new(ScriptedApi::new().with_create(Ok(created("k", "Keys", true))));
        let mut card = CreateDocState::new(api.clone(), Arc::new(RecordingNavigator::default()));

        type_text(&mut card, "Keys");
        card.handle_input(&press(KeyCode::Tab));
        assert_eq!(card.focus(), CardFocus::Visibility);
        card.handle_input(&press(KeyCode::Char(' ')));
        assert!(card.is_public());
        card.handle_input(&press(KeyCode::Tab));
        assert_eq!(card.focus(), CardFocus::Create);
        card.handle_input(&press(KeyCode::Enter));
        assert!(card.is_submitting());

        card.settle().await;
        assert_eq!(api.create_calls()[0].name, "Keys");
    }

    #[tokio::test]
    async fn test_cancel_button() {
        let api = Arc::new(ScriptedApi::new());
        let mut card = CreateDocState::new(api.clone(), Arc::new(RecordingNavigator::default()));
        card.handle_input(&press(KeyCode::BackTab));
        assert_eq!(card.focus(), CardFocus::Cancel);
        assert!(matches!(
            card.handle_input(&press(KeyCode::Enter)),
            Some(CardResult::Cancelled(None))
        ));
        assert!(api.create_calls().is_empty());
    }

    #[tokio::test]
    async fn test_render_shows_all_elements() {
        let card = CreateDocState::new(
            Arc::new(ScriptedApi::new()),
            Arc::new(RecordingNavigator::default()),
        );
        let text = buffer_text(&draw(80, 16, |f| card.render(f, f.area(), true)));
        for expected in [
            CARD_LABEL,
            CARD_HEADING,
            NAME_LABEL,
            PUBLIC_LABEL,
            CREATE_LABEL,
            CANCEL_LABEL,
        ] {
            assert!(text.contains(expected), "missing {expected:?}");
        }
    }

    #[tokio::test]
    async fn test_render_validation_message() {
        let mut card = CreateDocState::new(
            Arc::new(ScriptedApi::new()),
            Arc::new(RecordingNavigator::default()),
        );
        card.submit();
        let text = buffer_text(&draw(80, 16, |f| card.render(f, f.area(), true)));
        assert!(text.contains("Please give the document a name."));
    }
}
