use std::io;
use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame, Terminal,
};
use tokio::sync::mpsc;

use crate::config::AppConfig;
use crate::core::routing::{Route, Router, ROOT_PATH};

use super::events::{Action, AppEvent, AreaFocus, Notification, NotificationLevel};
use super::layout::AppLayout;
use super::services::Services;
use super::theme;
use super::views::document::{render_not_found, DocumentResult, DocumentViewState};
use super::views::panel::{PanelResult, PanelState};
use super::widgets::text_field::TextField;

const GOTO_MAX_CHARS: usize = 512;
const MAX_NOTIFICATIONS: usize = 3;

/// Central application state (Elm architecture).
pub struct AppState {
    /// Whether the app is still running.
    pub running: bool,
    /// Whether the documents panel or the main area has input focus.
    pub area_focus: AreaFocus,
    /// Current path and history.
    pub router: Router,
    /// Documents panel plus the creation slot.
    pub panel: PanelState,
    /// Open document, present while the route is `/docs/{id}`.
    pub document: Option<DocumentViewState>,
    /// Go-to path prompt (Some when open).
    pub goto: Option<TextField>,
    /// Whether the help modal is open.
    pub show_help: bool,
    /// Active notifications (max 3 visible).
    pub notifications: Vec<Notification>,
    /// Monotonic counter for notification IDs.
    notification_counter: u64,
    panel_width: u16,
    not_found_grace: Duration,
    /// Receiver for navigation and notification events.
    event_rx: mpsc::UnboundedReceiver<AppEvent>,
    services: Services,
}

impl AppState {
    pub fn new(
        config: &AppConfig,
        start_path: &str,
        services: Services,
        event_rx: mpsc::UnboundedReceiver<AppEvent>,
    ) -> Self {
        let panel = PanelState::new(&services, config.tui.panel_open);
        let mut app = Self {
            running: true,
            area_focus: AreaFocus::Main,
            router: Router::new(start_path),
            panel,
            document: None,
            goto: None,
            show_help: false,
            notifications: Vec::new(),
            notification_counter: 0,
            panel_width: config.tui.panel_width,
            not_found_grace: Duration::from_millis(config.routing.not_found_grace_ms),
            event_rx,
            services,
        };
        app.panel.load();
        app.on_route_changed();
        app
    }

    // ── Elm event loop ──────────────────────────────────────────────────

    /// Main event loop: render → select → update → loop.
    pub async fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
        tick_rate: Duration,
    ) -> io::Result<()> {
        let mut tick_interval = tokio::time::interval(tick_rate);
        let mut event_stream = EventStream::new();

        while self.running {
            terminal.draw(|frame| self.render(frame))?;

            tokio::select! {
                _ = tick_interval.tick() => {
                    self.on_tick();
                }
                Some(event) = self.event_rx.recv() => {
                    self.handle_event(event);
                }
                Some(Ok(crossterm_event)) = event_stream.next() => {
                    self.handle_event(AppEvent::Input(crossterm_event));
                }
            }
        }

        log::info!("Event loop finished");
        Ok(())
    }

    /// Apply queued app events (navigation requests, notifications).
    pub fn drain_events(&mut self) {
        while let Ok(event) = self.event_rx.try_recv() {
            self.handle_event(event);
        }
    }

    /// Wait for in-flight requests and apply what they caused.
    pub async fn settle(&mut self) {
        self.panel.settle().await;
        self.drain_events();
        if let Some(document) = self.document.as_mut() {
            document.settle().await;
        }
    }

    // ── Event handling ──────────────────────────────────────────────────

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Input(crossterm_event) => self.handle_input(&crossterm_event),
            AppEvent::Navigate(path) => self.navigate(&path),
            AppEvent::Notification(notification) => {
                self.push_notification(notification.message, notification.level);
            }
        }
    }

    fn handle_input(&mut self, event: &Event) {
        // Priority 1: Go-to prompt consumes all input when open
        if self.goto.is_some() {
            self.handle_goto_input(event);
            return;
        }

        // Priority 2: Help modal
        if self.show_help {
            if let Some(action) = map_help_input(event) {
                self.handle_action(action);
            }
            return;
        }

        // Priority 3: Control chords, so they work while typing
        if let Some(action) = map_chord_to_action(event) {
            self.handle_action(action);
            return;
        }

        // Priority 4: Focused area
        let consumed = match self.area_focus {
            AreaFocus::Panel => {
                let current = self.router.route().clone();
                match self.panel.handle_panel_input(event, &current) {
                    // The card lives in the main area; typing goes there next.
                    Some(PanelResult::AddDocument) => {
                        self.area_focus = AreaFocus::Main;
                        true
                    }
                    Some(PanelResult::Consumed) => true,
                    None => false,
                }
            }
            AreaFocus::Main => self.dispatch_main_input(event),
        };
        if consumed {
            return;
        }

        // Priority 5: Global keybindings
        if let Some(action) = map_input_to_action(event) {
            self.handle_action(action);
        }
    }

    /// Dispatch input to the view for the current route. Returns true if consumed.
    fn dispatch_main_input(&mut self, event: &Event) -> bool {
        match self.router.route().clone() {
            Route::Home(_) => self.panel.handle_home_input(event),
            Route::Document(_) => {
                let result = self
                    .document
                    .as_mut()
                    .and_then(|document| document.handle_input(event));
                match result {
                    Some(DocumentResult::Home) => {
                        self.navigate(ROOT_PATH);
                        true
                    }
                    Some(DocumentResult::Consumed) => true,
                    None => false,
                }
            }
            Route::NotFound => {
                if is_key(event, KeyCode::Esc) {
                    self.navigate(ROOT_PATH);
                    true
                } else {
                    false
                }
            }
        }
    }

    fn handle_goto_input(&mut self, event: &Event) {
        let Some(field) = self.goto.as_mut() else {
            return;
        };
        let Event::Key(key @ KeyEvent {
            kind: KeyEventKind::Press,
            ..
        }) = event
        else {
            return;
        };
        match key.code {
            KeyCode::Esc => self.goto = None,
            KeyCode::Enter => {
                let path = field.trimmed().to_string();
                self.goto = None;
                if !path.is_empty() {
                    self.navigate(&path);
                }
            }
            _ => {
                field.handle_key(key);
            }
        }
    }

    fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.running = false,
            Action::TogglePanel => {
                self.panel.toggle();
                self.area_focus = if self.panel.is_open() {
                    AreaFocus::Panel
                } else {
                    AreaFocus::Main
                };
            }
            Action::SwitchFocus => {
                if self.panel.is_open() {
                    self.area_focus = self.area_focus.toggle();
                }
            }
            Action::OpenGoto => {
                let mut field = TextField::new(GOTO_MAX_CHARS);
                field.set_text(self.router.path());
                self.goto = Some(field);
            }
            Action::NavigateBack => {
                if self.router.back() {
                    self.on_route_changed();
                } else {
                    self.push_notification(
                        "No previous page".to_string(),
                        NotificationLevel::Info,
                    );
                }
            }
            Action::ShowHelp => self.show_help = true,
            Action::CloseHelp => self.show_help = false,
        }
    }

    // ── Routing ─────────────────────────────────────────────────────────

    pub fn navigate(&mut self, path: &str) {
        if self.router.navigate(path) {
            self.on_route_changed();
        }
    }

    /// Mount or drop the document view to match the route.
    fn on_route_changed(&mut self) {
        match self.router.route() {
            Route::Document(id) => {
                let reuse = self.document.as_ref().is_some_and(|d| d.id() == id);
                if !reuse {
                    self.document = Some(DocumentViewState::open(
                        self.services.api.clone(),
                        id.clone(),
                        self.not_found_grace,
                    ));
                }
                self.area_focus = AreaFocus::Main;
            }
            Route::Home(_) | Route::NotFound => {
                self.document = None;
            }
        }
    }

    // ── Notifications ───────────────────────────────────────────────────

    /// Push a notification (dedup by message, max 3).
    pub fn push_notification(&mut self, message: String, level: NotificationLevel) {
        if self.notifications.iter().any(|n| n.message == message) {
            return;
        }
        self.notification_counter += 1;
        let mut notification = Notification::new(message, level);
        notification.id = self.notification_counter;
        self.notifications.push(notification);
        while self.notifications.len() > MAX_NOTIFICATIONS {
            self.notifications.remove(0);
        }
    }

    /// Tick: decrement notification TTLs, dismiss expired, poll async data.
    fn on_tick(&mut self) {
        for n in &mut self.notifications {
            n.ttl_ticks = n.ttl_ticks.saturating_sub(1);
        }
        self.notifications.retain(|n| n.ttl_ticks > 0);

        self.panel.on_tick();
        self.panel.poll();
        if let Some(document) = self.document.as_mut() {
            document.poll();
        }
    }

    // ── Rendering ───────────────────────────────────────────────────────

    pub fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        let layout = AppLayout::compute(area, self.panel.is_open(), self.panel_width);

        self.panel
            .render(frame, layout.panel, self.area_focus == AreaFocus::Panel);
        self.render_main(frame, layout.main);
        self.render_status_bar(frame, layout.status);

        // Overlays
        self.render_notifications(frame, layout.main);
        if self.show_help {
            self.render_help_modal(frame, area);
        }
    }

    fn render_main(&self, frame: &mut Frame, area: Rect) {
        let focused = self.area_focus == AreaFocus::Main && self.goto.is_none();
        match (self.router.route(), &self.document) {
            (Route::Home(_), _) => self.panel.render_home(frame, area, focused),
            (Route::Document(_), Some(document)) => document.render(frame, area, focused),
            (Route::Document(_), None) | (Route::NotFound, _) => {
                render_not_found(frame, area, focused)
            }
        }
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        if let Some(field) = &self.goto {
            let prompt = Line::from(vec![
                Span::styled(" GO TO ", theme::brand_badge()),
                Span::raw(" "),
                Span::raw(field.text()),
            ]);
            frame.render_widget(Paragraph::new(prompt), area);
            let x = area.x + 8 + field.cursor_column() as u16;
            frame.set_cursor_position((x.min(area.right().saturating_sub(1)), area.y));
            return;
        }

        let status = Line::from(vec![
            Span::styled(format!(" {} ", crate::NAME), theme::brand_badge()),
            Span::raw(" "),
            Span::styled(
                self.router.path().to_string(),
                theme::heading(),
            ),
            Span::raw(" │ "),
            Span::styled("Ctrl+B", theme::key_hint()),
            Span::raw(format!(":{} ", self.panel.toggle_label())),
            Span::styled("Tab", theme::key_hint()),
            Span::raw(":focus "),
            Span::styled(":", theme::key_hint()),
            Span::raw(":go to "),
            Span::styled("?", theme::key_hint()),
            Span::raw(":help "),
            Span::styled("q", theme::key_hint()),
            Span::raw(":quit"),
        ]);
        frame.render_widget(Paragraph::new(status), area);
    }

    /// Stacked toasts in the top-right corner of the main area, newest last.
    fn render_notifications(&self, frame: &mut Frame, main: Rect) {
        let widest = self
            .notifications
            .iter()
            .map(|n| n.message.chars().count() + 4)
            .max();
        let Some(widest) = widest else {
            return;
        };

        let width = (widest as u16).min(main.width.saturating_sub(2));
        let height = (self.notifications.len() as u16).min(main.height);
        let toast_area = Rect::new(
            main.right().saturating_sub(width + 1),
            main.y + 1,
            width,
            height,
        )
        .intersection(main);

        let lines: Vec<Line> = self
            .notifications
            .iter()
            .map(|n| {
                Line::from(vec![
                    Span::styled(format!(" {} ", n.level.glyph()), theme::notification(n.level)),
                    Span::raw(n.message.as_str()),
                ])
            })
            .collect();

        frame.render_widget(Clear, toast_area);
        frame.render_widget(Paragraph::new(lines), toast_area);
    }

    fn render_help_modal(&self, frame: &mut Frame, area: Rect) {
        let modal = centered_rect(60, 70, area);

        let keybindings = [
            ("Global:", ""),
            ("q / Ctrl+C", "Quit"),
            ("?", "Toggle this help"),
            ("Ctrl+B / [", "Open or close the documents panel"),
            ("Tab / Ctrl+W", "Switch between panel and main area"),
            (":", "Go to a path"),
            ("Backspace", "Back"),
            ("", ""),
            ("Panel:", ""),
            ("j/k", "Move through documents"),
            ("Enter", "Open the selected document"),
            ("a", "Add a document"),
            ("n / r", "Next page / refresh"),
            ("", ""),
            ("Creation card:", ""),
            ("Tab / Shift+Tab", "Next / previous field"),
            ("Ctrl+P", "Toggle public"),
            ("Enter", "Create the document"),
            ("Esc", "Cancel"),
        ];

        let lines: Vec<Line> = keybindings
            .iter()
            .map(|(key, desc)| {
                if desc.is_empty() {
                    Line::from(Span::styled(*key, theme::subheading()))
                } else {
                    Line::from(vec![
                        Span::styled(format!("  {key:<18}"), theme::highlight()),
                        Span::raw(*desc),
                    ])
                }
            })
            .collect();

        let block = Block::default()
            .title(" Help ")
            .borders(Borders::ALL)
            .border_style(theme::border_focused());

        frame.render_widget(Clear, modal);
        frame.render_widget(Paragraph::new(lines).block(block), modal);
    }
}

// ── Input mapping ───────────────────────────────────────────────────────────

fn is_key(event: &Event, code: KeyCode) -> bool {
    matches!(
        event,
        Event::Key(KeyEvent {
            code: c,
            kind: KeyEventKind::Press,
            ..
        }) if *c == code
    )
}

/// Map help modal input to action.
fn map_help_input(event: &Event) -> Option<Action> {
    let Event::Key(KeyEvent {
        code,
        kind: KeyEventKind::Press,
        ..
    }) = event
    else {
        return None;
    };

    match code {
        KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => Some(Action::CloseHelp),
        _ => None,
    }
}

/// Chords that win over any focused view.
fn map_chord_to_action(event: &Event) -> Option<Action> {
    let Event::Key(KeyEvent {
        code,
        modifiers: KeyModifiers::CONTROL,
        kind: KeyEventKind::Press,
        ..
    }) = event
    else {
        return None;
    };

    match code {
        KeyCode::Char('b') => Some(Action::TogglePanel),
        KeyCode::Char('w') => Some(Action::SwitchFocus),
        KeyCode::Char('c') => Some(Action::Quit),
        _ => None,
    }
}

/// Plain keys, only reached when the focused view passes on them.
fn map_input_to_action(event: &Event) -> Option<Action> {
    let Event::Key(KeyEvent {
        code,
        modifiers: KeyModifiers::NONE | KeyModifiers::SHIFT,
        kind: KeyEventKind::Press,
        ..
    }) = event
    else {
        return None;
    };

    match code {
        KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Char('?') => Some(Action::ShowHelp),
        KeyCode::Char('[') => Some(Action::TogglePanel),
        KeyCode::Char(':') => Some(Action::OpenGoto),
        KeyCode::Tab => Some(Action::SwitchFocus),
        KeyCode::Backspace => Some(Action::NavigateBack),
        _ => None,
    }
}

/// Helper: create a centered rect using percentage of the parent.
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .split(area);

    Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .split(popup_layout[1])[1]
}
