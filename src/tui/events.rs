/// Events flowing through the Elm-architecture event loop.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Raw terminal input (keyboard/mouse).
    Input(crossterm::event::Event),
    /// A view asked to go to a path.
    Navigate(String),
    /// A view reported an outcome worth a toast.
    Notification(Notification),
}

/// High-level actions resolved from global key bindings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    TogglePanel,
    SwitchFocus,
    OpenGoto,
    NavigateBack,
    ShowHelp,
    CloseHelp,
    Quit,
}

/// Whether the documents panel or the main area receives input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AreaFocus {
    Panel,
    #[default]
    Main,
}

impl AreaFocus {
    pub fn toggle(self) -> Self {
        match self {
            AreaFocus::Panel => AreaFocus::Main,
            AreaFocus::Main => AreaFocus::Panel,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl NotificationLevel {
    pub fn glyph(self) -> &'static str {
        match self {
            NotificationLevel::Info => "ℹ",
            NotificationLevel::Success => "✓",
            NotificationLevel::Warning => "⚠",
            NotificationLevel::Error => "✗",
        }
    }
}

/// A timed toast over the main area.
#[derive(Debug, Clone)]
pub struct Notification {
    pub id: u64,
    pub message: String,
    pub level: NotificationLevel,
    /// Ticks remaining before auto-dismiss.
    pub ttl_ticks: u32,
}

impl Notification {
    pub fn new(message: impl Into<String>, level: NotificationLevel) -> Self {
        Self {
            id: 0,
            message: message.into(),
            level,
            ttl_ticks: 80,
        }
    }
}
