//! UI events - messages from UI layer to App layer

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// One of the four cells, each with its own button and text panel
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Cell {
    #[default]
    Live,
    State,
    Plain,
    Event,
}

impl Cell {
    pub const ALL: [Cell; 4] = [Cell::Live, Cell::State, Cell::Plain, Cell::Event];

    pub fn next(&self) -> Cell {
        match self {
            Cell::Live => Cell::State,
            Cell::State => Cell::Plain,
            Cell::Plain => Cell::Event,
            Cell::Event => Cell::Live,
        }
    }

    pub fn prev(&self) -> Cell {
        match self {
            Cell::Live => Cell::Event,
            Cell::State => Cell::Live,
            Cell::Plain => Cell::State,
            Cell::Event => Cell::Plain,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Cell::Live => "LiveValue",
            Cell::State => "StateValue",
            Cell::Plain => "PlainStream",
            Cell::Event => "EventStream",
        }
    }

    /// Short description of the delivery semantics
    pub fn hint(&self) -> &'static str {
        match self {
            Cell::Live => "lifecycle-aware, replays current value",
            Cell::State => "hot, replays current value, latest only",
            Cell::Plain => "cold, restarts on every press",
            Cell::Event => "hot, no replay, shows a toast",
        }
    }

    pub fn trigger_event(&self) -> UiEvent {
        match self {
            Cell::Live => UiEvent::TriggerLiveValue,
            Cell::State => UiEvent::TriggerStateValue,
            Cell::Plain => UiEvent::TriggerPlainStream,
            Cell::Event => UiEvent::TriggerEventStream,
        }
    }
}

/// Events generated from user input in the UI layer
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    // Buttons
    TriggerLiveValue,
    TriggerStateValue,
    TriggerPlainStream,
    TriggerEventStream,

    // Button selection
    SelectNext,
    SelectPrev,
    PressSelected,

    // Visibility
    Foreground,
    Background,
    ToggleForeground,

    // Popups
    ToggleHelp,
    CloseHelp,

    // System
    Quit,
}

/// Convert a terminal event to a UiEvent based on current UI context
pub fn terminal_to_ui_event(event: Event, show_help: bool) -> Option<UiEvent> {
    match event {
        Event::Key(key) => key_to_ui_event(key, show_help),
        Event::FocusGained => Some(UiEvent::Foreground),
        Event::FocusLost => Some(UiEvent::Background),
        _ => None,
    }
}

/// Convert a key event to a UiEvent based on current UI context
pub fn key_to_ui_event(key: KeyEvent, show_help: bool) -> Option<UiEvent> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(UiEvent::Quit);
    }

    if show_help {
        return Some(UiEvent::CloseHelp);
    }

    match key.code {
        KeyCode::Char('1') | KeyCode::Char('l') => Some(UiEvent::TriggerLiveValue),
        KeyCode::Char('2') | KeyCode::Char('s') => Some(UiEvent::TriggerStateValue),
        KeyCode::Char('3') | KeyCode::Char('f') => Some(UiEvent::TriggerPlainStream),
        KeyCode::Char('4') | KeyCode::Char('e') => Some(UiEvent::TriggerEventStream),
        KeyCode::Right | KeyCode::Tab => Some(UiEvent::SelectNext),
        KeyCode::Left | KeyCode::BackTab => Some(UiEvent::SelectPrev),
        KeyCode::Enter | KeyCode::Char(' ') => Some(UiEvent::PressSelected),
        KeyCode::Char('p') => Some(UiEvent::ToggleForeground),
        KeyCode::Char('?') => Some(UiEvent::ToggleHelp),
        KeyCode::Char('q') => Some(UiEvent::Quit),
        _ => None,
    }
}
