//! Render state - data structure sent from App layer to UI for rendering

use crate::lifecycle::LifecycleState;
use crate::messages::ui_events::Cell;

/// Complete state needed by the UI to render
#[derive(Debug, Clone)]
pub struct RenderState {
    // Panels
    pub live_text: String,
    pub state_text: String,
    pub plain_text: String,
    pub event_text: String,
    pub plain_runs: usize,

    // Buttons
    pub selected: Cell,

    // Surface
    pub lifecycle: LifecycleState,
    pub notification: Option<String>,
    pub notifications_shown: u64,

    // Popups
    pub show_help: bool,
}

impl RenderState {
    pub fn text(&self, cell: Cell) -> &str {
        match cell {
            Cell::Live => &self.live_text,
            Cell::State => &self.state_text,
            Cell::Plain => &self.plain_text,
            Cell::Event => &self.event_text,
        }
    }
}

impl Default for RenderState {
    fn default() -> Self {
        RenderState {
            live_text: String::new(),
            state_text: String::new(),
            plain_text: String::new(),
            event_text: String::new(),
            plain_runs: 0,
            selected: Cell::Live,
            lifecycle: LifecycleState::Initialized,
            notification: None,
            notifications_shown: 0,
            show_help: false,
        }
    }
}
