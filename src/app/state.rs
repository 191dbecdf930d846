//! App state - pure data structure with no I/O logic

use std::time::Duration;

use tokio::time::Instant;

use crate::lifecycle::LifecycleState;
use crate::messages::{Cell, Delivery, RenderState};

/// A toast on screen
#[derive(Clone, Debug)]
pub struct Notification {
    pub message: String,
    pub expires_at: Instant,
}

/// Main application state - pure data, no I/O
pub struct AppState {
    // Panel texts, only ever written from deliveries
    pub live_text: String,
    pub state_text: String,
    pub plain_text: String,
    pub event_text: String,
    pub plain_runs: usize,

    pub selected: Cell,
    pub lifecycle: LifecycleState,

    pub notification: Option<Notification>,
    pub notifications_shown: u64,

    pub show_help: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        AppState {
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

    /// Apply a delivery from a cell subscription
    pub fn apply(&mut self, delivery: Delivery, now: Instant, toast_duration: Duration) {
        match delivery {
            Delivery::Text { cell, text } => *self.text_mut(cell) = text,
            Delivery::Notify(message) => {
                self.notification = Some(Notification {
                    message,
                    expires_at: now + toast_duration,
                });
                self.notifications_shown += 1;
            }
            Delivery::PlainStarted => self.plain_runs += 1,
            Delivery::PlainEnded => self.plain_runs = self.plain_runs.saturating_sub(1),
        }
    }

    /// Drop an expired toast, returns true if one was dismissed
    pub fn expire_notification(&mut self, now: Instant) -> bool {
        match &self.notification {
            Some(n) if n.expires_at <= now => {
                self.notification = None;
                true
            }
            _ => false,
        }
    }

    fn text_mut(&mut self, cell: Cell) -> &mut String {
        match cell {
            Cell::Live => &mut self.live_text,
            Cell::State => &mut self.state_text,
            Cell::Plain => &mut self.plain_text,
            Cell::Event => &mut self.event_text,
        }
    }

    pub fn select_next(&mut self) {
        self.selected = self.selected.next();
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.prev();
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn close_help(&mut self) {
        self.show_help = false;
    }

    /// Convert state to RenderState for UI
    pub fn to_render_state(&self) -> RenderState {
        RenderState {
            live_text: self.live_text.clone(),
            state_text: self.state_text.clone(),
            plain_text: self.plain_text.clone(),
            event_text: self.event_text.clone(),
            plain_runs: self.plain_runs,
            selected: self.selected,
            lifecycle: self.lifecycle,
            notification: self.notification.as_ref().map(|n| n.message.clone()),
            notifications_shown: self.notifications_shown,
            show_help: self.show_help,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toast_expires_after_duration() {
        let mut state = AppState::new();
        let now = Instant::now();
        let long = Duration::from_millis(2750);
        state.apply(Delivery::Notify(String::from("SharedFlow")), now, long);
        assert_eq!(state.notifications_shown, 1);

        assert!(!state.expire_notification(now + Duration::from_millis(100)));
        assert!(state.expire_notification(now + long));
        assert!(state.notification.is_none());
        assert_eq!(state.notifications_shown, 1);
    }

    #[test]
    fn test_plain_run_count_never_underflows() {
        let mut state = AppState::new();
        let now = Instant::now();
        state.apply(Delivery::PlainEnded, now, Duration::ZERO);
        assert_eq!(state.plain_runs, 0);
        state.apply(Delivery::PlainStarted, now, Duration::ZERO);
        state.apply(Delivery::text(Cell::Plain, "Item 0"), now, Duration::ZERO);
        assert_eq!(state.plain_runs, 1);
        assert_eq!(state.to_render_state().text(Cell::Plain), "Item 0");
    }
}
