//! Deliveries - values pushed from cell subscriptions to the App layer

use tokio::sync::mpsc;

use crate::messages::ui_events::Cell;

#[derive(Debug, Clone, PartialEq)]
pub enum Delivery {
    /// New text for a cell's panel
    Text { cell: Cell, text: String },
    /// Show a toast
    Notify(String),
    /// A plain stream collection began
    PlainStarted,
    /// A plain stream collection finished or was cancelled
    PlainEnded,
}

impl Delivery {
    pub fn text(cell: Cell, text: impl Into<String>) -> Self {
        Delivery::Text {
            cell,
            text: text.into(),
        }
    }
}

/// Reports `PlainStarted` on creation and `PlainEnded` on drop, so a
/// cancelled collection is accounted for too
pub struct PlainRun {
    tx: mpsc::UnboundedSender<Delivery>,
}

impl PlainRun {
    pub fn start(tx: mpsc::UnboundedSender<Delivery>) -> Self {
        let _ = tx.send(Delivery::PlainStarted);
        PlainRun { tx }
    }

    pub fn send(&self, item: String) {
        let _ = self.tx.send(Delivery::text(Cell::Plain, item));
    }
}

impl Drop for PlainRun {
    fn drop(&mut self) {
        let _ = self.tx.send(Delivery::PlainEnded);
    }
}
