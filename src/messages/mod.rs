//! Message types for inter-layer communication in the actor-based architecture.
//!
//! This module defines all messages that flow between the UI layer, the App
//! layer and the cell subscriptions.

pub mod ui_events;
pub mod delivery;
pub mod render;

pub use ui_events::{Cell, UiEvent};
pub use delivery::Delivery;
pub use render::RenderState;
