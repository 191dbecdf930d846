//! # Observable Compare
//!
//! A terminal demo comparing four reactive value holders side by side.
//!
//! ## Cells
//! - LiveValue - lifecycle-aware, every write pushed to active observers
//! - StateValue - hot, conflated, replays the current value
//! - PlainStream - cold, a fresh delayed sequence per subscription
//! - EventStream - hot, transient events, no replay
//!
//! ## Architecture
//! Actor-based with channels:
//! - UI Layer (Ratatui) - synchronous
//! - App Layer (presentation surface with its own lifecycle)
//! - Cells (state holder, Tokio channels and tasks)

pub mod app;
pub mod cells;
pub mod config;
pub mod constants;
pub mod lifecycle;
pub mod messages;
pub mod ui;

// Re-export commonly used types
pub use app::{AppActor, AppState};
pub use cells::{StateHolder, StreamSettings};
pub use config::Config;
pub use lifecycle::{Lifecycle, LifecycleEvent, LifecycleState};
pub use messages::{Cell, Delivery, RenderState, UiEvent};
