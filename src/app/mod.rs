//! App layer - the presentation surface
//!
//! The App actor owns the surface lifecycle, subscribes to the state holder's
//! cells, turns UI events into triggers and emits render state.

pub mod state;
pub mod actor;

pub use state::AppState;
pub use actor::AppActor;
