//! Lifecycle layer - an owner state machine and the helpers that tie
//! subscriptions to it.
//!
//! Subscriptions are rebuilt every time the owner (re-)enters the minimum
//! state and torn down every time it leaves.

pub mod owner;
pub mod collect;

pub use owner::{Lifecycle, LifecycleEvent, LifecycleState};
pub use collect::{collect_latest_on_lifecycle, collect_on_lifecycle};
