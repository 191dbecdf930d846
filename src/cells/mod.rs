//! Cells - the state holder and the four reactive value holders it owns.
//!
//! - `LiveValue`: lifecycle-aware, synchronous push of every write
//! - `StateValue`: hot, conflated, replays the current value
//! - `plain_stream`: cold, restarted per subscription
//! - `EventStream`: hot, transient, no replay

pub mod background;
pub mod event;
pub mod holder;
pub mod live;
pub mod plain;
pub mod state;

pub use event::{EventHandle, EventStream};
pub use holder::{StateHolder, StreamSettings};
pub use live::{LiveHandle, LiveValue};
pub use plain::plain_stream;
pub use state::{StateHandle, StateValue};
