//! Application constants
//!
//! Centralized location for payload strings and configuration defaults.

/// Value held by the live and state cells before any trigger
pub const INITIAL_VALUE: &str = "Hello World";

/// Payload written by the live value trigger
pub const LIVE_VALUE_PAYLOAD: &str = "LiveData";

/// Payload written by the state value trigger
pub const STATE_VALUE_PAYLOAD: &str = "StateFlow";

/// Payload emitted by the event stream trigger
pub const EVENT_PAYLOAD: &str = "SharedFlow";

/// Prefix of every plain stream item ("Item 0", "Item 1", ...)
pub const ITEM_PREFIX: &str = "Item";

/// Default number of items in a plain stream
pub const DEFAULT_ITEM_COUNT: usize = 5;

/// Default delay after each plain stream item
pub const DEFAULT_ITEM_DELAY_MS: u64 = 1000;

/// Default display time of a toast (long duration)
pub const DEFAULT_NOTIFICATION_MS: u64 = 2750;

/// Default number of events a slow subscriber may fall behind by
pub const DEFAULT_EVENT_CAPACITY: usize = 16;

/// Default log file, relative to the working directory
pub const DEFAULT_LOG_FILE: &str = "observable-compare.log";

/// Application name
pub const APP_NAME: &str = "Observable Compare";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
