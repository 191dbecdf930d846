//! State holder - owns the four cells and the operations that drive them

use std::time::Duration;

use futures_util::stream::Stream;

use crate::cells::background::BackgroundTasks;
use crate::cells::event::{EventHandle, EventStream};
use crate::cells::live::{LiveHandle, LiveValue};
use crate::cells::plain::plain_stream;
use crate::cells::state::{StateHandle, StateValue};
use crate::constants::{
    DEFAULT_EVENT_CAPACITY, DEFAULT_ITEM_COUNT, DEFAULT_ITEM_DELAY_MS, EVENT_PAYLOAD,
    INITIAL_VALUE, LIVE_VALUE_PAYLOAD, STATE_VALUE_PAYLOAD,
};

/// Plain and event stream tuning
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StreamSettings {
    pub item_count: usize,
    pub item_delay: Duration,
    pub event_capacity: usize,
}

impl Default for StreamSettings {
    fn default() -> Self {
        StreamSettings {
            item_count: DEFAULT_ITEM_COUNT,
            item_delay: Duration::from_millis(DEFAULT_ITEM_DELAY_MS),
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

/// Sole writer of every cell. Surfaces get read-only handles.
pub struct StateHolder {
    live_value: LiveValue<String>,
    state_value: StateValue<String>,
    event_stream: EventStream<String>,
    background: BackgroundTasks,
    settings: StreamSettings,
}

impl Default for StateHolder {
    fn default() -> Self {
        Self::new(StreamSettings::default())
    }
}

impl StateHolder {
    pub fn new(settings: StreamSettings) -> Self {
        StateHolder {
            live_value: LiveValue::new(String::from(INITIAL_VALUE)),
            state_value: StateValue::new(String::from(INITIAL_VALUE)),
            event_stream: EventStream::new(settings.event_capacity),
            background: BackgroundTasks::new(),
            settings,
        }
    }

    pub fn settings(&self) -> StreamSettings {
        self.settings
    }

    pub fn live_value(&self) -> LiveHandle<String> {
        self.live_value.handle()
    }

    pub fn state_value(&self) -> StateHandle<String> {
        self.state_value.handle()
    }

    pub fn event_stream(&self) -> EventHandle<String> {
        self.event_stream.handle()
    }

    pub fn trigger_live_value(&self) {
        tracing::info!(value = LIVE_VALUE_PAYLOAD, "Trigger live value");
        self.live_value.set(String::from(LIVE_VALUE_PAYLOAD));
    }

    pub fn trigger_state_value(&self) {
        tracing::info!(value = STATE_VALUE_PAYLOAD, "Trigger state value");
        self.state_value.set(String::from(STATE_VALUE_PAYLOAD));
    }

    /// A fresh, independent item sequence; nothing is produced until it is polled
    pub fn trigger_plain_stream(&self) -> impl Stream<Item = String> + Send + 'static {
        tracing::info!(
            items = self.settings.item_count,
            delay_ms = self.settings.item_delay.as_millis() as u64,
            "Trigger plain stream"
        );
        plain_stream(self.settings.item_count, self.settings.item_delay)
    }

    /// Emit the event payload from a background task
    pub fn trigger_event_stream(&self) {
        tracing::info!(value = EVENT_PAYLOAD, "Trigger event stream");
        let events = self.event_stream.clone();
        self.background.spawn(async move {
            let receivers = events.emit(String::from(EVENT_PAYLOAD));
            if receivers == 0 {
                tracing::debug!("Event emitted with no subscribers, dropped");
            } else {
                tracing::debug!(receivers, "Event delivered");
            }
        });
    }
}
