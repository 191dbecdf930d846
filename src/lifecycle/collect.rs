//! Lifecycle-gated collection of state values and events

use std::sync::Arc;

use futures_util::StreamExt;
use tokio::sync::watch;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::{BroadcastStream, WatchStream};

use crate::cells::{EventHandle, StateHandle};
use crate::lifecycle::{Lifecycle, LifecycleState};

/// Collect the latest value of a state cell while `lifecycle` is at least `min`.
///
/// Every entry into `min` delivers the then-current value first. A collector
/// that falls behind only sees the newest value.
pub fn collect_latest_on_lifecycle<T, F>(
    lifecycle: &Lifecycle,
    min: LifecycleState,
    handle: StateHandle<T>,
    collector: F,
) where
    T: Clone + Send + Sync + 'static,
    F: Fn(T) + Send + Sync + 'static,
{
    collect_watch_on_lifecycle(lifecycle, min, handle.subscribe(), collector);
}

/// Collect every event of an event stream while `lifecycle` is at least `min`.
///
/// Subscribes afresh on each entry, so events emitted while below `min` are missed.
pub fn collect_on_lifecycle<T, F>(
    lifecycle: &Lifecycle,
    min: LifecycleState,
    handle: EventHandle<T>,
    collector: F,
) where
    T: Clone + Send + 'static,
    F: Fn(T) + Send + Sync + 'static,
{
    let collector = Arc::new(collector);
    lifecycle.repeat_on_lifecycle(min, move || {
        let mut events = BroadcastStream::new(handle.subscribe());
        let collector = Arc::clone(&collector);
        async move {
            while let Some(event) = events.next().await {
                match event {
                    Ok(value) => collector(value),
                    Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Event collector fell behind, events dropped");
                    }
                }
            }
        }
    });
}

pub(crate) fn collect_watch_on_lifecycle<T, F>(
    lifecycle: &Lifecycle,
    min: LifecycleState,
    rx: watch::Receiver<T>,
    collector: F,
) where
    T: Clone + Send + Sync + 'static,
    F: Fn(T) + Send + Sync + 'static,
{
    let collector = Arc::new(collector);
    lifecycle.repeat_on_lifecycle(min, move || {
        // WatchStream yields the current value before any change
        let mut values = WatchStream::new(rx.clone());
        let collector = Arc::clone(&collector);
        async move {
            while let Some(value) = values.next().await {
                collector(value);
            }
        }
    });
}
