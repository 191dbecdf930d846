//! Event stream - hot, transient events with no replay

use tokio::sync::broadcast;

/// Writer side of an event stream.
///
/// Events reach the subscribers attached at emission time only. With no
/// subscriber an event is simply lost.
#[derive(Clone)]
pub struct EventStream<T> {
    tx: broadcast::Sender<T>,
}

impl<T: Clone> EventStream<T> {
    /// `capacity` bounds how far a slow subscriber may fall behind
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity);
        EventStream { tx }
    }

    /// Emit an event, returning how many subscribers received it
    pub fn emit(&self, event: T) -> usize {
        self.tx.send(event).unwrap_or(0)
    }

    pub fn handle(&self) -> EventHandle<T> {
        EventHandle {
            tx: self.tx.clone(),
        }
    }
}

/// Read-only side of an event stream
#[derive(Clone)]
pub struct EventHandle<T> {
    tx: broadcast::Sender<T>,
}

impl<T: Clone> EventHandle<T> {
    pub fn subscribe(&self) -> broadcast::Receiver<T> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subscriber_loses_event() {
        let events = EventStream::new(4);
        assert_eq!(events.emit("lost"), 0);

        let mut rx = events.handle().subscribe();
        assert!(rx.try_recv().is_err(), "late subscribers get no replay");
    }

    #[test]
    fn test_every_subscriber_gets_every_emission() {
        let events = EventStream::new(4);
        let handle = events.handle();
        let mut first = handle.subscribe();
        let mut second = handle.subscribe();

        assert_eq!(events.emit("x"), 2);
        assert_eq!(events.emit("x"), 2);
        for rx in [&mut first, &mut second] {
            assert_eq!(rx.try_recv().unwrap(), "x");
            assert_eq!(rx.try_recv().unwrap(), "x");
        }
    }
}
