//! State value - a hot, conflated single value

use tokio::sync::watch;

/// Writer side of a state value, held by the state holder.
///
/// Subscribers always see the current value first. Writing a value equal to
/// the current one notifies nobody.
pub struct StateValue<T> {
    tx: watch::Sender<T>,
}

impl<T> StateValue<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    pub fn new(initial: T) -> Self {
        let (tx, _rx) = watch::channel(initial);
        StateValue { tx }
    }

    pub fn set(&self, value: T) {
        self.tx.send_if_modified(|current| {
            if *current == value {
                return false;
            }
            *current = value;
            true
        });
    }

    pub fn value(&self) -> T {
        self.tx.borrow().clone()
    }

    pub fn handle(&self) -> StateHandle<T> {
        StateHandle {
            rx: self.tx.subscribe(),
        }
    }
}

/// Read-only side of a state value
#[derive(Clone)]
pub struct StateHandle<T> {
    rx: watch::Receiver<T>,
}

impl<T: Clone> StateHandle<T> {
    pub fn value(&self) -> T {
        self.rx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.rx.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_overwrites() {
        let cell = StateValue::new(String::from("a"));
        let handle = cell.handle();
        cell.set(String::from("b"));
        assert_eq!(cell.value(), "b");
        assert_eq!(handle.value(), "b");
    }

    #[test]
    fn test_equal_value_is_conflated() {
        let cell = StateValue::new(1);
        let mut rx = cell.handle().subscribe();
        rx.borrow_and_update();

        cell.set(1);
        assert!(!rx.has_changed().unwrap());

        cell.set(2);
        assert!(rx.has_changed().unwrap());
    }
}
