//! Live value - a single value pushed synchronously to active observers

use std::sync::Arc;

use parking_lot::{Mutex, ReentrantMutex};

use crate::lifecycle::{Lifecycle, LifecycleState};

type Observer<T> = Arc<dyn Fn(T) + Send + Sync>;

struct ObserverSlot<T> {
    id: u64,
    active: bool,
    observer: Observer<T>,
}

struct Shared<T> {
    value: T,
    next_id: u64,
    observers: Vec<ObserverSlot<T>>,
}

/// Cell state plus a dispatch lock serializing every delivery, so an
/// activation never overtakes a newer `set`
struct Inner<T> {
    state: Mutex<Shared<T>>,
    dispatch: ReentrantMutex<()>,
}

impl<T: Clone> Shared<T> {
    fn set_active(&mut self, id: u64, active: bool) -> Option<Observer<T>> {
        let slot = self.observers.iter_mut().find(|slot| slot.id == id)?;
        slot.active = active;
        Some(Arc::clone(&slot.observer))
    }
}

/// Writer side of a live value, held by the state holder.
///
/// Every `set` is dispatched, in order, to every observer whose lifecycle is
/// at least started. Equal values are dispatched again.
pub struct LiveValue<T> {
    shared: Arc<Inner<T>>,
}

impl<T> LiveValue<T>
where
    T: Clone + Send + 'static,
{
    pub fn new(initial: T) -> Self {
        LiveValue {
            shared: Arc::new(Inner {
                state: Mutex::new(Shared {
                    value: initial,
                    next_id: 0,
                    observers: Vec::new(),
                }),
                dispatch: ReentrantMutex::new(()),
            }),
        }
    }

    pub fn set(&self, value: T) {
        let _dispatch = self.shared.dispatch.lock();
        let active: Vec<Observer<T>> = {
            let mut shared = self.shared.state.lock();
            shared.value = value.clone();
            shared
                .observers
                .iter()
                .filter(|slot| slot.active)
                .map(|slot| Arc::clone(&slot.observer))
                .collect()
        };
        // observers run outside the state lock so they may read the value back
        for observer in active {
            observer(value.clone());
        }
    }

    pub fn value(&self) -> T {
        self.shared.state.lock().value.clone()
    }

    pub fn handle(&self) -> LiveHandle<T> {
        LiveHandle {
            shared: Arc::clone(&self.shared),
        }
    }
}

/// Read-only side of a live value
pub struct LiveHandle<T> {
    shared: Arc<Inner<T>>,
}

impl<T> Clone for LiveHandle<T> {
    fn clone(&self) -> Self {
        LiveHandle {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T> LiveHandle<T>
where
    T: Clone + Send + 'static,
{
    pub fn value(&self) -> T {
        self.shared.state.lock().value.clone()
    }

    pub fn observer_count(&self) -> usize {
        self.shared.state.lock().observers.len()
    }

    /// Observe while `owner` is at least started.
    ///
    /// Each entry into the started state delivers the current value; the
    /// observer is removed once the owner is destroyed.
    pub fn observe<F>(&self, owner: &Lifecycle, observer: F)
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        let id = {
            let mut shared = self.shared.state.lock();
            let id = shared.next_id;
            shared.next_id += 1;
            shared.observers.push(ObserverSlot {
                id,
                active: false,
                observer: Arc::new(observer),
            });
            id
        };
        let registration = Arc::new(Registration {
            shared: Arc::clone(&self.shared),
            id,
        });

        owner.repeat_on_lifecycle(LifecycleState::Started, move || {
            let registration = Arc::clone(&registration);
            async move {
                let _active = registration.activate();
                std::future::pending::<()>().await;
            }
        });
    }
}

/// Removes the observer slot once the repeat loop holding it ends
struct Registration<T> {
    shared: Arc<Inner<T>>,
    id: u64,
}

impl<T: Clone> Registration<T> {
    fn activate(self: &Arc<Self>) -> ActiveGuard<T> {
        let _dispatch = self.shared.dispatch.lock();
        let delivery = {
            let mut shared = self.shared.state.lock();
            let value = shared.value.clone();
            shared.set_active(self.id, true).map(|observer| (observer, value))
        };
        if let Some((observer, value)) = delivery {
            observer(value);
        }
        ActiveGuard {
            registration: Arc::clone(self),
        }
    }
}

impl<T> Drop for Registration<T> {
    fn drop(&mut self) {
        let id = self.id;
        self.shared.state.lock().observers.retain(|slot| slot.id != id);
    }
}

struct ActiveGuard<T: Clone> {
    registration: Arc<Registration<T>>,
}

impl<T: Clone> Drop for ActiveGuard<T> {
    fn drop(&mut self) {
        let id = self.registration.id;
        self.registration.shared.state.lock().set_active(id, false);
    }
}
