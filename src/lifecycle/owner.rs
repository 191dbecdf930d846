//! Lifecycle owner - a small state machine driving gated tasks

use std::future::Future;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Lifecycle states, ordered so that "at least started" is a comparison
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LifecycleState {
    Destroyed = 0,
    Initialized = 1,
    Created = 2,
    Started = 3,
    Resumed = 4,
}

const LEVELS: usize = 5;

impl LifecycleState {
    pub fn is_at_least(self, other: LifecycleState) -> bool {
        self >= other
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleState::Destroyed => "DESTROYED",
            LifecycleState::Initialized => "INITIALIZED",
            LifecycleState::Created => "CREATED",
            LifecycleState::Started => "STARTED",
            LifecycleState::Resumed => "RESUMED",
        }
    }

    fn level(self) -> usize {
        self as usize
    }
}

/// Events moving a lifecycle between states
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LifecycleEvent {
    Create,
    Start,
    Resume,
    Pause,
    Stop,
    Destroy,
}

impl LifecycleEvent {
    pub fn target_state(self) -> LifecycleState {
        match self {
            LifecycleEvent::Create => LifecycleState::Created,
            LifecycleEvent::Start => LifecycleState::Started,
            LifecycleEvent::Resume => LifecycleState::Resumed,
            LifecycleEvent::Pause => LifecycleState::Started,
            LifecycleEvent::Stop => LifecycleState::Created,
            LifecycleEvent::Destroy => LifecycleState::Destroyed,
        }
    }
}

/// Current state plus, per level, how many times the state dropped below it.
///
/// Gated tasks wait on the exit counter rather than the state itself, so a
/// stop immediately followed by a start is never missed between polls.
#[derive(Clone, Copy, Debug)]
struct Snapshot {
    state: LifecycleState,
    exits: [u64; LEVELS],
}

/// Owner of a lifecycle. Dropping it cancels every task it launched.
pub struct Lifecycle {
    state_tx: watch::Sender<Snapshot>,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl Lifecycle {
    pub fn new() -> Self {
        let (state_tx, _state_rx) = watch::channel(Snapshot {
            state: LifecycleState::Initialized,
            exits: [0; LEVELS],
        });
        Lifecycle { state_tx }
    }

    pub fn state(&self) -> LifecycleState {
        self.state_tx.borrow().state
    }

    /// Apply an event. Events arriving after destruction are ignored.
    pub fn handle(&self, event: LifecycleEvent) -> LifecycleState {
        let target = event.target_state();
        let mut from = None;

        self.state_tx.send_if_modified(|snapshot| {
            let current = snapshot.state;
            if current == LifecycleState::Destroyed || current == target {
                return false;
            }
            for (level, exits) in snapshot.exits.iter_mut().enumerate() {
                if current.level() >= level && target.level() < level {
                    *exits += 1;
                }
            }
            snapshot.state = target;
            from = Some(current);
            true
        });

        match from {
            Some(from) => tracing::info!(
                from = from.as_str(),
                to = target.as_str(),
                ?event,
                "Lifecycle transition"
            ),
            None if self.state() == LifecycleState::Destroyed => {
                tracing::debug!(?event, "Lifecycle already destroyed, event ignored");
            }
            None => {}
        }

        self.state()
    }

    /// Run a task until the owner is destroyed
    pub fn launch<Fut>(&self, fut: Fut) -> Option<JoinHandle<()>>
    where
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.launch_while(LifecycleState::Initialized, fut)
    }

    /// Run a one-off task while the owner stays at least `min`.
    ///
    /// Returns `None` without running anything if the owner is below `min`
    /// right now. The task is cancelled the moment the owner drops below `min`.
    pub fn launch_while<Fut>(&self, min: LifecycleState, fut: Fut) -> Option<JoinHandle<()>>
    where
        Fut: Future<Output = ()> + Send + 'static,
    {
        let mut state_rx = self.state_tx.subscribe();
        let snapshot = *state_rx.borrow();
        if !snapshot.state.is_at_least(min) {
            tracing::debug!(
                state = snapshot.state.as_str(),
                min = min.as_str(),
                "Not launching, lifecycle below minimum"
            );
            return None;
        }
        let level = min.level();
        let exits = snapshot.exits[level];

        Some(tokio::spawn(async move {
            tokio::select! {
                _ = fut => {}
                _ = state_rx.wait_for(|s| s.exits[level] > exits) => {}
            }
        }))
    }

    /// Start a fresh `block()` every time the owner enters `min`, and cancel
    /// it every time the owner leaves `min`. Ends once the owner is destroyed.
    pub fn repeat_on_lifecycle<F, Fut>(&self, min: LifecycleState, mut block: F) -> JoinHandle<()>
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let mut state_rx = self.state_tx.subscribe();
        let level = min.level();

        tokio::spawn(async move {
            loop {
                let exits = match state_rx
                    .wait_for(|s| s.state == LifecycleState::Destroyed || s.state.is_at_least(min))
                    .await
                {
                    Ok(s) if s.state != LifecycleState::Destroyed => s.exits[level],
                    _ => return,
                };

                let run = block();
                let finished = tokio::select! {
                    _ = run => true,
                    left = state_rx.wait_for(|s| s.exits[level] > exits) => {
                        if left.is_err() {
                            return;
                        }
                        false
                    }
                };

                // a block that completes on its own is not restarted until the next entry
                if finished && state_rx.wait_for(|s| s.exits[level] > exits).await.is_err() {
                    return;
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    async fn settle() {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    #[test]
    fn test_state_ordering() {
        assert!(LifecycleState::Resumed.is_at_least(LifecycleState::Started));
        assert!(LifecycleState::Started.is_at_least(LifecycleState::Started));
        assert!(!LifecycleState::Created.is_at_least(LifecycleState::Started));
        assert!(!LifecycleState::Destroyed.is_at_least(LifecycleState::Initialized));
    }

    #[test]
    fn test_events_after_destroy_are_ignored() {
        let lifecycle = Lifecycle::new();
        lifecycle.handle(LifecycleEvent::Create);
        lifecycle.handle(LifecycleEvent::Destroy);
        assert_eq!(lifecycle.handle(LifecycleEvent::Start), LifecycleState::Destroyed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeat_restarts_block_on_every_entry() {
        let lifecycle = Lifecycle::new();
        let starts = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&starts);
        lifecycle.repeat_on_lifecycle(LifecycleState::Started, move || {
            counter.fetch_add(1, Ordering::SeqCst);
            std::future::pending::<()>()
        });

        lifecycle.handle(LifecycleEvent::Create);
        settle().await;
        assert_eq!(starts.load(Ordering::SeqCst), 0);

        lifecycle.handle(LifecycleEvent::Start);
        settle().await;
        assert_eq!(starts.load(Ordering::SeqCst), 1);

        // resume/pause stay above the minimum and do not restart
        lifecycle.handle(LifecycleEvent::Resume);
        lifecycle.handle(LifecycleEvent::Pause);
        settle().await;
        assert_eq!(starts.load(Ordering::SeqCst), 1);

        lifecycle.handle(LifecycleEvent::Stop);
        settle().await;
        lifecycle.handle(LifecycleEvent::Start);
        settle().await;
        assert_eq!(starts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_quick_stop_start_is_not_missed() {
        let lifecycle = Lifecycle::new();
        let starts = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&starts);
        lifecycle.repeat_on_lifecycle(LifecycleState::Started, move || {
            counter.fetch_add(1, Ordering::SeqCst);
            std::future::pending::<()>()
        });

        lifecycle.handle(LifecycleEvent::Start);
        settle().await;
        lifecycle.handle(LifecycleEvent::Stop);
        lifecycle.handle(LifecycleEvent::Start);
        settle().await;
        assert_eq!(starts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeat_ends_on_destroy() {
        let lifecycle = Lifecycle::new();
        lifecycle.handle(LifecycleEvent::Start);
        let handle = lifecycle.repeat_on_lifecycle(LifecycleState::Started, || std::future::pending::<()>());
        settle().await;

        lifecycle.handle(LifecycleEvent::Destroy);
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("repeat loop should end")
            .unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_launch_while_is_cancelled_when_leaving() {
        let lifecycle = Lifecycle::new();
        lifecycle.handle(LifecycleEvent::Start);
        let ticks = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&ticks);

        let handle = lifecycle
            .launch_while(LifecycleState::Started, async move {
                loop {
                    counter.fetch_add(1, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_secs(1)).await;
                }
            })
            .expect("started lifecycle should launch");

        tokio::time::sleep(Duration::from_millis(2500)).await;
        lifecycle.handle(LifecycleEvent::Stop);
        handle.await.unwrap();
        let seen = ticks.load(Ordering::SeqCst);
        assert_eq!(seen, 3);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), seen);
    }

    #[tokio::test(start_paused = true)]
    async fn test_launch_below_minimum_is_noop() {
        let lifecycle = Lifecycle::new();
        lifecycle.handle(LifecycleEvent::Create);
        assert!(lifecycle.launch_while(LifecycleState::Started, async {}).is_none());

        lifecycle.handle(LifecycleEvent::Destroy);
        assert!(lifecycle.launch(async {}).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_owner_cancels_tasks() {
        let lifecycle = Lifecycle::new();
        lifecycle.handle(LifecycleEvent::Start);
        let handle = lifecycle.launch(std::future::pending::<()>()).unwrap();
        drop(lifecycle);
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("task should end with its owner")
            .unwrap();
    }
}
