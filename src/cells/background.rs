//! Background task set owned by the state holder

use std::future::Future;
use tokio::sync::watch;

/// Spawns tasks that are cancelled together when the set shuts down or is dropped
#[derive(Debug)]
pub struct BackgroundTasks {
    shutdown_tx: watch::Sender<bool>,
}

impl BackgroundTasks {
    pub fn new() -> Self {
        let (shutdown_tx, _shutdown_rx) = watch::channel(false);
        BackgroundTasks { shutdown_tx }
    }

    pub fn spawn<F>(&self, fut: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if *self.shutdown_tx.borrow() {
            tracing::debug!("Background tasks shut down, task dropped");
            return;
        }
        let mut shutdown_rx = self.shutdown_tx.subscribe();
        tokio::spawn(async move {
            tokio::select! {
                // a shutdown that happened before the first poll wins
                biased;
                _ = shutdown_rx.wait_for(|down| *down) => {}
                _ = fut => {}
            }
        });
    }

    pub fn shutdown(&self) {
        self.shutdown_tx.send_replace(true);
    }
}

impl Default for BackgroundTasks {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for BackgroundTasks {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_cancels_pending_work() {
        let tasks = BackgroundTasks::new();
        let ran = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&ran);
        tasks.spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            flag.store(true, Ordering::SeqCst);
        });

        tasks.shutdown();
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(!ran.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_work_not_yet_polled() {
        let tasks = BackgroundTasks::new();
        let ran = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&ran);
        tasks.spawn(async move {
            flag.store(true, Ordering::SeqCst);
        });

        drop(tasks);
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(!ran.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn test_spawn_after_shutdown_is_dropped() {
        let tasks = BackgroundTasks::new();
        tasks.shutdown();
        let ran = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&ran);
        tasks.spawn(async move {
            flag.store(true, Ordering::SeqCst);
        });
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(!ran.load(Ordering::SeqCst));
    }
}
