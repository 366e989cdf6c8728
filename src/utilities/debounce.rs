use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};

/// The single scheduled execution of a debounced function, if any.
#[derive(Debug, Default)]
struct PendingTimer {
    generation: u64,
    handle: Option<JoinHandle<()>>,
}

/// A function wrapped so that bursts of calls collapse into one trailing call.
///
/// Clones share the pending timer of the instance they were cloned from.
/// Calling requires a running tokio runtime.
pub struct Debounced<A> {
    func: Arc<dyn Fn(A) + Send + Sync>,
    wait: Duration,
    pending: Arc<Mutex<PendingTimer>>,
}

impl<A> Clone for Debounced<A> {
    fn clone(&self) -> Self {
        Self {
            func: Arc::clone(&self.func),
            wait: self.wait,
            pending: Arc::clone(&self.pending),
        }
    }
}

/// Wraps `func` so it only runs once `wait` has passed without another call.
pub fn debounce<A, F>(func: F, wait: Duration) -> Debounced<A>
where
    A: Send + 'static,
    F: Fn(A) + Send + Sync + 'static,
{
    Debounced {
        func: Arc::new(func),
        wait,
        pending: Arc::new(Mutex::new(PendingTimer::default())),
    }
}

impl<A: Send + 'static> Debounced<A> {
    /// Cancels the pending execution and schedules `func(args)` after `wait`.
    pub fn call(&self, args: A) {
        let mut pending = lock(&self.pending);

        if let Some(previous) = pending.handle.take() {
            previous.abort();
        }
        pending.generation = pending.generation.wrapping_add(1);

        let generation = pending.generation;
        let deadline = Instant::now() + self.wait;
        let func = Arc::clone(&self.func);
        let state = Arc::clone(&self.pending);

        pending.handle = Some(tokio::spawn(async move {
            sleep_until(deadline).await;

            {
                let mut pending = lock(&state);
                // Superseded between waking up and getting here.
                if pending.generation != generation {
                    return;
                }
                pending.handle = None;
            }

            func(args);
        }));
    }

    /// Whether a call is scheduled and has not fired yet.
    pub fn is_pending(&self) -> bool {
        lock(&self.pending).handle.is_some()
    }

    pub fn wait(&self) -> Duration {
        self.wait
    }
}

fn lock(pending: &Mutex<PendingTimer>) -> MutexGuard<'_, PendingTimer> {
    pending.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use tokio::time::{advance, sleep};

    use super::*;

    fn recorder() -> (Arc<Mutex<Vec<u32>>>, impl Fn(u32) + Send + Sync + 'static) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&calls);
        (calls, move |value| sink.lock().unwrap().push(value))
    }

    #[tokio::test(start_paused = true)]
    async fn burst_collapses_into_the_last_call() {
        let (calls, record) = recorder();
        let debounced = debounce(record, Duration::from_millis(100));

        for value in 1..=5 {
            debounced.call(value);
            sleep(Duration::from_millis(10)).await;
        }
        assert!(calls.lock().unwrap().is_empty());
        assert!(debounced.is_pending());

        sleep(Duration::from_millis(200)).await;

        assert_eq!(*calls.lock().unwrap(), vec![5]);
        assert!(!debounced.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn quiet_period_fires_exactly_once() {
        let (calls, record) = recorder();
        let debounced = debounce(record, Duration::from_millis(100));

        debounced.call(1);
        advance(Duration::from_millis(99)).await;
        tokio::task::yield_now().await;
        assert!(calls.lock().unwrap().is_empty());

        sleep(Duration::from_millis(500)).await;
        assert_eq!(*calls.lock().unwrap(), vec![1]);
    }

    #[tokio::test(start_paused = true)]
    async fn spaced_calls_each_fire() {
        let (calls, record) = recorder();
        let debounced = debounce(record, Duration::from_millis(100));

        debounced.call(1);
        sleep(Duration::from_millis(150)).await;
        debounced.call(2);
        sleep(Duration::from_millis(150)).await;

        assert_eq!(*calls.lock().unwrap(), vec![1, 2]);
    }

    #[tokio::test(start_paused = true)]
    async fn separate_wrappers_do_not_share_timers() {
        let (calls, record) = recorder();
        let record = Arc::new(record);
        let first = {
            let record = Arc::clone(&record);
            debounce(move |v: u32| record.as_ref()(v), Duration::from_millis(100))
        };
        let second = {
            let record = Arc::clone(&record);
            debounce(move |v: u32| record.as_ref()(v + 100), Duration::from_millis(100))
        };

        first.call(1);
        second.call(2);
        sleep(Duration::from_millis(150)).await;

        let mut seen = calls.lock().unwrap().clone();
        seen.sort_unstable();
        assert_eq!(seen, vec![1, 102]);
    }

    #[tokio::test(start_paused = true)]
    async fn clones_share_the_pending_timer() {
        let (calls, record) = recorder();
        let debounced = debounce(record, Duration::from_millis(100));
        let clone = debounced.clone();

        debounced.call(1);
        sleep(Duration::from_millis(20)).await;
        clone.call(2);
        sleep(Duration::from_millis(150)).await;

        assert_eq!(*calls.lock().unwrap(), vec![2]);
    }
}
