//! Background polling for the open alert count.
//!
//! The navigation badge shows how many alerts are currently open. Rather
//! than have every view fetch the count itself, one background task polls
//! the API on a fixed interval and publishes the latest count over a
//! watch channel. The task keeps the last good count across failed
//! fetches and stops on its own once nobody is watching.

use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, warn};

use crate::api::ApiClient;
use crate::error::Error;

/// A source the alert badge can poll for the open alert count.
pub trait AlertSource {
    /// Returns the number of currently open alerts.
    fn open_alert_count(&self) -> impl Future<Output = Result<u32, Error>> + Send;
}

impl AlertSource for ApiClient {
    fn open_alert_count(&self) -> impl Future<Output = Result<u32, Error>> + Send {
        self.fetch_alert_count()
    }
}

/// Handle to the background task that keeps the alert badge current.
///
/// The count starts at zero and moves whenever a poll comes back with a
/// different value. Dropping this handle and every subscribed receiver
/// ends the background task.
#[derive(Debug)]
pub struct AlertPoller {
    receiver: watch::Receiver<u32>,
}

impl AlertPoller {
    /// Spawns the polling task against `source`, fetching once
    /// immediately and then once per `poll_interval`.
    pub fn start<S>(source: S, poll_interval: Duration) -> AlertPoller
    where
        S: AlertSource + Send + Sync + 'static,
    {
        let (sender, receiver) = watch::channel(0);
        tokio::spawn(poll_loop(source, sender, poll_interval));

        AlertPoller { receiver }
    }

    /// Returns a receiver that wakes whenever the count changes.
    pub fn subscribe(&self) -> watch::Receiver<u32> {
        self.receiver.clone()
    }

    /// The most recently fetched count, or zero before the first fetch
    /// completes.
    pub fn latest(&self) -> u32 {
        *self.receiver.borrow()
    }
}

async fn poll_loop<S: AlertSource>(
    source: S,
    sender: watch::Sender<u32>,
    poll_interval: Duration,
) {
    let mut ticker = interval(poll_interval);
    // Slow fetches skip ticks rather than queue catch-up polls.
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = sender.closed() => {
                debug!("alert badge has no watchers left, stopping the poller");
                return;
            }
        }

        let outcome = tokio::select! {
            outcome = source.open_alert_count() => outcome,
            _ = sender.closed() => {
                debug!("alert badge has no watchers left, stopping the poller");
                return;
            }
        };

        match outcome {
            Ok(count) => {
                // Watchers only wake when the count actually moves.
                sender.send_if_modified(|current| {
                    if *current == count {
                        false
                    } else {
                        *current = count;
                        true
                    }
                });
            }
            Err(error) => warn!("could not refresh the alert count: {error}"),
        }
    }
}

#[cfg(test)]
mod alert_poller_tests {
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use super::{AlertPoller, AlertSource};
    use crate::error::Error;

    /// Plays back a fixed list of counts, then either repeats a steady
    /// count or fails every further fetch.
    #[derive(Clone)]
    struct ScriptedSource {
        script: Arc<Mutex<VecDeque<u32>>>,
        steady: Option<u32>,
        calls: Arc<AtomicUsize>,
    }

    impl ScriptedSource {
        fn steady(count: u32) -> ScriptedSource {
            ScriptedSource {
                script: Arc::new(Mutex::new(VecDeque::new())),
                steady: Some(count),
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn script<const N: usize>(counts: [u32; N], steady: Option<u32>) -> ScriptedSource {
            ScriptedSource {
                script: Arc::new(Mutex::new(VecDeque::from(counts))),
                steady,
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl AlertSource for ScriptedSource {
        fn open_alert_count(&self) -> impl Future<Output = Result<u32, Error>> + Send {
            async move {
                self.calls.fetch_add(1, Ordering::SeqCst);

                if let Some(count) = self.script.lock().unwrap().pop_front() {
                    return Ok(count);
                }

                match self.steady {
                    Some(count) => Ok(count),
                    None => Err(Error::Fetch(
                        "/alerts/count".to_string(),
                        "connection refused".to_string(),
                    )),
                }
            }
        }
    }

    /// Never responds, so the badge stays at its starting value.
    struct PendingSource;

    impl AlertSource for PendingSource {
        fn open_alert_count(&self) -> impl Future<Output = Result<u32, Error>> + Send {
            std::future::pending()
        }
    }

    #[tokio::test]
    async fn starts_at_zero_before_the_first_fetch_completes() {
        let poller = AlertPoller::start(PendingSource, Duration::from_millis(5));

        assert_eq!(poller.latest(), 0);
    }

    #[tokio::test]
    async fn publishes_the_fetched_count() {
        let poller = AlertPoller::start(ScriptedSource::steady(3), Duration::from_millis(5));
        let mut badge = poller.subscribe();

        badge.changed().await.unwrap();

        assert_eq!(*badge.borrow_and_update(), 3);
    }

    #[tokio::test]
    async fn keeps_the_last_good_count_across_failed_fetches() {
        let source = ScriptedSource::script([5], None);
        let poller = AlertPoller::start(source.clone(), Duration::from_millis(5));
        let mut badge = poller.subscribe();
        badge.changed().await.unwrap();

        tokio::time::sleep(Duration::from_millis(30)).await;

        assert!(source.calls() >= 2, "expected at least one failed fetch");
        assert_eq!(poller.latest(), 5);
    }

    #[tokio::test]
    async fn stops_once_every_watcher_is_dropped() {
        let source = ScriptedSource::steady(1);
        let poller = AlertPoller::start(source.clone(), Duration::from_millis(5));
        let mut badge = poller.subscribe();
        badge.changed().await.unwrap();

        drop(badge);
        drop(poller);
        tokio::time::sleep(Duration::from_millis(25)).await;
        let calls_after_drop = source.calls();
        tokio::time::sleep(Duration::from_millis(25)).await;

        assert_eq!(source.calls(), calls_after_drop);
    }
}
