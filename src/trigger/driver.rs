//! Background task wiring an observer to a paginator

use super::detector::ScrollTrigger;
use super::observer::SentinelObserver;
use crate::pagination::Paginator;
use crate::store::PostStore;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Attach a scroll trigger to `paginator`.
///
/// Spawns a task that reads visibility reports from `observer` and calls
/// `load_more` whenever the trigger fires, at most once per report. The
/// trigger is enabled only while the paginator reports `trigger_enabled`.
/// The task ends when the returned handle is detached or dropped, or when
/// the observer ends. A `load_more` already running is allowed to finish
/// first.
pub fn attach<S, O>(paginator: Arc<Paginator<S>>, observer: O) -> TriggerHandle
where
    S: PostStore + 'static,
    O: SentinelObserver + 'static,
{
    let (shutdown, stop) = watch::channel(false);
    let task = tokio::spawn(run(paginator, observer, stop));

    TriggerHandle {
        shutdown,
        task: Some(task),
    }
}

/// Keeps a scroll trigger attached; dropping it detaches
#[derive(Debug)]
pub struct TriggerHandle {
    shutdown: watch::Sender<bool>,
    task: Option<JoinHandle<u64>>,
}

impl TriggerHandle {
    /// Detach and wait for the task to stop, returning how often it fired
    pub async fn detach(mut self) -> u64 {
        let _ = self.shutdown.send(true);
        match self.task.take() {
            Some(task) => task.await.unwrap_or(0),
            None => 0,
        }
    }

    /// Wait for the task to stop on its own, when the observer ends
    pub async fn wait(mut self) -> u64 {
        match self.task.take() {
            Some(task) => task.await.unwrap_or(0),
            None => 0,
        }
    }

    /// Check if the task has stopped
    pub fn is_finished(&self) -> bool {
        self.task.as_ref().map_or(true, JoinHandle::is_finished)
    }
}

impl Drop for TriggerHandle {
    fn drop(&mut self) {
        let _ = self.shutdown.send(true);
    }
}

async fn run<S, O>(
    paginator: Arc<Paginator<S>>,
    mut observer: O,
    mut stop: watch::Receiver<bool>,
) -> u64
where
    S: PostStore,
    O: SentinelObserver,
{
    let mut trigger = ScrollTrigger::new();
    debug!("Scroll trigger attached");

    loop {
        if *stop.borrow() {
            break;
        }

        let report = tokio::select! {
            biased;
            changed = stop.changed() => {
                if changed.is_err() || *stop.borrow() {
                    break;
                }
                continue;
            }
            report = observer.next_visibility() => report,
        };

        let Some(visible) = report else {
            debug!("Sentinel observation ended");
            break;
        };

        if trigger.update(visible, paginator.trigger_enabled().await) {
            trigger.set_enabled(false);
            let outcome = paginator.load_more().await;
            debug!("Scroll trigger load finished: {:?}", outcome);
            // The next page moves the sentinel, wait for a new report
            trigger.set_enabled(paginator.trigger_enabled().await);
        }
    }

    info!("Scroll trigger detached after firing {} time(s)", trigger.fired());
    trigger.fired()
}
