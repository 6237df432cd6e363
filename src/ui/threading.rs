//! Background keep-alive task
//!
//! Runs beside the egui event loop until the window closes. It touches no
//! shared state; its only job is to keep ticking until the stop signal is
//! observed. The stop signal is a watch channel handed to the task at spawn
//! time, and it only prevents further ticks.

use crate::config::MIN_KEEP_ALIVE_INTERVAL_MS;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

pub const DEFAULT_KEEP_ALIVE_INTERVAL: Duration = Duration::from_millis(50);

pub struct KeepAlive {
    stop_tx: watch::Sender<bool>,
    handle: JoinHandle<u64>,
}

impl KeepAlive {
    /// Spawn the task on the current tokio runtime. Intervals below
    /// `MIN_KEEP_ALIVE_INTERVAL_MS` are raised to it.
    pub fn spawn(interval: Duration) -> Self {
        let interval = interval.max(Duration::from_millis(MIN_KEEP_ALIVE_INTERVAL_MS));
        let (stop_tx, stop_rx) = watch::channel(false);
        let handle = tokio::spawn(keep_alive_loop(stop_rx, interval));
        log::debug!("[KeepAlive] started (interval {:?})", interval);
        KeepAlive { stop_tx, handle }
    }

    /// Signal the task to stop and wait for it; returns the number of ticks run
    pub async fn stop(self) -> u64 {
        let _ = self.stop_tx.send(true);
        match self.handle.await {
            Ok(ticks) => {
                log::debug!("[KeepAlive] stopped after {} ticks", ticks);
                ticks
            }
            Err(e) => {
                log::warn!("[KeepAlive] task ended abnormally: {}", e);
                0
            }
        }
    }
}

async fn keep_alive_loop(mut stop_rx: watch::Receiver<bool>, interval: Duration) -> u64 {
    let mut ticks = 0u64;
    while !*stop_rx.borrow() {
        tokio::select! {
            _ = tokio::time::sleep(interval) => ticks += 1,
            changed = stop_rx.changed() => {
                if changed.is_err() {
                    // sender dropped without an explicit stop
                    break;
                }
            }
        }
    }
    ticks
}
