//! Lifecycle for the polling watcher.
//!
//! `start` spawns two tasks: the ticker that drives [`ClipboardWatcher`], and
//! a forwarder that hands each capture event to the registered
//! [`ClipboardChangeHandler`]. Both are aborted by `stop`.

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use anyhow::Result;
use tokio::{
    sync::{mpsc, Mutex},
    task::JoinHandle,
    time::{interval, MissedTickBehavior},
};
use tracing::{info, warn};

use cs_core::clipboard::ClipboardGate;
use cs_core::config::WatcherConfig;
use cs_core::ports::ClipboardChangeHandler;

use super::ClipboardWatcher;

pub struct PollingClipboardRuntime {
    gate: Arc<ClipboardGate>,
    handler: Arc<dyn ClipboardChangeHandler>,
    config: WatcherConfig,
    running: AtomicBool,
    handles: Mutex<Vec<JoinHandle<()>>>,
}

impl PollingClipboardRuntime {
    pub fn new(
        gate: Arc<ClipboardGate>,
        handler: Arc<dyn ClipboardChangeHandler>,
        config: WatcherConfig,
    ) -> Self {
        Self {
            gate,
            handler,
            config,
            running: AtomicBool::new(false),
            handles: Mutex::new(Vec::new()),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Starts polling. Calling it while already running is a no-op.
    pub async fn start(&self) -> Result<()> {
        if self
            .running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Ok(());
        }

        let (tx, mut rx) = mpsc::channel(self.config.channel_capacity.max(1));
        let watcher = ClipboardWatcher::new(self.gate.clone(), tx);
        let period = Duration::from_millis(self.config.poll_interval_ms.max(1));

        let poller = tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;

                if let Err(err) = watcher.check_once().await {
                    warn!(error = %err, "clipboard check failed");
                }
            }
        });

        let handler = self.handler.clone();
        let forwarder = tokio::spawn(async move {
            while let Some(payload) = rx.recv().await {
                if let Err(err) = handler.on_clipboard_changed(payload).await {
                    warn!(error = %err, "clipboard change handler failed");
                }
            }
        });

        self.handles.lock().await.extend([poller, forwarder]);
        info!(
            poll_interval_ms = self.config.poll_interval_ms,
            "clipboard watcher started"
        );
        Ok(())
    }

    /// Stops polling. Calling it while stopped is a no-op.
    pub async fn stop(&self) -> Result<()> {
        if !self.running.swap(false, Ordering::AcqRel) {
            return Ok(());
        }

        for handle in self.handles.lock().await.drain(..) {
            handle.abort();
        }
        info!("clipboard watcher stopped");
        Ok(())
    }
}
