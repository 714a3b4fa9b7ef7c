//! Periodic sync scheduler.
//!
//! Runs one [`CatalogSync`] at a time on a fixed interval:
//! - `start()` spawns the loop (optionally running once immediately)
//! - `stop()` lets the species in flight finish, skips the rest, and waits
//!   up to `shutdown_timeout_secs` for the run to end

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use super::config::SyncConfig;
use super::pipeline::CatalogSync;
use super::types::{SyncError, SyncReport, SyncStatus};

/// Drives [`CatalogSync`] on a schedule.
pub struct SyncScheduler {
    config: SyncConfig,
    sync: Arc<CatalogSync>,

    // Runtime state
    running: Arc<AtomicBool>,
    in_progress: Arc<AtomicBool>,
    stop_requested: Arc<AtomicBool>,
    last_run: Arc<RwLock<Option<SyncReport>>>,
    shutdown_tx: broadcast::Sender<()>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl SyncScheduler {
    /// Create a new scheduler.
    pub fn new(config: SyncConfig, sync: Arc<CatalogSync>) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);

        Self {
            config,
            sync,
            running: Arc::new(AtomicBool::new(false)),
            in_progress: Arc::new(AtomicBool::new(false)),
            stop_requested: Arc::new(AtomicBool::new(false)),
            last_run: Arc::new(RwLock::new(None)),
            shutdown_tx,
            handle: Mutex::new(None),
        }
    }

    /// Start the scheduler (spawns the background loop).
    pub async fn start(&self) {
        if self.running.swap(true, Ordering::SeqCst) {
            warn!("Sync scheduler already running");
            return;
        }

        self.stop_requested.store(false, Ordering::SeqCst);

        info!(
            "Starting sync scheduler (every {}s, limit {})",
            self.config.interval_secs, self.config.limit
        );

        let handle = self.spawn_loop();
        *self.handle.lock().await = Some(handle);
    }

    /// Stop the scheduler gracefully.
    pub async fn stop(&self) {
        if !self.running.swap(false, Ordering::SeqCst) {
            warn!("Sync scheduler not running");
            return;
        }

        info!("Stopping sync scheduler");

        self.stop_requested.store(true, Ordering::SeqCst);
        let _ = self.shutdown_tx.send(());

        if let Some(mut handle) = self.handle.lock().await.take() {
            let timeout = Duration::from_secs(self.config.shutdown_timeout_secs);
            if tokio::time::timeout(timeout, &mut handle).await.is_err() {
                warn!(
                    "Sync run did not finish within {}s, aborting",
                    self.config.shutdown_timeout_secs
                );
                handle.abort();
            }
        }

        info!("Sync scheduler stopped");
    }

    /// Run one sync now, outside the schedule.
    ///
    /// Refused while another run is in progress.
    pub async fn run_now(&self) -> Result<SyncReport, SyncError> {
        Self::run_once(
            &self.sync,
            &self.config,
            &self.in_progress,
            &self.stop_requested,
            &self.last_run,
        )
        .await
    }

    /// Ask the run in flight, scheduled or manual, to finish after its
    /// current species. Does not wait; `stop()` still does that.
    pub fn request_stop(&self) {
        if !self.stop_requested.swap(true, Ordering::SeqCst) {
            info!("Sync stop requested");
        }
    }

    /// Get current scheduler status.
    pub async fn status(&self) -> SyncStatus {
        SyncStatus {
            running: self.running.load(Ordering::Relaxed),
            in_progress: self.in_progress.load(Ordering::Relaxed),
            last_run: self.last_run.read().await.clone(),
        }
    }

    fn spawn_loop(&self) -> JoinHandle<()> {
        let running = Arc::clone(&self.running);
        let in_progress = Arc::clone(&self.in_progress);
        let stop_requested = Arc::clone(&self.stop_requested);
        let last_run = Arc::clone(&self.last_run);
        let sync = Arc::clone(&self.sync);
        let config = self.config.clone();
        let mut shutdown_rx = self.shutdown_tx.subscribe();

        tokio::spawn(async move {
            info!("Sync loop started");

            if config.run_on_start {
                if let Err(e) =
                    Self::run_once(&sync, &config, &in_progress, &stop_requested, &last_run).await
                {
                    warn!("Initial sync skipped: {}", e);
                }
            }

            loop {
                tokio::select! {
                    _ = shutdown_rx.recv() => {
                        info!("Sync loop received shutdown signal");
                        break;
                    }
                    _ = tokio::time::sleep(Duration::from_secs(config.interval_secs)) => {
                        if !running.load(Ordering::Relaxed) {
                            break;
                        }
                        if let Err(e) = Self::run_once(
                            &sync,
                            &config,
                            &in_progress,
                            &stop_requested,
                            &last_run,
                        ).await {
                            warn!("Scheduled sync skipped: {}", e);
                        }
                    }
                }
            }
            info!("Sync loop stopped");
        })
    }

    async fn run_once(
        sync: &CatalogSync,
        config: &SyncConfig,
        in_progress: &AtomicBool,
        stop_requested: &AtomicBool,
        last_run: &RwLock<Option<SyncReport>>,
    ) -> Result<SyncReport, SyncError> {
        if in_progress.swap(true, Ordering::SeqCst) {
            return Err(SyncError::AlreadyRunning);
        }
        let _guard = InProgressGuard(in_progress);

        let report = sync
            .sync_with_stop(config.limit, config.batch_size, stop_requested)
            .await;

        *last_run.write().await = Some(report.clone());

        Ok(report)
    }
}

/// Clears the in-progress flag when a run ends, including when its task is
/// aborted or its caller goes away mid-run.
struct InProgressGuard<'a>(&'a AtomicBool);

impl Drop for InProgressGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}
