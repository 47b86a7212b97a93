//! # Curriculum Runtime
//!
//! Owns the file-backed stores for one data directory and the background
//! journal sweep.
//!
//! ## Startup Sequence
//!
//! 1. Validate configuration
//! 2. Create the data directory and take its `LOCK`
//! 3. Open `items.db` and `journal.db`
//! 4. Reconcile every section named by an unfinished journal record
//! 5. Sweep the journal every `reconcile_interval` until shutdown

use crate::config::RuntimeConfig;
use crate::lock::DataDirLock;
use anyhow::{Context, Result};
use cm_01_lecture_ordering::{
    FileBackedKVStore, ItemStore, KvItemStore, KvMoveJournal, LectureOrderingApi,
    LectureOrderingService, MoveJournal, ReconcileReport,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

/// Lecture documents and sections.
pub const ITEMS_FILE: &str = "items.db";
/// Move journal.
pub const JOURNAL_FILE: &str = "journal.db";

/// Ordering service over the file-backed stores.
pub type DurableOrderingService =
    LectureOrderingService<KvItemStore<FileBackedKVStore>, KvMoveJournal<FileBackedKVStore>>;

/// Running engine bound to one data directory.
pub struct CurriculumRuntime {
    service: Arc<DurableOrderingService>,
    config: RuntimeConfig,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
    // Declared last so the stores are dropped before the directory unlocks.
    lock: DataDirLock,
}

impl CurriculumRuntime {
    /// Lock the data directory and open its stores.
    pub fn open(config: RuntimeConfig) -> Result<Self> {
        config.validate()?;

        std::fs::create_dir_all(&config.data_dir).with_context(|| {
            format!("creating data directory {}", config.data_dir.display())
        })?;
        let lock = DataDirLock::acquire(&config.data_dir)?;

        let items = FileBackedKVStore::open(config.data_dir.join(ITEMS_FILE))
            .context("opening item store")?;
        let journal = FileBackedKVStore::open(config.data_dir.join(JOURNAL_FILE))
            .context("opening move journal")?;

        let service = Arc::new(LectureOrderingService::with_config(
            Arc::new(KvItemStore::new(items)),
            Arc::new(KvMoveJournal::new(journal)),
            config.ordering.clone(),
        ));

        info!(
            data_dir = %config.data_dir.display(),
            pid = lock.pid(),
            store_timeout_ms = config.ordering.store_timeout_ms,
            lock_timeout_ms = config.ordering.lock_timeout_ms,
            "Curriculum runtime opened"
        );

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        Ok(Self {
            service,
            config,
            shutdown_tx,
            shutdown_rx,
            lock,
        })
    }

    pub fn service(&self) -> Arc<DurableOrderingService> {
        Arc::clone(&self.service)
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Repair whatever interrupted operations left behind.
    ///
    /// Returns the number of sections whose numbering had to be rewritten.
    pub async fn recover(&self) -> Result<usize> {
        let reports = self
            .service
            .reconcile_pending()
            .await
            .context("reconciling pending journal records")?;
        let repaired = log_sweep(&reports);
        info!(
            sections_checked = reports.len(),
            sections_repaired = repaired,
            "Startup recovery complete"
        );
        Ok(repaired)
    }

    /// Spawn the periodic journal sweep.
    ///
    /// The first sweep runs one full interval after the call; startup
    /// recovery covers the time before that.
    pub fn start_sweeper(&self) -> JoinHandle<()> {
        let service = Arc::clone(&self.service);
        let period = self.config.reconcile_interval;
        let mut shutdown = self.shutdown_rx.clone();

        tokio::spawn(async move {
            let start = tokio::time::Instant::now() + period;
            let mut interval = tokio::time::interval_at(start, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = interval.tick() => sweep_once(service.as_ref()).await,
                    _ = shutdown.changed() => {
                        info!("[runtime] Shutdown signal received");
                        break;
                    }
                }
            }
        })
    }

    /// Stop the sweeper and wait for it to finish.
    pub async fn shutdown(&self, sweeper: JoinHandle<()>) {
        info!("Initiating graceful shutdown...");

        if let Err(e) = self.shutdown_tx.send(true) {
            error!("Failed to send shutdown signal: {}", e);
        }

        match tokio::time::timeout(Duration::from_secs(5), sweeper).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => error!("Sweeper task failed: {}", e),
            Err(_) => warn!("Sweeper did not stop within 5s"),
        }

        info!(data_dir = %self.lock.path().display(), "Shutdown complete");
    }
}

async fn sweep_once<S: ItemStore, J: MoveJournal>(service: &LectureOrderingService<S, J>) {
    match service.reconcile_pending().await {
        Ok(reports) => {
            log_sweep(&reports);
        }
        Err(e) => warn!(error = %e, "[runtime] journal sweep failed"),
    }
}

fn log_sweep(reports: &[ReconcileReport]) -> usize {
    let mut repaired = 0;
    for report in reports.iter().filter(|r| r.was_repaired()) {
        repaired += 1;
        warn!(
            section_id = %report.section_id,
            renumbered = report.renumbered,
            violation = ?report.violation,
            "[runtime] section renumbered"
        );
    }
    repaired
}
