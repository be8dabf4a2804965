use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chrono::{DateTime, Utc};
use shared::{NewAlert, Storage};
use tokio::sync::{watch, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, sleep, Instant, MissedTickBehavior};
use tracing::{error, info};

use super::signal_generator::SignalSource;

/// Outcome of one pass over the watch-list.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TickReport {
    pub signals_written: usize,
    pub alerts_written: usize,
    pub failed_symbols: Vec<String>,
}

/// Regenerates one signal per watched symbol on a fixed period and raises an
/// alert for every strong one.
pub struct RefreshScheduler {
    storage: Arc<dyn Storage>,
    source: Arc<dyn SignalSource>,
    watch_list: Vec<String>,
    interval: Duration,
    warmup_delay: Duration,
    last_refresh: RwLock<Option<DateTime<Utc>>>,
}

impl RefreshScheduler {
    pub fn new(
        storage: Arc<dyn Storage>,
        source: Arc<dyn SignalSource>,
        watch_list: Vec<String>,
        interval: Duration,
        warmup_delay: Duration,
    ) -> Self {
        Self {
            storage,
            source,
            watch_list,
            interval,
            warmup_delay,
            last_refresh: RwLock::new(None),
        }
    }

    pub fn watch_list(&self) -> &[String] {
        &self.watch_list
    }

    /// When the last tick finished, if any has.
    pub async fn last_refresh(&self) -> Option<DateTime<Utc>> {
        *self.last_refresh.read().await
    }

    /// Symbols are handled one at a time. A failing symbol is logged and
    /// skipped; the rest of the list still runs.
    pub async fn run_tick(&self) -> TickReport {
        info!("Updating signals for {} symbols...", self.watch_list.len());
        let mut report = TickReport::default();

        for symbol in &self.watch_list {
            if let Err(e) = self.refresh_symbol(symbol, &mut report).await {
                error!("Failed to refresh signal for {}: {:#}", symbol, e);
                report.failed_symbols.push(symbol.clone());
            }
        }

        *self.last_refresh.write().await = Some(Utc::now());
        info!(
            "Signal update finished: {} signals, {} alerts, {} failures",
            report.signals_written,
            report.alerts_written,
            report.failed_symbols.len()
        );
        report
    }

    async fn refresh_symbol(&self, symbol: &str, report: &mut TickReport) -> Result<()> {
        let signal = self.source.generate(symbol);
        let label = signal.signal;

        self.storage.create_signal(signal).await?;
        report.signals_written += 1;

        if label.is_strong() {
            self.storage
                .create_alert(NewAlert::strong_signal(symbol, label))
                .await?;
            report.alerts_written += 1;
            info!("🔔 Strong signal on {} ({})", symbol, label);
        }
        Ok(())
    }

    /// Runs one warm-up tick after `warmup_delay`, then one tick every
    /// `interval` counted from the spawn. Stops once `shutdown` turns true or
    /// its sender is dropped; a tick in progress is finished first.
    pub fn spawn(self: Arc<Self>, mut shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let warmup = sleep(self.warmup_delay);
            tokio::pin!(warmup);
            let mut warmed_up = false;

            let mut ticker = interval_at(Instant::now() + self.interval, self.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            info!(
                "⏰ Refresh scheduler started: warm-up in {:?}, then every {:?}",
                self.warmup_delay, self.interval
            );

            loop {
                tokio::select! {
                    _ = &mut warmup, if !warmed_up => {
                        warmed_up = true;
                        self.run_tick().await;
                    }
                    _ = ticker.tick() => {
                        self.run_tick().await;
                    }
                    changed = shutdown.changed() => {
                        if changed.is_err() || *shutdown.borrow() {
                            break;
                        }
                    }
                }
            }

            info!("Refresh scheduler stopped");
        })
    }
}
