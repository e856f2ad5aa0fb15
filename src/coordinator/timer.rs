use super::CoordinatorHandle;
use std::time::Duration;
use tokio::time::{self, MissedTickBehavior};
use tracing::{info, warn};

/// Fires a scrape cycle every `period`, forever. The first cycle runs one
/// full period after startup; a manual pull can always run earlier. Overlap
/// needs no prevention here: concurrent triggers serialize in the
/// coordinator's mailbox.
pub fn spawn_scrape_timer(handle: CoordinatorHandle, period: Duration) {
    tokio::spawn(async move {
        let mut ticker = time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // interval() yields immediately; swallow that tick so the initial
        // scrape waits a full period.
        ticker.tick().await;

        info!(period_secs = period.as_secs(), "Scrape timer started");
        loop {
            ticker.tick().await;
            match handle.refresh().await {
                Ok(stats) => info!(
                    inserted = stats.inserted,
                    duplicates = stats.duplicates,
                    failures = stats.failures,
                    "Scheduled scrape cycle finished"
                ),
                Err(e) => warn!("Scheduled scrape cycle failed: {e}"),
            }
        }
    });
}
