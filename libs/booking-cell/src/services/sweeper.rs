// libs/booking-cell/src/services/sweeper.rs
use std::sync::Arc;
use std::time::Duration;

use chrono::{Duration as ChronoDuration, Utc};
use tracing::{debug, error, info};

use shared_config::AppConfig;
use shared_database::BookingStore;

use crate::models::BookingError;

/// Background reclamation of abandoned bookings. A pending appointment
/// that outlives the grace window is failed and its slot freed; each
/// tick is one independent, idempotent unit of work against current
/// committed state.
pub struct ExpirySweeper {
    store: Arc<dyn BookingStore>,
    grace: ChronoDuration,
    interval: Duration,
}

impl ExpirySweeper {
    pub fn new(store: Arc<dyn BookingStore>, config: &AppConfig) -> Self {
        Self {
            store,
            grace: ChronoDuration::seconds(config.pending_grace_seconds),
            interval: Duration::from_secs(config.sweep_interval_seconds),
        }
    }

    /// One reclamation pass. Everything pending and older than the
    /// grace window goes to failed in a single set-based transaction;
    /// zero qualifying rows is a normal no-op.
    pub async fn sweep_once(&self) -> Result<usize, BookingError> {
        let cutoff = Utc::now() - self.grace;
        let expired = self
            .store
            .expire_pending_before(cutoff)
            .await
            .map_err(|e| BookingError::Storage(e.to_string()))?;
        if expired.is_empty() {
            debug!("expiry sweep found nothing to reclaim");
        } else {
            info!(
                "expiry sweep failed {} stale pending appointments and released their slots",
                expired.len()
            );
        }
        Ok(expired.len())
    }

    /// Run the sweep on a fixed interval. Storage errors are absorbed
    /// here: nobody is waiting on a tick, and the next one retries
    /// against whatever state is current.
    pub fn spawn(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            loop {
                ticker.tick().await;
                if let Err(e) = self.sweep_once().await {
                    error!("expiry sweep failed, will retry next tick: {}", e);
                }
            }
        })
    }
}
