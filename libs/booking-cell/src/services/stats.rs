// libs/booking-cell/src/services/stats.rs
use std::sync::Arc;

use chrono::Utc;

use shared_database::{BookingStore, StoreCounts};

use crate::models::BookingError;

/// Read-only rollup over the two stores.
pub struct StatsService {
    store: Arc<dyn BookingStore>,
}

impl StatsService {
    pub fn new(store: Arc<dyn BookingStore>) -> Self {
        Self { store }
    }

    pub async fn overview(&self) -> Result<StoreCounts, BookingError> {
        self.store
            .counts(Utc::now().date_naive())
            .await
            .map_err(|e| BookingError::Storage(e.to_string()))
    }
}
