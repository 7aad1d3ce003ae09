// libs/doctor-cell/src/services/scheduling.rs
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::debug;

use shared_database::{BookingStore, StoreError};
use shared_models::Slot;

use crate::models::{CatalogError, CreateSlotRequest};

/// Creation and listing of bookable slots. The booking flag itself is
/// never written here; claiming and releasing slots belongs to the
/// booking cell.
pub struct SchedulingService {
    store: Arc<dyn BookingStore>,
}

impl SchedulingService {
    pub fn new(store: Arc<dyn BookingStore>) -> Self {
        Self { store }
    }

    pub async fn create_slot(
        &self,
        doctor_id: i64,
        request: CreateSlotRequest,
    ) -> Result<Slot, CatalogError> {
        if request.start_time >= request.end_time {
            return Err(CatalogError::Validation(
                "start time must be before end time".into(),
            ));
        }

        let slot = self
            .store
            .insert_slot(doctor_id, request.date, request.start_time, request.end_time)
            .await
            .map_err(|e| match e {
                StoreError::DoctorMissing(_) => CatalogError::DoctorNotFound,
                StoreError::DuplicateSlot { .. } => CatalogError::DuplicateSlot,
                other => CatalogError::Storage(other.to_string()),
            })?;

        debug!(
            "slot {} created for doctor {} on {} at {}",
            slot.id, slot.doctor_id, slot.date, slot.start_time
        );
        Ok(slot)
    }

    /// Unbooked slots for a doctor from `from` (default today) onward.
    pub async fn open_slots(
        &self,
        doctor_id: i64,
        from: Option<NaiveDate>,
    ) -> Result<Vec<Slot>, CatalogError> {
        let from = from.unwrap_or_else(|| Utc::now().date_naive());
        self.store
            .list_open_slots(doctor_id, from)
            .await
            .map_err(|e| match e {
                StoreError::DoctorMissing(_) => CatalogError::DoctorNotFound,
                other => CatalogError::Storage(other.to_string()),
            })
    }
}
