// libs/booking-cell/src/services/coordinator.rs
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use shared_database::{BookingStore, StoreError};
use shared_models::{Appointment, PatientDetails};

use crate::models::BookingError;

/// Booking transaction coordinator. Validation happens before storage
/// is touched; the claim itself is a single atomic unit inside the
/// store, executed under the slot's exclusive row lock.
pub struct BookingCoordinator {
    store: Arc<dyn BookingStore>,
}

impl BookingCoordinator {
    pub fn new(store: Arc<dyn BookingStore>) -> Self {
        Self { store }
    }

    /// Claim a slot for a patient. On success exactly one new pending
    /// appointment exists and the slot is booked; on any failure no new
    /// appointment exists and the slot is unchanged.
    pub async fn book(
        &self,
        slot_id: i64,
        patient: PatientDetails,
    ) -> Result<Appointment, BookingError> {
        validate_patient(&patient)?;

        info!("booking slot {} for patient {}", slot_id, patient.email);

        match self.store.claim_slot(slot_id, patient, Utc::now()).await {
            Ok(appointment) => {
                info!(
                    "slot {} booked, appointment {} is pending",
                    slot_id, appointment.id
                );
                Ok(appointment)
            }
            Err(StoreError::SlotMissing(_)) => Err(BookingError::SlotNotFound),
            Err(StoreError::SlotTaken(_)) => {
                warn!("booking rejected, slot {} already booked", slot_id);
                Err(BookingError::SlotTaken)
            }
            Err(StoreError::LockTimeout) => {
                warn!("booking timed out waiting for the lock on slot {}", slot_id);
                Err(BookingError::LockTimeout)
            }
            Err(other) => Err(BookingError::Storage(other.to_string())),
        }
    }
}

/// Structural completeness check on the patient fields. The routing
/// layer shapes requests, but an incomplete patient record is rejected
/// here regardless, before any storage work.
fn validate_patient(patient: &PatientDetails) -> Result<(), BookingError> {
    if patient.name.trim().is_empty() {
        return Err(BookingError::Validation("patient name is required".into()));
    }
    if patient.email.trim().is_empty() || !patient.email.contains('@') {
        return Err(BookingError::Validation(
            "a valid patient email is required".into(),
        ));
    }
    if patient.phone.trim().is_empty() {
        return Err(BookingError::Validation("patient phone is required".into()));
    }
    if !(1..=130).contains(&patient.age) {
        return Err(BookingError::Validation(
            "patient age must be between 1 and 130".into(),
        ));
    }
    if patient.reason.trim().is_empty() {
        return Err(BookingError::Validation(
            "a reason for the visit is required".into(),
        ));
    }
    Ok(())
}
