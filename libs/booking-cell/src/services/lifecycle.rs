// libs/booking-cell/src/services/lifecycle.rs
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use shared_database::{BookingStore, StoreError};
use shared_models::{Appointment, AppointmentStatus};

use crate::models::BookingError;

/// Applies appointment state transitions with guard conditions. The
/// store re-checks the current status inside its own transaction, so a
/// racing sweep and confirm can never both succeed; this service owns
/// the transition table and the error mapping callers see.
pub struct LifecycleService {
    store: Arc<dyn BookingStore>,
}

impl LifecycleService {
    pub fn new(store: Arc<dyn BookingStore>) -> Self {
        Self { store }
    }

    /// Valid next statuses for a given current status. Pending is the
    /// only entry state; cancelled and failed are terminal. Nothing
    /// ever moves back to pending.
    pub fn allowed_transitions(status: AppointmentStatus) -> &'static [AppointmentStatus] {
        match status {
            AppointmentStatus::Pending => &[
                AppointmentStatus::Confirmed,
                AppointmentStatus::Cancelled,
                AppointmentStatus::Failed,
            ],
            AppointmentStatus::Confirmed => &[AppointmentStatus::Cancelled],
            AppointmentStatus::Cancelled | AppointmentStatus::Failed => &[],
        }
    }

    /// Confirm a pending appointment. A missing row and a row in any
    /// non-pending state report the same merged error kind; callers are
    /// not told which it was.
    pub async fn confirm(&self, appointment_id: i64) -> Result<Appointment, BookingError> {
        match self
            .store
            .confirm_appointment(appointment_id, Utc::now())
            .await
        {
            Ok(appointment) => {
                info!("appointment {} confirmed", appointment.id);
                Ok(appointment)
            }
            Err(StoreError::AppointmentMissing(_)) | Err(StoreError::WrongStatus(_, _)) => {
                warn!(
                    "confirm rejected for appointment {}: missing or already processed",
                    appointment_id
                );
                Err(BookingError::NotFoundOrAlreadyProcessed)
            }
            Err(other) => Err(BookingError::Storage(other.to_string())),
        }
    }

    /// Cancel a pending or confirmed appointment, releasing its slot in
    /// the same transaction.
    pub async fn cancel(&self, appointment_id: i64) -> Result<Appointment, BookingError> {
        match self.store.cancel_appointment(appointment_id).await {
            Ok(appointment) => {
                info!(
                    "appointment {} cancelled, slot {} released",
                    appointment.id, appointment.slot_id
                );
                Ok(appointment)
            }
            Err(StoreError::AppointmentMissing(_)) => Err(BookingError::NotFound),
            Err(StoreError::WrongStatus(_, _)) => Err(BookingError::NotFoundOrAlreadyProcessed),
            Err(StoreError::LockTimeout) => Err(BookingError::LockTimeout),
            Err(other) => Err(BookingError::Storage(other.to_string())),
        }
    }
}
