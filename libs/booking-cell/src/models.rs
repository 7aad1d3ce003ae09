// libs/booking-cell/src/models.rs
use serde::Deserialize;

use shared_models::PatientDetails;

// ==============================================================================
// REQUEST MODELS
// ==============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct BookSlotRequest {
    pub slot_id: i64,
    pub patient: PatientDetails,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("invalid booking request: {0}")]
    Validation(String),

    #[error("slot not found")]
    SlotNotFound,

    /// The expected outcome under contention: somebody else holds the
    /// slot. Callers should offer another slot, not retry this one.
    #[error("slot already booked")]
    SlotTaken,

    #[error("appointment not found")]
    NotFound,

    /// Lifecycle guard failure. Deliberately does not distinguish a
    /// missing row from an already confirmed/cancelled/failed one.
    #[error("appointment not found or already processed")]
    NotFoundOrAlreadyProcessed,

    #[error("timed out waiting for the slot lock")]
    LockTimeout,

    #[error("storage unavailable: {0}")]
    Storage(String),
}
