// libs/shared/database/src/store.rs
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Serialize;
use thiserror::Error;

use shared_models::{Appointment, AppointmentStatus, Doctor, PatientDetails, Slot};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("doctor {0} does not exist")]
    DoctorMissing(i64),

    #[error("slot {0} does not exist")]
    SlotMissing(i64),

    #[error("slot {0} is already booked")]
    SlotTaken(i64),

    #[error("doctor {doctor_id} already has a slot on {date} at {start_time}")]
    DuplicateSlot {
        doctor_id: i64,
        date: NaiveDate,
        start_time: NaiveTime,
    },

    #[error("appointment {0} does not exist")]
    AppointmentMissing(i64),

    #[error("appointment {0} is {1}")]
    WrongStatus(i64, AppointmentStatus),

    #[error("timed out waiting for the slot lock")]
    LockTimeout,

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Appointment joined with its slot and a doctor summary, for listings.
#[derive(Debug, Clone, Serialize)]
pub struct AppointmentRecord {
    pub appointment: Appointment,
    pub slot: Slot,
    pub doctor_name: String,
    pub doctor_specialty: String,
}

#[derive(Debug, Clone, Default)]
pub struct AppointmentFilter {
    pub patient_email: Option<String>,
}

/// Point-in-time rollup over both tables.
#[derive(Debug, Clone, Serialize)]
pub struct StoreCounts {
    pub doctors: i64,
    pub open_future_slots: i64,
    pub pending_appointments: i64,
    pub confirmed_appointments: i64,
}

/// The storage boundary every cell talks through. The durable store is
/// the single source of truth and the only synchronization point: each
/// operation below is atomic as a unit, and the claim/cancel/expiry
/// operations serialize against the same per-slot exclusion so no two
/// writers ever act on a slot mid-mutation.
#[async_trait]
pub trait BookingStore: Send + Sync {
    async fn insert_doctor(&self, name: &str, specialty: &str) -> Result<Doctor, StoreError>;

    async fn list_doctors(&self) -> Result<Vec<Doctor>, StoreError>;

    /// Fails with `DuplicateSlot` when the doctor already has a slot at
    /// `(date, start_time)`.
    async fn insert_slot(
        &self,
        doctor_id: i64,
        date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> Result<Slot, StoreError>;

    async fn get_slot(&self, slot_id: i64) -> Result<Slot, StoreError>;

    /// Unbooked slots for a doctor dated `from` or later.
    async fn list_open_slots(&self, doctor_id: i64, from: NaiveDate)
        -> Result<Vec<Slot>, StoreError>;

    /// The booking transaction: re-reads the slot's `booked` flag under
    /// an exclusive per-slot lock, inserts a pending appointment and
    /// flips the flag as one atomic unit. A concurrent claim on the
    /// same slot blocks until this one commits, then observes the
    /// up-to-date flag; claims on a slot are totally ordered by lock
    /// acquisition. At most one of any set of concurrent claims
    /// succeeds, the rest fail with `SlotTaken`.
    async fn claim_slot(
        &self,
        slot_id: i64,
        patient: PatientDetails,
        booked_at: DateTime<Utc>,
    ) -> Result<Appointment, StoreError>;

    /// Pending → confirmed, recording the confirmation time. Fails with
    /// `WrongStatus` for any other current status; the slot stays
    /// booked either way.
    async fn confirm_appointment(
        &self,
        appointment_id: i64,
        confirmed_at: DateTime<Utc>,
    ) -> Result<Appointment, StoreError>;

    /// Pending/confirmed → cancelled, releasing the slot in the same
    /// transaction. No reader can observe the status change without the
    /// slot release or vice versa.
    async fn cancel_appointment(&self, appointment_id: i64) -> Result<Appointment, StoreError>;

    /// Set-based expiry: every pending appointment booked strictly
    /// before `cutoff` becomes failed and its slot is freed, all in one
    /// transaction. Returns the expired appointments; an empty result
    /// is a normal no-op.
    async fn expire_pending_before(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<Appointment>, StoreError>;

    async fn get_appointment(&self, appointment_id: i64) -> Result<Appointment, StoreError>;

    /// Joined listing, newest booking first.
    async fn list_appointments(
        &self,
        filter: AppointmentFilter,
    ) -> Result<Vec<AppointmentRecord>, StoreError>;

    async fn counts(&self, today: NaiveDate) -> Result<StoreCounts, StoreError>;
}
