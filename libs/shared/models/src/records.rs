// libs/shared/models/src/records.rs
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Catalog entry for a doctor patients can book with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Doctor {
    pub id: i64,
    pub name: String,
    pub specialty: String,
}

/// A bookable time window for one doctor. `(doctor_id, date, start_time)`
/// is unique; `booked` is true exactly while an active appointment
/// (pending or confirmed) references this slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Slot {
    pub id: i64,
    pub doctor_id: i64,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub booked: bool,
}

/// Patient contact fields carried on an appointment. Opaque to the
/// booking logic beyond structural completeness checks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientDetails {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub age: i32,
    pub reason: String,
}

/// One patient's claim on a slot. Rows are append-only history: status
/// moves forward through the lifecycle and never returns to pending.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: i64,
    pub slot_id: i64,
    pub patient: PatientDetails,
    pub status: AppointmentStatus,
    pub booking_time: DateTime<Utc>,
    pub confirmation_time: Option<DateTime<Utc>>,
}

impl Appointment {
    /// Active appointments are the ones that keep their slot booked.
    pub fn is_active(&self) -> bool {
        matches!(
            self.status,
            AppointmentStatus::Pending | AppointmentStatus::Confirmed
        )
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Cancelled,
    Failed,
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Pending => write!(f, "pending"),
            AppointmentStatus::Confirmed => write!(f, "confirmed"),
            AppointmentStatus::Cancelled => write!(f, "cancelled"),
            AppointmentStatus::Failed => write!(f, "failed"),
        }
    }
}
