// libs/doctor-cell/src/models.rs
use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateDoctorRequest {
    pub name: String,
    pub specialty: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateSlotRequest {
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("invalid request: {0}")]
    Validation(String),

    #[error("doctor not found")]
    DoctorNotFound,

    #[error("the doctor already has a slot at that time")]
    DuplicateSlot,

    #[error("storage unavailable: {0}")]
    Storage(String),
}
