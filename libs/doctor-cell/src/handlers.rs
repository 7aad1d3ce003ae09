// libs/doctor-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};

use shared_database::BookingStore;
use shared_models::error::AppError;

use crate::models::{CatalogError, CreateDoctorRequest, CreateSlotRequest};
use crate::services::doctor::DoctorService;
use crate::services::scheduling::SchedulingService;

#[derive(Debug, Deserialize)]
pub struct OpenSlotParams {
    pub from: Option<NaiveDate>,
}

fn map_catalog_error(e: CatalogError) -> AppError {
    match e {
        CatalogError::Validation(msg) => AppError::ValidationError(msg),
        CatalogError::DoctorNotFound => AppError::NotFound("Doctor not found".to_string()),
        CatalogError::DuplicateSlot => {
            AppError::Conflict("The doctor already has a slot at that time".to_string())
        }
        CatalogError::Storage(msg) => AppError::Database(msg),
    }
}

#[axum::debug_handler]
pub async fn create_doctor(
    State(store): State<Arc<dyn BookingStore>>,
    Json(request): Json<CreateDoctorRequest>,
) -> Result<Json<Value>, AppError> {
    let doctor = DoctorService::new(Arc::clone(&store))
        .create_doctor(request)
        .await
        .map_err(map_catalog_error)?;

    Ok(Json(json!({ "success": true, "doctor": doctor })))
}

#[axum::debug_handler]
pub async fn list_doctors(
    State(store): State<Arc<dyn BookingStore>>,
) -> Result<Json<Value>, AppError> {
    let doctors = DoctorService::new(Arc::clone(&store))
        .list_doctors()
        .await
        .map_err(map_catalog_error)?;

    Ok(Json(json!({ "count": doctors.len(), "doctors": doctors })))
}

#[axum::debug_handler]
pub async fn create_slot(
    State(store): State<Arc<dyn BookingStore>>,
    Path(doctor_id): Path<i64>,
    Json(request): Json<CreateSlotRequest>,
) -> Result<Json<Value>, AppError> {
    let slot = SchedulingService::new(Arc::clone(&store))
        .create_slot(doctor_id, request)
        .await
        .map_err(map_catalog_error)?;

    Ok(Json(json!({ "success": true, "slot": slot })))
}

#[axum::debug_handler]
pub async fn list_open_slots(
    State(store): State<Arc<dyn BookingStore>>,
    Path(doctor_id): Path<i64>,
    Query(params): Query<OpenSlotParams>,
) -> Result<Json<Value>, AppError> {
    let slots = SchedulingService::new(Arc::clone(&store))
        .open_slots(doctor_id, params.from)
        .await
        .map_err(map_catalog_error)?;

    Ok(Json(json!({ "count": slots.len(), "slots": slots })))
}
