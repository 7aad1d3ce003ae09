// libs/booking-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use shared_database::{AppointmentFilter, BookingStore, StoreError};
use shared_models::error::AppError;

use crate::models::{BookSlotRequest, BookingError};
use crate::services::coordinator::BookingCoordinator;
use crate::services::lifecycle::LifecycleService;
use crate::services::stats::StatsService;

// ==============================================================================
// QUERY PARAMETER STRUCTS
// ==============================================================================

#[derive(Debug, Deserialize)]
pub struct AppointmentListParams {
    pub patient_email: Option<String>,
}

// ==============================================================================
// BOOKING HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn book_appointment(
    State(store): State<Arc<dyn BookingStore>>,
    Json(request): Json<BookSlotRequest>,
) -> Result<Json<Value>, AppError> {
    let coordinator = BookingCoordinator::new(Arc::clone(&store));

    let appointment = coordinator
        .book(request.slot_id, request.patient)
        .await
        .map_err(|e| match e {
            BookingError::Validation(msg) => AppError::ValidationError(msg),
            BookingError::SlotNotFound => AppError::NotFound("Slot not found".to_string()),
            BookingError::SlotTaken => {
                AppError::Conflict("Slot already booked, please pick another".to_string())
            }
            BookingError::LockTimeout => {
                AppError::Timeout("Timed out waiting for the slot, try again".to_string())
            }
            BookingError::Storage(msg) => AppError::Database(msg),
            other => AppError::Internal(other.to_string()),
        })?;

    Ok(Json(json!({
        "success": true,
        "appointment": appointment
    })))
}

#[axum::debug_handler]
pub async fn confirm_appointment(
    State(store): State<Arc<dyn BookingStore>>,
    Path(appointment_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let lifecycle = LifecycleService::new(Arc::clone(&store));

    let appointment = lifecycle.confirm(appointment_id).await.map_err(|e| match e {
        BookingError::NotFoundOrAlreadyProcessed => {
            AppError::NotFound("Appointment not found or already processed".to_string())
        }
        BookingError::Storage(msg) => AppError::Database(msg),
        other => AppError::Internal(other.to_string()),
    })?;

    Ok(Json(json!({
        "success": true,
        "appointment": appointment
    })))
}

#[axum::debug_handler]
pub async fn cancel_appointment(
    State(store): State<Arc<dyn BookingStore>>,
    Path(appointment_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let lifecycle = LifecycleService::new(Arc::clone(&store));

    let appointment = lifecycle.cancel(appointment_id).await.map_err(|e| match e {
        BookingError::NotFound => AppError::NotFound("Appointment not found".to_string()),
        BookingError::NotFoundOrAlreadyProcessed => {
            AppError::NotFound("Appointment not found or already processed".to_string())
        }
        BookingError::LockTimeout => {
            AppError::Timeout("Timed out waiting for the slot, try again".to_string())
        }
        BookingError::Storage(msg) => AppError::Database(msg),
        other => AppError::Internal(other.to_string()),
    })?;

    Ok(Json(json!({
        "success": true,
        "appointment": appointment
    })))
}

// ==============================================================================
// READ HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn get_appointment(
    State(store): State<Arc<dyn BookingStore>>,
    Path(appointment_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let appointment = store
        .get_appointment(appointment_id)
        .await
        .map_err(|e| match e {
            StoreError::AppointmentMissing(_) => {
                AppError::NotFound("Appointment not found".to_string())
            }
            other => AppError::Database(other.to_string()),
        })?;

    Ok(Json(json!({ "appointment": appointment })))
}

#[axum::debug_handler]
pub async fn list_appointments(
    State(store): State<Arc<dyn BookingStore>>,
    Query(params): Query<AppointmentListParams>,
) -> Result<Json<Value>, AppError> {
    let filter = AppointmentFilter {
        patient_email: params.patient_email,
    };

    let appointments = store
        .list_appointments(filter)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    Ok(Json(json!({
        "count": appointments.len(),
        "appointments": appointments
    })))
}

#[axum::debug_handler]
pub async fn get_booking_stats(
    State(store): State<Arc<dyn BookingStore>>,
) -> Result<Json<Value>, AppError> {
    let stats = StatsService::new(Arc::clone(&store))
        .overview()
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    Ok(Json(json!({ "stats": stats })))
}
