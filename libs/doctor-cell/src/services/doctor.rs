// libs/doctor-cell/src/services/doctor.rs
use std::sync::Arc;

use tracing::debug;

use shared_database::BookingStore;
use shared_models::Doctor;

use crate::models::{CatalogError, CreateDoctorRequest};

pub struct DoctorService {
    store: Arc<dyn BookingStore>,
}

impl DoctorService {
    pub fn new(store: Arc<dyn BookingStore>) -> Self {
        Self { store }
    }

    pub async fn create_doctor(&self, request: CreateDoctorRequest) -> Result<Doctor, CatalogError> {
        if request.name.trim().is_empty() {
            return Err(CatalogError::Validation("doctor name is required".into()));
        }
        if request.specialty.trim().is_empty() {
            return Err(CatalogError::Validation(
                "doctor specialty is required".into(),
            ));
        }

        let doctor = self
            .store
            .insert_doctor(request.name.trim(), request.specialty.trim())
            .await
            .map_err(|e| CatalogError::Storage(e.to_string()))?;

        debug!("doctor {} created ({})", doctor.id, doctor.specialty);
        Ok(doctor)
    }

    pub async fn list_doctors(&self) -> Result<Vec<Doctor>, CatalogError> {
        self.store
            .list_doctors()
            .await
            .map_err(|e| CatalogError::Storage(e.to_string()))
    }
}
