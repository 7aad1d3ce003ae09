// libs/shared/database/src/memory.rs
//
// In-process implementation of the storage boundary. All rows live
// behind a single table lock so cross-record updates are atomic to
// every reader; claims and cancellations additionally serialize
// through per-slot row locks, which is what makes a contended claim
// block instead of reading a stale flag.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use tokio::sync::{Mutex, RwLock};
use tokio::time::timeout;
use tracing::debug;

use shared_models::{Appointment, AppointmentStatus, Doctor, PatientDetails, Slot};

use crate::store::{
    AppointmentFilter, AppointmentRecord, BookingStore, StoreCounts, StoreError,
};

const DEFAULT_LOCK_WAIT: Duration = Duration::from_secs(5);

#[derive(Default)]
struct Tables {
    doctors: BTreeMap<i64, Doctor>,
    slots: BTreeMap<i64, Slot>,
    appointments: BTreeMap<i64, Appointment>,
    doctor_seq: i64,
    slot_seq: i64,
    appointment_seq: i64,
}

pub struct MemoryStore {
    tables: RwLock<Tables>,
    // Row-lock registry. tokio's mutex queues waiters fairly, so
    // conflicting claims on one slot acquire in FIFO order.
    row_locks: StdMutex<HashMap<i64, Arc<Mutex<()>>>>,
    lock_wait: Duration,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_lock_wait(DEFAULT_LOCK_WAIT)
    }

    pub fn with_lock_wait(lock_wait: Duration) -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
            row_locks: StdMutex::new(HashMap::new()),
            lock_wait,
        }
    }

    fn row_lock(&self, slot_id: i64) -> Arc<Mutex<()>> {
        let mut locks = self
            .row_locks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(locks.entry(slot_id).or_default())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BookingStore for MemoryStore {
    async fn insert_doctor(&self, name: &str, specialty: &str) -> Result<Doctor, StoreError> {
        let mut guard = self.tables.write().await;
        guard.doctor_seq += 1;
        let doctor = Doctor {
            id: guard.doctor_seq,
            name: name.to_string(),
            specialty: specialty.to_string(),
        };
        guard.doctors.insert(doctor.id, doctor.clone());
        Ok(doctor)
    }

    async fn list_doctors(&self) -> Result<Vec<Doctor>, StoreError> {
        let guard = self.tables.read().await;
        Ok(guard.doctors.values().cloned().collect())
    }

    async fn insert_slot(
        &self,
        doctor_id: i64,
        date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> Result<Slot, StoreError> {
        let mut guard = self.tables.write().await;
        if !guard.doctors.contains_key(&doctor_id) {
            return Err(StoreError::DoctorMissing(doctor_id));
        }
        let duplicate = guard.slots.values().any(|slot| {
            slot.doctor_id == doctor_id && slot.date == date && slot.start_time == start_time
        });
        if duplicate {
            return Err(StoreError::DuplicateSlot {
                doctor_id,
                date,
                start_time,
            });
        }
        guard.slot_seq += 1;
        let slot = Slot {
            id: guard.slot_seq,
            doctor_id,
            date,
            start_time,
            end_time,
            booked: false,
        };
        guard.slots.insert(slot.id, slot.clone());
        Ok(slot)
    }

    async fn get_slot(&self, slot_id: i64) -> Result<Slot, StoreError> {
        let guard = self.tables.read().await;
        guard
            .slots
            .get(&slot_id)
            .cloned()
            .ok_or(StoreError::SlotMissing(slot_id))
    }

    async fn list_open_slots(
        &self,
        doctor_id: i64,
        from: NaiveDate,
    ) -> Result<Vec<Slot>, StoreError> {
        let guard = self.tables.read().await;
        if !guard.doctors.contains_key(&doctor_id) {
            return Err(StoreError::DoctorMissing(doctor_id));
        }
        Ok(guard
            .slots
            .values()
            .filter(|slot| slot.doctor_id == doctor_id && !slot.booked && slot.date >= from)
            .cloned()
            .collect())
    }

    async fn claim_slot(
        &self,
        slot_id: i64,
        patient: PatientDetails,
        booked_at: DateTime<Utc>,
    ) -> Result<Appointment, StoreError> {
        {
            let guard = self.tables.read().await;
            if !guard.slots.contains_key(&slot_id) {
                return Err(StoreError::SlotMissing(slot_id));
            }
        }

        // Exclusive row lock: a second claim on this slot parks here
        // until the first transaction commits, then re-reads the flag.
        let lock = self.row_lock(slot_id);
        let _row = timeout(self.lock_wait, lock.lock())
            .await
            .map_err(|_| StoreError::LockTimeout)?;

        let mut guard = self.tables.write().await;
        let tables = &mut *guard;
        {
            let slot = tables
                .slots
                .get_mut(&slot_id)
                .ok_or(StoreError::SlotMissing(slot_id))?;
            if slot.booked {
                return Err(StoreError::SlotTaken(slot_id));
            }
            slot.booked = true;
        }
        tables.appointment_seq += 1;
        let appointment = Appointment {
            id: tables.appointment_seq,
            slot_id,
            patient,
            status: AppointmentStatus::Pending,
            booking_time: booked_at,
            confirmation_time: None,
        };
        tables
            .appointments
            .insert(appointment.id, appointment.clone());
        debug!("slot {} claimed by appointment {}", slot_id, appointment.id);
        Ok(appointment)
    }

    async fn confirm_appointment(
        &self,
        appointment_id: i64,
        confirmed_at: DateTime<Utc>,
    ) -> Result<Appointment, StoreError> {
        let mut guard = self.tables.write().await;
        let appointment = guard
            .appointments
            .get_mut(&appointment_id)
            .ok_or(StoreError::AppointmentMissing(appointment_id))?;
        if appointment.status != AppointmentStatus::Pending {
            return Err(StoreError::WrongStatus(appointment_id, appointment.status));
        }
        appointment.status = AppointmentStatus::Confirmed;
        appointment.confirmation_time = Some(confirmed_at);
        Ok(appointment.clone())
    }

    async fn cancel_appointment(&self, appointment_id: i64) -> Result<Appointment, StoreError> {
        let slot_id = {
            let guard = self.tables.read().await;
            guard
                .appointments
                .get(&appointment_id)
                .ok_or(StoreError::AppointmentMissing(appointment_id))?
                .slot_id
        };

        // Same exclusion as the claim path, so a cancel never interleaves
        // with a claim on the slot it is about to release.
        let lock = self.row_lock(slot_id);
        let _row = timeout(self.lock_wait, lock.lock())
            .await
            .map_err(|_| StoreError::LockTimeout)?;

        let mut guard = self.tables.write().await;
        let tables = &mut *guard;
        let appointment = {
            let appointment = tables
                .appointments
                .get_mut(&appointment_id)
                .ok_or(StoreError::AppointmentMissing(appointment_id))?;
            if !appointment.is_active() {
                return Err(StoreError::WrongStatus(appointment_id, appointment.status));
            }
            appointment.status = AppointmentStatus::Cancelled;
            appointment.clone()
        };
        if let Some(slot) = tables.slots.get_mut(&appointment.slot_id) {
            slot.booked = false;
        }
        debug!(
            "appointment {} cancelled, slot {} released",
            appointment_id, appointment.slot_id
        );
        Ok(appointment)
    }

    async fn expire_pending_before(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<Appointment>, StoreError> {
        let mut guard = self.tables.write().await;
        let tables = &mut *guard;

        let stale: Vec<i64> = tables
            .appointments
            .values()
            .filter(|a| a.status == AppointmentStatus::Pending && a.booking_time < cutoff)
            .map(|a| a.id)
            .collect();

        let mut expired = Vec::with_capacity(stale.len());
        for id in stale {
            if let Some(appointment) = tables.appointments.get_mut(&id) {
                appointment.status = AppointmentStatus::Failed;
                if let Some(slot) = tables.slots.get_mut(&appointment.slot_id) {
                    slot.booked = false;
                }
                expired.push(appointment.clone());
            }
        }
        Ok(expired)
    }

    async fn get_appointment(&self, appointment_id: i64) -> Result<Appointment, StoreError> {
        let guard = self.tables.read().await;
        guard
            .appointments
            .get(&appointment_id)
            .cloned()
            .ok_or(StoreError::AppointmentMissing(appointment_id))
    }

    async fn list_appointments(
        &self,
        filter: AppointmentFilter,
    ) -> Result<Vec<AppointmentRecord>, StoreError> {
        let guard = self.tables.read().await;
        let mut records: Vec<AppointmentRecord> = guard
            .appointments
            .values()
            .filter(|a| {
                filter
                    .patient_email
                    .as_deref()
                    .map_or(true, |email| a.patient.email == email)
            })
            .filter_map(|a| {
                let slot = guard.slots.get(&a.slot_id)?;
                let doctor = guard.doctors.get(&slot.doctor_id)?;
                Some(AppointmentRecord {
                    appointment: a.clone(),
                    slot: slot.clone(),
                    doctor_name: doctor.name.clone(),
                    doctor_specialty: doctor.specialty.clone(),
                })
            })
            .collect();
        records.sort_by(|a, b| {
            b.appointment
                .booking_time
                .cmp(&a.appointment.booking_time)
                .then(b.appointment.id.cmp(&a.appointment.id))
        });
        Ok(records)
    }

    async fn counts(&self, today: NaiveDate) -> Result<StoreCounts, StoreError> {
        let guard = self.tables.read().await;
        let pending = guard
            .appointments
            .values()
            .filter(|a| a.status == AppointmentStatus::Pending)
            .count() as i64;
        let confirmed = guard
            .appointments
            .values()
            .filter(|a| a.status == AppointmentStatus::Confirmed)
            .count() as i64;
        let open_future_slots = guard
            .slots
            .values()
            .filter(|s| !s.booked && s.date >= today)
            .count() as i64;
        Ok(StoreCounts {
            doctors: guard.doctors.len() as i64,
            open_future_slots,
            pending_appointments: pending,
            confirmed_appointments: confirmed,
        })
    }
}
