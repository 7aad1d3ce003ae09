use std::sync::Arc;

use assert_matches::assert_matches;
use chrono::{Duration as ChronoDuration, NaiveDate, NaiveTime, Utc};

use booking_cell::models::BookingError;
use booking_cell::services::coordinator::BookingCoordinator;
use booking_cell::services::lifecycle::LifecycleService;
use booking_cell::services::stats::StatsService;
use booking_cell::services::sweeper::ExpirySweeper;
use shared_config::AppConfig;
use shared_database::{BookingStore, MemoryStore};
use shared_models::{AppointmentStatus, PatientDetails, Slot};

fn patient(email: &str) -> PatientDetails {
    PatientDetails {
        name: "Test Patient".to_string(),
        email: email.to_string(),
        phone: "+35812345".to_string(),
        age: 34,
        reason: "checkup".to_string(),
    }
}

fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

fn time(s: &str) -> NaiveTime {
    s.parse().unwrap()
}

async fn seed_slot(store: &Arc<MemoryStore>, start: &str, end: &str) -> Slot {
    let doctor = match store.list_doctors().await.unwrap().into_iter().next() {
        Some(doctor) => doctor,
        None => store
            .insert_doctor("Dr. Aino Virta", "cardiology")
            .await
            .unwrap(),
    };
    store
        .insert_slot(doctor.id, date("2031-05-20"), time(start), time(end))
        .await
        .unwrap()
}

fn shared(store: &Arc<MemoryStore>) -> Arc<dyn BookingStore> {
    Arc::clone(store) as Arc<dyn BookingStore>
}

// ==============================================================================
// COORDINATOR
// ==============================================================================

#[tokio::test]
async fn booking_rejects_incomplete_patient_details_before_storage() {
    let store = Arc::new(MemoryStore::new());
    let slot = seed_slot(&store, "10:00:00", "10:30:00").await;
    let coordinator = BookingCoordinator::new(shared(&store));

    let mut nameless = patient("ana@example.com");
    nameless.name = "  ".to_string();
    assert_matches!(
        coordinator.book(slot.id, nameless).await.unwrap_err(),
        BookingError::Validation(_)
    );

    let bad_email = patient("not-an-email");
    assert_matches!(
        coordinator.book(slot.id, bad_email).await.unwrap_err(),
        BookingError::Validation(_)
    );

    let mut unborn = patient("ana@example.com");
    unborn.age = 0;
    assert_matches!(
        coordinator.book(slot.id, unborn).await.unwrap_err(),
        BookingError::Validation(_)
    );

    // None of the rejected requests touched the slot.
    assert!(!store.get_slot(slot.id).await.unwrap().booked);
}

#[tokio::test]
async fn booking_unknown_slot_is_not_found() {
    let store = Arc::new(MemoryStore::new());
    let coordinator = BookingCoordinator::new(shared(&store));

    assert_matches!(
        coordinator.book(77, patient("ana@example.com")).await.unwrap_err(),
        BookingError::SlotNotFound
    );
}

#[tokio::test]
async fn concurrent_bookings_of_one_slot_have_a_single_winner() {
    let store = Arc::new(MemoryStore::new());
    let slot = seed_slot(&store, "10:00:00", "10:30:00").await;

    let mut handles = Vec::new();
    for i in 0..6 {
        let store = shared(&store);
        let slot_id = slot.id;
        handles.push(tokio::spawn(async move {
            BookingCoordinator::new(store)
                .book(slot_id, patient(&format!("p{}@example.com", i)))
                .await
        }));
    }

    let mut won = 0;
    let mut conflicts = 0;
    for result in futures::future::join_all(handles).await {
        match result.unwrap() {
            Ok(appointment) => {
                assert_eq!(appointment.status, AppointmentStatus::Pending);
                won += 1;
            }
            Err(BookingError::SlotTaken) => conflicts += 1,
            Err(other) => panic!("unexpected booking error: {other}"),
        }
    }

    assert_eq!(won, 1);
    assert_eq!(conflicts, 5);
}

// ==============================================================================
// LIFECYCLE
// ==============================================================================

#[test]
fn transition_table_matches_the_state_machine() {
    assert_eq!(
        LifecycleService::allowed_transitions(AppointmentStatus::Pending),
        &[
            AppointmentStatus::Confirmed,
            AppointmentStatus::Cancelled,
            AppointmentStatus::Failed,
        ]
    );
    assert_eq!(
        LifecycleService::allowed_transitions(AppointmentStatus::Confirmed),
        &[AppointmentStatus::Cancelled]
    );
    assert!(LifecycleService::allowed_transitions(AppointmentStatus::Cancelled).is_empty());
    assert!(LifecycleService::allowed_transitions(AppointmentStatus::Failed).is_empty());
}

#[tokio::test]
async fn booking_lifecycle_round_trip_frees_the_slot_for_the_next_patient() {
    let store = Arc::new(MemoryStore::new());
    let slot = seed_slot(&store, "10:00:00", "10:30:00").await;
    let coordinator = BookingCoordinator::new(shared(&store));
    let lifecycle = LifecycleService::new(shared(&store));

    // Patient A claims the slot.
    let a1 = coordinator
        .book(slot.id, patient("patient-a@example.com"))
        .await
        .unwrap();
    assert_eq!(a1.status, AppointmentStatus::Pending);
    assert!(store.get_slot(slot.id).await.unwrap().booked);

    // Patient B loses the race for the same slot.
    assert_matches!(
        coordinator
            .book(slot.id, patient("patient-b@example.com"))
            .await
            .unwrap_err(),
        BookingError::SlotTaken
    );

    // A confirms, then cancels; the slot opens up again.
    let confirmed = lifecycle.confirm(a1.id).await.unwrap();
    assert_eq!(confirmed.status, AppointmentStatus::Confirmed);

    let cancelled = lifecycle.cancel(a1.id).await.unwrap();
    assert_eq!(cancelled.status, AppointmentStatus::Cancelled);
    assert!(!store.get_slot(slot.id).await.unwrap().booked);

    // Now B gets the slot.
    let b1 = coordinator
        .book(slot.id, patient("patient-b@example.com"))
        .await
        .unwrap();
    assert_eq!(b1.status, AppointmentStatus::Pending);
}

#[tokio::test]
async fn confirm_reports_one_merged_error_for_missing_and_processed() {
    let store = Arc::new(MemoryStore::new());
    let slot = seed_slot(&store, "10:00:00", "10:30:00").await;
    let coordinator = BookingCoordinator::new(shared(&store));
    let lifecycle = LifecycleService::new(shared(&store));

    assert_matches!(
        lifecycle.confirm(500).await.unwrap_err(),
        BookingError::NotFoundOrAlreadyProcessed
    );

    let appointment = coordinator
        .book(slot.id, patient("ana@example.com"))
        .await
        .unwrap();
    lifecycle.confirm(appointment.id).await.unwrap();
    assert_matches!(
        lifecycle.confirm(appointment.id).await.unwrap_err(),
        BookingError::NotFoundOrAlreadyProcessed
    );

    // Confirm leaves the slot booked.
    assert!(store.get_slot(slot.id).await.unwrap().booked);
}

#[tokio::test]
async fn cancel_distinguishes_missing_from_already_processed() {
    let store = Arc::new(MemoryStore::new());
    let slot = seed_slot(&store, "10:00:00", "10:30:00").await;
    let coordinator = BookingCoordinator::new(shared(&store));
    let lifecycle = LifecycleService::new(shared(&store));

    assert_matches!(
        lifecycle.cancel(500).await.unwrap_err(),
        BookingError::NotFound
    );

    let appointment = coordinator
        .book(slot.id, patient("ana@example.com"))
        .await
        .unwrap();
    lifecycle.cancel(appointment.id).await.unwrap();
    assert_matches!(
        lifecycle.cancel(appointment.id).await.unwrap_err(),
        BookingError::NotFoundOrAlreadyProcessed
    );
}

// ==============================================================================
// EXPIRY SWEEPER
// ==============================================================================

#[tokio::test]
async fn sweep_fails_bookings_older_than_the_grace_window() {
    let store = Arc::new(MemoryStore::new());
    let slot = seed_slot(&store, "10:00:00", "10:30:00").await;
    let config = AppConfig::default();
    let sweeper = ExpirySweeper::new(shared(&store), &config);
    let lifecycle = LifecycleService::new(shared(&store));

    // Backdate the claim past the 120s grace window.
    let appointment = store
        .claim_slot(
            slot.id,
            patient("gone@example.com"),
            Utc::now() - ChronoDuration::seconds(121),
        )
        .await
        .unwrap();

    assert_eq!(sweeper.sweep_once().await.unwrap(), 1);
    assert_eq!(
        store.get_appointment(appointment.id).await.unwrap().status,
        AppointmentStatus::Failed
    );
    assert!(!store.get_slot(slot.id).await.unwrap().booked);

    // The sweep won; a late confirm is told the booking is gone.
    assert_matches!(
        lifecycle.confirm(appointment.id).await.unwrap_err(),
        BookingError::NotFoundOrAlreadyProcessed
    );

    // Running the sweep again changes nothing.
    assert_eq!(sweeper.sweep_once().await.unwrap(), 0);
}

#[tokio::test]
async fn sweep_spares_bookings_inside_the_grace_window() {
    let store = Arc::new(MemoryStore::new());
    let slot = seed_slot(&store, "10:00:00", "10:30:00").await;
    let config = AppConfig::default();
    let sweeper = ExpirySweeper::new(shared(&store), &config);

    let appointment = BookingCoordinator::new(shared(&store))
        .book(slot.id, patient("here@example.com"))
        .await
        .unwrap();

    assert_eq!(sweeper.sweep_once().await.unwrap(), 0);
    assert_eq!(
        store.get_appointment(appointment.id).await.unwrap().status,
        AppointmentStatus::Pending
    );
    assert!(store.get_slot(slot.id).await.unwrap().booked);
}

// ==============================================================================
// STATS
// ==============================================================================

#[tokio::test]
async fn overview_counts_doctors_slots_and_active_appointments() {
    let store = Arc::new(MemoryStore::new());
    let open = seed_slot(&store, "10:00:00", "10:30:00").await;
    let claimed = seed_slot(&store, "11:00:00", "11:30:00").await;
    let confirmed = seed_slot(&store, "12:00:00", "12:30:00").await;
    let coordinator = BookingCoordinator::new(shared(&store));
    let lifecycle = LifecycleService::new(shared(&store));

    coordinator
        .book(claimed.id, patient("ana@example.com"))
        .await
        .unwrap();
    let appointment = coordinator
        .book(confirmed.id, patient("ben@example.com"))
        .await
        .unwrap();
    lifecycle.confirm(appointment.id).await.unwrap();

    let stats = StatsService::new(shared(&store)).overview().await.unwrap();
    assert_eq!(stats.doctors, 1);
    assert_eq!(stats.open_future_slots, 1);
    assert_eq!(stats.pending_appointments, 1);
    assert_eq!(stats.confirmed_appointments, 1);
    assert!(!store.get_slot(open.id).await.unwrap().booked);
}
