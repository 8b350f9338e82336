//! Runs against a live database. Set `DATABASE_URL` and pass `--ignored`.

use sqlx::PgPool;
use spa_booking::{
    auth::repo_types::NewUser,
    catalog::seed::seed_catalog,
    reservations::{
        repo_types::{NewReservation, ReservationChange, ReservationStatus},
        schedule::DailySchedule,
        services::{self, SlotRequest},
    },
    store::{PgStore, ReservationStore, ServiceCatalog, StoreError, UserStore},
};
use time::macros::date;
use uuid::Uuid;

async fn fixture(pool: PgPool) -> (PgStore, Uuid, Uuid) {
    let store = PgStore::from_pool(pool);
    seed_catalog(&store).await.unwrap();
    let service = store.list_services(None).await.unwrap()[0].id;
    let user = store
        .insert_user(NewUser {
            name: "Ana".into(),
            email: format!("ana-{}@spa.test", Uuid::new_v4()),
            phone: "555".into(),
            password_hash: "x".into(),
        })
        .await
        .unwrap()
        .id;
    (store, user, service)
}

#[ignore = "requires DATABASE_URL"]
#[sqlx::test(migrations = "./migrations")]
async fn unique_index_rejects_second_active_booking(pool: PgPool) {
    let (store, user, service) = fixture(pool).await;
    let new = || NewReservation {
        user_id: user,
        service_id: service,
        date: date!(2025 - 06 - 01),
        time: "09:00".parse().unwrap(),
        notes: String::new(),
    };
    let first = store.insert_reservation(new()).await.unwrap();
    assert!(matches!(
        store.insert_reservation(new()).await,
        Err(StoreError::SlotTaken)
    ));

    store
        .set_status(first.id, user, ReservationStatus::Pending, ReservationStatus::Cancelled)
        .await
        .unwrap()
        .unwrap();
    let again = store.insert_reservation(new()).await.unwrap();
    assert_eq!(again.status, ReservationStatus::Pending);
}

#[ignore = "requires DATABASE_URL"]
#[sqlx::test(migrations = "./migrations")]
async fn moving_onto_a_held_slot_conflicts(pool: PgPool) {
    let (store, user, service) = fixture(pool).await;
    let day = date!(2025 - 06 - 01);
    let at = |t: &str| NewReservation {
        user_id: user,
        service_id: service,
        date: day,
        time: t.parse().unwrap(),
        notes: String::new(),
    };
    store.insert_reservation(at("10:00")).await.unwrap();
    let other = store.insert_reservation(at("11:00")).await.unwrap();

    let err = store
        .update_owned(
            other.id,
            user,
            ReservationChange {
                date: day,
                time: "10:00".parse().unwrap(),
                notes: String::new(),
            },
        )
        .await;
    assert!(matches!(err, Err(StoreError::SlotTaken)));

    let foreign = store
        .update_owned(
            other.id,
            Uuid::new_v4(),
            ReservationChange {
                date: day,
                time: "12:00".parse().unwrap(),
                notes: String::new(),
            },
        )
        .await
        .unwrap();
    assert!(foreign.is_none());
}

#[ignore = "requires DATABASE_URL"]
#[sqlx::test(migrations = "./migrations")]
async fn concurrent_creates_admit_exactly_one(pool: PgPool) {
    let (store, user, service) = fixture(pool).await;
    let schedule = DailySchedule::default();

    let mut handles = Vec::new();
    for _ in 0..12 {
        let store = store.clone();
        let schedule = schedule.clone();
        handles.push(tokio::spawn(async move {
            let req = SlotRequest {
                date: date!(2025 - 06 - 02),
                time: "16:00".parse().unwrap(),
                notes: None,
            };
            services::create_reservation(&store, &schedule, user, service, req).await
        }));
    }

    let mut ok = 0;
    for h in handles {
        if h.await.unwrap().is_ok() {
            ok += 1;
        }
    }
    assert_eq!(ok, 1);
    assert_eq!(store.booked_slots(date!(2025 - 06 - 02)).await.unwrap().len(), 1);
}
