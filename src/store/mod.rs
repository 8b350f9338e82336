use async_trait::async_trait;
use thiserror::Error;
use time::Date;
use uuid::Uuid;

use crate::{
    auth::repo_types::{NewUser, User},
    catalog::repo_types::{Category, NewService, Service},
    reservations::{
        repo_types::{NewReservation, Reservation, ReservationChange, ReservationStatus},
        schedule::TimeSlot,
    },
};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Partial unique index over `(date, time)` for reservations that still hold their slot.
pub const RESERVATION_SLOT_KEY: &str = "reservations_active_slot_key";
pub const USER_EMAIL_KEY: &str = "users_email_key";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("slot already taken")]
    SlotTaken,
    #[error("email already registered")]
    EmailTaken,
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &e {
            if db.is_unique_violation() {
                match db.constraint() {
                    Some(RESERVATION_SLOT_KEY) => return StoreError::SlotTaken,
                    Some(USER_EMAIL_KEY) => return StoreError::EmailTaken,
                    _ => {}
                }
            }
        }
        StoreError::Backend(anyhow::Error::new(e))
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fails with [`StoreError::EmailTaken`] if the email is registered.
    async fn insert_user(&self, new: NewUser) -> StoreResult<User>;
    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>>;
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;
}

#[async_trait]
pub trait ServiceCatalog: Send + Sync {
    async fn find_service(&self, id: Uuid) -> StoreResult<Option<Service>>;
    /// Available services, optionally restricted to one category, ordered by name.
    async fn list_services(&self, category: Option<Category>) -> StoreResult<Vec<Service>>;
    /// Inserts or refreshes a service keyed by name.
    async fn upsert_service(&self, new: NewService) -> StoreResult<Service>;
}

/// Reservation persistence. Writes that take a slot are atomic
/// insert-if-absent operations and report [`StoreError::SlotTaken`] when
/// another active reservation holds the same `(date, time)`.
#[async_trait]
pub trait ReservationStore: Send + Sync {
    /// Slots held on `date` by reservations that are not cancelled.
    async fn booked_slots(&self, date: Date) -> StoreResult<Vec<TimeSlot>>;

    async fn insert_reservation(&self, new: NewReservation) -> StoreResult<Reservation>;

    /// `None` when the reservation does not exist or is owned by someone else.
    async fn find_owned(&self, id: Uuid, user_id: Uuid) -> StoreResult<Option<Reservation>>;

    /// Moves a pending or confirmed reservation. The reservation never
    /// conflicts with itself. `None` when it is missing, foreign, or no
    /// longer editable.
    async fn update_owned(
        &self,
        id: Uuid,
        user_id: Uuid,
        change: ReservationChange,
    ) -> StoreResult<Option<Reservation>>;

    /// Compare-and-set on status. `None` when the row is missing, foreign,
    /// or no longer in `from`.
    async fn set_status(
        &self,
        id: Uuid,
        user_id: Uuid,
        from: ReservationStatus,
        to: ReservationStatus,
    ) -> StoreResult<Option<Reservation>>;

    /// All of a user's reservations ordered by date then time.
    async fn list_for_user(&self, user_id: Uuid) -> StoreResult<Vec<Reservation>>;
}

/// Everything the HTTP layer needs from persistence.
pub trait BookingStore: UserStore + ServiceCatalog + ReservationStore {}

impl<T> BookingStore for T where T: UserStore + ServiceCatalog + ReservationStore {}
