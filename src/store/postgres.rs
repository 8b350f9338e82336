use anyhow::Context;
use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};
use time::Date;
use uuid::Uuid;

use super::{ReservationStore, ServiceCatalog, StoreResult, UserStore};
use crate::{
    auth::repo_types::{NewUser, User},
    catalog::{
        self,
        repo_types::{Category, NewService, Service},
    },
    reservations::{
        self,
        repo_types::{NewReservation, Reservation, ReservationChange, ReservationStatus},
        schedule::TimeSlot,
    },
};

/// PostgreSQL-backed store.
#[derive(Clone)]
pub struct PgStore {
    db: PgPool,
}

impl PgStore {
    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        let db = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
            .context("connect to database")?;
        Ok(Self { db })
    }

    pub fn from_pool(db: PgPool) -> Self {
        Self { db }
    }

    pub fn pool(&self) -> &PgPool {
        &self.db
    }

    pub async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.db)
            .await
            .context("run migrations")?;
        Ok(())
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn insert_user(&self, new: NewUser) -> StoreResult<User> {
        User::create(&self.db, &new).await
    }

    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        User::find_by_id(&self.db, id).await
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        User::find_by_email(&self.db, email).await
    }
}

#[async_trait]
impl ServiceCatalog for PgStore {
    async fn find_service(&self, id: Uuid) -> StoreResult<Option<Service>> {
        catalog::repo::find_by_id(&self.db, id).await
    }

    async fn list_services(&self, category: Option<Category>) -> StoreResult<Vec<Service>> {
        catalog::repo::list_available(&self.db, category).await
    }

    async fn upsert_service(&self, new: NewService) -> StoreResult<Service> {
        catalog::repo::upsert(&self.db, &new).await
    }
}

#[async_trait]
impl ReservationStore for PgStore {
    async fn booked_slots(&self, date: Date) -> StoreResult<Vec<TimeSlot>> {
        reservations::repo::booked_slots(&self.db, date).await
    }

    async fn insert_reservation(&self, new: NewReservation) -> StoreResult<Reservation> {
        reservations::repo::insert(&self.db, &new).await
    }

    async fn find_owned(&self, id: Uuid, user_id: Uuid) -> StoreResult<Option<Reservation>> {
        reservations::repo::find_owned(&self.db, id, user_id).await
    }

    async fn update_owned(
        &self,
        id: Uuid,
        user_id: Uuid,
        change: ReservationChange,
    ) -> StoreResult<Option<Reservation>> {
        reservations::repo::update_owned(&self.db, id, user_id, &change).await
    }

    async fn set_status(
        &self,
        id: Uuid,
        user_id: Uuid,
        from: ReservationStatus,
        to: ReservationStatus,
    ) -> StoreResult<Option<Reservation>> {
        reservations::repo::set_status(&self.db, id, user_id, from, to).await
    }

    async fn list_for_user(&self, user_id: Uuid) -> StoreResult<Vec<Reservation>> {
        reservations::repo::list_for_user(&self.db, user_id).await
    }
}
