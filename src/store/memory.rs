use std::collections::HashMap;

use async_trait::async_trait;
use time::{Date, OffsetDateTime};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{ReservationStore, ServiceCatalog, StoreError, StoreResult, UserStore};
use crate::{
    auth::repo_types::{NewUser, User},
    catalog::repo_types::{Category, NewService, Service},
    reservations::{
        repo_types::{NewReservation, Reservation, ReservationChange, ReservationStatus},
        schedule::TimeSlot,
    },
};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    services: HashMap<Uuid, Service>,
    reservations: HashMap<Uuid, Reservation>,
}

impl Tables {
    /// True when an active reservation other than `except` holds `(date, time)`.
    fn slot_held(&self, date: Date, time: TimeSlot, except: Option<Uuid>) -> bool {
        self.reservations.values().any(|r| {
            Some(r.id) != except && r.status.holds_slot() && r.date == date && r.time == time
        })
    }
}

/// In-process store. Every write takes the single write lock, so the
/// slot check and the write it guards cannot interleave with another request.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert_user(&self, new: NewUser) -> StoreResult<User> {
        let mut t = self.tables.write().await;
        if t.users.values().any(|u| u.email == new.email) {
            return Err(StoreError::EmailTaken);
        }
        let user = User {
            id: Uuid::new_v4(),
            name: new.name,
            email: new.email,
            phone: new.phone,
            password_hash: new.password_hash,
            created_at: OffsetDateTime::now_utc(),
        };
        t.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let t = self.tables.read().await;
        Ok(t.users.values().find(|u| u.email == email).cloned())
    }
}

#[async_trait]
impl ServiceCatalog for MemoryStore {
    async fn find_service(&self, id: Uuid) -> StoreResult<Option<Service>> {
        Ok(self.tables.read().await.services.get(&id).cloned())
    }

    async fn list_services(&self, category: Option<Category>) -> StoreResult<Vec<Service>> {
        let t = self.tables.read().await;
        let mut out: Vec<Service> = t
            .services
            .values()
            .filter(|s| s.available)
            .filter(|s| category.map_or(true, |c| s.category == c))
            .cloned()
            .collect();
        out.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(out)
    }

    async fn upsert_service(&self, new: NewService) -> StoreResult<Service> {
        let mut t = self.tables.write().await;
        let id = t
            .services
            .values()
            .find(|s| s.name == new.name)
            .map(|s| s.id)
            .unwrap_or_else(Uuid::new_v4);
        let service = Service {
            id,
            name: new.name,
            description: new.description,
            price: new.price,
            duration_minutes: new.duration_minutes,
            image: new.image,
            category: new.category,
            available: true,
        };
        t.services.insert(id, service.clone());
        Ok(service)
    }
}

#[async_trait]
impl ReservationStore for MemoryStore {
    async fn booked_slots(&self, date: Date) -> StoreResult<Vec<TimeSlot>> {
        let t = self.tables.read().await;
        Ok(t.reservations
            .values()
            .filter(|r| r.date == date && r.status.holds_slot())
            .map(|r| r.time)
            .collect())
    }

    async fn insert_reservation(&self, new: NewReservation) -> StoreResult<Reservation> {
        let mut t = self.tables.write().await;
        if t.slot_held(new.date, new.time, None) {
            return Err(StoreError::SlotTaken);
        }
        let reservation = Reservation {
            id: Uuid::new_v4(),
            user_id: new.user_id,
            service_id: new.service_id,
            date: new.date,
            time: new.time,
            notes: new.notes,
            status: ReservationStatus::Pending,
            created_at: OffsetDateTime::now_utc(),
        };
        t.reservations.insert(reservation.id, reservation.clone());
        Ok(reservation)
    }

    async fn find_owned(&self, id: Uuid, user_id: Uuid) -> StoreResult<Option<Reservation>> {
        let t = self.tables.read().await;
        Ok(t.reservations
            .get(&id)
            .filter(|r| r.user_id == user_id)
            .cloned())
    }

    async fn update_owned(
        &self,
        id: Uuid,
        user_id: Uuid,
        change: ReservationChange,
    ) -> StoreResult<Option<Reservation>> {
        let mut t = self.tables.write().await;
        let owned = t
            .reservations
            .get(&id)
            .is_some_and(|r| r.user_id == user_id && r.status.is_editable());
        if !owned {
            return Ok(None);
        }
        if t.slot_held(change.date, change.time, Some(id)) {
            return Err(StoreError::SlotTaken);
        }
        let Some(r) = t.reservations.get_mut(&id) else {
            return Ok(None);
        };
        r.date = change.date;
        r.time = change.time;
        r.notes = change.notes;
        Ok(Some(r.clone()))
    }

    async fn set_status(
        &self,
        id: Uuid,
        user_id: Uuid,
        from: ReservationStatus,
        to: ReservationStatus,
    ) -> StoreResult<Option<Reservation>> {
        let mut t = self.tables.write().await;
        let reviving = !from.holds_slot() && to.holds_slot();
        if reviving {
            let held = match t.reservations.get(&id) {
                Some(r) => t.slot_held(r.date, r.time, Some(id)),
                None => false,
            };
            if held {
                return Err(StoreError::SlotTaken);
            }
        }
        match t.reservations.get_mut(&id) {
            Some(r) if r.user_id == user_id && r.status == from => {
                r.status = to;
                Ok(Some(r.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn list_for_user(&self, user_id: Uuid) -> StoreResult<Vec<Reservation>> {
        let t = self.tables.read().await;
        let mut out: Vec<Reservation> = t
            .reservations
            .values()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        out.sort_by(|a, b| {
            (a.date, a.time, a.created_at).cmp(&(b.date, b.time, b.created_at))
        });
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn new_res(user_id: Uuid, time: &str) -> NewReservation {
        NewReservation {
            user_id,
            service_id: Uuid::new_v4(),
            date: date!(2025 - 06 - 01),
            time: time.parse().unwrap(),
            notes: String::new(),
        }
    }

    #[tokio::test]
    async fn insert_refuses_held_slot_until_cancelled() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();
        let first = store.insert_reservation(new_res(user, "09:00")).await.unwrap();
        assert!(matches!(
            store.insert_reservation(new_res(user, "09:00")).await,
            Err(StoreError::SlotTaken)
        ));

        store
            .set_status(first.id, user, ReservationStatus::Pending, ReservationStatus::Cancelled)
            .await
            .unwrap()
            .expect("cancelled");
        store.insert_reservation(new_res(user, "09:00")).await.unwrap();
    }

    #[tokio::test]
    async fn set_status_is_compare_and_set() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();
        let r = store.insert_reservation(new_res(user, "10:00")).await.unwrap();
        let stale = store
            .set_status(r.id, user, ReservationStatus::Confirmed, ReservationStatus::Cancelled)
            .await
            .unwrap();
        assert!(stale.is_none());
        let foreign = store
            .set_status(r.id, Uuid::new_v4(), ReservationStatus::Pending, ReservationStatus::Cancelled)
            .await
            .unwrap();
        assert!(foreign.is_none());
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let store = MemoryStore::new();
        let new = || NewUser {
            name: "Ana".into(),
            email: "ana@example.com".into(),
            phone: "555".into(),
            password_hash: "x".into(),
        };
        store.insert_user(new()).await.unwrap();
        assert!(matches!(store.insert_user(new()).await, Err(StoreError::EmailTaken)));
    }

    #[tokio::test]
    async fn upsert_keeps_id_for_same_name() {
        let store = MemoryStore::new();
        let svc = |price| NewService {
            name: "Reflexología".into(),
            description: "pies".into(),
            price,
            duration_minutes: 45,
            image: "/images/reflexologia.jpg".into(),
            category: Category::Relajacion,
        };
        let a = store.upsert_service(svc(550)).await.unwrap();
        let b = store.upsert_service(svc(600)).await.unwrap();
        assert_eq!(a.id, b.id);
        assert_eq!(store.find_service(a.id).await.unwrap().unwrap().price, 600);
        assert_eq!(store.list_services(None).await.unwrap().len(), 1);
        assert!(store
            .list_services(Some(Category::Belleza))
            .await
            .unwrap()
            .is_empty());
    }
}
