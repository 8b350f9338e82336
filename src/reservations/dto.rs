use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use super::{
    repo_types::{iso_date, Reservation, ReservationStatus},
    schedule::TimeSlot,
};
use crate::{auth::dto::PublicUser, catalog::repo_types::Service};

/// Body of `POST /reservations`. Date and time arrive as strings and are
/// validated by the handler so bad input yields a 400 with a message.
#[derive(Debug, Deserialize)]
pub struct CreateReservationRequest {
    pub service_id: Uuid,
    pub date: String,
    pub time: String,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateReservationRequest {
    pub date: String,
    pub time: String,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Service fields embedded in reservation responses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServiceSummary {
    pub id: Uuid,
    pub name: String,
    pub price: i32,
    pub duration_minutes: i32,
    pub image: String,
}

impl From<&Service> for ServiceSummary {
    fn from(s: &Service) -> Self {
        Self {
            id: s.id,
            name: s.name.clone(),
            price: s.price,
            duration_minutes: s.duration_minutes,
            image: s.image.clone(),
        }
    }
}

/// Reservation with its service (and, on creation, its user) resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationView {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<PublicUser>,
    pub service: ServiceSummary,
    #[serde(with = "iso_date")]
    pub date: Date,
    pub time: TimeSlot,
    pub notes: String,
    pub status: ReservationStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl ReservationView {
    pub fn new(r: Reservation, service: &Service, user: Option<PublicUser>) -> Self {
        Self {
            id: r.id,
            user_id: r.user_id,
            user,
            service: service.into(),
            date: r.date,
            time: r.time,
            notes: r.notes,
            status: r.status,
            created_at: r.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}
