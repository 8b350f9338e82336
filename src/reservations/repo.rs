use sqlx::PgPool;
use time::Date;
use uuid::Uuid;

use super::{
    repo_types::{NewReservation, Reservation, ReservationChange, ReservationRow, ReservationStatus},
    schedule::TimeSlot,
};
use crate::store::StoreResult;

const RESERVATION_COLUMNS: &str =
    "id, user_id, service_id, date, time, notes, status, created_at";

fn convert(rows: Vec<ReservationRow>) -> StoreResult<Vec<Reservation>> {
    let out = rows
        .into_iter()
        .map(Reservation::try_from)
        .collect::<anyhow::Result<Vec<_>>>()?;
    Ok(out)
}

fn convert_one(row: Option<ReservationRow>) -> StoreResult<Option<Reservation>> {
    Ok(row.map(Reservation::try_from).transpose()?)
}

/// Slots on `date` held by reservations that are not cancelled.
pub async fn booked_slots(db: &PgPool, date: Date) -> StoreResult<Vec<TimeSlot>> {
    let rows: Vec<(String,)> = sqlx::query_as(
        r#"
        SELECT time
          FROM reservations
         WHERE date = $1 AND status <> 'cancelled'
        "#,
    )
    .bind(date)
    .fetch_all(db)
    .await?;

    let slots = rows
        .into_iter()
        .map(|(t,)| t.parse::<TimeSlot>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(anyhow::Error::new)?;
    Ok(slots)
}

/// Single-statement insert. `reservations_active_slot_key` turns a second
/// active booking for the same slot into a unique violation.
pub async fn insert(db: &PgPool, new: &NewReservation) -> StoreResult<Reservation> {
    let row = sqlx::query_as::<_, ReservationRow>(&format!(
        r#"
        INSERT INTO reservations (user_id, service_id, date, time, notes, status)
        VALUES ($1, $2, $3, $4, $5, 'pending')
        RETURNING {RESERVATION_COLUMNS}
        "#
    ))
    .bind(new.user_id)
    .bind(new.service_id)
    .bind(new.date)
    .bind(new.time.to_string())
    .bind(&new.notes)
    .fetch_one(db)
    .await?;
    Ok(Reservation::try_from(row)?)
}

pub async fn find_owned(db: &PgPool, id: Uuid, user_id: Uuid) -> StoreResult<Option<Reservation>> {
    let row = sqlx::query_as::<_, ReservationRow>(&format!(
        r#"
        SELECT {RESERVATION_COLUMNS}
          FROM reservations
         WHERE id = $1 AND user_id = $2
        "#
    ))
    .bind(id)
    .bind(user_id)
    .fetch_optional(db)
    .await?;
    convert_one(row)
}

pub async fn update_owned(
    db: &PgPool,
    id: Uuid,
    user_id: Uuid,
    change: &ReservationChange,
) -> StoreResult<Option<Reservation>> {
    let row = sqlx::query_as::<_, ReservationRow>(&format!(
        r#"
        UPDATE reservations
           SET date = $3, time = $4, notes = $5
         WHERE id = $1 AND user_id = $2 AND status IN ('pending', 'confirmed')
        RETURNING {RESERVATION_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(user_id)
    .bind(change.date)
    .bind(change.time.to_string())
    .bind(&change.notes)
    .fetch_optional(db)
    .await?;
    convert_one(row)
}

pub async fn set_status(
    db: &PgPool,
    id: Uuid,
    user_id: Uuid,
    from: ReservationStatus,
    to: ReservationStatus,
) -> StoreResult<Option<Reservation>> {
    let row = sqlx::query_as::<_, ReservationRow>(&format!(
        r#"
        UPDATE reservations
           SET status = $4
         WHERE id = $1 AND user_id = $2 AND status = $3
        RETURNING {RESERVATION_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(user_id)
    .bind(from.as_str())
    .bind(to.as_str())
    .fetch_optional(db)
    .await?;
    convert_one(row)
}

pub async fn list_for_user(db: &PgPool, user_id: Uuid) -> StoreResult<Vec<Reservation>> {
    let rows = sqlx::query_as::<_, ReservationRow>(&format!(
        r#"
        SELECT {RESERVATION_COLUMNS}
          FROM reservations
         WHERE user_id = $1
         ORDER BY date ASC, time ASC, created_at ASC
        "#
    ))
    .bind(user_id)
    .fetch_all(db)
    .await?;
    convert(rows)
}
