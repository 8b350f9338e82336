use std::collections::{HashMap, HashSet};

use time::Date;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{
    dto::ReservationView,
    repo_types::{NewReservation, ReservationChange, ReservationStatus, Transition},
    schedule::{DailySchedule, TimeSlot},
};
use crate::{
    auth::dto::PublicUser,
    catalog::repo_types::Service,
    error::{AppError, AppResult},
    store::{ReservationStore, ServiceCatalog, UserStore},
};

pub const MAX_NOTES_CHARS: usize = 500;

const RESERVATION_NOT_FOUND: AppError = AppError::NotFound("reservation not found");
const SERVICE_NOT_FOUND: AppError = AppError::NotFound("service not found");

/// A requested slot plus free-text notes, already parsed.
#[derive(Debug, Clone)]
pub struct SlotRequest {
    pub date: Date,
    pub time: TimeSlot,
    pub notes: Option<String>,
}

impl SlotRequest {
    /// Checks the slot against the schedule and normalizes notes.
    fn validate(self, schedule: &DailySchedule) -> AppResult<(Date, TimeSlot, String)> {
        if !schedule.contains(&self.time) {
            return Err(AppError::validation(format!(
                "time {} is not an offered slot",
                self.time
            )));
        }
        let notes = self.notes.as_deref().unwrap_or_default().trim().to_string();
        if notes.chars().count() > MAX_NOTES_CHARS {
            return Err(AppError::validation(format!(
                "notes must be at most {MAX_NOTES_CHARS} characters"
            )));
        }
        Ok((self.date, self.time, notes))
    }
}

fn frozen(status: ReservationStatus) -> AppError {
    AppError::validation(format!("{status} reservations cannot be changed"))
}

/// Slots of `date` not held by any active reservation, in schedule order.
pub async fn available_slots<S>(
    store: &S,
    schedule: &DailySchedule,
    date: Date,
) -> AppResult<Vec<TimeSlot>>
where
    S: ReservationStore + ?Sized,
{
    let booked: HashSet<TimeSlot> = store.booked_slots(date).await?.into_iter().collect();
    let free = schedule.free_slots(&booked);
    debug!(%date, booked = booked.len(), free = free.len(), "availability computed");
    Ok(free)
}

pub async fn create_reservation<S>(
    store: &S,
    schedule: &DailySchedule,
    user_id: Uuid,
    service_id: Uuid,
    request: SlotRequest,
) -> AppResult<ReservationView>
where
    S: ReservationStore + ServiceCatalog + UserStore + ?Sized,
{
    let (date, time, notes) = request.validate(schedule)?;

    let service = store
        .find_service(service_id)
        .await?
        .ok_or(SERVICE_NOT_FOUND)?;

    let reservation = store
        .insert_reservation(NewReservation {
            user_id,
            service_id,
            date,
            time,
            notes,
        })
        .await
        .map_err(|e| {
            warn!(%user_id, %date, %time, error = %e, "slot claim failed");
            AppError::from(e)
        })?;

    let user = store.find_user(user_id).await?.map(PublicUser::from);

    info!(
        reservation_id = %reservation.id,
        %user_id,
        %service_id,
        %date,
        %time,
        "reservation created"
    );
    Ok(ReservationView::new(reservation, &service, user))
}

pub async fn update_reservation<S>(
    store: &S,
    schedule: &DailySchedule,
    reservation_id: Uuid,
    requester_id: Uuid,
    request: SlotRequest,
) -> AppResult<ReservationView>
where
    S: ReservationStore + ServiceCatalog + ?Sized,
{
    let (date, time, notes) = request.validate(schedule)?;

    let current = store
        .find_owned(reservation_id, requester_id)
        .await?
        .ok_or(RESERVATION_NOT_FOUND)?;

    if !current.status.is_editable() {
        return Err(frozen(current.status));
    }

    let moved = current.date != date || current.time != time;
    let updated = match store
        .update_owned(reservation_id, requester_id, ReservationChange { date, time, notes })
        .await?
    {
        Some(r) => r,
        // Status changed after the read above; report what it changed to.
        None => {
            return Err(match store.find_owned(reservation_id, requester_id).await? {
                Some(r) if !r.status.is_editable() => frozen(r.status),
                _ => RESERVATION_NOT_FOUND,
            });
        }
    };

    let service = resolve_service(store, updated.service_id).await?;
    info!(%reservation_id, user_id = %requester_id, %date, %time, moved, "reservation updated");
    Ok(ReservationView::new(updated, &service, None))
}

pub async fn cancel_reservation<S>(
    store: &S,
    reservation_id: Uuid,
    requester_id: Uuid,
) -> AppResult<()>
where
    S: ReservationStore + ?Sized,
{
    let current = store
        .find_owned(reservation_id, requester_id)
        .await?
        .ok_or(RESERVATION_NOT_FOUND)?;

    let to = ReservationStatus::Cancelled;
    match current.status.transition_to(to) {
        Transition::NoOp => {
            debug!(%reservation_id, "reservation already cancelled");
            Ok(())
        }
        Transition::Rejected => Err(AppError::InvalidTransition {
            from: current.status,
            to,
        }),
        Transition::Allowed => {
            store
                .set_status(reservation_id, requester_id, current.status, to)
                .await?
                .ok_or(AppError::Conflict("reservation changed concurrently, retry"))?;
            info!(
                %reservation_id,
                user_id = %requester_id,
                date = %current.date,
                time = %current.time,
                "reservation cancelled"
            );
            Ok(())
        }
    }
}

/// Every reservation of `user_id`, oldest slot first, with services resolved.
pub async fn list_for_user<S>(store: &S, user_id: Uuid) -> AppResult<Vec<ReservationView>>
where
    S: ReservationStore + ServiceCatalog + ?Sized,
{
    let reservations = store.list_for_user(user_id).await?;
    let mut services: HashMap<Uuid, Service> = HashMap::new();
    let mut out = Vec::with_capacity(reservations.len());
    for r in reservations {
        if !services.contains_key(&r.service_id) {
            let svc = resolve_service(store, r.service_id).await?;
            services.insert(svc.id, svc);
        }
        let service = &services[&r.service_id];
        out.push(ReservationView::new(r, service, None));
    }
    Ok(out)
}

async fn resolve_service<S>(store: &S, service_id: Uuid) -> AppResult<Service>
where
    S: ServiceCatalog + ?Sized,
{
    store.find_service(service_id).await?.ok_or_else(|| {
        AppError::Internal(anyhow::anyhow!(
            "reservation references missing service {service_id}"
        ))
    })
}
