use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use tracing::{instrument, warn};
use uuid::Uuid;

use super::{
    dto::{CreateReservationRequest, MessageResponse, ReservationView, UpdateReservationRequest},
    repo_types::iso_date,
    schedule::TimeSlot,
    services::{self, SlotRequest},
};
use crate::{
    auth::AuthUser,
    error::{AppError, AppResult},
    extract::{ApiJson, ApiPath},
    state::AppState,
};

pub fn reservation_routes() -> Router<AppState> {
    Router::new()
        .route("/reservations", post(create_reservation))
        .route("/reservations/mine", get(list_mine))
        .route(
            "/reservations/:id",
            put(update_reservation).delete(cancel_reservation),
        )
        .route("/reservations/available/:date", get(available_slots))
}

fn parse_slot_request(date: &str, time: &str, notes: Option<String>) -> AppResult<SlotRequest> {
    let date = iso_date::parse(date).map_err(|e| {
        warn!(%date, error = %e, "bad reservation date");
        AppError::validation(format!("date must be YYYY-MM-DD, got {date:?}"))
    })?;
    let time = time
        .parse::<TimeSlot>()
        .map_err(|e| AppError::validation(e.to_string()))?;
    Ok(SlotRequest { date, time, notes })
}

/// GET /reservations/available/:date (public, no token needed)
#[instrument(skip(state))]
pub async fn available_slots(
    State(state): State<AppState>,
    ApiPath(date): ApiPath<String>,
) -> AppResult<Json<Vec<TimeSlot>>> {
    let date = iso_date::parse(&date)
        .map_err(|_| AppError::validation(format!("date must be YYYY-MM-DD, got {date:?}")))?;
    let slots = services::available_slots(state.store.as_ref(), &state.config.schedule, date).await?;
    Ok(Json(slots))
}

#[instrument(skip(state, payload))]
pub async fn create_reservation(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiJson(payload): ApiJson<CreateReservationRequest>,
) -> AppResult<(StatusCode, Json<ReservationView>)> {
    let request = parse_slot_request(&payload.date, &payload.time, payload.notes)?;
    let view = services::create_reservation(
        state.store.as_ref(),
        &state.config.schedule,
        user_id,
        payload.service_id,
        request,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(view)))
}

#[instrument(skip(state))]
pub async fn list_mine(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<Vec<ReservationView>>> {
    Ok(Json(services::list_for_user(state.store.as_ref(), user_id).await?))
}

#[instrument(skip(state, payload))]
pub async fn update_reservation(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<UpdateReservationRequest>,
) -> AppResult<Json<ReservationView>> {
    let request = parse_slot_request(&payload.date, &payload.time, payload.notes)?;
    let view = services::update_reservation(
        state.store.as_ref(),
        &state.config.schedule,
        id,
        user_id,
        request,
    )
    .await?;
    Ok(Json(view))
}

#[instrument(skip(state))]
pub async fn cancel_reservation(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    services::cancel_reservation(state.store.as_ref(), id, user_id).await?;
    Ok(Json(MessageResponse {
        message: "reservation cancelled",
    }))
}
