use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use transit_core::SeatHolder;
use transit_db::models::{ScheduledTrip, TripSeat};
use transit_db::queries::trips;
use transit_types::api::trips::{
    AssignCrewRequest, BindSeatLayoutRequest, BlockSeatsRequest, SeatAvailabilityResponse,
    TripDetailResponse, TripResponse, TripSearchQuery, UnblockSeatsRequest,
};
use transit_types::enums::UserRole;
use transit_types::AppError;

use crate::middleware::{require_role, AppState, AuthUser};
use crate::response::{api_error, ApiError};

fn to_trip_response(trip: ScheduledTrip) -> TripResponse {
    TripResponse {
        id: trip.id,
        bus_schedule_id: trip.bus_schedule_id,
        departure_date: trip.departure_date,
        departure_at: trip.departure_at,
        origin: trip.origin,
        destination: trip.destination,
        status: trip.status.parse().unwrap_or_default(),
        seats_available: trip.seats_available,
        seats_total: trip.seats_total,
    }
}

fn to_seat_response(seat: TripSeat) -> SeatAvailabilityResponse {
    SeatAvailabilityResponse {
        seat_id: seat.id,
        seat_number: seat.seat_number,
        seat_type: seat.seat_type.parse().unwrap_or_default(),
        status: seat.status.parse().unwrap_or_default(),
        price: seat.price,
    }
}

/// Public trip search — no auth required, mirrors the bus operator's own
/// listing surface.
pub async fn search_trips(
    State(state): State<AppState>,
    Query(query): Query<TripSearchQuery>,
) -> Result<Json<Vec<TripResponse>>, ApiError> {
    let found = trips::search(
        &state.pool,
        query.origin.as_deref(),
        query.destination.as_deref(),
        query.date,
    )
    .await
    .map_err(|e| api_error(AppError::Internal(e.to_string())))?;

    Ok(Json(found.into_iter().map(to_trip_response).collect()))
}

pub async fn get_trip(
    State(state): State<AppState>,
    Path(trip_id): Path<Uuid>,
) -> Result<Json<TripDetailResponse>, ApiError> {
    let trip = trips::find_by_id(&state.pool, trip_id)
        .await
        .map_err(|e| api_error(AppError::Internal(e.to_string())))?
        .ok_or_else(|| api_error(AppError::NotFound("trip not found".to_string())))?;

    let seats = trips::list_seats_for_trip(&state.pool, trip_id)
        .await
        .map_err(|e| api_error(AppError::Internal(e.to_string())))?;

    Ok(Json(TripDetailResponse {
        trip: to_trip_response(trip),
        seats: seats.into_iter().map(to_seat_response).collect(),
    }))
}

/// Reassigns a trip's driver/conductor. Admin-only — crew assignment is a
/// back-office operation, not something a bus owner self-serves today.
pub async fn assign_crew(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(trip_id): Path<Uuid>,
    Json(req): Json<AssignCrewRequest>,
) -> Result<Json<TripResponse>, ApiError> {
    require_role(&user, UserRole::Admin).map_err(api_error)?;

    let trip = state
        .trip_generator()
        .assign_crew(trip_id, req.driver_id, req.conductor_id)
        .await
        .map_err(api_error)?;

    Ok(Json(to_trip_response(trip)))
}

/// Rebinds a trip's seat layout. Admin-only, same reasoning as crew
/// assignment.
pub async fn bind_seat_layout(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(trip_id): Path<Uuid>,
    Json(req): Json<BindSeatLayoutRequest>,
) -> Result<Json<Vec<SeatAvailabilityResponse>>, ApiError> {
    require_role(&user, UserRole::Admin).map_err(api_error)?;

    let seats = state
        .trip_generator()
        .bind_layout(trip_id, req.seat_layout_template_id)
        .await
        .map_err(api_error)?;

    Ok(Json(seats.into_iter().map(to_seat_response).collect()))
}

/// Administrative override, not part of the booking flow — pulls seats out
/// of normal availability (spec §4.2 BlockSeats).
pub async fn block_seats(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(req): Json<BlockSeatsRequest>,
) -> Result<Json<Vec<SeatAvailabilityResponse>>, ApiError> {
    require_role(&user, UserRole::Admin).map_err(api_error)?;

    let seats = SeatHolder::block(&state.pool, &req.seat_ids)
        .await
        .map_err(api_error)?;

    Ok(Json(seats.into_iter().map(to_seat_response).collect()))
}

/// Reverses `block_seats` (spec §4.2 UnblockSeats).
pub async fn unblock_seats(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(req): Json<UnblockSeatsRequest>,
) -> Result<Json<Vec<SeatAvailabilityResponse>>, ApiError> {
    require_role(&user, UserRole::Admin).map_err(api_error)?;

    let seats = SeatHolder::unblock(&state.pool, &req.seat_ids)
        .await
        .map_err(api_error)?;

    Ok(Json(seats.into_iter().map(to_seat_response).collect()))
}
