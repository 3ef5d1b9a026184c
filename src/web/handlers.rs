//! JSON API handlers. Slot math and booking rules live in `slots` and
//! `booking`; these only parse, delegate and shape responses.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::info;

use super::dto::{
    AppointmentsQuery, CreateAppointmentRequest, HealthResponse, ServiceDto, SlotsQuery,
    SlotsResponse, StatusUpdateRequest,
};
use super::error::AppError;
use super::AppState;
use crate::booking::BookingRequest;
use crate::models::{Appointment, Customer};
use crate::schedule::ScheduleSettings;
use crate::scheduler::{self, format_hhmm};
use crate::slots;

pub type HandlerResult<T> = Result<Json<T>, AppError>;

fn parse_date(raw: &str) -> Result<chrono::NaiveDate, AppError> {
    scheduler::parse_date(raw)
        .ok_or_else(|| AppError::BadRequest(format!("Invalid date '{}', expected YYYY-MM-DD", raw)))
}

fn parse_time(raw: &str) -> Result<chrono::NaiveTime, AppError> {
    scheduler::parse_time(raw)
        .ok_or_else(|| AppError::BadRequest(format!("Invalid time '{}', expected HH:MM", raw)))
}

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// GET /api/services
pub async fn list_services(State(state): State<AppState>) -> Json<Vec<ServiceDto>> {
    Json(state.services.iter().map(ServiceDto::from).collect())
}

/// GET /api/slots?date=YYYY-MM-DD&service_id=ID
pub async fn get_slots(
    State(state): State<AppState>,
    Query(query): Query<SlotsQuery>,
) -> HandlerResult<SlotsResponse> {
    let date = parse_date(&query.date)?;
    let service = state
        .service(&query.service_id)
        .ok_or_else(|| AppError::NotFound(format!("Service '{}' not found", query.service_id)))?;
    let settings = state.settings();
    let appointments = state.book.snapshot();

    let available = slots::generate_slots(
        date,
        service,
        &settings,
        &appointments,
        &state.services,
        state.now(),
    );

    Ok(Json(SlotsResponse {
        date: date.to_string(),
        service_id: service.id.clone(),
        duration_minutes: service.duration_or(settings.slot_duration),
        slots: available.into_iter().map(format_hhmm).collect(),
    }))
}

/// GET /api/appointments[?date=YYYY-MM-DD]
pub async fn list_appointments(
    State(state): State<AppState>,
    Query(query): Query<AppointmentsQuery>,
) -> HandlerResult<Vec<Appointment>> {
    let appointments = match query.date.as_deref() {
        Some(raw) => state.book.for_date(parse_date(raw)?),
        None => state.book.snapshot(),
    };
    Ok(Json(appointments))
}

/// POST /api/appointments
pub async fn create_appointment(
    State(state): State<AppState>,
    Json(request): Json<CreateAppointmentRequest>,
) -> Result<(StatusCode, Json<Appointment>), AppError> {
    let service = state
        .service(&request.service_id)
        .ok_or_else(|| AppError::NotFound(format!("Service '{}' not found", request.service_id)))?;
    let booking = BookingRequest {
        date: parse_date(&request.date)?,
        time: parse_time(&request.time)?,
        customer: Customer {
            name: request.customer_name,
            email: request.customer_email,
            phone: request.customer_phone.unwrap_or_default(),
        },
    };

    let appointment = state.book.create_appointment(
        booking,
        service,
        &state.settings(),
        &state.services,
        state.now(),
    )?;
    Ok((StatusCode::CREATED, Json(appointment)))
}

/// PUT /api/appointments/{id}/status
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<StatusUpdateRequest>,
) -> HandlerResult<Appointment> {
    Ok(Json(state.book.set_status(&id, request.status)?))
}

/// GET /api/settings
pub async fn get_settings(State(state): State<AppState>) -> Json<ScheduleSettings> {
    Json(state.settings())
}

/// PUT /api/settings
///
/// Replaces the weekly schedule. Invalid windows are rejected and the
/// current settings stay in place.
pub async fn update_settings(
    State(state): State<AppState>,
    Json(settings): Json<ScheduleSettings>,
) -> HandlerResult<ScheduleSettings> {
    settings.validate()?;
    state.replace_settings(settings.clone());
    info!("Schedule settings updated (grid {} min)", settings.slot_duration);
    Ok(Json(settings))
}
