use axum::extract::{Query, State};
use axum::response::Html;
use serde::Deserialize;
use tracing::debug;

use super::views::render_page;
use super::AppState;
use crate::scheduler::{self, format_hhmm};
use crate::slots;

pub(super) struct DayRow {
    pub(super) day: String,
    pub(super) hours: String,
    pub(super) pause: String,
}

pub(super) struct ServiceRow {
    pub(super) id: String,
    pub(super) name: String,
    pub(super) duration: String,
    pub(super) price: String,
    /// Free starts on the selected date
    pub(super) slots: Vec<String>,
}

pub(super) struct AppointmentRow {
    pub(super) date: String,
    pub(super) time: String,
    pub(super) service: String,
    pub(super) customer: String,
    pub(super) contact: String,
    pub(super) status: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DashboardQuery {
    date: Option<String>,
}

pub(crate) async fn dashboard_handler(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Html<String> {
    let now = state.now();
    let date = match query.date.as_deref() {
        None => now.date(),
        Some(raw) => scheduler::parse_date(raw).unwrap_or_else(|| {
            debug!(date = raw, "Unparseable dashboard date, showing today");
            now.date()
        }),
    };
    let settings = state.settings();
    let appointments = state.book.snapshot();

    let days: Vec<DayRow> = settings
        .days
        .iter()
        .map(|(day, hours)| DayRow {
            day: scheduler::weekday_name(day).to_string(),
            hours: if hours.enabled {
                format!("{}-{}", format_hhmm(hours.start_time), format_hhmm(hours.end_time))
            } else {
                "closed".to_string()
            },
            pause: hours
                .break_window()
                .filter(|_| hours.enabled)
                .map(|(s, e)| format!("{}-{}", format_hhmm(s), format_hhmm(e)))
                .unwrap_or_default(),
        })
        .collect();

    let services: Vec<ServiceRow> = state
        .services
        .iter()
        .map(|s| ServiceRow {
            id: s.id.clone(),
            name: s.name.clone(),
            duration: match s.duration_minutes() {
                Ok(m) => format!("{m} min"),
                Err(_) => format!("{} ({} min)", s.duration, settings.slot_duration),
            },
            price: format!("R$ {:.2}", s.price),
            slots: slots::generate_slots(date, s, &settings, &appointments, &state.services, now)
                .into_iter()
                .map(format_hhmm)
                .collect(),
        })
        .collect();

    let mut upcoming: Vec<_> = appointments
        .iter()
        .filter(|a| a.date >= now.date())
        .collect();
    upcoming.sort_by_key(|a| (a.date, a.time));
    let rows: Vec<AppointmentRow> = upcoming
        .into_iter()
        .map(|a| AppointmentRow {
            date: a.date.to_string(),
            time: format_hhmm(a.time),
            service: a.service_name.clone(),
            customer: a.customer_name.clone(),
            contact: if a.customer_phone.is_empty() {
                a.customer_email.clone()
            } else {
                format!("{} / {}", a.customer_email, a.customer_phone)
            },
            status: a.status.to_string(),
        })
        .collect();

    let html = render_page(
        &state.business_name,
        now,
        date,
        settings.slot_duration,
        &days,
        &services,
        &rows,
    );
    Html(html)
}
