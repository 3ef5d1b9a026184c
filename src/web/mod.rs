pub mod dashboard;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod views;

use std::sync::{Arc, RwLock};

use anyhow::Result;
use axum::routing::{get, put};
use axum::Router;
use chrono::NaiveDateTime;
use chrono_tz::Tz;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::booking::AppointmentBook;
use crate::config;
use crate::models::{Config, Service};
use crate::schedule::ScheduleSettings;
use crate::scheduler;

#[derive(Clone)]
pub struct AppState {
    pub(crate) business_name: Arc<String>,
    pub(crate) services: Arc<Vec<Service>>,
    pub(crate) settings: Arc<RwLock<ScheduleSettings>>,
    pub(crate) book: Arc<AppointmentBook>,
    pub(crate) timezone: Option<Tz>,
}

impl AppState {
    pub fn from_config(config: Config) -> Result<Self> {
        let timezone = config::timezone(&config)?;
        Ok(Self {
            business_name: Arc::new(config.app.business_name),
            services: Arc::new(config.services),
            settings: Arc::new(RwLock::new(config.schedule)),
            book: Arc::new(AppointmentBook::new(config.appointments)),
            timezone,
        })
    }

    pub(crate) fn now(&self) -> NaiveDateTime {
        scheduler::now(self.timezone)
    }

    pub(crate) fn service(&self, id: &str) -> Option<&Service> {
        self.services.iter().find(|s| s.id == id)
    }

    /// Copy of the current schedule, so no lock is held while computing.
    pub(crate) fn settings(&self) -> ScheduleSettings {
        self.settings
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub(crate) fn replace_settings(&self, settings: ScheduleSettings) {
        *self.settings.write().unwrap_or_else(|e| e.into_inner()) = settings;
    }
}

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/services", get(handlers::list_services))
        .route("/slots", get(handlers::get_slots))
        .route(
            "/appointments",
            get(handlers::list_appointments).post(handlers::create_appointment),
        )
        .route("/appointments/{id}/status", put(handlers::update_status))
        .route(
            "/settings",
            get(handlers::get_settings).put(handlers::update_settings),
        );

    Router::new()
        .route("/", get(dashboard::dashboard_handler))
        .route("/health", get(handlers::health_check))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(config: Config, addr: &str) -> Result<()> {
    let state = AppState::from_config(config)?;
    info!(
        "{}: {} services, {} appointments loaded",
        state.business_name,
        state.services.len(),
        state.book.len()
    );

    let app = router(state);
    let listener = TcpListener::bind(addr).await?;
    info!("Booking server listening on http://{}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
