//! Request and response bodies for the JSON API.

use serde::{Deserialize, Serialize};

use crate::models::{AppointmentStatus, Service};

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ServiceDto {
    pub id: String,
    pub name: String,
    pub duration: String,
    /// `None` when the label is not a minute value.
    pub duration_minutes: Option<u32>,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl From<&Service> for ServiceDto {
    fn from(s: &Service) -> Self {
        Self {
            id: s.id.clone(),
            name: s.name.clone(),
            duration: s.duration.clone(),
            duration_minutes: s.duration_minutes().ok(),
            price: s.price,
            category: s.category.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SlotsQuery {
    pub date: String,
    pub service_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SlotsResponse {
    pub date: String,
    pub service_id: String,
    pub duration_minutes: u32,
    pub slots: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct AppointmentsQuery {
    pub date: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateAppointmentRequest {
    pub service_id: String,
    pub date: String,
    pub time: String,
    pub customer_name: String,
    pub customer_email: String,
    #[serde(default)]
    pub customer_phone: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: AppointmentStatus,
}
