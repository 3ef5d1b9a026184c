use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::duration::{self, DurationParseError};
use crate::schedule::ScheduleSettings;
use crate::scheduler::hhmm;

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    pub app: AppConfig,
    #[serde(default)]
    pub schedule: ScheduleSettings,
    #[serde(default)]
    pub services: Vec<Service>,
    #[serde(default)]
    pub appointments: Vec<Appointment>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct AppConfig {
    pub business_name: String,
    /// IANA name, e.g. "America/Sao_Paulo". Host local time when absent.
    #[serde(default)]
    pub timezone: Option<String>,
}

impl Config {
    pub fn service(&self, id: &str) -> Option<&Service> {
        self.services.iter().find(|s| s.id == id)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Service {
    pub id: String,
    pub name: String,
    /// Free-text label as entered in the catalog, e.g. "45 min".
    pub duration: String,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Service {
    pub fn duration_minutes(&self) -> Result<u32, DurationParseError> {
        duration::parse_minutes(&self.duration)
    }

    /// Parsed duration, or `fallback` with a data-quality warning.
    pub fn duration_or(&self, fallback: u32) -> u32 {
        match self.duration_minutes() {
            Ok(minutes) => minutes,
            Err(e) => {
                warn!(
                    service_id = %self.id,
                    label = %self.duration,
                    "Unparseable service duration, using {} min: {}",
                    fallback,
                    e
                );
                fallback
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    /// Whether an appointment in this state blocks its interval.
    pub fn occupies_slot(self) -> bool {
        self != AppointmentStatus::Cancelled
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "pending",
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(AppointmentStatus::Pending),
            "confirmed" => Ok(AppointmentStatus::Confirmed),
            "completed" => Ok(AppointmentStatus::Completed),
            "cancelled" | "canceled" => Ok(AppointmentStatus::Cancelled),
            other => Err(format!("unknown appointment status '{other}'")),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Appointment {
    pub id: String,
    pub service_id: String,
    /// Copied from the service at booking time.
    pub service_name: String,
    /// Service duration resolved at booking time. Older records may lack it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
    pub customer_name: String,
    pub customer_email: String,
    #[serde(default)]
    pub customer_phone: String,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub time: NaiveTime,
    pub status: AppointmentStatus,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct Customer {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
}
