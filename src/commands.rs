use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use chrono::NaiveDate;
use tracing::info;

use crate::booking::{AppointmentBook, BookingRequest};
use crate::config;
use crate::models::{Config, Customer, Service};
use crate::scheduler::{self, format_hhmm};
use crate::slots;

/// Resolve the target date from `--date` or the next occurrence of `--day`.
pub fn resolve_date(
    date_flag: &Option<String>,
    day_flag: &Option<String>,
    today: NaiveDate,
) -> Result<NaiveDate> {
    match (date_flag, day_flag) {
        (Some(raw), _) => scheduler::parse_date(raw)
            .ok_or_else(|| anyhow!("Invalid date '{}', expected YYYY-MM-DD", raw)),
        (None, Some(day)) => scheduler::parse_weekday(day)
            .map(|wd| scheduler::next_weekday(today, wd))
            .ok_or_else(|| anyhow!("Unknown day '{}'", day)),
        (None, None) => bail!("Specify --date YYYY-MM-DD or --day <weekday>"),
    }
}

fn find_service<'a>(cfg: &'a Config, service_id: &str) -> Result<&'a Service> {
    cfg.service(service_id)
        .ok_or_else(|| anyhow!("No service with id '{}' in config", service_id))
}

pub fn run_slots(
    config_path: &Path,
    service_id: &str,
    date: &Option<String>,
    day: &Option<String>,
) -> Result<()> {
    let cfg = config::load_config(config_path)?;
    let now = scheduler::now(config::timezone(&cfg)?);
    let target = resolve_date(date, day, now.date())?;
    let service = find_service(&cfg, service_id)?;

    info!(
        "{}: looking for {} ({}) slots on {} ({})",
        cfg.app.business_name,
        service.name,
        service.duration,
        target,
        scheduler::weekday_name(chrono::Datelike::weekday(&target))
    );

    let available = slots::generate_slots(
        target,
        service,
        &cfg.schedule,
        &cfg.appointments,
        &cfg.services,
        now,
    );
    if available.is_empty() {
        println!("No slots available for {} on {}", service.name, target);
        return Ok(());
    }
    let labels: Vec<String> = available.iter().map(|t| format_hhmm(*t)).collect();
    println!("{} on {}: {}", service.name, target, labels.join(", "));
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn run_book(
    config_path: &Path,
    service_id: &str,
    date: &str,
    time: &str,
    name: &str,
    email: &str,
    phone: &Option<String>,
) -> Result<()> {
    let cfg = config::load_config(config_path)?;
    let now = scheduler::now(config::timezone(&cfg)?);
    let service = find_service(&cfg, service_id)?;
    let request = BookingRequest {
        date: scheduler::parse_date(date)
            .ok_or_else(|| anyhow!("Invalid date '{}', expected YYYY-MM-DD", date))?,
        time: scheduler::parse_time(time)
            .ok_or_else(|| anyhow!("Invalid time '{}', expected HH:MM", time))?,
        customer: Customer {
            name: name.to_string(),
            email: email.to_string(),
            phone: phone.clone().unwrap_or_default(),
        },
    };

    let book = AppointmentBook::new(cfg.appointments.clone());
    let appointment = book
        .create_appointment(request, service, &cfg.schedule, &cfg.services, now)
        .context("Booking rejected")?;

    println!("{}", serde_json::to_string_pretty(&appointment)?);
    Ok(())
}

pub fn run_check(config_path: &Path) -> Result<()> {
    let cfg = config::load_config(config_path)?;
    let tz = config::timezone(&cfg)?;

    println!("{}", cfg.app.business_name);
    println!(
        "Timezone: {}",
        tz.map(|t| t.name().to_string())
            .unwrap_or_else(|| "host local time".to_string())
    );
    println!("Slot grid: {} min", cfg.schedule.slot_duration);
    for (day, hours) in cfg.schedule.days.iter() {
        let line = if !hours.enabled {
            "closed".to_string()
        } else {
            match hours.break_window() {
                Some((bs, be)) => format!(
                    "{}-{} (break {}-{})",
                    format_hhmm(hours.start_time),
                    format_hhmm(hours.end_time),
                    format_hhmm(bs),
                    format_hhmm(be)
                ),
                None => format!(
                    "{}-{}",
                    format_hhmm(hours.start_time),
                    format_hhmm(hours.end_time)
                ),
            }
        };
        println!("  {:<10} {}", scheduler::weekday_name(day), line);
    }

    println!("Services:");
    for service in &cfg.services {
        let minutes = match service.duration_minutes() {
            Ok(m) => format!("{m} min"),
            Err(_) => format!("'{}' unparseable, uses {} min", service.duration, cfg.schedule.slot_duration),
        };
        println!("  [{}] {} - {} - R$ {:.2}", service.id, service.name, minutes, service.price);
    }
    println!("Seed appointments: {}", cfg.appointments.len());
    Ok(())
}
