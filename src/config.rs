use std::collections::HashSet;
use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono_tz::Tz;
use tracing::warn;

use crate::models::Config;
use crate::scheduler::MINUTES_PER_DAY;

pub fn load_config(path: &Path) -> Result<Config> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    parse_config(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    config
        .schedule
        .validate()
        .context("Invalid [schedule] section")?;
    timezone(config)?;

    let mut seen = HashSet::new();
    for service in &config.services {
        if !seen.insert(service.id.as_str()) {
            bail!("Duplicate service id '{}'", service.id);
        }
        if let Err(e) = service.duration_minutes() {
            warn!(
                "Service '{}' ({}): {}; bookings will use {} min",
                service.name, service.id, e, config.schedule.slot_duration
            );
        }
    }

    for appointment in &config.appointments {
        if let Some(minutes) = appointment.duration_minutes {
            if minutes == 0 || minutes > MINUTES_PER_DAY {
                bail!(
                    "Appointment '{}': duration_minutes must be between 1 and {}, got {}",
                    appointment.id,
                    MINUTES_PER_DAY,
                    minutes
                );
            }
        }
    }
    Ok(())
}

/// The configured business timezone, if any.
pub fn timezone(config: &Config) -> Result<Option<Tz>> {
    config
        .app
        .timezone
        .as_deref()
        .map(|name| {
            name.parse::<Tz>()
                .map_err(|e| anyhow::anyhow!("Unknown timezone '{}': {}", name, e))
        })
        .transpose()
}
