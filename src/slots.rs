//! Bookable start times for a single date.
//!
//! Candidates sit on the schedule's grid (`slot_duration` steps from the
//! day's opening time). A candidate survives when the whole service fits
//! before closing, misses the break, misses every non-cancelled booking on
//! that date and is not in the past.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use tracing::debug;

use crate::models::{Appointment, Service};
use crate::schedule::ScheduleSettings;
use crate::scheduler::{minutes_of_day, time_of_minutes};

/// Half-open interval in minutes since midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Span {
    start: u32,
    end: u32,
}

impl Span {
    fn new(start: u32, minutes: u32) -> Self {
        Self {
            start,
            end: start.saturating_add(minutes),
        }
    }

    fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Duration an existing appointment occupies: its booking-time snapshot,
/// then the catalog entry, then the grid step.
pub fn appointment_minutes(
    appointment: &Appointment,
    settings: &ScheduleSettings,
    catalog: &[Service],
) -> u32 {
    appointment
        .duration_minutes
        .or_else(|| {
            catalog
                .iter()
                .find(|s| s.id == appointment.service_id)
                .map(|s| s.duration_or(settings.slot_duration))
        })
        .unwrap_or(settings.slot_duration)
}

/// Available start times on `date` for `service`, in ascending order.
pub fn generate_slots(
    date: NaiveDate,
    service: &Service,
    settings: &ScheduleSettings,
    appointments: &[Appointment],
    catalog: &[Service],
    now: NaiveDateTime,
) -> Vec<NaiveTime> {
    if !settings.day_for(date).enabled {
        return Vec::new();
    }
    let minutes = service.duration_or(settings.slot_duration);
    slots_for_duration(date, minutes, settings, appointments, catalog, now)
}

/// Same as [`generate_slots`] with the service duration already resolved.
pub fn slots_for_duration(
    date: NaiveDate,
    service_minutes: u32,
    settings: &ScheduleSettings,
    appointments: &[Appointment],
    catalog: &[Service],
    now: NaiveDateTime,
) -> Vec<NaiveTime> {
    let day = settings.day_for(date);
    if !day.enabled || service_minutes == 0 {
        return Vec::new();
    }

    let open = minutes_of_day(day.start_time);
    let close = minutes_of_day(day.end_time);
    let step = settings.slot_duration.max(1);
    let pause = day
        .break_window()
        .map(|(start, end)| Span {
            start: minutes_of_day(start),
            end: minutes_of_day(end),
        });
    let busy: Vec<Span> = appointments
        .iter()
        .filter(|a| a.date == date && a.status.occupies_slot())
        .map(|a| Span::new(minutes_of_day(a.time), appointment_minutes(a, settings, catalog)))
        .collect();

    let mut slots = Vec::new();
    let mut start = open;
    while start.checked_add(service_minutes).is_some_and(|end| end <= close) {
        let candidate = Span::new(start, service_minutes);
        let free = !pause.is_some_and(|p| candidate.overlaps(&p))
            && !busy.iter().any(|b| candidate.overlaps(b));
        if free {
            if let Some(time) = time_of_minutes(start) {
                if NaiveDateTime::new(date, time) >= now {
                    slots.push(time);
                }
            }
        }
        match start.checked_add(step) {
            Some(next) => start = next,
            None => break,
        }
    }

    debug!(
        %date,
        service_minutes,
        busy = busy.len(),
        available = slots.len(),
        "Computed slots"
    );
    slots
}
