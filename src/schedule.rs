//! Weekly business hours: one [`DaySchedule`] per weekday plus the slot grid.

use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::scheduler::{hhmm, MINUTES_PER_DAY};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("slot duration must be between 1 and {} minutes", MINUTES_PER_DAY)]
    InvalidSlotDuration,
    #[error("{day}: opening time {} must be before closing time {}", .start.format("%H:%M"), .end.format("%H:%M"))]
    InvalidDayWindow {
        day: Weekday,
        start: NaiveTime,
        end: NaiveTime,
    },
    #[error("{day}: a break needs both a start and an end time")]
    IncompleteBreak { day: Weekday },
    #[error(
        "{day}: break {}-{} must be a non-empty window inside opening hours {}-{}",
        .start.format("%H:%M"), .end.format("%H:%M"), .open.format("%H:%M"), .close.format("%H:%M")
    )]
    InvalidBreakWindow {
        day: Weekday,
        start: NaiveTime,
        end: NaiveTime,
        open: NaiveTime,
        close: NaiveTime,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySchedule {
    pub enabled: bool,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    #[serde(default, with = "hhmm::option", skip_serializing_if = "Option::is_none")]
    pub break_start: Option<NaiveTime>,
    #[serde(default, with = "hhmm::option", skip_serializing_if = "Option::is_none")]
    pub break_end: Option<NaiveTime>,
}

impl DaySchedule {
    pub fn open(start_time: NaiveTime, end_time: NaiveTime) -> Self {
        Self {
            enabled: true,
            start_time,
            end_time,
            break_start: None,
            break_end: None,
        }
    }

    pub fn closed(start_time: NaiveTime, end_time: NaiveTime) -> Self {
        Self {
            enabled: false,
            ..Self::open(start_time, end_time)
        }
    }

    pub fn with_break(mut self, start: NaiveTime, end: NaiveTime) -> Self {
        self.break_start = Some(start);
        self.break_end = Some(end);
        self
    }

    /// The break as a (start, end) pair, only when both bounds are set.
    pub fn break_window(&self) -> Option<(NaiveTime, NaiveTime)> {
        self.break_start.zip(self.break_end)
    }

    fn validate(&self, day: Weekday) -> Result<(), ConfigurationError> {
        if self.break_start.is_some() != self.break_end.is_some() {
            return Err(ConfigurationError::IncompleteBreak { day });
        }
        if !self.enabled {
            return Ok(());
        }
        if self.start_time >= self.end_time {
            return Err(ConfigurationError::InvalidDayWindow {
                day,
                start: self.start_time,
                end: self.end_time,
            });
        }
        if let Some((start, end)) = self.break_window() {
            if start < self.start_time || start >= end || end > self.end_time {
                return Err(ConfigurationError::InvalidBreakWindow {
                    day,
                    start,
                    end,
                    open: self.start_time,
                    close: self.end_time,
                });
            }
        }
        Ok(())
    }
}

/// Seven day schedules indexed by `Weekday::num_days_from_sunday()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "DaysTable", into = "DaysTable")]
pub struct WeekDays([DaySchedule; 7]);

impl WeekDays {
    pub fn new(days: [DaySchedule; 7]) -> Self {
        Self(days)
    }

    pub fn get(&self, day: Weekday) -> &DaySchedule {
        &self.0[day.num_days_from_sunday() as usize]
    }

    /// Iterates Sunday first, matching the storage order.
    pub fn iter(&self) -> impl Iterator<Item = (Weekday, &DaySchedule)> {
        let mut day = Weekday::Sun;
        self.0.iter().map(move |schedule| {
            let current = day;
            day = day.succ();
            (current, schedule)
        })
    }
}

// On-disk shape: every weekday is a required, named key.
#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct DaysTable {
    sunday: DaySchedule,
    monday: DaySchedule,
    tuesday: DaySchedule,
    wednesday: DaySchedule,
    thursday: DaySchedule,
    friday: DaySchedule,
    saturday: DaySchedule,
}

impl From<DaysTable> for WeekDays {
    fn from(t: DaysTable) -> Self {
        Self([
            t.sunday,
            t.monday,
            t.tuesday,
            t.wednesday,
            t.thursday,
            t.friday,
            t.saturday,
        ])
    }
}

impl From<WeekDays> for DaysTable {
    fn from(w: WeekDays) -> Self {
        let [sunday, monday, tuesday, wednesday, thursday, friday, saturday] = w.0;
        Self {
            sunday,
            monday,
            tuesday,
            wednesday,
            thursday,
            friday,
            saturday,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSettings {
    /// Grid step in minutes between candidate start times.
    pub slot_duration: u32,
    pub days: WeekDays,
}

impl ScheduleSettings {
    pub fn new(slot_duration: u32, days: [DaySchedule; 7]) -> Result<Self, ConfigurationError> {
        let settings = Self {
            slot_duration,
            days: WeekDays::new(days),
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.slot_duration == 0 || self.slot_duration > MINUTES_PER_DAY {
            return Err(ConfigurationError::InvalidSlotDuration);
        }
        for (day, schedule) in self.days.iter() {
            schedule.validate(day)?;
        }
        Ok(())
    }

    pub fn day(&self, day: Weekday) -> &DaySchedule {
        self.days.get(day)
    }

    pub fn day_for(&self, date: NaiveDate) -> &DaySchedule {
        self.day(date.weekday())
    }
}

impl Default for ScheduleSettings {
    /// Weekdays 08:00-18:00 with a lunch break, short Saturday, closed Sunday.
    fn default() -> Self {
        let t = |h| NaiveTime::from_hms_opt(h, 0, 0).unwrap_or_default();
        let weekday = DaySchedule::open(t(8), t(18)).with_break(t(12), t(13));
        Self {
            slot_duration: 60,
            days: WeekDays::new([
                DaySchedule::closed(t(9), t(18)),
                weekday.clone(),
                weekday.clone(),
                weekday.clone(),
                weekday.clone(),
                weekday,
                DaySchedule::open(t(9), t(14)),
            ]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn week_of(day: DaySchedule) -> [DaySchedule; 7] {
        std::array::from_fn(|_| day.clone())
    }

    #[test]
    fn default_settings_are_valid() {
        let settings = ScheduleSettings::default();
        assert!(settings.validate().is_ok());
        assert!(!settings.day(Weekday::Sun).enabled);
        assert_eq!(
            settings.day(Weekday::Wed).break_window(),
            Some((t(12, 0), t(13, 0)))
        );
    }

    #[test]
    fn rejects_zero_slot_duration() {
        let err = ScheduleSettings::new(0, week_of(DaySchedule::open(t(8, 0), t(18, 0))));
        assert_eq!(err, Err(ConfigurationError::InvalidSlotDuration));
    }

    #[test]
    fn rejects_slot_duration_longer_than_a_day() {
        let week = week_of(DaySchedule::open(t(8, 0), t(18, 0)));
        assert_eq!(
            ScheduleSettings::new(u32::MAX, week.clone()),
            Err(ConfigurationError::InvalidSlotDuration)
        );
        assert!(ScheduleSettings::new(24 * 60, week).is_ok());
    }

    #[test]
    fn rejects_inverted_day_window() {
        let err = ScheduleSettings::new(30, week_of(DaySchedule::open(t(18, 0), t(8, 0))))
            .unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidDayWindow { .. }));
        assert!(err.to_string().contains("18:00"));
    }

    #[test]
    fn rejects_empty_day_window() {
        let err = ScheduleSettings::new(30, week_of(DaySchedule::open(t(9, 0), t(9, 0))));
        assert!(matches!(err, Err(ConfigurationError::InvalidDayWindow { .. })));
    }

    #[test]
    fn closed_day_window_is_not_checked() {
        let mut days = week_of(DaySchedule::open(t(8, 0), t(18, 0)));
        days[0] = DaySchedule::closed(t(18, 0), t(8, 0));
        assert!(ScheduleSettings::new(30, days).is_ok());
    }

    #[test]
    fn rejects_break_outside_hours() {
        let day = DaySchedule::open(t(8, 0), t(18, 0)).with_break(t(17, 0), t(19, 0));
        let err = ScheduleSettings::new(60, week_of(day));
        assert!(matches!(err, Err(ConfigurationError::InvalidBreakWindow { .. })));

        let day = DaySchedule::open(t(8, 0), t(18, 0)).with_break(t(7, 0), t(9, 0));
        let err = ScheduleSettings::new(60, week_of(day));
        assert!(matches!(err, Err(ConfigurationError::InvalidBreakWindow { .. })));
    }

    #[test]
    fn rejects_inverted_break() {
        let day = DaySchedule::open(t(8, 0), t(18, 0)).with_break(t(13, 0), t(12, 0));
        let err = ScheduleSettings::new(60, week_of(day));
        assert!(matches!(err, Err(ConfigurationError::InvalidBreakWindow { .. })));
    }

    #[test]
    fn accepts_break_touching_the_edges() {
        let day = DaySchedule::open(t(8, 0), t(18, 0)).with_break(t(8, 0), t(18, 0));
        assert!(ScheduleSettings::new(60, week_of(day)).is_ok());
    }

    #[test]
    fn rejects_half_a_break() {
        let mut day = DaySchedule::open(t(8, 0), t(18, 0));
        day.break_start = Some(t(12, 0));
        let err = ScheduleSettings::new(60, week_of(day));
        assert!(matches!(err, Err(ConfigurationError::IncompleteBreak { .. })));
    }

    #[test]
    fn lookup_by_date_uses_weekday() {
        let mut days = week_of(DaySchedule::open(t(8, 0), t(18, 0)));
        days[Weekday::Tue.num_days_from_sunday() as usize] = DaySchedule::open(t(10, 0), t(12, 0));
        let settings = ScheduleSettings::new(60, days).unwrap();
        // 2024-01-02 is a Tuesday
        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        assert_eq!(settings.day_for(date).start_time, t(10, 0));
    }

    #[test]
    fn deserializes_named_weekday_table() {
        let toml_src = r#"
            slot_duration = 30
            [days.sunday]
            enabled = false
            start_time = "09:00"
            end_time = "18:00"
            [days.monday]
            enabled = true
            start_time = "08:00"
            end_time = "18:00"
            break_start = "12:00"
            break_end = "13:00"
            [days.tuesday]
            enabled = true
            start_time = "08:00"
            end_time = "18:00"
            [days.wednesday]
            enabled = true
            start_time = "08:00"
            end_time = "18:00"
            [days.thursday]
            enabled = true
            start_time = "08:00"
            end_time = "18:00"
            [days.friday]
            enabled = true
            start_time = "08:00"
            end_time = "18:00"
            [days.saturday]
            enabled = true
            start_time = "09:00"
            end_time = "14:00"
        "#;
        let settings: ScheduleSettings = toml::from_str(toml_src).unwrap();
        assert_eq!(settings.slot_duration, 30);
        assert_eq!(settings.day(Weekday::Sat).end_time, t(14, 0));
        assert_eq!(settings.day(Weekday::Mon).break_end, Some(t(13, 0)));
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn rejects_misspelled_weekday_key() {
        let toml_src = r#"
            slot_duration = 30
            [days.munday]
            enabled = true
            start_time = "08:00"
            end_time = "18:00"
        "#;
        assert!(toml::from_str::<ScheduleSettings>(toml_src).is_err());
    }
}
