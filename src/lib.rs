//! Appointment availability and booking against a weekly business calendar.
//!
//! [`slots::generate_slots`] computes bookable start times for a date and
//! [`booking::AppointmentBook::create_appointment`] re-checks and commits a
//! booking against the same rules.

pub mod booking;
pub mod commands;
pub mod config;
pub mod duration;
pub mod models;
pub mod schedule;
pub mod scheduler;
pub mod slots;
pub mod web;
