//! The appointment collection and the only code paths that write to it.

use std::sync::{Mutex, MutexGuard};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::{Appointment, AppointmentStatus, Customer, Service};
use crate::schedule::ScheduleSettings;
use crate::scheduler::format_hhmm;
use crate::slots;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppointmentError {
    #[error("{} on {date} is no longer available, please pick another time", .time.format("%H:%M"))]
    SlotNoLongerAvailable { date: NaiveDate, time: NaiveTime },
    #[error("customer {0} is required")]
    InvalidCustomerData(&'static str),
    #[error("appointment {0} not found")]
    NotFound(String),
}

#[derive(Debug, Clone)]
pub struct BookingRequest {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub customer: Customer,
}

/// Shared appointment list. Appends and status changes both go through the
/// same lock, so a commit's check-then-insert cannot interleave with another.
#[derive(Debug, Default)]
pub struct AppointmentBook {
    entries: Mutex<Vec<Appointment>>,
}

impl AppointmentBook {
    pub fn new(appointments: Vec<Appointment>) -> Self {
        Self {
            entries: Mutex::new(appointments),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Appointment>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Copy of every appointment in insertion order.
    pub fn snapshot(&self) -> Vec<Appointment> {
        self.lock().clone()
    }

    /// Appointments on `date`, earliest first.
    pub fn for_date(&self, date: NaiveDate) -> Vec<Appointment> {
        let mut day: Vec<Appointment> = self
            .lock()
            .iter()
            .filter(|a| a.date == date)
            .cloned()
            .collect();
        day.sort_by_key(|a| a.time);
        day
    }

    pub fn get(&self, id: &str) -> Option<Appointment> {
        self.lock().iter().find(|a| a.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Re-check the requested slot against the current bookings and append a
    /// pending appointment when it is still free. Nothing is written on error.
    pub fn create_appointment(
        &self,
        request: BookingRequest,
        service: &Service,
        settings: &ScheduleSettings,
        catalog: &[Service],
        now: NaiveDateTime,
    ) -> Result<Appointment, AppointmentError> {
        let customer = validate_customer(request.customer)?;
        let minutes = service.duration_or(settings.slot_duration);

        let mut entries = self.lock();
        let open = slots::slots_for_duration(request.date, minutes, settings, &entries, catalog, now);
        if !open.contains(&request.time) {
            warn!(
                service_id = %service.id,
                date = %request.date,
                time = %format_hhmm(request.time),
                "Rejected booking, slot not available"
            );
            return Err(AppointmentError::SlotNoLongerAvailable {
                date: request.date,
                time: request.time,
            });
        }

        let appointment = Appointment {
            id: Uuid::new_v4().to_string(),
            service_id: service.id.clone(),
            service_name: service.name.clone(),
            duration_minutes: Some(minutes),
            customer_name: customer.name,
            customer_email: customer.email,
            customer_phone: customer.phone,
            date: request.date,
            time: request.time,
            status: AppointmentStatus::Pending,
        };
        entries.push(appointment.clone());
        info!(
            id = %appointment.id,
            service = %appointment.service_name,
            "Booked {} {}",
            appointment.date,
            format_hhmm(appointment.time)
        );
        Ok(appointment)
    }

    /// Administrative status change. Any status may follow any other.
    pub fn set_status(
        &self,
        id: &str,
        status: AppointmentStatus,
    ) -> Result<Appointment, AppointmentError> {
        let mut entries = self.lock();
        let appointment = entries
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| AppointmentError::NotFound(id.to_string()))?;
        let previous = appointment.status;
        appointment.status = status;
        info!(id, "Appointment status {} -> {}", previous, status);
        Ok(appointment.clone())
    }
}

fn validate_customer(customer: Customer) -> Result<Customer, AppointmentError> {
    let name = customer.name.trim();
    let email = customer.email.trim();
    if name.is_empty() {
        return Err(AppointmentError::InvalidCustomerData("name"));
    }
    if email.is_empty() {
        return Err(AppointmentError::InvalidCustomerData("email"));
    }
    Ok(Customer {
        name: name.to_string(),
        email: email.to_string(),
        phone: customer.phone.trim().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::DaySchedule;
    use std::sync::Arc;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    fn long_ago() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2000, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn settings() -> ScheduleSettings {
        let day = DaySchedule::open(t(8, 0), t(18, 0)).with_break(t(12, 0), t(13, 0));
        ScheduleSettings::new(60, std::array::from_fn(|_| day.clone())).unwrap()
    }

    fn wash() -> Service {
        Service {
            id: "1".into(),
            name: "Lavagem Completa".into(),
            duration: "60 min".into(),
            price: 35.0,
            category: Some("Lavagem".into()),
            description: None,
        }
    }

    fn request(time: NaiveTime) -> BookingRequest {
        BookingRequest {
            date: monday(),
            time,
            customer: Customer {
                name: "João da Silva".into(),
                email: "joao@example.com".into(),
                phone: "35912345678".into(),
            },
        }
    }

    fn commit(book: &AppointmentBook, req: BookingRequest) -> Result<Appointment, AppointmentError> {
        let catalog = vec![wash()];
        book.create_appointment(req, &wash(), &settings(), &catalog, long_ago())
    }

    #[test]
    fn created_appointment_is_pending_and_stored() {
        let book = AppointmentBook::default();
        let created = commit(&book, request(t(10, 0))).unwrap();

        assert_eq!(created.status, AppointmentStatus::Pending);
        assert_eq!(created.service_name, "Lavagem Completa");
        assert_eq!(created.duration_minutes, Some(60));

        let stored = book.get(&created.id).unwrap();
        assert_eq!(stored.date, monday());
        assert_eq!(stored.time, t(10, 0));
        assert_eq!(stored.customer_name, "João da Silva");
        assert_eq!(stored.customer_email, "joao@example.com");
        assert_eq!(stored.customer_phone, "35912345678");
        assert_eq!(stored.status, AppointmentStatus::Pending);
    }

    #[test]
    fn ids_are_unique() {
        let book = AppointmentBook::default();
        let a = commit(&book, request(t(8, 0))).unwrap();
        let b = commit(&book, request(t(9, 0))).unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(book.len(), 2);
    }

    #[test]
    fn taken_slot_is_rejected_without_writing() {
        let book = AppointmentBook::default();
        // Both customers saw 10:00 as free; the first one lands.
        commit(&book, request(t(10, 0))).unwrap();
        let before = book.len();

        let err = commit(&book, request(t(10, 0))).unwrap_err();
        assert_eq!(
            err,
            AppointmentError::SlotNoLongerAvailable {
                date: monday(),
                time: t(10, 0)
            }
        );
        assert_eq!(book.len(), before);
    }

    #[test]
    fn off_grid_and_break_times_are_rejected() {
        let book = AppointmentBook::default();
        assert!(matches!(
            commit(&book, request(t(10, 30))),
            Err(AppointmentError::SlotNoLongerAvailable { .. })
        ));
        assert!(matches!(
            commit(&book, request(t(12, 0))),
            Err(AppointmentError::SlotNoLongerAvailable { .. })
        ));
        assert!(book.is_empty());
    }

    #[test]
    fn missing_customer_fields_are_rejected() {
        let book = AppointmentBook::default();

        let mut req = request(t(10, 0));
        req.customer.name = "   ".into();
        assert_eq!(
            commit(&book, req).unwrap_err(),
            AppointmentError::InvalidCustomerData("name")
        );

        let mut req = request(t(10, 0));
        req.customer.email.clear();
        assert_eq!(
            commit(&book, req).unwrap_err(),
            AppointmentError::InvalidCustomerData("email")
        );
        assert!(book.is_empty());
    }

    #[test]
    fn phone_is_optional() {
        let book = AppointmentBook::default();
        let mut req = request(t(11, 0));
        req.customer.phone.clear();
        let created = commit(&book, req).unwrap();
        assert!(created.customer_phone.is_empty());
    }

    #[test]
    fn cancelling_frees_the_slot() {
        let book = AppointmentBook::default();
        let first = commit(&book, request(t(14, 0))).unwrap();
        book.set_status(&first.id, AppointmentStatus::Cancelled).unwrap();

        let second = commit(&book, request(t(14, 0))).unwrap();
        assert_ne!(first.id, second.id);
        // History is kept.
        assert_eq!(book.len(), 2);
        assert_eq!(
            book.get(&first.id).unwrap().status,
            AppointmentStatus::Cancelled
        );
    }

    #[test]
    fn set_status_allows_any_transition() {
        let book = AppointmentBook::default();
        let appt = commit(&book, request(t(15, 0))).unwrap();
        for status in [
            AppointmentStatus::Completed,
            AppointmentStatus::Pending,
            AppointmentStatus::Cancelled,
            AppointmentStatus::Confirmed,
        ] {
            assert_eq!(book.set_status(&appt.id, status).unwrap().status, status);
        }
    }

    #[test]
    fn set_status_unknown_id() {
        let book = AppointmentBook::default();
        assert_eq!(
            book.set_status("nope", AppointmentStatus::Confirmed),
            Err(AppointmentError::NotFound("nope".into()))
        );
    }

    #[test]
    fn for_date_sorts_by_time() {
        let book = AppointmentBook::default();
        commit(&book, request(t(16, 0))).unwrap();
        commit(&book, request(t(8, 0))).unwrap();
        let times: Vec<NaiveTime> = book.for_date(monday()).iter().map(|a| a.time).collect();
        assert_eq!(times, vec![t(8, 0), t(16, 0)]);
        assert!(book.for_date(monday().succ_opt().unwrap()).is_empty());
    }

    #[test]
    fn concurrent_commits_book_a_slot_once() {
        let book = Arc::new(AppointmentBook::default());
        let results: Vec<Result<Appointment, AppointmentError>> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    let book = Arc::clone(&book);
                    s.spawn(move || commit(&book, request(t(9, 0))))
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert_eq!(book.len(), 1);
    }
}
