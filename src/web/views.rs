use chrono::{NaiveDate, NaiveDateTime};
use leptos::prelude::*;

use super::dashboard::{AppointmentRow, DayRow, ServiceRow};

const STYLE: &str = include_str!("../style.css");

pub(super) fn capitalize(s: &str) -> String {
    let mut c = s.chars();
    match c.next() {
        None => String::new(),
        Some(f) => f.to_uppercase().to_string() + c.as_str(),
    }
}

pub(super) fn render_page(
    business_name: &str,
    now: NaiveDateTime,
    date: NaiveDate,
    slot_duration: u32,
    days: &[DayRow],
    services: &[ServiceRow],
    appointments: &[AppointmentRow],
) -> String {
    let title = format!("{business_name}: Agenda");
    let heading = business_name.to_string();
    let updated = now.format("%Y-%m-%d %H:%M").to_string();
    let grid = format!("Slot grid: {slot_duration} min");
    let slots_heading = format!("Available slots on {}", date.format("%Y-%m-%d (%A)"));
    let hours_html = render_hours_table(days);
    let slots_html = render_slots_table(services);
    let appointments_html = render_appointments_table(appointments);

    view! {
        <html lang="en">
            <head>
                <meta charset="utf-8" />
                <meta name="viewport" content="width=device-width, initial-scale=1" />
                <title>{title}</title>
                <style>{STYLE}</style>
            </head>
            <body>
                <h1>{heading}</h1>
                <p class="timestamp">"Updated: " {updated}</p>
                <section>
                    <h2>"Opening Hours"</h2>
                    <p class="grid">{grid}</p>
                    <div inner_html=hours_html />
                </section>
                <section>
                    <h2>{slots_heading}</h2>
                    <div inner_html=slots_html />
                </section>
                <section>
                    <h2>"Upcoming Appointments"</h2>
                    <div inner_html=appointments_html />
                </section>
            </body>
        </html>
    }
    .to_html()
}

fn render_hours_table(days: &[DayRow]) -> String {
    let rows_html: String = days
        .iter()
        .map(|d| {
            let day = capitalize(&d.day);
            let hours = d.hours.clone();
            let pause = d.pause.clone();
            let css = (if hours == "closed" { "closed" } else { "" }).to_string();

            view! {
                <tr class=css>
                    <td>{day}</td>
                    <td>{hours}</td>
                    <td>{pause}</td>
                </tr>
            }
            .to_html()
        })
        .collect();

    view! {
        <table>
            <thead>
                <tr><th>"Day"</th><th>"Hours"</th><th>"Break"</th></tr>
            </thead>
            <tbody inner_html=rows_html />
        </table>
    }
    .to_html()
}

fn render_slots_table(services: &[ServiceRow]) -> String {
    if services.is_empty() {
        return view! { <p class="empty">"No services configured."</p> }.to_html();
    }

    let rows_html: String = services
        .iter()
        .map(|s| {
            let id = s.id.clone();
            let name = s.name.clone();
            let duration = s.duration.clone();
            let price = s.price.clone();
            let (slots, css) = if s.slots.is_empty() {
                ("none".to_string(), "slots full")
            } else {
                (s.slots.join(" "), "slots available")
            };
            let css = css.to_string();

            view! {
                <tr>
                    <td>{id}</td>
                    <td>{name}</td>
                    <td>{duration}</td>
                    <td>{price}</td>
                    <td class=css>{slots}</td>
                </tr>
            }
            .to_html()
        })
        .collect();

    view! {
        <table>
            <thead>
                <tr><th>"Id"</th><th>"Service"</th><th>"Duration"</th><th>"Price"</th><th>"Slots"</th></tr>
            </thead>
            <tbody inner_html=rows_html />
        </table>
    }
    .to_html()
}

fn render_appointments_table(entries: &[AppointmentRow]) -> String {
    if entries.is_empty() {
        return view! { <p class="empty">"No upcoming appointments."</p> }.to_html();
    }

    let rows_html: String = entries
        .iter()
        .map(|a| {
            let when = format!("{} {}", a.date, a.time);
            let service = a.service.clone();
            let customer = a.customer.clone();
            let contact = a.contact.clone();
            let status = a.status.clone();
            let css = match status.as_str() {
                "confirmed" | "completed" => "status-booked",
                "cancelled" => "status-error",
                _ => "status-pending",
            }
            .to_string();

            view! {
                <tr>
                    <td>{when}</td>
                    <td>{service}</td>
                    <td>{customer}</td>
                    <td>{contact}</td>
                    <td class=css>{status}</td>
                </tr>
            }
            .to_html()
        })
        .collect();

    view! {
        <table>
            <thead>
                <tr>
                    <th>"When"</th>
                    <th>"Service"</th>
                    <th>"Customer"</th>
                    <th>"Contact"</th>
                    <th>"Status"</th>
                </tr>
            </thead>
            <tbody inner_html=rows_html />
        </table>
    }
    .to_html()
}
