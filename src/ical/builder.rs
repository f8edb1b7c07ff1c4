//! A module to build ICal files

use chrono::{DateTime, Utc};
use ics::properties::{Description, DtEnd, DtStart, Location, Method, Sequence, Status, Summary};
use ics::{escape_text, ICalendar};

use crate::event::Event;

/// Create an iCal calendar that publishes every event of `events`
pub fn build_calendar(events: &[Event]) -> String {
    let mut calendar = ICalendar::new("2.0", super::default_prod_id());
    calendar.push(Method::new("PUBLISH"));

    for event in events {
        let mut vevent = ics::Event::new(event.id().to_string(), format_date_time(event.created_time()));
        vevent.push(Summary::new(escape_text(event.heading().to_string())));
        if let Some(description) = event.description() {
            vevent.push(Description::new(escape_text(description.to_string())));
        }
        vevent.push(DtStart::new(format_date_time(event.start_time())));
        vevent.push(DtEnd::new(format_date_time(event.end_time())));
        if let Some(updated) = event.updated() {
            vevent.push(Sequence::new(updated.to_string()));
        }
        if event.is_cancelled() {
            vevent.push(Status::cancelled());
        }
        if let Some(location) = event.location().and_then(|l| l.display_name()) {
            vevent.push(Location::new(escape_text(location)));
        }
        calendar.add_event(vevent);
    }

    calendar.to_string()
}

fn format_date_time(dt: &DateTime<Utc>) -> String {
    dt.format("%Y%m%dT%H%M%SZ").to_string()
}
