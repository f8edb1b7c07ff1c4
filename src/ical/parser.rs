//! A module to parse ICal files

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use ical::parser::ical::component::IcalEvent;

use crate::error::{Error, Result};
use crate::event::Location;
use crate::merge::EventChanges;

/// An event read from an iCal file
#[derive(Clone, Debug, PartialEq)]
pub struct ParsedEvent {
    /// The UID of the VEVENT, which is the id of the remote event when the file was exported from it
    pub uid: Option<String>,
    pub changes: EventChanges,
}

/// Parse every VEVENT of an iCal file.
///
/// Times that carry a TZID or no zone at all are read as UTC.
pub fn parse_calendar(content: &str) -> Result<Vec<ParsedEvent>> {
    let reader = ical::IcalParser::new(content.as_bytes());
    let mut parsed = Vec::new();

    for calendar in reader {
        let calendar = calendar.map_err(|err| Error::Ical(format!("Unable to parse iCal data: {}", err)))?;
        for event in &calendar.events {
            parsed.push(parse_event(event)?);
        }
    }

    if parsed.is_empty() {
        log::warn!("No event found in iCal data");
    }
    Ok(parsed)
}

fn parse_event(event: &IcalEvent) -> Result<ParsedEvent> {
    let mut uid = None;
    let mut changes = EventChanges::new();

    for prop in &event.properties {
        let value = match &prop.value {
            None => continue,
            Some(value) => value,
        };
        match prop.name.as_str() {
            "UID" => uid = Some(value.clone()),
            "SUMMARY" => changes.heading = Some(unescape_text(value)),
            "DESCRIPTION" => changes.description = Some(unescape_text(value)),
            "DTSTART" => changes.start_timestamp = Some(parse_date_time(value)?),
            "DTEND" => changes.end_timestamp = Some(parse_date_time(value)?),
            "LOCATION" => changes.location = Some(Location {
                feature: Some(unescape_text(value)),
                ..Location::default()
            }),
            _ => {},
        }
    }

    if changes.heading.is_none() {
        return Err(Error::Ical(format!("Missing SUMMARY for event {}", uid.as_deref().unwrap_or("<no UID>"))));
    }
    Ok(ParsedEvent { uid, changes })
}

fn parse_date_time(value: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y%m%dT%H%M%SZ") {
        return Ok(Utc.from_utc_datetime(&dt));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y%m%dT%H%M%S") {
        return Ok(Utc.from_utc_datetime(&dt));
    }
    NaiveDate::parse_from_str(value, "%Y%m%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|dt| Utc.from_utc_datetime(&dt))
        .ok_or_else(|| Error::Ical(format!("Invalid date '{}'", value)))
}

fn unescape_text(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some('n') | Some('N') => result.push('\n'),
            Some(other) => result.push(other),
            None => result.push('\\'),
        }
    }
    result
}


#[cfg(test)]
mod test {
    use super::*;

    const EXAMPLE_ICAL: &str = "BEGIN:VCALENDAR\r
VERSION:2.0\r
PRODID:-//Some club//Some calendar//EN\r
BEGIN:VEVENT\r
UID:E1\r
DTSTAMP:20240101T090000Z\r
SUMMARY:Training\\, outdoors\r
DESCRIPTION:Bring boots\\nand water\r
DTSTART:20240201T180000Z\r
DTEND:20240201T200000\r
LOCATION:Main pitch\r
END:VEVENT\r
BEGIN:VEVENT\r
DTSTAMP:20240101T090000Z\r
SUMMARY:Club day\r
DTSTART;VALUE=DATE:20240301\r
END:VEVENT\r
END:VCALENDAR\r
";

    const EXAMPLE_WITHOUT_SUMMARY: &str = "BEGIN:VCALENDAR\r
VERSION:2.0\r
BEGIN:VEVENT\r
UID:E1\r
DTSTART:20240201T180000Z\r
END:VEVENT\r
END:VCALENDAR\r
";

    #[test]
    fn test_ical_parsing() {
        let events = parse_calendar(EXAMPLE_ICAL).unwrap();
        assert_eq!(events.len(), 2);

        let first = &events[0];
        assert_eq!(first.uid.as_deref(), Some("E1"));
        assert_eq!(first.changes.heading.as_deref(), Some("Training, outdoors"));
        assert_eq!(first.changes.description.as_deref(), Some("Bring boots\nand water"));
        assert_eq!(first.changes.start_timestamp, Some(Utc.with_ymd_and_hms(2024, 2, 1, 18, 0, 0).unwrap()));
        assert_eq!(first.changes.end_timestamp, Some(Utc.with_ymd_and_hms(2024, 2, 1, 20, 0, 0).unwrap()));
        assert_eq!(first.changes.location.as_ref().and_then(|l| l.feature.as_deref()), Some("Main pitch"));

        let second = &events[1];
        assert_eq!(second.uid, None);
        assert_eq!(second.changes.start_timestamp, Some(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()));
        assert_eq!(second.changes.end_timestamp, None);
    }

    #[test]
    fn test_missing_summary() {
        let err = parse_calendar(EXAMPLE_WITHOUT_SUMMARY).unwrap_err();
        assert!(matches!(err, Error::Ical(_)));
    }

    #[test]
    fn test_invalid_date() {
        assert!(parse_date_time("2024-02-01").is_err());
    }
}
