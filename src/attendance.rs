//! Attendance reports of events

use std::io::Write;

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

use crate::client::Spond;
use crate::error::Result;
use crate::event::Event;

/// One line of an attendance report
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AttendanceRow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(rename = "Description")]
    pub heading: String,
    pub name: String,
    /// The answer of this person, if any (e.g. "accepted")
    pub answer: Option<String>,
    /// Written as "X" for organizers, and left empty otherwise
    #[serde(serialize_with = "organizer_mark")]
    pub organizer: bool,
}

fn organizer_mark<S: Serializer>(organizer: &bool, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(if *organizer { "X" } else { "" })
}

/// Write attendance rows as CSV, with a `Start,End,Description,Name,Answer,Organizer` header
pub fn write_csv<W: Write>(rows: &[AttendanceRow], writer: W) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    writer.write_record(&["Start", "End", "Description", "Name", "Answer", "Organizer"])?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// The attendance rows of an event: its organizers first, then (if `include_members` is set) every invitee,
/// grouped by answer.
///
/// Persons that cannot be found in the groups of the user are listed by their raw identifier.
pub async fn attendance_rows(client: &mut Spond, event: &Event, include_members: bool) -> Result<Vec<AttendanceRow>> {
    let mut rows = Vec::new();

    for owner in event.owners() {
        let name = display_name(client, &owner.id).await?;
        rows.push(row(event, name, owner.response.clone(), true));
    }

    if include_members {
        for (answer, ids) in event.responses().by_answer() {
            for id in ids {
                let name = display_name(client, id).await?;
                rows.push(row(event, name, Some(answer.to_string()), false));
            }
        }
    }

    Ok(rows)
}

fn row(event: &Event, name: String, answer: Option<String>, organizer: bool) -> AttendanceRow {
    AttendanceRow {
        start: *event.start_time(),
        end: *event.end_time(),
        heading: event.heading().to_string(),
        name,
        answer,
        organizer,
    }
}

async fn display_name(client: &mut Spond, id: &str) -> Result<String> {
    match client.get_person(id).await {
        Ok(person) => Ok(person.full_name()),
        Err(err) if err.is_not_found() => {
            log::warn!("Unknown person {} in attendance list", id);
            Ok(id.to_string())
        },
        Err(err) => Err(err),
    }
}
