//! Readers for the spreadsheets that can be downloaded from Spond
//!
//! Two layouts are supported: poll results (see [`read_poll`]) and member lists (see [`read_members`]). Only the first
//! sheet of a workbook is read.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use calamine::{open_workbook_auto, Data, Range, Reader};

use crate::error::{Error, Result};

/// The contact details of a person, as listed in an export
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct User {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// A person of a member list, with the groups they belong to
#[derive(Clone, Debug, PartialEq)]
pub struct UserExt {
    pub user: User,
    /// The columns that follow the contact details, by their header
    pub info: BTreeMap<String, Data>,
    pub groups: BTreeSet<String>,
}

/// How a person answered a poll.
///
/// `None` means they did not vote; an empty set means they voted blank.
pub type PollVote = (User, Option<BTreeSet<String>>);

const CONTACT_HEADERS: [&str; 3] = ["Name", "Email", "Cell"];
const POLL_BLANK_ROWS: usize = 3;

/// Read an exported poll result
pub fn read_poll<P: AsRef<Path>>(path: P) -> Result<Vec<PollVote>> {
    parse_poll(&first_sheet(path.as_ref())?)
}

/// Read an exported member list
pub fn read_members<P: AsRef<Path>>(path: P) -> Result<Vec<UserExt>> {
    parse_members(&first_sheet(path.as_ref())?)
}

fn first_sheet(path: &Path) -> Result<Range<Data>> {
    log::debug!("Reading workbook {}", path.display());
    let mut workbook = open_workbook_auto(path)?;
    match workbook.worksheet_range_at(0) {
        Some(range) => Ok(range?),
        None => Err(Error::InvalidExport(format!("{} has no sheet", path.display()))),
    }
}

/// Poll results come after a summary block, which ends with the third row that starts with an empty cell.
/// The next row is the header: one column per option, then the "voted blank" flag, then name, email and phone.
pub fn parse_poll(range: &Range<Data>) -> Result<Vec<PollVote>> {
    let mut rows = sheet_rows(range).into_iter();

    let mut blank_rows = 0;
    for row in rows.by_ref() {
        if row.first().and_then(cell_text).is_none() {
            blank_rows += 1;
            if blank_rows >= POLL_BLANK_ROWS {
                break;
            }
        }
    }

    let header = rows.next()
        .ok_or_else(|| Error::InvalidExport("poll results not found".to_string()))?;
    if header.len() < 4 {
        return Err(Error::InvalidExport(format!("poll header has only {} columns", header.len())));
    }
    let options: Vec<String> = header[..header.len() - 4]
        .iter()
        .map(|cell| cell.to_string())
        .collect();

    let mut votes = Vec::new();
    for row in rows {
        let (answers, rest) = row.split_at(row.len() - 4);
        let user = User {
            name: rest[1].to_string(),
            email: cell_text(&rest[2]),
            phone: cell_text(&rest[3]),
        };

        if is_truthy(&rest[0]) {
            votes.push((user, Some(BTreeSet::new())));
            continue;
        }

        let chosen: BTreeSet<String> = options.iter()
            .zip(answers)
            .filter(|(_, answer)| is_truthy(answer))
            .map(|(option, _)| option.clone())
            .collect();
        votes.push((user, if chosen.is_empty() { None } else { Some(chosen) }));
    }
    Ok(votes)
}

/// Member lists start with a header row: one column per group, then `Name`, `Email` and `Cell`, then any other
/// member information.
pub fn parse_members(range: &Range<Data>) -> Result<Vec<UserExt>> {
    let mut rows = sheet_rows(range).into_iter();
    let header: Vec<String> = rows.next()
        .unwrap_or_default()
        .iter()
        .map(|cell| cell.to_string())
        .collect();

    let user_idx = header.windows(CONTACT_HEADERS.len())
        .position(|titles| *titles == CONTACT_HEADERS)
        .ok_or_else(|| Error::InvalidExport("Name, Email, Cell columns not found".to_string()))?;
    let groups = &header[..user_idx];
    let info_keys = &header[user_idx + CONTACT_HEADERS.len()..];

    let members = rows
        .map(|row| {
            let contact = &row[user_idx..user_idx + CONTACT_HEADERS.len()];
            UserExt {
                user: User {
                    name: contact[0].to_string(),
                    email: cell_text(&contact[1]),
                    phone: cell_text(&contact[2]),
                },
                info: info_keys.iter()
                    .cloned()
                    .zip(row[user_idx + CONTACT_HEADERS.len()..].iter().cloned())
                    .collect(),
                groups: groups.iter()
                    .zip(&row)
                    .filter(|(_, cell)| cell_text(cell).is_some())
                    .map(|(group, _)| group.clone())
                    .collect(),
            }
        })
        .collect();
    Ok(members)
}

/// Every row of the sheet from A1 on, padded with empty cells to the width of the used area
fn sheet_rows(range: &Range<Data>) -> Vec<Vec<Data>> {
    let (last_row, last_col) = match range.end() {
        Some(end) => end,
        None => return Vec::new(),
    };
    (0..=last_row)
        .map(|row| {
            (0..=last_col)
                .map(|col| range.get_value((row, col)).cloned().unwrap_or(Data::Empty))
                .collect()
        })
        .collect()
}

fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty => None,
        Data::String(s) if s.is_empty() => None,
        other => Some(other.to_string()),
    }
}

fn is_truthy(cell: &Data) -> bool {
    match cell {
        Data::Empty => false,
        Data::String(s) => !s.is_empty(),
        Data::Int(i) => *i != 0,
        Data::Float(f) => *f != 0.0,
        Data::Bool(b) => *b,
        _ => true,
    }
}
