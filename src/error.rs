//! Error types returned by this crate

use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// The kinds of remote entities that can be looked up by identifier
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Group,
    Event,
    Person,
    Profile,
    Member,
    Role,
    Subgroup,
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            EntityKind::Group => "group",
            EntityKind::Event => "event",
            EntityKind::Person => "person",
            EntityKind::Profile => "profile",
            EntityKind::Member => "member",
            EntityKind::Role => "role",
            EntityKind::Subgroup => "subgroup",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for EntityKind {
    type Err = Error;

    /// Only groups and events can be resolved generically from the cache
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "group" => Ok(EntityKind::Group),
            "event" => Ok(EntityKind::Event),
            other => Err(Error::UnsupportedOperation(format!("Entity type '{}' is not supported.", other))),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The login exchange failed or returned no usable token
    #[error("Login failed. Response received: {0}")]
    Authentication(String),

    #[error("No {kind} matched with identifier '{id}'")]
    NotFound { kind: EntityKind, id: String },

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("Request failed with status {status}: {body}")]
    RemoteRequestFailed { status: u16, body: String },

    #[error("The session has been closed")]
    SessionClosed,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// An identifier that cannot be used in a URL path (empty, `.` or `..`)
    #[error("Invalid identifier '{0}'")]
    InvalidIdentifier(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid iCal data: {0}")]
    Ical(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Cannot read workbook: {0}")]
    Workbook(#[from] calamine::Error),

    /// A spreadsheet that does not have the layout of a Spond export
    #[error("Unexpected export layout: {0}")]
    InvalidExport(String),
}

impl Error {
    pub(crate) fn not_found<S: ToString>(kind: EntityKind, id: S) -> Self {
        Error::NotFound { kind, id: id.to_string() }
    }

    /// Whether this error means a lookup found nothing.
    ///
    /// Callers that want to degrade gracefully (e.g. print a raw id instead of a name) should check this.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_kind_discriminators() {
        assert_eq!("group".parse::<EntityKind>().unwrap(), EntityKind::Group);
        assert_eq!("event".parse::<EntityKind>().unwrap(), EntityKind::Event);

        let err = "message".parse::<EntityKind>().unwrap_err();
        assert!(matches!(err, Error::UnsupportedOperation(_)));
        assert!(err.is_not_found() == false);
    }

    #[test]
    fn not_found_message() {
        let err = Error::not_found(EntityKind::Event, "ID3");
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "No event matched with identifier 'ID3'");
    }
}
