//! Events (called "sponds" by the remote API)

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use chrono::{DateTime, Utc};

/// The kind of an [`Event`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    /// A regular event
    Event,
    Recurring,
    /// An availability request
    Availability,
    /// Any kind this crate does not know about
    #[serde(other)]
    Unknown,
}

/// The answers of the invitees of an [`Event`]
///
/// A given person is in at most one of these lists. This is guaranteed by the server, not checked here.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Responses {
    #[serde(rename = "acceptedIds", default)]
    pub accepted_ids: Vec<String>,
    #[serde(rename = "declinedIds", default)]
    pub declined_ids: Vec<String>,
    #[serde(rename = "unansweredIds", default)]
    pub unanswered_ids: Vec<String>,
    #[serde(rename = "waitinglistIds", default)]
    pub waiting_list_ids: Vec<String>,
    #[serde(rename = "unconfirmedIds", default)]
    pub unconfirmed_ids: Vec<String>,
    #[serde(rename = "declineMessages", default, skip_serializing_if = "HashMap::is_empty")]
    pub decline_messages: HashMap<String, String>,
}

impl Responses {
    /// Every list, labelled with the answer it stands for
    pub fn by_answer(&self) -> [(&'static str, &[String]); 5] {
        [
            ("accepted", self.accepted_ids.as_slice()),
            ("declined", self.declined_ids.as_slice()),
            ("unanswered", self.unanswered_ids.as_slice()),
            ("unconfirmed", self.unconfirmed_ids.as_slice()),
            ("waitinglist", self.waiting_list_ids.as_slice()),
        ]
    }
}

/// An organiser of an [`Event`]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Owner {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Owner {
    pub fn new<S: ToString>(id: S) -> Self {
        Self { id: id.to_string(), response: None, extra: Map::new() }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: Option<String>,
    pub feature: Option<String>,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Location {
    /// "feature, address", or whichever of the two is known
    pub fn display_name(&self) -> Option<String> {
        match (&self.feature, &self.address) {
            (Some(f), Some(a)) => Some(format!("{}, {}", f, a)),
            (Some(f), None) => Some(f.clone()),
            (None, Some(a)) => Some(a.clone()),
            (None, None) => None,
        }
    }
}


/// An event
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    id: String,
    heading: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(rename = "type")]
    kind: EventType,
    created_time: DateTime<Utc>,
    #[serde(rename = "startTimestamp")]
    start_time: DateTime<Utc>,
    #[serde(rename = "endTimestamp")]
    end_time: DateTime<Utc>,
    #[serde(default)]
    responses: Responses,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    cancelled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    invite_time: Option<DateTime<Utc>>,
    #[serde(default)]
    owners: Vec<Owner>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    location: Option<Location>,
    /// Last modification, as a server-side counter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    updated: Option<i64>,

    /// Remote fields that are not modelled here.
    /// They are needed to send this event back to the server without losing anything
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl Event {
    pub fn id(&self) -> &str                            { &self.id }
    pub fn heading(&self) -> &str                       { &self.heading }
    pub fn description(&self) -> Option<&str>          { self.description.as_deref() }
    pub fn kind(&self) -> EventType                     { self.kind }
    pub fn created_time(&self) -> &DateTime<Utc>        { &self.created_time }
    pub fn start_time(&self) -> &DateTime<Utc>          { &self.start_time }
    pub fn end_time(&self) -> &DateTime<Utc>            { &self.end_time }
    pub fn responses(&self) -> &Responses               { &self.responses }
    pub fn cancelled(&self) -> Option<bool>             { self.cancelled }
    pub fn invite_time(&self) -> Option<&DateTime<Utc>> { self.invite_time.as_ref() }
    pub fn owners(&self) -> &[Owner]                    { &self.owners }
    pub fn location(&self) -> Option<&Location>         { self.location.as_ref() }
    pub fn updated(&self) -> Option<i64>                { self.updated }
    pub fn extra(&self) -> &Map<String, Value>          { &self.extra }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.unwrap_or(false)
    }

    /// The address of this event in the web client
    pub fn url(&self) -> String {
        format!("https://spond.com/client/sponds/{}/", self.id)
    }

    /// The remote record this event was built from, as a JSON object
    pub fn to_record(&self) -> serde_json::Result<Map<String, Value>> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            _ => Ok(Map::new()),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_remote_event() {
        let event: Event = serde_json::from_value(json!({
            "id": "E1",
            "heading": "Training",
            "type": "RECURRING",
            "createdTime": "2024-01-01T09:00:00.000Z",
            "startTimestamp": "2024-02-01T18:00:00Z",
            "endTimestamp": "2024-02-01T20:00:00Z",
            "responses": {
                "acceptedIds": ["M1"], "declinedIds": ["M2"], "unansweredIds": [],
                "waitinglistIds": [], "unconfirmedIds": [],
                "declineMessages": { "M2": "sick" },
            },
            "owners": [ { "id": "P1", "response": "accepted" } ],
            "location": { "feature": "Main pitch", "address": "1 Road", "id": null },
            "maxAccepted": 12,
        })).unwrap();

        assert_eq!(event.kind(), EventType::Recurring);
        assert_eq!(event.responses().accepted_ids, vec!["M1".to_string()]);
        assert_eq!(event.responses().decline_messages.get("M2").map(|s| s.as_str()), Some("sick"));
        assert_eq!(event.owners()[0].response.as_deref(), Some("accepted"));
        assert_eq!(event.location().and_then(|l| l.display_name()), Some("Main pitch, 1 Road".to_string()));
        assert!(event.is_cancelled() == false);
        assert!(event.invite_time().is_none());

        let record = event.to_record().unwrap();
        assert_eq!(record.get("maxAccepted"), Some(&json!(12)));
        assert_eq!(record.get("heading"), Some(&json!("Training")));
        assert_eq!(record.get("type"), Some(&json!("RECURRING")));
        assert!(record.get("cancelled").is_none());
    }

    #[test]
    fn responses_lists_default_to_empty() {
        let responses: Responses = serde_json::from_value(json!({})).unwrap();
        assert!(responses.by_answer().iter().all(|(_, ids)| ids.is_empty()));
    }

    #[test]
    fn unknown_event_types_do_not_break_a_list() {
        let events: Vec<Event> = serde_json::from_value(json!([
            { "id": "E1", "heading": "Training", "type": "EVENT", "createdTime": "2024-01-01T09:00:00Z",
              "startTimestamp": "2024-02-01T18:00:00Z", "endTimestamp": "2024-02-01T20:00:00Z" },
            { "id": "E2", "heading": "Season", "type": "MATCH_SERIES", "createdTime": "2024-01-01T09:00:00Z",
              "startTimestamp": "2024-03-01T18:00:00Z", "endTimestamp": "2024-06-01T20:00:00Z" },
        ])).unwrap();
        assert_eq!(events[0].kind(), EventType::Event);
        assert_eq!(events[1].kind(), EventType::Unknown);
    }
}
