//! Building the payload of an event update
//!
//! The remote API only accepts whole event records, so a partial update is turned into a complete record here:
//! each field of a fixed template takes the caller's new value if there is one, otherwise the value of the
//! previously fetched record, otherwise the template default.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::event::{Location, Owner};

/// The fields (and their defaults) that are sent when an event is created or updated.
/// This is never modified: every merge starts from a copy.
static EVENT_TEMPLATE: Lazy<Map<String, Value>> = Lazy::new(|| {
    let template = json!({
        "heading": null,
        "description": null,
        "spondType": "EVENT",
        "startTimestamp": null,
        "endTimestamp": null,
        "commentsDisabled": false,
        "maxAccepted": 0,
        "rsvpDate": null,
        "location": {
            "id": null,
            "feature": null,
            "address": null,
            "latitude": null,
            "longitude": null,
        },
        "matchEvent": false,
        "matchInfo": {
            "opponentName": null,
            "opponentScore": null,
            "scoresFinal": false,
            "scoresSet": false,
            "scoresSetEver": false,
            "teamName": null,
            "teamScore": null,
            "type": null,
        },
        "owners": [{"id": null}],
        "visibility": "INVITEES",
        "participantsHidden": false,
        "autoReminderType": "DISABLED",
        "autoAccept": false,
        "payment": {},
        "attachments": [],
        "id": null,
        "tasks": {
            "openTasks": [],
            "assignedTasks": [
                {
                    "name": null,
                    "description": "",
                    "type": "ASSIGNED",
                    "id": null,
                    "adultsOnly": true,
                    "assignments": {"memberIds": [], "profiles": [], "remove": []},
                }
            ],
        },
    });
    match template {
        Value::Object(map) => map,
        _ => Map::new(),
    }
});

/// A fresh copy of the event template
pub fn event_template() -> Map<String, Value> {
    EVENT_TEMPLATE.clone()
}

/// Layer `changes` over `previous` over `template`, for every field of `template`.
///
/// A `null` value counts as "not provided", both in `changes` and in `previous`.
/// Keys that are not part of `template` are ignored.
pub fn merge_event_payload(template: &Map<String, Value>, previous: Option<&Map<String, Value>>, changes: &Map<String, Value>) -> Map<String, Value> {
    let provided = |record: Option<&Map<String, Value>>, key: &str| -> Option<Value> {
        record
            .and_then(|r| r.get(key))
            .filter(|v| v.is_null() == false)
            .cloned()
    };

    template.iter()
        .map(|(key, default)| {
            let value = provided(Some(changes), key)
                .or_else(|| provided(previous, key))
                .unwrap_or_else(|| default.clone());
            (key.clone(), value)
        })
        .collect()
}


/// Changes to apply to an event. Fields left to `None` are not changed.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spond_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_timestamp: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_timestamp: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments_disabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_accepted: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rsvp_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_event: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_info: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owners: Option<Vec<Owner>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub participants_hidden: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_reminder_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_accept: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tasks: Option<Value>,

    /// Who the event is sent to. This is only used when creating an event
    #[serde(skip)]
    pub recipients: Option<Value>,
}

impl EventChanges {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn to_map(&self) -> serde_json::Result<Map<String, Value>> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            _ => Ok(Map::new()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
