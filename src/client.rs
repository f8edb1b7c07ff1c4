//! This module provides a client to the core Spond API: groups, events, responses and chats

use bitflags::bitflags;
use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::cache::{find_event, find_group, find_person, ResourceCache};
use crate::config::{ClientConfig, Credentials};
use crate::error::{EntityKind, Error, Result};
use crate::event::{Event, Responses};
use crate::group::Group;
use crate::member::Person;
use crate::merge::{event_template, merge_event_payload, EventChanges};
use crate::session::{send_bytes, send_json, Session};
use crate::traits::ApiClient;

/// Timestamps in event filters are sent with a day precision
const FILTER_DATE_FORMAT: &str = "%Y-%m-%dT00:00:00.000Z";

bitflags! {
    /// Events that are not returned unless asked for
    pub struct EventInclusion: u8 {
        /// Events whose invitations have not been sent yet
        const SCHEDULED = 1;
        /// Hidden events. The server only honours this inside a group
        const HIDDEN = 2;
    }
}

impl Default for EventInclusion {
    fn default() -> Self {
        EventInclusion::empty()
    }
}

/// Filters used when fetching events
#[derive(Clone, Debug)]
pub struct EventFilter {
    pub group_id: Option<String>,
    pub subgroup_id: Option<String>,
    pub include: EventInclusion,
    /// Events that end before or at this time
    pub max_end: Option<DateTime<Utc>>,
    /// Events that end after or at this time
    pub min_end: Option<DateTime<Utc>>,
    pub max_start: Option<DateTime<Utc>>,
    pub min_start: Option<DateTime<Utc>>,
    pub max_events: u32,
}

impl Default for EventFilter {
    fn default() -> Self {
        Self {
            group_id: None,
            subgroup_id: None,
            include: EventInclusion::default(),
            max_end: None,
            min_end: None,
            max_start: None,
            min_start: None,
            max_events: 100,
        }
    }
}

impl EventFilter {
    /// The query parameters that describe this filter
    pub fn query(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("max", self.max_events.to_string()),
            ("scheduled", self.include.contains(EventInclusion::SCHEDULED).to_string()),
        ];

        let timestamps = [
            ("maxEndTimestamp", &self.max_end),
            ("maxStartTimestamp", &self.max_start),
            ("minEndTimestamp", &self.min_end),
            ("minStartTimestamp", &self.min_start),
        ];
        for (name, value) in timestamps.iter() {
            if let Some(dt) = value {
                params.push((*name, dt.format(FILTER_DATE_FORMAT).to_string()));
            }
        }

        if let Some(group_id) = &self.group_id {
            params.push(("groupId", group_id.clone()));
        }
        if let Some(subgroup_id) = &self.subgroup_id {
            params.push(("subGroupId", subgroup_id.clone()));
        }
        if self.include.contains(EventInclusion::HIDDEN) {
            params.push(("includeHidden", "true".to_string()));
        }
        params
    }
}


/// Where a message is sent
#[derive(Clone, Debug, PartialEq)]
pub enum MessageTarget {
    /// An existing chat
    Chat(String),
    /// A new chat with a person of a group. `user` is any identifier accepted by [`Spond::get_person`]
    NewChat { user: String, group_id: String },
}

/// A record that can be resolved by [`Spond::get_entity`]
#[derive(Clone, Debug, PartialEq)]
pub enum Entity {
    Group(Group),
    Event(Event),
}

/// The chat server and the token it expects. It is obtained in exchange for the main token
#[derive(Clone, Debug, Deserialize)]
struct ChatSession {
    url: String,
    auth: String,
}

impl ChatSession {
    fn endpoint(&self, path: &str) -> Result<url::Url> {
        Ok(url::Url::parse(&format!("{}/{}", self.url.trim_end_matches('/'), path))?)
    }
}


/// A client to the core API.
///
/// Every method takes `&mut self`, so a client cannot be used by two tasks at the same time.
/// Create several clients to work concurrently; they share nothing.
pub struct Spond {
    session: Session,
    chat: Option<ChatSession>,
    cache: ResourceCache,
}

impl Spond {
    /// Create a client to the production API. This does not start a connection
    pub fn new(credentials: Credentials) -> Result<Self> {
        Self::with_config(credentials, ClientConfig::core()?)
    }

    pub fn with_config(credentials: Credentials, config: ClientConfig) -> Result<Self> {
        Ok(Self {
            session: Session::new(credentials, config)?,
            chat: None,
            cache: ResourceCache::new(),
        })
    }

    /// The groups fetched last, if any
    pub fn groups(&self) -> Option<&[Group]> { self.cache.groups() }
    /// The events fetched last, if any
    pub fn events(&self) -> Option<&[Event]> { self.cache.events() }
    /// The chats fetched last, if any
    pub fn messages(&self) -> Option<&[Value]> { self.cache.messages() }

    /// Return the chat server details, or fetch them if not known yet
    async fn ensure_chat_authenticated(&mut self) -> Result<ChatSession> {
        if let Some(chat) = &self.chat {
            return Ok(chat.clone());
        }
        self.session.ensure_authenticated().await?;

        let url = self.session.config().endpoint("chat")?;
        let chat: ChatSession = send_json(self.session.request(Method::POST, url)?).await?;
        log::debug!("Chat server is {}", chat.url);
        self.chat = Some(chat.clone());
        Ok(chat)
    }

    /// Fetch every group the authenticated user has access to
    pub async fn get_groups(&mut self) -> Result<&[Group]> {
        self.session.ensure_authenticated().await?;

        let url = self.session.config().endpoint("groups/")?;
        let groups: Vec<Group> = send_json(self.session.request(Method::GET, url)?).await?;
        Ok(self.cache.replace_groups(groups))
    }

    /// Get a group by its id, from the cached groups (that are fetched first if needed)
    pub async fn get_group(&mut self, id: &str) -> Result<&Group> {
        if self.cache.needs_groups() {
            log::debug!("No group is cached yet, fetching them");
            self.get_groups().await?;
        }
        find_group(self.cache.groups().unwrap_or_default(), id)
    }

    /// Find a member or a guardian whose id, email, full name ("First Last") or profile id is `identifier`.
    ///
    /// See [`find_person`] for the order in which records are searched.
    pub async fn get_person(&mut self, identifier: &str) -> Result<Person> {
        if self.cache.needs_groups() {
            self.get_groups().await?;
        }
        find_person(self.cache.groups().unwrap_or_default(), identifier)
    }

    /// Fetch events
    pub async fn get_events(&mut self, filter: &EventFilter) -> Result<&[Event]> {
        self.session.ensure_authenticated().await?;

        let url = self.session.config().endpoint("sponds/")?;
        let request = self.session.request(Method::GET, url)?
            .query(&filter.query());
        let events: Vec<Event> = send_json(request).await?;
        Ok(self.cache.replace_events(events))
    }

    /// Get an event by its id, from the cached events (that are fetched with the default filter first if needed)
    pub async fn get_event(&mut self, id: &str) -> Result<&Event> {
        if self.cache.needs_events() {
            log::debug!("No event is cached yet, fetching them");
            self.get_events(&EventFilter::default()).await?;
        }
        find_event(self.cache.events().unwrap_or_default(), id)
    }

    /// Get a group or an event by its id
    pub async fn get_entity(&mut self, kind: EntityKind, id: &str) -> Result<Entity> {
        match kind {
            EntityKind::Group => Ok(Entity::Group(self.get_group(id).await?.clone())),
            EntityKind::Event => Ok(Entity::Event(self.get_event(id).await?.clone())),
            other => Err(Error::UnsupportedOperation(format!("Entity type '{}' is not supported.", other))),
        }
    }

    /// Update an existing event.
    ///
    /// The event is first looked up (see [`Spond::get_event`]), then the whole record is sent back with `changes`
    /// applied. The record returned by the server is returned; the cached events are left untouched, so
    /// [`Spond::get_events`] must be called again to see the change there.
    pub async fn update_event(&mut self, id: &str, changes: &EventChanges) -> Result<Event> {
        self.session.ensure_authenticated().await?;
        let previous = self.get_event(id).await?.to_record()?;

        if changes.is_empty() {
            log::debug!("No changes for event {}, sending it back as it is", id);
        }
        let payload = merge_event_payload(&event_template(), Some(&previous), &changes.to_map()?);
        let url = self.session.config().resource_url(&["sponds", id])?;
        log::info!("Updating event {}", id);
        send_json(self.session.request(Method::POST, url)?.json(&payload)).await
    }

    /// Create a new event from the template and `changes`
    pub async fn create_event(&mut self, changes: &EventChanges) -> Result<Event> {
        self.session.ensure_authenticated().await?;

        let mut payload = merge_event_payload(&event_template(), None, &changes.to_map()?);
        if let Some(recipients) = &changes.recipients {
            payload.insert("recipients".to_string(), recipients.clone());
        }
        let url = self.session.config().endpoint("sponds")?;
        log::info!("Creating event {:?}", changes.heading);
        send_json(self.session.request(Method::POST, url)?.json(&payload)).await
    }

    /// Download the attendance report of an event, as an XLSX spreadsheet
    pub async fn get_event_attendance_xlsx(&mut self, id: &str) -> Result<Vec<u8>> {
        self.session.ensure_authenticated().await?;

        let url = self.session.config().resource_url(&["sponds", id, "export"])?;
        send_bytes(self.session.request(Method::GET, url)?).await
    }

    /// Change the answer of a person to an event, e.g. with `{"accepted": "false", "declineMessage": "sick"}`.
    ///
    /// Returns the updated responses of the event
    pub async fn change_response(&mut self, event_id: &str, person_id: &str, payload: &Value) -> Result<Responses> {
        self.session.ensure_authenticated().await?;

        let url = self.session.config().resource_url(&["sponds", event_id, "responses", person_id])?;
        send_json(self.session.request(Method::PUT, url)?.json(payload)).await
    }

    /// Fetch the latest chats, at most `max_chats` of them
    pub async fn get_messages(&mut self, max_chats: u32) -> Result<&[Value]> {
        let chat = self.ensure_chat_authenticated().await?;

        let request = self.session.request_without_token(Method::GET, chat.endpoint("chats/")?)?
            .header("auth", chat.auth.as_str())
            .query(&[("max", max_chats.to_string())]);
        let messages: Vec<Value> = send_json(request).await?;
        Ok(self.cache.replace_messages(messages))
    }

    /// Send a text message, either in an existing chat or to start a new one
    pub async fn send_message(&mut self, text: &str, target: &MessageTarget) -> Result<Value> {
        let chat = self.ensure_chat_authenticated().await?;

        let body = match target {
            MessageTarget::Chat(chat_id) => json!({
                "chatId": chat_id,
                "text": text,
                "type": "TEXT",
            }),
            MessageTarget::NewChat { user, group_id } => {
                let person = self.get_person(user).await?;
                let recipient = person.profile()
                    .map(|p| p.id().to_string())
                    .ok_or_else(|| Error::not_found(EntityKind::Profile, user))?;
                json!({
                    "text": text,
                    "type": "TEXT",
                    "recipient": recipient,
                    "groupId": group_id,
                })
            },
        };

        let request = self.session.request_without_token(Method::POST, chat.endpoint("messages")?)?
            .header("auth", chat.auth.as_str())
            .json(&body);
        send_json(request).await
    }
}

impl ApiClient for Spond {
    fn session(&self) -> &Session { &self.session }
    fn session_mut(&mut self) -> &mut Session { &mut self.session }
}


#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn param<'a>(params: &'a [(&'static str, String)], name: &str) -> Option<&'a str> {
        params.iter().find(|(n, _)| *n == name).map(|(_, v)| v.as_str())
    }

    #[test]
    fn default_filter() {
        let params = EventFilter::default().query();
        assert_eq!(param(&params, "max"), Some("100"));
        assert_eq!(param(&params, "scheduled"), Some("false"));
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn full_filter() {
        let filter = EventFilter {
            group_id: Some("G1".to_string()),
            subgroup_id: Some("SG1".to_string()),
            include: EventInclusion::SCHEDULED | EventInclusion::HIDDEN,
            min_start: Some(Utc.with_ymd_and_hms(2024, 3, 1, 17, 30, 0).unwrap()),
            max_end: Some(Utc.with_ymd_and_hms(2024, 4, 30, 0, 0, 0).unwrap()),
            max_events: 10,
            ..EventFilter::default()
        };
        let params = filter.query();
        assert_eq!(param(&params, "max"), Some("10"));
        assert_eq!(param(&params, "scheduled"), Some("true"));
        assert_eq!(param(&params, "includeHidden"), Some("true"));
        assert_eq!(param(&params, "groupId"), Some("G1"));
        assert_eq!(param(&params, "subGroupId"), Some("SG1"));
        assert_eq!(param(&params, "minStartTimestamp"), Some("2024-03-01T00:00:00.000Z"));
        assert_eq!(param(&params, "maxEndTimestamp"), Some("2024-04-30T00:00:00.000Z"));
        assert_eq!(param(&params, "maxStartTimestamp"), None);
    }

    #[test]
    fn chat_endpoints() {
        let chat = ChatSession { url: "https://chat.example.com/".to_string(), auth: "secret".to_string() };
        assert_eq!(chat.endpoint("chats/").unwrap().as_str(), "https://chat.example.com/chats/");
        assert_eq!(chat.endpoint("messages").unwrap().as_str(), "https://chat.example.com/messages");
    }
}
