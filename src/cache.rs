//! This module provides the in-memory cache of the data last fetched by a [`Spond`](crate::Spond) client
//!
//! Each list is replaced as a whole whenever it is fetched again; nothing is persisted.
//! The lookup functions walk the cached lists, which is fine because groups contain at most a few hundred members.

use serde_json::Value;

use crate::error::{EntityKind, Error, Result};
use crate::event::Event;
use crate::group::Group;
use crate::member::Person;

#[derive(Debug, Default)]
pub struct ResourceCache {
    groups: Option<Vec<Group>>,
    events: Option<Vec<Event>>,
    messages: Option<Vec<Value>>,
}

impl ResourceCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn groups(&self) -> Option<&[Group]>    { self.groups.as_deref() }
    pub fn events(&self) -> Option<&[Event]>    { self.events.as_deref() }
    pub fn messages(&self) -> Option<&[Value]>  { self.messages.as_deref() }

    /// Whether the groups have to be fetched before any lookup. An empty list counts as missing.
    pub fn needs_groups(&self) -> bool {
        self.groups.as_ref().map(|g| g.is_empty()).unwrap_or(true)
    }

    pub fn needs_events(&self) -> bool {
        self.events.as_ref().map(|e| e.is_empty()).unwrap_or(true)
    }

    pub fn replace_groups(&mut self, groups: Vec<Group>) -> &[Group] {
        log::debug!("Caching {} groups", groups.len());
        self.groups.insert(groups)
    }

    pub fn replace_events(&mut self, events: Vec<Event>) -> &[Event] {
        log::debug!("Caching {} events", events.len());
        self.events.insert(events)
    }

    pub fn replace_messages(&mut self, messages: Vec<Value>) -> &[Value] {
        log::debug!("Caching {} chats", messages.len());
        self.messages.insert(messages)
    }
}


/// The group with this exact id
pub fn find_group<'a>(groups: &'a [Group], id: &str) -> Result<&'a Group> {
    groups.iter()
        .find(|g| g.id() == id)
        .ok_or_else(|| Error::not_found(EntityKind::Group, id))
}

/// The event with this exact id
pub fn find_event<'a>(events: &'a [Event], id: &str) -> Result<&'a Event> {
    events.iter()
        .find(|e| e.id() == id)
        .ok_or_else(|| Error::not_found(EntityKind::Event, id))
}

/// The first member or guardian that matches `identifier` (see [`Member::matches`](crate::Member::matches)).
///
/// Groups are walked in order, then members in order. A member is checked before its own guardians.
/// The same person may appear in several groups: the first record wins.
pub fn find_person(groups: &[Group], identifier: &str) -> Result<Person> {
    for group in groups {
        for member in group.members() {
            if member.matches(identifier) {
                return Ok(Person::Member(member.clone()));
            }
            for guardian in member.guardians() {
                if guardian.matches(identifier) {
                    return Ok(Person::Guardian(guardian.clone()));
                }
            }
        }
    }
    Err(Error::not_found(EntityKind::Person, identifier))
}


#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn groups() -> Vec<Group> {
        serde_json::from_value(json!([
            {
                "id": "G1",
                "name": "Group One",
                "members": [
                    {
                        "id": "M1", "createdTime": "2022-03-01T10:00:00Z", "subGroups": [],
                        "firstName": "Jane", "lastName": "Doe", "email": "a@b.com",
                        "profile": { "id": "P1", "firstName": "Jane", "lastName": "Doe" },
                    },
                    {
                        "id": "M2", "createdTime": "2022-03-01T10:00:00Z", "subGroups": [],
                        "firstName": "Tim", "lastName": "Doe",
                        "guardians": [
                            { "id": "GU1", "firstName": "Mary", "lastName": "Doe", "email": "mary@b.com",
                              "profile": { "id": "P9" } },
                        ],
                    },
                ],
                "roles": [],
                "subGroups": [],
            },
            {
                "id": "G2",
                "name": "Group Two",
                "members": [
                    {
                        "id": "M3", "createdTime": "2022-03-01T10:00:00Z", "subGroups": [],
                        "firstName": "Jane", "lastName": "Doe",
                    },
                ],
                "roles": [],
                "subGroups": [],
            },
        ])).unwrap()
    }

    fn events() -> Vec<Event> {
        serde_json::from_value(json!([
            { "id": "ID1", "heading": "Event One", "type": "EVENT", "createdTime": "2024-01-01T00:00:00Z",
              "startTimestamp": "2024-02-01T18:00:00Z", "endTimestamp": "2024-02-01T20:00:00Z" },
            { "id": "ID2", "heading": "Event Two", "type": "EVENT", "createdTime": "2024-01-01T00:00:00Z",
              "startTimestamp": "2024-02-08T18:00:00Z", "endTimestamp": "2024-02-08T20:00:00Z" },
        ])).unwrap()
    }

    #[test]
    fn get_event_by_id() {
        let events = events();
        assert_eq!(find_event(&events, "ID1").unwrap().heading(), "Event One");
        assert!(find_event(&events, "ID3").unwrap_err().is_not_found());
        assert!(find_event(&events, "").unwrap_err().is_not_found());
    }

    #[test]
    fn get_group_by_id() {
        let groups = groups();
        assert_eq!(find_group(&groups, "G2").unwrap().name(), "Group Two");
        assert!(find_group(&groups, "G3").unwrap_err().is_not_found());
        assert!(find_group(&groups, "").unwrap_err().is_not_found());
    }

    #[test]
    fn get_person_by_any_identifier() {
        let groups = groups();
        for identifier in &["M1", "a@b.com", "P1"] {
            let person = find_person(&groups, identifier).unwrap();
            assert_eq!(person.id(), "M1");
        }
        assert!(find_person(&groups, "nobody@b.com").unwrap_err().is_not_found());
        assert!(find_person(&groups, "").unwrap_err().is_not_found());
    }

    #[test]
    fn first_match_wins_across_groups() {
        // M1 in G1 and M3 in G2 share the same name
        let person = find_person(&groups(), "Jane Doe").unwrap();
        assert_eq!(person.id(), "M1");
    }

    #[test]
    fn guardians_are_matched_too() {
        let groups = groups();
        for identifier in &["GU1", "mary@b.com", "Mary Doe", "P9"] {
            let person = find_person(&groups, identifier).unwrap();
            assert!(person.is_guardian());
            assert_eq!(person.id(), "GU1");
        }
    }

    #[test]
    fn empty_lists_need_a_fetch() {
        let mut cache = ResourceCache::new();
        assert!(cache.needs_groups());
        cache.replace_groups(Vec::new());
        assert!(cache.needs_groups());
        cache.replace_groups(groups());
        assert!(cache.needs_groups() == false);
        assert_eq!(cache.groups().map(|g| g.len()), Some(2));
        assert!(cache.needs_events());
    }
}
