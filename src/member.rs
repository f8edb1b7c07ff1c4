//! Members, guardians and profiles
//!
//! A [`Member`] is an individual's group-specific record. It may be linked to a [`Profile`], which is the
//! account-level record of the same individual, and it may own [`Guardian`]s (e.g. the parents of a child member).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use chrono::{DateTime, Utc};

/// An individual's account-level record
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    id: String,
    #[serde(default)]
    first_name: String,
    #[serde(default)]
    last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    phone_number: Option<String>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl Profile {
    pub fn id(&self) -> &str                    { &self.id }
    pub fn first_name(&self) -> &str            { &self.first_name }
    pub fn last_name(&self) -> &str             { &self.last_name }
    pub fn email(&self) -> Option<&str>         { self.email.as_deref() }
    pub fn phone_number(&self) -> Option<&str>  { self.phone_number.as_deref() }
    pub fn extra(&self) -> &Map<String, Value>  { &self.extra }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}


/// A group-specific record of an individual
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    id: String,
    created_time: DateTime<Utc>,
    first_name: String,
    last_name: String,
    /// Always present in remote data, but may be empty
    #[serde(rename = "subGroups", default)]
    subgroup_ids: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    phone_number: Option<String>,
    /// Availability depends on the permissions of the authenticated user
    #[serde(default, skip_serializing_if = "Option::is_none")]
    profile: Option<Profile>,
    #[serde(rename = "roles", default, skip_serializing_if = "Option::is_none")]
    role_ids: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    guardians: Vec<Guardian>,
    /// Remote fields that are not modelled here (e.g. custom member fields). They are kept so that a record can be
    /// written back as it was received
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl Member {
    pub fn id(&self) -> &str                        { &self.id }
    pub fn created_time(&self) -> &DateTime<Utc>    { &self.created_time }
    pub fn first_name(&self) -> &str                { &self.first_name }
    pub fn last_name(&self) -> &str                 { &self.last_name }
    pub fn subgroup_ids(&self) -> &[String]         { &self.subgroup_ids }
    pub fn email(&self) -> Option<&str>             { self.email.as_deref() }
    pub fn phone_number(&self) -> Option<&str>      { self.phone_number.as_deref() }
    pub fn profile(&self) -> Option<&Profile>       { self.profile.as_ref() }
    pub fn role_ids(&self) -> Option<&[String]>     { self.role_ids.as_deref() }
    pub fn guardians(&self) -> &[Guardian]          { &self.guardians }
    pub fn extra(&self) -> &Map<String, Value>      { &self.extra }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Whether `identifier` is this member's id, email, full name or profile id
    pub fn matches(&self, identifier: &str) -> bool {
        matches_identity(&self.id, self.email(), &self.full_name(), self.profile(), identifier)
    }
}


/// A guardian of a [`Member`].
///
/// Guardians are matched exactly like members, but some of the group-specific fields may be missing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Guardian {
    id: String,
    first_name: String,
    last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    created_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    profile: Option<Profile>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl Guardian {
    pub fn id(&self) -> &str                                { &self.id }
    pub fn first_name(&self) -> &str                        { &self.first_name }
    pub fn last_name(&self) -> &str                         { &self.last_name }
    pub fn created_time(&self) -> Option<&DateTime<Utc>>    { self.created_time.as_ref() }
    pub fn email(&self) -> Option<&str>                     { self.email.as_deref() }
    pub fn phone_number(&self) -> Option<&str>              { self.phone_number.as_deref() }
    pub fn profile(&self) -> Option<&Profile>               { self.profile.as_ref() }
    pub fn extra(&self) -> &Map<String, Value>              { &self.extra }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn matches(&self, identifier: &str) -> bool {
        matches_identity(&self.id, self.email(), &self.full_name(), self.profile(), identifier)
    }
}

fn matches_identity(id: &str, email: Option<&str>, full_name: &str, profile: Option<&Profile>, identifier: &str) -> bool {
       id == identifier
    || email == Some(identifier)
    || full_name == identifier
    || profile.map(|p| p.id() == identifier).unwrap_or(false)
}


/// A person returned by a lookup: either a member or one of its guardians
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Person {
    Member(Member),
    Guardian(Guardian),
}

/// Returns `member.$property_name` or `guardian.$property_name`, depending on what self is
macro_rules! synthetise_common_getter {
    ($property_name:ident, $return_type:ty) => {
        pub fn $property_name(&self) -> $return_type {
            match self {
                Person::Member(m) => m.$property_name(),
                Person::Guardian(g) => g.$property_name(),
            }
        }
    }
}

impl Person {
    synthetise_common_getter!(id, &str);
    synthetise_common_getter!(first_name, &str);
    synthetise_common_getter!(last_name, &str);
    synthetise_common_getter!(full_name, String);
    synthetise_common_getter!(email, Option<&str>);
    synthetise_common_getter!(phone_number, Option<&str>);
    synthetise_common_getter!(profile, Option<&Profile>);

    pub fn is_guardian(&self) -> bool {
        matches!(self, Person::Guardian(_))
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn jane() -> Member {
        serde_json::from_value(json!({
            "id": "M1",
            "createdTime": "2022-03-01T10:00:00.000Z",
            "firstName": "Jane",
            "lastName": "Doe",
            "subGroups": [],
            "email": "a@b.com",
            "profile": { "id": "P1", "firstName": "Jane", "lastName": "Doe" },
        })).unwrap()
    }

    #[test]
    fn member_matches_every_identifier() {
        let member = jane();
        for identifier in &["M1", "a@b.com", "Jane Doe", "P1"] {
            assert!(member.matches(identifier), "{} should match", identifier);
        }
        for identifier in &["", "M2", "Jane", "jane doe", "A@B.COM"] {
            assert!(member.matches(identifier) == false, "{} should not match", identifier);
        }
    }

    #[test]
    fn optional_fields_are_optional() {
        let member: Member = serde_json::from_value(json!({
            "id": "M2",
            "createdTime": "2022-03-01T10:00:00Z",
            "firstName": "John",
            "lastName": "Smith",
            "subGroups": ["SG1"],
        })).unwrap();

        assert!(member.email().is_none());
        assert!(member.profile().is_none());
        assert!(member.role_ids().is_none());
        assert!(member.guardians().is_empty());
        assert_eq!(member.subgroup_ids(), &["SG1".to_string()]);
        // An absent email never matches, not even the empty string
        assert!(member.matches("") == false);
    }

    #[test]
    fn unknown_fields_are_kept() {
        let raw = json!({
            "id": "M3",
            "createdTime": "2022-03-01T10:00:00Z",
            "firstName": "J",
            "lastName": "D",
            "subGroups": [],
            "fields": { "shirt": "L" },
            "profile": { "id": "P3", "imageUrl": "https://example.com/p3.png" },
            "guardians": [
                { "id": "GU3", "firstName": "K", "lastName": "D", "relation": "parent" },
            ],
        });
        let member: Member = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(member.extra().get("fields"), Some(&json!({ "shirt": "L" })));
        assert_eq!(member.guardians()[0].extra().get("relation"), Some(&json!("parent")));

        let back = serde_json::to_value(&member).unwrap();
        assert_eq!(back["fields"]["shirt"], "L");
        assert_eq!(back["profile"]["imageUrl"], "https://example.com/p3.png");
        assert_eq!(back["guardians"][0]["relation"], "parent");
    }

    #[test]
    fn person_getters() {
        let person = Person::Member(jane());
        assert_eq!(person.full_name(), "Jane Doe");
        assert_eq!(person.profile().map(|p| p.id()), Some("P1"));
        assert!(person.is_guardian() == false);
    }
}
