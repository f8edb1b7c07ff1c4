//! Groups, and the roles and subgroups they contain

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{EntityKind, Error, Result};
use crate::member::Member;

/// A role inside a [`Group`]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Role {
    id: String,
    name: String,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl Role {
    pub fn id(&self) -> &str    { &self.id }
    pub fn name(&self) -> &str  { &self.name }
    pub fn extra(&self) -> &Map<String, Value> { &self.extra }
}

/// A subgroup inside a [`Group`]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Subgroup {
    id: String,
    name: String,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl Subgroup {
    pub fn id(&self) -> &str    { &self.id }
    pub fn name(&self) -> &str  { &self.name }
    pub fn extra(&self) -> &Map<String, Value> { &self.extra }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContactPerson {
    id: String,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl ContactPerson {
    pub fn id(&self) -> &str { &self.id }
}


/// A group, with its members, roles and subgroups.
///
/// The three lists are always present, but may be empty.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Group {
    id: String,
    name: String,

    #[serde(default)]
    members: Vec<Member>,
    #[serde(default)]
    roles: Vec<Role>,
    #[serde(rename = "subGroups", default)]
    subgroups: Vec<Subgroup>,

    #[serde(rename = "contactPerson", default, skip_serializing_if = "Option::is_none")]
    contact_person: Option<ContactPerson>,

    /// Remote fields that are not modelled here. They are kept so that the whole record can be exported again
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl Group {
    pub fn id(&self) -> &str                                { &self.id }
    pub fn name(&self) -> &str                              { &self.name }
    pub fn members(&self) -> &[Member]                      { &self.members }
    pub fn roles(&self) -> &[Role]                          { &self.roles }
    pub fn subgroups(&self) -> &[Subgroup]                  { &self.subgroups }
    pub fn contact_person(&self) -> Option<&ContactPerson>  { self.contact_person.as_ref() }
    pub fn extra(&self) -> &Map<String, Value>              { &self.extra }

    pub fn member_by_id(&self, member_id: &str) -> Result<&Member> {
        self.members.iter()
            .find(|m| m.id() == member_id)
            .ok_or_else(|| Error::not_found(EntityKind::Member, member_id))
    }

    pub fn role_by_id(&self, role_id: &str) -> Result<&Role> {
        self.roles.iter()
            .find(|r| r.id() == role_id)
            .ok_or_else(|| Error::not_found(EntityKind::Role, role_id))
    }

    pub fn subgroup_by_id(&self, subgroup_id: &str) -> Result<&Subgroup> {
        self.subgroups.iter()
            .find(|s| s.id() == subgroup_id)
            .ok_or_else(|| Error::not_found(EntityKind::Subgroup, subgroup_id))
    }

    /// Members that belong to `subgroup`
    pub fn members_by_subgroup(&self, subgroup: &Subgroup) -> Vec<&Member> {
        self.members.iter()
            .filter(|m| m.subgroup_ids().iter().any(|id| id == subgroup.id()))
            .collect()
    }

    /// Members that have `role`. Members with no role information are never returned.
    pub fn members_by_role(&self, role: &Role) -> Vec<&Member> {
        self.members.iter()
            .filter(|m| match m.role_ids() {
                Some(ids) => ids.iter().any(|id| id == role.id()),
                None => false,
            })
            .collect()
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn group() -> Group {
        serde_json::from_value(json!({
            "id": "G1",
            "name": "Group One",
            "activity": "football",
            "members": [
                { "id": "M1", "createdTime": "2022-03-01T10:00:00Z", "firstName": "Jane", "lastName": "Doe",
                  "subGroups": ["SG1"], "roles": ["R1"] },
                { "id": "M2", "createdTime": "2022-03-01T10:00:00Z", "firstName": "John", "lastName": "Smith",
                  "subGroups": ["SG1", "SG2"] },
            ],
            "roles": [ { "id": "R1", "name": "Coach" } ],
            "subGroups": [ { "id": "SG1", "name": "Juniors" }, { "id": "SG2", "name": "Seniors" } ],
        })).unwrap()
    }

    #[test]
    fn lookups_by_id() {
        let g = group();
        assert_eq!(g.member_by_id("M2").unwrap().first_name(), "John");
        assert_eq!(g.role_by_id("R1").unwrap().name(), "Coach");
        assert_eq!(g.subgroup_by_id("SG2").unwrap().name(), "Seniors");

        assert!(g.member_by_id("M3").unwrap_err().is_not_found());
        assert!(g.role_by_id("").unwrap_err().is_not_found());
        assert!(g.subgroup_by_id("SG3").unwrap_err().is_not_found());
    }

    #[test]
    fn members_by_subgroup_and_role() {
        let g = group();
        let seniors = g.subgroup_by_id("SG2").unwrap();
        let ids: Vec<&str> = g.members_by_subgroup(seniors).iter().map(|m| m.id()).collect();
        assert_eq!(ids, vec!["M2"]);

        let coach = g.role_by_id("R1").unwrap();
        let ids: Vec<&str> = g.members_by_role(coach).iter().map(|m| m.id()).collect();
        assert_eq!(ids, vec!["M1"]);
    }

    #[test]
    fn lists_default_to_empty_and_extra_fields_survive() {
        let g: Group = serde_json::from_value(json!({ "id": "G2", "name": "Empty", "activity": "chess" })).unwrap();
        assert!(g.members().is_empty());
        assert!(g.roles().is_empty());
        assert!(g.subgroups().is_empty());
        assert_eq!(g.extra().get("activity"), Some(&json!("chess")));

        let back = serde_json::to_value(&g).unwrap();
        assert_eq!(back["activity"], json!("chess"));
    }

    #[test]
    fn group_dump_keeps_member_fields() {
        let raw = json!({
            "id": "G3",
            "name": "Shirts",
            "members": [
                { "id": "M1", "createdTime": "2022-03-01T10:00:00Z", "firstName": "J", "lastName": "D",
                  "subGroups": [], "fields": { "shirt": "L" } },
            ],
            "subGroups": [ { "id": "SG1", "name": "Seniors", "color": "#ff0000" } ],
        });
        let g: Group = serde_json::from_value(raw).unwrap();
        let back = serde_json::to_value(&g).unwrap();
        assert_eq!(back["members"][0]["fields"], json!({ "shirt": "L" }));
        assert_eq!(back["subGroups"][0]["color"], "#ff0000");
    }
}
