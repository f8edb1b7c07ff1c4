//! Tests of the spreadsheet readers, against small workbooks

use std::collections::BTreeSet;

use calamine::Data;

use spond::exports::{read_members, read_poll, User};
use spond::Error;

fn fixture(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

fn options(names: &[&str]) -> Option<BTreeSet<String>> {
    Some(names.iter().map(|n| n.to_string()).collect())
}

#[test]
fn poll_workbook() {
    let _ = env_logger::builder().is_test(true).try_init();
    let votes = read_poll(fixture("poll.xlsx")).unwrap();

    let names: Vec<&str> = votes.iter().map(|(user, _)| user.name.as_str()).collect();
    assert_eq!(names, vec!["Jane Doe", "Tim Doe", "Ann Roe", "Bob Poe"]);

    assert_eq!(votes[0].0, User {
        name: "Jane Doe".to_string(),
        email: Some("jane@example.com".to_string()),
        phone: Some("+4712345678".to_string()),
    });
    assert_eq!(votes[0].1, options(&["Monday"]));
    assert_eq!(votes[1].1, options(&["Monday", "Tuesday"]));
    assert_eq!(votes[1].0.email, None);
    // Blank vote
    assert_eq!(votes[2].1, options(&[]));
    // No vote
    assert_eq!(votes[3].1, None);
}

#[test]
fn member_workbook() {
    let members = read_members(fixture("members.xlsx")).unwrap();
    assert_eq!(members.len(), 2);

    let jane = &members[0];
    assert_eq!(jane.user.name, "Jane Doe");
    assert_eq!(jane.user.phone.as_deref(), Some("+4712345678"));
    assert_eq!(jane.groups.iter().collect::<Vec<_>>(), vec!["Juniors"]);
    assert_eq!(jane.info["Shirt size"], Data::String("L".to_string()));

    let tim = &members[1];
    assert_eq!(tim.user.email, None);
    assert_eq!(tim.groups.len(), 2);
    assert_eq!(tim.info["Birthday"], Data::Empty);
    assert_eq!(tim.info["Shirt size"], Data::Float(7.0));
}

#[test]
fn a_poll_is_not_a_member_list() {
    assert!(matches!(read_members(fixture("poll.xlsx")), Err(Error::InvalidExport(_))));
}

#[test]
fn missing_workbook() {
    assert!(matches!(read_poll(fixture("missing.xlsx")), Err(Error::Workbook(_))));
}
