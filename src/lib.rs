//! This crate provides a client to the Spond group and event management service.
//!
//! The main entry point is the [`Spond`] client, in the [`client`] module. It logs in lazily, fetches groups, events
//! and chats, and keeps the last fetched lists in an in-memory [`cache`], from which persons, groups and events are
//! looked up. \
//! Payments are exposed by another API, with its own client: [`SpondClub`], in the [`club`] module.
//!
//! Both clients share the [`ApiClient`](traits::ApiClient) behaviour: authentication is performed on the first call
//! that needs it, and [`close`](traits::ApiClient::close) ends the session.
//!
//! The [`ical`] and [`attendance`] modules turn fetched events into iCal calendars and attendance reports, and
//! [`exports`] reads the spreadsheets that Spond lets users download.

pub mod traits;
pub use traits::ApiClient;

pub mod config;
pub use config::{ClientConfig, Credentials};
pub mod error;
pub use error::{EntityKind, Error, Result};
pub mod session;

mod member;
pub use member::{Guardian, Member, Person, Profile};
mod group;
pub use group::{ContactPerson, Group, Role, Subgroup};
mod event;
pub use event::{Event, EventType, Location, Owner, Responses};

pub mod cache;
pub mod pagination;
pub mod merge;
pub use merge::EventChanges;

pub mod client;
pub use client::{Entity, EventFilter, EventInclusion, MessageTarget, Spond};
pub mod club;
pub use club::SpondClub;

pub mod ical;
pub mod attendance;
pub mod exports;
pub mod utils;
