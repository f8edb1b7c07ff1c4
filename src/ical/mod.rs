//! This module converts events to iCal calendars, and reads iCal files back into event changes
//!
//! Building and parsing are done by two different third-party crates (`ics` and `ical`).

mod parser;
pub use parser::{parse_calendar, ParsedEvent};
mod builder;
pub use builder::build_calendar;

use crate::config::{ORG_NAME, PRODUCT_NAME};

/// The PRODID of generated calendars, made of [`ORG_NAME`] and [`PRODUCT_NAME`]
pub fn default_prod_id() -> String {
    let org_name = ORG_NAME.lock().map(|n| n.clone()).unwrap_or_default();
    let product_name = PRODUCT_NAME.lock().map(|n| n.clone()).unwrap_or_default();
    format!("-//{}//{}//EN", org_name, product_name)
}
