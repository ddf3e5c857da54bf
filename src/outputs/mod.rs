//! Output files written next to the rendered page.
//!
//! - [`json`]: The displayed news items as a JSON feed

pub mod json;
