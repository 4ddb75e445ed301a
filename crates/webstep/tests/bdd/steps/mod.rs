//! Step definitions for the product admin UI
//!
//! Each step derives an element id from the phrase, waits for the element
//! and performs one action or one assertion through `WebSession`.

pub mod buttons;
pub mod clipboard;
pub mod data;
pub mod fields;
pub mod navigation;
pub mod results;
