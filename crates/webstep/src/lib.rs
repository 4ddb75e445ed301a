//! Webstep: Gherkin web steps for the product admin UI
//!
//! This crate provides the browser side of the acceptance suite:
//! - Derives element ids from the human-readable names used in feature files
//! - Waits for asynchronous page state with condition-based polling
//! - Drives a WebDriver session through `fantoccini`, or an in-process page
//! - Spawns the application under test and seeds it over its REST API
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │            cucumber harness (tests/bdd, Rust)               │
//! │    Given/When/Then phrase -> step fn -> WebSession op       │
//! ├─────────────────────────────────────────────────────────────┤
//! │  WebSession                                                 │
//! │    ├── element_id("Name") -> "product_name"                 │
//! │    ├── wait_for(id, Condition) -> ElementState              │
//! │    ├── one action (clear/send_keys/click/select)            │
//! │    └── or one assertion -> StepError::AssertionFailed       │
//! ├─────────────────────────────────────────────────────────────┤
//! │  dyn Browser                                                │
//! │    ├── WebDriverBrowser (fantoccini client)                 │
//! │    └── MemoryBrowser (in-process page model)                │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod browser;
pub mod config;
pub mod element;
pub mod error;
pub mod seed;
pub mod server;
pub mod session;
pub mod wait;

pub use browser::{Browser, ElementState, MemoryBrowser, MemoryElement, WebDriverBrowser};
pub use config::WebstepConfig;
pub use error::{StepError, StepResult};
pub use session::WebSession;
pub use wait::{Condition, WaitConfig};
