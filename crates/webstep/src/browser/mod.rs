//! Browser seam: everything the steps need from a page, addressed by element id

mod memory;
mod webdriver;

use async_trait::async_trait;

use crate::error::StepResult;

pub use memory::{MemoryBrowser, MemoryElement, MemoryPage};
pub use webdriver::{BrowserKind, WebDriverBrowser};

/// Observable state of one element at the moment it was inspected
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementState {
    /// Rendered text of the element
    pub text: String,

    /// The `value` property; `None` for elements that have none
    pub value: Option<String>,

    pub displayed: bool,
    pub enabled: bool,
}

impl ElementState {
    /// Visible and enabled, i.e. a click would land.
    pub fn is_clickable(&self) -> bool {
        self.displayed && self.enabled
    }
}

/// Collapse whitespace runs to one space and trim, the way a browser lays
/// out the label of an `<option>`
pub fn normalize_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// A page the steps can drive.
///
/// Lookups report a missing element as `None`; actions on a missing element
/// fail with `StepError::ElementNotFound`.
#[async_trait]
pub trait Browser: Send + Sync {
    /// Navigate to an absolute URL
    async fn goto(&self, url: &str) -> StepResult<()>;

    async fn title(&self) -> StepResult<String>;

    /// Text of the whole `<body>`
    async fn body_text(&self) -> StepResult<String>;

    /// Snapshot of the element with `id`, if it is on the page
    async fn inspect(&self, id: &str) -> StepResult<Option<ElementState>>;

    async fn clear(&self, id: &str) -> StepResult<()>;

    /// Type `text` into the element, appending to what is there
    async fn send_keys(&self, id: &str, text: &str) -> StepResult<()>;

    async fn click(&self, id: &str) -> StepResult<()>;

    /// Pick the `<option>` of a `<select>` whose visible text is `text`,
    /// compared after whitespace normalization
    async fn select_by_text(&self, id: &str, text: &str) -> StepResult<()>;

    /// Visible text of the first selected option of a `<select>`
    async fn selected_text(&self, id: &str) -> StepResult<Option<String>>;

    /// PNG capture of the current viewport
    async fn screenshot(&self) -> StepResult<Vec<u8>>;

    /// End the session. Further calls may fail.
    async fn close(&self) -> StepResult<()>;
}
