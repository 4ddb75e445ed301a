//! Scenario-scoped browser session and the operations behind each web step

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};

use crate::browser::{Browser, ElementState};
use crate::config::WebstepConfig;
use crate::element::{button_id, element_id, FLASH_MESSAGE_ID, SEARCH_RESULTS_ID};
use crate::error::{ensure, StepError, StepResult};
use crate::wait::{wait_for, Condition};

/// One scenario's view of the application: a browser, the config, and the
/// simulated clipboard.
pub struct WebSession {
    browser: Arc<dyn Browser>,
    config: WebstepConfig,
    clipboard: String,
}

impl fmt::Debug for WebSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebSession")
            .field("base_url", &self.config.base_url)
            .field("clipboard", &self.clipboard)
            .finish_non_exhaustive()
    }
}

impl WebSession {
    pub fn new(browser: Arc<dyn Browser>, config: WebstepConfig) -> Self {
        Self {
            browser,
            config,
            clipboard: String::new(),
        }
    }

    pub fn config(&self) -> &WebstepConfig {
        &self.config
    }

    pub fn browser(&self) -> &dyn Browser {
        self.browser.as_ref()
    }

    /// Value held by the last copy
    pub fn clipboard(&self) -> &str {
        &self.clipboard
    }

    /// Id of the form field labelled `name`
    pub fn field_id(&self, name: &str) -> String {
        element_id(&self.config.id_prefix, name)
    }

    async fn wait(&self, id: &str, condition: Condition<'_>) -> StepResult<ElementState> {
        wait_for(self.browser.as_ref(), id, condition, self.config.wait()).await
    }

    async fn require(&self, id: &str) -> StepResult<ElementState> {
        self.browser
            .inspect(id)
            .await?
            .ok_or_else(|| StepError::ElementNotFound(id.to_string()))
    }

    // Navigation

    pub async fn visit_home_page(&self) -> StepResult<()> {
        self.browser.goto(&self.config.base_url).await
    }

    pub async fn check_title(&self, message: &str) -> StepResult<()> {
        let title = self.browser.title().await?;
        ensure(title.contains(message), || {
            format!("expected '{}' in the title, got '{}'", message, title)
        })
    }

    pub async fn check_not_in_body(&self, text: &str) -> StepResult<()> {
        let body = self.browser.body_text().await?;
        ensure(!body.contains(text), || {
            format!("did not expect '{}' on the page", text)
        })
    }

    // Input fields

    pub async fn set_field(&self, name: &str, text: &str) -> StepResult<()> {
        let id = self.field_id(name);
        self.wait(&id, Condition::Present).await?;
        self.browser.clear(&id).await?;
        self.browser.send_keys(&id, text).await
    }

    pub async fn change_field(&self, name: &str, text: &str) -> StepResult<()> {
        self.set_field(name, text).await
    }

    pub async fn select_dropdown(&self, text: &str, name: &str) -> StepResult<()> {
        let id = self.field_id(name);
        self.wait(&id, Condition::Present).await?;
        self.browser.select_by_text(&id, text).await
    }

    pub async fn check_dropdown(&self, text: &str, name: &str) -> StepResult<()> {
        let id = self.field_id(name);
        let selected = self.browser.selected_text(&id).await?;
        ensure(selected.as_deref() == Some(text), || {
            format!(
                "expected '{}' selected in '{}', got {:?}",
                text, id, selected
            )
        })
    }

    pub async fn check_field_empty(&self, name: &str) -> StepResult<()> {
        let id = self.field_id(name);
        let state = self.require(&id).await?;
        ensure(state.value.as_deref() == Some(""), || {
            format!("expected '{}' to be empty, got {:?}", id, state.value)
        })
    }

    // Clipboard

    pub async fn copy_field(&mut self, name: &str) -> StepResult<()> {
        let id = self.field_id(name);
        let state = self.wait(&id, Condition::Present).await?;
        self.clipboard = state.value.unwrap_or_default();
        info!("Clipboard contains: {}", self.clipboard);
        Ok(())
    }

    pub async fn paste_field(&self, name: &str) -> StepResult<()> {
        let id = self.field_id(name);
        self.wait(&id, Condition::Present).await?;
        self.browser.clear(&id).await?;
        self.browser.send_keys(&id, &self.clipboard).await
    }

    // Buttons

    pub async fn press_button(&self, button: &str) -> StepResult<()> {
        let id = button_id(button);
        self.wait(&id, Condition::Clickable).await?;
        self.browser.click(&id).await
    }

    // Results

    pub async fn check_field_value(&self, text: &str, name: &str) -> StepResult<()> {
        let id = self.field_id(name);
        self.wait(&id, Condition::TextInValue(text)).await?;
        Ok(())
    }

    pub async fn check_results(&self, name: &str) -> StepResult<()> {
        self.wait(SEARCH_RESULTS_ID, Condition::TextInElement(name))
            .await?;
        Ok(())
    }

    pub async fn check_results_not(&self, name: &str) -> StepResult<()> {
        let results = self.require(SEARCH_RESULTS_ID).await?;
        ensure(!results.text.contains(name), || {
            format!("did not expect '{}' in the results", name)
        })
    }

    pub async fn check_flash_message(&self, message: &str) -> StepResult<()> {
        self.wait(FLASH_MESSAGE_ID, Condition::TextInElement(message))
            .await?;
        Ok(())
    }

    // Housekeeping

    /// Write a PNG of the current page to `dir`, named after `scenario`
    pub async fn save_screenshot(&self, dir: &Path, scenario: &str) -> StepResult<PathBuf> {
        let png = self.browser.screenshot().await?;
        tokio::fs::create_dir_all(dir).await?;

        let path = dir.join(format!("{}.png", screenshot_name(scenario)));
        tokio::fs::write(&path, png).await?;
        debug!("Screenshot written to {}", path.display());
        Ok(path)
    }

    pub async fn close(&self) -> StepResult<()> {
        self.browser.close().await
    }
}

/// File-system friendly name for a scenario
fn screenshot_name(scenario: &str) -> String {
    let name: String = scenario
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect();
    if name.is_empty() {
        "scenario".to_string()
    } else {
        name
    }
}
