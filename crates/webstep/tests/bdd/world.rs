//! World struct for the web step scenarios
//!
//! Every scenario gets a fresh browser session and an empty clipboard.

use std::sync::Arc;

use cucumber::World;
use once_cell::sync::OnceCell;
use tracing::{info, warn};

use webstep::{WebDriverBrowser, WebSession, WebstepConfig};

/// Suite configuration, resolved once in `main` before any scenario runs
pub static CONFIG: OnceCell<WebstepConfig> = OnceCell::new();

#[derive(Debug, World)]
#[world(init = Self::new)]
pub struct WebWorld {
    pub session: WebSession,
}

impl WebWorld {
    async fn new() -> anyhow::Result<Self> {
        let config = CONFIG.get().cloned().unwrap_or_default();
        let browser = WebDriverBrowser::connect(&config).await?;

        Ok(Self {
            session: WebSession::new(Arc::new(browser), config),
        })
    }

    /// Screenshot failed scenarios, then end the browser session
    pub async fn finish(&mut self, scenario: &str, failed: bool) {
        if failed {
            let dir = self.session.config().screenshot_dir.clone();
            match self.session.save_screenshot(&dir, scenario).await {
                Ok(path) => info!("Saved screenshot of '{}' to {}", scenario, path.display()),
                Err(e) => warn!("Could not capture '{}': {}", scenario, e),
            }
        }

        if let Err(e) = self.session.close().await {
            warn!("Failed to close browser session: {}", e);
        }
    }
}
