//! WebDriver-backed browser using fantoccini

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use fantoccini::elements::Element;
use fantoccini::error::{CmdError, ErrorStatus};
use fantoccini::wd::Capabilities;
use fantoccini::{Client, ClientBuilder, Locator};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info};

use super::{normalize_text, Browser, ElementState};
use crate::config::WebstepConfig;
use crate::error::{StepError, StepResult};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserKind {
    #[default]
    Chrome,
    Firefox,
}

impl BrowserKind {
    fn as_str(&self) -> &'static str {
        match self {
            BrowserKind::Chrome => "chrome",
            BrowserKind::Firefox => "firefox",
        }
    }

    /// W3C capabilities requesting this browser
    fn capabilities(&self, headless: bool) -> Capabilities {
        let mut caps = Capabilities::new();
        caps.insert("browserName".to_string(), json!(self.as_str()));

        match self {
            BrowserKind::Chrome => {
                let mut args = vec!["--no-sandbox", "--disable-dev-shm-usage"];
                if headless {
                    args.push("--headless");
                }
                caps.insert("goog:chromeOptions".to_string(), json!({ "args": args }));
            }
            BrowserKind::Firefox => {
                let args: Vec<&str> = if headless { vec!["-headless"] } else { vec![] };
                caps.insert("moz:firefoxOptions".to_string(), json!({ "args": args }));
            }
        }
        caps
    }
}

impl fmt::Display for BrowserKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BrowserKind {
    type Err = StepError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "chrome" | "chromium" => Ok(BrowserKind::Chrome),
            "firefox" => Ok(BrowserKind::Firefox),
            other => Err(StepError::Config(format!("unsupported browser: {}", other))),
        }
    }
}

/// Browser session on a WebDriver server (chromedriver, geckodriver, selenium)
#[derive(Debug, Clone)]
pub struct WebDriverBrowser {
    client: Client,
}

impl WebDriverBrowser {
    /// Open a new session on `config.webdriver_url`
    pub async fn connect(config: &WebstepConfig) -> StepResult<Self> {
        info!(
            "Opening {} session on {} (headless: {})",
            config.browser, config.webdriver_url, config.headless
        );

        let client = ClientBuilder::native()
            .capabilities(config.browser.capabilities(config.headless))
            .connect(&config.webdriver_url)
            .await?;

        Ok(Self { client })
    }

    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    async fn find(&self, id: &str) -> StepResult<Option<Element>> {
        let mut found = self.client.find_all(Locator::Id(id)).await?;
        if found.is_empty() {
            Ok(None)
        } else {
            Ok(Some(found.swap_remove(0)))
        }
    }

    async fn require(&self, id: &str) -> StepResult<Element> {
        self.find(id)
            .await?
            .ok_or_else(|| StepError::ElementNotFound(id.to_string()))
    }
}

async fn snapshot(element: &Element) -> Result<ElementState, CmdError> {
    Ok(ElementState {
        text: element.text().await?,
        value: element.prop("value").await?,
        displayed: element.is_displayed().await?,
        enabled: element.is_enabled().await?,
    })
}

/// Errors meaning the node vanished or was re-rendered after `find`
fn is_transient(err: &CmdError) -> bool {
    match err {
        CmdError::Standard(e) => matches!(
            e.error,
            ErrorStatus::StaleElementReference | ErrorStatus::NoSuchElement
        ),
        _ => false,
    }
}

#[async_trait]
impl Browser for WebDriverBrowser {
    async fn goto(&self, url: &str) -> StepResult<()> {
        debug!("Navigating to {}", url);
        self.client.goto(url).await?;
        Ok(())
    }

    async fn title(&self) -> StepResult<String> {
        Ok(self.client.title().await?)
    }

    async fn body_text(&self) -> StepResult<String> {
        let body = self.client.find(Locator::Css("body")).await?;
        Ok(body.text().await?)
    }

    async fn inspect(&self, id: &str) -> StepResult<Option<ElementState>> {
        let Some(element) = self.find(id).await? else {
            return Ok(None);
        };

        match snapshot(&element).await {
            Ok(state) => Ok(Some(state)),
            Err(e) if is_transient(&e) => {
                debug!("'{}' went stale while being read: {}", id, e);
                Err(StepError::StaleElement(id.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn clear(&self, id: &str) -> StepResult<()> {
        self.require(id).await?.clear().await?;
        Ok(())
    }

    async fn send_keys(&self, id: &str, text: &str) -> StepResult<()> {
        self.require(id).await?.send_keys(text).await?;
        Ok(())
    }

    async fn click(&self, id: &str) -> StepResult<()> {
        self.require(id).await?.click().await?;
        Ok(())
    }

    async fn select_by_text(&self, id: &str, text: &str) -> StepResult<()> {
        let select = self.require(id).await?;
        let wanted = normalize_text(text);

        for option in select.find_all(Locator::Css("option")).await? {
            if normalize_text(&option.text().await?) == wanted {
                option.click().await?;
                return Ok(());
            }
        }

        Err(StepError::OptionNotFound {
            id: id.to_string(),
            option: text.to_string(),
        })
    }

    async fn selected_text(&self, id: &str) -> StepResult<Option<String>> {
        let select = self.require(id).await?;
        let mut checked = select.find_all(Locator::Css("option:checked")).await?;
        if checked.is_empty() {
            return Ok(None);
        }
        Ok(Some(checked.swap_remove(0).text().await?))
    }

    async fn screenshot(&self) -> StepResult<Vec<u8>> {
        Ok(self.client.screenshot().await?)
    }

    async fn close(&self) -> StepResult<()> {
        self.client.clone().close().await?;
        Ok(())
    }
}
