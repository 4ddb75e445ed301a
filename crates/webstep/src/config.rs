//! Suite configuration
//!
//! Resolution order: built-in defaults, then a TOML file, then environment
//! variables. The harness applies its CLI flags last.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::browser::BrowserKind;
use crate::element::ID_PREFIX;
use crate::error::{StepError, StepResult};
use crate::server::ServerConfig;
use crate::wait::{WaitConfig, DEFAULT_POLL_INTERVAL_MS, DEFAULT_WAIT_SECONDS};

/// Env var naming the config file
pub const CONFIG_ENV: &str = "WEBSTEP_CONFIG";

/// Config file picked up from the working directory when present
pub const DEFAULT_CONFIG_FILE: &str = "webstep.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebstepConfig {
    /// Root URL of the application under test
    pub base_url: String,

    /// WebDriver endpoint (chromedriver, geckodriver or a selenium hub)
    pub webdriver_url: String,

    pub browser: BrowserKind,

    pub headless: bool,

    /// Upper bound for every explicit wait
    pub wait_seconds: u64,

    pub poll_interval_ms: u64,

    /// Prefix of form field ids
    pub id_prefix: String,

    /// Where screenshots of failed scenarios go
    pub screenshot_dir: PathBuf,

    /// REST collection used to seed test data, relative to `base_url`
    pub api_path: String,

    /// Application to launch before the suite (None = already running)
    pub server: Option<ServerConfig>,
}

impl Default for WebstepConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            webdriver_url: "http://localhost:4444".to_string(),
            browser: BrowserKind::Chrome,
            headless: true,
            wait_seconds: DEFAULT_WAIT_SECONDS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            id_prefix: ID_PREFIX.to_string(),
            screenshot_dir: PathBuf::from("test-results/screenshots"),
            api_path: "/products".to_string(),
            server: None,
        }
    }
}

impl WebstepConfig {
    /// Load from `path`, `$WEBSTEP_CONFIG` or `./webstep.toml`, then apply
    /// environment overrides.
    pub fn load(path: Option<&Path>) -> StepResult<Self> {
        let path = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from))
            .or_else(|| {
                let local = PathBuf::from(DEFAULT_CONFIG_FILE);
                local.exists().then_some(local)
            });

        let mut config = match path {
            Some(path) => Self::from_file(&path)?,
            None => {
                debug!("No config file, using defaults");
                Self::default()
            }
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> StepResult<Self> {
        info!("Loading config from {}", path.display());
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml(&raw)
    }

    pub fn from_toml(raw: &str) -> StepResult<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// Apply `BASE_URL`, `WEBDRIVER_URL`, `WAIT_SECONDS`, `BROWSER` and
    /// `HEADLESS` as returned by `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> StepResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("BASE_URL") {
            self.base_url = url;
        }
        if let Some(url) = lookup("WEBDRIVER_URL") {
            self.webdriver_url = url;
        }
        if let Some(secs) = lookup("WAIT_SECONDS") {
            self.wait_seconds = secs.trim().parse().map_err(|_| {
                StepError::Config(format!("WAIT_SECONDS is not a number: {}", secs))
            })?;
        }
        if let Some(browser) = lookup("BROWSER") {
            self.browser = browser.parse()?;
        }
        if let Some(headless) = lookup("HEADLESS") {
            self.headless = parse_flag(&headless).ok_or_else(|| {
                StepError::Config(format!("HEADLESS is not a boolean: {}", headless))
            })?;
        }
        Ok(())
    }

    pub fn validate(&self) -> StepResult<()> {
        let urls = [
            ("base_url", &self.base_url),
            ("webdriver_url", &self.webdriver_url),
        ];
        for (name, url) in urls {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(StepError::Config(format!(
                    "{} must be an http(s) URL: {}",
                    name, url
                )));
            }
        }
        if self.poll_interval_ms == 0 {
            return Err(StepError::Config("poll_interval_ms must be positive".to_string()));
        }
        Ok(())
    }

    pub fn wait(&self) -> WaitConfig {
        WaitConfig {
            timeout: Duration::from_secs(self.wait_seconds),
            poll_interval: Duration::from_millis(self.poll_interval_ms),
        }
    }

    /// `base_url` joined with `path`, with exactly one slash between them
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
