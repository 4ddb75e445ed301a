//! Error types for web steps

use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StepError {
    #[error("Timed out after {waited:?} waiting for '{id}' to {condition}")]
    Timeout {
        id: String,
        condition: String,
        waited: Duration,
    },

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    /// The element was replaced in the DOM between lookup and read
    #[error("Element '{0}' went stale")]
    StaleElement(String),

    #[error("Element '{0}' is not interactable")]
    NotInteractable(String),

    #[error("Option '{option}' not found in dropdown '{id}'")]
    OptionNotFound { id: String, option: String },

    #[error("Assertion failed: {0}")]
    AssertionFailed(String),

    #[error("WebDriver command failed: {0}")]
    WebDriver(#[from] fantoccini::error::CmdError),

    #[error("WebDriver session could not be created: {0}")]
    Session(#[from] fantoccini::error::NewSessionError),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Server failed to start: {0}")]
    ServerStartup(String),

    #[error("Server health check failed after {0} attempts")]
    ServerHealthCheck(usize),

    #[error("Seeding test data failed: {0}")]
    Seed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type StepResult<T> = Result<T, StepError>;

/// Fails with `AssertionFailed` when `condition` is false.
pub fn ensure(condition: bool, message: impl FnOnce() -> String) -> StepResult<()> {
    if condition {
        Ok(())
    } else {
        Err(StepError::AssertionFailed(message()))
    }
}
