//! BDD test runner for the product admin UI
//!
//! Runs the Gherkin features in `features/` against a live application
//! through a WebDriver server.
//!
//! # Usage
//!
//! ```bash
//! chromedriver --port=4444 &
//! BASE_URL=http://localhost:8080 cargo test --package webstep --test bdd
//! ```
//!
//! Without a reachable WebDriver server the run is skipped.

#![allow(clippy::expect_used, clippy::panic, clippy::unwrap_used)]

mod steps;
mod world;

use std::path::{Path, PathBuf};
use std::time::Duration;

use cucumber::event::ScenarioFinished;
use cucumber::{cli, World as _};
use futures::FutureExt;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use webstep::server::AppServer;
use webstep::WebstepConfig;

use crate::world::{WebWorld, CONFIG};

#[derive(clap::Args, Debug)]
struct SuiteOpts {
    /// Path to a webstep TOML config file
    #[arg(long = "webstep-config", value_name = "FILE")]
    webstep_config: Option<PathBuf>,

    /// Root URL of the application under test
    #[arg(long)]
    base_url: Option<String>,

    /// WebDriver endpoint
    #[arg(long)]
    webdriver_url: Option<String>,

    /// Run the browser with a visible window
    #[arg(long)]
    headed: bool,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_test_writer()
        .init();

    let opts = cli::Opts::<_, _, _, SuiteOpts>::parsed();

    let mut config = WebstepConfig::load(opts.custom.webstep_config.as_deref())
        .expect("Invalid webstep configuration");
    if let Some(url) = &opts.custom.base_url {
        config.base_url = url.clone();
    }
    if let Some(url) = &opts.custom.webdriver_url {
        config.webdriver_url = url.clone();
    }
    if opts.custom.headed {
        config.headless = false;
    }

    if !webdriver_available(&config.webdriver_url).await {
        warn!(
            "No WebDriver server at {}; skipping browser scenarios",
            config.webdriver_url
        );
        return;
    }

    // Held until the run ends; dropping it stops the application
    let _app = match &config.server {
        Some(server) => {
            let app = AppServer::spawn(server)
                .await
                .expect("Failed to start the application under test");
            config.base_url = app.base_url().to_string();
            Some(app)
        }
        None => None,
    };

    info!("Testing {} via {}", config.base_url, config.webdriver_url);
    CONFIG
        .set(config)
        .expect("Suite configuration initialised twice");

    let features_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("features");

    WebWorld::cucumber()
        .max_concurrent_scenarios(1) // One browser session at a time
        .after(|_feature, _rule, scenario, ev, world| {
            let failed = matches!(ev, ScenarioFinished::StepFailed(..));
            async move {
                if let Some(world) = world {
                    world.finish(&scenario.name, failed).await;
                }
            }
            .boxed_local()
        })
        .with_cli(opts)
        .run_and_exit(features_dir)
        .await;
}

/// Whether a WebDriver server answers its status endpoint
async fn webdriver_available(webdriver_url: &str) -> bool {
    let client = match reqwest::Client::builder()
        .timeout(Duration::from_secs(2))
        .build()
    {
        Ok(client) => client,
        Err(_) => return false,
    };

    let status_url = format!("{}/status", webdriver_url.trim_end_matches('/'));
    matches!(
        client.get(&status_url).send().await,
        Ok(resp) if resp.status().is_success()
    )
}
