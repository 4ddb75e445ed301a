//! Application under test - spawning and health checking its server

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::{sleep, Instant};
use tracing::{info, warn};

use crate::error::{StepError, StepResult};

/// Handle to a running application server
pub struct AppServer {
    child: Child,
    base_url: String,
    port: u16,
}

impl AppServer {
    /// Spawn the application and wait until it answers its health check
    pub async fn spawn(config: &ServerConfig) -> StepResult<Self> {
        let port = match config.port {
            Some(port) => port,
            None => find_free_port()?,
        };
        let base_url = format!("http://127.0.0.1:{}", port);

        info!("Spawning {} on port {}", config.program.display(), port);

        let mut cmd = Command::new(&config.program);
        cmd.args(&config.args)
            .envs(&config.env)
            .env("PORT", port.to_string())
            .stdout(Stdio::null())
            .stderr(Stdio::inherit());

        let child = cmd.spawn().map_err(|e| {
            StepError::ServerStartup(format!(
                "Failed to spawn {}: {}",
                config.program.display(),
                e
            ))
        })?;

        let handle = AppServer {
            child,
            base_url,
            port,
        };

        handle
            .wait_for_healthy(&config.health_path, config.startup_timeout())
            .await?;

        info!("Application is healthy at {}", handle.base_url);
        Ok(handle)
    }

    async fn wait_for_healthy(&self, health_path: &str, timeout: Duration) -> StepResult<()> {
        let health_url = format!("{}{}", self.base_url, health_path);
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(2))
            .build()?;

        let start = Instant::now();
        let mut attempts = 0;

        while start.elapsed() < timeout {
            attempts += 1;

            match client.get(&health_url).send().await {
                Ok(resp) if resp.status().is_success() => return Ok(()),
                Ok(resp) => {
                    warn!("Health check returned {}", resp.status());
                }
                Err(e) => {
                    if attempts == 1 {
                        info!("Waiting for application to start...");
                    }
                    // Connection refused is expected while the app boots
                    if !e.is_connect() {
                        warn!("Health check error: {}", e);
                    }
                }
            }

            sleep(Duration::from_millis(100)).await;
        }

        Err(StepError::ServerHealthCheck(attempts))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// SIGTERM, a short grace period, then kill
    pub fn stop(&mut self) -> StepResult<()> {
        if let Ok(Some(_)) = self.child.try_wait() {
            return Ok(());
        }

        info!("Stopping application (pid: {})", self.child.id());

        #[cfg(unix)]
        {
            use nix::sys::signal::{kill, Signal};
            use nix::unistd::Pid;

            let pid = Pid::from_raw(self.child.id() as i32);
            if kill(pid, Signal::SIGTERM).is_ok() {
                std::thread::sleep(Duration::from_millis(500));
            }
        }

        let _ = self.child.kill();
        self.child.wait()?;
        Ok(())
    }
}

impl Drop for AppServer {
    fn drop(&mut self) {
        let _ = self.stop();
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Executable of the application
    pub program: PathBuf,

    #[serde(default)]
    pub args: Vec<String>,

    /// Extra environment for the process
    #[serde(default)]
    pub env: BTreeMap<String, String>,

    /// Port to listen on (None = find a free one). Passed as `PORT`.
    #[serde(default)]
    pub port: Option<u16>,

    #[serde(default = "default_health_path")]
    pub health_path: String,

    #[serde(default = "default_startup_timeout_secs")]
    pub startup_timeout_secs: u64,
}

fn default_health_path() -> String {
    "/health".to_string()
}

fn default_startup_timeout_secs() -> u64 {
    30
}

impl ServerConfig {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: BTreeMap::new(),
            port: None,
            health_path: default_health_path(),
            startup_timeout_secs: default_startup_timeout_secs(),
        }
    }

    pub fn startup_timeout(&self) -> Duration {
        Duration::from_secs(self.startup_timeout_secs)
    }
}

/// Ask the OS for a port nobody listens on
fn find_free_port() -> StepResult<u16> {
    use std::net::TcpListener;

    let listener = TcpListener::bind("127.0.0.1:0")?;
    Ok(listener.local_addr()?.port())
}
