//! Starting a self-hosted inference engine as a child process

use std::process::Stdio;
use std::time::{Duration, Instant};

use promptforge_config::EngineConfig;
use promptforge_core::{LlmError, LlmResult};
use tokio::process::{Child, Command};
use tracing::{debug, info};

const READY_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Builds and runs the engine's `serve` command
///
/// Device visibility is passed to the child only; the parent's environment
/// is never modified.
#[derive(Debug, Clone)]
pub struct EngineLauncher {
    model: String,
    config: EngineConfig,
}

impl EngineLauncher {
    /// Launcher for `model` with the given engine settings
    pub fn new(model: impl Into<String>, config: EngineConfig) -> Self {
        Self {
            model: model.into(),
            config,
        }
    }

    /// Arguments passed to the engine executable
    pub fn args(&self) -> Vec<String> {
        let mut args = vec![
            "serve".to_string(),
            self.model.clone(),
            "--tensor-parallel-size".to_string(),
            self.config.num_gpus.to_string(),
            "--dtype".to_string(),
            self.config.dtype.clone(),
            "--gpu-memory-utilization".to_string(),
            self.config.gpu_memory_utilization.to_string(),
        ];
        if let Some(max_len) = self.config.max_model_len {
            args.push("--max-model-len".to_string());
            args.push(max_len.to_string());
        }
        args.push("--port".to_string());
        args.push(self.config.port.to_string());
        args
    }

    /// Environment set on the child process
    pub fn env(&self) -> Vec<(String, String)> {
        vec![(
            "CUDA_VISIBLE_DEVICES".to_string(),
            self.config.visible_devices.clone(),
        )]
    }

    /// The command that `spawn` runs
    ///
    /// Engine stdout is written to our stderr.
    pub fn command(&self) -> Command {
        let mut command = Command::new(&self.config.program);
        command
            .args(self.args())
            .envs(self.env())
            .stdin(Stdio::null())
            .stdout(Stdio::from(std::io::stderr()))
            .kill_on_drop(true);
        command
    }

    /// Base URL of the launched engine's API
    pub fn endpoint(&self) -> String {
        format!("http://127.0.0.1:{}/v1", self.config.port)
    }

    /// Start the engine
    ///
    /// The returned child is killed when dropped.
    pub fn spawn(&self) -> LlmResult<Child> {
        info!(
            program = %self.config.program,
            model = %self.model,
            devices = %self.config.visible_devices,
            "Launching inference engine"
        );
        self.command().spawn().map_err(|e| {
            LlmError::BackendUnavailable(format!(
                "Failed to start {}: {}",
                self.config.program, e
            ))
        })
    }

    /// Poll `{endpoint}/models` until the engine answers or `timeout` passes
    pub async fn wait_until_ready(
        client: &reqwest::Client,
        endpoint: &str,
        timeout: Duration,
    ) -> LlmResult<()> {
        let url = format!("{}/models", endpoint.trim_end_matches('/'));
        let started = Instant::now();

        loop {
            match client.get(&url).send().await {
                Ok(response) if response.status().is_success() => {
                    info!(elapsed_secs = started.elapsed().as_secs(), "Inference engine ready");
                    return Ok(());
                }
                Ok(response) => debug!(status = %response.status(), "Engine not ready"),
                Err(e) => debug!(error = %e, "Engine not reachable yet"),
            }

            if started.elapsed() >= timeout {
                return Err(LlmError::BackendUnavailable(format!(
                    "Engine at {} not ready after {}s",
                    endpoint,
                    timeout.as_secs()
                )));
            }
            tokio::time::sleep(READY_POLL_INTERVAL.min(timeout)).await;
        }
    }
}
