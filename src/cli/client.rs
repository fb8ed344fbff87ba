//! Lightweight HTTP client for CLI commands.
//!
//! CLI subcommands (`todod list`, `todod add`, etc.) use this to talk to
//! the running daemon. One client per command invocation; every call has a
//! 5-second timeout.

use anyhow::{Context as _, Result};
use serde_json::Value;
use std::time::Duration;

use crate::store::{Task, TaskDraft};

pub struct ApiClient {
    http: reqwest::Client,
    base: String,
}

impl ApiClient {
    /// Create a client targeting the daemon on the given port.
    pub fn new(port: u16) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            http,
            base: format!("http://127.0.0.1:{port}/api/v1"),
        })
    }

    /// GET /todos — the full task list.
    pub async fn list(&self) -> Result<Vec<Task>> {
        let resp = self
            .http
            .get(format!("{}/todos", self.base))
            .send()
            .await
            .context("could not reach the daemon — is it running? (todod serve)")?;
        read_json(resp).await
    }

    /// POST /todos — create a task; the daemon mints the id when absent.
    pub async fn create(&self, draft: &TaskDraft) -> Result<Task> {
        let resp = self
            .http
            .post(format!("{}/todos", self.base))
            .json(draft)
            .send()
            .await
            .context("could not reach the daemon — is it running? (todod serve)")?;
        read_json(resp).await
    }

    /// PUT /todos/{id} — re-send the whole record.
    pub async fn replace(&self, id: i64, task: &Task) -> Result<Task> {
        let resp = self
            .http
            .put(format!("{}/todos/{id}", self.base))
            .json(task)
            .send()
            .await
            .context("could not reach the daemon — is it running? (todod serve)")?;
        read_json(resp).await
    }

    /// DELETE /todos/{id} — returns the confirmation message.
    pub async fn delete(&self, id: i64) -> Result<String> {
        let resp = self
            .http
            .delete(format!("{}/todos/{id}", self.base))
            .send()
            .await
            .context("could not reach the daemon — is it running? (todod serve)")?;
        let body: Value = read_json(resp).await?;
        Ok(body["message"].as_str().unwrap_or("task deleted").to_string())
    }

    /// GET /health — daemon status.
    pub async fn health(&self) -> Result<Value> {
        let resp = self
            .http
            .get(format!("{}/health", self.base))
            .send()
            .await
            .context("could not reach the daemon — is it running? (todod serve)")?;
        read_json(resp).await
    }
}

/// Decode a 2xx response body, or surface the daemon's `{"error": ...}`
/// message as the failure.
async fn read_json<T: serde::de::DeserializeOwned>(resp: reqwest::Response) -> Result<T> {
    let status = resp.status();
    if status.is_success() {
        return resp.json().await.context("invalid JSON in daemon response");
    }
    let body: Value = resp.json().await.unwrap_or(Value::Null);
    let message = body["error"].as_str().unwrap_or("unknown error").to_string();
    anyhow::bail!("daemon returned {status}: {message}")
}
