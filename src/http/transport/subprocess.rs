// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Synchronous transport through a throwaway worker process
//!
//! The calling thread cannot block on the async client, so a synchronous
//! request is serialized into a [`SyncWorkerJob`], handed to a fresh worker
//! process on stdin, and the caller waits for the process to exit. The worker
//! prints exactly one JSON line:
//!
//! ```text
//! {"error": "..."}
//! {"data": {"statusCode": 200, "statusMessage": "OK", "headers": {...}, "data": "<base64>"}}
//! ```
//!
//! Output is read into a buffer capped at `max_output` bytes. A worker that
//! writes more than that is killed and the request fails; nothing is ever
//! truncated silently.

use std::io::{Read, Write};
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing::{debug, warn};

use super::client::ReqwestTransport;
use super::{BlockingTransport, HttpTransport, RequestDescriptor, SyncReply};
use crate::browser::BrowserSettings;
use crate::error::{Error, Result};
use crate::http::headers::IncomingHeaders;

/// Subcommand that turns a binary into a sync worker
pub const SYNC_WORKER_COMMAND: &str = "sync-worker";

/// Environment variable naming the worker executable
pub const SYNC_WORKER_ENV: &str = "KALAMARI_XHR_WORKER";

/// Job passed to the worker on stdin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncWorkerJob {
    pub request: RequestDescriptor,
    pub timeout_ms: u64,
    #[serde(default)]
    pub ignore_https_errors: bool,
    #[serde(default)]
    pub proxy: Option<String>,
}

/// The single JSON line a worker prints
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncWorkerOutput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<WireResponse>,
}

/// Response as carried on the worker's stdout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireResponse {
    pub status_code: u16,
    pub status_message: String,
    pub headers: IncomingHeaders,
    /// Base64 encoded body
    pub data: String,
}

impl From<SyncReply> for WireResponse {
    fn from(reply: SyncReply) -> Self {
        Self {
            status_code: reply.status,
            status_message: reply.status_text,
            headers: reply.headers,
            data: STANDARD.encode(&reply.body),
        }
    }
}

/// [`BlockingTransport`] that runs each request in a child process
#[derive(Debug, Clone)]
pub struct SubprocessTransport {
    program: PathBuf,
    args: Vec<String>,
    max_output: usize,
    timeout: Duration,
    ignore_https_errors: bool,
    proxy: Option<String>,
}

impl SubprocessTransport {
    /// Worker at `program`, invoked as `program sync-worker`
    pub fn new(program: impl Into<PathBuf>) -> Self {
        let defaults = BrowserSettings::default();
        Self {
            program: program.into(),
            args: vec![SYNC_WORKER_COMMAND.to_string()],
            max_output: defaults.max_sync_output,
            timeout: defaults.timeout,
            ignore_https_errors: defaults.ignore_https_errors,
            proxy: None,
        }
    }

    /// Worker chosen from settings: the configured program, then
    /// `KALAMARI_XHR_WORKER`, then the current executable
    pub fn from_settings(settings: &BrowserSettings) -> Result<Self> {
        let program = match settings.sync_worker_program.clone() {
            Some(program) => program,
            None => match std::env::var_os(SYNC_WORKER_ENV) {
                Some(program) => PathBuf::from(program),
                None => std::env::current_exe()?,
            },
        };

        Ok(Self {
            max_output: settings.max_sync_output,
            timeout: settings.timeout,
            ignore_https_errors: settings.ignore_https_errors,
            proxy: settings.proxy.clone(),
            ..Self::new(program)
        })
    }

    /// Replace the worker arguments
    pub fn args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    /// Set the output buffer cap
    pub fn max_output(mut self, bytes: usize) -> Self {
        self.max_output = bytes;
        self
    }

    /// Worker program path
    pub fn program(&self) -> &PathBuf {
        &self.program
    }

    fn job(&self, request: &RequestDescriptor) -> SyncWorkerJob {
        SyncWorkerJob {
            request: request.clone(),
            timeout_ms: self.timeout.as_millis() as u64,
            ignore_https_errors: self.ignore_https_errors,
            proxy: self.proxy.clone(),
        }
    }
}

impl SubprocessTransport {
    /// Write the job and collect at most `max_output` bytes of output
    fn exchange(&self, child: &mut Child, job: &[u8]) -> Result<Vec<u8>> {
        // Dropping stdin closes it so the worker sees EOF
        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(job)
                .map_err(|e| Error::network(format!("Failed to send job to sync worker: {}", e)))?;
        }

        let mut output = Vec::new();
        if let Some(stdout) = child.stdout.take() {
            stdout
                .take(self.max_output as u64 + 1)
                .read_to_end(&mut output)
                .map_err(|e| Error::network(format!("Failed to read sync worker output: {}", e)))?;
        }

        if output.len() > self.max_output {
            warn!(limit = self.max_output, "sync worker output exceeded limit");
            return Err(Error::network(format!(
                "Synchronous response exceeded the {} byte output limit",
                self.max_output
            )));
        }
        Ok(output)
    }
}

impl BlockingTransport for SubprocessTransport {
    fn fetch(&self, request: &RequestDescriptor) -> Result<SyncReply> {
        let job = serde_json::to_vec(&self.job(request))?;

        debug!(
            program = %self.program.display(),
            method = %request.method,
            host = %request.host,
            path = %request.path,
            "spawning sync worker"
        );

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| {
                Error::network(format!(
                    "Failed to start sync worker {}: {}",
                    self.program.display(),
                    e
                ))
            })?;

        let output = match self.exchange(&mut child, &job) {
            Ok(output) => output,
            Err(e) => {
                // Never leave a running or unreaped worker behind
                let _ = child.kill();
                let _ = child.wait();
                return Err(e);
            }
        };

        let status = child
            .wait()
            .map_err(|e| Error::network(format!("Sync worker did not exit cleanly: {}", e)))?;
        debug!(status = %status, bytes = output.len(), "sync worker exited");

        parse_worker_output(&output)
    }
}

/// Parse what a worker printed into a reply
pub fn parse_worker_output(output: &[u8]) -> Result<SyncReply> {
    let text = String::from_utf8_lossy(output);
    let text = text.trim();
    if text.is_empty() {
        return Err(Error::network("Synchronous request failed"));
    }

    let parsed: SyncWorkerOutput = serde_json::from_str(text)
        .map_err(|e| Error::network(format!("Malformed sync worker output: {}", e)))?;

    if let Some(error) = parsed.error.filter(|e| !e.is_empty()) {
        return Err(Error::network(error));
    }

    let data = parsed
        .data
        .ok_or_else(|| Error::network("Synchronous request failed"))?;
    let body = STANDARD
        .decode(data.data.as_bytes())
        .map_err(|e| Error::network(format!("Malformed sync worker body: {}", e)))?;

    Ok(SyncReply {
        status: data.status_code,
        status_text: data.status_message,
        headers: data.headers,
        body: Bytes::from(body),
    })
}

/// Perform one job with the async client and report the outcome
pub async fn execute_job(job: &SyncWorkerJob) -> SyncWorkerOutput {
    let mut settings = BrowserSettings::new()
        .timeout(Duration::from_millis(job.timeout_ms))
        .ignore_https_errors(job.ignore_https_errors);
    settings.proxy = job.proxy.clone();

    let result = async {
        let transport = ReqwestTransport::new(&settings)?;
        transport.send(&job.request).await?.into_reply().await
    }
    .await;

    match result {
        Ok(reply) => SyncWorkerOutput {
            error: None,
            data: Some(reply.into()),
        },
        Err(e) => SyncWorkerOutput {
            error: Some(e.to_string()),
            data: None,
        },
    }
}

/// Worker entry point: read a job from stdin, print one JSON line to stdout
pub async fn run_sync_worker() -> Result<()> {
    let mut input = Vec::new();
    tokio::io::stdin().read_to_end(&mut input).await?;

    let output = match serde_json::from_slice::<SyncWorkerJob>(&input) {
        Ok(job) => execute_job(&job).await,
        Err(e) => SyncWorkerOutput {
            error: Some(format!("Invalid sync worker job: {}", e)),
            data: None,
        },
    };

    let mut line = serde_json::to_vec(&output)?;
    line.push(b'\n');

    let mut stdout = tokio::io::stdout();
    stdout.write_all(&line).await?;
    stdout.flush().await?;
    Ok(())
}
