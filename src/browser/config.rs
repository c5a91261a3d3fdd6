// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Browser settings shared by every page

use std::path::PathBuf;
use std::time::Duration;

use crate::http::DEFAULT_USER_AGENT;

/// Browser settings
#[derive(Debug, Clone)]
pub struct BrowserSettings {
    /// User agent string
    pub user_agent: String,
    /// Request timeout (async client and sync worker)
    pub timeout: Duration,
    /// Accept invalid TLS certificates
    pub ignore_https_errors: bool,
    /// Proxy URL
    pub proxy: Option<String>,
    /// Allow `file:` requests
    pub enable_file_system_requests: bool,
    /// Maximum redirect hops per request
    pub max_redirects: usize,
    /// Executable used as the sync worker
    pub sync_worker_program: Option<PathBuf>,
    /// Cap on the sync worker's captured output
    pub max_sync_output: usize,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(30),
            ignore_https_errors: false,
            proxy: None,
            enable_file_system_requests: false,
            max_redirects: 20,
            sync_worker_program: None,
            max_sync_output: 64 * 1024 * 1024,
        }
    }
}

impl BrowserSettings {
    /// Create default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set user agent
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Ignore HTTPS errors
    pub fn ignore_https_errors(mut self, ignore: bool) -> Self {
        self.ignore_https_errors = ignore;
        self
    }

    /// Set proxy
    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Allow or refuse `file:` requests
    pub fn enable_file_system_requests(mut self, enabled: bool) -> Self {
        self.enable_file_system_requests = enabled;
        self
    }

    /// Set the redirect hop limit
    pub fn max_redirects(mut self, max: usize) -> Self {
        self.max_redirects = max;
        self
    }

    /// Set the sync worker executable
    pub fn sync_worker_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.sync_worker_program = Some(program.into());
        self
    }

    /// Set the sync worker output cap
    pub fn max_sync_output(mut self, bytes: usize) -> Self {
        self.max_sync_output = bytes;
        self
    }
}
