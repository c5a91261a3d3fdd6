// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Page implementation
//!
//! The page owns everything its requests share: the location they resolve
//! against, settings, the cookie store, the task registry and the transports.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;
use url::Url;

use super::config::BrowserSettings;
use super::tasks::AsyncTaskManager;
use crate::dom::{DocumentParser, HtmlDocumentParser};
use crate::error::Result;
use crate::http::transport::{
    BlockingTransport, FileSystem, HttpTransport, LocalFileSystem, ReqwestTransport,
    SubprocessTransport,
};
use crate::http::{CookieStore, MemoryCookieJar};
use crate::xhr::{ErrorEvent, XmlHttpRequest};

/// Page-level error listener
pub type PageErrorCallback = Arc<dyn Fn(&ErrorEvent) + Send + Sync>;

struct PageInner {
    location: RwLock<Url>,
    settings: BrowserSettings,
    cookies: Arc<dyn CookieStore>,
    tasks: Arc<AsyncTaskManager>,
    http: Arc<dyn HttpTransport>,
    blocking: Arc<dyn BlockingTransport>,
    files: Arc<dyn FileSystem>,
    parser: Arc<dyn DocumentParser>,
    error_listeners: RwLock<Vec<PageErrorCallback>>,
}

/// A browser page. Cloning is cheap and clones share state.
#[derive(Clone)]
pub struct Page {
    inner: Arc<PageInner>,
}

impl std::fmt::Debug for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Page")
            .field("location", &self.location().as_str())
            .field("pending_tasks", &self.inner.tasks.pending())
            .finish_non_exhaustive()
    }
}

impl Page {
    /// Start building a page at `location`
    pub fn builder(location: Url) -> PageBuilder {
        PageBuilder::new(location)
    }

    /// Page at `location` with default collaborators
    pub fn new(location: Url, settings: BrowserSettings) -> Result<Self> {
        Self::builder(location).settings(settings).build()
    }

    /// Create a request bound to this page
    pub fn new_request(&self) -> XmlHttpRequest {
        XmlHttpRequest::new(self.clone())
    }

    /// Current document location
    pub fn location(&self) -> Url {
        self.inner.location.read().clone()
    }

    /// Navigate the location without loading anything
    pub fn set_location(&self, location: Url) {
        *self.inner.location.write() = location;
    }

    /// Settings
    pub fn settings(&self) -> &BrowserSettings {
        &self.inner.settings
    }

    /// Cookie store shared by this page's requests
    pub fn cookies(&self) -> Arc<dyn CookieStore> {
        self.inner.cookies.clone()
    }

    /// Task registry
    pub fn tasks(&self) -> Arc<AsyncTaskManager> {
        self.inner.tasks.clone()
    }

    pub(crate) fn http_transport(&self) -> Arc<dyn HttpTransport> {
        self.inner.http.clone()
    }

    pub(crate) fn blocking_transport(&self) -> Arc<dyn BlockingTransport> {
        self.inner.blocking.clone()
    }

    pub(crate) fn file_system(&self) -> Arc<dyn FileSystem> {
        self.inner.files.clone()
    }

    pub(crate) fn document_parser(&self) -> Arc<dyn DocumentParser> {
        self.inner.parser.clone()
    }

    /// Listen to request errors raised on this page
    pub fn on_error(&self, callback: PageErrorCallback) {
        self.inner.error_listeners.write().push(callback);
    }

    pub(crate) fn dispatch_error(&self, event: &ErrorEvent) {
        let listeners: Vec<PageErrorCallback> = self.inner.error_listeners.read().clone();
        for listener in listeners {
            listener(event);
        }
    }

    /// Wait until every in-flight request has finished
    pub async fn when_complete(&self) {
        self.inner.tasks.when_complete().await;
    }

    /// Abort every in-flight request
    pub fn abort(&self) {
        debug!(pending = self.inner.tasks.pending(), "aborting page tasks");
        self.inner.tasks.abort_all();
    }
}

/// Builder for [`Page`]
pub struct PageBuilder {
    location: Url,
    settings: BrowserSettings,
    cookies: Option<Arc<dyn CookieStore>>,
    http: Option<Arc<dyn HttpTransport>>,
    blocking: Option<Arc<dyn BlockingTransport>>,
    files: Option<Arc<dyn FileSystem>>,
    parser: Option<Arc<dyn DocumentParser>>,
}

impl PageBuilder {
    fn new(location: Url) -> Self {
        Self {
            location,
            settings: BrowserSettings::default(),
            cookies: None,
            http: None,
            blocking: None,
            files: None,
            parser: None,
        }
    }

    pub fn settings(mut self, settings: BrowserSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn cookie_store(mut self, store: Arc<dyn CookieStore>) -> Self {
        self.cookies = Some(store);
        self
    }

    pub fn http_transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.http = Some(transport);
        self
    }

    pub fn blocking_transport(mut self, transport: Arc<dyn BlockingTransport>) -> Self {
        self.blocking = Some(transport);
        self
    }

    pub fn file_system(mut self, files: Arc<dyn FileSystem>) -> Self {
        self.files = Some(files);
        self
    }

    pub fn document_parser(mut self, parser: Arc<dyn DocumentParser>) -> Self {
        self.parser = Some(parser);
        self
    }

    /// Build the page, filling unset collaborators with the defaults
    pub fn build(self) -> Result<Page> {
        let http: Arc<dyn HttpTransport> = match self.http {
            Some(http) => http,
            None => Arc::new(ReqwestTransport::new(&self.settings)?),
        };
        let blocking: Arc<dyn BlockingTransport> = match self.blocking {
            Some(blocking) => blocking,
            None => Arc::new(SubprocessTransport::from_settings(&self.settings)?),
        };

        Ok(Page {
            inner: Arc::new(PageInner {
                location: RwLock::new(self.location),
                cookies: self
                    .cookies
                    .unwrap_or_else(|| Arc::new(MemoryCookieJar::new())),
                tasks: Arc::new(AsyncTaskManager::new()),
                http,
                blocking,
                files: self.files.unwrap_or_else(|| Arc::new(LocalFileSystem::new())),
                parser: self
                    .parser
                    .unwrap_or_else(|| Arc::new(HtmlDocumentParser::new())),
                error_listeners: RwLock::new(Vec::new()),
                settings: self.settings,
            }),
        })
    }
}
