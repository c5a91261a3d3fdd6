// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! XMLHttpRequest state machine
//!
//! One [`XmlHttpRequest`] owns a [`RequestState`] and drives it through
//! `unsent -> opened -> headers-received -> loading -> done`. Network I/O is
//! delegated to the page's transports: async requests run on a spawned Tokio
//! task, sync requests block on the page's [`BlockingTransport`].
//!
//! State lives behind a mutex because the async task may run on any worker
//! thread. Events are queued while the lock is held and dispatched after it
//! is released, so listeners may call back into the request.
//!
//! [`BlockingTransport`]: crate::http::transport::BlockingTransport

use std::collections::BTreeMap;
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use bytes::{Bytes, BytesMut};
use futures::StreamExt;
use parking_lot::Mutex;
use tracing::{debug, error, trace};
use url::Url;

use super::cookie_bridge::CookieBridge;
use super::decoder::ResponseDecoder;
use super::events::{ErrorEvent, EventCallback, EventQueue, EventTarget, ProgressEvent, Target, XhrEvent};
use super::state::{OpenSettings, ReadyState, RequestState, ResponseType, XhrResponse};
use crate::browser::{AsyncTaskRegistry, Page};
use crate::dom::{Document, DocumentParser};
use crate::error::{Error, Result};
use crate::http::transport::RequestDescriptor;
use crate::http::{
    is_forbidden_header, is_forbidden_method, is_redirect_status, names, IncomingHeaders,
    RequestUrl,
};

const DEFAULT_POST_CONTENT_TYPE: &str = "text/plain;charset=UTF-8";

struct Inner {
    page: Page,
    state: Mutex<RequestState>,
    events: EventTarget,
    upload: EventTarget,
}

/// XMLHttpRequest bound to a [`Page`]. Clones share the same request.
#[derive(Clone)]
pub struct XmlHttpRequest {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for XmlHttpRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("XmlHttpRequest")
            .field("ready_state", &state.ready_state)
            .field("status", &state.status)
            .field("response_type", &state.response_type)
            .finish_non_exhaustive()
    }
}

impl XmlHttpRequest {
    /// Create an unsent request
    pub fn new(page: Page) -> Self {
        Self {
            inner: Arc::new(Inner {
                page,
                state: Mutex::new(RequestState::default()),
                events: EventTarget::new(),
                upload: EventTarget::new(),
            }),
        }
    }

    // Listeners

    /// Request event target
    pub fn events(&self) -> &EventTarget {
        &self.inner.events
    }

    /// Upload sub-object
    pub fn upload(&self) -> &EventTarget {
        &self.inner.upload
    }

    /// Listen to every request event
    pub fn add_listener(&self, callback: EventCallback) {
        self.inner.events.add_listener(callback);
    }

    /// Listen to one request event type
    pub fn add_event_listener(&self, event_type: &str, callback: EventCallback) {
        self.inner.events.add_event_listener(event_type, callback);
    }

    // Getters

    pub fn ready_state(&self) -> ReadyState {
        self.inner.state.lock().ready_state
    }

    pub fn status(&self) -> Option<u16> {
        self.inner.state.lock().status
    }

    pub fn status_text(&self) -> Option<String> {
        self.inner.state.lock().status_text.clone()
    }

    pub fn response(&self) -> Option<XhrResponse> {
        self.inner.state.lock().response.clone()
    }

    /// Final URL after redirects
    pub fn response_url(&self) -> Option<Url> {
        self.inner.state.lock().response_url.clone()
    }

    pub fn response_type(&self) -> ResponseType {
        self.inner.state.lock().response_type
    }

    /// Decoded text; only readable for the `""` and `text` response types
    pub fn response_text(&self) -> Result<Option<String>> {
        let state = self.inner.state.lock();
        if !state.response_type.is_text() {
            return Err(Error::invalid_state(format!(
                "The value is only accessible if responseType is '' or 'text' (was '{}')",
                state.response_type
            )));
        }
        Ok(state.response_text.clone())
    }

    /// Parsed document; only readable for the `""` and `document` response types
    pub fn response_xml(&self) -> Result<Option<Document>> {
        let state = self.inner.state.lock();
        if !matches!(
            state.response_type,
            ResponseType::Default | ResponseType::Document
        ) {
            return Err(Error::invalid_state(format!(
                "The value is only accessible if responseType is '' or 'document' (was '{}')",
                state.response_type
            )));
        }
        Ok(state.response_xml.clone())
    }

    /// Set the response type
    pub fn set_response_type(&self, response_type: ResponseType) -> Result<()> {
        let mut state = self.inner.state.lock();
        if !matches!(state.ready_state, ReadyState::Unsent | ReadyState::Opened) {
            return Err(Error::invalid_state(
                "The object's state must be OPENED or UNSENT",
            ));
        }
        if !state.is_async() {
            return Err(Error::invalid_state(
                "The response type cannot be changed for synchronous requests",
            ));
        }
        if state.send_flag {
            return Err(Error::invalid_state(
                "The response type cannot be changed once the request is sent",
            ));
        }
        state.response_type = response_type;
        Ok(())
    }

    /// Response header value. Cookie headers are never exposed; repeated
    /// headers are joined with `", "`.
    pub fn get_response_header(&self, name: &str) -> Option<String> {
        let lower = name.to_ascii_lowercase();
        if lower == names::SET_COOKIE || lower == names::SET_COOKIE2 {
            return None;
        }

        let state = self.inner.state.lock();
        if state.ready_state <= ReadyState::Opened || state.error_flag {
            return None;
        }
        state.incoming_headers.get(&lower).map(|field| field.joined())
    }

    /// Every response header as `name: value` lines joined with CRLF
    pub fn get_all_response_headers(&self) -> String {
        let state = self.inner.state.lock();
        if state.ready_state < ReadyState::HeadersReceived || state.error_flag {
            return String::new();
        }

        state
            .incoming_headers
            .iter()
            .filter(|(name, _)| *name != names::SET_COOKIE && *name != names::SET_COOKIE2)
            .map(|(name, field)| format!("{}: {}", name, field.joined()))
            .collect::<Vec<_>>()
            .join("\r\n")
    }

    // Operations

    /// Open an asynchronous request
    pub fn open(&self, method: &str, url: &str) -> Result<()> {
        self.open_with(method, url, true, None, None)
    }

    /// Open a request.
    ///
    /// Any previous attempt is aborted first. A forbidden method fails
    /// before that, leaving the current state untouched.
    pub fn open_with(
        &self,
        method: &str,
        url: &str,
        is_async: bool,
        user: Option<&str>,
        password: Option<&str>,
    ) -> Result<()> {
        if is_forbidden_method(method) {
            return Err(Error::security(format!(
                "Request method '{}' is not allowed",
                method
            )));
        }

        self.abort();

        self.with_state(|s, q| {
            s.aborted_flag = false;
            s.error_flag = false;

            if !is_async && !s.response_type.is_text() {
                return Err(Error::invalid_access(
                    "Synchronous requests must not set a response type",
                ));
            }

            s.settings = Some(OpenSettings {
                method: method.to_ascii_uppercase(),
                url: url.to_string(),
                is_async,
                user: user.filter(|u| !u.is_empty()).map(str::to_string),
                password: password.map(str::to_string),
            });
            set_state(s, ReadyState::Opened, q);
            Ok(())
        })
    }

    /// Set a request header. Returns `false` for forbidden names.
    pub fn set_request_header(&self, name: &str, value: &str) -> Result<bool> {
        self.with_state(|s, _| {
            if s.ready_state != ReadyState::Opened {
                return Err(Error::invalid_state("The object's state must be OPENED"));
            }
            if is_forbidden_header(name) {
                return Ok(false);
            }
            if s.send_flag {
                return Err(Error::invalid_state("Request is in progress"));
            }
            s.request_headers
                .insert(name.to_ascii_lowercase(), value.to_string());
            Ok(true)
        })
    }

    /// Send the request.
    ///
    /// Precondition failures are returned. Network failures are not: they
    /// end the attempt through the error path and surface as an `error`
    /// event.
    pub fn send(&self, body: Option<Bytes>) -> Result<()> {
        let location = self.inner.page.location();

        // The send flag is claimed under the same lock that checks it, so
        // concurrent callers on cloned handles cannot both start a transport
        let (settings, attempt) = self.with_state(|s, _| {
            if s.ready_state != ReadyState::Opened {
                return Err(Error::invalid_state(
                    "Connection must be opened before send() is called",
                ));
            }
            if s.send_flag {
                return Err(Error::invalid_state("send() has already been called"));
            }
            let settings = s
                .settings
                .clone()
                .ok_or_else(|| Error::invalid_state("Request is not opened"))?;
            if !settings.is_async && !s.response_type.is_text() {
                return Err(Error::invalid_access(
                    "Synchronous requests must not set a response type",
                ));
            }
            s.send_flag = true;
            Ok((settings, s.attempt))
        })?;

        let result = self.start(settings, attempt, body, &location);
        if result.is_err() {
            self.with_state(|s, _| {
                if s.attempt == attempt {
                    s.send_flag = false;
                }
            });
        }
        result
    }

    /// Validate the target and hand the request to a transport. The caller
    /// holds the send flag for `attempt`.
    fn start(
        &self,
        settings: OpenSettings,
        attempt: u64,
        body: Option<Bytes>,
        location: &Url,
    ) -> Result<()> {
        let target = RequestUrl::resolve(&settings.url, location)?;

        if location.scheme() == "https" && !target.is_secure && !target.is_local {
            return Err(Error::security(format!(
                "Mixed Content: the page at '{}' was loaded over HTTPS, but requested an insecure endpoint '{}'",
                location, target.url
            )));
        }

        if target.is_local {
            if !self.inner.page.settings().enable_file_system_requests {
                return Err(Error::security(
                    "File system requests are disabled; enable them in the browser settings",
                ));
            }
            if settings.method != "GET" {
                return Err(Error::not_supported(
                    "Only the GET method is supported for local file system requests",
                ));
            }
            return if settings.is_async {
                self.send_local_async(attempt, target)
            } else {
                self.send_local_sync(attempt, target);
                Ok(())
            };
        }

        let body = match settings.method.as_str() {
            "GET" | "HEAD" => None,
            _ => body,
        };

        let mut request_headers = self.inner.state.lock().request_headers.clone();
        request_headers.insert(names::HOST.to_string(), target.host_header());
        if let Some(user) = &settings.user {
            let credentials = format!("{}:{}", user, settings.password.as_deref().unwrap_or(""));
            request_headers.insert(
                names::AUTHORIZATION.to_string(),
                format!("Basic {}", STANDARD.encode(credentials)),
            );
        }
        if settings.method == "POST" {
            request_headers
                .entry(names::CONTENT_TYPE.to_string())
                .or_insert_with(|| DEFAULT_POST_CONTENT_TYPE.to_string());
            request_headers.insert(
                names::CONTENT_LENGTH.to_string(),
                body.as_ref().map_or(0, |b| b.len()).to_string(),
            );
        }

        let mut headers = self.default_headers(location);
        headers.extend(request_headers.clone());

        let descriptor = RequestDescriptor::new(&target, settings.method.clone(), headers, body);

        self.with_state(|s, _| {
            s.request_headers = request_headers;
            s.error_flag = false;
        });

        debug!(
            method = %descriptor.method,
            url = %target.url,
            is_async = settings.is_async,
            "sending request"
        );

        if settings.is_async {
            self.send_async(attempt, descriptor, target)
        } else {
            self.send_sync(attempt, descriptor, target);
            Ok(())
        }
    }

    /// Abort the current attempt.
    ///
    /// An attempt in flight ends in `done` with an `abort` event; the state
    /// then returns to `unsent`.
    pub fn abort(&self) {
        let pending = self.with_state(|s, q| {
            s.attempt += 1;
            if let Some(handle) = s.transport.take() {
                handle.abort();
            }

            s.clear_response();
            s.request_headers.clear();
            s.aborted_flag = true;
            s.error_flag = true;

            if s.upload_pending {
                s.upload_pending = false;
                q.push((Target::Upload, XhrEvent::Abort));
                q.push((Target::Upload, XhrEvent::LoadEnd));
            }

            if s.ready_state != ReadyState::Unsent
                && (s.ready_state != ReadyState::Opened || s.send_flag)
                && s.ready_state != ReadyState::Done
            {
                s.send_flag = false;
                set_state(s, ReadyState::Done, q);
            }
            s.ready_state = ReadyState::Unsent;

            s.pending_task.take()
        });

        if let Some(id) = pending {
            self.inner.page.tasks().complete(id);
        }
    }

    // Internals

    fn with_state<R>(&self, f: impl FnOnce(&mut RequestState, &mut EventQueue) -> R) -> R {
        let mut queue = EventQueue::new();
        let result = {
            let mut state = self.inner.state.lock();
            f(&mut state, &mut queue)
        };
        self.dispatch(queue);
        result
    }

    fn dispatch(&self, queue: EventQueue) {
        for (target, event) in queue {
            match target {
                Target::Request => self.inner.events.dispatch(&event),
                Target::Upload => self.inner.upload.dispatch(&event),
            }
        }
    }

    fn default_headers(&self, location: &Url) -> BTreeMap<String, String> {
        let mut headers = BTreeMap::new();
        headers.insert(names::ACCEPT.to_string(), "*/*".to_string());
        headers.insert(names::REFERER.to_string(), location.to_string());
        headers.insert(
            names::USER_AGENT.to_string(),
            self.inner.page.settings().user_agent.clone(),
        );

        let cookie = self.cookie_bridge().read_cookie_header(location);
        if !cookie.is_empty() {
            headers.insert(names::COOKIE.to_string(), cookie);
        }
        headers
    }

    fn cookie_bridge(&self) -> CookieBridge {
        CookieBridge::new(self.inner.page.cookies())
    }

    /// Fire the events that precede any I/O
    fn begin_async(&self, attempt: u64, has_body: bool) -> Result<tokio::runtime::Handle> {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|_| Error::other("Asynchronous requests require a Tokio runtime"))?;

        self.with_state(|s, q| {
            if s.attempt != attempt {
                return;
            }
            q.push((Target::Request, XhrEvent::ReadyStateChange(s.ready_state)));
            q.push((Target::Request, XhrEvent::LoadStart));
            if has_body {
                s.upload_pending = true;
                q.push((Target::Upload, XhrEvent::LoadStart));
            }
        });
        Ok(runtime)
    }

    /// Register with the page and spawn `work` as the in-flight transport
    fn spawn_attempt<F>(&self, runtime: tokio::runtime::Handle, attempt: u64, work: F)
    where
        F: std::future::Future<Output = Result<()>> + Send + 'static,
    {
        let weak = Arc::downgrade(&self.inner);
        let request = self.clone();

        let mut state = self.inner.state.lock();
        if state.attempt != attempt {
            // A listener aborted before any I/O was started
            return;
        }

        let task_id = self.inner.page.tasks().register(Box::new(move || {
            if let Some(inner) = weak.upgrade() {
                XmlHttpRequest { inner }.abort();
            }
        }));
        state.pending_task = Some(task_id);

        let join = runtime.spawn(async move {
            if let Err(e) = work.await {
                request.on_error(attempt, &e);
            }
            request.finish_task(attempt);
        });
        state.transport = Some(join.abort_handle());
    }

    fn send_async(
        &self,
        attempt: u64,
        descriptor: RequestDescriptor,
        target: RequestUrl,
    ) -> Result<()> {
        let runtime = self.begin_async(attempt, descriptor.body.is_some())?;
        let request = self.clone();
        self.spawn_attempt(runtime, attempt, async move {
            request.run_async(attempt, descriptor, target).await
        });
        Ok(())
    }

    async fn run_async(
        &self,
        attempt: u64,
        mut descriptor: RequestDescriptor,
        mut target: RequestUrl,
    ) -> Result<()> {
        let page = &self.inner.page;
        let transport = page.http_transport();
        let bridge = self.cookie_bridge();
        let max_redirects = page.settings().max_redirects;
        let mut hops = 0;

        let response = loop {
            let response = transport.send(&descriptor).await?;
            if !self.is_current(attempt) {
                return Ok(());
            }

            if hops == 0 {
                self.complete_upload(descriptor.body.as_ref().map_or(0, |b| b.len() as u64));
            }

            bridge.ingest_response(&target.url, &response.headers);

            match redirect_location(response.status, &response.headers) {
                Some(location) => {
                    hops += 1;
                    let next = self.follow_redirect(location, hops, max_redirects)?;
                    descriptor = descriptor.redirect(&next, response.status);
                    target = next;
                }
                None => break response,
            }
        };

        let total = response.headers.content_length();
        let accepted = self.with_state(|s, q| {
            if s.attempt != attempt || !s.send_flag {
                return false;
            }
            s.status = Some(response.status);
            s.status_text = Some(response.status_text.clone());
            s.incoming_headers = response.headers.clone();
            set_state(s, ReadyState::HeadersReceived, q);
            true
        });
        if !accepted {
            return Ok(());
        }

        let mut buffer = BytesMut::new();
        let mut body = response.body;
        while let Some(chunk) = body.next().await {
            buffer.extend_from_slice(&chunk?);
            let loaded = buffer.len() as u64;

            let live = self.with_state(|s, q| {
                if s.attempt != attempt || !s.send_flag {
                    return false;
                }
                set_state(s, ReadyState::Loading, q);
                q.push((
                    Target::Request,
                    XhrEvent::Progress(ProgressEvent::new(loaded, total)),
                ));
                true
            });
            if !live {
                return Ok(());
            }
        }

        let parser = page.document_parser();
        let body = buffer.freeze();
        self.with_state(|s, q| {
            if s.attempt == attempt && s.send_flag {
                finish_response(s, parser.as_ref(), body, target.url, q);
            }
        });
        Ok(())
    }

    fn send_sync(&self, attempt: u64, descriptor: RequestDescriptor, target: RequestUrl) {
        if let Err(e) = self.run_sync(attempt, descriptor, target) {
            self.on_error(attempt, &e);
        }
    }

    fn run_sync(
        &self,
        attempt: u64,
        mut descriptor: RequestDescriptor,
        mut target: RequestUrl,
    ) -> Result<()> {
        let page = &self.inner.page;
        let transport = page.blocking_transport();
        let bridge = self.cookie_bridge();
        let max_redirects = page.settings().max_redirects;
        let mut hops = 0;

        let reply = loop {
            let reply = transport.fetch(&descriptor)?;
            bridge.ingest_response(&target.url, &reply.headers);

            match redirect_location(reply.status, &reply.headers) {
                Some(location) => {
                    hops += 1;
                    let next = self.follow_redirect(location, hops, max_redirects)?;
                    descriptor = descriptor.redirect(&next, reply.status);
                    target = next;
                }
                None => break reply,
            }
        };

        let parser = page.document_parser();
        self.with_state(|s, q| {
            if s.attempt != attempt {
                return;
            }
            s.status = Some(reply.status);
            s.status_text = Some(reply.status_text);
            s.incoming_headers = reply.headers;
            set_state(s, ReadyState::HeadersReceived, q);
            set_state(s, ReadyState::Loading, q);
            finish_response(s, parser.as_ref(), reply.body, target.url, q);
        });
        Ok(())
    }

    fn send_local_async(&self, attempt: u64, target: RequestUrl) -> Result<()> {
        let path = target.file_path();
        let runtime = self.begin_async(attempt, false)?;
        let files = self.inner.page.file_system();
        let request = self.clone();

        self.spawn_attempt(runtime, attempt, async move {
            let data = files.read(&path?).await?;
            request.complete_local(attempt, target, data, true);
            Ok(())
        });
        Ok(())
    }

    fn send_local_sync(&self, attempt: u64, target: RequestUrl) {
        let files = self.inner.page.file_system();
        match target.file_path().and_then(|path| files.read_sync(&path)) {
            Ok(data) => self.complete_local(attempt, target, data, false),
            Err(e) => self.on_error(attempt, &e),
        }
    }

    fn complete_local(&self, attempt: u64, target: RequestUrl, data: Bytes, progress: bool) {
        let parser = self.inner.page.document_parser();
        let length = data.len() as u64;

        self.with_state(|s, q| {
            if s.attempt != attempt {
                return;
            }

            let mut headers = IncomingHeaders::new();
            headers.insert(names::CONTENT_LENGTH, length.to_string());
            headers.insert(names::CONTENT_TYPE, target.mime_type());
            s.status = Some(200);
            s.status_text = Some("OK".to_string());
            s.incoming_headers = headers;

            set_state(s, ReadyState::HeadersReceived, q);
            set_state(s, ReadyState::Loading, q);
            if progress {
                q.push((
                    Target::Request,
                    XhrEvent::Progress(ProgressEvent::new(length, Some(length))),
                ));
            }
            finish_response(s, parser.as_ref(), data, target.url, q);
        });
    }

    fn follow_redirect(&self, location: &str, hops: usize, max: usize) -> Result<RequestUrl> {
        if hops > max {
            return Err(Error::network(format!(
                "Too many redirects (limit {})",
                max
            )));
        }
        let next = RequestUrl::resolve(location, &self.inner.page.location())?;
        debug!(hop = hops, location = %next.url, "following redirect");
        Ok(next)
    }

    fn complete_upload(&self, sent: u64) {
        self.with_state(|s, q| {
            if !s.upload_pending {
                return;
            }
            s.upload_pending = false;
            q.push((
                Target::Upload,
                XhrEvent::Progress(ProgressEvent::new(sent, Some(sent))),
            ));
            q.push((Target::Upload, XhrEvent::Load));
            q.push((Target::Upload, XhrEvent::LoadEnd));
        });
    }

    fn is_current(&self, attempt: u64) -> bool {
        let state = self.inner.state.lock();
        state.attempt == attempt && state.send_flag
    }

    /// Error path: status 0, error flag, forced `done`, then the page is told
    fn on_error(&self, attempt: u64, err: &Error) {
        let message = err.to_string();

        let raised = self.with_state(|s, q| {
            if s.attempt != attempt {
                return false;
            }
            s.status = Some(0);
            s.status_text = Some(message.clone());
            s.error_flag = true;
            s.send_flag = false;

            if s.upload_pending {
                s.upload_pending = false;
                q.push((
                    Target::Upload,
                    XhrEvent::Error(ErrorEvent {
                        message: message.clone(),
                    }),
                ));
                q.push((Target::Upload, XhrEvent::LoadEnd));
            }
            set_state(s, ReadyState::Done, q);
            true
        });

        if raised {
            error!(error = %message, "request failed");
            self.inner.page.dispatch_error(&ErrorEvent { message });
        }
    }

    fn finish_task(&self, attempt: u64) {
        let pending = {
            let mut state = self.inner.state.lock();
            if state.attempt != attempt {
                return;
            }
            state.transport = None;
            state.pending_task.take()
        };
        if let Some(id) = pending {
            self.inner.page.tasks().complete(id);
        }
    }
}

fn redirect_location(status: u16, headers: &IncomingHeaders) -> Option<&str> {
    if is_redirect_status(status) {
        headers.first(names::LOCATION)
    } else {
        None
    }
}

/// Move to `next`, firing lifecycle notifications.
///
/// Sync requests only report `opened` and `done`. Reaching `done` fires
/// exactly one terminal event followed by `loadend`.
fn set_state(state: &mut RequestState, next: ReadyState, queue: &mut EventQueue) {
    if state.ready_state == next
        || (state.ready_state == ReadyState::Unsent && state.aborted_flag)
    {
        return;
    }

    trace!(from = ?state.ready_state, to = ?next, "ready state");
    state.ready_state = next;

    if state.is_async() || next <= ReadyState::Opened || next == ReadyState::Done {
        queue.push((Target::Request, XhrEvent::ReadyStateChange(next)));
    }

    if next == ReadyState::Done {
        let terminal = if state.aborted_flag {
            XhrEvent::Abort
        } else if state.error_flag {
            XhrEvent::Error(ErrorEvent {
                message: state.status_text.clone().unwrap_or_default(),
            })
        } else {
            XhrEvent::Load
        };
        queue.push((Target::Request, terminal));
        queue.push((Target::Request, XhrEvent::LoadEnd));
    }
}

fn finish_response(
    state: &mut RequestState,
    parser: &dyn DocumentParser,
    body: Bytes,
    url: Url,
    queue: &mut EventQueue,
) {
    state.send_flag = false;

    let decoded = ResponseDecoder::new(parser).decode(
        body,
        state.response_type,
        state.incoming_headers.first(names::CONTENT_TYPE),
        state
            .request_headers
            .get(names::CONTENT_TYPE)
            .map(String::as_str),
    );
    state.response = decoded.response;
    state.response_text = decoded.response_text;
    state.response_xml = decoded.response_xml;
    state.response_url = Some(url);

    set_state(state, ReadyState::Done, queue);
}
