// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! End-to-end requests against a local HTTP server

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use kalamari_xhr::{
    BrowserSettings, CookieStore, ErrorEvent, Page, ReadyState, ResponseType, XhrEvent,
    XhrResponse, XmlHttpRequest,
};
use parking_lot::Mutex;
use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use url::Url;
use wiremock::matchers::{body_string, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn settings() -> BrowserSettings {
    BrowserSettings::default()
        .timeout(Duration::from_secs(10))
        .sync_worker_program(env!("CARGO_BIN_EXE_kalamari-xhr"))
}

fn page_for(server: &MockServer) -> Page {
    let location = Url::parse(&format!("{}/index.html", server.uri())).unwrap();
    Page::new(location, settings()).unwrap()
}

/// Run a synchronous send off the async executor
async fn send_sync(xhr: &XmlHttpRequest, body: Option<Bytes>) {
    let xhr = xhr.clone();
    tokio::task::spawn_blocking(move || xhr.send(body))
        .await
        .unwrap()
        .unwrap();
}

/// Answer every connection with the same raw HTTP/1.1 response
async fn raw_server(response: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut buf = vec![0u8; 8192];
                let _ = socket.read(&mut buf).await;
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });
    format!("http://{}", addr)
}

#[tokio::test(flavor = "multi_thread")]
async fn test_async_text_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/hello"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/plain; charset=utf-8")
                .insert_header("x-trace", "abc")
                .set_body_string("hello world"),
        )
        .mount(&server)
        .await;

    let page = page_for(&server);
    let xhr = page.new_request();
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();
    xhr.add_listener(Arc::new(move |e: &XhrEvent| sink.lock().push(e.event_type())));

    xhr.open("GET", "/hello").unwrap();
    xhr.send(None).unwrap();
    page.when_complete().await;

    assert_eq!(xhr.ready_state(), ReadyState::Done);
    assert_eq!(xhr.status(), Some(200));
    assert_eq!(xhr.status_text().as_deref(), Some("OK"));
    assert_eq!(xhr.response_text().unwrap().as_deref(), Some("hello world"));
    assert_eq!(xhr.get_response_header("X-Trace").as_deref(), Some("abc"));
    assert!(xhr.get_all_response_headers().contains("x-trace: abc"));

    let fired = events.lock().clone();
    assert_eq!(fired.first(), Some(&"readystatechange"));
    assert!(fired.contains(&"progress"));
    assert_eq!(&fired[fired.len() - 2..], &["load", "loadend"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_sync_and_async_are_equivalent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/echo"))
        .and(body_string("ping"))
        .respond_with(
            ResponseTemplate::new(202)
                .insert_header("content-type", "text/plain")
                .set_body_string("pong"),
        )
        .mount(&server)
        .await;

    let page = page_for(&server);

    let sync = page.new_request();
    sync.open_with("POST", "/echo", false, None, None).unwrap();
    send_sync(&sync, Some(Bytes::from_static(b"ping"))).await;

    let asynchronous = page.new_request();
    asynchronous.open("POST", "/echo").unwrap();
    asynchronous.send(Some(Bytes::from_static(b"ping"))).unwrap();
    page.when_complete().await;

    assert_eq!(sync.status(), Some(202));
    assert_eq!(sync.status(), asynchronous.status());
    assert_eq!(sync.status_text(), asynchronous.status_text());
    assert_eq!(sync.response(), asynchronous.response());
    assert_eq!(sync.response(), Some(XhrResponse::Text("pong".to_string())));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_redirect_chain_and_303() {
    let server = MockServer::start().await;
    Mock::given(path("/start"))
        .respond_with(ResponseTemplate::new(307).insert_header("location", "/middle"))
        .mount(&server)
        .await;
    Mock::given(path("/middle"))
        .respond_with(
            ResponseTemplate::new(303)
                .insert_header("location", "/final")
                .set_body_string("intermediate"),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/final"))
        .respond_with(ResponseTemplate::new(200).set_body_string("final"))
        .mount(&server)
        .await;

    let page = page_for(&server);
    let xhr = page.new_request();
    xhr.open("POST", "/start").unwrap();
    xhr.send(Some(Bytes::from_static(b"form=1"))).unwrap();
    page.when_complete().await;

    assert_eq!(xhr.status(), Some(200));
    assert_eq!(xhr.response_text().unwrap().as_deref(), Some("final"));
    assert_eq!(xhr.response_url().unwrap().path(), "/final");

    let methods: Vec<String> = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|r| r.method.to_string())
        .collect();
    assert_eq!(methods, vec!["POST", "POST", "GET"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_sync_redirect() {
    let server = MockServer::start().await;
    Mock::given(path("/old"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", "/new"))
        .mount(&server)
        .await;
    Mock::given(path("/new"))
        .respond_with(ResponseTemplate::new(200).set_body_string("moved"))
        .mount(&server)
        .await;

    let page = page_for(&server);
    let xhr = page.new_request();
    xhr.open_with("GET", "/old", false, None, None).unwrap();
    send_sync(&xhr, None).await;

    assert_eq!(xhr.status(), Some(200));
    assert_eq!(xhr.response_text().unwrap().as_deref(), Some("moved"));
    assert_eq!(xhr.response_url().unwrap().path(), "/new");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_cookies_flow_between_requests() {
    let server = MockServer::start().await;
    Mock::given(path("/login"))
        .respond_with(
            ResponseTemplate::new(200).insert_header("set-cookie", "session=abc; Path=/; HttpOnly"),
        )
        .mount(&server)
        .await;
    Mock::given(path("/me"))
        .and(header("cookie", "session=abc"))
        .respond_with(ResponseTemplate::new(200).set_body_string("authenticated"))
        .mount(&server)
        .await;

    let page = page_for(&server);

    let login = page.new_request();
    login.open("GET", "/login").unwrap();
    login.send(None).unwrap();
    page.when_complete().await;
    assert!(login.get_response_header("set-cookie").is_none());
    assert!(page.cookies().cookie_string(&page.location()).contains("session=abc"));

    let me = page.new_request();
    me.open("GET", "/me").unwrap();
    me.send(None).unwrap();
    page.when_complete().await;
    assert_eq!(me.response_text().unwrap().as_deref(), Some("authenticated"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_json_and_blob_response_types() {
    let server = MockServer::start().await;
    Mock::given(path("/json"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "application/json")
                .set_body_string(r#"{"a":1}"#),
        )
        .mount(&server)
        .await;
    Mock::given(path("/image"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "image/png")
                .set_body_bytes(vec![0x89, b'P', b'N', b'G']),
        )
        .mount(&server)
        .await;

    let page = page_for(&server);

    let json_request = page.new_request();
    json_request.open("GET", "/json").unwrap();
    json_request.set_response_type(ResponseType::Json).unwrap();
    json_request.send(None).unwrap();

    let blob_request = page.new_request();
    blob_request.open("GET", "/image").unwrap();
    blob_request.set_response_type(ResponseType::Blob).unwrap();
    blob_request.send(None).unwrap();

    page.when_complete().await;

    assert_eq!(json_request.response(), Some(XhrResponse::Json(json!({"a": 1}))));
    assert!(json_request.response_text().is_err());

    let response = blob_request.response().unwrap();
    let blob = response.as_blob().unwrap();
    assert_eq!(blob.size(), 4);
    assert_eq!(blob.content_type(), "image/png");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_connection_failure_raises_error_event() {
    // Nothing listens on port 9 of the loopback interface
    let location = Url::parse("http://127.0.0.1:9/index.html").unwrap();
    let page = Page::new(location, settings()).unwrap();
    let page_errors = Arc::new(Mutex::new(Vec::new()));
    let sink = page_errors.clone();
    page.on_error(Arc::new(move |e: &ErrorEvent| sink.lock().push(e.message.clone())));

    let asynchronous = page.new_request();
    asynchronous.open("GET", "/").unwrap();
    asynchronous.send(None).unwrap();
    page.when_complete().await;

    let sync = page.new_request();
    sync.open_with("GET", "/", false, None, None).unwrap();
    send_sync(&sync, None).await;

    for xhr in [&asynchronous, &sync] {
        assert_eq!(xhr.status(), Some(0));
        assert_eq!(xhr.ready_state(), ReadyState::Done);
        assert!(!xhr.status_text().unwrap().is_empty());
    }
    assert_eq!(page_errors.lock().len(), 2);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_status_text_uses_server_reason_phrase() {
    let base = raw_server(
        "HTTP/1.1 200 Everything Fine\r\ncontent-type: text/plain\r\ncontent-length: 2\r\nconnection: close\r\n\r\nok",
    )
    .await;
    let page = Page::new(Url::parse(&format!("{}/index.html", base)).unwrap(), settings()).unwrap();

    let async_xhr = page.new_request();
    async_xhr.open("GET", "/status").unwrap();
    async_xhr.send(None).unwrap();
    page.when_complete().await;

    let sync_xhr = page.new_request();
    sync_xhr.open_with("GET", "/status", false, None, None).unwrap();
    send_sync(&sync_xhr, None).await;

    for xhr in [&async_xhr, &sync_xhr] {
        assert_eq!(xhr.status(), Some(200));
        assert_eq!(xhr.status_text().as_deref(), Some("Everything Fine"));
        assert_eq!(xhr.response_text().unwrap().as_deref(), Some("ok"));
    }
}
