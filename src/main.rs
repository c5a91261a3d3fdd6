// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Kalamari XHR CLI
//!
//! `fetch` issues one request through the engine. `sync-worker` is the
//! child-process side of synchronous requests and is not meant to be run by
//! hand.

use std::env;
use std::process::ExitCode;

use anyhow::{anyhow, bail, Context};
use bytes::Bytes;
use kalamari_xhr::http::transport::{run_sync_worker, SYNC_WORKER_COMMAND};
use kalamari_xhr::{BrowserSettings, Page, ResponseType, XhrEvent, XhrResponse};
use url::Url;

#[tokio::main]
async fn main() -> ExitCode {
    // Logs go to stderr; the sync worker owns stdout
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("kalamari_xhr=info".parse().unwrap()),
        )
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage();
        return ExitCode::from(1);
    }

    match args[1].as_str() {
        "fetch" => {
            if args.len() < 3 {
                eprintln!("Usage: kalamari-xhr fetch <url> [OPTIONS]");
                return ExitCode::from(1);
            }
            let outcome = match FetchOptions::parse(&args[2], &args[3..]) {
                Ok(options) => fetch_url(options).await,
                Err(e) => Err(e),
            };
            match outcome {
                Ok(true) => ExitCode::SUCCESS,
                Ok(false) => ExitCode::from(1),
                Err(e) => {
                    eprintln!("Error: {:#}", e);
                    ExitCode::from(1)
                }
            }
        }
        cmd if cmd == SYNC_WORKER_COMMAND => match run_sync_worker().await {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("sync worker failed: {}", e);
                ExitCode::from(1)
            }
        },
        "--help" | "-h" | "help" => {
            print_usage();
            ExitCode::SUCCESS
        }
        "--version" | "-v" | "version" => {
            println!("kalamari-xhr {}", env!("CARGO_PKG_VERSION"));
            ExitCode::SUCCESS
        }
        cmd => {
            eprintln!("Unknown command: {}", cmd);
            print_usage();
            ExitCode::from(1)
        }
    }
}

fn print_usage() {
    println!(
        r#"Kalamari XHR - XMLHttpRequest engine for headless browsers

USAGE:
    kalamari-xhr <COMMAND> [OPTIONS]

COMMANDS:
    fetch <url>     Send one request and print the response
    help            Show this help message
    version         Show version information

FETCH OPTIONS:
    --method <M>    Request method (default GET)
    --data <D>      Request body
    --type <T>      Response type: text, arraybuffer, blob, document, json
    --sync          Send synchronously through a worker process
    --allow-file    Allow file: URLs

EXAMPLES:
    kalamari-xhr fetch https://example.com/api --type json
    kalamari-xhr fetch https://example.com/form --method POST --data "a=1" --sync
    kalamari-xhr fetch file:///tmp/data.json --allow-file
"#
    );
}

struct FetchOptions {
    url: Url,
    method: String,
    data: Option<String>,
    response_type: ResponseType,
    sync: bool,
    allow_file: bool,
}

impl FetchOptions {
    fn parse(url: &str, rest: &[String]) -> anyhow::Result<Self> {
        let url = Url::parse(url).with_context(|| format!("Invalid URL '{}'", url))?;
        let mut options = Self {
            url,
            method: "GET".to_string(),
            data: None,
            response_type: ResponseType::Default,
            sync: false,
            allow_file: false,
        };

        let mut iter = rest.iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--method" => {
                    options.method = iter.next().ok_or_else(|| anyhow!("--method needs a value"))?.clone();
                }
                "--data" => {
                    options.data = Some(iter.next().ok_or_else(|| anyhow!("--data needs a value"))?.clone());
                }
                "--type" => {
                    let value = iter.next().ok_or_else(|| anyhow!("--type needs a value"))?;
                    options.response_type = value.parse()?;
                }
                "--sync" => options.sync = true,
                "--allow-file" => options.allow_file = true,
                other => bail!("Unknown option: {}", other),
            }
        }
        Ok(options)
    }
}

/// Returns `false` when the request ended in a network error
async fn fetch_url(options: FetchOptions) -> anyhow::Result<bool> {
    let settings = BrowserSettings::new().enable_file_system_requests(options.allow_file);
    let page = Page::new(options.url.clone(), settings).context("Failed to create page")?;

    let xhr = page.new_request();
    xhr.add_event_listener(
        "progress",
        std::sync::Arc::new(|event: &XhrEvent| {
            if let XhrEvent::Progress(p) = event {
                tracing::debug!(loaded = p.loaded, total = p.total, "progress");
            }
        }),
    );

    let body = options.data.map(Bytes::from);
    xhr.open_with(&options.method, options.url.as_str(), !options.sync, None, None)?;
    if options.response_type != ResponseType::Default {
        xhr.set_response_type(options.response_type)?;
    }
    xhr.send(body).context("Request failed")?;

    page.when_complete().await;

    println!("\n=== Response ===");
    println!("Status: {:?} {}", xhr.status(), xhr.status_text().unwrap_or_default());
    if let Some(url) = xhr.response_url() {
        println!("URL: {}", url);
    }
    let headers = xhr.get_all_response_headers();
    if !headers.is_empty() {
        println!("\n=== Headers ===");
        println!("{}", headers.replace("\r\n", "\n"));
    }

    println!("\n=== Body ===");
    match xhr.response() {
        Some(XhrResponse::Text(text)) => println!("{}", text),
        Some(XhrResponse::Json(value)) => {
            println!("{}", serde_json::to_string_pretty(&value).unwrap_or_default())
        }
        Some(XhrResponse::ArrayBuffer(bytes)) => println!("<{} bytes>", bytes.len()),
        Some(XhrResponse::Blob(blob)) => {
            println!("<blob {} bytes, type '{}'>", blob.size(), blob.content_type())
        }
        Some(XhrResponse::Document(doc)) => {
            let root = doc.document_element().map(|e| e.name.clone()).unwrap_or_default();
            println!("<document root '{}'>", root);
        }
        None => println!("<no response>"),
    }

    Ok(xhr.status() != Some(0))
}
