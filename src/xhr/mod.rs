// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! XMLHttpRequest engine
//!
//! [`XmlHttpRequest`] is the request state machine. The decoder, cookie
//! bridge and event types are exposed for hosts that drive them directly.

mod cookie_bridge;
mod decoder;
mod events;
mod request;
mod state;

pub use cookie_bridge::CookieBridge;
pub use decoder::{charset_from_content_type, decode_text, DecodedResponse, ResponseDecoder};
pub use events::{ErrorEvent, EventCallback, EventTarget, ProgressEvent, XhrEvent};
pub use request::XmlHttpRequest;
pub use state::{ReadyState, ResponseType, XhrResponse};
