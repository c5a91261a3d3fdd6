// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Page, settings and task bookkeeping

mod config;
mod page;
mod tasks;

pub use config::BrowserSettings;
pub use page::{Page, PageBuilder, PageErrorCallback};
pub use tasks::{AsyncTaskManager, AsyncTaskRegistry, CancelCallback, TaskId};
