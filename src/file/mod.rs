// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Binary payloads

mod blob;

pub use blob::{Blob, BlobPart};
