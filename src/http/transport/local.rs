// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Local filesystem access for `file:` requests

use std::path::Path;

use async_trait::async_trait;
use bytes::Bytes;

use super::FileSystem;
use crate::error::{Error, Result};

/// [`FileSystem`] backed by the process filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSystem;

impl LocalFileSystem {
    pub fn new() -> Self {
        Self
    }
}

fn read_error(path: &Path, err: std::io::Error) -> Error {
    Error::network(format!("Failed to read {}: {}", path.display(), err))
}

#[async_trait]
impl FileSystem for LocalFileSystem {
    async fn read(&self, path: &Path) -> Result<Bytes> {
        tokio::fs::read(path)
            .await
            .map(Bytes::from)
            .map_err(|e| read_error(path, e))
    }

    fn read_sync(&self, path: &Path) -> Result<Bytes> {
        std::fs::read(path)
            .map(Bytes::from)
            .map_err(|e| read_error(path, e))
    }
}
