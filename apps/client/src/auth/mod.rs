#![allow(dead_code)]

//! Session token access.
//!
//! The workflow only ever reads the current bearer token. Storage lives behind
//! [`AuthSession`] so controllers can be driven by an injected fake.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::errors::ClientError;

pub trait AuthSession: Send + Sync {
    /// Current bearer token, or `None` when unauthenticated.
    fn current_token(&self) -> Option<String>;
}

/// Fixed token, used for `--token` overrides and in tests.
#[derive(Debug, Clone, Default)]
pub struct StaticSession {
    token: Option<String>,
}

impl StaticSession {
    pub fn new(token: Option<String>) -> Self {
        Self { token }
    }

    pub fn anonymous() -> Self {
        Self { token: None }
    }
}

impl AuthSession for StaticSession {
    fn current_token(&self) -> Option<String> {
        self.token.clone()
    }
}

/// Token persisted in a single file on disk.
///
/// `load` reads the file once; `login` and `logout` update both the file and
/// the in-memory copy.
#[derive(Debug)]
pub struct FileSession {
    path: PathBuf,
    token: Option<String>,
}

impl FileSession {
    pub fn load(path: &Path) -> Result<Self, ClientError> {
        let token = match fs::read_to_string(path) {
            Ok(contents) => normalize_token(&contents),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => return Err(e.into()),
        };
        debug!(path = %path.display(), authenticated = token.is_some(), "Session loaded");
        Ok(Self {
            path: path.to_path_buf(),
            token,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn login(&mut self, token: &str) -> Result<(), ClientError> {
        let token =
            normalize_token(token).ok_or(ClientError::InvalidToken("token must not be empty"))?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, &token)?;
        info!(path = %self.path.display(), "Session token stored");
        self.token = Some(token);
        Ok(())
    }

    pub fn logout(&mut self) -> Result<(), ClientError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        info!(path = %self.path.display(), "Session token cleared");
        self.token = None;
        Ok(())
    }
}

impl AuthSession for FileSession {
    fn current_token(&self) -> Option<String> {
        self.token.clone()
    }
}

fn normalize_token(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
