//! File acquisition: holds the one resume chosen for upload.
//!
//! Drop sources, drag events and `clear` model an interactive picker. The
//! command-line front end only ever makes a single picker selection.

use std::path::Path;

use bytes::Bytes;
use tracing::{debug, info, warn};

use crate::errors::ClientError;

/// Formats the upload picker advertises. Others are still accepted; the
/// parse service has the final say.
pub const SUPPORTED_EXTENSIONS: [&str; 4] = ["pdf", "docx", "doc", "rtf"];

/// The resume chosen for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    name: String,
    size_bytes: u64,
    content: Bytes,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, content: impl Into<Bytes>) -> Self {
        let content = content.into();
        Self {
            name: name.into(),
            size_bytes: content.len() as u64,
            content,
        }
    }

    pub async fn from_path(path: &Path) -> Result<Self, ClientError> {
        let content = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "resume".to_string());
        Ok(Self::new(name, content))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    pub fn content(&self) -> &Bytes {
        &self.content
    }

    pub fn extension(&self) -> Option<String> {
        Path::new(&self.name)
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
    }

    pub fn is_supported_format(&self) -> bool {
        self.extension()
            .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
    }

    /// Size in megabytes with two decimals, e.g. `"2.00 MB"`.
    pub fn display_size(&self) -> String {
        format!("{:.2} MB", self.size_bytes as f64 / 1024.0 / 1024.0)
    }
}

/// Where a selection came from. Both carry the event's file list, which may be empty.
#[derive(Debug, Clone)]
pub enum FileSource {
    #[allow(dead_code)]
    Drop(Vec<SelectedFile>),
    Picker(Vec<SelectedFile>),
}

#[allow(dead_code)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragEvent {
    Enter,
    Over,
    Leave,
    Drop,
}

/// Holds at most one selected file plus the presentational drag flag.
#[derive(Debug, Default)]
pub struct FileAcquisition {
    selected: Option<SelectedFile>,
    drag_active: bool,
}

impl FileAcquisition {
    /// Takes the first file of the event, replacing any earlier selection.
    /// Events without files are ignored. Returns whether a file was taken.
    pub fn select_file(&mut self, source: FileSource) -> bool {
        let files = match source {
            FileSource::Drop(files) => {
                self.drag_active = false;
                files
            }
            FileSource::Picker(files) => files,
        };

        let Some(file) = files.into_iter().next() else {
            debug!("Selection event carried no file; ignored");
            return false;
        };

        if !file.is_supported_format() {
            warn!(
                file = file.name(),
                "File type is not one of {:?}; the server may reject it", SUPPORTED_EXTENSIONS
            );
        }
        info!(file = file.name(), size_bytes = file.size_bytes(), "Resume selected");
        self.selected = Some(file);
        true
    }

    #[allow(dead_code)]
    pub fn on_drag(&mut self, event: DragEvent) {
        self.drag_active = matches!(event, DragEvent::Enter | DragEvent::Over);
    }

    #[allow(dead_code)]
    pub fn clear(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<&SelectedFile> {
        self.selected.as_ref()
    }

    pub fn has_file(&self) -> bool {
        self.selected.is_some()
    }

    #[allow(dead_code)]
    pub fn is_drag_active(&self) -> bool {
        self.drag_active
    }
}
