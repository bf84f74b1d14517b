//! Inspection session state.
//!
//! A session owns the uploaded batch, the image the overlay is drawn for and
//! the report of the last analysis. Starting a new batch replaces all three.

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::report::DefectReport;

pub const DEFAULT_MAX_FILES: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Image,
    Video,
    Pdf,
    Other,
}

impl FileKind {
    pub fn from_mime(mime: &str) -> Self {
        let mime = mime.trim().to_ascii_lowercase();
        if mime.starts_with("image/") {
            FileKind::Image
        } else if mime.starts_with("video/") {
            FileKind::Video
        } else if mime == "application/pdf" {
            FileKind::Pdf
        } else {
            FileKind::Other
        }
    }

    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "png" | "jpg" | "jpeg" | "gif" | "bmp" | "webp" | "tif" | "tiff" => FileKind::Image,
            "mp4" | "mov" | "avi" | "mkv" | "webm" => FileKind::Video,
            "pdf" => FileKind::Pdf,
            _ => FileKind::Other,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UploadedFile {
    pub name: String,
    pub size_bytes: u64,
    pub kind: FileKind,
    /// Local path when the file came from disk.
    #[serde(skip)]
    pub path: Option<PathBuf>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, size_bytes: u64, mime: &str) -> Self {
        Self {
            name: name.into(),
            size_bytes,
            kind: FileKind::from_mime(mime),
            path: None,
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let meta = std::fs::metadata(path)
            .with_context(|| format!("reading metadata of {}", path.display()))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self {
            name,
            size_bytes: meta.len(),
            kind: FileKind::from_path(path),
            path: Some(path.to_path_buf()),
        })
    }

    pub fn display_size(&self) -> String {
        format_file_size(self.size_bytes)
    }
}

/// Result of offering files to a session.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IntakeOutcome {
    pub accepted: Vec<UploadedFile>,
    /// Files refused because the session was full.
    pub rejected: Vec<UploadedFile>,
}

#[derive(Debug)]
pub struct Session {
    max_files: usize,
    files: Vec<UploadedFile>,
    current_image: Option<UploadedFile>,
    report: Option<DefectReport>,
}

impl Session {
    pub fn new(max_files: usize) -> Self {
        Self {
            max_files,
            files: Vec::new(),
            current_image: None,
            report: None,
        }
    }

    pub fn max_files(&self) -> usize {
        self.max_files
    }

    /// Accept files until the cap; the rest come back in `rejected`.
    pub fn add_files<I>(&mut self, files: I) -> IntakeOutcome
    where
        I: IntoIterator<Item = UploadedFile>,
    {
        let mut outcome = IntakeOutcome::default();
        for file in files {
            if self.files.len() >= self.max_files {
                outcome.rejected.push(file);
                continue;
            }
            if file.kind == FileKind::Image {
                self.current_image = Some(file.clone());
            }
            self.files.push(file.clone());
            outcome.accepted.push(file);
        }
        if !outcome.rejected.is_empty() {
            log::warn!(
                "session holds at most {} files; rejected {}",
                self.max_files,
                outcome
                    .rejected
                    .iter()
                    .map(|f| f.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }
        outcome
    }

    pub fn files(&self) -> &[UploadedFile] {
        &self.files
    }

    /// Most recently accepted image, the one the overlay is drawn for.
    pub fn current_image(&self) -> Option<&UploadedFile> {
        self.current_image.as_ref()
    }

    pub fn can_analyze(&self) -> bool {
        !self.files.is_empty()
    }

    pub fn report(&self) -> Option<&DefectReport> {
        self.report.as_ref()
    }

    /// Replace the session's report with the result of a new analysis.
    pub fn install_report(&mut self, report: DefectReport) {
        if self.report.is_some() {
            log::info!("replacing previous report");
        }
        self.report = Some(report);
    }

    /// Drop the current batch and its report.
    pub fn start_new_batch(&mut self) {
        self.files.clear();
        self.current_image = None;
        self.report = None;
        log::info!("started new upload batch");
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FILES)
    }
}

const SIZE_UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// 1024-based size with at most two decimals ("1.5 KB", "0 Bytes").
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let mut unit = 0;
    let mut value = bytes as f64;
    while value >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    let fixed = format!("{:.2}", value);
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, SIZE_UNITS[unit])
}
