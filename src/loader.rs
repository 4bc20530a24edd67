use crate::errors::CollyError;
use crate::utils::display_path;
use encoding_rs::{Encoding, UTF_8};
use std::fmt;
use std::path::{Path, PathBuf};
use tokio::fs as async_fs;
use tracing::{debug, trace};

/// Number of leading bytes inspected for NUL bytes.
const BINARY_SNIFF_LEN: usize = 8192;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transformation {
    Minified,
    Truncated { length: usize, from_override: bool },
}

/// A loaded file moving through the pipeline.
#[derive(Debug, Clone)]
pub struct FileEntry {
    pub path: PathBuf,
    /// Path below the root the user named; override rules match against it.
    pub relative_path: PathBuf,
    pub display_path: String,
    pub byte_len: usize,
    pub encoding: &'static Encoding,
    pub text: String,
    pub transformations: Vec<Transformation>,
}

impl FileEntry {
    pub fn new(path: PathBuf, text: String) -> Self {
        FileEntry {
            display_path: display_path(&path),
            byte_len: text.len(),
            relative_path: path.clone(),
            path,
            encoding: UTF_8,
            text,
            transformations: Vec::new(),
        }
    }

    pub fn with_relative_path(mut self, relative_path: PathBuf) -> Self {
        self.relative_path = relative_path;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    Read(String),
    Binary,
    Undecodable(&'static str),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Read(e) => write!(f, "read failed: {}", e),
            SkipReason::Binary => write!(f, "binary content"),
            SkipReason::Undecodable(encoding) => write!(f, "could not decode as {}", encoding),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: SkipReason,
}

impl From<SkippedFile> for CollyError {
    fn from(skip: SkippedFile) -> Self {
        CollyError::FileSkipError {
            path: skip.path,
            reason: skip.reason.to_string(),
        }
    }
}

pub struct ContentLoader {
    fallback: &'static Encoding,
}

impl ContentLoader {
    pub fn new(fallback: &'static Encoding) -> Self {
        ContentLoader { fallback }
    }

    /// Reads and decodes one file. Failures are returned as a skip.
    pub async fn load(&self, path: &Path) -> Result<FileEntry, SkippedFile> {
        debug!("Reading {}", path.display());
        let result = match async_fs::read(path).await {
            Ok(bytes) => self.decode(path, &bytes),
            Err(e) => Err(SkippedFile {
                path: path.to_path_buf(),
                reason: SkipReason::Read(e.to_string()),
            }),
        };

        if let Err(skip) = &result {
            debug!("Could not load {}: {}", skip.path.display(), skip.reason);
        }
        result
    }

    pub fn decode(&self, path: &Path, bytes: &[u8]) -> Result<FileEntry, SkippedFile> {
        let skip = |reason| SkippedFile {
            path: path.to_path_buf(),
            reason,
        };

        let bom = Encoding::for_bom(bytes).map(|(encoding, _)| encoding);
        if bom.is_none() && bytes[..bytes.len().min(BINARY_SNIFF_LEN)].contains(&0) {
            return Err(skip(SkipReason::Binary));
        }

        let detected = bom.unwrap_or_else(|| detect_encoding(bytes, self.fallback));
        trace!("Detected {} for {}", detected.name(), path.display());

        let (text, encoding) = match decode_strict(detected, bytes) {
            Some(text) => (text, detected),
            None if detected != self.fallback => {
                debug!(
                    "Decoding {} as {} failed, retrying with {}",
                    path.display(),
                    detected.name(),
                    self.fallback.name()
                );
                let text = decode_strict(self.fallback, bytes)
                    .ok_or_else(|| skip(SkipReason::Undecodable(self.fallback.name())))?;
                (text, self.fallback)
            }
            None => return Err(skip(SkipReason::Undecodable(detected.name()))),
        };

        Ok(FileEntry {
            path: path.to_path_buf(),
            relative_path: path.to_path_buf(),
            display_path: display_path(path),
            byte_len: bytes.len(),
            encoding,
            text,
            transformations: Vec::new(),
        })
    }
}

/// Best-effort detection without a BOM: UTF-8 when valid, else the fallback.
pub fn detect_encoding(bytes: &[u8], fallback: &'static Encoding) -> &'static Encoding {
    if std::str::from_utf8(bytes).is_ok() {
        UTF_8
    } else {
        fallback
    }
}

fn decode_strict(encoding: &'static Encoding, bytes: &[u8]) -> Option<String> {
    let (text, had_errors) = encoding.decode_with_bom_removal(bytes);
    if had_errors {
        None
    } else {
        Some(text.into_owned())
    }
}
