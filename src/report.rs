// CSV report writer for unauthcheck
// Row-at-a-time appends with versioned, hostname-derived output naming

use crate::error::Result;
use crate::models::ProbeRecord;
use regex::Regex;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Writes one row per probe, flushing after each so an interrupted run keeps
/// everything recorded so far.
pub struct ReportWriter {
    writer: csv::Writer<File>,
    path: PathBuf,
}

impl ReportWriter {
    /// Create the output file. The header row is written with the first
    /// record (csv serializes struct field names in declaration order).
    pub fn create(path: &Path) -> Result<Self> {
        let writer = csv::Writer::from_path(path)?;
        Ok(Self {
            writer,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&mut self, record: &ProbeRecord) -> Result<()> {
        self.writer.serialize(record)?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Derive a filesystem-safe slug from the base URL's hostname:
/// lowercase, port stripped, runs of non-alphanumerics collapsed to "-".
pub fn hostname_slug(base_url: &str) -> String {
    let host = url::Url::parse(base_url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_string()))
        .unwrap_or_else(|| "unknown-host".to_string());

    let mut slug = String::new();
    let mut last_dash = false;
    for c in host.to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c);
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }
    let slug = slug.trim_matches('-').to_string();
    if slug.is_empty() {
        "unknown-host".to_string()
    } else {
        slug
    }
}

/// Pick a non-colliding output path. If the requested file does not exist it
/// is used as-is; otherwise the directory is scanned for `stem<N>.ext`
/// siblings and the next version number is appended (report.csv ->
/// report1.csv -> report2.csv). Existing files are never overwritten and
/// earlier runs are never merged into.
pub fn versioned_path(requested: &Path) -> PathBuf {
    if !requested.exists() {
        return requested.to_path_buf();
    }

    let stem = requested
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let ext = requested
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    let dir = match requested.parent() {
        Some(p) if p.as_os_str().is_empty() => PathBuf::from("."),
        Some(p) => p.to_path_buf(),
        None => PathBuf::from("."),
    };

    // Unwrap is safe: the pattern is built from escaped literals
    let pattern = Regex::new(&format!(
        "^{}(\\d+)?{}$",
        regex::escape(&stem),
        regex::escape(&ext)
    ))
    .unwrap();

    let mut max_version: u64 = 0;
    if let Ok(entries) = std::fs::read_dir(&dir) {
        for entry in entries.flatten() {
            let name = entry.file_name().to_string_lossy().to_string();
            if let Some(caps) = pattern.captures(&name) {
                let version = caps
                    .get(1)
                    .and_then(|m| m.as_str().parse::<u64>().ok())
                    .unwrap_or(0);
                max_version = max_version.max(version);
            }
        }
    }

    dir.join(format!("{}{}{}", stem, max_version + 1, ext))
}
