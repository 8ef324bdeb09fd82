//! Read access to a data export ZIP archive.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use cs_core::StreamKind;
use zip::ZipArchive;

/// An opened data export archive.
pub struct Archive {
    zip: ZipArchive<File>,
}

impl std::fmt::Debug for Archive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Archive")
            .field("members", &self.zip.len())
            .finish()
    }
}

impl Archive {
    /// Opens the archive at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("failed to open archive {}", path.display()))?;
        let zip = ZipArchive::new(file)
            .with_context(|| format!("{} is not a readable ZIP archive", path.display()))?;
        Ok(Self { zip })
    }

    /// File member names in archive order. Directory entries are skipped.
    pub fn member_names(&mut self) -> Result<Vec<String>> {
        let mut names = Vec::with_capacity(self.zip.len());
        for idx in 0..self.zip.len() {
            let entry = self
                .zip
                .by_index(idx)
                .with_context(|| format!("failed to read archive entry {idx}"))?;
            if !entry.is_dir() {
                names.push(entry.name().to_string());
            }
        }
        Ok(names)
    }

    /// Reads a member as text, replacing invalid UTF-8 sequences.
    pub fn read_text(&mut self, name: &str) -> Result<String> {
        let mut entry = self
            .zip
            .by_name(name)
            .with_context(|| format!("archive has no member named {name:?}"))?;
        let mut bytes = Vec::new();
        entry
            .read_to_end(&mut bytes)
            .with_context(|| format!("failed to read archive member {name:?}"))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Picks the default member for a stream.
    ///
    /// Prefers the first `.txt` member whose file name mentions the stream
    /// (e.g. "Watch History"), then any member that does.
    pub fn guess_member(&mut self, kind: StreamKind) -> Result<Option<String>> {
        Ok(guess_member(&self.member_names()?, kind))
    }
}

/// Chooses the member for `kind` among `names`. Case-insensitive.
pub fn guess_member(names: &[String], kind: StreamKind) -> Option<String> {
    let hint = kind.export_member_hint();
    let matching: Vec<&String> = names
        .iter()
        .filter(|name| {
            let file_name = name.rsplit('/').next().unwrap_or(name.as_str());
            file_name.to_lowercase().contains(hint)
        })
        .collect();

    matching
        .iter()
        .find(|name| name.to_lowercase().ends_with(".txt"))
        .or_else(|| matching.first())
        .map(|name| (*name).clone())
}
