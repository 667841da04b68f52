//! Local document sources: a literal string, a single text file, or a
//! directory of `.txt` files.
//!
//! Each source yields the documents once per run; the network-backed
//! Wikipedia source lives in `ragline-remote`.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::traits::DocumentSource;
use crate::types::Document;

/// Wraps a constant string, the smallest possible corpus.
pub struct LiteralSource {
    title: Option<String>,
    text: String,
}

impl LiteralSource {
    pub fn new(title: Option<String>, text: impl Into<String>) -> Self {
        Self { title, text: text.into() }
    }
}

impl DocumentSource for LiteralSource {
    fn load(&self) -> anyhow::Result<Vec<Document>> {
        Ok(vec![Document::new(self.title.clone(), self.text.clone())])
    }
}

/// Reads one text file; the title is the file stem.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DocumentSource for FileSource {
    fn load(&self) -> anyhow::Result<Vec<Document>> {
        let content = read_text_lossy(&self.path)?;
        Ok(vec![Document::new(title_from_path(&self.path), content)])
    }
}

/// Walks a directory tree and loads every `.txt` file, one document per
/// file, sorted by path so the chunk sequence is deterministic.
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn list_txt_files(&self) -> Vec<PathBuf> {
        let mut txt_files = Vec::new();
        for entry in walkdir::WalkDir::new(&self.root)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
        {
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) == Some("txt") {
                txt_files.push(path.to_path_buf());
            }
        }
        txt_files.sort();
        txt_files
    }
}

impl DocumentSource for DirectorySource {
    fn load(&self) -> anyhow::Result<Vec<Document>> {
        let files = self.list_txt_files();
        if files.is_empty() {
            warn!(root = %self.root.display(), "no .txt files found");
            return Ok(Vec::new());
        }
        let mut documents = Vec::new();
        for file_path in &files {
            let content = read_text_lossy(file_path)?;
            documents.push(Document::new(title_from_path(file_path), content));
        }
        debug!(root = %self.root.display(), documents = documents.len(), "loaded directory source");
        Ok(documents)
    }
}

fn title_from_path(path: &Path) -> Option<String> {
    path.file_stem().map(|s| s.to_string_lossy().to_string())
}

fn read_text_lossy(path: &Path) -> anyhow::Result<String> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(content),
        Err(_) => Ok(String::from_utf8_lossy(&fs::read(path)?).to_string()),
    }
}
