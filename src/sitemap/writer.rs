//! Chunked JSON Lines output for resolved sitemap URLs

use super::SitemapResult;
use serde::Serialize;
use std::fs::{self, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Serialize)]
struct UrlLine<'a> {
    url: &'a str,
}

/// Writes URLs into `urls_1.jsonl`, `urls_2.jsonl`, ... under one directory
///
/// Files are opened in append mode, so saving twice into the same directory
/// extends the existing chunks rather than replacing them.
#[derive(Debug, Clone)]
pub struct ChunkWriter {
    dir: PathBuf,
    chunk_size: usize,
}

impl ChunkWriter {
    /// Creates a writer; a chunk size of 0 is treated as 1
    pub fn new(dir: impl Into<PathBuf>, chunk_size: usize) -> Self {
        Self {
            dir: dir.into(),
            chunk_size: chunk_size.max(1),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the path of the 1-based chunk `index`
    pub fn chunk_path(&self, index: usize) -> PathBuf {
        self.dir.join(format!("urls_{}.jsonl", index))
    }

    /// Writes `urls` in order, `chunk_size` per file, returning the files touched
    pub fn save(&self, urls: &[String]) -> SitemapResult<Vec<PathBuf>> {
        fs::create_dir_all(&self.dir)?;

        let mut written = Vec::new();
        for (i, chunk) in urls.chunks(self.chunk_size).enumerate() {
            let path = self.chunk_path(i + 1);
            let file = OpenOptions::new().create(true).append(true).open(&path)?;
            let mut out = BufWriter::new(file);

            for url in chunk {
                serde_json::to_writer(&mut out, &UrlLine { url })?;
                out.write_all(b"\n")?;
            }
            out.flush()?;

            tracing::debug!("Saved {} URLs to {}", chunk.len(), path.display());
            written.push(path);
        }

        Ok(written)
    }
}
