//! Chunk sources: a size probe plus a lazy, finite, non-restartable chunk sequence.

use log::debug;
use std::collections::VecDeque;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use crate::Chunk;
use crate::utils::config::DEFAULT_CHUNK_SIZE;

/// Input side of the pipeline.
pub trait ChunkSource {
    /// Total input size in bytes. Called once, before the first chunk is requested.
    fn probe_size(&mut self) -> io::Result<u64>;

    /// Next chunk in input order, or `None` once the input is exhausted.
    fn next_chunk(&mut self) -> io::Result<Option<Chunk>>;

    /// Release the underlying handle. Further `next_chunk` calls return `None`.
    fn close(&mut self) {}
}

enum FileState {
    Unopened,
    Open(File),
    Closed,
}

/// Reads a file in chunks of up to [`DEFAULT_CHUNK_SIZE`] bytes. Opened on the first read.
pub struct FileSource {
    path: PathBuf,
    state: FileState,
    chunk_size: usize,
}

impl FileSource {
    pub fn new(path: &Path) -> Self {
        Self::with_chunk_size(path, DEFAULT_CHUNK_SIZE)
    }

    /// Reader with a fixed read size. The CLI always uses the default.
    pub fn with_chunk_size(path: &Path, chunk_size: usize) -> Self {
        Self {
            path: path.to_path_buf(),
            state: FileState::Unopened,
            chunk_size: chunk_size.max(1),
        }
    }
}

impl ChunkSource for FileSource {
    fn probe_size(&mut self) -> io::Result<u64> {
        let meta = std::fs::metadata(&self.path)?;
        if meta.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is a directory", self.path.display()),
            ));
        }
        Ok(meta.len())
    }

    fn next_chunk(&mut self) -> io::Result<Option<Chunk>> {
        if let FileState::Unopened = self.state {
            debug!("opening input {}", self.path.display());
            self.state = FileState::Open(File::open(&self.path)?);
        }
        let FileState::Open(file) = &mut self.state else {
            return Ok(None);
        };
        let mut buffer = vec![0u8; self.chunk_size];
        let n = loop {
            match file.read(&mut buffer) {
                Ok(n) => break n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        };
        if n == 0 {
            self.close();
            return Ok(None);
        }
        buffer.truncate(n);
        Ok(Some(buffer))
    }

    fn close(&mut self) {
        self.state = FileState::Closed;
    }
}

/// Yields a fixed list of chunks. Its probed size is the sum of the chunk lengths.
#[derive(Clone, Debug, Default)]
pub struct MemorySource {
    chunks: VecDeque<Chunk>,
    reads: usize,
}

impl MemorySource {
    pub fn new<I, C>(chunks: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Chunk>,
    {
        Self {
            chunks: chunks.into_iter().map(Into::into).collect(),
            reads: 0,
        }
    }

    /// Number of chunks handed out so far.
    pub fn reads(&self) -> usize {
        self.reads
    }
}

impl ChunkSource for MemorySource {
    fn probe_size(&mut self) -> io::Result<u64> {
        Ok(self.chunks.iter().map(|c| c.len() as u64).sum())
    }

    fn next_chunk(&mut self) -> io::Result<Option<Chunk>> {
        let next = self.chunks.pop_front();
        if next.is_some() {
            self.reads += 1;
        }
        Ok(next)
    }

    fn close(&mut self) {
        self.chunks.clear();
    }
}
