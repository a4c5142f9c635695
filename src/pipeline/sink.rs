//! Chunk sinks: persist transformed chunks in delivery order.

use log::debug;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::utils::config::DEFAULT_CHUNK_SIZE;

/// Output side of the pipeline.
pub trait ChunkSink {
    /// Accept one chunk. Returns once the chunk has been handed to the destination.
    fn write_chunk(&mut self, chunk: &[u8]) -> io::Result<()>;

    /// Flush and close after the last chunk. Success means the output is complete.
    fn close(&mut self) -> io::Result<()>;

    /// Best-effort flush and close after a failure. Errors are swallowed.
    fn abort(&mut self) {}
}

/// Writes to a file through a buffered writer. The file is created on the first write or on
/// `close`, so a run that fails before streaming never touches the destination.
pub struct FileSink {
    path: PathBuf,
    writer: Option<BufWriter<File>>,
    closed: bool,
}

impl FileSink {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            writer: None,
            closed: false,
        }
    }

    fn writer(&mut self) -> io::Result<&mut BufWriter<File>> {
        if self.closed {
            return Err(io::Error::other("sink already closed"));
        }
        if self.writer.is_none() {
            debug!("creating output {}", self.path.display());
            let file = File::create(&self.path)?;
            self.writer = Some(BufWriter::with_capacity(DEFAULT_CHUNK_SIZE, file));
        }
        self.writer
            .as_mut()
            .ok_or_else(|| io::Error::other("output writer missing"))
    }
}

impl ChunkSink for FileSink {
    fn write_chunk(&mut self, chunk: &[u8]) -> io::Result<()> {
        self.writer()?.write_all(chunk)
    }

    fn close(&mut self) -> io::Result<()> {
        if self.closed {
            return Ok(());
        }
        let mut writer = match self.writer.take() {
            Some(w) => w,
            None => BufWriter::new(File::create(&self.path)?),
        };
        self.closed = true;
        writer.flush()?;
        writer.get_ref().sync_all()
    }

    fn abort(&mut self) {
        if let Some(mut writer) = self.writer.take() {
            let _ = writer.flush();
        }
        self.closed = true;
    }
}

/// Collects chunks in memory.
#[derive(Clone, Debug, Default)]
pub struct MemorySink {
    chunks: Vec<Vec<u8>>,
    closed: bool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Chunks in the order they were written.
    pub fn chunks(&self) -> &[Vec<u8>] {
        &self.chunks
    }

    /// All written bytes, concatenated.
    pub fn contents(&self) -> Vec<u8> {
        self.chunks.concat()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl ChunkSink for MemorySink {
    fn write_chunk(&mut self, chunk: &[u8]) -> io::Result<()> {
        if self.closed {
            return Err(io::Error::other("sink already closed"));
        }
        self.chunks.push(chunk.to_vec());
        Ok(())
    }

    fn close(&mut self) -> io::Result<()> {
        self.closed = true;
        Ok(())
    }

    fn abort(&mut self) {
        self.closed = true;
    }
}
