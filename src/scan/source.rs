//! Random-access byte source with chunked partitioning.
//!
//! The whole input is memory-mapped once; scan workers see it as an ordered
//! list of near-equal chunks whose concatenation reproduces the file. All
//! but the last chunk share the same size, so a chunk index is a plain
//! division of the absolute offset. Word reads are bounds-checked against
//! the full file, never against a chunk seam.

use crate::error::ScanError;
use std::fs::File;
use std::path::Path;

#[derive(Debug)]
enum Backing {
    /// Memory-mapped file; the handle is kept alive for the map lifetime
    /// (notably on Windows).
    Mapped { mmap: memmap2::Mmap, _file: File },
    /// Caller-supplied in-memory buffer.
    Owned(Vec<u8>),
}

impl Backing {
    fn data(&self) -> &[u8] {
        match self {
            Backing::Mapped { mmap, .. } => mmap,
            Backing::Owned(bytes) => bytes,
        }
    }
}

/// Memory-mapped (or in-memory) input partitioned into scan chunks.
#[derive(Debug)]
pub struct ChunkedSource {
    backing: Backing,
    chunk_size: usize,
}

impl ChunkedSource {
    /// Map a file from disk. Missing or empty inputs are configuration
    /// errors; the scanner has nothing to do with them.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ScanError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| ScanError::Config {
            message: format!("cannot open '{}': {}", path.display(), e),
        })?;

        let metadata = file.metadata().map_err(|e| ScanError::Io {
            message: format!("failed to read metadata for '{}': {}", path.display(), e),
        })?;
        if metadata.len() == 0 {
            return Err(ScanError::Config {
                message: format!("input file '{}' is empty", path.display()),
            });
        }

        let mmap = unsafe { memmap2::Mmap::map(&file) }.map_err(|e| ScanError::Io {
            message: format!("failed to memory-map '{}': {}", path.display(), e),
        })?;

        Ok(Self::with_backing(Backing::Mapped { mmap, _file: file }))
    }

    /// Wrap an in-memory buffer.
    pub fn from_vec(bytes: Vec<u8>) -> Result<Self, ScanError> {
        if bytes.is_empty() {
            return Err(ScanError::Config {
                message: "input buffer is empty".to_string(),
            });
        }
        Ok(Self::with_backing(Backing::Owned(bytes)))
    }

    fn with_backing(backing: Backing) -> Self {
        let chunk_size = backing.data().len();
        Self {
            backing,
            chunk_size,
        }
    }

    /// Total input size in bytes.
    pub fn len(&self) -> usize {
        self.backing.data().len()
    }

    /// True when the source holds no bytes. Construction rejects empty
    /// inputs, so this only exists for API completeness.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The full byte view.
    pub fn bytes(&self) -> &[u8] {
        self.backing.data()
    }

    /// Repartition into `parts` chunks of ceil-divided size; every chunk but
    /// the last has exactly [`chunk_size`](Self::chunk_size) bytes.
    pub fn partition(&mut self, parts: usize) {
        debug_assert!(parts > 0);
        self.chunk_size = self.len().div_ceil(parts);
    }

    /// Size shared by every chunk except possibly the last.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Number of chunks under the current partitioning.
    pub fn chunk_count(&self) -> usize {
        self.len().div_ceil(self.chunk_size)
    }

    /// Byte view of one chunk.
    pub fn chunk(&self, index: usize) -> &[u8] {
        let data = self.backing.data();
        let start = index * self.chunk_size;
        let end = (start + self.chunk_size).min(data.len());
        &data[start..end]
    }

    /// Absolute byte offset of the first byte of a chunk.
    pub fn chunk_base(&self, index: usize) -> usize {
        index * self.chunk_size
    }

    /// Read one sample word at an absolute offset.
    ///
    /// Returns `None` when the read would fall outside the file; callers
    /// treat that as stream termination, not as an error.
    pub fn word_at(&self, offset: usize, width: usize) -> Option<&[u8]> {
        let data = self.backing.data();
        let end = offset.checked_add(width)?;
        data.get(offset..end)
    }
}
