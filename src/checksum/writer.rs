//! Streams bytes to a staging file while folding them into a running digest.

use std::path::Path;

use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::debug;

use super::{ChecksumDescriptor, Hasher};

/// Result of comparing the accumulated digest against the expected one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecksumVerdict {
    /// Expected digest from the descriptor, lowercase hex.
    pub expected: String,
    /// Digest of the bytes actually written, lowercase hex.
    pub computed: String,
}

impl ChecksumVerdict {
    /// Returns true if the computed digest equals the expected one (case-insensitive).
    #[must_use]
    pub fn is_match(&self) -> bool {
        self.expected.eq_ignore_ascii_case(&self.computed)
    }
}

/// Exclusive writer for one staging file.
///
/// Every chunk is hashed and written unmodified. The file handle is owned by
/// the writer and released when [`finish`](Self::finish) returns or the writer
/// is dropped, whichever comes first.
pub struct ChecksumWriter {
    sink: BufWriter<File>,
    hasher: Hasher,
    expected: String,
    bytes_written: u64,
}

impl ChecksumWriter {
    /// Creates (or truncates) `path` and prepares a digest for `descriptor`'s algorithm.
    ///
    /// # Errors
    ///
    /// Returns the underlying IO error if the file cannot be created.
    pub async fn create(path: &Path, descriptor: &ChecksumDescriptor) -> std::io::Result<Self> {
        let file = File::create(path).await?;
        debug!(path = %path.display(), algorithm = %descriptor.algorithm(), "opened staging file");
        Ok(Self {
            sink: BufWriter::new(file),
            hasher: descriptor.algorithm().hasher(),
            expected: descriptor.digest().to_string(),
            bytes_written: 0,
        })
    }

    /// Hashes and writes one chunk.
    ///
    /// # Errors
    ///
    /// Returns the underlying IO error; the writer must not be used afterwards.
    pub async fn write(&mut self, chunk: &[u8]) -> std::io::Result<()> {
        self.hasher.update(chunk);
        self.sink.write_all(chunk).await?;
        self.bytes_written += chunk.len() as u64;
        Ok(())
    }

    /// Number of bytes written so far.
    #[must_use]
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Flushes, closes the file and returns the digest comparison.
    ///
    /// The handle is released even when flushing fails.
    ///
    /// # Errors
    ///
    /// Returns the IO error from flushing or syncing buffered data.
    pub async fn finish(self) -> std::io::Result<ChecksumVerdict> {
        let Self {
            mut sink,
            hasher,
            expected,
            ..
        } = self;
        sink.flush().await?;
        sink.get_ref().sync_all().await?;
        drop(sink);

        Ok(ChecksumVerdict {
            expected,
            computed: hasher.finalize_hex(),
        })
    }
}
