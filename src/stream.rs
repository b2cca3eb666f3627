//! Plain and gzip-compressed file streams behind a single reader and a
//! single writer type.
//!
//! The backend is chosen once, from the file name: ".mgz" and ".gz" files
//! go through gzip, everything else is read or written directly. Both
//! types own their file handle and release it when closed or dropped; the
//! writer finishes the gzip stream on every exit path.

use crate::error::{MghError, Result};
use crate::util;
use flate2::bufread::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::Path;
use tracing::debug;

pub use crate::util::is_gz_file as is_compressed_file;

#[derive(Debug)]
enum ReaderBackend {
    Plain(BufReader<File>),
    Gz(GzDecoder<BufReader<File>>),
}

/// A byte source over an MGH or MGZ file.
#[derive(Debug)]
pub struct MghReader {
    inner: Option<ReaderBackend>,
    compressed: bool,
}

impl MghReader {
    /// Open a file for reading, decoding gzip if the file name asks for it.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let compressed = util::is_gz_file(&path);
        debug!(path = %path.as_ref().display(), compressed, "opening MGH file for reading");
        let file = BufReader::new(File::open(path)?);
        let inner = if compressed {
            ReaderBackend::Gz(GzDecoder::new(file))
        } else {
            ReaderBackend::Plain(file)
        };
        Ok(MghReader {
            inner: Some(inner),
            compressed,
        })
    }

    /// Whether the stream goes through the gzip backend.
    pub fn is_compressed(&self) -> bool {
        self.compressed
    }

    /// Read exactly `n` bytes. The codec itself reads through `Read`; this
    /// is a convenience for callers walking the file layout by hand.
    ///
    /// # Errors
    ///
    /// - `MghError::TruncatedInput` if the stream ends first.
    /// - `MghError::Compression` if the gzip stream is corrupt.
    pub fn read_exact_bytes(&mut self, n: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; n];
        self.read_exact(&mut buf).map_err(|e| self.classify(e.into()))?;
        Ok(buf)
    }

    /// Discard the next `n` bytes of the stream, e.g. `WHOLE_HEADER_SIZE`
    /// bytes to land on the payload. A convenience for callers; the codec
    /// does not skip data.
    ///
    /// # Errors
    ///
    /// - `MghError::TruncatedInput` if the stream ends first.
    pub fn skip(&mut self, n: u64) -> Result<()> {
        let copied = {
            let mut limited = self.by_ref().take(n);
            io::copy(&mut limited, &mut io::sink())
        };
        let copied = copied.map_err(|e| self.classify(e.into()))?;
        if copied < n {
            return Err(MghError::TruncatedInput);
        }
        Ok(())
    }

    /// Translate an error raised while reading this stream: an early end of
    /// the stream becomes `TruncatedInput`, and invalid data coming out of
    /// the gzip backend becomes `Compression`.
    pub fn classify(&self, err: MghError) -> MghError {
        match err {
            MghError::Io(e) => match e.kind() {
                ErrorKind::UnexpectedEof => MghError::TruncatedInput,
                ErrorKind::InvalidInput | ErrorKind::InvalidData if self.compressed => {
                    MghError::Compression(e)
                }
                _ => MghError::Io(e),
            },
            e => e,
        }
    }

    /// Release the underlying file. Further reads return no data.
    pub fn close(&mut self) {
        self.inner = None;
    }
}

impl Read for MghReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match &mut self.inner {
            Some(ReaderBackend::Plain(r)) => r.read(buf),
            Some(ReaderBackend::Gz(r)) => r.read(buf),
            None => Ok(0),
        }
    }
}

#[derive(Debug)]
enum WriterBackend {
    Plain(BufWriter<File>),
    Gz(GzEncoder<BufWriter<File>>),
}

/// A byte sink over an MGH or MGZ file.
///
/// Call [`close`] to learn whether the final flush succeeded; dropping the
/// writer closes it too, discarding any error.
///
/// [`close`]: #method.close
#[derive(Debug)]
pub struct MghWriter {
    inner: Option<WriterBackend>,
    compressed: bool,
}

impl MghWriter {
    /// Create (or truncate) a file for writing, encoding gzip if the file
    /// name asks for it.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let compressed = util::is_gz_file(&path);
        debug!(path = %path.as_ref().display(), compressed, "opening MGH file for writing");
        let file = BufWriter::new(File::create(path)?);
        let inner = if compressed {
            WriterBackend::Gz(GzEncoder::new(file, Compression::default()))
        } else {
            WriterBackend::Plain(file)
        };
        Ok(MghWriter {
            inner: Some(inner),
            compressed,
        })
    }

    /// Whether the stream goes through the gzip backend.
    pub fn is_compressed(&self) -> bool {
        self.compressed
    }

    /// Write all of the given bytes.
    pub fn write_all_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.write_all(bytes).map_err(|e| self.classify(e))
    }

    fn classify(&self, e: io::Error) -> MghError {
        if self.compressed {
            MghError::Compression(e)
        } else {
            MghError::Io(e)
        }
    }

    /// Finish the stream and release the underlying file. Closing an
    /// already closed writer does nothing.
    ///
    /// The file is released even when finishing the stream fails.
    pub fn close(&mut self) -> Result<()> {
        match self.inner.take() {
            None => Ok(()),
            Some(WriterBackend::Plain(mut w)) => w.flush().map_err(MghError::Io),
            Some(WriterBackend::Gz(w)) => {
                let mut file = w.finish().map_err(MghError::Compression)?;
                file.flush().map_err(MghError::Io)
            }
        }
    }
}

impl Write for MghWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &mut self.inner {
            Some(WriterBackend::Plain(w)) => w.write(buf),
            Some(WriterBackend::Gz(w)) => w.write(buf),
            None => Err(io::Error::new(ErrorKind::Other, "MGH writer is closed")),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut self.inner {
            Some(WriterBackend::Plain(w)) => w.flush(),
            Some(WriterBackend::Gz(w)) => w.flush(),
            None => Ok(()),
        }
    }
}

impl Drop for MghWriter {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn plain_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.mgh");
        let mut w = MghWriter::create(&path).unwrap();
        assert!(!w.is_compressed());
        w.write_all_bytes(b"hello world").unwrap();
        w.close().unwrap();
        w.close().unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"hello world");

        let mut r = MghReader::open(&path).unwrap();
        r.skip(6).unwrap();
        assert_eq!(r.read_exact_bytes(5).unwrap(), b"world");
        assert!(matches!(r.read_exact_bytes(1), Err(MghError::TruncatedInput)));
    }

    #[test]
    fn gz_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.mgz");
        let payload: Vec<u8> = (0..=255).cycle().take(4096).collect();
        {
            let mut w = MghWriter::create(&path).unwrap();
            assert!(w.is_compressed());
            w.write_all_bytes(&payload).unwrap();
            // dropped without an explicit close
        }
        let raw = std::fs::read(&path).unwrap();
        assert_eq!(&raw[..2], &[0x1f, 0x8b]);

        let mut r = MghReader::open(&path).unwrap();
        assert!(r.is_compressed());
        assert_eq!(r.read_exact_bytes(payload.len()).unwrap(), payload);
        assert!(matches!(r.skip(1), Err(MghError::TruncatedInput)));
    }

    #[test]
    fn skip_to_payload() {
        use crate::header::WHOLE_HEADER_SIZE;

        let dir = tempdir().unwrap();
        let path = dir.path().join("v.mgz");
        let mut bytes = vec![0u8; WHOLE_HEADER_SIZE];
        bytes.extend_from_slice(&[9, 8, 7]);
        {
            let mut w = MghWriter::create(&path).unwrap();
            w.write_all_bytes(&bytes).unwrap();
            w.close().unwrap();
        }
        let mut r = MghReader::open(&path).unwrap();
        r.skip(WHOLE_HEADER_SIZE as u64).unwrap();
        assert_eq!(r.read_exact_bytes(3).unwrap(), vec![9, 8, 7]);
    }

    #[test]
    fn corrupt_gz() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.mgz");
        std::fs::write(&path, b"definitely not gzip data at all").unwrap();
        let mut r = MghReader::open(&path).unwrap();
        match r.read_exact_bytes(4) {
            Err(MghError::Compression(_)) => {}
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn closed_reader_is_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.mgh");
        std::fs::write(&path, b"abc").unwrap();
        let mut r = MghReader::open(&path).unwrap();
        r.close();
        r.close();
        assert!(matches!(r.read_exact_bytes(1), Err(MghError::TruncatedInput)));
    }
}
