//! Types for error handling go here.
use std::io::Error as IOError;

quick_error! {
    /// Error type for all error variants originated by this crate.
    #[derive(Debug)]
    pub enum MghError {
        /// The pixel type (on write) or the on-disk type code (on read)
        /// is outside of the set supported by the format.
        UnsupportedPixelType(what: String) {
            display("Unsupported pixel type: {}", what)
        }
        /// The header block is truncated or one of its fields is out of range.
        MalformedHeader(reason: String) {
            display("Malformed MGH header: {}", reason)
        }
        /// The stream ended before the expected number of bytes was read.
        TruncatedInput {
            display("Unexpected end of MGH data")
        }
        /// The number of voxel values does not match the volume's shape.
        BufferSizeMismatch(expected: usize, got: usize) {
            display("Buffer size mismatch: expected {} values, got {}", expected, got)
        }
        /// The gzip backend failed to encode or decode the stream.
        Compression(err: IOError) {
            source(err)
            display("Gzip stream error: {}", err)
        }
        /// I/O Error
        Io(err: IOError) {
            from()
            source(err)
            display("I/O error: {}", err)
        }
    }
}

impl MghError {
    /// Shortcut for building a `MalformedHeader` error.
    pub(crate) fn malformed<S: Into<String>>(reason: S) -> Self {
        MghError::MalformedHeader(reason.into())
    }
}

/// Alias type for results originated from this crate.
pub type Result<T> = ::std::result::Result<T, MghError>;
