//! Private utility module
use std::io::{ErrorKind, Read, Result as IoResult};
use std::path::Path;

/// File name suffixes recognized as MGH volumes, compressed or not.
const MGH_SUFFIXES: [&str; 3] = [".mgh", ".mgz", ".mgh.gz"];

/// Obtain the file name of a path as a lowercase string, if it has one.
fn lowercase_file_name<P: AsRef<Path>>(path: P) -> Option<String> {
    path.as_ref()
        .file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.to_ascii_lowercase())
}

/// Check whether the file name suggests a gzip-compressed stream
/// (".mgz" or anything ending with ".gz").
pub fn is_gz_file<P: AsRef<Path>>(path: P) -> bool {
    lowercase_file_name(path)
        .map(|name| name.ends_with(".mgz") || name.ends_with(".gz"))
        .unwrap_or(false)
}

/// Check whether the file name carries one of the MGH suffixes.
/// A bare suffix (e.g. ".mgh" with nothing before it) is not accepted.
pub fn has_mgh_suffix<P: AsRef<Path>>(path: P) -> bool {
    lowercase_file_name(path)
        .map(|name| {
            MGH_SUFFIXES
                .iter()
                .any(|suffix| name.len() > suffix.len() && name.ends_with(suffix))
        })
        .unwrap_or(false)
}

/// Read as many bytes as possible into `buf`, stopping early only at the
/// end of the stream. Returns the number of bytes read.
pub fn read_up_to<R: Read + ?Sized>(src: &mut R, buf: &mut [u8]) -> IoResult<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match src.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(ref e) if e.kind() == ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
