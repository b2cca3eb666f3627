//! The image I/O capability: probing, reading and writing MGH files
//! through a descriptor and a flat voxel buffer.
//!
//! A host toolkit registers [`MghImageIo`] (or any other [`ImageIo`]
//! implementation) with its own factory; nothing is registered globally.
//!
//! [`MghImageIo`]: ./struct.MghImageIo.html
//! [`ImageIo`]: ./trait.ImageIo.html

use crate::error::{MghError, Result};
use crate::header::MghHeader;
use crate::metadata;
use crate::object::{read_payload_from, write_payload_to};
use crate::stream::{MghReader, MghWriter};
use crate::util;
use crate::volume::{PixelBuffer, VolumeDescriptor};
use std::path::Path;
use tracing::debug;

/// Interface of a volumetric image codec.
pub trait ImageIo {
    /// Whether this codec can read the given file, judging by its name
    /// alone. Never fails and never touches the file system.
    fn can_read_file(&self, path: &Path) -> bool;

    /// Whether this codec can write the given file, judging by its name
    /// alone. Never fails and never touches the file system.
    fn can_write_file(&self, path: &Path) -> bool;

    /// Read the header of a file and describe the volume it holds.
    fn read_header(&self, path: &Path) -> Result<VolumeDescriptor>;

    /// Read the voxel data of a file whose header was described as
    /// `descriptor`, in voxel-major order.
    fn read_payload(&self, path: &Path, descriptor: &VolumeDescriptor) -> Result<PixelBuffer>;

    /// Write a file holding only the header of the described volume.
    fn write_header(&self, path: &Path, descriptor: &VolumeDescriptor) -> Result<()>;

    /// Write a complete file for the described volume, taking the voxel
    /// data in voxel-major order.
    fn write_payload(
        &self,
        path: &Path,
        descriptor: &VolumeDescriptor,
        data: &PixelBuffer,
    ) -> Result<()>;
}

/// The MGH/MGZ implementation of [`ImageIo`].
///
/// Files ending in ".mgh" are plain, files ending in ".mgz" or ".mgh.gz"
/// are gzip-compressed. Suffixes are matched regardless of case.
///
/// [`ImageIo`]: ./trait.ImageIo.html
///
/// # Example
///
/// ```no_run
/// use mgh::{ImageIo, MghImageIo};
/// use std::path::Path;
/// # use mgh::Result;
///
/// # fn run() -> Result<()> {
/// let io = MghImageIo::new();
/// let path = Path::new("brain.mgz");
/// assert!(io.can_read_file(path));
/// let descriptor = io.read_header(path)?;
/// let data = io.read_payload(path, &descriptor)?;
/// io.write_payload(Path::new("copy.mgh"), &descriptor, &data)?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MghImageIo;

impl MghImageIo {
    /// Create the codec.
    pub fn new() -> Self {
        MghImageIo
    }
}

fn check_matches(header: &MghHeader, descriptor: &VolumeDescriptor) -> Result<()> {
    let found = header.to_descriptor()?;
    if found.pixel_type != descriptor.pixel_type {
        return Err(MghError::UnsupportedPixelType(format!(
            "file holds {}, but {} was requested",
            found.pixel_type, descriptor.pixel_type
        )));
    }
    if found.dim != descriptor.dim {
        return Err(MghError::BufferSizeMismatch(
            descriptor.payload_len()?,
            found.payload_len()?,
        ));
    }
    Ok(())
}

impl ImageIo for MghImageIo {
    fn can_read_file(&self, path: &Path) -> bool {
        util::has_mgh_suffix(path)
    }

    fn can_write_file(&self, path: &Path) -> bool {
        util::has_mgh_suffix(path)
    }

    fn read_header(&self, path: &Path) -> Result<VolumeDescriptor> {
        let header = MghHeader::from_file(path)?;
        header.to_descriptor()
    }

    fn read_payload(&self, path: &Path, descriptor: &VolumeDescriptor) -> Result<PixelBuffer> {
        let mut reader = MghReader::open(path)?;
        let result = MghHeader::from_reader(&mut reader).and_then(|header| {
            check_matches(&header, descriptor)?;
            read_payload_from(&mut reader, &header)
        });
        let data = result.map_err(|e| reader.classify(e))?;
        reader.close();
        Ok(data)
    }

    fn write_header(&self, path: &Path, descriptor: &VolumeDescriptor) -> Result<()> {
        let header = MghHeader::from_descriptor(descriptor)?;
        debug!(path = %path.display(), "writing MGH header");
        let mut writer = MghWriter::create(path)?;
        writer.write_all_bytes(&header.to_bytes())?;
        writer.close()
    }

    fn write_payload(
        &self,
        path: &Path,
        descriptor: &VolumeDescriptor,
        data: &PixelBuffer,
    ) -> Result<()> {
        let header = MghHeader::from_descriptor(descriptor)?;
        data.check_against(descriptor)?;
        debug!(path = %path.display(), dim = ?descriptor.dim, "writing MGH volume");

        let mut writer = MghWriter::create(path)?;
        writer.write_all_bytes(&header.to_bytes())?;
        write_payload_to(&mut writer, descriptor, data)?;
        let mut footer = Vec::with_capacity(metadata::FOOTER_SIZE);
        metadata::write_footer(&descriptor.metadata, &mut footer)?;
        writer.write_all_bytes(&footer)?;
        writer.close()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::typedef::{ComponentType, PixelType};
    use tempfile::tempdir;

    #[test]
    fn probes() {
        let io = MghImageIo::new();
        for name in &["a.mgh", "a.MGZ", "dir/a.mgh.gz", "A.Mgh"] {
            assert!(io.can_read_file(Path::new(name)), "{}", name);
            assert!(io.can_write_file(Path::new(name)), "{}", name);
        }
        for name in &["a.nii", "a.gz", "", ".mgh", "mgh", "a.mgh.bak"] {
            assert!(!io.can_read_file(Path::new(name)), "{}", name);
            assert!(!io.can_write_file(Path::new(name)), "{}", name);
        }
    }

    #[test]
    fn header_only_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.mgh");
        let io = MghImageIo::new();
        let descriptor = VolumeDescriptor::new([3, 2, 1], PixelType::Scalar(ComponentType::Int32));
        io.write_header(&path, &descriptor).unwrap();
        assert_eq!(
            std::fs::metadata(&path).unwrap().len() as usize,
            crate::header::WHOLE_HEADER_SIZE
        );
        assert_eq!(io.read_header(&path).unwrap(), descriptor);
        match io.read_payload(&path, &descriptor) {
            Err(MghError::TruncatedInput) => {}
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn payload_against_other_descriptor() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("v.mgz");
        let io = MghImageIo::new();
        let descriptor = VolumeDescriptor::new([2, 2, 2], PixelType::Scalar(ComponentType::Uint8));
        let data = PixelBuffer::Uint8((0..8).collect());
        io.write_payload(&path, &descriptor, &data).unwrap();
        assert_eq!(io.read_payload(&path, &descriptor).unwrap(), data);

        let other = VolumeDescriptor::new([2, 2, 3], PixelType::Scalar(ComponentType::Uint8));
        match io.read_payload(&path, &other) {
            Err(MghError::BufferSizeMismatch(12, 8)) => {}
            other => panic!("unexpected {:?}", other),
        }

        let huge = VolumeDescriptor::new([usize::MAX, 2, 1], PixelType::Scalar(ComponentType::Uint8));
        match io.read_payload(&path, &huge) {
            Err(MghError::MalformedHeader(_)) => {}
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn payload_with_other_pixel_type() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("v.mgh");
        let io = MghImageIo::new();
        let descriptor = VolumeDescriptor::new([2, 2, 2], PixelType::Scalar(ComponentType::Uint8));
        io.write_payload(&path, &descriptor, &PixelBuffer::Uint8(vec![3; 8]))
            .unwrap();

        let other = VolumeDescriptor::new([2, 2, 2], PixelType::Scalar(ComponentType::Int16));
        match io.read_payload(&path, &other) {
            Err(MghError::UnsupportedPixelType(msg)) => {
                assert!(msg.contains("scalar u8"), "{}", msg);
                assert!(msg.contains("scalar i16"), "{}", msg);
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
