//! Module for handling and retrieving complete MGH objects: the header,
//! its in-memory descriptor and the voxel data, read or written in a
//! single pass over the stream.

use crate::error::{MghError, Result};
use crate::header::MghHeader;
use crate::metadata::{self, FOOTER_SIZE};
use crate::stream::{MghReader, MghWriter};
use crate::util::read_up_to;
use crate::volume::{PixelBuffer, VolumeDescriptor};
use std::io::{Read, Write};
use std::path::Path;
use tracing::{debug, trace};

/// Data type for an MGH volume that is fully contained in memory.
#[derive(Debug, Clone, PartialEq)]
pub struct MghObject {
    header: MghHeader,
    descriptor: VolumeDescriptor,
    data: PixelBuffer,
}

impl MghObject {
    /// Assemble an object from a descriptor and its voxel data, which
    /// must be in voxel-major order.
    ///
    /// # Errors
    ///
    /// - `MghError::UnsupportedPixelType` if the pixel type cannot be
    ///   stored, or the buffer holds values of another type.
    /// - `MghError::BufferSizeMismatch` if the buffer length does not match
    ///   the descriptor.
    /// - `MghError::MalformedHeader` if the descriptor's geometry cannot be
    ///   encoded.
    pub fn new(descriptor: VolumeDescriptor, data: PixelBuffer) -> Result<Self> {
        let header = MghHeader::from_descriptor(&descriptor)?;
        data.check_against(&descriptor)?;
        Ok(MghObject {
            header,
            descriptor,
            data,
        })
    }

    /// Read the full contents of an MGH or MGZ file.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use mgh::MghObject;
    /// # use mgh::Result;
    ///
    /// # fn run() -> Result<()> {
    /// let obj = MghObject::from_file("brain.mgz")?;
    /// println!("{:?}", obj.descriptor().dim);
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut reader = MghReader::open(path)?;
        let obj = Self::from_reader(&mut reader).map_err(|e| reader.classify(e))?;
        reader.close();
        Ok(obj)
    }

    /// Read an MGH object from an uncompressed byte stream positioned at
    /// the start of the header. Scan parameters missing from the header
    /// trailer are taken from the footer after the payload, if present.
    pub fn from_reader<R: Read>(mut source: R) -> Result<Self> {
        let header = MghHeader::from_reader(&mut source)?;
        let mut descriptor = header.to_descriptor()?;
        let data = read_payload_from(&mut source, &header)?;

        let mut footer = [0u8; FOOTER_SIZE];
        if read_up_to(&mut source, &mut footer)? == FOOTER_SIZE {
            trace!("merging scan parameter footer");
            metadata::merge_footer(&footer, &mut descriptor.metadata);
        }

        Ok(MghObject {
            header,
            descriptor,
            data,
        })
    }

    /// Write this object to a file, compressing it if the file name ends
    /// with ".mgz" or ".gz".
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = MghWriter::create(path)?;
        self.to_writer(&mut writer)?;
        writer.close()
    }

    /// Write this object (header, payload and scan parameter footer) to a
    /// byte sink.
    pub fn to_writer<W: Write>(&self, mut dst: W) -> Result<()> {
        self.header.write_to(&mut dst)?;
        write_payload_to(&mut dst, &self.descriptor, &self.data)?;
        metadata::write_footer(&self.descriptor.metadata, &mut dst)?;
        Ok(())
    }

    /// Obtain a reference to the raw header.
    pub fn header(&self) -> &MghHeader {
        &self.header
    }

    /// Obtain a reference to the volume's descriptor.
    pub fn descriptor(&self) -> &VolumeDescriptor {
        &self.descriptor
    }

    /// Obtain a reference to the voxel data, in voxel-major order.
    pub fn data(&self) -> &PixelBuffer {
        &self.data
    }

    /// Move the descriptor and the data out of the object.
    pub fn into_parts(self) -> (VolumeDescriptor, PixelBuffer) {
        (self.descriptor, self.data)
    }
}

const MAX_PREALLOCATION: usize = 1 << 26;

/// Read the payload that follows `header` and reorder it into voxel-major
/// order.
pub(crate) fn read_payload_from<R: Read>(mut source: R, header: &MghHeader) -> Result<PixelBuffer> {
    let [w, h, d, frames] = header.dim()?;
    let datatype = header.data_type()?;
    let nbytes = header.payload_size()?;
    debug!(nbytes, ?datatype, "reading MGH payload");

    // grow with the data actually read, not with what the header claims
    let mut raw = Vec::with_capacity(nbytes.min(MAX_PREALLOCATION));
    let got = source.by_ref().take(nbytes as u64).read_to_end(&mut raw)?;
    if got < nbytes {
        return Err(MghError::TruncatedInput);
    }
    PixelBuffer::from_raw(datatype, raw).to_in_memory(&[w, h, d], frames)
}

/// Reorder `data` into frame-major order and write it in big-endian bytes.
pub(crate) fn write_payload_to<W: Write>(
    mut dst: W,
    descriptor: &VolumeDescriptor,
    data: &PixelBuffer,
) -> Result<()> {
    data.check_against(descriptor)?;
    let on_disk = data.to_on_disk(&descriptor.dim, descriptor.components())?;
    let raw = on_disk.to_raw();
    debug!(nbytes = raw.len(), "writing MGH payload");
    dst.write_all(&raw)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::WHOLE_HEADER_SIZE;
    use crate::metadata::MetaDataStore;
    use crate::typedef::{ComponentType, PixelType};

    fn small_object() -> MghObject {
        let mut descriptor =
            VolumeDescriptor::new([2, 2, 1], PixelType::Vector(ComponentType::Int16, 2));
        descriptor.metadata.set_f32("TR", 1.25);
        let data = PixelBuffer::Int16(vec![1, -1, 2, -2, 3, -3, 4, -4]);
        MghObject::new(descriptor, data).unwrap()
    }

    #[test]
    fn stream_layout() {
        let obj = small_object();
        let mut bytes = Vec::new();
        obj.to_writer(&mut bytes).unwrap();
        assert_eq!(bytes.len(), WHOLE_HEADER_SIZE + 8 * 2 + FOOTER_SIZE);

        // frame 0 holds the first component of every voxel
        let payload = &bytes[WHOLE_HEADER_SIZE..WHOLE_HEADER_SIZE + 16];
        assert_eq!(&payload[..8], &[0, 1, 0, 2, 0, 3, 0, 4]);
        assert_eq!(&payload[8..10], &[0xFF, 0xFF]);

        let back = MghObject::from_reader(&bytes[..]).unwrap();
        assert_eq!(back, obj);
    }

    #[test]
    fn footer_fills_missing_parameters() {
        let obj = small_object();
        let mut bytes = Vec::new();
        obj.to_writer(&mut bytes).unwrap();
        // wipe the trailer slot; the footer still carries the value
        for b in &mut bytes[90..94] {
            *b = 0;
        }
        let back = MghObject::from_reader(&bytes[..]).unwrap();
        assert_eq!(back.descriptor().metadata.get_f32("TR"), Some(1.25));

        // no footer at all
        let end = bytes.len() - FOOTER_SIZE;
        let back = MghObject::from_reader(&bytes[..end]).unwrap();
        assert_eq!(back.descriptor().metadata.get_f32("TR"), None);
    }

    #[test]
    fn truncated_payload() {
        let obj = small_object();
        let mut bytes = Vec::new();
        obj.to_writer(&mut bytes).unwrap();
        match MghObject::from_reader(&bytes[..WHOLE_HEADER_SIZE + 3]) {
            Err(MghError::TruncatedInput) => {}
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn mismatched_buffer() {
        let descriptor = VolumeDescriptor::new([2, 2, 2], PixelType::Scalar(ComponentType::Uint8));
        match MghObject::new(descriptor, PixelBuffer::Uint8(vec![0; 9])) {
            Err(MghError::BufferSizeMismatch(8, 9)) => {}
            other => panic!("unexpected {:?}", other),
        }
    }
}
