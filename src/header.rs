//! This module defines the `MghHeader` struct, which holds the fixed-size
//! header found at the start of every MGH file.
//!
//! The header is always big-endian and made of three blocks:
//!
//! - the dimension block (version, four dimensions, type code and degrees
//!   of freedom, 28 bytes);
//! - the RAS block (a validity flag, spacing, direction cosines and the
//!   RAS coordinate of the volume center, 62 bytes);
//! - an unused trailer which pads the last two blocks to 256 bytes. Scan
//!   parameters are kept in the first bytes of the trailer.
//!
//! The voxel payload starts right after, at byte 284.

use crate::element::{read_typed, write_typed};
use crate::error::{MghError, Result};
use crate::metadata::{self, MetaDataDictionary, MetaDataStore};
use crate::orientation;
use crate::stream::MghReader;
use crate::typedef::MghType;
use crate::util::read_up_to;
use crate::volume::VolumeDescriptor;
use std::convert::TryFrom;
use std::io::{Read, Write};
use std::path::Path;
use tracing::{debug, trace};

/// The only version code of the format.
pub const MGH_VERSION: i32 = 1;
/// Size of the dimension block: seven 32-bit integers.
pub const DIMENSION_HEADER_SIZE: usize = 4 * 7;
/// Size of the RAS block: one 16-bit flag and fifteen 32-bit floats.
pub const RAS_HEADER_SIZE: usize = 2 + 4 * 15;
/// Size of the unused trailer, which pads the RAS block to 256 bytes.
pub const UNUSED_HEADER_SIZE: usize = 256 - RAS_HEADER_SIZE;
/// Size of the whole header, which is also the offset of the payload.
pub const WHOLE_HEADER_SIZE: usize = DIMENSION_HEADER_SIZE + RAS_HEADER_SIZE + UNUSED_HEADER_SIZE;

/// The MGH header data type.
/// All fields are public and named after the format's header layout.
///
/// # Examples
///
/// ```no_run
/// use mgh::MghHeader;
/// # use mgh::Result;
///
/// # fn run() -> Result<()> {
/// let hdr1 = MghHeader::from_file("orig.mgz")?;
/// let hdr2 = MghHeader::from_file("stat.mgh")?;
/// println!("{:?} {:?}", hdr1.dim, hdr2.data_type()?);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct MghHeader {
    /// Format version, 1 for every known file
    pub version: i32,
    /// Width, height, depth and number of frames
    pub dim: [i32; 4],
    /// On-disk type code
    pub datatype: i32,
    /// Degrees of freedom
    pub dof: i32,
    /// Non-zero if the RAS block below is valid
    pub good_ras_flag: i16,
    /// Voxel spacing along each axis
    pub spacing: [f32; 3],
    /// Direction cosines of the first axis (x_r, x_a, x_s)
    pub x_ras: [f32; 3],
    /// Direction cosines of the second axis (y_r, y_a, y_s)
    pub y_ras: [f32; 3],
    /// Direction cosines of the third axis (z_r, z_a, z_s)
    pub z_ras: [f32; 3],
    /// RAS coordinate of the volume center (c_r, c_a, c_s)
    pub c_ras: [f32; 3],
    /// Raw bytes of the unused trailer, `UNUSED_HEADER_SIZE` long
    pub trailer: Vec<u8>,
}

impl Default for MghHeader {
    fn default() -> MghHeader {
        let direction = orientation::default_direction();
        let mut cosines = [[0f32; 3]; 3];
        for (axis, cosine) in cosines.iter_mut().enumerate() {
            for (row, v) in cosine.iter_mut().enumerate() {
                *v = direction[(row, axis)] as f32;
            }
        }
        MghHeader {
            version: MGH_VERSION,
            dim: [1, 1, 1, 1],
            datatype: MghType::Uchar.code(),
            dof: 0,
            good_ras_flag: 0,
            spacing: [1.; 3],
            x_ras: cosines[0],
            y_ras: cosines[1],
            z_ras: cosines[2],
            c_ras: [0.; 3],
            trailer: vec![0; UNUSED_HEADER_SIZE],
        }
    }
}

impl MghHeader {
    /// Retrieve an MGH header from a file in the file system.
    /// If the file's name ends with ".mgz" or ".gz", the file is assumed
    /// to need gzip decoding.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<MghHeader> {
        let mut reader = MghReader::open(path)?;
        let header = MghHeader::from_reader(&mut reader).map_err(|e| reader.classify(e))?;
        reader.close();
        Ok(header)
    }

    /// Read an MGH header from the given byte stream.
    /// It is assumed that the input is currently at the start of the header.
    ///
    /// A stream ending right after the dimension block yields a header
    /// with the default geometry. Otherwise the RAS block and the trailer
    /// must be complete, whether or not the RAS flag is set.
    ///
    /// # Errors
    ///
    /// - `MghError::MalformedHeader` if the dimension block or the RAS block
    ///   is cut short, a dimension is not positive, or the type code is
    ///   unknown.
    /// - `MghError::TruncatedInput` if the trailer is cut short.
    pub fn from_reader<S: Read>(mut input: S) -> Result<MghHeader> {
        let mut h = MghHeader::default();

        let mut dim_block = [0u8; DIMENSION_HEADER_SIZE];
        let n = read_up_to(&mut input, &mut dim_block)?;
        if n < DIMENSION_HEADER_SIZE {
            return Err(MghError::MalformedHeader(format!(
                "dimension block has {} of {} bytes",
                n, DIMENSION_HEADER_SIZE
            )));
        }
        let mut src = &dim_block[..];
        h.version = read_typed(&mut src)?;
        for d in &mut h.dim {
            *d = read_typed(&mut src)?;
        }
        h.datatype = read_typed(&mut src)?;
        h.dof = read_typed(&mut src)?;
        let _ = h.dim()?;
        let _ = MghType::from_code(h.datatype)
            .map_err(|_| MghError::MalformedHeader(format!("unknown type code {}", h.datatype)))?;

        let mut rest = vec![0u8; RAS_HEADER_SIZE + UNUSED_HEADER_SIZE];
        let n = read_up_to(&mut input, &mut rest)?;
        if n == 0 {
            debug!("MGH header without RAS block, assuming default geometry");
            return Ok(h);
        }
        if n < RAS_HEADER_SIZE {
            return Err(MghError::MalformedHeader(format!(
                "RAS block has {} of {} bytes",
                n, RAS_HEADER_SIZE
            )));
        }
        let mut src = &rest[..];
        h.good_ras_flag = read_typed(&mut src)?;
        if h.good_ras_flag != 0 {
            for v in h
                .spacing
                .iter_mut()
                .chain(&mut h.x_ras)
                .chain(&mut h.y_ras)
                .chain(&mut h.z_ras)
                .chain(&mut h.c_ras)
            {
                *v = read_typed(&mut src)?;
            }
        }
        if n < rest.len() {
            return Err(MghError::TruncatedInput);
        }
        h.trailer = rest.split_off(RAS_HEADER_SIZE);

        trace!(
            dim = ?h.dim,
            datatype = h.datatype,
            good_ras = h.good_ras_flag,
            "decoded MGH header"
        );
        Ok(h)
    }

    /// Write this header to the given byte sink. The output is always
    /// `WHOLE_HEADER_SIZE` bytes long, and the RAS flag is always set.
    pub fn write_to<W: Write>(&self, mut dst: W) -> Result<()> {
        write_typed(&mut dst, self.version)?;
        for d in &self.dim {
            write_typed(&mut dst, *d)?;
        }
        write_typed(&mut dst, self.datatype)?;
        write_typed(&mut dst, self.dof)?;
        write_typed(&mut dst, 1i16)?;
        for v in self
            .spacing
            .iter()
            .chain(&self.x_ras)
            .chain(&self.y_ras)
            .chain(&self.z_ras)
            .chain(&self.c_ras)
        {
            write_typed(&mut dst, *v)?;
        }
        let mut trailer = [0u8; UNUSED_HEADER_SIZE];
        let len = self.trailer.len().min(UNUSED_HEADER_SIZE);
        trailer[..len].copy_from_slice(&self.trailer[..len]);
        dst.write_all(&trailer)?;
        Ok(())
    }

    /// Serialize this header into a vector of bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(WHOLE_HEADER_SIZE);
        let written = self.write_to(&mut out);
        debug_assert!(written.is_ok(), "writing to a vector failed: {:?}", written);
        out
    }

    /// Get the four dimensions as validated sizes.
    ///
    /// # Errors
    ///
    /// - `MghError::MalformedHeader` if any dimension is smaller than 1.
    pub fn dim(&self) -> Result<[usize; 4]> {
        let mut out = [0usize; 4];
        for (o, d) in out.iter_mut().zip(&self.dim) {
            *o = usize::try_from(*d)
                .ok()
                .filter(|d| *d > 0)
                .ok_or_else(|| MghError::MalformedHeader(format!("invalid dimensions {:?}", self.dim)))?;
        }
        Ok(out)
    }

    /// Get the data type as a validated enum.
    pub fn data_type(&self) -> Result<MghType> {
        MghType::from_code(self.datatype)
    }

    /// Size of the voxel payload following this header, in bytes.
    ///
    /// # Errors
    ///
    /// - `MghError::MalformedHeader` if the dimensions are invalid or the
    ///   size does not fit in memory.
    pub fn payload_size(&self) -> Result<usize> {
        let size_of = self.data_type()?.size_of();
        self.dim()?
            .iter()
            .try_fold(size_of, |acc, d| acc.checked_mul(*d))
            .ok_or_else(|| MghError::MalformedHeader(format!("payload of {:?} is too large", self.dim)))
    }

    /// Scan parameters held in the trailer.
    pub fn scan_parameters(&self) -> MetaDataDictionary {
        metadata::unpack(&self.trailer)
    }

    /// Store the recognized scan parameters of `meta` in the trailer.
    pub fn set_scan_parameters<M: MetaDataStore + ?Sized>(&mut self, meta: &M) {
        self.trailer.resize(UNUSED_HEADER_SIZE, 0);
        metadata::overlay(meta, &mut self.trailer);
    }

    /// Build the header describing the given volume.
    ///
    /// # Errors
    ///
    /// - `MghError::UnsupportedPixelType` if the pixel type has no on-disk
    ///   counterpart.
    /// - `MghError::MalformedHeader` if a dimension is zero or too large,
    ///   the payload size overflows, or the spacing is not finite.
    pub fn from_descriptor(descriptor: &VolumeDescriptor) -> Result<MghHeader> {
        let (datatype, frames) = MghType::from_pixel_type(descriptor.pixel_type)?;

        let mut dim = [0i32; 4];
        for (d, size) in dim
            .iter_mut()
            .zip(descriptor.dim.iter().chain(std::iter::once(&frames)))
        {
            *d = i32::try_from(*size).ok().filter(|d| *d > 0).ok_or_else(|| {
                MghError::MalformedHeader(format!(
                    "invalid dimensions {:?} x {}",
                    descriptor.dim, frames
                ))
            })?;
        }
        if descriptor.spacing.iter().any(|s| !s.is_finite()) {
            return Err(MghError::MalformedHeader(format!(
                "spacing {:?} is not finite",
                descriptor.spacing
            )));
        }

        let (cosines, c_ras) = orientation::to_header(
            &descriptor.direction,
            &descriptor.spacing,
            &descriptor.origin,
            &descriptor.dim,
        );
        let header = MghHeader {
            version: MGH_VERSION,
            dim,
            datatype: datatype.code(),
            dof: descriptor.degrees_of_freedom,
            good_ras_flag: 1,
            spacing: [
                descriptor.spacing[0] as f32,
                descriptor.spacing[1] as f32,
                descriptor.spacing[2] as f32,
            ],
            x_ras: cosines[0],
            y_ras: cosines[1],
            z_ras: cosines[2],
            c_ras,
            trailer: metadata::pack(&descriptor.metadata),
        };
        let _ = header.payload_size()?;
        Ok(header)
    }

    /// Build the in-memory descriptor of the volume this header describes.
    ///
    /// # Errors
    ///
    /// - `MghError::MalformedHeader` if the dimensions are invalid, or a
    ///   tensor volume does not have three frames.
    /// - `MghError::UnsupportedPixelType` if the type code is unknown.
    pub fn to_descriptor(&self) -> Result<VolumeDescriptor> {
        let [w, h, d, frames] = self.dim()?;
        let dim = [w, h, d];
        let pixel_type = self.data_type()?.to_pixel_type(frames)?;
        let (direction, origin) = orientation::from_header(
            &self.spacing,
            &[self.x_ras, self.y_ras, self.z_ras],
            &self.c_ras,
            &dim,
        );
        Ok(VolumeDescriptor {
            dim,
            pixel_type,
            spacing: [
                f64::from(self.spacing[0]),
                f64::from(self.spacing[1]),
                f64::from(self.spacing[2]),
            ],
            direction,
            origin,
            degrees_of_freedom: self.dof,
            metadata: self.scan_parameters(),
        })
    }
}
