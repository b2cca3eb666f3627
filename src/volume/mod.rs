//! This module defines the in-memory side of the codec: the volume
//! descriptor (geometry, pixel type and metadata) and the typed voxel
//! buffer exchanged with callers.
//!
//! An integration with `ndarray` is available through the
//! `ndarray_volumes` feature.

use crate::element::MghElement;
use crate::error::{MghError, Result};
use crate::metadata::MetaDataDictionary;
use crate::orientation;
use crate::permute;
use crate::typedef::{ComponentType, MghType, PixelType};
use nalgebra::{Matrix3, Vector3};

#[cfg(feature = "ndarray_volumes")]
pub mod ndarray;

/// In-memory description of an MGH volume.
///
/// The origin is the position of the first voxel, not the volume center
/// stored in the file; the conversion happens when the header is encoded
/// or decoded.
#[derive(Debug, Clone, PartialEq)]
pub struct VolumeDescriptor {
    /// Spatial dimensions (width, height, depth)
    pub dim: [usize; 3],
    /// Pixel type, which also determines the number of on-disk frames
    pub pixel_type: PixelType,
    /// Voxel spacing along each axis
    pub spacing: [f64; 3],
    /// Direction matrix; column `i` is the direction of axis `i`
    pub direction: Matrix3<f64>,
    /// Position of the first voxel
    pub origin: Vector3<f64>,
    /// Degrees of freedom, passed through verbatim
    pub degrees_of_freedom: i32,
    /// Scan parameters and other scalar metadata
    pub metadata: MetaDataDictionary,
}

impl VolumeDescriptor {
    /// Create a descriptor with unit spacing, identity direction and a zero
    /// origin.
    pub fn new(dim: [usize; 3], pixel_type: PixelType) -> Self {
        VolumeDescriptor {
            dim,
            pixel_type,
            spacing: [1.; 3],
            direction: Matrix3::identity(),
            origin: Vector3::zeros(),
            degrees_of_freedom: 0,
            metadata: MetaDataDictionary::new(),
        }
    }

    /// Number of voxels in one frame.
    ///
    /// # Errors
    ///
    /// - `MghError::MalformedHeader` if the count does not fit in `usize`.
    pub fn voxel_count(&self) -> Result<usize> {
        self.dim
            .iter()
            .try_fold(1usize, |acc, d| acc.checked_mul(*d))
            .ok_or_else(|| self.too_large())
    }

    fn too_large(&self) -> MghError {
        MghError::MalformedHeader(format!(
            "volume of {:?} x {} is too large",
            self.dim,
            self.components()
        ))
    }

    /// Number of components per voxel (on-disk frames).
    pub fn components(&self) -> usize {
        self.pixel_type.components()
    }

    /// Total number of scalar values in the payload.
    ///
    /// # Errors
    ///
    /// - `MghError::MalformedHeader` if the length does not fit in `usize`.
    pub fn payload_len(&self) -> Result<usize> {
        self.voxel_count()?
            .checked_mul(self.components())
            .ok_or_else(|| self.too_large())
    }

    /// The on-disk type code of this volume.
    ///
    /// # Errors
    ///
    /// - `MghError::UnsupportedPixelType` if the pixel type has no on-disk
    ///   counterpart.
    pub fn mgh_type(&self) -> Result<MghType> {
        MghType::from_pixel_type(self.pixel_type).map(|(t, _)| t)
    }

    /// Size of the payload in bytes.
    ///
    /// # Errors
    ///
    /// - `MghError::UnsupportedPixelType` if the pixel type has no on-disk
    ///   counterpart.
    /// - `MghError::MalformedHeader` if the size does not fit in `usize`.
    pub fn payload_size(&self) -> Result<usize> {
        let size_of = self.mgh_type()?.size_of();
        self.payload_len()?
            .checked_mul(size_of)
            .ok_or_else(|| self.too_large())
    }

    /// Three-letter orientation code derived from the direction matrix.
    pub fn orientation_label(&self) -> String {
        orientation::orientation_label(&self.direction)
    }
}

/// Flat buffer of voxel values, in voxel-major order: all components of
/// one voxel are adjacent, and voxels follow with x varying fastest.
#[derive(Debug, Clone, PartialEq)]
pub enum PixelBuffer {
    /// unsigned 8-bit values
    Uint8(Vec<u8>),
    /// signed 16-bit values
    Int16(Vec<i16>),
    /// signed 32-bit values
    Int32(Vec<i32>),
    /// 32-bit float values, also used for tensors
    Float32(Vec<f32>),
}

macro_rules! for_each_variant {
    ($buffer: expr, $v: ident => $body: expr) => {
        match $buffer {
            PixelBuffer::Uint8($v) => $body,
            PixelBuffer::Int16($v) => $body,
            PixelBuffer::Int32($v) => $body,
            PixelBuffer::Float32($v) => $body,
        }
    };
}

impl PixelBuffer {
    /// Create a zero-filled buffer for the given component type.
    ///
    /// # Errors
    ///
    /// - `MghError::UnsupportedPixelType` if the component type has no
    ///   on-disk counterpart.
    pub fn zeros(component: ComponentType, len: usize) -> Result<Self> {
        match component {
            ComponentType::Uint8 => Ok(PixelBuffer::Uint8(vec![0; len])),
            ComponentType::Int16 => Ok(PixelBuffer::Int16(vec![0; len])),
            ComponentType::Int32 => Ok(PixelBuffer::Int32(vec![0; len])),
            ComponentType::Float32 => Ok(PixelBuffer::Float32(vec![0.; len])),
            c => Err(MghError::UnsupportedPixelType(c.to_string())),
        }
    }

    /// Number of values in the buffer.
    pub fn len(&self) -> usize {
        for_each_variant!(self, v => v.len())
    }

    /// Whether the buffer holds no values.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Type of the values held.
    pub fn component_type(&self) -> ComponentType {
        match self {
            PixelBuffer::Uint8(_) => ComponentType::Uint8,
            PixelBuffer::Int16(_) => ComponentType::Int16,
            PixelBuffer::Int32(_) => ComponentType::Int32,
            PixelBuffer::Float32(_) => ComponentType::Float32,
        }
    }

    /// Obtain the values as a slice of `T`, if the types match.
    pub fn as_slice<T: MghElement>(&self) -> Option<&[T]> {
        T::from_buffer(self)
    }

    /// Decode a big-endian on-disk payload of the given type.
    pub fn from_raw(datatype: MghType, raw: Vec<u8>) -> Self {
        match datatype.component_type() {
            ComponentType::Uint8 => u8::into_buffer(u8::from_raw_vec(raw)),
            ComponentType::Int16 => i16::into_buffer(i16::from_raw_vec(raw)),
            ComponentType::Int32 => i32::into_buffer(i32::from_raw_vec(raw)),
            _ => f32::into_buffer(f32::from_raw_vec(raw)),
        }
    }

    /// Encode the values as big-endian bytes.
    pub fn to_raw(&self) -> Vec<u8> {
        match self {
            PixelBuffer::Uint8(v) => u8::to_raw_vec(v),
            PixelBuffer::Int16(v) => i16::to_raw_vec(v),
            PixelBuffer::Int32(v) => i32::to_raw_vec(v),
            PixelBuffer::Float32(v) => f32::to_raw_vec(v),
        }
    }

    /// Reorder from voxel-major to frame-major layout.
    ///
    /// # Errors
    ///
    /// - `MghError::BufferSizeMismatch` if the buffer length is not
    ///   `product(dim) * components`.
    pub fn to_on_disk(&self, dim: &[usize], components: usize) -> Result<Self> {
        Ok(match self {
            PixelBuffer::Uint8(v) => PixelBuffer::Uint8(permute::to_on_disk(v, dim, components)?),
            PixelBuffer::Int16(v) => PixelBuffer::Int16(permute::to_on_disk(v, dim, components)?),
            PixelBuffer::Int32(v) => PixelBuffer::Int32(permute::to_on_disk(v, dim, components)?),
            PixelBuffer::Float32(v) => {
                PixelBuffer::Float32(permute::to_on_disk(v, dim, components)?)
            }
        })
    }

    /// Reorder from frame-major to voxel-major layout.
    ///
    /// # Errors
    ///
    /// - `MghError::BufferSizeMismatch` if the buffer length is not
    ///   `product(dim) * components`.
    pub fn to_in_memory(&self, dim: &[usize], components: usize) -> Result<Self> {
        Ok(match self {
            PixelBuffer::Uint8(v) => {
                PixelBuffer::Uint8(permute::to_in_memory(v, dim, components)?)
            }
            PixelBuffer::Int16(v) => {
                PixelBuffer::Int16(permute::to_in_memory(v, dim, components)?)
            }
            PixelBuffer::Int32(v) => {
                PixelBuffer::Int32(permute::to_in_memory(v, dim, components)?)
            }
            PixelBuffer::Float32(v) => {
                PixelBuffer::Float32(permute::to_in_memory(v, dim, components)?)
            }
        })
    }

    /// Check that this buffer can hold the payload of the given volume.
    ///
    /// # Errors
    ///
    /// - `MghError::UnsupportedPixelType` if the value type differs from
    ///   the volume's component type.
    /// - `MghError::BufferSizeMismatch` if the number of values differs.
    /// - `MghError::MalformedHeader` if the volume is too large to address.
    pub fn check_against(&self, descriptor: &VolumeDescriptor) -> Result<()> {
        let expected_type = descriptor.mgh_type()?.component_type();
        if self.component_type() != expected_type {
            return Err(MghError::UnsupportedPixelType(format!(
                "buffer of {} for a volume of {}",
                self.component_type(),
                descriptor.pixel_type
            )));
        }
        let expected = descriptor.payload_len()?;
        if self.len() != expected {
            return Err(MghError::BufferSizeMismatch(expected, self.len()));
        }
        Ok(())
    }
}

impl<T: MghElement> From<Vec<T>> for PixelBuffer {
    fn from(values: Vec<T>) -> Self {
        T::into_buffer(values)
    }
}
