//! This module contains the on-disk type codes of the MGH format and the
//! in-memory pixel types they map to.
//!
//! The format only knows a handful of type codes ([`MghType`]), while a
//! caller may describe its pixels with any [`PixelType`]. The conversion
//! between both is partial: only the pixel types with a direct on-disk
//! counterpart are accepted.
//!
//! [`MghType`]: ./enum.MghType.html
//! [`PixelType`]: ./enum.PixelType.html

use crate::error::{MghError, Result};
use num_traits::FromPrimitive;
use std::fmt;

/// Number of frames used to store a tensor volume, one per independent
/// component (xx, xy, xz).
pub const TENSOR_FRAMES: usize = 3;

/// Data type for representing an MGH value type in a volume.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, FromPrimitive)]
pub enum MghType {
    /// unsigned char.
    // MRI_UCHAR      0
    Uchar = 0,
    /// signed 32-bit int.
    // MRI_INT        1
    Int = 1,
    /// 32 bit float.
    // MRI_FLOAT      3
    Float = 3,
    /// signed short.
    // MRI_SHORT      4
    Short = 4,
    /// 32 bit float tensor, one frame per component.
    // MRI_TENSOR     6
    Tensor = 6,
}

impl MghType {
    /// Validate a raw type code.
    ///
    /// # Errors
    ///
    /// - `MghError::UnsupportedPixelType` if the code is not one of the
    ///   five codes known to the format.
    pub fn from_code(code: i32) -> Result<MghType> {
        FromPrimitive::from_i32(code)
            .ok_or_else(|| MghError::UnsupportedPixelType(format!("type code {}", code)))
    }

    /// The raw code stored in the header.
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Retrieve the size of a single on-disk value of this data type, in bytes.
    /// Tensors are stored as float frames, so their size is that of one float.
    pub fn size_of(self) -> usize {
        match self {
            MghType::Uchar => 1,
            MghType::Short => 2,
            MghType::Int | MghType::Float | MghType::Tensor => 4,
        }
    }

    /// The scalar type of each on-disk value.
    pub fn component_type(self) -> ComponentType {
        match self {
            MghType::Uchar => ComponentType::Uint8,
            MghType::Int => ComponentType::Int32,
            MghType::Float | MghType::Tensor => ComponentType::Float32,
            MghType::Short => ComponentType::Int16,
        }
    }

    /// Map an in-memory pixel type to its type code and number of frames.
    ///
    /// # Errors
    ///
    /// - `MghError::UnsupportedPixelType` if the pixel type cannot be
    ///   represented in an MGH file.
    pub fn from_pixel_type(pixel: PixelType) -> Result<(MghType, usize)> {
        let unsupported = || MghError::UnsupportedPixelType(pixel.to_string());
        match pixel {
            PixelType::Scalar(c) => Self::from_component_type(c)
                .map(|t| (t, 1))
                .ok_or_else(unsupported),
            PixelType::Vector(_, 0) => Err(unsupported()),
            PixelType::Vector(c, n) => Self::from_component_type(c)
                .map(|t| (t, n))
                .ok_or_else(unsupported),
            PixelType::Tensor(ComponentType::Float32) => Ok((MghType::Tensor, TENSOR_FRAMES)),
            PixelType::Tensor(_) => Err(unsupported()),
        }
    }

    /// Map this type code, along with the number of frames in the file, to
    /// the in-memory pixel type. A scalar code with more than one frame
    /// becomes a vector pixel.
    ///
    /// # Errors
    ///
    /// - `MghError::MalformedHeader` if a tensor volume does not have
    ///   exactly three frames, or if `frames` is zero.
    pub fn to_pixel_type(self, frames: usize) -> Result<PixelType> {
        if frames == 0 {
            return Err(MghError::malformed("volume has no frames"));
        }
        match self {
            MghType::Tensor if frames == TENSOR_FRAMES => {
                Ok(PixelType::Tensor(ComponentType::Float32))
            }
            MghType::Tensor => Err(MghError::MalformedHeader(format!(
                "tensor volume with {} frames",
                frames
            ))),
            t if frames == 1 => Ok(PixelType::Scalar(t.component_type())),
            t => Ok(PixelType::Vector(t.component_type(), frames)),
        }
    }

    fn from_component_type(c: ComponentType) -> Option<MghType> {
        match c {
            ComponentType::Uint8 => Some(MghType::Uchar),
            ComponentType::Int32 => Some(MghType::Int),
            ComponentType::Float32 => Some(MghType::Float),
            ComponentType::Int16 => Some(MghType::Short),
            _ => None,
        }
    }
}

/// Scalar type of a single pixel component in memory.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum ComponentType {
    /// unsigned 8-bit integer
    Uint8,
    /// signed 8-bit integer
    Int8,
    /// unsigned 16-bit integer
    Uint16,
    /// signed 16-bit integer
    Int16,
    /// unsigned 32-bit integer
    Uint32,
    /// signed 32-bit integer
    Int32,
    /// unsigned 64-bit integer
    Uint64,
    /// signed 64-bit integer
    Int64,
    /// 32-bit float
    Float32,
    /// 64-bit float
    Float64,
}

impl ComponentType {
    /// Size of one component, in bytes.
    pub fn size_of(self) -> usize {
        use self::ComponentType::*;
        match self {
            Uint8 | Int8 => 1,
            Uint16 | Int16 => 2,
            Uint32 | Int32 | Float32 => 4,
            Uint64 | Int64 | Float64 => 8,
        }
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use self::ComponentType::*;
        let name = match self {
            Uint8 => "u8",
            Int8 => "i8",
            Uint16 => "u16",
            Int16 => "i16",
            Uint32 => "u32",
            Int32 => "i32",
            Uint64 => "u64",
            Int64 => "i64",
            Float32 => "f32",
            Float64 => "f64",
        };
        f.write_str(name)
    }
}

/// In-memory description of a pixel: its component type and how many
/// components make up one voxel.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum PixelType {
    /// A single value per voxel.
    Scalar(ComponentType),
    /// A fixed number of values per voxel, stored as frames on disk.
    Vector(ComponentType, usize),
    /// The three independent components (xx, xy, xz) of a tensor.
    Tensor(ComponentType),
}

impl PixelType {
    /// The type of each component.
    pub fn component_type(&self) -> ComponentType {
        match *self {
            PixelType::Scalar(c) | PixelType::Vector(c, _) | PixelType::Tensor(c) => c,
        }
    }

    /// Number of components per voxel.
    pub fn components(&self) -> usize {
        match *self {
            PixelType::Scalar(_) => 1,
            PixelType::Vector(_, n) => n,
            PixelType::Tensor(_) => TENSOR_FRAMES,
        }
    }
}

impl fmt::Display for PixelType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PixelType::Scalar(c) => write!(f, "scalar {}", c),
            PixelType::Vector(c, n) => write!(f, "vector of {} x {}", n, c),
            PixelType::Tensor(c) => write!(f, "tensor of {}", c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes() {
        assert_eq!(MghType::from_code(0).unwrap(), MghType::Uchar);
        assert_eq!(MghType::from_code(1).unwrap(), MghType::Int);
        assert_eq!(MghType::from_code(3).unwrap(), MghType::Float);
        assert_eq!(MghType::from_code(4).unwrap(), MghType::Short);
        assert_eq!(MghType::from_code(6).unwrap(), MghType::Tensor);
        for bad in &[-1, 2, 5, 7, 16, 1000] {
            match MghType::from_code(*bad) {
                Err(MghError::UnsupportedPixelType(_)) => {}
                other => panic!("code {} gave {:?}", bad, other),
            }
        }
    }

    #[test]
    fn sizes() {
        assert_eq!(MghType::Uchar.size_of(), 1);
        assert_eq!(MghType::Int.size_of(), 4);
        assert_eq!(MghType::Float.size_of(), 4);
        assert_eq!(MghType::Short.size_of(), 2);
        assert_eq!(MghType::Tensor.size_of(), 4);
    }

    #[test]
    fn pixel_type_mapping() {
        assert_eq!(
            MghType::from_pixel_type(PixelType::Scalar(ComponentType::Uint8)).unwrap(),
            (MghType::Uchar, 1)
        );
        assert_eq!(
            MghType::from_pixel_type(PixelType::Vector(ComponentType::Int16, 5)).unwrap(),
            (MghType::Short, 5)
        );
        assert_eq!(
            MghType::from_pixel_type(PixelType::Tensor(ComponentType::Float32)).unwrap(),
            (MghType::Tensor, 3)
        );

        for bad in &[
            PixelType::Scalar(ComponentType::Float64),
            PixelType::Scalar(ComponentType::Uint16),
            PixelType::Vector(ComponentType::Float32, 0),
            PixelType::Tensor(ComponentType::Float64),
        ] {
            assert!(MghType::from_pixel_type(*bad).is_err(), "{} accepted", bad);
        }
    }

    #[test]
    fn back_to_pixel_type() {
        assert_eq!(
            MghType::Float.to_pixel_type(1).unwrap(),
            PixelType::Scalar(ComponentType::Float32)
        );
        assert_eq!(
            MghType::Uchar.to_pixel_type(4).unwrap(),
            PixelType::Vector(ComponentType::Uint8, 4)
        );
        assert_eq!(
            MghType::Tensor.to_pixel_type(3).unwrap(),
            PixelType::Tensor(ComponentType::Float32)
        );
        assert!(MghType::Tensor.to_pixel_type(1).is_err());
        assert!(MghType::Int.to_pixel_type(0).is_err());
    }
}
