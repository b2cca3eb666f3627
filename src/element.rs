//! This module defines the data element API, which converts the four scalar
//! widths stored in MGH files between host order and the big-endian order
//! of the format.
//!
//! Every multi-byte value in an MGH file is big-endian, regardless of the
//! machine that wrote it, so conversions here never need to guess a byte
//! order.
use crate::typedef::ComponentType;
use crate::volume::PixelBuffer;
use byteordered::ByteOrdered;
use bytemuck::Pod;
use std::fmt::Debug;
use std::io::{Read, Result as IoResult, Write};

/// Trait type for characterizing an MGH data element, implemented for the
/// primitive numeric types stored on disk (`u8`, `i16`, `i32` and `f32`).
pub trait MghElement: 'static + Sized + Copy + Pod + PartialEq + Debug {
    /// The component type mapped to the type `Self`.
    const COMPONENT_TYPE: ComponentType;

    /// Read a single big-endian element from the given byte source.
    fn read_be<R: Read>(src: R) -> IoResult<Self>;

    /// Write a single element to the given byte sink in big-endian order.
    fn write_be<W: Write>(self, dst: W) -> IoResult<()>;

    /// Reinterpret a value read verbatim from big-endian memory as a
    /// native value. This is its own inverse.
    fn swap_be(self) -> Self;

    /// Wrap a vector of elements into a pixel buffer.
    fn into_buffer(values: Vec<Self>) -> PixelBuffer;

    /// Obtain the elements of a pixel buffer of the same type.
    fn from_buffer(buffer: &PixelBuffer) -> Option<&[Self]>;

    /// Transform a vector of big-endian bytes into a vector of data elements.
    /// Trailing bytes which do not make up a full element are ignored.
    fn from_raw_vec(vec: Vec<u8>) -> Vec<Self> {
        let size = std::mem::size_of::<Self>();
        let whole = vec.len() - vec.len() % size;
        let mut values: Vec<Self> = bytemuck::allocation::pod_collect_to_vec(&vec[..whole]);
        for v in &mut values {
            *v = v.swap_be();
        }
        values
    }

    /// Serialize a slice of data elements into big-endian bytes.
    fn to_raw_vec(values: &[Self]) -> Vec<u8> {
        let swapped: Vec<Self> = values.iter().map(|v| v.swap_be()).collect();
        bytemuck::cast_slice::<Self, u8>(&swapped).to_vec()
    }
}

impl MghElement for u8 {
    const COMPONENT_TYPE: ComponentType = ComponentType::Uint8;

    fn read_be<R: Read>(src: R) -> IoResult<Self> {
        ByteOrdered::be(src).read_u8()
    }
    fn write_be<W: Write>(self, dst: W) -> IoResult<()> {
        ByteOrdered::be(dst).write_u8(self)
    }
    fn swap_be(self) -> Self {
        self
    }
    fn into_buffer(values: Vec<Self>) -> PixelBuffer {
        PixelBuffer::Uint8(values)
    }
    fn from_buffer(buffer: &PixelBuffer) -> Option<&[Self]> {
        match buffer {
            PixelBuffer::Uint8(v) => Some(v),
            _ => None,
        }
    }
    fn from_raw_vec(vec: Vec<u8>) -> Vec<Self> {
        vec
    }
    fn to_raw_vec(values: &[Self]) -> Vec<u8> {
        values.to_vec()
    }
}

impl MghElement for i16 {
    const COMPONENT_TYPE: ComponentType = ComponentType::Int16;

    fn read_be<R: Read>(src: R) -> IoResult<Self> {
        ByteOrdered::be(src).read_i16()
    }
    fn write_be<W: Write>(self, dst: W) -> IoResult<()> {
        ByteOrdered::be(dst).write_i16(self)
    }
    fn swap_be(self) -> Self {
        i16::from_be(self)
    }
    fn into_buffer(values: Vec<Self>) -> PixelBuffer {
        PixelBuffer::Int16(values)
    }
    fn from_buffer(buffer: &PixelBuffer) -> Option<&[Self]> {
        match buffer {
            PixelBuffer::Int16(v) => Some(v),
            _ => None,
        }
    }
}

impl MghElement for i32 {
    const COMPONENT_TYPE: ComponentType = ComponentType::Int32;

    fn read_be<R: Read>(src: R) -> IoResult<Self> {
        ByteOrdered::be(src).read_i32()
    }
    fn write_be<W: Write>(self, dst: W) -> IoResult<()> {
        ByteOrdered::be(dst).write_i32(self)
    }
    fn swap_be(self) -> Self {
        i32::from_be(self)
    }
    fn into_buffer(values: Vec<Self>) -> PixelBuffer {
        PixelBuffer::Int32(values)
    }
    fn from_buffer(buffer: &PixelBuffer) -> Option<&[Self]> {
        match buffer {
            PixelBuffer::Int32(v) => Some(v),
            _ => None,
        }
    }
}

impl MghElement for f32 {
    const COMPONENT_TYPE: ComponentType = ComponentType::Float32;

    fn read_be<R: Read>(src: R) -> IoResult<Self> {
        ByteOrdered::be(src).read_f32()
    }
    fn write_be<W: Write>(self, dst: W) -> IoResult<()> {
        ByteOrdered::be(dst).write_f32(self)
    }
    fn swap_be(self) -> Self {
        f32::from_bits(u32::from_be(self.to_bits()))
    }
    fn into_buffer(values: Vec<Self>) -> PixelBuffer {
        PixelBuffer::Float32(values)
    }
    fn from_buffer(buffer: &PixelBuffer) -> Option<&[Self]> {
        match buffer {
            PixelBuffer::Float32(v) => Some(v),
            _ => None,
        }
    }
}

/// Encode a single value into its big-endian bytes.
pub fn encode<T: MghElement>(value: T) -> Vec<u8> {
    T::to_raw_vec(&[value])
}

/// Decode a single value from its big-endian bytes.
///
/// Returns `None` if `bytes` is not exactly as long as `T`.
pub fn decode<T: MghElement>(bytes: &[u8]) -> Option<T> {
    if bytes.len() != std::mem::size_of::<T>() {
        return None;
    }
    T::from_raw_vec(bytes.to_vec()).pop()
}

/// Read one value of the on-disk type `T` from a stream.
pub fn read_typed<T: MghElement, R: Read>(src: R) -> IoResult<T> {
    T::read_be(src)
}

/// Write one value of the on-disk type `T` to a stream.
pub fn write_typed<T: MghElement, W: Write>(dst: W, value: T) -> IoResult<()> {
    value.write_be(dst)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn big_endian_layout() {
        assert_eq!(encode(0x0102_0304_i32), vec![1, 2, 3, 4]);
        assert_eq!(encode(-2_i16), vec![0xFF, 0xFE]);
        assert_eq!(encode(1.0_f32), vec![0x3F, 0x80, 0, 0]);
        assert_eq!(encode(200_u8), vec![200]);
    }

    #[test]
    fn decode_inverts_encode() {
        for v in &[0, 1, -1, i32::MIN, i32::MAX, 123_456_789] {
            assert_eq!(decode::<i32>(&encode(*v)), Some(*v));
        }
        for v in &[0, 1, -1, i16::MIN, i16::MAX] {
            assert_eq!(decode::<i16>(&encode(*v)), Some(*v));
        }
        for v in &[0., -0., 1.5, f32::MIN_POSITIVE, f32::MAX, -321.25] {
            let back = decode::<f32>(&encode(*v)).unwrap();
            assert_eq!(back.to_bits(), v.to_bits());
        }
        let bytes = [0x7F, 0xC0, 0x00, 0x01];
        let v: f32 = decode(&bytes).unwrap();
        assert!(v.is_nan());
        assert_eq!(encode(v), bytes.to_vec());
        assert_eq!(decode::<i32>(&[1, 2, 3]), None);
    }

    #[test]
    fn raw_vec_roundtrip() {
        let values = vec![1i16, -300, 4000, i16::MIN];
        let raw = i16::to_raw_vec(&values);
        assert_eq!(&raw[..4], &[0x00, 0x01, 0xFE, 0xD4]);
        assert_eq!(i16::from_raw_vec(raw), values);

        let floats = vec![0.25f32, -8.5, 1e-9];
        assert_eq!(f32::from_raw_vec(f32::to_raw_vec(&floats)), floats);
    }

    #[test]
    fn typed_stream_helpers() {
        let mut out = Vec::new();
        write_typed(&mut out, 7i32).unwrap();
        write_typed(&mut out, 0.5f32).unwrap();
        write_typed(&mut out, -1i16).unwrap();
        write_typed(&mut out, 9u8).unwrap();
        assert_eq!(out.len(), 11);

        let mut src = &out[..];
        assert_eq!(read_typed::<i32, _>(&mut src).unwrap(), 7);
        assert_eq!(read_typed::<f32, _>(&mut src).unwrap(), 0.5);
        assert_eq!(read_typed::<i16, _>(&mut src).unwrap(), -1);
        assert_eq!(read_typed::<u8, _>(&mut src).unwrap(), 9);
        assert!(read_typed::<u8, _>(&mut src).is_err());
    }
}
