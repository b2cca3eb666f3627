//! Scan parameters carried by MGH files.
//!
//! The header has no room for arbitrary metadata. Five acquisition
//! parameters have a fixed float slot at the start of the unused header
//! trailer, and FreeSurfer also appends the same five floats right after
//! the voxel payload. A slot holding zero is read back as absent.

use crate::header::UNUSED_HEADER_SIZE;
use byteordered::ByteOrdered;
use std::collections::{BTreeMap, HashMap};
use std::io::{Result as IoResult, Write};

/// Metadata mapping used by volume descriptors.
pub type MetaDataDictionary = BTreeMap<String, f32>;

/// Size in bytes of the scan parameter footer following the payload.
pub const FOOTER_SIZE: usize = 4 * 5;

/// Interface of a key-value store of scalar metadata.
pub trait MetaDataStore {
    /// Retrieve a value by key.
    fn get_f32(&self, key: &str) -> Option<f32>;

    /// Insert or replace a value.
    fn set_f32(&mut self, key: &str, value: f32);
}

impl MetaDataStore for BTreeMap<String, f32> {
    fn get_f32(&self, key: &str) -> Option<f32> {
        self.get(key).copied()
    }

    fn set_f32(&mut self, key: &str, value: f32) {
        let _ = self.insert(key.to_string(), value);
    }
}

impl MetaDataStore for HashMap<String, f32> {
    fn get_f32(&self, key: &str) -> Option<f32> {
        self.get(key).copied()
    }

    fn set_f32(&mut self, key: &str, value: f32) {
        let _ = self.insert(key.to_string(), value);
    }
}

/// The acquisition parameters that fit in an MGH file.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum ScanParameter {
    /// Repetition time
    RepetitionTime,
    /// Flip angle
    FlipAngle,
    /// Echo time
    EchoTime,
    /// Inversion time
    InversionTime,
    /// Field of view
    FieldOfView,
}

impl ScanParameter {
    /// All parameters, in slot order.
    pub const ALL: [ScanParameter; 5] = [
        ScanParameter::RepetitionTime,
        ScanParameter::FlipAngle,
        ScanParameter::EchoTime,
        ScanParameter::InversionTime,
        ScanParameter::FieldOfView,
    ];

    /// Metadata key under which the parameter is stored.
    pub fn key(self) -> &'static str {
        match self {
            ScanParameter::RepetitionTime => "TR",
            ScanParameter::FlipAngle => "FlipAngle",
            ScanParameter::EchoTime => "TE",
            ScanParameter::InversionTime => "TI",
            ScanParameter::FieldOfView => "FoV",
        }
    }

    /// Byte offset of the parameter's slot, relative to the start of the
    /// header trailer (and of the footer).
    pub fn offset(self) -> usize {
        match self {
            ScanParameter::RepetitionTime => 0,
            ScanParameter::FlipAngle => 4,
            ScanParameter::EchoTime => 8,
            ScanParameter::InversionTime => 12,
            ScanParameter::FieldOfView => 16,
        }
    }
}

fn put_slot(bytes: &mut [u8], offset: usize, value: f32) {
    bytes[offset..offset + 4].copy_from_slice(&value.to_be_bytes());
}

fn get_slot(bytes: &[u8], offset: usize) -> Option<f32> {
    let raw = bytes.get(offset..offset + 4)?;
    let value = f32::from_be_bytes([raw[0], raw[1], raw[2], raw[3]]);
    if value == 0. {
        None
    } else {
        Some(value)
    }
}

/// Build the header trailer for the given metadata. The result is always
/// `UNUSED_HEADER_SIZE` bytes long; missing keys leave their slot zeroed and
/// unrecognized keys are dropped.
pub fn pack<M: MetaDataStore + ?Sized>(metadata: &M) -> Vec<u8> {
    let mut trailer = vec![0u8; UNUSED_HEADER_SIZE];
    overlay(metadata, &mut trailer);
    trailer
}

/// Write the recognized parameters of `metadata` into their slots of an
/// existing trailer, leaving other bytes untouched.
pub fn overlay<M: MetaDataStore + ?Sized>(metadata: &M, trailer: &mut [u8]) {
    for p in &ScanParameter::ALL {
        if let Some(v) = metadata.get_f32(p.key()) {
            if trailer.len() >= p.offset() + 4 {
                put_slot(trailer, p.offset(), v);
            }
        }
    }
}

/// Extract the scan parameters held in a header trailer. Only non-zero
/// slots produce an entry.
pub fn unpack(trailer: &[u8]) -> MetaDataDictionary {
    let mut metadata = MetaDataDictionary::new();
    for p in &ScanParameter::ALL {
        if let Some(v) = get_slot(trailer, p.offset()) {
            metadata.set_f32(p.key(), v);
        }
    }
    metadata
}

/// Write the five-float footer that follows the voxel payload.
pub fn write_footer<M, W>(metadata: &M, dst: W) -> IoResult<()>
where
    M: MetaDataStore + ?Sized,
    W: Write,
{
    let mut dst = ByteOrdered::be(dst);
    for p in &ScanParameter::ALL {
        dst.write_f32(metadata.get_f32(p.key()).unwrap_or(0.))?;
    }
    Ok(())
}

/// Merge the footer's parameters into `metadata`, keeping any value that
/// is already present.
pub fn merge_footer<M: MetaDataStore + ?Sized>(footer: &[u8], metadata: &mut M) {
    for (key, value) in unpack(footer) {
        if metadata.get_f32(&key).is_none() {
            metadata.set_f32(&key, value);
        }
    }
}
