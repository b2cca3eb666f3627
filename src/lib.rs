//! Rust implementation of the FreeSurfer MGH/MGZ volume format.
//!
//! An MGH file is a fixed 284-byte big-endian header followed by a
//! frame-major voxel payload. MGZ files are the same byte sequence wrapped
//! in a gzip stream. This crate translates between that layout and an
//! in-memory [`VolumeDescriptor`] plus a typed [`PixelBuffer`].
//!
//! # Example
//!
//! ```no_run
//! use mgh::{ImageIo, MghImageIo};
//! use std::path::Path;
//! # use mgh::Result;
//!
//! # fn run() -> Result<()> {
//! let io = MghImageIo::new();
//! let descriptor = io.read_header(Path::new("brain.mgz"))?;
//! let data = io.read_payload(Path::new("brain.mgz"), &descriptor)?;
//! println!("{:?} ({})", descriptor.dim, descriptor.orientation_label());
//! io.write_payload(Path::new("copy.mgh"), &descriptor, &data)?;
//! # Ok(())
//! # }
//! ```
//!
//! Reading a whole volume in one pass, scan parameter footer included:
//!
//! ```no_run
//! use mgh::MghObject;
//! # use mgh::Result;
//!
//! # fn run() -> Result<()> {
//! let obj = MghObject::from_file("orig.mgz")?;
//! assert_eq!(obj.data().len(), obj.descriptor().payload_len()?);
//! # Ok(())
//! # }
//! ```
#![deny(missing_debug_implementations)]
#![warn(missing_docs, unused_extern_crates, trivial_casts, unused_results)]

#[macro_use]
extern crate quick_error;
#[macro_use]
extern crate num_derive;

pub mod element;
pub mod error;
pub mod header;
pub mod io;
pub mod metadata;
pub mod object;
pub mod orientation;
pub mod permute;
pub mod stream;
pub mod typedef;
mod util;
pub mod volume;

pub use crate::element::MghElement;
pub use crate::error::{MghError, Result};
pub use crate::header::MghHeader;
pub use crate::io::{ImageIo, MghImageIo};
pub use crate::metadata::{MetaDataDictionary, MetaDataStore, ScanParameter};
pub use crate::object::MghObject;
pub use crate::typedef::{ComponentType, MghType, PixelType};
#[cfg(feature = "ndarray_volumes")]
pub use crate::volume::ndarray::IntoNdArray;
pub use crate::volume::{PixelBuffer, VolumeDescriptor};
