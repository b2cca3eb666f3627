//! Interfaces and implementations specific to integration with `ndarray`.
//!
//! This module introduces the trait [`IntoNdArray`], which maps an MGH
//! volume into an [`Array`] with a dynamic number of dimensions. Scalar
//! volumes become arrays of shape `[width, height, depth]`; vector and
//! tensor volumes get a trailing axis for the components, giving
//! `[width, height, depth, components]`.
//!
//! #### Note on memory order
//!
//! The resulting arrays index voxels by `(x, y, z)` with `x` varying
//! fastest in memory, which is column major (Fortran) order. Iterating over
//! them in logical order is therefore slower than iterating in memory
//! order.
//!
//! [`IntoNdArray`]: ./trait.IntoNdArray.html
//! [`Array`]: ../../../ndarray/type.Array.html
use crate::element::MghElement;
use crate::error::{MghError, Result};
use crate::object::MghObject;
use crate::volume::{PixelBuffer, VolumeDescriptor};
use ndarray::{Array, IxDyn, ShapeBuilder};

/// Trait for volumes which can be converted to an ndarray.
///
/// Please see the [module-level documentation](index.html) for more details.
pub trait IntoNdArray {
    /// Consume the volume into an ndarray of elements of type `T`, which
    /// must be the volume's component type.
    ///
    /// # Errors
    ///
    /// - `MghError::UnsupportedPixelType` if `T` is not the component type
    ///   of the voxel data.
    /// - `MghError::BufferSizeMismatch` if the data does not fill the
    ///   described volume.
    /// - `MghError::MalformedHeader` if the described volume is too large
    ///   to address.
    fn into_ndarray<T: MghElement>(self) -> Result<Array<T, IxDyn>>;
}

impl IntoNdArray for MghObject {
    fn into_ndarray<T: MghElement>(self) -> Result<Array<T, IxDyn>> {
        self.into_parts().into_ndarray()
    }
}

impl IntoNdArray for (VolumeDescriptor, PixelBuffer) {
    fn into_ndarray<T: MghElement>(self) -> Result<Array<T, IxDyn>> {
        let (descriptor, data) = self;
        let values = T::from_buffer(&data).ok_or_else(|| {
            MghError::UnsupportedPixelType(format!(
                "cannot view {} data as {}",
                data.component_type(),
                T::COMPONENT_TYPE
            ))
        })?;
        let expected = descriptor.payload_len()?;
        if values.len() != expected {
            return Err(MghError::BufferSizeMismatch(expected, values.len()));
        }
        let [w, h, d] = descriptor.dim;
        let components = descriptor.components();

        if components == 1 {
            let a = Array::from_shape_vec(IxDyn(&[w, h, d]).f(), values.to_vec())
                .map_err(|_| MghError::BufferSizeMismatch(expected, values.len()))?;
            return Ok(a);
        }
        // components of one voxel are adjacent, so they make the fastest axis
        let a = Array::from_shape_vec(IxDyn(&[components, w, h, d]).f(), values.to_vec())
            .map_err(|_| MghError::BufferSizeMismatch(expected, values.len()))?;
        Ok(a.permuted_axes(IxDyn(&[1, 2, 3, 0])))
    }
}
