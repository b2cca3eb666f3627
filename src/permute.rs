//! Reordering between the voxel-major layout of multi-component pixels in
//! memory and the frame-major layout of the MGH payload.
//!
//! In memory, component `c` of voxel `v` is found at `v * components + c`.
//! On disk, each component forms its own frame, so the same value is at
//! `c * voxel_count + v`. Both functions below are strided transposes of
//! a `voxel_count × components` matrix, and each undoes the other.
use crate::error::{MghError, Result};

fn checked_voxel_count<T>(buffer: &[T], dim: &[usize], components: usize) -> Result<usize> {
    let voxels = dim.iter().try_fold(1usize, |acc, d| acc.checked_mul(*d));
    let expected = voxels.and_then(|v| v.checked_mul(components.max(1)));
    let (voxels, expected) = match (voxels, expected) {
        (Some(v), Some(e)) => (v, e),
        _ => return Err(MghError::BufferSizeMismatch(usize::MAX, buffer.len())),
    };
    if buffer.len() != expected {
        return Err(MghError::BufferSizeMismatch(expected, buffer.len()));
    }
    Ok(voxels)
}

/// Reorder a voxel-major buffer into frame-major order.
///
/// # Errors
///
/// - `MghError::BufferSizeMismatch` if `buffer.len()` is not
///   `product(dim) * components`.
pub fn to_on_disk<T: Copy>(buffer: &[T], dim: &[usize], components: usize) -> Result<Vec<T>> {
    let voxels = checked_voxel_count(buffer, dim, components)?;
    if components <= 1 {
        return Ok(buffer.to_vec());
    }
    let mut out = Vec::with_capacity(buffer.len());
    for c in 0..components {
        out.extend(buffer.iter().skip(c).step_by(components).take(voxels));
    }
    Ok(out)
}

/// Reorder a frame-major buffer into voxel-major order.
///
/// # Errors
///
/// - `MghError::BufferSizeMismatch` if `buffer.len()` is not
///   `product(dim) * components`.
pub fn to_in_memory<T: Copy>(buffer: &[T], dim: &[usize], components: usize) -> Result<Vec<T>> {
    let voxels = checked_voxel_count(buffer, dim, components)?;
    if components <= 1 {
        return Ok(buffer.to_vec());
    }
    let mut out = Vec::with_capacity(buffer.len());
    for v in 0..voxels {
        out.extend((0..components).map(|c| buffer[c * voxels + v]));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::{to_in_memory, to_on_disk};
    use crate::error::MghError;

    #[test]
    fn single_component_is_identity() {
        let data: Vec<u8> = (0..24).collect();
        assert_eq!(to_on_disk(&data, &[2, 3, 4], 1).unwrap(), data);
        assert_eq!(to_in_memory(&data, &[2, 3, 4], 1).unwrap(), data);
    }

    #[test]
    fn three_components() {
        // voxel-major: (v0c0, v0c1, v0c2, v1c0, ...)
        let mem = vec![10, 11, 12, 20, 21, 22];
        let disk = to_on_disk(&mem, &[2, 1, 1], 3).unwrap();
        assert_eq!(disk, vec![10, 20, 11, 21, 12, 22]);
        assert_eq!(to_in_memory(&disk, &[2, 1, 1], 3).unwrap(), mem);
    }

    #[test]
    fn inverse_pair() {
        for &dim in &[[1, 1, 1], [2, 3, 1], [3, 3, 3], [8, 2, 5]] {
            for &components in &[1, 3] {
                let len = dim.iter().product::<usize>() * components;
                let data: Vec<f32> = (0..len).map(|x| x as f32 * 0.5).collect();
                let disk = to_on_disk(&data, &dim, components).unwrap();
                assert_eq!(to_in_memory(&disk, &dim, components).unwrap(), data);
            }
        }
    }

    #[test]
    fn size_mismatch() {
        let data = vec![0i16; 10];
        match to_on_disk(&data, &[2, 2, 2], 1) {
            Err(MghError::BufferSizeMismatch(8, 10)) => {}
            other => panic!("unexpected {:?}", other),
        }
        match to_in_memory(&data, &[2, 2, 1], 3) {
            Err(MghError::BufferSizeMismatch(12, 10)) => {}
            other => panic!("unexpected {:?}", other),
        }
    }
}
