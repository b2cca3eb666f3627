//! Conversion between the RAS geometry stored in MGH headers and the
//! direction/origin pair used in memory.
//!
//! The header stores the RAS coordinate of the volume center (`c_ras`),
//! whereas the in-memory origin is the position of the first voxel:
//!
//! ```text
//! origin = c_ras - D * diag(spacing) * (dim / 2)
//! ```
//!
//! where the columns of `D` are the per-axis direction cosines.
use nalgebra::{Matrix3, Vector3};

/// Direction cosines of a volume whose header carries no valid RAS
/// information: the FreeSurfer coronal frame, "LIA".
pub fn default_direction() -> Matrix3<f64> {
    Matrix3::from_columns(&[
        Vector3::new(-1., 0., 0.),
        Vector3::new(0., 0., -1.),
        Vector3::new(0., 1., 0.),
    ])
}

fn half_extent(direction: &Matrix3<f64>, spacing: &[f64; 3], dim: &[usize; 3]) -> Vector3<f64> {
    let half_dim = Vector3::new(dim[0] as f64, dim[1] as f64, dim[2] as f64) / 2.;
    direction * Matrix3::from_diagonal(&Vector3::from(*spacing)) * half_dim
}

/// Compute the direction matrix and origin from the header fields.
/// `cosines[i]` holds the direction of axis `i`.
pub fn from_header(
    spacing: &[f32; 3],
    cosines: &[[f32; 3]; 3],
    c_ras: &[f32; 3],
    dim: &[usize; 3],
) -> (Matrix3<f64>, Vector3<f64>) {
    let column = |c: &[f32; 3]| Vector3::new(f64::from(c[0]), f64::from(c[1]), f64::from(c[2]));
    let direction = Matrix3::from_columns(&[
        column(&cosines[0]),
        column(&cosines[1]),
        column(&cosines[2]),
    ]);
    let spacing = [
        f64::from(spacing[0]),
        f64::from(spacing[1]),
        f64::from(spacing[2]),
    ];
    let origin = column(c_ras) - half_extent(&direction, &spacing, dim);
    (direction, origin)
}

/// Compute the header's direction cosines and center from the in-memory
/// geometry. This is the inverse of [`from_header`], up to the precision
/// of the 32-bit floats in the header.
///
/// [`from_header`]: ./fn.from_header.html
pub fn to_header(
    direction: &Matrix3<f64>,
    spacing: &[f64; 3],
    origin: &Vector3<f64>,
    dim: &[usize; 3],
) -> ([[f32; 3]; 3], [f32; 3]) {
    let mut cosines = [[0f32; 3]; 3];
    for (axis, cosine) in cosines.iter_mut().enumerate() {
        for (row, v) in cosine.iter_mut().enumerate() {
            *v = direction[(row, axis)] as f32;
        }
    }
    let center = origin + half_extent(direction, spacing, dim);
    (cosines, [center.x as f32, center.y as f32, center.z as f32])
}

/// Derive the three-letter orientation code of a direction matrix.
///
/// Each letter names where the corresponding axis points to, picked from
/// the dominant component of its column: R/L, A/P or S/I. Ties go to the
/// earlier component.
pub fn orientation_label(direction: &Matrix3<f64>) -> String {
    const LETTERS: [(char, char); 3] = [('R', 'L'), ('A', 'P'), ('S', 'I')];
    (0..3)
        .map(|axis| {
            let column = direction.column(axis);
            let mut dominant = 0;
            for row in 1..3 {
                if column[row].abs() > column[dominant].abs() {
                    dominant = row;
                }
            }
            let (positive, negative) = LETTERS[dominant];
            if column[dominant] < 0. {
                negative
            } else {
                positive
            }
        })
        .collect()
}
