use mgh::{ComponentType, PixelBuffer, PixelType, VolumeDescriptor};
use nalgebra::{Matrix3, Vector3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;
use tempfile::TempDir;

/// The pixel types which can be stored in an MGH file.
#[allow(dead_code)]
pub const STORABLE_TYPES: [PixelType; 7] = [
    PixelType::Scalar(ComponentType::Uint8),
    PixelType::Scalar(ComponentType::Int16),
    PixelType::Scalar(ComponentType::Int32),
    PixelType::Scalar(ComponentType::Float32),
    PixelType::Vector(ComponentType::Int16, 2),
    PixelType::Vector(ComponentType::Float32, 4),
    PixelType::Tensor(ComponentType::Float32),
];

/// A seeded generator, so that failures can be reproduced.
#[allow(dead_code)]
pub fn seeded(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Fill a buffer of the given component type with random values.
#[allow(dead_code)]
pub fn random_buffer<R: Rng>(rng: &mut R, component: ComponentType, len: usize) -> PixelBuffer {
    match component {
        ComponentType::Uint8 => PixelBuffer::Uint8((0..len).map(|_| rng.random()).collect()),
        ComponentType::Int16 => PixelBuffer::Int16((0..len).map(|_| rng.random()).collect()),
        ComponentType::Int32 => PixelBuffer::Int32((0..len).map(|_| rng.random()).collect()),
        ComponentType::Float32 => PixelBuffer::Float32(
            (0..len)
                .map(|_| rng.random_range(-1.0e4f32..1.0e4))
                .collect(),
        ),
        c => panic!("no MGH buffer for {}", c),
    }
}

/// A descriptor with non-trivial geometry.
#[allow(dead_code)]
pub fn oblique_descriptor(dim: [usize; 3], pixel_type: PixelType) -> VolumeDescriptor {
    let mut d = VolumeDescriptor::new(dim, pixel_type);
    d.spacing = [0.9, 1.1, 2.5];
    d.direction = Matrix3::from_columns(&[
        Vector3::new(0., 0.6, 0.8),
        Vector3::new(-1., 0., 0.),
        Vector3::new(0., -0.8, 0.6),
    ]);
    d.origin = Vector3::new(-12.5, 40.25, 7.);
    d.degrees_of_freedom = 5;
    d
}

/// A path to a file named `name` in a fresh temporary directory. The
/// directory lives as long as the returned guard.
#[allow(dead_code)]
pub fn temp_file(name: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(name);
    (dir, path)
}
