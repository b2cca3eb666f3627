use mgh::permute::{to_in_memory, to_on_disk};
use proptest::prelude::*;

fn buffer_strategy() -> impl Strategy<Value = ([usize; 3], usize, Vec<i32>)> {
    (
        prop::array::uniform3(1usize..=8),
        prop::sample::select(vec![1usize, 3]),
    )
        .prop_flat_map(|(dim, components)| {
            let len = dim.iter().product::<usize>() * components;
            (
                Just(dim),
                Just(components),
                prop::collection::vec(any::<i32>(), len),
            )
        })
}

proptest! {
    #[test]
    fn reorder_roundtrip((dim, components, buffer) in buffer_strategy()) {
        let disk = to_on_disk(&buffer, &dim, components).unwrap();
        prop_assert_eq!(disk.len(), buffer.len());
        prop_assert_eq!(to_in_memory(&disk, &dim, components).unwrap(), buffer);
    }

    #[test]
    fn frames_hold_one_component((dim, components, buffer) in buffer_strategy()) {
        let voxels = buffer.len() / components;
        let disk = to_on_disk(&buffer, &dim, components).unwrap();
        for v in 0..voxels {
            for c in 0..components {
                prop_assert_eq!(disk[c * voxels + v], buffer[v * components + c]);
            }
        }
    }
}

#[test]
fn wrong_length() {
    assert!(to_on_disk(&[0u8; 5], &[2, 2, 1], 1).is_err());
    assert!(to_in_memory(&[0u8; 11], &[2, 2, 1], 3).is_err());
}
