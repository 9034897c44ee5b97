use std::io::{Read, Seek, SeekFrom, Write};

use crate::Array;

#[test]
fn test_byte_view() {
    let a = Array::from(vec![1u32, 2, 0xdead_beef]);
    assert_eq!(a.byte_len(), 12);
    assert_eq!(a.as_bytes().len(), a.byte_len());
    assert_eq!(&a.as_bytes()[..4], &1u32.to_ne_bytes());
}

#[test]
fn test_file_round_trip() {
    let mut rng = fastrand::Rng::with_seed(11);
    let a: Array<u64> = (0..10_000).map(|_| rng.u64(..)).collect();

    let mut file = tempfile::tempfile().unwrap();
    file.write_all(a.as_bytes()).unwrap();
    file.seek(SeekFrom::Start(0)).unwrap();
    let mut image = Vec::new();
    file.read_to_end(&mut image).unwrap();

    let b = Array::<u64>::from_bytes(&image).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_extend_from_unaligned_bytes() {
    let source = [0u8, 1, 0, 0, 0, 2, 0, 0, 0];
    let mut a = Array::from(vec![7u32]);
    assert_eq!(a.extend_from_bytes(&source[1..]).unwrap(), 1);
    assert_eq!(a.len(), 3);
    assert_eq!(a[1], u32::from_ne_bytes([1, 0, 0, 0]));

    let err = a.extend_from_bytes(&source[..3]).unwrap_err();
    assert!(err.is_invalid_argument());
    assert_eq!(a.len(), 3);
}

#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Zeroable)]
struct Slot {
    used: bool,
    value: u32,
}

#[test]
fn test_resize_zeroed_needs_only_zeroable() {
    let mut a = Array::<Slot>::new();
    a.append(Slot {
        used: true,
        value: 5,
    })
    .unwrap();
    a.resize_zeroed(3).unwrap();
    assert_eq!(a[0].value, 5);
    assert_eq!(
        a[2],
        Slot {
            used: false,
            value: 0
        }
    );
}

#[test]
fn test_resize_zeroed() {
    let mut a = Array::<f32>::new();
    a.resize_zeroed(4).unwrap();
    assert_eq!(a.as_slice(), &[0.0; 4]);
    a.resize_zeroed(1).unwrap();
    assert_eq!(a.len(), 1);
}
