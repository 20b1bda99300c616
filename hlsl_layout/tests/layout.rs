use std::mem::{offset_of, size_of};

use hlsl_layout::*;
use pretty_assertions::assert_eq;

fn offset<A, V>(container: &A, element: &V) -> usize {
    element as *const V as usize - container as *const A as usize
}

macro_rules! check_vector_sizes {
    ($($scalar:ty),*) => {
        $(
            assert_eq!(size_of::<$scalar>(), size_of::<Vector<$scalar, 1>>());
            assert_eq!(2 * size_of::<$scalar>(), size_of::<Vector<$scalar, 2>>());
            assert_eq!(3 * size_of::<$scalar>(), size_of::<Vector<$scalar, 3>>());
            assert_eq!(4 * size_of::<$scalar>(), size_of::<Vector<$scalar, 4>>());
        )*
    };
}

#[test]
fn vector_size_is_lanes_times_scalar() {
    check_vector_sizes!(f32, u32, i32, u16, f64);
}

// Checks size and every element offset of loose and padded arrays of vectors.
macro_rules! check_arrays {
    ($scalar:ty, $lanes:literal, [$($k:literal),*]) => {
        $({
            let element = $lanes * size_of::<$scalar>();
            let stride = 16 * element.div_ceil(16);

            type Loose = LooseArray<Vector<$scalar, $lanes>, $k>;
            assert_eq!($k * element, size_of::<Loose>());
            let loose = Loose::default();
            for i in 0..$k {
                assert_eq!(i * element, offset(&loose, &loose[i]));
                assert_eq!(i * element, Loose::offset_of(i));
            }

            type Padded = PaddedArray<Vector<$scalar, $lanes>, $k>;
            assert_eq!(($k - 1) * stride + element, size_of::<Padded>());
            assert_eq!(stride, Padded::STRIDE);
            let padded = Padded::default();
            for i in 0..$k {
                assert_eq!(i * stride, offset(&padded, &padded[i]));
                assert_eq!(i * stride, Padded::offset_of(i));
            }
        })*
    };
    ($($scalar:ty),*) => {
        $(
            check_arrays!($scalar, 1, [1, 2, 3, 7]);
            check_arrays!($scalar, 2, [1, 2, 3, 7]);
            check_arrays!($scalar, 3, [1, 2, 3, 7]);
            check_arrays!($scalar, 4, [1, 2, 3, 7]);
        )*
    };
}

#[test]
fn array_sizes_and_offsets() {
    check_arrays!(f32, u32, i32, u16, f64);
}

#[test]
fn longest_padded_array() {
    type Longest = PaddedArray<Float4, MAX_PADDED_LENGTH>;
    assert_eq!(16 * MAX_PADDED_LENGTH, size_of::<Longest>());
}

#[test]
fn two_float3_rows() {
    assert_eq!(28, size_of::<PaddedArray<Float3, 2>>());
    assert_eq!(24, size_of::<LooseArray<Float3, 2>>());
}

#[test]
fn padded_matrix_array() {
    type Matrices = PaddedMatrixArray<f32, 3, 3, 2>;
    assert_eq!(92, size_of::<Matrices>());

    let matrices = Matrices::default();
    for m in 0..2 {
        for r in 0..3 {
            assert_eq!(m * 48 + r * 16, offset(&matrices, &matrices[m][r]));
        }
    }
}

#[test]
fn loose_matrix_array() {
    type Matrices = LooseMatrixArray<f32, 3, 3, 2>;
    assert_eq!(72, size_of::<Matrices>());

    let matrices = Matrices::default();
    for m in 0..2 {
        for r in 0..3 {
            assert_eq!(m * 36 + r * 12, offset(&matrices, &matrices[m][r]));
        }
    }
}

#[test]
fn padded_roundtrip_through_foreign_blob() {
    let mut matrices = PaddedMatrixArray::<f32, 3, 2, 3>::default();
    for m in 0..3 {
        for r in 0..2 {
            matrices[m][r] = Vector::new([m as f32, r as f32, (m * 10 + r) as f32]);
        }
    }

    // 2 matrices of 32 bytes and a last matrix of 16 + 12 bytes.
    let blob: [u8; 92] = matrices.reinterpret_as();
    let mut copy = PaddedMatrixArray::<f32, 3, 2, 3>::default();
    copy.assign_bytes(&blob);

    assert_eq!(matrices, copy);
    assert_eq!(matrices.as_bytes(), copy.as_bytes());
    assert_eq!(21.0, copy[2][1].z);
}

#[test]
fn loose_roundtrip_through_foreign_blob() {
    let mut array = LooseArray::<Uint4, 3>::default();
    for (i, element) in array.iter_mut().enumerate() {
        element.x = i as u32;
        element.w = 100 + i as u32;
    }

    let blob: [u32; 12] = array.reinterpret_as();
    assert_eq!([0, 0, 0, 100, 1, 0, 0, 101, 2, 0, 0, 102], blob);

    let mut copy = LooseArray::<Uint4, 3>::default();
    copy.assign_bits(&blob);
    assert_eq!(array, copy);
}

// A host struct in the shape the generator produces for constant buffers.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
struct BoundsCb {
    corners: PaddedArray<Float3, 2>,
    radius: f32,
    transform: Float4x3Cb,
    flags: Uint2,
    _pad88: [u8; 8],
}

#[test]
fn embedded_in_host_struct() {
    // radius packs into the unused tail of the last row.
    assert_eq!(28, offset_of!(BoundsCb, radius));
    assert_eq!(32, offset_of!(BoundsCb, transform));
    assert_eq!(80, offset_of!(BoundsCb, flags));
    assert_eq!(96, size_of::<BoundsCb>());

    let mut bounds: BoundsCb = bytemuck::Zeroable::zeroed();
    bounds.corners[1].z = 1.0;
    bounds.radius = 2.0;
    bounds.transform[2].w = 3.0;

    let words: &[f32] = bytemuck::cast_slice(bytemuck::bytes_of(&bounds));
    assert_eq!(1.0, words[6]);
    assert_eq!(2.0, words[7]);
    assert_eq!(3.0, words[8 + 2 * 4 + 3]);
}

#[test]
#[should_panic(expected = "index 5 is out of range for padded array of length 4")]
fn padded_index_out_of_range() {
    let array = PaddedArray::<Float4, 4>::default();
    let _ = array[5];
}

#[test]
#[should_panic(expected = "index 5 is out of range for loose array of length 4")]
fn loose_index_out_of_range() {
    let mut array = LooseArray::<Float4, 4>::default();
    array[5].x = 1.0;
}

#[test]
#[should_panic(expected = "index 4 is out of range for vector of length 4")]
fn lane_out_of_range() {
    let matrix = Float4x4::default();
    let _ = matrix[3][4];
}

#[test]
#[should_panic(expected = "size mismatch: cannot assign 64 bytes to a value of 60 bytes")]
fn padded_size_mismatch() {
    // Four loose float3 rows are 48 bytes but padded they take 3 * 16 + 12.
    let mut matrix = PaddedMatrix::<f32, 3, 4>::default();
    matrix.assign_bytes(&[0u8; 64]);
}
