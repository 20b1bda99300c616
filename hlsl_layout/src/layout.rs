//! Static layout arithmetic shared by the containers and the generator.
use std::mem::size_of;

use bytemuck::{Pod, Zeroable};

use crate::Vector;

/// The size of a constant buffer register.
/// Each array element, matrix row and struct starts on a multiple of this.
pub const CB_ROW_BYTES: usize = 16;

/// Rounds `offset` up to the next multiple of `alignment`.
pub const fn align_to(offset: usize, alignment: usize) -> usize {
    offset.div_ceil(alignment) * alignment
}

/// The distance between consecutive elements of `element_bytes` in a padded array.
pub const fn cb_stride(element_bytes: usize) -> usize {
    align_to(element_bytes, CB_ROW_BYTES)
}

/// The size of `count` elements in a padded array.
/// The last element is not padded.
pub const fn cb_array_size(count: usize, element_bytes: usize) -> usize {
    assert!(count > 0, "arrays have at least one element");
    (count - 1) * cb_stride(element_bytes) + element_bytes
}

/// The size of `count` elements packed back to back.
pub const fn loose_array_size(count: usize, element_bytes: usize) -> usize {
    count * element_bytes
}

/// A type that can be an element of a [PaddedArray](crate::PaddedArray).
///
/// # Safety
/// `Padding` must be a byte array `[u8; P]` where `size_of::<Self>() + P`
/// is the next multiple of [CB_ROW_BYTES], and the alignment of `Self`
/// must divide [CB_ROW_BYTES].
pub unsafe trait PaddedElement: Pod {
    /// The bytes filling the remainder of the last 16-byte row of `Self`.
    type Padding: Pod;

    /// The distance between consecutive elements in a padded array.
    const STRIDE: usize = cb_stride(size_of::<Self>());
}

/// An element followed by its row padding.
#[repr(C)]
#[derive(Clone, Copy)]
pub(crate) struct Padded<V: PaddedElement> {
    pub(crate) value: V,
    pub(crate) _padding: V::Padding,
}

unsafe impl<V: PaddedElement> Zeroable for Padded<V> {}
unsafe impl<V: PaddedElement> Pod for Padded<V> {}

impl<V: PaddedElement> Padded<V> {
    pub(crate) const CHECK: () = assert!(
        size_of::<Self>() == V::STRIDE && size_of::<V::Padding>() < CB_ROW_BYTES,
        "padded element does not end on a 16-byte boundary"
    );
}

/// The length of a [PaddedArray](crate::PaddedArray) as a type.
pub struct Length<const K: usize>;

mod private {
    pub trait Sealed {}
}

/// Padded array lengths with storage for the `K - 1` padded leading elements.
///
/// Implemented for [Length] of 1 through 1000.
pub trait ArrayLength: private::Sealed {
    /// The storage of the elements before the last one.
    type Head<R: Pod>: Pod + AsRef<[R]> + AsMut<[R]>;
}

macro_rules! array_lengths {
    (@tens $hundreds:literal [$($tens:literal)*] $units:tt) => {
        $(array_lengths!(@units $hundreds $tens $units);)*
    };
    (@units $hundreds:literal $tens:literal [$($units:literal)*]) => {
        $(
            impl private::Sealed for Length<{ $hundreds * 100 + $tens * 10 + $units + 1 }> {}

            impl ArrayLength for Length<{ $hundreds * 100 + $tens * 10 + $units + 1 }> {
                type Head<R: Pod> = [R; $hundreds * 100 + $tens * 10 + $units];
            }
        )*
    };
    ([$($hundreds:literal)*] $tens:tt $units:tt) => {
        $(array_lengths!(@tens $hundreds $tens $units);)*
    };
}

array_lengths!([0 1 2 3 4 5 6 7 8 9] [0 1 2 3 4 5 6 7 8 9] [0 1 2 3 4 5 6 7 8 9]);

/// The largest supported [PaddedArray](crate::PaddedArray) length.
pub const MAX_PADDED_LENGTH: usize = 1000;

macro_rules! padded_elements {
    (@vector $scalar:ty, $lanes:literal) => {
        unsafe impl PaddedElement for Vector<$scalar, $lanes> {
            type Padding = [u8; cb_stride($lanes * size_of::<$scalar>()) - $lanes * size_of::<$scalar>()];
        }

        static_assertions::const_assert_eq!(
            size_of::<Padded<Vector<$scalar, $lanes>>>() % CB_ROW_BYTES,
            0
        );
    };
    ($($scalar:ty),*) => {
        $(
            unsafe impl PaddedElement for $scalar {
                type Padding = [u8; cb_stride(size_of::<$scalar>()) - size_of::<$scalar>()];
            }

            padded_elements!(@vector $scalar, 1);
            padded_elements!(@vector $scalar, 2);
            padded_elements!(@vector $scalar, 3);
            padded_elements!(@vector $scalar, 4);
        )*
    };
}

padded_elements!(f32, u32, i32, u16, f64);
