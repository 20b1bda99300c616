//! # hlsl_layout
//! hlsl_layout provides vector, array and matrix types whose memory layout matches
//! HLSL constant buffer packing or tightly packed vertex and structured buffer layouts.
//! Structs built from these types can be copied byte for byte into a GPU buffer.
//!
//! ## Layouts
//! [LooseArray] places elements back to back.
//! [PaddedArray] starts every element on a 16-byte boundary
//! but does not pad the last element, so a following struct member can use the remaining bytes.
//!
//! ```rust
//! use hlsl_layout::{Float3, Float3x3Cb, Float4x4, PaddedArray};
//!
//! assert_eq!(12, std::mem::size_of::<Float3>());
//! assert_eq!(44, std::mem::size_of::<Float3x3Cb>());
//! assert_eq!(64, std::mem::size_of::<Float4x4>());
//! assert_eq!(28, std::mem::size_of::<PaddedArray<Float3, 2>>());
//! ```
//!
//! ## Bit Copies
//! Conversions from foreign types like `glam::Vec3` copy bits and never convert numbers.
//! The source and destination must have the same size,
//! which is checked when compiling for `assign_bits` and `reinterpret_as`
//! and at runtime for `assign_bytes`.
//!
//! ```rust
//! use hlsl_layout::{Float2, Uint2};
//!
//! let mut v = Float2::default();
//! v.assign_bits(&[1.0f32, 2.0]);
//! let bits: Uint2 = v.reinterpret_as();
//! assert_eq!(1.0f32.to_bits(), bits.x);
//! ```
//!
//! ## Indexing
//! Indexing is always bounds checked, including in release builds.
//! An index out of range panics instead of reading neighboring memory.
mod aliases;
mod bits;
mod layout;
mod loose;
mod padded;
mod scalar;
mod vector;

pub use aliases::*;
pub use layout::{
    align_to, cb_array_size, cb_stride, loose_array_size, ArrayLength, Length, PaddedElement,
    CB_ROW_BYTES, MAX_PADDED_LENGTH,
};
pub use loose::{LooseArray, LooseMatrix, LooseMatrixArray};
pub use padded::{PaddedArray, PaddedMatrix, PaddedMatrixArray};
pub use scalar::{Scalar, ScalarKind};
pub use vector::{Vector, X, XY, XYZ, XYZW};

#[cold]
#[track_caller]
pub(crate) fn index_out_of_range(what: &str, index: usize, len: usize) -> ! {
    panic!("index {index} is out of range for {what} of length {len}")
}
