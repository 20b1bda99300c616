//! Raw bit copies between same-sized plain data types.
//!
//! These are reinterpretations, never numeric conversions.
//! A `u32` with value 1 copied into an `f32` is a denormal, not `1.0`.
use std::marker::PhantomData;
use std::mem::size_of;

use bytemuck::Pod;

struct SameSize<S, D>(PhantomData<(S, D)>);

impl<S, D> SameSize<S, D> {
    // Evaluated once per monomorphization, so a mismatch is a build error.
    const CHECK: () = assert!(
        size_of::<S>() == size_of::<D>(),
        "bit copies require source and destination types of identical size"
    );
}

/// Returns the bits of `source` reinterpreted as `D`.
///
/// Fails to compile if `S` and `D` differ in size.
pub fn cast<S: Pod, D: Pod>(source: &S) -> D {
    #[allow(clippy::let_unit_value)]
    let () = SameSize::<S, D>::CHECK;
    bytemuck::cast(*source)
}

/// Overwrites every byte of `destination` with the bytes of `source`.
///
/// Fails to compile if `S` and `D` differ in size.
pub fn assign<D: Pod, S: Pod>(destination: &mut D, source: &S) {
    *destination = cast(source);
}

/// Overwrites every byte of `destination` with `bytes`.
///
/// # Panics
/// Panics if `bytes` is not exactly `size_of::<D>()` long.
/// There is no partial copy.
pub fn assign_bytes<D: Pod>(destination: &mut D, bytes: &[u8]) {
    assert!(
        bytes.len() == size_of::<D>(),
        "size mismatch: cannot assign {} bytes to a value of {} bytes",
        bytes.len(),
        size_of::<D>()
    );
    bytemuck::bytes_of_mut(destination).copy_from_slice(bytes);
}
