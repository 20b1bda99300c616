use std::ops::{Deref, DerefMut, Index, IndexMut};

use bytemuck::{Pod, Zeroable};

use crate::{bits, index_out_of_range, Scalar};

/// A vector of `N` lanes of scalar `T` like HLSL `float3` or `uint2`.
///
/// The size is exactly `N * size_of::<T>()` with no padding.
/// Lanes are accessible by index or by name through the `x`, `y`, `z` and `w` fields,
/// which alias the same storage.
///
/// ```rust
/// use hlsl_layout::Vector;
///
/// let mut v = Vector::new([1.0f32, 2.0, 3.0]);
/// v.y = 5.0;
/// assert_eq!(5.0, v[1]);
/// ```
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vector<T, const N: usize>([T; N]);

unsafe impl<T: Scalar, const N: usize> Zeroable for Vector<T, N> {}
unsafe impl<T: Scalar, const N: usize> Pod for Vector<T, N> {}

impl<T: Scalar, const N: usize> Vector<T, N> {
    /// The number of lanes.
    pub const LANES: usize = N;

    /// The size in bytes.
    pub const SIZE: usize = N * std::mem::size_of::<T>();

    const VALID_LANES: () = assert!(N >= 1 && N <= 4, "vectors have between 1 and 4 lanes");

    pub const fn new(lanes: [T; N]) -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::VALID_LANES;
        Self(lanes)
    }

    /// A vector with every lane set to `value`.
    pub fn splat(value: T) -> Self {
        Self::new([value; N])
    }

    pub fn to_array(self) -> [T; N] {
        self.0
    }

    pub fn as_array(&self) -> &[T; N] {
        &self.0
    }

    pub fn as_mut_array(&mut self) -> &mut [T; N] {
        &mut self.0
    }

    pub fn get(&self, lane: usize) -> Option<&T> {
        self.0.get(lane)
    }

    pub fn get_mut(&mut self, lane: usize) -> Option<&mut T> {
        self.0.get_mut(lane)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.0.iter()
    }

    /// Overwrites this vector with the bits of a same-sized value such as `glam::Vec3`.
    /// Fails to compile if the sizes differ.
    ///
    /// ```rust
    /// use hlsl_layout::Float3;
    ///
    /// let mut v = Float3::default();
    /// v.assign_bits(&[1.0f32, 2.0, 3.0]);
    /// assert_eq!([1.0, 2.0, 3.0], v.to_array());
    /// ```
    ///
    /// ```rust compile_fail,E0080
    /// use hlsl_layout::Float3;
    ///
    /// let mut v = Float3::default();
    /// v.assign_bits(&[0.0f32; 4]);
    /// ```
    pub fn assign_bits<S: Pod>(&mut self, source: &S) {
        bits::assign(self, source);
    }

    /// Reinterprets the bits of this vector as a same-sized value.
    /// Fails to compile if the sizes differ.
    pub fn reinterpret_as<D: Pod>(&self) -> D {
        bits::cast(self)
    }

    /// Overwrites this vector with `bytes`.
    ///
    /// # Panics
    /// Panics if `bytes.len()` is not [Self::SIZE].
    pub fn assign_bytes(&mut self, bytes: &[u8]) {
        bits::assign_bytes(self, bytes);
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}

impl<T: Scalar, const N: usize> Default for Vector<T, N> {
    fn default() -> Self {
        Self::new([T::default(); N])
    }
}

impl<T: Scalar, const N: usize> From<[T; N]> for Vector<T, N> {
    fn from(value: [T; N]) -> Self {
        Self::new(value)
    }
}

impl<T: Scalar, const N: usize> From<Vector<T, N>> for [T; N] {
    fn from(value: Vector<T, N>) -> Self {
        value.0
    }
}

impl<T: Scalar, const N: usize> Index<usize> for Vector<T, N> {
    type Output = T;

    #[track_caller]
    fn index(&self, lane: usize) -> &T {
        match self.0.get(lane) {
            Some(value) => value,
            None => index_out_of_range("vector", lane, N),
        }
    }
}

impl<T: Scalar, const N: usize> IndexMut<usize> for Vector<T, N> {
    #[track_caller]
    fn index_mut(&mut self, lane: usize) -> &mut T {
        match self.0.get_mut(lane) {
            Some(value) => value,
            None => index_out_of_range("vector", lane, N),
        }
    }
}

impl<'a, T: Scalar, const N: usize> IntoIterator for &'a Vector<T, N> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

macro_rules! named_lanes {
    ($($lanes:literal => $overlay:ident { $($lane:ident),+ }),* $(,)?) => {
        $(
            #[doc = concat!("Named lanes of a ", stringify!($lanes), " lane [Vector].")]
            #[repr(C)]
            #[derive(Debug, Clone, Copy, PartialEq, Default)]
            pub struct $overlay<T> {
                $(pub $lane: T),+
            }

            unsafe impl<T: Scalar> Zeroable for $overlay<T> {}
            unsafe impl<T: Scalar> Pod for $overlay<T> {}

            impl<T: Scalar> Deref for Vector<T, $lanes> {
                type Target = $overlay<T>;

                fn deref(&self) -> &Self::Target {
                    bytemuck::cast_ref(&self.0)
                }
            }

            impl<T: Scalar> DerefMut for Vector<T, $lanes> {
                fn deref_mut(&mut self) -> &mut Self::Target {
                    bytemuck::cast_mut(&mut self.0)
                }
            }
        )*
    };
}

named_lanes! {
    1 => X { x },
    2 => XY { x, y },
    3 => XYZ { x, y, z },
    4 => XYZW { x, y, z, w },
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::mem::size_of;

    #[test]
    fn vector_sizes() {
        assert_eq!(4, size_of::<Vector<f32, 1>>());
        assert_eq!(12, size_of::<Vector<u32, 3>>());
        assert_eq!(16, size_of::<Vector<i32, 4>>());
        assert_eq!(6, size_of::<Vector<u16, 3>>());
        assert_eq!(32, size_of::<Vector<f64, 4>>());
        assert_eq!(12, Vector::<f32, 3>::SIZE);
    }

    #[test]
    fn named_and_indexed_lanes_alias() {
        let mut v = Vector::new([1.0f32, 2.0, 3.0, 4.0]);
        assert_eq!((1.0, 2.0, 3.0, 4.0), (v.x, v.y, v.z, v.w));

        v.z = 7.0;
        assert_eq!(7.0, v[2]);

        v[0] = -1.0;
        assert_eq!(-1.0, v.x);
        assert_eq!([-1.0, 2.0, 7.0, 4.0], v.to_array());
    }

    #[test]
    fn single_lane_named_access() {
        let mut v = Vector::<u32, 1>::default();
        v.x = 9;
        assert_eq!(9, v[0]);
    }

    #[test]
    fn splat_and_default() {
        assert_eq!([3u32; 2], Vector::<u32, 2>::splat(3).to_array());
        assert_eq!([0.0f64; 3], Vector::<f64, 3>::default().to_array());
    }

    #[test]
    fn reinterpret_bits() {
        let v = Vector::new([1.0f32, -2.0]);
        let bits: [u32; 2] = v.reinterpret_as();
        assert_eq!([1.0f32.to_bits(), (-2.0f32).to_bits()], bits);

        let mut u = Vector::<u32, 2>::default();
        u.assign_bits(&v);
        assert_eq!(bits, u.to_array());
    }

    #[test]
    fn assign_bytes_roundtrip() {
        let source = Vector::new([1i32, -1, 3]);
        let mut destination = Vector::<i32, 3>::default();
        destination.assign_bytes(source.as_bytes());
        assert_eq!(source, destination);
    }

    #[test]
    #[should_panic(expected = "size mismatch")]
    fn assign_bytes_wrong_size() {
        let mut destination = Vector::<i32, 3>::default();
        destination.assign_bytes(&[0u8; 16]);
    }

    #[test]
    #[should_panic(expected = "index 3 is out of range for vector of length 3")]
    fn index_out_of_range() {
        let v = Vector::new([1u32, 2, 3]);
        let _ = v[3];
    }

    #[test]
    #[should_panic(expected = "index 2 is out of range for vector of length 2")]
    fn index_mut_out_of_range() {
        let mut v = Vector::new([1u16, 2]);
        v[2] = 0;
    }

    #[test]
    fn get_out_of_range() {
        let v = Vector::new([1u32, 2, 3]);
        assert_eq!(Some(&3), v.get(2));
        assert_eq!(None, v.get(3));
    }
}
