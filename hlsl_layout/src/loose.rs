use std::mem::size_of;
use std::ops::{Index, IndexMut};

use bytemuck::{Pod, Zeroable};

use crate::{bits, index_out_of_range, Vector};

/// `K` elements packed back to back with no padding,
/// the layout of vertex and structured buffers.
///
/// Element `i` starts at byte `i * size_of::<V>()`.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LooseArray<V, const K: usize>([V; K]);

unsafe impl<V: Pod, const K: usize> Zeroable for LooseArray<V, K> {}
unsafe impl<V: Pod, const K: usize> Pod for LooseArray<V, K> {}

/// A matrix of `ROWS` tightly packed rows with `LANES` lanes each.
pub type LooseMatrix<T, const LANES: usize, const ROWS: usize> = LooseArray<Vector<T, LANES>, ROWS>;

/// `M` tightly packed matrices of `ROWS` rows with `LANES` lanes each.
pub type LooseMatrixArray<T, const LANES: usize, const ROWS: usize, const M: usize> =
    LooseArray<LooseMatrix<T, LANES, ROWS>, M>;

impl<V: Copy, const K: usize> LooseArray<V, K> {
    /// The number of elements.
    pub const LEN: usize = K;

    /// The size in bytes.
    pub const SIZE: usize = K * size_of::<V>();

    const NOT_EMPTY: () = assert!(K > 0, "arrays have at least one element");

    pub const fn new(elements: [V; K]) -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::NOT_EMPTY;
        Self(elements)
    }

    /// The byte offset of element `index`.
    pub const fn offset_of(index: usize) -> usize {
        assert!(index < K, "index out of range for loose array");
        index * size_of::<V>()
    }

    pub fn to_array(self) -> [V; K] {
        self.0
    }

    pub fn as_array(&self) -> &[V; K] {
        &self.0
    }

    pub fn as_mut_array(&mut self) -> &mut [V; K] {
        &mut self.0
    }

    pub fn get(&self, index: usize) -> Option<&V> {
        self.0.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut V> {
        self.0.get_mut(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, V> {
        self.0.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, V> {
        self.0.iter_mut()
    }
}

impl<V: Pod, const K: usize> LooseArray<V, K> {
    /// Overwrites the whole array with the bits of a same-sized value.
    /// Fails to compile if the sizes differ.
    ///
    /// ```rust compile_fail,E0080
    /// use hlsl_layout::{Float3, LooseArray};
    ///
    /// // Two tightly packed vectors are 24 bytes.
    /// let mut array = LooseArray::<Float3, 2>::default();
    /// array.assign_bits(&[0.0f32; 8]);
    /// ```
    pub fn assign_bits<S: Pod>(&mut self, source: &S) {
        bits::assign(self, source);
    }

    /// Reinterprets the bits of the whole array as a same-sized value.
    /// Fails to compile if the sizes differ.
    pub fn reinterpret_as<D: Pod>(&self) -> D {
        bits::cast(self)
    }

    /// Overwrites the whole array with `bytes`.
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

impl<V: Copy + Default, const K: usize> Default for LooseArray<V, K> {
    fn default() -> Self {
        Self::new([V::default(); K])
    }
}

impl<V: Copy, const K: usize> From<[V; K]> for LooseArray<V, K> {
    fn from(value: [V; K]) -> Self {
        Self::new(value)
    }
}

impl<V: Copy, const K: usize> Index<usize> for LooseArray<V, K> {
    type Output = V;

    #[track_caller]
    fn index(&self, index: usize) -> &V {
        match self.0.get(index) {
            Some(value) => value,
            None => index_out_of_range("loose array", index, K),
        }
    }
}

impl<V: Copy, const K: usize> IndexMut<usize> for LooseArray<V, K> {
    #[track_caller]
    fn index_mut(&mut self, index: usize) -> &mut V {
        match self.0.get_mut(index) {
            Some(value) => value,
            None => index_out_of_range("loose array", index, K),
        }
    }
}

impl<'a, V: Copy, const K: usize> IntoIterator for &'a LooseArray<V, K> {
    type Item = &'a V;
    type IntoIter = std::slice::Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offset<A, V>(array: &A, element: &V) -> usize {
        element as *const V as usize - array as *const A as usize
    }

    #[test]
    fn vector_array_layout() {
        type Array = LooseArray<Vector<f32, 3>, 2>;
        assert_eq!(24, size_of::<Array>());
        assert_eq!(24, Array::SIZE);
        assert_eq!(0, Array::offset_of(0));
        assert_eq!(12, Array::offset_of(1));

        let array = Array::default();
        assert_eq!(12, offset(&array, &array[1]));
    }

    #[test]
    fn matrix_array_layout() {
        type Matrices = LooseMatrixArray<f32, 3, 3, 2>;
        assert_eq!(72, size_of::<Matrices>());
        assert_eq!(36, Matrices::offset_of(1));

        let matrices = Matrices::default();
        assert_eq!(36 + 24, offset(&matrices, &matrices[1][2]));
    }

    #[test]
    fn write_rows() {
        let mut matrix = LooseMatrix::<u32, 2, 2>::default();
        matrix[1].y = 3;
        matrix[0][0] = 1;
        assert_eq!([1, 0, 0, 3], matrix.reinterpret_as::<[u32; 4]>());
    }

    #[test]
    fn bits_roundtrip() {
        let mut array = LooseArray::new([Vector::new([1.5f32, 2.5]), Vector::new([3.5, 4.5])]);
        let raw: [u32; 4] = array.reinterpret_as();
        array[0].x = 0.0;
        array.assign_bits(&raw);
        assert_eq!([1.5, 2.5], array[0].to_array());
        assert_eq!([3.5, 4.5], array[1].to_array());
    }

    #[test]
    #[should_panic(expected = "index 4 is out of range for loose array of length 4")]
    fn index_out_of_range() {
        let array = LooseArray::<Vector<i32, 4>, 4>::default();
        let _ = array[4];
    }

    #[test]
    #[should_panic(expected = "size mismatch: cannot assign 20 bytes to a value of 24 bytes")]
    fn assign_bytes_wrong_size() {
        let mut array = LooseArray::<Vector<f32, 3>, 2>::default();
        array.assign_bytes(&[0; 20]);
    }
}
