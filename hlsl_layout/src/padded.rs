use std::cmp::Ordering;
use std::fmt::{self, Debug};
use std::mem::size_of;
use std::ops::{Index, IndexMut};

use bytemuck::{Pod, Zeroable};

use crate::layout::{ArrayLength, Length, Padded, PaddedElement};
use crate::{bits, index_out_of_range, Vector};

/// `K` elements laid out with constant buffer packing.
///
/// Every element starts on a 16-byte boundary, so element `i` is at byte `i * STRIDE`.
/// The last element is not followed by padding, which makes the size
/// `(K - 1) * STRIDE + size_of::<V>()`.
/// The padding bytes between elements are never read or written by the accessors.
///
/// ```rust
/// use hlsl_layout::{PaddedArray, Vector};
///
/// type Rows = PaddedArray<Vector<f32, 3>, 2>;
/// assert_eq!(16, Rows::STRIDE);
/// assert_eq!(28, std::mem::size_of::<Rows>());
///
/// let mut rows = Rows::default();
/// rows[1].z = 2.0;
/// ```
#[repr(C)]
pub struct PaddedArray<V: PaddedElement, const K: usize>
where
    Length<K>: ArrayLength,
{
    head: <Length<K> as ArrayLength>::Head<Padded<V>>,
    last: V,
}

/// A matrix of `ROWS` rows with `LANES` lanes each, one row per 16-byte register.
pub type PaddedMatrix<T, const LANES: usize, const ROWS: usize> = PaddedArray<Vector<T, LANES>, ROWS>;

/// `M` matrices of `ROWS` rows with `LANES` lanes each, one row per 16-byte register.
///
/// Every matrix but the last occupies `ROWS * 16` bytes.
pub type PaddedMatrixArray<T, const LANES: usize, const ROWS: usize, const M: usize> =
    PaddedArray<PaddedMatrix<T, LANES, ROWS>, M>;

impl<V: PaddedElement, const K: usize> Clone for PaddedArray<V, K>
where
    Length<K>: ArrayLength,
{
    fn clone(&self) -> Self {
        *self
    }
}

impl<V: PaddedElement, const K: usize> Copy for PaddedArray<V, K> where Length<K>: ArrayLength {}

unsafe impl<V: PaddedElement, const K: usize> Zeroable for PaddedArray<V, K> where
    Length<K>: ArrayLength
{
}

unsafe impl<V: PaddedElement, const K: usize> Pod for PaddedArray<V, K> where Length<K>: ArrayLength {}

// The padding after a padded array is the padding of its last element.
unsafe impl<V: PaddedElement, const K: usize> PaddedElement for PaddedArray<V, K>
where
    Length<K>: ArrayLength,
{
    type Padding = V::Padding;
}

impl<V: PaddedElement, const K: usize> PaddedArray<V, K>
where
    Length<K>: ArrayLength,
{
    /// The number of elements.
    pub const LEN: usize = K;

    /// The distance in bytes between the start of consecutive elements.
    pub const STRIDE: usize = V::STRIDE;

    /// The size in bytes.
    pub const SIZE: usize = (K - 1) * V::STRIDE + size_of::<V>();

    /// The byte offset of element `index`.
    pub const fn offset_of(index: usize) -> usize {
        assert!(index < K, "index out of range for padded array");
        index * V::STRIDE
    }

    /// Creates an array with zeroed padding.
    pub fn from_array(elements: [V; K]) -> Self {
        let mut array = <Self as Zeroable>::zeroed();
        for (slot, element) in array.iter_mut().zip(elements) {
            *slot = element;
        }
        array
    }

    pub fn to_array(&self) -> [V; K] {
        std::array::from_fn(|i| self[i])
    }

    pub fn get(&self, index: usize) -> Option<&V> {
        #[allow(clippy::let_unit_value)]
        let () = Padded::<V>::CHECK;
        match index.cmp(&(K - 1)) {
            Ordering::Less => Some(&self.head.as_ref()[index].value),
            Ordering::Equal => Some(&self.last),
            Ordering::Greater => None,
        }
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut V> {
        #[allow(clippy::let_unit_value)]
        let () = Padded::<V>::CHECK;
        match index.cmp(&(K - 1)) {
            Ordering::Less => Some(&mut self.head.as_mut()[index].value),
            Ordering::Equal => Some(&mut self.last),
            Ordering::Greater => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &V> + '_ {
        self.head
            .as_ref()
            .iter()
            .map(|slot| &slot.value)
            .chain(std::iter::once(&self.last))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut V> + '_ {
        self.head
            .as_mut()
            .iter_mut()
            .map(|slot| &mut slot.value)
            .chain(std::iter::once(&mut self.last))
    }

    /// Overwrites the whole array, padding included, with the bits of a same-sized value.
    /// Fails to compile if the sizes differ.
    ///
    /// The source must already contain the padding.
    /// Write tightly packed data element by element instead.
    pub fn assign_bits<S: Pod>(&mut self, source: &S) {
        bits::assign(self, source);
    }

    /// Reinterprets the bits of the whole array, padding included, as a same-sized value.
    /// Fails to compile if the sizes differ.
    ///
    /// ```rust
    /// use hlsl_layout::{Float3, PaddedArray};
    ///
    /// let array = PaddedArray::<Float3, 2>::default();
    /// let bytes: [u8; 28] = array.reinterpret_as();
    /// assert_eq!([0; 28], bytes);
    /// ```
    ///
    /// The padding after the last element is not part of the array.
    ///
    /// ```rust compile_fail,E0080
    /// use hlsl_layout::{Float3, PaddedArray};
    ///
    /// let array = PaddedArray::<Float3, 2>::default();
    /// let bytes: [u8; 32] = array.reinterpret_as();
    /// ```
    pub fn reinterpret_as<D: Pod>(&self) -> D {
        bits::cast(self)
    }

    /// Overwrites the whole array, padding included, with `bytes`.
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

impl<V: PaddedElement, const K: usize> Default for PaddedArray<V, K>
where
    Length<K>: ArrayLength,
{
    fn default() -> Self {
        <Self as Zeroable>::zeroed()
    }
}

impl<V: PaddedElement, const K: usize> From<[V; K]> for PaddedArray<V, K>
where
    Length<K>: ArrayLength,
{
    fn from(value: [V; K]) -> Self {
        Self::from_array(value)
    }
}

impl<V: PaddedElement + Debug, const K: usize> Debug for PaddedArray<V, K>
where
    Length<K>: ArrayLength,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

// Padding bytes do not take part in comparisons.
impl<V: PaddedElement + PartialEq, const K: usize> PartialEq for PaddedArray<V, K>
where
    Length<K>: ArrayLength,
{
    fn eq(&self, other: &Self) -> bool {
        self.iter().eq(other.iter())
    }
}

impl<V: PaddedElement, const K: usize> Index<usize> for PaddedArray<V, K>
where
    Length<K>: ArrayLength,
{
    type Output = V;

    #[track_caller]
    fn index(&self, index: usize) -> &V {
        match self.get(index) {
            Some(value) => value,
            None => index_out_of_range("padded array", index, K),
        }
    }
}

impl<V: PaddedElement, const K: usize> IndexMut<usize> for PaddedArray<V, K>
where
    Length<K>: ArrayLength,
{
    #[track_caller]
    fn index_mut(&mut self, index: usize) -> &mut V {
        match self.get_mut(index) {
            Some(value) => value,
            None => index_out_of_range("padded array", index, K),
        }
    }
}
