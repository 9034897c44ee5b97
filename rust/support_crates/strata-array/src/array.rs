//! The public resizable array and its structural operations.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use std::ptr;

use strata_common::result::{verify_index, verify_range};
use strata_common::{Error, Result, verify_arg};

use crate::class;
use crate::options::ArrayOptions;
use crate::storage::RawStorage;

/// A growable contiguous array with fallible, all-or-nothing operations.
///
/// Every operation that takes an index validates it and fails with
/// `IndexOutOfRange` without touching the array; growth failures surface as
/// `OutOfMemory` with the prior contents intact.
///
/// Structural operations come in two flavors:
/// - [`delete`](Array::delete) is a swap-remove: O(1), does not preserve order.
/// - [`delete_shift`](Array::delete_shift) closes the gap by shifting the tail:
///   O(count - index), preserves order.
///
/// # Examples
///
/// ```
/// use strata_array::Array;
///
/// let mut a = Array::new();
/// a.append_slice(&[1, 2, 3, 4, 5]).unwrap();
/// a.delete(1).unwrap();
/// assert_eq!(a.as_slice(), &[1, 5, 3, 4]);
/// a.delete_shift(1, 1).unwrap();
/// assert_eq!(a.as_slice(), &[1, 3, 4]);
/// ```
pub struct Array<T> {
    storage: RawStorage<T>,
}

impl<T> Array<T> {
    /// Creates a new empty array. Does not allocate.
    pub fn new() -> Array<T> {
        Self::with_options(ArrayOptions::default())
    }

    pub fn with_options(options: ArrayOptions) -> Array<T> {
        Array {
            storage: RawStorage::new(options),
        }
    }

    /// Creates an empty array with room for at least `capacity` elements.
    pub fn with_capacity(capacity: usize) -> Result<Array<T>> {
        Self::with_capacity_and_options(capacity, ArrayOptions::default())
    }

    pub fn with_capacity_and_options(capacity: usize, options: ArrayOptions) -> Result<Array<T>> {
        Ok(Array {
            storage: RawStorage::with_capacity(capacity, options)?,
        })
    }

    /// Number of live elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.storage.count()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.storage.capacity()
    }

    pub fn options(&self) -> &ArrayOptions {
        self.storage.options()
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        self.storage.as_slice()
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self.storage.as_mut_slice()
    }

    /// Raw pointer to the first slot.
    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.storage.as_ptr()
    }

    /// Byte length of the live range.
    #[inline]
    pub fn byte_len(&self) -> usize {
        self.len() * std::mem::size_of::<T>()
    }

    /// Ensures the array can hold `capacity` elements in total without reallocating.
    pub fn reserve(&mut self, capacity: usize) -> Result<()> {
        self.storage.reserve(capacity)
    }

    /// Ensures room for `extra` more elements, growing geometrically.
    pub fn expand(&mut self, extra: usize) -> Result<()> {
        self.storage.expand(extra)
    }

    pub fn resize_with<F>(&mut self, new_len: usize, f: F) -> Result<()>
    where
        F: FnMut() -> T,
    {
        self.storage.resize_with(new_len, f)
    }

    /// Resizes to `new_len`, filling new slots with `T::default()`.
    pub fn resize(&mut self, new_len: usize) -> Result<()>
    where
        T: Default,
    {
        self.storage.resize_with(new_len, T::default)
    }

    pub fn truncate(&mut self, new_len: usize) {
        self.storage.truncate(new_len);
    }

    /// Drops all elements, keeping the capacity for reuse.
    pub fn clear(&mut self) {
        self.storage.clear();
    }

    /// Drops all elements and releases the memory.
    pub fn free(&mut self) {
        self.storage.free();
    }

    pub fn shrink_to_fit(&mut self) -> Result<()> {
        self.storage.shrink_to_fit()
    }

    /// Shrinks the capacity to `max(len(), min_capacity)`. Never grows.
    pub fn shrink_to(&mut self, min_capacity: usize) -> Result<()> {
        self.storage.shrink_to(min_capacity)
    }

    /// Moves the contents out into a new array, leaving `self` empty.
    pub fn take(&mut self) -> Array<T> {
        Array {
            storage: self.storage.take(),
        }
    }

    /// Appends `value` and returns its index.
    #[inline]
    pub fn append(&mut self, value: T) -> Result<usize> {
        let index = self.len();
        self.storage.expand(1)?;
        unsafe {
            ptr::write(self.storage.slot_ptr(index), value);
            self.storage.set_count(index + 1);
        }
        Ok(index)
    }

    /// Alias of [`append`](Array::append) for stack-style callers.
    #[inline]
    pub fn push(&mut self, value: T) -> Result<usize> {
        self.append(value)
    }

    /// Appends clones of `values`; returns the index of the first one.
    pub fn append_slice(&mut self, values: &[T]) -> Result<usize>
    where
        T: Clone,
    {
        let start = self.len();
        self.storage.expand(values.len())?;
        for value in values {
            let index = self.len();
            unsafe {
                ptr::write(self.storage.slot_ptr(index), value.clone());
                self.storage.set_count(index + 1);
            }
        }
        Ok(start)
    }

    /// Appends every item of `iter`; returns the index of the first one.
    ///
    /// If growth fails partway, the items appended by this call are dropped again
    /// and the capacity it added is given back, so the array is left as it was.
    pub fn append_iter<I>(&mut self, iter: I) -> Result<usize>
    where
        I: IntoIterator<Item = T>,
    {
        let start = self.len();
        let capacity = self.capacity();
        let iter = iter.into_iter();
        self.storage.expand(iter.size_hint().0)?;
        for value in iter {
            if let Err(e) = self.append(value) {
                self.truncate(start);
                if let Err(shrink) = self.storage.shrink_to(capacity) {
                    log::warn!("could not return capacity after failed append: {shrink}");
                }
                return Err(e);
            }
        }
        Ok(start)
    }

    /// Removes and returns the last element.
    pub fn pop(&mut self) -> Option<T> {
        let last = self.len().checked_sub(1)?;
        unsafe {
            self.storage.set_count(last);
            Some(ptr::read(self.storage.slot_ptr(last)))
        }
    }

    /// Bounds-checked access.
    #[inline]
    pub fn at(&self, index: usize) -> Result<&T> {
        self.as_slice()
            .get(index)
            .ok_or_else(|| Error::index_out_of_range(index, self.len()))
    }

    #[inline]
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T> {
        let len = self.len();
        self.as_mut_slice()
            .get_mut(index)
            .ok_or_else(|| Error::index_out_of_range(index, len))
    }

    /// Returns a copy of the element at `index`.
    pub fn read_at(&self, index: usize) -> Result<T>
    where
        T: Clone,
    {
        self.at(index).cloned()
    }

    /// Overwrites the element at `index`, dropping the previous value.
    pub fn write_at(&mut self, index: usize, value: T) -> Result<()> {
        *self.at_mut(index)? = value;
        Ok(())
    }

    /// Swap-remove: drops the element at `index` and moves the last element into
    /// its slot. O(1), does not preserve order.
    ///
    /// Index-addressed pools rely on this being the only structural change: after
    /// the call, the element that was at `len() - 1` (if `index` was not last) now
    /// lives at `index`, and nothing else moved.
    pub fn delete(&mut self, index: usize) -> Result<()> {
        self.swap_take(index).map(drop)
    }

    /// Swap-remove returning the removed element.
    pub fn swap_take(&mut self, index: usize) -> Result<T> {
        verify_index(index, self.len())?;
        let last = self.len() - 1;
        unsafe {
            let hole = self.storage.slot_ptr(index);
            let removed = ptr::read(hole);
            if index != last {
                class::relocate(self.storage.slot_ptr(last), hole, 1);
            }
            self.storage.set_count(last);
            Ok(removed)
        }
    }

    /// Shift-remove: drops `k` elements starting at `index` and shifts the tail down
    /// to close the gap. O(count - index), preserves order.
    pub fn delete_shift(&mut self, index: usize, k: usize) -> Result<()> {
        verify_arg!(k, k > 0);
        verify_range(index, k, self.len())?;
        let len = self.len();
        let tail = len - index - k;
        unsafe {
            // A panicking destructor leaks the tail instead of exposing dropped slots.
            self.storage.set_count(index);
            class::destroy(self.storage.slot_ptr(index), k);
            let src = self.storage.slot_ptr(index + k);
            class::relocate(src, self.storage.slot_ptr(index), tail);
            self.storage.set_count(len - k);
        }
        Ok(())
    }

    /// Shift-remove of a single element, returning it.
    pub fn remove(&mut self, index: usize) -> Result<T> {
        verify_index(index, self.len())?;
        let len = self.len();
        unsafe {
            let hole = self.storage.slot_ptr(index);
            let removed = ptr::read(hole);
            class::relocate(hole.add(1), hole, len - index - 1);
            self.storage.set_count(len - 1);
            Ok(removed)
        }
    }

    /// Inserts `value` at `index` (`index <= len()`), shifting the tail up by one.
    pub fn insert(&mut self, index: usize, value: T) -> Result<()> {
        self.verify_insert_index(index)?;
        self.storage.expand(1)?;
        let len = self.len();
        unsafe {
            let at = self.storage.slot_ptr(index);
            class::relocate(at, at.add(1), len - index);
            ptr::write(at, value);
            self.storage.set_count(len + 1);
        }
        Ok(())
    }

    /// Inserts clones of `values` at `index` (`index <= len()`), shifting the tail
    /// up by `values.len()`.
    pub fn insert_slice(&mut self, index: usize, values: &[T]) -> Result<()>
    where
        T: Clone,
    {
        self.verify_insert_index(index)?;
        if values.is_empty() {
            return Ok(());
        }
        let n = values.len();
        self.storage.expand(n)?;
        let len = self.len();
        unsafe {
            // Until the gap is filled only the head counts as live, so a panicking
            // `clone` leaks the shifted tail rather than exposing the gap.
            self.storage.set_count(index);
            let at = self.storage.slot_ptr(index);
            class::relocate(at, at.add(n), len - index);
            for (i, value) in values.iter().enumerate() {
                ptr::write(at.add(i), value.clone());
            }
            self.storage.set_count(len + n);
        }
        Ok(())
    }

    /// Relocates the run `[src, src + n)` so that it occupies `[dst, dst + n)`.
    ///
    /// The elements displaced by the run fill the slots it vacated, keeping their
    /// relative order; the result is the same as lifting the run into a separate
    /// buffer, closing the hole, opening a new one at `dst` and putting the run
    /// back. Both ranges must lie within `[0, len())` and may overlap.
    ///
    /// ```
    /// use strata_array::Array;
    ///
    /// let mut a = Array::from(vec![10, 20, 30, 40, 50]);
    /// a.move_range(1, 3, 2).unwrap();
    /// assert_eq!(a.as_slice(), &[10, 40, 50, 20, 30]);
    /// ```
    pub fn move_range(&mut self, src: usize, dst: usize, n: usize) -> Result<()> {
        verify_arg!(n, n > 0);
        verify_range(src, n, self.len())?;
        verify_range(dst, n, self.len())?;
        if src == dst {
            return Ok(());
        }

        // `displaced` is the segment the run jumps over.
        let (low, displaced) = if dst > src {
            (src, dst - src)
        } else {
            (dst, src - dst)
        };
        let parked = n.min(displaced);
        // Only the allocation of `parking` is used; its length stays zero, so
        // dropping it frees the memory without touching any element.
        let mut parking = Vec::<T>::new();
        parking.try_reserve_exact(parked)?;
        let temp = parking.as_mut_ptr();

        unsafe {
            let base = self.storage.slot_ptr(low);
            // `run_at` / `rest_at` are offsets from `low` before the move; afterwards
            // the run starts at `dst - low` and the displaced segment fills the rest.
            let (run_at, rest_at, run_to, rest_to) = if dst > src {
                (0, n, displaced, 0)
            } else {
                (displaced, 0, 0, n)
            };
            if n <= displaced {
                class::relocate_nonoverlapping(base.add(run_at), temp, n);
                class::relocate(base.add(rest_at), base.add(rest_to), displaced);
                class::relocate_nonoverlapping(temp, base.add(run_to), n);
            } else {
                class::relocate_nonoverlapping(base.add(rest_at), temp, displaced);
                class::relocate(base.add(run_at), base.add(run_to), n);
                class::relocate_nonoverlapping(temp, base.add(rest_to), displaced);
            }
        }
        Ok(())
    }

    /// Swaps the elements at `i` and `j`.
    pub fn exchange(&mut self, i: usize, j: usize) -> Result<()> {
        verify_index(i, self.len())?;
        verify_index(j, self.len())?;
        if i != j {
            unsafe {
                let a = self.storage.slot_ptr(i);
                let b = self.storage.slot_ptr(j);
                class::exchange(a, b);
            }
        }
        Ok(())
    }

    /// Index of the first element matching `pred`.
    pub fn find_by<F>(&self, mut pred: F) -> Option<usize>
    where
        F: FnMut(&T) -> bool,
    {
        for (i, value) in self.as_slice().iter().enumerate() {
            if pred(value) {
                return Some(i);
            }
        }
        None
    }

    /// Index of the first element equal to `value`, `None` when absent.
    pub fn find(&self, value: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        self.find_by(|v| v == value)
    }

    /// Lexicographic comparison with a custom element ordering.
    pub fn compare_by<F>(&self, other: &[T], mut cmp: F) -> Ordering
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        for (a, b) in self.as_slice().iter().zip(other) {
            match cmp(a, b) {
                Ordering::Equal => (),
                unequal => return unequal,
            }
        }
        self.len().cmp(&other.len())
    }

    /// Lexicographic comparison: the first differing pair decides, and a strict
    /// prefix orders before the longer sequence.
    pub fn compare(&self, other: &[T]) -> Ordering
    where
        T: Ord,
    {
        self.compare_by(other, Ord::cmp)
    }

    /// Returns a new array with the elements not present in `exclude`, in their
    /// original order. `self` is not modified.
    pub fn without_list(&self, exclude: &[T]) -> Result<Array<T>>
    where
        T: Clone + PartialEq,
    {
        let mut result = Array::with_options(self.options().clone());
        for value in self.as_slice() {
            if !exclude.contains(value) {
                result.append(value.clone())?;
            }
        }
        Ok(result)
    }

    /// Deep copy with independently owned memory.
    pub fn try_clone(&self) -> Result<Array<T>>
    where
        T: Clone,
    {
        let mut copy = Array::with_capacity_and_options(self.len(), self.options().clone())?;
        copy.append_slice(self.as_slice())?;
        Ok(copy)
    }

    pub fn into_vec(mut self) -> Vec<T> {
        let len = self.len();
        let mut vec = Vec::with_capacity(len);
        unsafe {
            class::relocate_nonoverlapping(self.storage.as_ptr(), vec.as_mut_ptr(), len);
            self.storage.set_count(0);
            vec.set_len(len);
        }
        vec
    }

    /// Pointer to the first slot past the live range.
    ///
    /// # Safety
    ///
    /// Writes through it must stay within `capacity`.
    #[inline]
    pub(crate) unsafe fn spare_ptr(&mut self) -> *mut T {
        let len = self.len();
        unsafe { self.storage.slot_ptr(len) }
    }

    /// # Safety
    ///
    /// See [`RawStorage::set_count`].
    #[inline]
    pub(crate) unsafe fn set_len(&mut self, len: usize) {
        unsafe { self.storage.set_count(len) };
    }

    fn verify_insert_index(&self, index: usize) -> Result<()> {
        if index > self.len() {
            return Err(Error::index_out_of_range(index, self.len()));
        }
        Ok(())
    }
}

#[cold]
#[track_caller]
fn allocation_failed(e: Error) -> ! {
    panic!("array allocation failed: {e}")
}

impl<T> Default for Array<T> {
    fn default() -> Self {
        Array::new()
    }
}

impl<T: Clone> Clone for Array<T> {
    fn clone(&self) -> Self {
        self.try_clone().unwrap_or_else(|e| allocation_failed(e))
    }
}

impl<T> std::ops::Deref for Array<T> {
    type Target = [T];

    #[inline]
    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> std::ops::DerefMut for Array<T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Array<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Array")
            .field("values", &self.as_slice())
            .field("len", &self.len())
            .field("cap", &self.capacity())
            .finish_non_exhaustive()
    }
}

impl<T: PartialEq> PartialEq for Array<T> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq> Eq for Array<T> {}

impl<T: PartialOrd> PartialOrd for Array<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.as_slice().partial_cmp(other.as_slice())
    }
}

impl<T: Ord> Ord for Array<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(other)
    }
}

impl<T: Hash> Hash for Array<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state);
    }
}

impl<T> From<Vec<T>> for Array<T> {
    fn from(vec: Vec<T>) -> Self {
        let mut array = Array::new();
        if let Err(e) = array.append_iter(vec) {
            allocation_failed(e);
        }
        array
    }
}

impl<T> FromIterator<T> for Array<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut array = Array::new();
        if let Err(e) = array.append_iter(iter) {
            allocation_failed(e);
        }
        array
    }
}

impl<T> Extend<T> for Array<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        if let Err(e) = self.append_iter(iter) {
            allocation_failed(e);
        }
    }
}

impl<T> IntoIterator for Array<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.into_vec().into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Array<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl<'a, T> IntoIterator for &'a mut Array<T> {
    type Item = &'a mut T;
    type IntoIter = std::slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_mut_slice().iter_mut()
    }
}
