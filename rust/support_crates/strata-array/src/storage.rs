//! Owned contiguous slot storage.
//!
//! [`RawStorage<T>`] owns a single allocation of `capacity` slots of `T`, of which
//! the first `count` hold live values. It is the only place in the crate that talks
//! to the allocator and to the memory budget.

use std::alloc::{self, Layout};
use std::marker::PhantomData;
use std::ptr::{self, NonNull};

use strata_budget_tracker::Allocation;
use strata_common::{Error, Result};

use crate::class;
use crate::options::{ArrayOptions, GrowthPolicy};

pub struct RawStorage<T> {
    ptr: NonNull<T>,
    capacity: usize,
    count: usize,
    options: ArrayOptions,
    /// Budget charge for the current allocation, when the options carry a budget.
    charge: Option<Allocation>,
    _p: PhantomData<T>,
}

// SAFETY: the storage exclusively owns its elements, like `Vec<T>`.
unsafe impl<T: Send> Send for RawStorage<T> {}
unsafe impl<T: Sync> Sync for RawStorage<T> {}

impl<T> RawStorage<T> {
    const IS_ZST: bool = std::mem::size_of::<T>() == 0;

    pub fn new(options: ArrayOptions) -> RawStorage<T> {
        let charge = options.budget.as_ref().map(|b| b.empty_allocation());
        RawStorage {
            ptr: NonNull::dangling(),
            capacity: 0,
            count: 0,
            options,
            charge,
            _p: PhantomData,
        }
    }

    pub fn with_capacity(capacity: usize, options: ArrayOptions) -> Result<RawStorage<T>> {
        let mut storage = RawStorage::new(options);
        storage.reserve(capacity)?;
        Ok(storage)
    }

    /// Number of allocated slots. Zero-sized element types never allocate and
    /// report `usize::MAX`.
    #[inline]
    pub fn capacity(&self) -> usize {
        if Self::IS_ZST {
            usize::MAX
        } else {
            self.capacity
        }
    }

    /// Number of live slots.
    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn options(&self) -> &ArrayOptions {
        &self.options
    }

    #[inline]
    pub fn growth(&self) -> &GrowthPolicy {
        &self.options.growth
    }

    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.ptr.as_ptr()
    }

    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.ptr.as_ptr()
    }

    /// Pointer to slot `index`; `index` may equal `capacity`.
    ///
    /// # Safety
    ///
    /// `index <= capacity`.
    #[inline]
    pub unsafe fn slot_ptr(&mut self, index: usize) -> *mut T {
        debug_assert!(index <= self.capacity());
        unsafe { self.ptr.as_ptr().add(index) }
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.count) }
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.count) }
    }

    /// Sets the live count without constructing or dropping anything.
    ///
    /// # Safety
    ///
    /// `count <= capacity`, and slots `[0, count)` must hold live values.
    #[inline]
    pub unsafe fn set_count(&mut self, count: usize) {
        debug_assert!(count <= self.capacity());
        self.count = count;
    }

    /// Ensures `capacity >= capacity_needed`. Never moves the live range relative to
    /// its start and never shrinks.
    pub fn reserve(&mut self, capacity_needed: usize) -> Result<()> {
        if capacity_needed <= self.capacity() {
            return Ok(());
        }
        self.reallocate(capacity_needed)
    }

    /// Ensures room for `extra` more slots beyond `count`, growing geometrically.
    #[inline]
    pub fn expand(&mut self, extra: usize) -> Result<()> {
        let required = self
            .count
            .checked_add(extra)
            .ok_or_else(|| Error::out_of_memory(usize::MAX))?;
        if required <= self.capacity() {
            return Ok(());
        }
        self.grow(required)
    }

    #[cold]
    fn grow(&mut self, required: usize) -> Result<()> {
        let new_capacity = self.growth().grown_capacity(self.capacity, required);
        self.reallocate(new_capacity)
    }

    /// Sets `count = new_count`, filling new slots with values produced by `f`, or
    /// dropping vacated ones.
    pub fn resize_with<F>(&mut self, new_count: usize, mut f: F) -> Result<()>
    where
        F: FnMut() -> T,
    {
        if new_count <= self.count {
            self.truncate(new_count);
            return Ok(());
        }
        self.expand(new_count - self.count)?;
        while self.count < new_count {
            unsafe {
                ptr::write(self.slot_ptr(self.count), f());
            }
            self.count += 1;
        }
        Ok(())
    }

    /// Drops the slots `[new_count, count)`. No-op if `new_count >= count`.
    pub fn truncate(&mut self, new_count: usize) {
        if new_count >= self.count {
            return;
        }
        let vacated = self.count - new_count;
        // Shrink first: a panicking destructor leaks the rest instead of exposing
        // dropped slots.
        self.count = new_count;
        unsafe { class::destroy(self.slot_ptr(new_count), vacated) };
    }

    /// Drops all live values; capacity is kept.
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Drops all live values and releases the memory.
    pub fn free(&mut self) {
        self.clear();
        self.release();
    }

    /// Reallocates to exactly `count` slots, releasing the memory when empty.
    pub fn shrink_to_fit(&mut self) -> Result<()> {
        self.shrink_to(0)
    }

    /// Reallocates to `max(count, min_capacity)` slots when that is below the
    /// current capacity; releases the memory when it is zero.
    pub fn shrink_to(&mut self, min_capacity: usize) -> Result<()> {
        let target = self.count.max(min_capacity);
        if Self::IS_ZST || target >= self.capacity {
            return Ok(());
        }
        if target == 0 {
            self.release();
            return Ok(());
        }
        self.reallocate(target)
    }

    /// Moves the storage out, leaving `self` empty with the same options.
    pub fn take(&mut self) -> RawStorage<T> {
        let empty = RawStorage::new(self.options.clone());
        std::mem::replace(self, empty)
    }

    fn release(&mut self) {
        if Self::IS_ZST || self.capacity == 0 {
            return;
        }
        debug_assert_eq!(self.count, 0);
        log::trace!(
            "releasing storage of {} slots of {}",
            self.capacity,
            std::any::type_name::<T>()
        );
        unsafe {
            alloc::dealloc(
                self.ptr.as_ptr() as *mut u8,
                Layout::array::<T>(self.capacity).unwrap_unchecked(),
            );
        }
        self.ptr = NonNull::dangling();
        self.capacity = 0;
        if let Some(charge) = self.charge.as_mut() {
            charge.shrink_to(0);
        }
    }

    /// Moves the live range into a new allocation of `new_capacity` slots.
    ///
    /// On failure (layout overflow, budget refusal, allocator returning null) the
    /// storage is left exactly as it was.
    fn reallocate(&mut self, new_capacity: usize) -> Result<()> {
        debug_assert!(new_capacity >= self.count && new_capacity > 0);
        if Self::IS_ZST {
            return Ok(());
        }
        let new_layout =
            Layout::array::<T>(new_capacity).map_err(|_| Error::out_of_memory(usize::MAX))?;
        let old_bytes = self.capacity * std::mem::size_of::<T>();
        let new_bytes = new_layout.size();

        // Growth is charged before allocating and shrinkage released after, so a
        // failure at either step leaves the charge matching the old allocation.
        if let Some(charge) = self.charge.as_mut().filter(|_| new_bytes > old_bytes) {
            if charge.resize_to(new_bytes as u64).is_err() {
                log::warn!(
                    "memory budget refused growth of {} storage from {old_bytes} to {new_bytes} bytes",
                    std::any::type_name::<T>()
                );
                return Err(Error::out_of_memory(new_bytes));
            }
        }

        let new_ptr = unsafe {
            if self.capacity == 0 {
                alloc::alloc(new_layout)
            } else {
                let old_layout = Layout::array::<T>(self.capacity).unwrap_unchecked();
                alloc::realloc(self.ptr.as_ptr() as *mut u8, old_layout, new_bytes)
            }
        };
        let Some(new_ptr) = NonNull::new(new_ptr as *mut T) else {
            if let Some(charge) = self.charge.as_mut() {
                charge.shrink_to(old_bytes as u64);
            }
            log::warn!(
                "allocator refused {new_bytes} bytes for {} storage",
                std::any::type_name::<T>()
            );
            return Err(Error::out_of_memory(new_bytes));
        };

        log::debug!(
            "{} storage reallocated: {} -> {} slots ({} live)",
            std::any::type_name::<T>(),
            self.capacity,
            new_capacity,
            self.count
        );
        self.ptr = new_ptr;
        self.capacity = new_capacity;
        if let Some(charge) = self.charge.as_mut() {
            charge.shrink_to(new_bytes as u64);
        }
        Ok(())
    }
}

impl<T> Drop for RawStorage<T> {
    fn drop(&mut self) {
        self.free();
    }
}
