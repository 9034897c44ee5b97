//! Element classification.
//!
//! Every element type falls into one of two categories:
//!
//! - **Relocatable**: the value has no identity beyond its bytes and no drop glue.
//!   A run of such values is moved with a single `memmove`, and ranges of them are
//!   discarded without touching the memory.
//! - **Managed**: the value owns resources (heap memory, handles, counters) and must
//!   be dropped exactly once. Runs are moved one element at a time in an order that
//!   never overwrites an unread source slot, and discarded ranges are dropped in place.
//!
//! The class is a constant of the monomorphized type, so every branch on it folds
//! away at compile time and relocatable element types pay nothing per element.

use std::any::TypeId;
use std::ptr;

/// Static category of an element type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementClass {
    Relocatable,
    Managed,
}

/// Compile-time element classification, implemented for every type.
pub trait Classified: Sized {
    const CLASS: ElementClass;
}

impl<T> Classified for T {
    const CLASS: ElementClass = if std::mem::needs_drop::<T>() {
        ElementClass::Managed
    } else {
        ElementClass::Relocatable
    };
}

#[inline(always)]
pub const fn class_of<T>() -> ElementClass {
    <T as Classified>::CLASS
}

#[inline(always)]
pub const fn is_relocatable<T>() -> bool {
    matches!(class_of::<T>(), ElementClass::Relocatable)
}

/// Size, alignment and class of an element type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementInfo {
    pub type_id: TypeId,
    pub type_name: &'static str,
    pub size: usize,
    pub align: usize,
    pub class: ElementClass,
}

impl ElementInfo {
    pub fn of<T: 'static>() -> ElementInfo {
        ElementInfo {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            size: std::mem::size_of::<T>(),
            align: std::mem::align_of::<T>(),
            class: class_of::<T>(),
        }
    }

    /// Byte length of `count` contiguous elements, `None` on overflow.
    pub fn byte_len(&self, count: usize) -> Option<usize> {
        self.size.checked_mul(count)
    }
}

/// Moves `count` elements from `src` to `dst` within one allocation.
///
/// The ranges may overlap. Afterwards the slots of `src` that are not covered by
/// `dst` are logically uninitialized.
///
/// # Safety
///
/// Both ranges must be within one allocation, `src..src + count` must hold live
/// values, and `dst..dst + count` must hold no live values other than those of
/// the source range.
#[inline]
pub(crate) unsafe fn relocate<T>(src: *const T, dst: *mut T, count: usize) {
    if count == 0 || ptr::eq(src, dst) {
        return;
    }
    match class_of::<T>() {
        ElementClass::Relocatable => unsafe { ptr::copy(src, dst, count) },
        ElementClass::Managed => unsafe { relocate_each(src, dst, count) },
    }
}

/// Element-by-element overlap-safe move.
///
/// Walks low to high when the run moves toward lower addresses and high to low
/// when it moves toward higher ones, so every source slot is read before the
/// destination pointer reaches it.
///
/// # Safety
///
/// Same as [`relocate`].
pub(crate) unsafe fn relocate_each<T>(src: *const T, dst: *mut T, count: usize) {
    if (dst as *const T) < src {
        for i in 0..count {
            unsafe { ptr::write(dst.add(i), ptr::read(src.add(i))) };
        }
    } else {
        for i in (0..count).rev() {
            unsafe { ptr::write(dst.add(i), ptr::read(src.add(i))) };
        }
    }
}

/// Moves `count` elements between two distinct allocations.
///
/// # Safety
///
/// The ranges must not overlap; `src` must hold live values and `dst` must be
/// writable uninitialized memory.
#[inline]
pub(crate) unsafe fn relocate_nonoverlapping<T>(src: *const T, dst: *mut T, count: usize) {
    unsafe { ptr::copy_nonoverlapping(src, dst, count) };
}

/// Drops `count` live elements starting at `start`.
///
/// # Safety
///
/// The range must hold live values, which are uninitialized afterwards.
#[inline]
pub(crate) unsafe fn destroy<T>(start: *mut T, count: usize) {
    if let ElementClass::Managed = class_of::<T>() {
        unsafe { ptr::drop_in_place(ptr::slice_from_raw_parts_mut(start, count)) };
    }
}

/// Swaps two distinct live slots.
///
/// # Safety
///
/// Both pointers must refer to distinct live slots.
#[inline]
pub(crate) unsafe fn exchange<T>(a: *mut T, b: *mut T) {
    match class_of::<T>() {
        ElementClass::Relocatable => unsafe { ptr::swap_nonoverlapping(a, b, 1) },
        ElementClass::Managed => unsafe {
            // move out, move over, move back through one temporary slot
            let tmp = ptr::read(a);
            ptr::copy_nonoverlapping(b, a, 1);
            ptr::write(b, tmp);
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy)]
    #[allow(dead_code)]
    struct Point {
        x: f32,
        y: f32,
    }

    #[test]
    fn test_classification() {
        assert_eq!(class_of::<u8>(), ElementClass::Relocatable);
        assert_eq!(class_of::<Point>(), ElementClass::Relocatable);
        assert_eq!(class_of::<(u32, [u64; 4])>(), ElementClass::Relocatable);
        assert_eq!(class_of::<String>(), ElementClass::Managed);
        assert_eq!(class_of::<Vec<u8>>(), ElementClass::Managed);
        assert_eq!(class_of::<Option<Box<u8>>>(), ElementClass::Managed);
        assert!(is_relocatable::<&str>());
        assert!(!is_relocatable::<std::sync::Arc<u8>>());
    }

    #[test]
    fn test_element_info() {
        let info = ElementInfo::of::<u64>();
        assert_eq!(info.size, 8);
        assert_eq!(info.align, 8);
        assert_eq!(info.class, ElementClass::Relocatable);
        assert_eq!(info.byte_len(3), Some(24));
        assert_eq!(info.byte_len(usize::MAX), None);
        assert_eq!(ElementInfo::of::<String>().class, ElementClass::Managed);
    }

    #[test]
    fn test_relocate_each_overlapping() {
        let mut forward = [1, 2, 3, 4, 5, 6];
        let mut backward = forward;
        unsafe {
            let p = forward.as_mut_ptr();
            relocate_each(p.add(2), p, 3);
            let p = backward.as_mut_ptr();
            relocate_each(p, p.add(2), 3);
        }
        assert_eq!(forward, [3, 4, 5, 4, 5, 6]);
        assert_eq!(backward, [1, 2, 1, 2, 3, 6]);
    }
}
