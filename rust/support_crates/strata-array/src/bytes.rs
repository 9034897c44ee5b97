//! Raw byte view over arrays of plain-old-data elements.
//!
//! Persistence collaborators read and write the live range as a byte run of
//! [`Array::byte_len`] bytes; no framing or format is imposed here.

use std::ptr;

use strata_common::{Error, Result};

use crate::Array;

impl<T> Array<T>
where
    T: bytemuck::Pod,
{
    /// The live range as bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.as_slice())
    }

    /// Appends the elements encoded in `bytes`; returns the index of the first one.
    ///
    /// `bytes` need not be aligned, but its length must be a multiple of the
    /// element size.
    pub fn extend_from_bytes(&mut self, bytes: &[u8]) -> Result<usize> {
        let size = std::mem::size_of::<T>();
        if size == 0 || bytes.len() % size != 0 {
            return Err(Error::invalid_arg(
                "bytes",
                format!(
                    "length {} is not a multiple of the element size {size}",
                    bytes.len()
                ),
            ));
        }
        let n = bytes.len() / size;
        let start = self.len();
        self.expand(n)?;
        unsafe {
            let dst = self.spare_ptr() as *mut u8;
            ptr::copy_nonoverlapping(bytes.as_ptr(), dst, bytes.len());
            // Pod values are valid for any bit pattern.
            self.set_len(start + n);
        }
        Ok(start)
    }

    /// Builds an array from the byte image produced by [`as_bytes`](Array::as_bytes).
    pub fn from_bytes(bytes: &[u8]) -> Result<Array<T>> {
        let mut array = Array::new();
        array.extend_from_bytes(bytes)?;
        Ok(array)
    }
}

impl<T> Array<T>
where
    T: bytemuck::Zeroable,
{
    /// Resizes to `new_len`, zero-filling new slots.
    pub fn resize_zeroed(&mut self, new_len: usize) -> Result<()> {
        self.resize_with(new_len, T::zeroed)
    }
}
