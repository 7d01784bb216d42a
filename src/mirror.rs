//! Mirrored storage shared by `DelayLine` and `FifoQueue`.

use alloc::boxed::Box;
use alloc::vec;
use core::cmp;

use crate::error::{Error, CAPACITY_OVERFLOW, ZERO_CAPACITY};

/// Contiguous storage of `2 * capacity` slots in which slot `i` and slot
/// `i + capacity` always hold the same value.
///
/// Any run of up to `capacity` logical slots starting anywhere in
/// `[0, capacity)` is therefore a plain slice: the second half supplies the
/// elements that would otherwise wrap around to the front.
///
/// # Examples
///
/// ```
/// use mirrorbuf::MirroredBuffer;
///
/// let mut buf = MirroredBuffer::new(4, 0).unwrap();
/// let next = buf.write_wrapping(2, &[1, 2, 3]);
///
/// assert_eq!(next, 1);
/// assert_eq!(buf.window(2, 3), &[1, 2, 3]);
/// ```
#[derive(Clone)]
pub struct MirroredBuffer<T> {
    storage: Box<[T]>,
    capacity: usize,
}

impl<T: Copy> MirroredBuffer<T> {
    /// Allocates `2 * capacity` slots, every one set to `fill`.
    ///
    /// Fails with `Error::Configuration` if `capacity` is zero or the doubled
    /// length does not fit in a `usize`.
    pub fn new(capacity: usize, fill: T) -> Result<Self, Error> {
        if capacity == 0 {
            return Err(Error::Configuration(ZERO_CAPACITY));
        }
        let slots = capacity
            .checked_mul(2)
            .ok_or(Error::Configuration(CAPACITY_OVERFLOW))?;

        log::debug!("allocated mirrored storage: capacity={} slots={}", capacity, slots);

        Ok(MirroredBuffer {
            storage: vec![fill; slots].into_boxed_slice(),
            capacity,
        })
    }

    /// Returns the number of logical slots.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the value at logical slot `index`, or `None` if
    /// `index >= capacity()`.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&T> {
        if index < self.capacity {
            Some(&self.storage[index])
        } else {
            None
        }
    }

    /// Writes `value` to logical slot `index` and to its mirror.
    ///
    /// # Panics
    ///
    /// Panics if `index >= capacity()`.
    #[inline]
    pub fn set(&mut self, index: usize, value: T) {
        assert!(index < self.capacity,
                "slot out of bounds: the capacity is {} but the slot is {}",
                self.capacity,
                index);
        self.storage[index] = value;
        self.storage[index + self.capacity] = value;
    }

    /// Writes `items` to consecutive logical slots starting at `start`,
    /// wrapping past the end, and returns the slot after the last one written.
    ///
    /// # Panics
    ///
    /// Panics if `start >= capacity()` or `items.len() > capacity()`.
    pub fn write_wrapping(&mut self, start: usize, items: &[T]) -> usize {
        assert!(start < self.capacity, "write start out of bounds");
        assert!(items.len() <= self.capacity, "write longer than capacity");

        let pre_wrap_len = cmp::min(items.len(), self.capacity - start);
        let (before, after) = items.split_at(pre_wrap_len);
        self.copy_mirrored(start, before);
        self.copy_mirrored(0, after);

        wrap_add(start, items.len(), self.capacity)
    }

    /// Returns the `len` logical slots starting at `start` as one slice.
    ///
    /// # Panics
    ///
    /// Panics if `start >= capacity()` or `len > capacity()`.
    #[inline]
    pub fn window(&self, start: usize, len: usize) -> &[T] {
        assert!(start < self.capacity, "window start out of bounds");
        assert!(len <= self.capacity, "window longer than capacity");
        &self.storage[start..start + len]
    }

    /// Sets every slot, in both halves, to `value`.
    pub fn fill(&mut self, value: T) {
        self.storage.fill(value);
    }

    /// Copies a run that does not wrap into both halves.
    #[inline]
    fn copy_mirrored(&mut self, dst: usize, src: &[T]) {
        debug_assert!(dst + src.len() <= self.capacity,
                      "cpy dst={} len={} cap={}",
                      dst,
                      src.len(),
                      self.capacity);
        let mirror = dst + self.capacity;
        self.storage[dst..dst + src.len()].copy_from_slice(src);
        self.storage[mirror..mirror + src.len()].copy_from_slice(src);
    }

    #[cfg(test)]
    pub(crate) fn is_mirrored(&self) -> bool
        where T: PartialEq
    {
        let (front, back) = self.storage.split_at(self.capacity);
        front == back
    }
}

#[inline]
pub(crate) fn wrap_add(index: usize, addend: usize, capacity: usize) -> usize {
    debug_assert!(addend <= capacity);
    (index + addend) % capacity
}

/// Number of slots from `head` up to (not including) `tail`.
#[inline]
pub(crate) fn count(head: usize, tail: usize, capacity: usize) -> usize {
    debug_assert!(head < capacity);
    debug_assert!(tail < capacity);
    if tail >= head {
        tail - head
    } else {
        capacity + tail - head
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_capacity_is_rejected() {
        assert_eq!(MirroredBuffer::new(0, 0u8).err(),
                   Some(Error::Configuration(ZERO_CAPACITY)));
    }

    #[test]
    fn doubled_length_overflow_is_rejected() {
        assert_eq!(MirroredBuffer::<()>::new(usize::MAX, ()).err(),
                   Some(Error::Configuration(CAPACITY_OVERFLOW)));
    }

    #[test]
    fn set_writes_both_halves() {
        let mut buf = MirroredBuffer::new(3, 0).unwrap();
        buf.set(0, 1);
        buf.set(2, 3);
        assert_eq!(&*buf.storage, &[1, 0, 3, 1, 0, 3]);
        assert!(buf.is_mirrored());
    }

    #[test]
    #[should_panic]
    fn set_past_capacity_panics() {
        let mut buf = MirroredBuffer::new(3, 0).unwrap();
        buf.set(3, 1);
    }

    #[test]
    fn window_spans_the_wrap() {
        let mut buf = MirroredBuffer::new(4, 0).unwrap();
        for i in 0..4 {
            buf.set(i, i + 10);
        }
        assert_eq!(buf.window(0, 4), &[10, 11, 12, 13]);
        assert_eq!(buf.window(3, 4), &[13, 10, 11, 12]);
        assert_eq!(buf.window(2, 0), &[] as &[usize]);
    }

    #[test]
    fn write_wrapping_splits_at_the_end() {
        let mut buf = MirroredBuffer::new(5, 0).unwrap();
        assert_eq!(buf.write_wrapping(3, &[1, 2, 3, 4]), 2);
        assert_eq!(&*buf.storage, &[3, 4, 0, 1, 2, 3, 4, 0, 1, 2]);
        assert_eq!(buf.window(3, 4), &[1, 2, 3, 4]);
        assert!(buf.is_mirrored());

        assert_eq!(buf.write_wrapping(0, &[9, 9, 9, 9, 9]), 0);
        assert_eq!(buf.window(4, 5), &[9; 5]);
        assert!(buf.is_mirrored());
    }

    #[test]
    fn fill_resets_every_slot() {
        let mut buf = MirroredBuffer::new(3, 1).unwrap();
        buf.write_wrapping(1, &[4, 5]);
        buf.fill(7);
        assert_eq!(&*buf.storage, &[7; 6]);
        assert_eq!(buf.get(2), Some(&7));
        assert_eq!(buf.get(3), None);
    }

    #[test]
    fn index_arithmetic() {
        assert_eq!(wrap_add(4, 3, 6), 1);
        assert_eq!(wrap_add(0, 6, 6), 0);
        assert_eq!(count(2, 2, 6), 0);
        assert_eq!(count(1, 4, 6), 3);
        assert_eq!(count(4, 1, 6), 3);
        assert_eq!(count(5, 4, 6), 5);
    }
}
