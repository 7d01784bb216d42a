//! Bounded FIFO queue over mirrored storage.

use alloc::vec::Vec;
use core::cmp;
use core::fmt;
use core::marker::PhantomData;
use core::ops::Index;
use core::slice;

use crate::behavior::{Behavior, Saturating, Wrapping};
use crate::error::{Error, CAPACITY_OVERFLOW, ZERO_CAPACITY};
use crate::mirror::{count, wrap_add, MirroredBuffer};

/// A bounded FIFO queue with batch writes and contiguous batch reads.
///
/// Items are written at the **tail** and read from the **head**. The storage
/// has `capacity() + 1` slots so that `head == tail` always means empty; a
/// full queue is simply one whose tail is a slot behind its head. Since the
/// storage is mirrored, everything between head and tail is one slice, so
/// reads never have to stitch two halves together.
///
/// `B` picks what `write`, `write_one` and `extend` do when the queue is full:
/// `Saturating` (the default) drops the excess, `Wrapping` evicts the oldest
/// items. `write_with` and `write_one_with` take the policy per call.
///
/// # Capacity
///
/// Note that `capacity()` is the usable number of items; one extra internal
/// slot is never used for data.
/// [Read more]
///
/// [Read more]: https://en.wikipedia.org/wiki/Circular_buffer
///
/// # Examples
///
/// ```
/// use mirrorbuf::FifoQueue;
///
/// let mut fifo: FifoQueue<i32> = FifoQueue::new(4).unwrap();
/// assert_eq!(fifo.write(&[1, 2, 3]), 3);
/// assert_eq!(fifo.write(&[4, 5, 6]), 1);
///
/// let mut out = [0; 3];
/// assert_eq!(fifo.read(&mut out), 3);
/// assert_eq!(out, [1, 2, 3]);
/// assert_eq!(fifo.as_slice(), &[4]);
/// ```
pub struct FifoQueue<T, B: Behavior = Saturating> {
    buf: MirroredBuffer<T>,
    head: usize,
    tail: usize,
    phantom: PhantomData<B>,
}

impl<T: Copy + Default, B: Behavior> FifoQueue<T, B> {
    /// Creates an empty queue that can hold `capacity` items.
    ///
    /// Fails with `Error::Configuration` if `capacity` is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use mirrorbuf::{FifoQueue, Wrapping};
    ///
    /// let fifo: FifoQueue<u8, Wrapping> = FifoQueue::new(16).unwrap();
    /// assert_eq!(fifo.capacity(), 16);
    /// assert_eq!(fifo.free(), 16);
    ///
    /// assert!(FifoQueue::<u8>::new(0).is_err());
    /// ```
    pub fn new(capacity: usize) -> Result<Self, Error> {
        FifoQueue::with_fill(capacity, T::default())
    }
}

impl<T: Copy, B: Behavior> FifoQueue<T, B> {
    /// Creates an empty queue that can hold `capacity` items, initialising the
    /// unused storage with `fill`.
    ///
    /// Useful for element types without a `Default`.
    pub fn with_fill(capacity: usize, fill: T) -> Result<Self, Error> {
        if capacity == 0 {
            return Err(Error::Configuration(ZERO_CAPACITY));
        }
        let slots = capacity
            .checked_add(1)
            .ok_or(Error::Configuration(CAPACITY_OVERFLOW))?;

        Ok(FifoQueue {
            buf: MirroredBuffer::new(slots, fill)?,
            head: 0,
            tail: 0,
            phantom: PhantomData,
        })
    }

    #[inline]
    fn slots(&self) -> usize {
        self.buf.capacity()
    }

    /// Returns the number of items the queue can hold.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots() - 1
    }

    /// Returns the number of items currently held.
    ///
    /// # Examples
    ///
    /// ```
    /// use mirrorbuf::FifoQueue;
    ///
    /// let mut fifo: FifoQueue<i32> = FifoQueue::new(3).unwrap();
    /// assert_eq!(fifo.len(), 0);
    /// fifo.write_one(1);
    /// assert_eq!(fifo.len(), 1);
    /// ```
    #[inline]
    pub fn len(&self) -> usize {
        count(self.head, self.tail, self.slots())
    }

    /// Returns the number of items that can be written without overwriting.
    #[inline]
    pub fn free(&self) -> usize {
        self.capacity() - self.len()
    }

    /// Returns true if the queue holds no items.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.head == self.tail
    }

    /// Returns true if the queue holds `capacity()` items.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.free() == 0
    }

    /// Empties the queue. The storage is left as it is but becomes
    /// unreachable.
    pub fn clear(&mut self) {
        self.head = 0;
        self.tail = 0;
    }

    /// Writes `items` at the tail using the queue's `Behavior` and returns how
    /// many were accepted.
    ///
    /// See `write_with` for the exact semantics of both policies.
    #[inline]
    pub fn write(&mut self, items: &[T]) -> usize {
        self.write_with(items, B::OVERWRITE)
    }

    /// Writes `items` at the tail and returns how many were accepted.
    ///
    /// Without `overwrite`, at most `free()` items are taken from the front of
    /// `items` and the rest are dropped. With `overwrite`, every item is
    /// accepted; when there is not enough room the oldest items are evicted
    /// from the head, so that the queue ends up holding the most recent
    /// `capacity()` items ever written to it.
    ///
    /// # Examples
    ///
    /// ```text
    /// [_, _, _] <-(+)- [1, 2]       => [1, 2, _]  -> 2
    /// [1, 2, _] <-(+)- [3, 4]       => [1, 2, 3]  -> 1   (no overwrite)
    /// [1, 2, _] <-(+)- [3, 4]       => [2, 3, 4]  -> 2   (overwrite)
    /// [1, 2, _] <-(+)- [3, 4, 5, 6] => [4, 5, 6]  -> 4   (overwrite)
    /// ```
    ///
    /// ```
    /// use mirrorbuf::FifoQueue;
    ///
    /// let mut fifo: FifoQueue<i32> = FifoQueue::new(3).unwrap();
    /// fifo.write(&[1, 2]);
    ///
    /// assert_eq!(fifo.write_with(&[3, 4], true), 2);
    /// assert_eq!(fifo.as_slice(), &[2, 3, 4]);
    ///
    /// assert_eq!(fifo.write_with(&[5], false), 0);
    /// assert_eq!(fifo.as_slice(), &[2, 3, 4]);
    /// ```
    pub fn write_with(&mut self, items: &[T], overwrite: bool) -> usize {
        let free = self.free();
        let accepted = if overwrite {
            items.len()
        } else {
            cmp::min(items.len(), free)
        };
        if accepted == 0 {
            return 0;
        }
        if accepted < items.len() {
            log::trace!("fifo write truncated: requested={} accepted={}", items.len(), accepted);
        }

        // Only the newest `capacity` accepted items can still be queued
        // afterwards.
        let kept = &items[accepted - cmp::min(accepted, self.capacity())..accepted];

        let evicted = kept.len().saturating_sub(free);
        if evicted > 0 {
            log::trace!("fifo overwrite evicted {} queued items", evicted);
            self.head = wrap_add(self.head, evicted, self.slots());
        }
        self.tail = self.buf.write_wrapping(self.tail, kept);

        accepted
    }

    /// Writes a single item at the tail using the queue's `Behavior`.
    ///
    /// Returns 1 if the item was written, 0 if it was dropped.
    #[inline]
    pub fn write_one(&mut self, item: T) -> usize {
        self.write_one_with(item, B::OVERWRITE)
    }

    /// Writes a single item at the tail.
    ///
    /// On a full queue the item is dropped and 0 returned, unless `overwrite`
    /// is set, in which case the oldest item is evicted to make room.
    ///
    /// # Examples
    ///
    /// ```text
    /// [1, 2] <-(+)- 3 => [1, 2] -> 0   (no overwrite)
    /// [1, 2] <-(+)- 3 => [2, 3] -> 1   (overwrite)
    /// ```
    ///
    /// ```
    /// use mirrorbuf::FifoQueue;
    ///
    /// let mut fifo: FifoQueue<i32> = FifoQueue::new(2).unwrap();
    /// fifo.write(&[1, 2]);
    ///
    /// assert_eq!(fifo.write_one_with(3, false), 0);
    /// assert_eq!(fifo.write_one_with(3, true), 1);
    /// assert_eq!(fifo.as_slice(), &[2, 3]);
    /// ```
    pub fn write_one_with(&mut self, item: T, overwrite: bool) -> usize {
        if self.is_full() {
            if !overwrite {
                return 0;
            }
            log::trace!("fifo overwrite evicted 1 queued item");
            self.head = wrap_add(self.head, 1, self.slots());
        }
        let tail = self.tail;
        self.buf.set(tail, item);
        self.tail = wrap_add(tail, 1, self.slots());
        1
    }

    /// Moves up to `out.len()` items from the head into `out` and returns how
    /// many were moved. Returns 0 on an empty queue.
    ///
    /// # Examples
    ///
    /// ```
    /// use mirrorbuf::FifoQueue;
    ///
    /// let mut fifo: FifoQueue<i32> = FifoQueue::new(4).unwrap();
    /// fifo.write(&[7, 8]);
    ///
    /// let mut out = [0; 4];
    /// assert_eq!(fifo.read(&mut out), 2);
    /// assert_eq!(&out[..2], &[7, 8]);
    /// assert_eq!(fifo.read(&mut out), 0);
    /// ```
    pub fn read(&mut self, out: &mut [T]) -> usize {
        let n = cmp::min(out.len(), self.len());
        if n == 0 {
            return 0;
        }
        out[..n].copy_from_slice(self.buf.window(self.head, n));
        self.head = wrap_add(self.head, n, self.slots());
        n
    }

    /// Removes and returns the item at the head.
    ///
    /// # Panics
    ///
    /// Panics if the queue is empty. Use `try_read_one` or check `is_empty`
    /// first when that can happen.
    ///
    /// # Examples
    ///
    /// ```
    /// use mirrorbuf::FifoQueue;
    ///
    /// let mut fifo: FifoQueue<i32> = FifoQueue::new(2).unwrap();
    /// fifo.write_one(5);
    /// assert_eq!(fifo.read_one(), 5);
    /// ```
    pub fn read_one(&mut self) -> T {
        match self.try_read_one() {
            Ok(item) => item,
            Err(err) => panic!("read_one on a queue with nothing to read: {}", err),
        }
    }

    /// Removes and returns the item at the head, or `Error::Empty`.
    ///
    /// # Examples
    ///
    /// ```
    /// use mirrorbuf::{Error, FifoQueue};
    ///
    /// let mut fifo: FifoQueue<i32> = FifoQueue::new(2).unwrap();
    /// assert_eq!(fifo.try_read_one(), Err(Error::Empty));
    /// fifo.write_one(5);
    /// assert_eq!(fifo.try_read_one(), Ok(5));
    /// ```
    pub fn try_read_one(&mut self) -> Result<T, Error> {
        if self.is_empty() {
            return Err(Error::Empty);
        }
        let head = self.head;
        let item = self.buf.window(head, 1)[0];
        self.head = wrap_add(head, 1, self.slots());
        Ok(item)
    }

    /// Returns up to `max` items from the head as one slice, without removing
    /// them. Pair with `consume` to read without copying.
    ///
    /// # Examples
    ///
    /// ```
    /// use mirrorbuf::FifoQueue;
    ///
    /// let mut fifo: FifoQueue<i32> = FifoQueue::new(4).unwrap();
    /// fifo.write(&[1, 2, 3]);
    ///
    /// let sum: i32 = fifo.peek(2).iter().sum();
    /// assert_eq!(sum, 3);
    /// assert_eq!(fifo.consume(2), 2);
    /// assert_eq!(fifo.as_slice(), &[3]);
    /// ```
    #[inline]
    pub fn peek(&self, max: usize) -> &[T] {
        self.buf.window(self.head, cmp::min(max, self.len()))
    }

    /// Discards up to `count` items from the head and returns how many were
    /// discarded.
    #[inline]
    pub fn consume(&mut self, count: usize) -> usize {
        let n = cmp::min(count, self.len());
        self.head = wrap_add(self.head, n, self.slots());
        n
    }

    /// Returns every queued item, head first, as one slice.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        self.peek(self.len())
    }

    /// Copies the queued items, head first, into a new vector.
    pub fn to_vec(&self) -> Vec<T> {
        self.as_slice().to_vec()
    }

    /// Retrieves the queued item at `index`, where 0 is the head.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.as_slice().get(index)
    }

    /// Returns a head-to-tail iterator.
    #[inline]
    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    #[inline]
    fn retag<C: Behavior>(self) -> FifoQueue<T, C> {
        FifoQueue {
            buf: self.buf,
            head: self.head,
            tail: self.tail,
            phantom: PhantomData,
        }
    }
}

impl<T: Copy> FifoQueue<T, Saturating> {
    /// Converts `self` into a `FifoQueue<T, Wrapping>`, keeping its contents.
    pub fn wrapping(self) -> FifoQueue<T, Wrapping> {
        self.retag()
    }
}

impl<T: Copy> FifoQueue<T, Wrapping> {
    /// Converts `self` into a `FifoQueue<T, Saturating>`, keeping its contents.
    pub fn saturating(self) -> FifoQueue<T, Saturating> {
        self.retag()
    }
}

impl<T: Copy, B: Behavior> Clone for FifoQueue<T, B> {
    fn clone(&self) -> Self {
        FifoQueue {
            buf: self.buf.clone(),
            head: self.head,
            tail: self.tail,
            phantom: PhantomData,
        }
    }
}

impl<T: Copy + PartialEq, B: Behavior> PartialEq for FifoQueue<T, B> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Copy + Eq, B: Behavior> Eq for FifoQueue<T, B> {}

impl<T: Copy, B: Behavior> Index<usize> for FifoQueue<T, B> {
    type Output = T;

    #[inline]
    fn index(&self, index: usize) -> &T {
        let len = self.len();
        match self.get(index) {
            Some(item) => item,
            None => panic!("index out of bounds: the len is {} but the index is {}", len, index),
        }
    }
}

/// Extend the `FifoQueue` with an iterator, one `write_one` per item.
///
/// A `Saturating` queue stops taking items once it is full; a `Wrapping`
/// queue keeps the last `capacity()` of them.
impl<T: Copy, B: Behavior> Extend<T> for FifoQueue<T, B> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            if self.write_one(item) == 0 {
                break;
            }
        }
    }
}

impl<'a, T: Copy, B: Behavior> IntoIterator for &'a FifoQueue<T, B> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: Copy + fmt::Debug, B: Behavior> fmt::Debug for FifoQueue<T, B> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}
