//! Fixed-length sliding window over an unbounded stream of appends.

use core::cmp;
use core::fmt;
use core::ops::Index;
use core::slice;

use crate::error::Error;
use crate::mirror::{wrap_add, MirroredBuffer};

/// A delay line holding the `len()` most recently appended values.
///
/// The line is always full: construction fills it, and every `append` pushes
/// the oldest value out. Because the storage is mirrored, the whole window is
/// available as one contiguous slice, ordered oldest to newest, without any
/// copying.
///
/// # Examples
///
/// ```
/// use mirrorbuf::DelayLine;
///
/// let mut line = DelayLine::with_fill(3, 0).unwrap();
/// line.append(1);
/// line.append(2);
/// assert_eq!(line.as_slice(), &[0, 1, 2]);
///
/// line.append(3);
/// line.append(4);
/// assert_eq!(line.as_slice(), &[2, 3, 4]);
/// ```
#[derive(Clone)]
pub struct DelayLine<T> {
    buf: MirroredBuffer<T>,
    cursor: usize,
}

impl<T: Copy + Default> DelayLine<T> {
    /// Creates a delay line of length `len` filled with `T::default()`.
    ///
    /// Fails with `Error::Configuration` if `len` is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use mirrorbuf::DelayLine;
    ///
    /// let line: DelayLine<f32> = DelayLine::new(4).unwrap();
    /// assert_eq!(line.as_slice(), &[0.0; 4]);
    ///
    /// assert!(DelayLine::<f32>::new(0).is_err());
    /// ```
    pub fn new(len: usize) -> Result<Self, Error> {
        DelayLine::with_fill(len, T::default())
    }
}

impl<T: Copy> DelayLine<T> {
    /// Creates a delay line of length `len` with every slot set to `fill`.
    ///
    /// Fails with `Error::Configuration` if `len` is zero.
    pub fn with_fill(len: usize, fill: T) -> Result<Self, Error> {
        Ok(DelayLine {
            buf: MirroredBuffer::new(len, fill)?,
            cursor: 0,
        })
    }

    /// Sets every slot to `fill` and rewinds the window to the start of the
    /// storage.
    ///
    /// # Examples
    ///
    /// ```
    /// use mirrorbuf::DelayLine;
    ///
    /// let mut line = DelayLine::with_fill(3, 0).unwrap();
    /// line.extend(1..=5);
    /// line.clear(9);
    /// assert_eq!(line.as_slice(), &[9, 9, 9]);
    /// ```
    pub fn clear(&mut self, fill: T) {
        log::trace!("clearing delay line of length {}", self.len());
        self.buf.fill(fill);
        self.cursor = 0;
    }

    /// Returns the number of values held, fixed at construction.
    #[inline]
    pub fn len(&self) -> usize {
        self.buf.capacity()
    }

    /// Always `false`: a delay line holds `len()` values from construction on.
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Appends `value` as the newest element and returns the oldest one, which
    /// is no longer part of the window.
    ///
    /// # Examples
    ///
    /// ```
    /// use mirrorbuf::DelayLine;
    ///
    /// let mut line = DelayLine::with_fill(2, 0).unwrap();
    /// assert_eq!(line.append(5), 0);
    /// assert_eq!(line.append(6), 0);
    /// assert_eq!(line.append(7), 5);
    /// assert_eq!(line.as_slice(), &[6, 7]);
    /// ```
    #[inline]
    pub fn append(&mut self, value: T) -> T {
        let cursor = self.cursor;
        let evicted = self.buf.window(cursor, 1)[0];
        self.buf.set(cursor, value);
        self.cursor = wrap_add(cursor, 1, self.len());
        evicted
    }

    /// Appends every value of `values` in order.
    ///
    /// Equivalent to calling `append` for each value, but only the newest
    /// `len()` values are actually copied.
    ///
    /// # Examples
    ///
    /// ```
    /// use mirrorbuf::DelayLine;
    ///
    /// let mut line = DelayLine::with_fill(4, 0).unwrap();
    /// line.extend_from_slice(&[1, 2]);
    /// assert_eq!(line.as_slice(), &[0, 0, 1, 2]);
    ///
    /// line.extend_from_slice(&[3, 4, 5, 6, 7, 8]);
    /// assert_eq!(line.as_slice(), &[5, 6, 7, 8]);
    /// ```
    pub fn extend_from_slice(&mut self, values: &[T]) {
        let len = self.len();
        let kept = cmp::min(values.len(), len);
        let skipped = values.len() - kept;

        // `skipped` may exceed `len`; only its remainder moves the cursor.
        let start = wrap_add(self.cursor, skipped % len, len);
        self.cursor = self.buf.write_wrapping(start, &values[skipped..]);
    }

    /// Returns the window as one contiguous slice, oldest value first.
    ///
    /// The slice borrows the delay line, so it cannot be held across the next
    /// `append`.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        self.buf.window(self.cursor, self.len())
    }

    /// Retrieves the value at `index` of the window, where 0 is the oldest.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.as_slice().get(index)
    }

    /// Retrieves the value at `index` of the window, failing with
    /// `Error::OutOfRange` instead of wrapping when `index >= len()`.
    ///
    /// # Examples
    ///
    /// ```
    /// use mirrorbuf::{DelayLine, Error};
    ///
    /// let mut line = DelayLine::with_fill(2, 0).unwrap();
    /// line.append(4);
    /// assert_eq!(line.at(1), Ok(&4));
    /// assert_eq!(line.at(2), Err(Error::OutOfRange { index: 2, len: 2 }));
    /// ```
    pub fn at(&self, index: usize) -> Result<&T, Error> {
        let len = self.len();
        self.get(index).ok_or(Error::OutOfRange { index, len })
    }

    /// Returns the oldest value in the window.
    #[inline]
    pub fn front(&self) -> &T {
        &self.as_slice()[0]
    }

    /// Returns the most recently appended value.
    #[inline]
    pub fn back(&self) -> &T {
        &self.as_slice()[self.len() - 1]
    }

    /// Returns an oldest-to-newest iterator over the window.
    #[inline]
    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.as_slice().iter()
    }
}

impl<T: Copy> Index<usize> for DelayLine<T> {
    type Output = T;

    #[inline]
    fn index(&self, index: usize) -> &T {
        let len = self.len();
        match self.get(index) {
            Some(value) => value,
            None => panic!("index out of bounds: the len is {} but the index is {}", len, index),
        }
    }
}

impl<T: Copy> Extend<T> for DelayLine<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.append(value);
        }
    }
}

impl<'a, T: Copy> IntoIterator for &'a DelayLine<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: Copy + PartialEq> PartialEq for DelayLine<T> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Copy + Eq> Eq for DelayLine<T> {}

impl<T: Copy + fmt::Debug> fmt::Debug for DelayLine<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::vec::Vec;

    #[test]
    fn zero_length_is_rejected() {
        assert!(DelayLine::<i32>::new(0).is_err());
        assert!(DelayLine::with_fill(0, 1.5f64).is_err());
    }

    #[test]
    fn sliding_window_over_ten_appends() {
        let mut line = DelayLine::with_fill(5, 0).unwrap();
        assert_eq!(line.len(), 5);

        for i in 0..10 {
            line.append(i);
            if i == 4 {
                assert_eq!(line.as_slice(), &[0, 1, 2, 3, 4]);
            }
        }
        assert_eq!(line.as_slice(), &[5, 6, 7, 8, 9]);
        assert_eq!(*line.front(), 5);
        assert_eq!(*line.back(), 9);
    }

    #[test]
    fn clear_rewrites_both_halves() {
        let mut line = DelayLine::with_fill(5, 0).unwrap();
        line.extend(0..7);
        line.clear(3);

        assert_eq!(line.cursor, 0);
        assert_eq!(line.as_slice(), &[3; 5]);
        assert_eq!(line.buf.window(4, 5), &[3; 5]);
        assert!(line.buf.is_mirrored());
    }

    #[test]
    fn index_follows_the_window() {
        let mut line = DelayLine::with_fill(3, 0).unwrap();
        line.extend(vec![1, 2, 3, 4]);
        assert_eq!(line[0], 2);
        assert_eq!(line[2], 4);
        assert_eq!(line.get(3), None);
        assert_eq!(line.at(3), Err(Error::OutOfRange { index: 3, len: 3 }));
    }

    #[test]
    #[should_panic(expected = "index out of bounds: the len is 3 but the index is 3")]
    fn index_past_the_window_panics() {
        let line = DelayLine::with_fill(3, 0).unwrap();
        let _value = line[3];
    }

    #[test]
    fn single_slot_line() {
        let mut line = DelayLine::with_fill(1, 'a').unwrap();
        assert_eq!(line.append('b'), 'a');
        assert_eq!(line.append('c'), 'b');
        assert_eq!(line.as_slice(), &['c']);
        line.extend_from_slice(&['x', 'y', 'z']);
        assert_eq!(line.as_slice(), &['z']);
    }

    #[test]
    fn extend_from_slice_matches_appends() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for len in 1..9 {
            let mut bulk = DelayLine::with_fill(len, -1).unwrap();
            let mut single = DelayLine::with_fill(len, -1).unwrap();
            let mut next = 0;
            for _ in 0..40 {
                let chunk: Vec<i32> = (0..rng.gen_range(0..3 * len)).map(|i| next + i as i32).collect();
                next += chunk.len() as i32;

                bulk.extend_from_slice(&chunk);
                single.extend(chunk.iter().cloned());

                assert_eq!(bulk, single);
                assert_eq!(bulk.cursor, single.cursor);
                assert!(bulk.buf.is_mirrored());
            }
        }
    }

    #[test]
    fn window_equals_last_appended_values() {
        let mut rng = StdRng::seed_from_u64(42);
        for len in 1..12 {
            let mut line = DelayLine::with_fill(len, 0u32).unwrap();
            let mut history = Vec::new();
            for _ in 0..(3 * len + 7) {
                let value: u32 = rng.gen();
                line.append(value);
                history.push(value);
                assert!(line.buf.is_mirrored());

                if history.len() >= len {
                    assert_eq!(line.as_slice(), &history[history.len() - len..]);
                }
            }
        }
    }

    #[test]
    fn iterators_and_debug() {
        let mut line = DelayLine::with_fill(3, 0).unwrap();
        line.extend(1..=4);

        let collected: Vec<_> = line.iter().cloned().collect();
        assert_eq!(collected, vec![2, 3, 4]);

        let mut sum = 0;
        for value in &line {
            sum += *value;
        }
        assert_eq!(sum, 9);
        assert_eq!(format!("{:?}", line), "[2, 3, 4]");
    }
}
