//! Mirrored circular buffers for streaming sample data.
//!
//! Both structures in this crate keep their elements in storage twice the
//! size of their capacity, writing every element to slot `i` and to slot
//! `i + capacity`. Whatever run of elements is currently live is therefore a
//! single contiguous slice, even when it wraps around the end of the ring, so
//! bulk reads need no modulo indexing and no stitching of two halves.
//!
//! - [`DelayLine`]: an always-full sliding window of the most recent values,
//!   the input history of a FIR filter.
//! - [`FifoQueue`]: a bounded queue with batch writes, batch reads and an
//!   optional overwrite-on-full policy.
//! - [`MirroredBuffer`]: the storage both are built on.
//!
//! # Feature Flags
//! The **mirrorbuf** crate has the following cargo feature flags:
//!
//! - `std`
//!   - Optional, enabled by default
//!   - Use libstd; required for the `filter` module
//!
//!
//! - `wav`
//!   - Optional, enabled by default
//!   - Provide mono WAV encoding (canonical 44-byte header) and decoding
//!     (through hound) of sample slices in the `wav` module
//!
//! Without `std` the crate is `#![no_std]` and only needs `alloc`:
//!
//! ```toml
//! [dependencies]
//! mirrorbuf = { version = "0.1", default-features = false }
//! ```
//!
//! # Capacity
//!
//! A `FifoQueue` reserves one internal slot so that its two indices alone
//! distinguish empty from full; `capacity()` is the usable count.
//! [Read more]
//!
//! [Read more]: https://en.wikipedia.org/wiki/Circular_buffer
//!
//! # Examples
//! ```
//! use mirrorbuf::DelayLine;
//!
//! let mut line = DelayLine::with_fill(5, 0).unwrap();
//! for i in 0..10 {
//!     line.append(i);
//! }
//! assert_eq!(line.as_slice(), &[5, 6, 7, 8, 9]);
//! ```
//!
//! # Queue
//! ```
//! use mirrorbuf::FifoQueue;
//!
//! let mut fifo: FifoQueue<i32> = FifoQueue::new(10).unwrap();
//! assert_eq!((fifo.len(), fifo.free()), (0, 10));
//!
//! fifo.write(&[0]);
//! assert_eq!(fifo.write(&[1; 10]), 9);
//! assert!(fifo.is_full());
//!
//! let mut out = [0; 10];
//! assert_eq!(fifo.read(&mut out[..1]), 1);
//! assert_eq!(fifo.read(&mut out), 9);
//! assert!(fifo.is_empty());
//! ```
//!
//! # Overwrite
//! ```
//! use mirrorbuf::{FifoQueue, Wrapping};
//!
//! let mut history: FifoQueue<u8, Wrapping> = FifoQueue::new(3).unwrap();
//! history.write(b"abcdef");
//! assert_eq!(history.as_slice(), b"def");
//! ```

#![cfg_attr(not(any(feature = "std", test)), no_std)]

#![deny(missing_docs)]

extern crate alloc;

mod behavior;
mod delay_line;
pub mod error;
mod fifo;
mod mirror;

#[cfg(feature = "std")]
pub mod filter;
#[cfg(feature = "wav")]
pub mod wav;

pub use behavior::{Behavior, Saturating, Wrapping};
pub use delay_line::DelayLine;
pub use error::Error;
pub use fifo::FifoQueue;
pub use mirror::MirroredBuffer;
