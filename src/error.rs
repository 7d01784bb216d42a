//! Error type shared by every fallible operation in the crate.

#[cfg(feature = "std")]
use std::error;
use core::fmt;

/// Error value returned by constructors and checked accessors.
///
/// Short reads and writes are not errors: those operations return the number
/// of items actually moved.
#[derive(Clone, Copy, Eq, PartialEq)]
pub enum Error {
    /// The structure could not be built with the requested parameters.
    Configuration(&'static str),
    /// A logical index fell outside the current window.
    OutOfRange {
        /// The index that was requested.
        index: usize,
        /// The number of readable elements at the time of the request.
        len: usize,
    },
    /// A single-item read was attempted on an empty queue.
    Empty,
}

pub(crate) const ZERO_CAPACITY: &str = "capacity must be greater than zero";
pub(crate) const CAPACITY_OVERFLOW: &str = "capacity overflow";

#[cfg(feature = "std")]
impl error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::Configuration(reason) => write!(f, "invalid configuration: {}", reason),
            Error::OutOfRange { index, len } => {
                write!(f, "index out of range: the len is {} but the index is {}", len, index)
            }
            Error::Empty => write!(f, "queue is empty"),
        }
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::Configuration(_) => write!(f, "ConfigurationError: {}", self),
            Error::OutOfRange { .. } => write!(f, "RangeError: {}", self),
            Error::Empty => write!(f, "EmptyError: {}", self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(Error::Configuration(ZERO_CAPACITY).to_string(),
                   "invalid configuration: capacity must be greater than zero");
        assert_eq!(Error::OutOfRange { index: 7, len: 5 }.to_string(),
                   "index out of range: the len is 5 but the index is 7");
        assert_eq!(Error::Empty.to_string(), "queue is empty");
    }

    #[test]
    fn debug_names_the_kind() {
        assert_eq!(format!("{:?}", Error::Empty), "EmptyError: queue is empty");
        assert!(format!("{:?}", Error::OutOfRange { index: 1, len: 0 }).starts_with("RangeError"));
    }
}
