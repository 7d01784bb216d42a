//! Overflow semantics for `FifoQueue`.

/// Tagging trait for providing overflow behaviors to `FifoQueue`.
///
/// The behavior only picks the default used by `write`, `write_one` and
/// `Extend`; the `*_with` methods take the policy per call.
pub trait Behavior {
    /// Whether writing to a full queue evicts the oldest elements.
    const OVERWRITE: bool;
}

/// Behavior for `FifoQueue` that specifies wrapping write semantics.
///
/// Writing elements to a queue that **has already reached its capacity**
/// causes it to **overwrite** the oldest elements at the **head**, so the
/// queue always retains the most recent `capacity()` elements written.
pub struct Wrapping;
impl Behavior for Wrapping {
    const OVERWRITE: bool = true;
}

/// Behavior for `FifoQueue` that specifies saturating write semantics.
///
/// Writing elements to a queue that **has already reached its capacity**
/// accepts only as many as there are free slots; the rest are **dropped** and
/// the returned count says how many were taken.
pub struct Saturating;
impl Behavior for Saturating {
    const OVERWRITE: bool = false;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overwrites<B: Behavior>() -> bool {
        B::OVERWRITE
    }

    #[test]
    fn tags_pick_the_policy() {
        assert!(overwrites::<Wrapping>());
        assert!(!overwrites::<Saturating>());
    }
}
