//! Time windowing
//!
//! Splits `[start, now)` into contiguous half-open windows sized by an
//! [`Interval`]. Windows are produced lazily and in ascending order; the
//! last one is clipped to the end instant.

mod types;
mod windower;

pub use types::{Interval, Window};
pub use windower::Windower;
