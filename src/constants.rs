//! Capacity constants for the growable buffer.
//!
//! Every owned allocation made by [`Buffer`](crate::Buffer) is a multiple of [`GROWTH_QUANTUM`].
//! The arithmetic that produces those capacities saturates instead of wrapping, and the value it
//! saturates to is [`CAPACITY_OVERFLOW`].
//!
//! # Invariant
//!
//! The following relationships must hold between the constants:
//!
//! - `GROWTH_QUANTUM` is a power of 2, so rounding can be done with a mask
//! - `MAX_LENGTH + GROWTH_QUANTUM == CAPACITY_OVERFLOW`
//! - `CAPACITY_OVERFLOW` is not a multiple of `GROWTH_QUANTUM`, so it is never a valid capacity

/// Growth quantum (64 bytes) used to size allocations.
///
/// The buffer capacity is always a multiple of this value, which also makes it the smallest
/// capacity an owning buffer can have (an empty string still needs room for its terminator).
pub const GROWTH_QUANTUM: usize =
    // 2^6 = 64
    1 << 6;

/// Sentinel returned by the saturating capacity arithmetic.
///
/// A string of this length could never reserve room for its terminator, so seeing this value as
/// a length or a capacity always means the requested size is unrepresentable.
pub const CAPACITY_OVERFLOW: usize = usize::MAX;

/// Largest content length that still maps to a valid capacity.
///
/// Anything longer makes [`Buffer::required_capacity`](crate::Buffer::required_capacity) return
/// [`CAPACITY_OVERFLOW`].
pub const MAX_LENGTH: usize = CAPACITY_OVERFLOW - GROWTH_QUANTUM;

#[cfg(test)]
mod tests;
