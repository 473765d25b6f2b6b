//! Tests for the constants
//!
//! This test validates the relationships between the capacity constants.

use super::*;

#[test]
#[expect(
    clippy::assertions_on_constants,
    reason = "Asserting an invariant on the constants"
)]
fn test_invariant() {
    // GROWTH_QUANTUM is 64 bytes
    assert_eq!(GROWTH_QUANTUM, 64);

    // GROWTH_QUANTUM is a power of two.
    assert_eq!(GROWTH_QUANTUM & (GROWTH_QUANTUM - 1), 0);

    // MAX_LENGTH leaves exactly one quantum of headroom below the sentinel
    assert_eq!(MAX_LENGTH + GROWTH_QUANTUM, CAPACITY_OVERFLOW);

    // The sentinel can never be mistaken for a valid capacity
    assert_ne!(CAPACITY_OVERFLOW % GROWTH_QUANTUM, 0);

    // The largest valid capacity is still above MAX_LENGTH
    let largest = CAPACITY_OVERFLOW & !(GROWTH_QUANTUM - 1);
    assert!(largest > MAX_LENGTH);
}
