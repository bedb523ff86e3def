//! Kademlia distance calculations.

use crate::domain::{Distance, NodeId};

/// Calculate the XOR distance between two NodeIds
///
/// # Properties
/// - Identity: `xor_distance(a, a)` is zero
/// - Symmetric: `xor_distance(a, b) == xor_distance(b, a)`
/// - Zero only for equal ids
/// - Triangle inequality: `d(a, c) <= d(a, b) + d(b, c)`
///
/// Smaller values are closer. The result orders as an unsigned 256-bit
/// integer, most significant byte first.
pub fn xor_distance(a: &NodeId, b: &NodeId) -> Distance {
    Distance::between(a, b)
}

/// Number of leading bits `a` and `b` share.
///
/// 256 for identical ids. Useful for logging how deep into the local
/// region a contact falls.
#[inline]
pub fn shared_prefix_bits(a: &NodeId, b: &NodeId) -> u32 {
    for (i, (x, y)) in a.as_bytes().iter().zip(b.as_bytes()).enumerate() {
        let xor = x ^ y;
        if xor != 0 {
            return (i as u32) * 8 + xor.leading_zeros();
        }
    }
    256
}
