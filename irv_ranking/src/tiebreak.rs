//! Reproducible tie-breaking between candidates with the same number of votes.
//!
//! Each candidate gets a fractional weight in `[0, 1)` derived from a 32-bit
//! FNV-1a hash of its canonical name. The hash does not depend on the process,
//! the platform or any seed, so the same ballots always give the same ranking.

use crate::model::Candidate;

const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

/// 32-bit FNV-1a.
pub(crate) fn fnv1a_32(bytes: &[u8]) -> u32 {
    let mut hash = FNV_OFFSET_BASIS;
    for b in bytes {
        hash ^= *b as u32;
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

/// The weight added to the vote count of a candidate when looking for the weakest one.
///
/// Dividing by 2^32 rather than `u32::MAX` keeps the weight strictly below 1, so that
/// a candidate with fewer votes is always weaker than a candidate with more votes.
pub fn fractional_weight(candidate: &Candidate) -> f64 {
    let h = fnv1a_32(candidate.name().as_bytes());
    let w = (h as f64) / ((u32::MAX as f64) + 1.0);
    assert!(
        (0.0..1.0).contains(&w),
        "fractional weight {} out of range for candidate {:?}",
        w,
        candidate
    );
    w
}
