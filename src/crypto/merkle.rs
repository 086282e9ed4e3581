//! Merkle tree implementation
//!
//! Used for computing transaction merkle roots in blocks.

use super::{hash_pair, Hash};

/// Compute the merkle root of a list of hashes
///
/// If the list is empty, returns zero hash.
/// A single leaf is its own root.
/// If a level has an odd number of elements, the last one is paired with itself.
pub fn compute_merkle_root(hashes: &[Hash]) -> Hash {
    let Some(first) = hashes.first() else {
        return Hash::zero();
    };

    if hashes.len() == 1 {
        return *first;
    }

    let mut current_level: Vec<Hash> = hashes.to_vec();

    while current_level.len() > 1 {
        current_level = current_level
            .chunks(2)
            .map(|pair| match pair {
                [left, right] => hash_pair(left, right),
                [last] => hash_pair(last, last),
                _ => unreachable!("chunks(2) yields one or two items"),
            })
            .collect();
    }

    current_level[0]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::sha256d;

    fn make_hashes(n: usize) -> Vec<Hash> {
        (0..n).map(|i| sha256d(&i.to_le_bytes())).collect()
    }

    #[test]
    fn test_empty_merkle_root() {
        assert_eq!(compute_merkle_root(&[]), Hash::zero());
    }

    #[test]
    fn test_single_element() {
        let hashes = make_hashes(1);
        assert_eq!(compute_merkle_root(&hashes), hashes[0]);
    }

    #[test]
    fn test_two_elements() {
        let hashes = make_hashes(2);
        let expected = hash_pair(&hashes[0], &hashes[1]);
        assert_eq!(compute_merkle_root(&hashes), expected);
    }

    #[test]
    fn test_odd_count_duplicates_last() {
        let hashes = make_hashes(3);
        let expected = hash_pair(
            &hash_pair(&hashes[0], &hashes[1]),
            &hash_pair(&hashes[2], &hashes[2]),
        );
        assert_eq!(compute_merkle_root(&hashes), expected);
    }

    #[test]
    fn test_merkle_root_deterministic() {
        let hashes = make_hashes(10);
        assert_eq!(compute_merkle_root(&hashes), compute_merkle_root(&hashes));
    }
}
