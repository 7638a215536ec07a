//! Locality-sensitive hashing primitives for near-duplicate detection.
pub mod banding;
pub mod minhash;

use std::hash::Hash;

use blake2::digest::consts::U8;
use blake2::{Blake2b, Digest};
use hashbrown::HashSet;

/// BLAKE2b with an 8-byte digest.
pub(crate) type Blake2b64 = Blake2b<U8>;

/// Generates the hash value of `token` under `seed`.
///
/// The two are combined as `"{token}-{seed}"`. A seed is printed in decimal and never
/// contains `-`, so the last `-` always separates the token from the seed.
///
/// # Examples
///
/// ```
/// use lsh::hash_token;
///
/// assert_eq!(hash_token("he", 0), 4772819867977125620);
/// assert_ne!(hash_token("he", 0), hash_token("he", 1));
/// ```
#[inline]
pub fn hash_token(token: &str, seed: u64) -> u64 {
    let digest = Blake2b64::new()
        .chain_update(token.as_bytes())
        .chain_update(format!("-{seed}").as_bytes())
        .finalize();
    to_u64(&digest)
}

/// Digests bytes into a 16-character lowercase hex string.
///
/// # Examples
///
/// ```
/// use lsh::digest_hex;
///
/// assert_eq!(digest_hex(b"1|2|3"), "af8b23811214b9bd");
/// ```
pub fn digest_hex(bytes: &[u8]) -> String {
    hex::encode(Blake2b64::digest(bytes))
}

// Reads an 8-byte digest as a big-endian integer.
#[inline(always)]
pub(crate) fn to_u64(digest: &[u8]) -> u64 {
    let mut bytes = [0; 8];
    bytes.copy_from_slice(digest);
    u64::from_be_bytes(bytes)
}

/// Computes the Jaccard distance.
///
/// # Examples
///
/// ```
/// use lsh::jaccard_distance;
///
/// let x = vec![1, 2, 4];
/// let y = vec![1, 2, 5, 7];
/// assert_eq!(jaccard_distance(x, y), 0.6);
/// ```
pub fn jaccard_distance<I, T>(lhs: I, rhs: I) -> f64
where
    I: IntoIterator<Item = T>,
    T: Hash + Eq,
{
    let a = HashSet::<T>::from_iter(lhs);
    let b = HashSet::<T>::from_iter(rhs);
    let union = a.union(&b).count();
    if union == 0 {
        return 0.;
    }
    1. - (a.intersection(&b).count() as f64) / (union as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_token_golden() {
        assert_eq!(hash_token("he", 0), 4772819867977125620);
        assert_eq!(hash_token("abc", 7), 10188678895131060916);
        assert_eq!(hash_token("ab", 12), 18417150429726304806);
    }

    #[test]
    fn test_hash_token_unambiguous() {
        // "ab-1" under seed 2 must not be confused with "ab" under any seed.
        let h = hash_token("ab-1", 2);
        assert_eq!(h, 14904712549583991381);
        assert!((0..64).all(|seed| hash_token("ab", seed) != h));
    }

    #[test]
    fn test_digest_hex() {
        assert_eq!(digest_hex(b"42"), "57b43cf02666687a");
        assert_eq!(digest_hex(b"").len(), 16);
    }

    #[test]
    fn test_jaccard_distance_empty() {
        assert_eq!(jaccard_distance(Vec::<u64>::new(), vec![]), 0.);
        assert_eq!(jaccard_distance(vec![1], vec![]), 1.);
    }
}
