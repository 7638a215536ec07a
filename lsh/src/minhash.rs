//! MinHash signatures over string tokens.
use blake2::Digest;

use crate::{to_u64, Blake2b64};

/// Generator of MinHash signatures with `num_hashes` seeded hash functions.
///
/// The hash function for seed `s` is [`hash_token`](crate::hash_token)`(_, s)`,
/// with seeds `0..num_hashes`.
pub struct MinHasher {
    suffixes: Vec<String>,
}

impl MinHasher {
    /// Creates an instance.
    pub fn new(num_hashes: usize) -> Self {
        Self {
            suffixes: (0..num_hashes).map(|seed| format!("-{seed}")).collect(),
        }
    }

    /// Gets the number of hash functions, i.e., the signature length.
    pub fn num_hashes(&self) -> usize {
        self.suffixes.len()
    }

    /// Iterates the minimum hash value of `tokens` for each seed.
    ///
    /// Yields nothing if `tokens` is empty.
    pub fn iter<T>(&self, tokens: &[T]) -> MinHashIter<'_>
    where
        T: AsRef<str>,
    {
        let prefixes = tokens
            .iter()
            .map(|t| Blake2b64::new().chain_update(t.as_ref().as_bytes()))
            .collect();
        MinHashIter {
            prefixes,
            suffixes: self.suffixes.iter(),
        }
    }

    /// Computes the signature of `tokens`, or `None` if `tokens` is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use lsh::minhash::MinHasher;
    ///
    /// let hasher = MinHasher::new(16);
    /// let x = hasher.signature(&["ab", "bc", "cd"]).unwrap();
    /// let y = hasher.signature(&["cd", "ab", "bc", "ab"]).unwrap();
    /// assert_eq!(x.len(), 16);
    /// assert_eq!(x, y);
    /// assert!(hasher.signature::<&str>(&[]).is_none());
    /// ```
    pub fn signature<T>(&self, tokens: &[T]) -> Option<Vec<u64>>
    where
        T: AsRef<str>,
    {
        if tokens.is_empty() {
            return None;
        }
        Some(self.iter(tokens).collect())
    }
}

/// Iterator created by [`MinHasher::iter`].
pub struct MinHashIter<'a> {
    // Hasher states already fed with each token.
    prefixes: Vec<Blake2b64>,
    suffixes: std::slice::Iter<'a, String>,
}

impl Iterator for MinHashIter<'_> {
    type Item = u64;

    fn next(&mut self) -> Option<Self::Item> {
        let suffix = self.suffixes.next()?;
        self.prefixes
            .iter()
            .map(|prefix| to_u64(&prefix.clone().chain_update(suffix.as_bytes()).finalize()))
            .min()
    }
}

/// Estimates the Jaccard similarity of two sets from their signatures,
/// as the fraction of positions holding the same value.
///
/// Returns `0` if the signatures are empty or of different lengths.
pub fn estimate_jaccard(lhs: &[u64], rhs: &[u64]) -> f64 {
    if lhs.len() != rhs.len() || lhs.is_empty() {
        return 0.;
    }
    let matches = lhs.iter().zip(rhs).filter(|(x, y)| x == y).count();
    matches as f64 / lhs.len() as f64
}
