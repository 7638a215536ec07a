//! Index configuration.
use crate::errors::{DedupError, Result};

/// Default number of hash permutations in a signature.
pub const DEFAULT_NUM_PERMS: usize = 128;
/// Default number of signature values per band.
pub const DEFAULT_ROWS: usize = 5;
/// Default length of character n-grams.
pub const DEFAULT_NGRAM: usize = 3;

/// Parameters of a [`DedupIndex`](crate::DedupIndex).
///
/// Items are only comparable when indexed with the same `num_perms` and `rows`,
/// so a persistent backend must always be used with one configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IndexConfig {
    num_perms: usize,
    rows: usize,
    ngram: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            num_perms: DEFAULT_NUM_PERMS,
            rows: DEFAULT_ROWS,
            ngram: DEFAULT_NGRAM,
        }
    }
}

impl IndexConfig {
    /// Creates an instance.
    ///
    /// # Arguments
    ///
    /// * `num_perms` - Number of hash permutations in a signature (must be more than 0).
    /// * `rows` - Number of signature values per band (must be more than 0).
    ///            If larger than `num_perms`, the whole signature forms one band.
    /// * `ngram` - Length of character n-grams (must be more than 0).
    pub fn new(num_perms: usize, rows: usize, ngram: usize) -> Result<Self> {
        if num_perms == 0 {
            return Err(DedupError::input("num_perms must not be 0."));
        }
        if rows == 0 {
            return Err(DedupError::input("rows must not be 0."));
        }
        if ngram == 0 {
            return Err(DedupError::input("ngram must not be 0."));
        }
        Ok(Self {
            num_perms,
            rows,
            ngram,
        })
    }

    /// Gets the number of hash permutations.
    pub const fn num_perms(&self) -> usize {
        self.num_perms
    }

    /// Gets the number of signature values per band.
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Gets the length of character n-grams.
    pub const fn ngram(&self) -> usize {
        self.ngram
    }

    /// Gets the number of bands per item; a trailing partial group counts as a band.
    pub const fn num_bands(&self) -> usize {
        (self.num_perms + self.rows - 1) / self.rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let config = IndexConfig::default();
        assert_eq!(config.num_perms(), 128);
        assert_eq!(config.rows(), 5);
        assert_eq!(config.ngram(), 3);
        assert_eq!(config.num_bands(), 26);
    }

    #[test]
    fn test_invalid() {
        assert!(IndexConfig::new(0, 1, 3).is_err());
        assert!(IndexConfig::new(128, 0, 3).is_err());
        assert!(IndexConfig::new(128, 5, 0).is_err());
    }

    #[test]
    fn test_num_bands() {
        assert_eq!(IndexConfig::new(120, 5, 3).unwrap().num_bands(), 24);
        assert_eq!(IndexConfig::new(7, 7, 1).unwrap().num_bands(), 1);
        assert_eq!(IndexConfig::new(4, 5, 3).unwrap().num_bands(), 1);
    }
}
