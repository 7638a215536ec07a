//! Banding of MinHash signatures.
//!
//! A signature is split into consecutive groups of `rows` values and each group is
//! reduced to one hash string. Two signatures are candidate duplicates if any band at
//! the same position collides.
use crate::digest_hex;

/// A band hash paired with its position in the signature.
///
/// Band hashes are only comparable at the same position.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Band {
    /// Position of the band (0-based).
    pub index: usize,
    /// Hex digest of the band's values.
    pub hash: String,
}

/// Splitter of signatures into bands of `rows` values.
#[derive(Clone, Copy, Debug)]
pub struct Bander {
    rows: usize,
}

impl Bander {
    /// Creates an instance.
    ///
    /// # Panics
    ///
    /// Panics if `rows` is 0.
    pub fn new(rows: usize) -> Self {
        assert!(rows >= 1);
        Self { rows }
    }

    /// Gets the number of signature values per band.
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Gets the number of bands produced from a signature of `num_hashes` values,
    /// counting a trailing partial group as a band.
    pub const fn num_bands(&self, num_hashes: usize) -> usize {
        (num_hashes + self.rows - 1) / self.rows
    }

    /// Reduces each group of `rows` values into a hash string.
    ///
    /// The values of a group are joined by `|` in decimal and digested by
    /// [`digest_hex`](crate::digest_hex).
    ///
    /// # Examples
    ///
    /// ```
    /// use lsh::banding::Bander;
    ///
    /// let bander = Bander::new(3);
    /// let bands = bander.bands(&[1, 2, 3, 4]);
    /// assert_eq!(bands.len(), 2);
    /// assert_eq!(bands[0], "af8b23811214b9bd");
    /// ```
    pub fn bands(&self, signature: &[u64]) -> Vec<String> {
        signature
            .chunks(self.rows)
            .map(|chunk| {
                let joined = chunk
                    .iter()
                    .map(u64::to_string)
                    .collect::<Vec<_>>()
                    .join("|");
                digest_hex(joined.as_bytes())
            })
            .collect()
    }
}

/// Pairs each band hash with its position.
///
/// # Examples
///
/// ```
/// use lsh::banding::{items, Band};
///
/// let bands = items(["aa", "bb"]);
/// assert_eq!(bands[1], Band { index: 1, hash: "bb".to_string() });
/// ```
pub fn items<I, S>(band_hashes: I) -> Vec<Band>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    band_hashes
        .into_iter()
        .enumerate()
        .map(|(index, hash)| Band {
            index,
            hash: hash.into(),
        })
        .collect()
}
