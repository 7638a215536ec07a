//! Character n-gram tokenization.
use std::iter;

use crate::errors::{DedupError, Result};

/// Returns all overlapping substrings of `n` characters in `text`, from left to right.
///
/// A text of `L` characters yields `L - n + 1` tokens, or none if it is shorter than `n`.
///
/// # Errors
///
/// [`DedupError::InvalidArgument`] is returned if `n` is 0.
///
/// # Examples
///
/// ```
/// use dedup_index::n_grams;
///
/// assert_eq!(n_grams("hello", 2).unwrap(), vec!["he", "el", "ll", "lo"]);
/// assert!(n_grams("hi", 3).unwrap().is_empty());
/// assert!(n_grams("hello", 0).is_err());
/// ```
pub fn n_grams(text: &str, n: usize) -> Result<Vec<&str>> {
    if n == 0 {
        return Err(DedupError::input("n must be a positive integer"));
    }
    Ok(ShingleIter::new(text, n).collect())
}

pub(crate) struct ShingleIter<'a> {
    text: &'a str,
    // Byte offsets of character boundaries, ending with `text.len()`.
    bounds: Vec<usize>,
    window_size: usize,
    position: usize,
}

impl<'a> ShingleIter<'a> {
    pub fn new(text: &'a str, window_size: usize) -> Self {
        let bounds = text
            .char_indices()
            .map(|(i, _)| i)
            .chain(iter::once(text.len()))
            .collect();
        Self {
            text,
            bounds,
            window_size,
            position: 0,
        }
    }
}

impl<'a> Iterator for ShingleIter<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        if self.bounds.len() <= self.position + self.window_size {
            return None;
        }
        let start = self.bounds[self.position];
        let end = self.bounds[self.position + self.window_size];
        self.position += 1;
        Some(&self.text[start..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_q1() {
        let mut iter = ShingleIter::new("abc", 1);
        assert_eq!(iter.next(), Some("a"));
        assert_eq!(iter.next(), Some("b"));
        assert_eq!(iter.next(), Some("c"));
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn test_q2() {
        let mut iter = ShingleIter::new("abc", 2);
        assert_eq!(iter.next(), Some("ab"));
        assert_eq!(iter.next(), Some("bc"));
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn test_q3() {
        let mut iter = ShingleIter::new("abc", 3);
        assert_eq!(iter.next(), Some("abc"));
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn test_q4() {
        let mut iter = ShingleIter::new("abc", 4);
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn test_multibyte() {
        let grams = n_grams("神保町だ", 2).unwrap();
        assert_eq!(grams, vec!["神保", "保町", "町だ"]);
    }

    #[test]
    fn test_count() {
        let text = "The quick brown fox jumps over the lazy dog";
        for n in 1..=text.len() {
            assert_eq!(n_grams(text, n).unwrap().len(), text.len() - n + 1);
        }
        assert!(n_grams("", 1).unwrap().is_empty());
    }

    #[test]
    fn test_repeats_kept() {
        assert_eq!(n_grams("aaaa", 2).unwrap(), vec!["aa", "aa", "aa"]);
    }

    #[test]
    fn test_zero() {
        assert!(matches!(
            n_grams("hello", 0),
            Err(DedupError::InvalidArgument(_))
        ));
    }
}
