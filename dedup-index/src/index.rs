use hashbrown::HashMap;
use lsh::banding::{self, Band, Bander};
use lsh::minhash::MinHasher;
use rayon::prelude::*;

use crate::backend::{Backend, ClusterId, MemoryBackend};
use crate::config::IndexConfig;
use crate::errors::{DedupError, Result};
use crate::resolver;
use crate::shingling::n_grams;

/// Deduplication index assigning near-duplicate texts to the same cluster,
/// using MinHash signatures and banding over a pluggable [`Backend`].
///
/// # Examples
///
/// ```
/// use dedup_index::DedupIndex;
///
/// let index = DedupIndex::in_memory();
/// let x = index.index_text("The quick brown fox jumps over the lazy dog").unwrap();
/// let y = index.index_text("T e qui k bnown fox jump  over t e  azy  og").unwrap();
/// let z = index.index_text("An entirely different sentence!").unwrap();
/// assert_eq!(x, y);
/// assert_ne!(x, z);
/// ```
pub struct DedupIndex<B = MemoryBackend> {
    config: IndexConfig,
    hasher: MinHasher,
    bander: Bander,
    backend: B,
    shows_progress: bool,
}

impl DedupIndex<MemoryBackend> {
    /// Creates an instance with the default configuration over a fresh [`MemoryBackend`].
    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::new())
    }
}

impl Default for DedupIndex<MemoryBackend> {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl<B> DedupIndex<B>
where
    B: Backend,
{
    /// Creates an instance with the default configuration.
    pub fn new(backend: B) -> Self {
        Self::with_config(backend, IndexConfig::default())
    }

    /// Creates an instance.
    pub fn with_config(backend: B, config: IndexConfig) -> Self {
        Self {
            config,
            hasher: MinHasher::new(config.num_perms()),
            bander: Bander::new(config.rows()),
            backend,
            shows_progress: false,
        }
    }

    /// Reports the progress of batch operations as `info` events?
    pub const fn shows_progress(mut self, yes: bool) -> Self {
        self.shows_progress = yes;
        self
    }

    /// Computes the MinHash signature of `tokens`.
    ///
    /// The order and repetition of tokens do not affect the result.
    ///
    /// # Errors
    ///
    /// [`DedupError::EmptyInput`] is returned if `tokens` is empty.
    pub fn signature<T>(&self, tokens: &[T]) -> Result<Vec<u64>>
    where
        T: AsRef<str>,
    {
        self.hasher.signature(tokens).ok_or(DedupError::EmptyInput)
    }

    /// Computes the band hashes of `tokens`.
    ///
    /// # Errors
    ///
    /// [`DedupError::EmptyInput`] is returned if `tokens` is empty.
    pub fn bands<T>(&self, tokens: &[T]) -> Result<Vec<String>>
    where
        T: AsRef<str>,
    {
        Ok(self.bander.bands(&self.signature(tokens)?))
    }

    /// Pairs band hashes with their positions.
    pub fn items<I, S>(&self, bands: I) -> Vec<Band>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        banding::items(bands)
    }

    /// Retrieves the cluster of an item from its bands, creating one if no band matches.
    pub fn index(&self, items: &[Band]) -> Result<ClusterId> {
        resolver::resolve(&self.backend, items)
    }

    /// Looks up the cluster of an item from its bands without writing anything.
    pub fn query(&self, items: &[Band]) -> Result<Option<ClusterId>> {
        resolver::lookup(&self.backend, items)
    }

    /// Computes the bands of `text` split into character n-grams.
    ///
    /// # Errors
    ///
    /// [`DedupError::EmptyInput`] is returned if `text` is shorter than the n-gram length.
    pub fn text_items(&self, text: &str) -> Result<Vec<Band>> {
        let tokens = n_grams(text, self.config.ngram())?;
        Ok(self.items(self.bands(&tokens)?))
    }

    /// Retrieves the cluster of `text`, creating one if it has no near duplicate.
    pub fn index_text(&self, text: &str) -> Result<ClusterId> {
        self.index(&self.text_items(text)?)
    }

    /// Computes the bands of many texts in parallel, in input order.
    pub fn bands_in_parallel<D>(&self, texts: &[D]) -> Result<Vec<Vec<Band>>>
    where
        D: AsRef<str> + Sync,
    {
        texts
            .par_iter()
            .map(|text| self.text_items(text.as_ref()))
            .collect()
    }

    /// Retrieves the clusters of many texts.
    ///
    /// Bands are computed in parallel, while clusters are resolved in input order,
    /// so the result equals indexing the texts one by one.
    pub fn index_in_parallel<D>(&self, texts: &[D]) -> Result<Vec<ClusterId>>
    where
        D: AsRef<str> + Sync,
    {
        let items = self.bands_in_parallel(texts)?;
        let mut clusters = Vec::with_capacity(items.len());
        for (i, items) in items.iter().enumerate() {
            if self.shows_progress && (i + 1) % 1000 == 0 {
                tracing::info!("Resolved {} documents...", i + 1);
            }
            clusters.push(self.index(items)?);
        }
        Ok(clusters)
    }

    /// Groups keyed texts by cluster, with clusters in order of first appearance.
    ///
    /// # Examples
    ///
    /// ```
    /// use dedup_index::DedupIndex;
    ///
    /// let index = DedupIndex::in_memory();
    /// let groups = index
    ///     .cluster_corpus([
    ///         ("key1", "The quick brown fox jumps over the lazy dog"),
    ///         ("key2", " he quic  bnown f x jump  over the  azy dog"),
    ///         ("key3", "An entirely different sentence!"),
    ///     ])
    ///     .unwrap();
    /// assert_eq!(groups.len(), 2);
    /// assert_eq!(groups[0].1, vec!["key1", "key2"]);
    /// assert_eq!(groups[1].1, vec!["key3"]);
    /// ```
    pub fn cluster_corpus<I, K, D>(&self, corpus: I) -> Result<Vec<(ClusterId, Vec<K>)>>
    where
        I: IntoIterator<Item = (K, D)>,
        D: AsRef<str>,
    {
        let mut positions = HashMap::new();
        let mut groups: Vec<(ClusterId, Vec<K>)> = vec![];
        for (i, (key, text)) in corpus.into_iter().enumerate() {
            if self.shows_progress && (i + 1) % 1000 == 0 {
                tracing::info!("Processed {} documents...", i + 1);
            }
            let cluster = self.index_text(text.as_ref())?;
            let position = *positions.entry(cluster).or_insert_with(|| {
                groups.push((cluster, vec![]));
                groups.len() - 1
            });
            groups[position].1.push(key);
        }
        Ok(groups)
    }

    /// Gets the configuration.
    pub const fn config(&self) -> IndexConfig {
        self.config
    }

    /// Gets the reference to the backend.
    pub const fn backend(&self) -> &B {
        &self.backend
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY1: &str = "The quick brown fox jumps over the lazy dog";
    const KEY2: &str = "T e qui k bnown fox jump  over t e  azy  og";
    const KEY3: &str = "An entirely different sentence!";

    #[test]
    fn test_bands_golden() {
        let index = DedupIndex::in_memory();
        let tokens = n_grams(KEY1, 3).unwrap();
        let bands = index.bands(&tokens).unwrap();
        assert_eq!(bands.len(), 26);
        assert_eq!(
            &bands[..3],
            &["889d5ce6f97b3a9c", "1ad873801094d152", "05ed5e8fae08b884"]
        );
    }

    #[test]
    fn test_near_duplicate_shares_trailing_band() {
        let index = DedupIndex::in_memory();
        let x = index.text_items(KEY1).unwrap();
        let y = index.text_items(KEY2).unwrap();
        let shared: Vec<usize> = x
            .iter()
            .zip(&y)
            .filter(|(a, b)| a == b)
            .map(|(a, _)| a.index)
            .collect();
        assert_eq!(shared, vec![25]);
    }

    #[test]
    fn test_empty_input() {
        let index = DedupIndex::in_memory();
        assert!(matches!(
            index.signature::<&str>(&[]),
            Err(DedupError::EmptyInput)
        ));
        assert!(matches!(index.index_text("ab"), Err(DedupError::EmptyInput)));
        assert!(index.backend().is_empty().unwrap());
    }

    #[test]
    fn test_signature_ignores_order_and_repeats() {
        let index = DedupIndex::in_memory();
        let x = index.signature(&["abc", "bcd", "cde"]).unwrap();
        let y = index.signature(&["cde", "abc", "bcd", "abc"]).unwrap();
        assert_eq!(x, y);
        assert_eq!(x.len(), 128);
    }

    #[test]
    fn test_index_flow() {
        let index = DedupIndex::in_memory();
        let items = index.text_items(KEY1).unwrap();
        assert_eq!(index.query(&items).unwrap(), None);
        let x = index.index(&items).unwrap();
        assert_eq!(index.query(&items).unwrap(), Some(x));
        assert_eq!(index.index(&items).unwrap(), x);
        assert_eq!(index.backend().num_clusters().unwrap(), 1);
        assert_eq!(index.backend().len().unwrap(), 26);

        assert_eq!(index.index_text(KEY2).unwrap(), x);
        assert_ne!(index.index_text(KEY3).unwrap(), x);
        assert_eq!(index.backend().num_clusters().unwrap(), 2);
    }

    #[test]
    fn test_custom_config() {
        let config = IndexConfig::new(16, 4, 2).unwrap();
        let index = DedupIndex::with_config(MemoryBackend::new(), config);
        let items = index.text_items("hello").unwrap();
        assert_eq!(items.len(), 4);
        assert_eq!(items[3].index, 3);
        assert_eq!(index.config(), config);
    }

    #[test]
    fn test_index_in_parallel() {
        let texts = [KEY1, KEY2, KEY3, KEY1];
        let index = DedupIndex::in_memory().shows_progress(true);
        let clusters = index.index_in_parallel(&texts).unwrap();
        assert_eq!(clusters[0], clusters[1]);
        assert_eq!(clusters[0], clusters[3]);
        assert_ne!(clusters[0], clusters[2]);

        let sequential = DedupIndex::in_memory();
        let expected: Vec<_> = texts
            .iter()
            .map(|t| sequential.text_items(t).unwrap())
            .collect();
        assert_eq!(index.bands_in_parallel(&texts).unwrap(), expected);
    }

    #[test]
    fn test_index_in_parallel_short_text() {
        let index = DedupIndex::in_memory();
        assert!(matches!(
            index.index_in_parallel(&[KEY1, "x"]),
            Err(DedupError::EmptyInput)
        ));
    }
}
