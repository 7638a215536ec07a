use dedup_index::{n_grams, DedupIndex, MemoryBackend};

fn main() {
    let corpus = [
        ("key1", "The quick brown fox jumps over the lazy dog"),
        ("key2", "T e qui k bnown fox jump  over t e  azy  og"),
        ("key3", "An entirely different sentence!"),
    ];

    // Creates an index with 128 permutations and 5 rows per band,
    // keeping band records in memory.
    let index = DedupIndex::new(MemoryBackend::new());

    let mut groups: Vec<(_, Vec<&str>)> = vec![];
    for (key, text) in corpus {
        // Character trigrams work well for short text chunks.
        let tokens = n_grams(text, 3).unwrap();
        let items = index.items(index.bands(&tokens).unwrap());
        let cluster = index.index(&items).unwrap();
        match groups.iter_mut().find(|(c, _)| *c == cluster) {
            Some((_, keys)) => keys.push(key),
            None => groups.push((cluster, vec![key])),
        }
    }

    // `key1` and `key2` share a cluster, while `key3` has its own.
    assert_eq!(groups.len(), 2);
    for (cluster, keys) in groups {
        println!("{cluster}: {keys:?}");
    }
}
