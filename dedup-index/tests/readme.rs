use dedup_index::{n_grams, Backend, ClusterId, DedupIndex, MemoryBackend, SqliteBackend};

const CORPUS: [(&str, &str); 3] = [
    ("key1", "The quick brown fox jumps over the lazy dog"),
    ("key2", "T e qui k bnown fox jump  over t e  azy  og"),
    ("key3", "An entirely different sentence!"),
];

fn duplicate_map<B: Backend>(index: &DedupIndex<B>) -> Vec<(ClusterId, Vec<&'static str>)> {
    let mut groups: Vec<(ClusterId, Vec<&'static str>)> = vec![];
    for (key, text) in CORPUS {
        let tokens = n_grams(text, 3).unwrap();
        let bands = index.bands(&tokens).unwrap();
        let items = index.items(bands);
        let cluster = index.index(&items).unwrap();
        match groups.iter_mut().find(|(c, _)| *c == cluster) {
            Some((_, keys)) => keys.push(key),
            None => groups.push((cluster, vec![key])),
        }
    }
    groups
}

#[test]
fn test_readme_memory() {
    let index = DedupIndex::new(MemoryBackend::new());
    let groups = duplicate_map(&index);
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].1, vec!["key1", "key2"]);
    assert_eq!(groups[1].1, vec!["key3"]);
}

#[test]
fn test_readme_sqlite() {
    let index = DedupIndex::new(SqliteBackend::open_in_memory("lsh_index").unwrap());
    let groups = duplicate_map(&index);
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].1, vec!["key1", "key2"]);
    assert_eq!(groups[1].1, vec!["key3"]);
    assert_eq!(index.backend().len().unwrap(), 26 * 3 - 1);
}

#[test]
fn test_cluster_corpus_matches_manual_flow() {
    let index = DedupIndex::in_memory();
    let groups = index.cluster_corpus(CORPUS).unwrap();
    let keys: Vec<_> = groups.into_iter().map(|(_, keys)| keys).collect();
    assert_eq!(keys, vec![vec!["key1", "key2"], vec!["key3"]]);
}
