use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use hashbrown::HashSet;
use tracing_subscriber::EnvFilter;

use dedup_index::{Backend, DedupIndex, IndexConfig, MemoryBackend, SqliteBackend};

#[derive(Parser, Debug)]
#[clap(
    name = "dedup",
    about = "A program to assign near-duplicate documents to the same cluster."
)]
struct Args {
    /// File path to a document file, one document per line.
    #[clap(short = 'i', long)]
    document_path: PathBuf,

    /// Length of character n-grams (must be more than 0).
    #[clap(short = 'n', long, env = "DEDUP_NGRAM", default_value = "3")]
    ngram: usize,

    /// Number of hash permutations in a signature.
    #[clap(long, env = "DEDUP_NUM_PERMS", default_value = "128")]
    num_perms: usize,

    /// Number of signature values per band. The fewer rows, the more loosely
    /// documents are judged as duplicates.
    #[clap(long, env = "DEDUP_ROWS", default_value = "5")]
    rows: usize,

    /// SQLite file keeping band records across runs.
    /// If None, records are kept in memory.
    #[clap(long, env = "DEDUP_DB")]
    db: Option<PathBuf>,

    /// Table holding band records in the SQLite file.
    #[clap(long, env = "DEDUP_TABLE", default_value = "lsh_index")]
    table: String,

    /// Disables parallel banding.
    #[clap(short = 'p', long)]
    disable_parallel: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let config = IndexConfig::new(args.num_perms, args.rows, args.ngram)?;

    if let Some(path) = &args.db {
        tracing::info!(path = %path.display(), table = %args.table, "Opening SQLite backend");
        let backend = SqliteBackend::open(path, &args.table)?;
        run(DedupIndex::with_config(backend, config), &args)
    } else {
        run(DedupIndex::with_config(MemoryBackend::new(), config), &args)
    }
}

fn run<B>(index: DedupIndex<B>, args: &Args) -> Result<(), Box<dyn Error>>
where
    B: Backend,
{
    let index = index.shows_progress(true);
    let documents = BufReader::new(File::open(&args.document_path)?)
        .lines()
        .collect::<Result<Vec<_>, _>>()?;

    // Lines shorter than n have no n-gram and stay unassigned.
    let ngram = index.config().ngram();
    let mut lines = vec![];
    let mut texts = vec![];
    for (i, document) in documents.iter().enumerate() {
        if document.chars().count() < ngram {
            tracing::warn!(line = i + 1, "Skipped a document shorter than {ngram} characters");
            continue;
        }
        lines.push(i);
        texts.push(document.as_str());
    }

    tracing::info!("Assigning {} documents to clusters...", texts.len());
    let start = Instant::now();
    let clusters = if args.disable_parallel {
        texts
            .iter()
            .map(|text| index.index_text(text))
            .collect::<Result<Vec<_>, _>>()?
    } else {
        index.index_in_parallel(&texts)?
    };
    tracing::info!(
        "Found {} clusters in {} sec",
        clusters.iter().collect::<HashSet<_>>().len(),
        start.elapsed().as_secs_f64()
    );

    let mut assigned = vec![None; documents.len()];
    for (i, cluster) in lines.into_iter().zip(clusters) {
        assigned[i] = Some(cluster);
    }

    let mut out = BufWriter::new(io::stdout().lock());
    writeln!(out, "line,cluster")?;
    for (i, cluster) in assigned.into_iter().enumerate() {
        match cluster {
            Some(cluster) => writeln!(out, "{},{cluster}", i + 1)?,
            None => writeln!(out, "{},", i + 1)?,
        }
    }
    out.flush()?;

    Ok(())
}
