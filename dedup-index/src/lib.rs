//! Near-duplicate clustering of text chunks.
//!
//! Texts are split into character n-grams, summarized into MinHash signatures, and cut
//! into bands. Two texts sharing any band at the same position land in the same cluster.
//! Band records live in a pluggable [`Backend`](backend::Backend), either in memory or in
//! SQLite, so the index itself holds no state.
#![deny(missing_docs)]

pub mod backend;
pub mod config;
pub mod errors;
pub mod resolver;

mod index;
mod shingling;

pub use backend::{Backend, ClusterId, MemoryBackend, SqliteBackend};
pub use config::IndexConfig;
pub use index::DedupIndex;
pub use lsh::banding::Band;
pub use shingling::n_grams;
