//! Resolution of an item's bands into a cluster identifier.
//!
//! The resolver keeps no state: everything lives in the [`Backend`], so any number of
//! callers may resolve against one shared backend.
//!
//! Bands are written one by one. If the process dies between two writes, the unwritten
//! bands stay unattributed and a later item matching only those bands starts a second
//! cluster for what is one duplicate group. Likewise, when the bands of an item already
//! point to different clusters, the first band in scan order decides and the clusters
//! are not merged.
//!
//! Concurrent creation has the same gap. A resolver minting a fresh identifier adopts a
//! rival's identifier only when its very first band write loses. If two new items share
//! some later band, each claims its own first band, and the loser of the shared band
//! keeps its own identifier: the two items end up in different clusters although run
//! one after the other they would share one. The shared band key itself still maps to a
//! single identifier.
use lsh::banding::Band;
use uuid::Uuid;

use crate::backend::{Backend, ClusterId};
use crate::errors::{DedupError, Result};

/// Returns the cluster of the first band, in order, that has a record.
///
/// Never writes to `backend`.
pub fn lookup<B>(backend: &B, bands: &[Band]) -> Result<Option<ClusterId>>
where
    B: Backend + ?Sized,
{
    for band in bands {
        if let Some(cluster) = backend.query(band.index, &band.hash)? {
            return Ok(Some(cluster));
        }
    }
    Ok(None)
}

/// Assigns `bands` to a cluster and returns it.
///
/// The cluster is the one of the first band having a record, or a fresh identifier if
/// no band has one. Every band without a record is then attributed to that cluster.
///
/// # Errors
///
/// [`DedupError::InvalidArgument`] is returned if `bands` is empty, and
/// [`DedupError::BackendUnavailable`] on any backend failure.
pub fn resolve<B>(backend: &B, bands: &[Band]) -> Result<ClusterId>
where
    B: Backend + ?Sized,
{
    if bands.is_empty() {
        return Err(DedupError::input("Bands must not be empty."));
    }

    let (mut cluster, matched) = match lookup(backend, bands)? {
        Some(cluster) => {
            tracing::debug!(%cluster, "matched existing cluster");
            (cluster, true)
        }
        None => (Uuid::new_v4(), false),
    };

    // A fresh identifier is not visible to anyone until its first write, so losing the
    // race for that write means adopting the winner instead.
    let mut claimed = matched;
    for band in bands {
        let stored = backend.assign(band.index, &band.hash, cluster)?;
        if stored == cluster {
            claimed = true;
        } else if !claimed {
            tracing::debug!(index = band.index, %stored, "lost race for first band");
            cluster = stored;
            claimed = true;
        } else {
            tracing::debug!(
                index = band.index,
                %stored,
                %cluster,
                "band belongs to another cluster"
            );
        }
    }

    if !matched {
        tracing::debug!(%cluster, bands = bands.len(), "resolved to new cluster");
    }
    Ok(cluster)
}
