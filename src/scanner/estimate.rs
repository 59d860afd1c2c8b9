//! Size estimation without materializing file content.
//!
//! Shares candidate enumeration and gating with the scanner so that an
//! estimate and a subsequent full scan with identical options agree on the
//! accepted file set.

use super::{binary, collect_candidates, Candidate, ScanOptions, BATCH_SIZE, READ_CONCURRENCY};
use crate::error::Result;
use futures::{stream, StreamExt};
use serde::Serialize;
use std::path::Path;
use tracing::warn;

/// Empirically tuned bytes-per-token divisor carried over from the
/// original tooling; kept as a named constant rather than re-derived.
pub const TOKEN_BYTES_PER_TOKEN: u64 = 4;

/// Aggregate metrics for the accepted file set of one root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Estimate {
    pub file_count: usize,
    pub total_bytes: u64,
    pub estimated_tokens: u64,
}

/// Estimates document size for a root without retaining content.
pub struct SizeEstimator {
    options: ScanOptions,
}

impl SizeEstimator {
    pub fn new(options: ScanOptions) -> Self {
        Self { options }
    }

    /// Count the files and bytes a full scan with the same options would
    /// accept. Content is read only to confirm the binary classification,
    /// then discarded.
    pub async fn estimate(&self, root: &Path) -> Result<Estimate> {
        let candidates = collect_candidates(root.to_path_buf(), self.options.clone()).await?;

        let mut file_count = 0usize;
        let mut total_bytes = 0u64;
        for batch in candidates.chunks(BATCH_SIZE) {
            let sizes: Vec<Option<u64>> = stream::iter(
                batch
                    .iter()
                    .cloned()
                    .map(|candidate| probe(candidate, self.options.max_file_size)),
            )
            .buffer_unordered(READ_CONCURRENCY)
            .collect()
            .await;

            for size in sizes.into_iter().flatten() {
                file_count += 1;
                total_bytes += size;
            }
        }

        Ok(Estimate {
            file_count,
            total_bytes,
            estimated_tokens: total_bytes.div_ceil(TOKEN_BYTES_PER_TOKEN),
        })
    }
}

/// Size of the candidate if a scan would accept it with content.
async fn probe(candidate: Candidate, max_file_size: u64) -> Option<u64> {
    if candidate.size_bytes > max_file_size {
        return None;
    }
    let bytes = match tokio::fs::read(&candidate.absolute_path).await {
        Ok(bytes) => bytes,
        Err(err) => {
            warn!(
                path = %candidate.absolute_path.display(),
                error = %err,
                "skipping unreadable file"
            );
            return None;
        }
    };
    if binary::is_binary(&bytes) {
        return None;
    }
    Some(candidate.size_bytes)
}
