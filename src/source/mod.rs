//! Game record sources.
//!
//! The engine never initiates I/O; these are the external
//! collaborators that supply raw game records to it. A source fetch is
//! asynchronous and cancellable, and a failing source is absorbed —
//! logged and skipped — when fanning out over several of them.

pub mod file;
pub mod http;

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use futures::future::join_all;
use tracing::{info, warn};

use crate::types::{FetchedBatch, RawGame};

/// Abstraction over suppliers of raw game records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GameSource: Send + Sync {
    /// Fetch all games this source currently reports.
    async fn fetch_games(&self) -> Result<Vec<RawGame>>;

    /// Source name for logging and batch attribution.
    fn name(&self) -> &str;
}

/// Fetch from every source concurrently, stamping each successful
/// result into a batch. A failing source is logged and dropped; the
/// rest proceed.
pub async fn fetch_all(sources: &[Box<dyn GameSource>]) -> Vec<FetchedBatch> {
    let results = join_all(sources.iter().map(|s| s.fetch_games())).await;

    let mut batches = Vec::with_capacity(sources.len());
    for (source, result) in sources.iter().zip(results) {
        match result {
            Ok(games) => {
                info!(source = source.name(), games = games.len(), "source fetched");
                batches.push(FetchedBatch {
                    source: source.name().to_string(),
                    fetched_at: Utc::now(),
                    games,
                });
            }
            Err(e) => {
                warn!(source = source.name(), error = %e, "source fetch failed, continuing without");
            }
        }
    }
    batches
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
