//! Core engine — normalize → estimate pool → compute EV.
//!
//! All computation here is synchronous, pure, and side-effect-free
//! apart from producing result values. Sources fetch; the engine only
//! ever computes, so recomputation on an option toggle is just another
//! call with the same game record.

pub mod compare;
pub mod ev;
pub mod normalize;
pub mod pool;

use tracing::info;

use crate::types::{
    AnalysisError, AnalysisOptions, ComparativeResult, EvResult, GameRecord, RawGame,
};

// ---------------------------------------------------------------------------
// Analyzer
// ---------------------------------------------------------------------------

/// Single-game analysis output: the normalized game plus its EV result.
#[derive(Debug, Clone, serde::Serialize)]
pub struct GameAnalysis {
    pub game: GameRecord,
    pub ev: EvResult,
}

/// Pipelines the engine stages for callers.
///
/// Holds the caller's adjustment options; there is no other state, so
/// one `Analyzer` can be reused across games and invocations, and a
/// new options value means constructing a new one (or calling
/// `with_options`) and recomputing.
pub struct Analyzer {
    options: AnalysisOptions,
}

impl Analyzer {
    pub fn new(options: AnalysisOptions) -> Self {
        Self { options }
    }

    /// Access the adjustment options.
    pub fn options(&self) -> &AnalysisOptions {
        &self.options
    }

    /// Same analyzer, different options.
    pub fn with_options(&self, options: AnalysisOptions) -> Self {
        Self { options }
    }

    /// Full single-game pipeline: normalize the raw record, estimate
    /// the pool (ticket anchor → median fallback), compute EV.
    pub fn analyze(&self, raw: &RawGame) -> Result<GameAnalysis, AnalysisError> {
        let game = normalize::normalize_game(raw)?;
        let ev = self.analyze_record(&game)?;
        Ok(GameAnalysis { game, ev })
    }

    /// EV for an already-normalized game record.
    pub fn analyze_record(&self, game: &GameRecord) -> Result<EvResult, AnalysisError> {
        let pool = pool::estimate_pool(&game.tiers)?;
        ev::compute_ev(game.ticket_price, &game.tiers, &pool, &self.options)
    }

    /// Comparative pass over a batch of raw games. Games that fail
    /// normalization or estimation are skipped; survivors keep their
    /// input order.
    pub fn compare(&self, raws: &[RawGame]) -> Vec<ComparativeResult> {
        let mut games = Vec::with_capacity(raws.len());
        for raw in raws {
            match normalize::normalize_game(raw) {
                Ok(game) => games.push(game),
                Err(e) => {
                    tracing::warn!(game = %raw.name, error = %e, "game skipped in batch");
                }
            }
        }

        let results = compare::compare_batch(&games, &self.options);
        info!(
            games_in = raws.len(),
            results = results.len(),
            "comparative batch complete"
        );
        results
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
