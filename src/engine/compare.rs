//! Claimed-vs-current comparison.
//!
//! Runs the mean-ratio pool estimate twice over one game — once
//! against launch-state ("total") counts and once against current
//! ("remaining") counts — and derives the percentage drift between the
//! two net EVs. Batch mode is resilient: a malformed game is skipped,
//! never fatal, and surviving games keep their input order.

use tracing::warn;

use super::ev::adjusted_value;
use super::pool::{is_ratio_candidate, mean_ratio};
use crate::types::{AnalysisError, AnalysisOptions, ComparativeResult, GameRecord};

/// Compare launch-state and current-state EV for one game.
///
/// A game with no usable tiers, no prizes ever printed, no prizes
/// remaining, or a non-positive launch pool cannot be compared and
/// comes back as an `EstimationFailure`.
pub fn compare_game(
    game: &GameRecord,
    options: &AnalysisOptions,
) -> Result<ComparativeResult, AnalysisError> {
    let pools = mean_ratio(&game.tiers).ok_or_else(|| {
        AnalysisError::EstimationFailure(format!("game '{}' has no usable tiers", game.name))
    })?;

    if !pools.launch.is_finite() || pools.launch <= 0.0 {
        return Err(AnalysisError::EstimationFailure(format!(
            "game '{}': launch pool estimate is not positive",
            game.name,
        )));
    }
    if pools.total_prizes == 0 {
        return Err(AnalysisError::EstimationFailure(format!(
            "game '{}' reports zero total prizes",
            game.name,
        )));
    }
    if pools.remaining_prizes == 0 {
        return Err(AnalysisError::EstimationFailure(format!(
            "game '{}' has no prizes remaining",
            game.name,
        )));
    }

    // Both sums run over the same tier set the pool estimate used.
    let mut claimed_payout = 0.0;
    let mut current_payout = 0.0;
    for tier in game.tiers.iter().filter(|t| is_ratio_candidate(t)) {
        let adjusted = adjusted_value(tier, game.ticket_price, options);
        claimed_payout += adjusted * tier.total as f64;
        current_payout += adjusted * tier.remaining as f64;
    }

    let claimed_gross = claimed_payout / pools.launch;
    let claimed_net = claimed_gross - game.ticket_price;
    let calculated_gross = current_payout / pools.current;
    let calculated_net = calculated_gross - game.ticket_price;

    // Zero claimed net EV would divide by zero; drift is defined as 0
    // for that case rather than propagating infinity.
    let delta_pct = if claimed_net != 0.0 {
        (calculated_net - claimed_net) / claimed_net.abs() * 100.0
    } else {
        0.0
    };

    Ok(ComparativeResult {
        name: game.name.clone(),
        number: game.number.clone(),
        ticket_price: game.ticket_price,
        claimed_odds: game.claimed_odds.clone(),
        calculated_odds: pools.calculated_odds,
        claimed_gross,
        claimed_net,
        calculated_gross,
        calculated_net,
        delta_pct,
    })
}

/// Compare every game in a batch, skipping the ones that fail.
pub fn compare_batch(
    games: &[GameRecord],
    options: &AnalysisOptions,
) -> Vec<ComparativeResult> {
    let mut results = Vec::with_capacity(games.len());
    for game in games {
        match compare_game(game, options) {
            Ok(result) => results.push(result),
            Err(e) => {
                warn!(game = %game, error = %e, "game skipped in batch comparison");
            }
        }
    }
    results
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
