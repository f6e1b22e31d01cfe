//! Pool size estimation.
//!
//! "137 prizes remaining" only becomes a probability once we know how
//! many tickets the counts refer to. Three interchangeable strategies
//! estimate that pool size `M`; single-game analysis prefers the
//! ticket-tier anchor and falls back to the per-tier median, while
//! comparative analysis uses the mean-ratio estimate because it needs a
//! launch-state and a current-state pool from the same base.

use tracing::debug;

use crate::types::{AnalysisError, NormalizedTier, PoolEstimate, PoolMethod};

// ---------------------------------------------------------------------------
// Ticket-tier anchor
// ---------------------------------------------------------------------------

/// Estimate the current pool from the free-ticket tier.
///
/// The ticket tier's counts are the largest and least noisy, which
/// makes its odds the most reliable anchor: `total * odds` tickets were
/// implied at launch, scaled down by the fraction of that tier still
/// remaining. Returns the raw estimate — zero when the tier is
/// exhausted — and `None` when no ticket tier with positive total and
/// usable odds exists.
pub fn ticket_anchor(tiers: &[NormalizedTier]) -> Option<f64> {
    let anchor = tiers
        .iter()
        .find(|t| t.is_ticket && t.total > 0 && t.odds.is_finite() && t.odds > 0.0)?;

    let launch = anchor.total as f64 * anchor.odds;
    let current = launch * (anchor.remaining as f64 / anchor.total as f64);

    debug!(
        label = %anchor.label,
        launch,
        current,
        "ticket-anchor estimate"
    );
    Some(current)
}

// ---------------------------------------------------------------------------
// Median fallback
// ---------------------------------------------------------------------------

/// Estimate the pool as the median of per-tier implied sizes
/// (`remaining * odds` for every tier with prizes left and usable
/// odds). Median rather than mean: long-odds tiers round badly and a
/// single outlier would drag a mean arbitrarily far.
pub fn median_fallback(tiers: &[NormalizedTier]) -> Option<f64> {
    let mut implied: Vec<f64> = tiers
        .iter()
        .filter(|t| t.remaining > 0 && t.odds.is_finite() && t.odds > 0.0)
        .map(|t| t.remaining as f64 * t.odds)
        .collect();

    if implied.is_empty() {
        return None;
    }

    implied.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = implied.len() / 2;
    let median = if implied.len() % 2 == 1 {
        implied[mid]
    } else {
        (implied[mid - 1] + implied[mid]) / 2.0
    };

    debug!(candidates = implied.len(), median, "median-fallback estimate");
    Some(median)
}

// ---------------------------------------------------------------------------
// Mean-ratio (comparative mode)
// ---------------------------------------------------------------------------

/// Launch-state and current-state pools from one base estimate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatioPools {
    /// Launch-state pool `M0`: mean of `odds * total` across tiers.
    pub launch: f64,
    /// Current-state pool: `M0` scaled by remaining/total prize ratio.
    pub current: f64,
    /// Sum of remaining prizes across the tiers used.
    pub remaining_prizes: u64,
    /// Sum of total prizes across the tiers used.
    pub total_prizes: u64,
    /// Implied current overall odds: `current / remaining_prizes`.
    pub calculated_odds: f64,
}

/// Whether a tier participates in the mean-ratio estimate.
pub fn is_ratio_candidate(tier: &NormalizedTier) -> bool {
    tier.total > 0 && tier.odds.is_finite() && tier.odds > 0.0
}

/// Estimate launch and current pools for comparative analysis.
///
/// Each usable tier implies `Q = odds * total` tickets at launch; the
/// launch pool is the arithmetic mean of those, and the current pool is
/// that mean scaled by the overall fraction of prizes still remaining.
pub fn mean_ratio(tiers: &[NormalizedTier]) -> Option<RatioPools> {
    let candidates: Vec<&NormalizedTier> =
        tiers.iter().filter(|t| is_ratio_candidate(t)).collect();
    if candidates.is_empty() {
        return None;
    }

    let launch = candidates
        .iter()
        .map(|t| t.odds * t.total as f64)
        .sum::<f64>()
        / candidates.len() as f64;

    let remaining_prizes: u64 = candidates.iter().map(|t| t.remaining).sum();
    let total_prizes: u64 = candidates.iter().map(|t| t.total).sum();

    let current = launch * (remaining_prizes as f64 / total_prizes as f64);
    let calculated_odds = if remaining_prizes > 0 {
        current / remaining_prizes as f64
    } else {
        0.0
    };

    debug!(
        tiers = candidates.len(),
        launch,
        current,
        calculated_odds,
        "mean-ratio estimate"
    );

    Some(RatioPools {
        launch,
        current,
        remaining_prizes,
        total_prizes,
        calculated_odds,
    })
}

// ---------------------------------------------------------------------------
// Single-game strategy chain
// ---------------------------------------------------------------------------

/// Estimate the pool for single-game analysis: ticket-tier anchor
/// first, per-tier median when no anchor is usable or the anchor tier
/// is exhausted.
pub fn estimate_pool(tiers: &[NormalizedTier]) -> Result<PoolEstimate, AnalysisError> {
    if let Some(m) = ticket_anchor(tiers) {
        if m.is_finite() && m > 0.0 {
            return Ok(PoolEstimate {
                tickets: m,
                method: PoolMethod::TicketAnchor,
            });
        }
        debug!(estimate = m, "ticket anchor unusable, trying median");
    }

    if let Some(m) = median_fallback(tiers) {
        if m.is_finite() && m > 0.0 {
            return Ok(PoolEstimate {
                tickets: m,
                method: PoolMethod::MedianFallback,
            });
        }
    }

    Err(AnalysisError::EstimationFailure(
        "no strategy produced a positive finite pool size".to_string(),
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
