//! Expected value computation.
//!
//! Pure function over `(ticket price, tiers, pool estimate, options)`:
//! per-tier win probability against the estimated pool, the
//! threshold/tax adjustment pipeline, and the gross/net aggregate. The
//! caller recomputes on every option toggle, so the same inputs must
//! always produce bit-identical output.

use tracing::debug;

use crate::types::{
    AnalysisError, AnalysisOptions, EvResult, NormalizedTier, PoolEstimate, TierResult,
};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Cash prizes under this amount are zeroed when `ignore_under_500` is
/// on — small prizes sit below the claim-center reporting threshold and
/// are routinely excluded from realistic EV.
pub const SMALL_PRIZE_CUTOFF: f64 = 500.0;

// ---------------------------------------------------------------------------
// Adjustment pipeline
// ---------------------------------------------------------------------------

/// Resolve a tier's adjusted value under the given options.
///
/// Ticket tiers are worth exactly one replacement ticket and bypass
/// both adjustments — a free ticket is neither taxed nor below any
/// reporting threshold. Cash tiers go through the fixed pipeline:
/// threshold zeroing first, then tax withholding on whatever is left.
pub fn adjusted_value(
    tier: &NormalizedTier,
    ticket_price: f64,
    options: &AnalysisOptions,
) -> f64 {
    if tier.is_ticket {
        return ticket_price;
    }

    let mut value = tier.value;
    if options.ignore_under_500 && value > 0.0 && value < SMALL_PRIZE_CUTOFF {
        value = 0.0;
    }
    if options.apply_tax && value > 0.0 {
        value *= 1.0 - options.tax_rate / 100.0;
    }
    value
}

// ---------------------------------------------------------------------------
// EV computation
// ---------------------------------------------------------------------------

/// Compute per-tier probabilities and the aggregate EV for one game.
///
/// Preconditions: a positive finite ticket price, at least one tier,
/// and a positive finite pool estimate. Violations come back as values
/// (`MissingPrecondition` / `EstimationFailure`), never as panics.
pub fn compute_ev(
    ticket_price: f64,
    tiers: &[NormalizedTier],
    pool: &PoolEstimate,
    options: &AnalysisOptions,
) -> Result<EvResult, AnalysisError> {
    if !ticket_price.is_finite() || ticket_price <= 0.0 {
        return Err(AnalysisError::MissingPrecondition(
            "ticket price must be positive".to_string(),
        ));
    }
    if tiers.is_empty() {
        return Err(AnalysisError::MissingPrecondition(
            "no tiers to compute over".to_string(),
        ));
    }
    if !pool.tickets.is_finite() || pool.tickets <= 0.0 {
        return Err(AnalysisError::EstimationFailure(format!(
            "pool estimate {} is not a positive finite ticket count",
            pool.tickets,
        )));
    }

    let mut tier_results = Vec::with_capacity(tiers.len());
    let mut gross_ev = 0.0;

    for tier in tiers {
        // Ticket tiers never carry an independent monetary value.
        let value = if tier.is_ticket {
            ticket_price
        } else {
            tier.value
        };
        let adjusted = adjusted_value(tier, ticket_price, options);
        let probability = tier.remaining as f64 / pool.tickets;
        let contribution = probability * adjusted;
        gross_ev += contribution;

        tier_results.push(TierResult {
            label: tier.label.clone(),
            is_ticket: tier.is_ticket,
            value,
            adjusted_value: adjusted,
            odds: tier.odds,
            remaining: tier.remaining,
            total: tier.total,
            probability,
            contribution,
        });
    }

    let net_ev = gross_ev - ticket_price;
    debug!(gross_ev, net_ev, pool = %pool, "EV computed");

    Ok(EvResult {
        ticket_price,
        gross_ev,
        net_ev,
        pool: *pool,
        tiers: tier_results,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
