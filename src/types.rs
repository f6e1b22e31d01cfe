//! Shared types for the scratch-ticket EV analyzer.
//!
//! These types form the data model used across all modules: the raw,
//! string-flexible records supplied by sources, the normalized numeric
//! tiers the engine computes over, and the result/error values the
//! engine hands back to callers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Raw input records
// ---------------------------------------------------------------------------

/// A field that arrives either as a JSON number or as free text
/// (`1000` vs `"$1,000"`, `4.25` vs `"1 in 4.25"`).
///
/// Scraped prize tables are duck-typed; this keeps that flexibility at
/// the boundary so the numeric core only ever sees normalized values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawField {
    Number(f64),
    Text(String),
}

impl RawField {
    /// The text form of the field, if it is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            RawField::Text(s) => Some(s.as_str()),
            RawField::Number(_) => None,
        }
    }
}

impl fmt::Display for RawField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawField::Number(n) => write!(f, "{n}"),
            RawField::Text(s) => write!(f, "{s}"),
        }
    }
}

/// One prize tier as reported by a source, before normalization.
///
/// Counts arrive either as a combined `"137 of 147"` string (the usual
/// scraped-table form) or as explicit numeric fields; explicit fields
/// take precedence. Every field is optional — the normalizer decides
/// whether the tier is usable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawTier {
    #[serde(default)]
    pub prize: Option<RawField>,
    #[serde(default)]
    pub odds: Option<RawField>,
    /// Combined remaining/total text, e.g. `"137 of 147"`.
    #[serde(default)]
    pub counts: Option<String>,
    #[serde(default)]
    pub remaining: Option<u64>,
    #[serde(default)]
    pub total: Option<u64>,
}

/// One game as reported by a source, before normalization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawGame {
    #[serde(default)]
    pub name: String,
    /// Game number as printed on the ticket (kept as text — leading
    /// zeros are significant).
    #[serde(default)]
    pub number: String,
    #[serde(default)]
    pub price: Option<RawField>,
    /// Overall odds text as published, e.g. `"1 in 3.94"`.
    #[serde(default)]
    pub claimed_odds: String,
    /// Published cash-only odds text, where the source reports one.
    #[serde(default)]
    pub claimed_cash_odds: String,
    #[serde(default)]
    pub tiers: Vec<RawTier>,
}

/// A batch of raw games as returned by one source fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchedBatch {
    pub source: String,
    pub fetched_at: DateTime<Utc>,
    pub games: Vec<RawGame>,
}

// ---------------------------------------------------------------------------
// Normalized records
// ---------------------------------------------------------------------------

/// A prize tier after normalization: resolved monetary value, ticket
/// flag, odds denominator, and counts. Derived once from a `RawTier`,
/// immutable thereafter.
///
/// `remaining <= total` is expected but not enforced — sources report
/// inconsistent counts and the engine computes over what it is given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedTier {
    pub label: String,
    /// Monetary value. For ticket tiers this is the game's ticket
    /// price, never a supplied amount.
    pub value: f64,
    /// Whether the prize is a free replacement ticket rather than cash.
    pub is_ticket: bool,
    /// Odds denominator: one in `odds` tickets wins this tier.
    pub odds: f64,
    pub remaining: u64,
    pub total: u64,
}

impl fmt::Display for NormalizedTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (1 in {}, {} of {} left)",
            self.label, self.odds, self.remaining, self.total,
        )
    }
}

/// A game after normalization: positive ticket price and the tiers that
/// survived parsing. The engine treats this as read-only input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameRecord {
    pub name: String,
    pub number: String,
    pub ticket_price: f64,
    pub claimed_odds: String,
    pub claimed_cash_odds: String,
    pub tiers: Vec<NormalizedTier>,
}

impl fmt::Display for GameRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} {} (${:.2}, {} tiers)",
            self.number,
            self.name,
            self.ticket_price,
            self.tiers.len(),
        )
    }
}

// ---------------------------------------------------------------------------
// Analysis options
// ---------------------------------------------------------------------------

/// Default federal withholding rate applied when `apply_tax` is on.
pub fn default_tax_rate() -> f64 {
    24.0
}

/// Adjustment options for EV computation. The caller holds these and
/// re-invokes the calculator on every toggle — computation is pure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalysisOptions {
    /// Zero out cash prizes under $500 (below the claim-center
    /// reporting threshold, often excluded from realistic EV).
    #[serde(default)]
    pub ignore_under_500: bool,
    /// Discount cash prizes by `tax_rate` percent withholding.
    #[serde(default)]
    pub apply_tax: bool,
    /// Withholding rate in percent.
    #[serde(default = "default_tax_rate")]
    pub tax_rate: f64,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            ignore_under_500: false,
            apply_tax: false,
            tax_rate: default_tax_rate(),
        }
    }
}

// ---------------------------------------------------------------------------
// Pool estimate
// ---------------------------------------------------------------------------

/// Which strategy produced a pool estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PoolMethod {
    /// Anchored on the free-ticket tier's odds and counts.
    TicketAnchor,
    /// Median of per-tier implied pool sizes.
    MedianFallback,
    /// Mean of `odds * total` across tiers, ratio-scaled to current.
    MeanRatio,
}

impl fmt::Display for PoolMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PoolMethod::TicketAnchor => write!(f, "ticket-anchor"),
            PoolMethod::MedianFallback => write!(f, "median-fallback"),
            PoolMethod::MeanRatio => write!(f, "mean-ratio"),
        }
    }
}

/// Estimated ticket pool size. Computed fresh per invocation, never
/// cached.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PoolEstimate {
    /// Estimated number of tickets corresponding to the reported counts.
    pub tickets: f64,
    pub method: PoolMethod,
}

impl fmt::Display for PoolEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "~{:.0} tickets ({})", self.tickets, self.method)
    }
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// Per-tier output of the EV calculator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierResult {
    pub label: String,
    pub is_ticket: bool,
    /// Resolved monetary value (ticket price for ticket tiers).
    pub value: f64,
    /// Value after the threshold/tax adjustment pipeline.
    pub adjusted_value: f64,
    pub odds: f64,
    pub remaining: u64,
    pub total: u64,
    /// `remaining / M` against the estimated pool.
    pub probability: f64,
    /// `probability * adjusted_value`.
    pub contribution: f64,
}

impl fmt::Display for TierResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: p={:.8} adj=${:.2} ev=${:.4}",
            self.label, self.probability, self.adjusted_value, self.contribution,
        )
    }
}

/// Aggregate output of one EV computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvResult {
    pub ticket_price: f64,
    /// Expected payout per ticket.
    pub gross_ev: f64,
    /// `gross_ev - ticket_price`.
    pub net_ev: f64,
    pub pool: PoolEstimate,
    pub tiers: Vec<TierResult>,
}

impl fmt::Display for EvResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "gross=${:.4} net=${:.4} pool={}",
            self.gross_ev, self.net_ev, self.pool,
        )
    }
}

/// Output of the comparative analyzer for one game: launch-state
/// ("claimed") vs current-state ("calculated") EV and the drift between
/// them. Carries every field batch output can be sorted by.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparativeResult {
    pub name: String,
    pub number: String,
    pub ticket_price: f64,
    /// Published overall odds text, echoed for display.
    pub claimed_odds: String,
    /// Implied current odds: estimated pool over remaining prizes.
    pub calculated_odds: f64,
    pub claimed_gross: f64,
    pub claimed_net: f64,
    pub calculated_gross: f64,
    pub calculated_net: f64,
    /// Percent drift of calculated net EV from claimed net EV.
    /// Exactly `0` when claimed net EV is zero.
    pub delta_pct: f64,
}

impl fmt::Display for ComparativeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} {} ${:.2} | claimed net ${:.4} | current net ${:.4} | drift {:+.1}%",
            self.number,
            self.name,
            self.ticket_price,
            self.claimed_net,
            self.calculated_net,
            self.delta_pct,
        )
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Terminal failure states of one computation. These are values the
/// caller renders, not panics: parsing problems never reach here (bad
/// tiers are dropped), and a batch absorbs per-game failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnalysisError {
    /// Inputs missing outright: no usable ticket price, or no tiers.
    #[error("missing precondition: {0}")]
    MissingPrecondition(String),

    /// Inputs present but insufficient or contradictory — no strategy
    /// produced a positive finite pool size.
    #[error("pool estimation failed: {0}")]
    EstimationFailure(String),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
