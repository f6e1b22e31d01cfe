//! Tier normalization.
//!
//! Converts the string-flexible records sources supply (free-form prize
//! labels, "1 in N" odds text, "X of Y" count text) into canonical
//! numeric tiers. Parsing never fails loudly: unusable fields come back
//! as NaN or `None`, and tiers the engine cannot compute over are
//! dropped from the working set.

use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, warn};

use crate::types::{AnalysisError, GameRecord, NormalizedTier, RawField, RawGame, RawTier};

// ---------------------------------------------------------------------------
// Patterns
// ---------------------------------------------------------------------------

/// "1 in 4.25", "1 in 1,234" — number may carry commas and decimals.
static RE_ONE_IN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*1\s+in\s+([\d,]+(?:\.\d+)?)\s*$").unwrap());

/// "137 of 147", "646,383 of 732,144".
static RE_COUNTS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*([\d,]+)\s+of\s+([\d,]+)\s*$").unwrap());

// ---------------------------------------------------------------------------
// Field parsers
// ---------------------------------------------------------------------------

/// Whether a prize label denotes a free replacement ticket rather than
/// cash. Case-insensitive after trimming: exactly "ticket", or any
/// label containing "free ticket".
pub fn is_ticket_label(label: &str) -> bool {
    let label = label.trim().to_lowercase();
    label == "ticket" || label.contains("free ticket")
}

/// Parse a currency string ("$1,000", " 250 ") into a number.
/// Returns NaN when the text is not monetary ("Ticket", "").
pub fn parse_currency(text: &str) -> f64 {
    let cleaned: String = text
        .chars()
        .filter(|c| *c != '$' && *c != ',' && !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return f64::NAN;
    }
    cleaned.parse().unwrap_or(f64::NAN)
}

/// Parse an odds field into its denominator: "1 in 4.25" → 4.25, plain
/// "4.25" → 4.25. Returns NaN on empty or unparseable text.
pub fn parse_odds(text: &str) -> f64 {
    if let Some(caps) = RE_ONE_IN.captures(text) {
        return parse_number(&caps[1]);
    }
    parse_number(text.trim())
}

/// Parse a "137 of 147" counts string into `(remaining, total)`.
/// Non-matching text yields `None` — distinct from a zero count.
pub fn parse_counts(text: &str) -> Option<(u64, u64)> {
    let caps = RE_COUNTS.captures(text)?;
    let remaining = caps[1].replace(',', "").parse().ok()?;
    let total = caps[2].replace(',', "").parse().ok()?;
    Some((remaining, total))
}

/// Numeric value of a prize field. Numbers pass through unchanged;
/// text goes through currency parsing.
pub fn money_value(field: &RawField) -> f64 {
    match field {
        RawField::Number(n) => *n,
        RawField::Text(s) => parse_currency(s),
    }
}

/// Odds denominator of an odds field. Numbers pass through unchanged;
/// text goes through odds parsing.
pub fn odds_value(field: &RawField) -> f64 {
    match field {
        RawField::Number(n) => *n,
        RawField::Text(s) => parse_odds(s),
    }
}

fn parse_number(text: &str) -> f64 {
    let cleaned: String = text.chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return f64::NAN;
    }
    cleaned.parse().unwrap_or(f64::NAN)
}

// ---------------------------------------------------------------------------
// Tier / game normalization
// ---------------------------------------------------------------------------

/// Normalize one raw tier, or drop it.
///
/// A tier is unusable when it has no resolvable remaining/total pair,
/// when its odds are non-numeric, or when a cash prize has no parseable
/// value. Explicit numeric count fields take precedence over the
/// combined "X of Y" text. Ticket tiers always resolve their value to
/// the game's ticket price.
pub fn normalize_tier(raw: &RawTier, ticket_price: f64) -> Option<NormalizedTier> {
    let (remaining, total) = match (raw.remaining, raw.total) {
        (Some(r), Some(t)) => (r, t),
        _ => parse_counts(raw.counts.as_deref()?)?,
    };

    let odds = raw.odds.as_ref().map(odds_value)?;
    if !odds.is_finite() {
        return None;
    }

    let (label, value, is_ticket) = match raw.prize.as_ref()? {
        RawField::Number(n) => (format!("${n}"), *n, false),
        RawField::Text(s) => {
            let is_ticket = is_ticket_label(s);
            let value = if is_ticket {
                ticket_price
            } else {
                parse_currency(s)
            };
            (s.clone(), value, is_ticket)
        }
    };
    if !value.is_finite() {
        return None;
    }

    Some(NormalizedTier {
        label,
        value,
        is_ticket,
        odds,
        remaining,
        total,
    })
}

/// Normalize a whole game: resolve the ticket price and keep the tiers
/// that survive parsing. Dropped tiers are logged, never fatal.
pub fn normalize_game(raw: &RawGame) -> Result<GameRecord, AnalysisError> {
    let price = raw
        .price
        .as_ref()
        .map(money_value)
        .unwrap_or(f64::NAN);
    if !price.is_finite() || price <= 0.0 {
        return Err(AnalysisError::MissingPrecondition(format!(
            "game '{}' has no usable ticket price",
            raw.name,
        )));
    }

    if raw.tiers.is_empty() {
        return Err(AnalysisError::MissingPrecondition(format!(
            "game '{}' has no tiers",
            raw.name,
        )));
    }

    let mut tiers = Vec::with_capacity(raw.tiers.len());
    for (i, raw_tier) in raw.tiers.iter().enumerate() {
        match normalize_tier(raw_tier, price) {
            Some(tier) => tiers.push(tier),
            None => {
                warn!(game = %raw.name, tier = i, "unparseable tier dropped");
            }
        }
    }

    if tiers.is_empty() {
        return Err(AnalysisError::EstimationFailure(format!(
            "game '{}': no tier survived normalization",
            raw.name,
        )));
    }

    debug!(
        game = %raw.name,
        kept = tiers.len(),
        dropped = raw.tiers.len() - tiers.len(),
        "game normalized"
    );

    Ok(GameRecord {
        name: raw.name.clone(),
        number: raw.number.clone(),
        ticket_price: price,
        claimed_odds: raw.claimed_odds.clone(),
        claimed_cash_odds: raw.claimed_cash_odds.clone(),
        tiers,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- Ticket classification --

    #[test]
    fn test_ticket_label_exact() {
        assert!(is_ticket_label("Ticket"));
        assert!(is_ticket_label("  ticket "));
        assert!(is_ticket_label("Free Ticket"));
    }

    #[test]
    fn test_ticket_label_contains() {
        assert!(is_ticket_label("free ticket bonus"));
        assert!(is_ticket_label("One FREE TICKET ($5 value)"));
    }

    #[test]
    fn test_ticket_label_negative() {
        assert!(!is_ticket_label("$20"));
        assert!(!is_ticket_label(""));
        assert!(!is_ticket_label("Ticket Holder Prize"));
    }

    // -- Currency parsing --

    #[test]
    fn test_parse_currency_symbols_and_separators() {
        assert_eq!(parse_currency("$1,000"), 1000.0);
        assert_eq!(parse_currency(" $2.50 "), 2.5);
        assert_eq!(parse_currency("250"), 250.0);
    }

    #[test]
    fn test_parse_currency_failure_is_nan() {
        assert!(parse_currency("Ticket").is_nan());
        assert!(parse_currency("").is_nan());
        assert!(parse_currency("$").is_nan());
    }

    #[test]
    fn test_money_value_number_passes_through() {
        assert_eq!(money_value(&RawField::Number(1000.0)), 1000.0);
        assert_eq!(money_value(&RawField::Text("$1,000".into())), 1000.0);
    }

    // -- Odds parsing --

    #[test]
    fn test_parse_odds_one_in_form() {
        assert_eq!(parse_odds("1 in 4.25"), 4.25);
        assert_eq!(parse_odds("1 IN 12"), 12.0);
        assert_eq!(parse_odds("1 in 1,234"), 1234.0);
    }

    #[test]
    fn test_parse_odds_bare_number() {
        assert_eq!(parse_odds("4.25"), 4.25);
        assert_eq!(parse_odds("62,257"), 62257.0);
    }

    #[test]
    fn test_parse_odds_garbage_is_nan() {
        assert!(parse_odds("").is_nan());
        assert!(parse_odds("one in twelve").is_nan());
        assert!(parse_odds("odds: 1 in 4").is_nan());
    }

    // -- Counts parsing --

    #[test]
    fn test_parse_counts_basic() {
        assert_eq!(parse_counts("137 of 147"), Some((137, 147)));
        assert_eq!(parse_counts("646,383 of 732,144"), Some((646_383, 732_144)));
        assert_eq!(parse_counts("0 of 147"), Some((0, 147)));
    }

    #[test]
    fn test_parse_counts_no_match_is_none() {
        assert_eq!(parse_counts(""), None);
        assert_eq!(parse_counts("137"), None);
        assert_eq!(parse_counts("sold out"), None);
    }

    // -- Tier normalization --

    fn cash_tier(prize: &str, odds: &str, counts: &str) -> RawTier {
        RawTier {
            prize: Some(RawField::Text(prize.to_string())),
            odds: Some(RawField::Text(odds.to_string())),
            counts: Some(counts.to_string()),
            remaining: None,
            total: None,
        }
    }

    #[test]
    fn test_normalize_cash_tier() {
        let t = normalize_tier(&cash_tier("$1,000", "1 in 62,257", "137 of 147"), 2.0).unwrap();
        assert_eq!(t.label, "$1,000");
        assert_eq!(t.value, 1000.0);
        assert!(!t.is_ticket);
        assert_eq!(t.odds, 62257.0);
        assert_eq!(t.remaining, 137);
        assert_eq!(t.total, 147);
    }

    #[test]
    fn test_normalize_ticket_tier_resolves_price() {
        let t = normalize_tier(&cash_tier("Ticket", "1 in 12", "646,383 of 732,144"), 2.0).unwrap();
        assert!(t.is_ticket);
        assert_eq!(t.value, 2.0);
    }

    #[test]
    fn test_normalize_numeric_fields() {
        let raw = RawTier {
            prize: Some(RawField::Number(500.0)),
            odds: Some(RawField::Number(120.0)),
            counts: None,
            remaining: Some(10),
            total: Some(40),
        };
        let t = normalize_tier(&raw, 5.0).unwrap();
        assert_eq!(t.value, 500.0);
        assert_eq!(t.odds, 120.0);
        assert_eq!(t.remaining, 10);
    }

    #[test]
    fn test_explicit_counts_take_precedence() {
        let mut raw = cash_tier("$50", "1 in 10", "5 of 9");
        raw.remaining = Some(100);
        raw.total = Some(200);
        let t = normalize_tier(&raw, 5.0).unwrap();
        assert_eq!(t.remaining, 100);
        assert_eq!(t.total, 200);
    }

    #[test]
    fn test_tier_dropped_without_counts() {
        let raw = RawTier {
            prize: Some(RawField::Text("$50".into())),
            odds: Some(RawField::Text("1 in 10".into())),
            counts: Some("sold out".into()),
            remaining: None,
            total: None,
        };
        assert!(normalize_tier(&raw, 5.0).is_none());
    }

    #[test]
    fn test_tier_dropped_with_bad_odds() {
        assert!(normalize_tier(&cash_tier("$50", "n/a", "5 of 9"), 5.0).is_none());
    }

    #[test]
    fn test_tier_dropped_with_unparseable_cash_prize() {
        assert!(normalize_tier(&cash_tier("Grand Prize", "1 in 10", "5 of 9"), 5.0).is_none());
    }

    #[test]
    fn test_tier_dropped_without_prize() {
        let raw = RawTier {
            prize: None,
            odds: Some(RawField::Number(10.0)),
            counts: Some("5 of 9".into()),
            remaining: None,
            total: None,
        };
        assert!(normalize_tier(&raw, 5.0).is_none());
    }

    // -- Game normalization --

    fn sample_game() -> RawGame {
        RawGame {
            name: "Gold Rush".to_string(),
            number: "1507".to_string(),
            price: Some(RawField::Text("$2".to_string())),
            claimed_odds: "1 in 3.94".to_string(),
            claimed_cash_odds: "1 in 4.52".to_string(),
            tiers: vec![
                cash_tier("$1,000", "1 in 62,257", "137 of 147"),
                cash_tier("Ticket", "1 in 12", "646,383 of 732,144"),
            ],
        }
    }

    #[test]
    fn test_normalize_game() {
        let game = normalize_game(&sample_game()).unwrap();
        assert_eq!(game.ticket_price, 2.0);
        assert_eq!(game.tiers.len(), 2);
        assert!(game.tiers[1].is_ticket);
        assert_eq!(game.tiers[1].value, 2.0);
    }

    #[test]
    fn test_normalize_game_drops_bad_tiers() {
        let mut raw = sample_game();
        raw.tiers.push(cash_tier("$50", "garbage", "1 of 2"));
        let game = normalize_game(&raw).unwrap();
        assert_eq!(game.tiers.len(), 2);
    }

    #[test]
    fn test_normalize_game_missing_price() {
        let mut raw = sample_game();
        raw.price = None;
        assert!(matches!(
            normalize_game(&raw),
            Err(AnalysisError::MissingPrecondition(_)),
        ));

        raw.price = Some(RawField::Text("call for price".into()));
        assert!(matches!(
            normalize_game(&raw),
            Err(AnalysisError::MissingPrecondition(_)),
        ));
    }

    #[test]
    fn test_normalize_game_no_tiers() {
        let mut raw = sample_game();
        raw.tiers.clear();
        assert!(matches!(
            normalize_game(&raw),
            Err(AnalysisError::MissingPrecondition(_)),
        ));
    }

    #[test]
    fn test_normalize_game_all_tiers_dropped() {
        let mut raw = sample_game();
        raw.tiers = vec![cash_tier("$50", "garbage", "nope")];
        assert!(matches!(
            normalize_game(&raw),
            Err(AnalysisError::EstimationFailure(_)),
        ));
    }
}
