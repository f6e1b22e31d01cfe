//! Report rendering and ordering.
//!
//! Display ordering is a caller concern, not part of the engine
//! contract — the engine exposes the fields, this module sorts and
//! renders them for the CLI.

use std::cmp::Ordering;
use std::fmt::Write as _;
use std::str::FromStr;

use crate::engine::GameAnalysis;
use crate::types::ComparativeResult;

// ---------------------------------------------------------------------------
// Sorting
// ---------------------------------------------------------------------------

/// Column a comparative batch can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Price,
    Name,
    Number,
    ClaimedOdds,
    CalculatedOdds,
    ClaimedEv,
    CalculatedEv,
    DeltaPct,
}

impl FromStr for SortKey {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "price" => Ok(SortKey::Price),
            "name" => Ok(SortKey::Name),
            "number" => Ok(SortKey::Number),
            "claimed-odds" => Ok(SortKey::ClaimedOdds),
            "calc-odds" => Ok(SortKey::CalculatedOdds),
            "claimed-ev" => Ok(SortKey::ClaimedEv),
            "calc-ev" => Ok(SortKey::CalculatedEv),
            "delta" => Ok(SortKey::DeltaPct),
            _ => Err(anyhow::anyhow!(
                "unknown sort key '{s}' (expected price, name, number, claimed-odds, \
                 calc-odds, claimed-ev, calc-ev, or delta)"
            )),
        }
    }
}

fn compare_by(a: &ComparativeResult, b: &ComparativeResult, key: SortKey) -> Ordering {
    let float = |x: f64, y: f64| x.partial_cmp(&y).unwrap_or(Ordering::Equal);
    match key {
        SortKey::Price => float(a.ticket_price, b.ticket_price),
        SortKey::Name => a.name.cmp(&b.name),
        SortKey::Number => a.number.cmp(&b.number),
        SortKey::ClaimedOdds => a.claimed_odds.cmp(&b.claimed_odds),
        SortKey::CalculatedOdds => float(a.calculated_odds, b.calculated_odds),
        SortKey::ClaimedEv => float(a.claimed_net, b.claimed_net),
        SortKey::CalculatedEv => float(a.calculated_net, b.calculated_net),
        SortKey::DeltaPct => float(a.delta_pct, b.delta_pct),
    }
}

/// Sort comparative results in place. The sort is stable, so equal
/// keys keep the batch's input order.
pub fn sort_results(results: &mut [ComparativeResult], key: SortKey, descending: bool) {
    results.sort_by(|a, b| {
        let ord = compare_by(a, b, key);
        if descending {
            ord.reverse()
        } else {
            ord
        }
    });
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Render a single-game analysis as a plain-text table.
pub fn render_analysis(analysis: &GameAnalysis) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", analysis.game);
    let _ = writeln!(out, "pool estimate: {}", analysis.ev.pool);
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{:<24} {:>12} {:>22} {:>12} {:>12} {:>12}",
        "PRIZE", "ODDS", "REMAINING", "ADJUSTED", "P(WIN)", "EV",
    );
    for tier in &analysis.ev.tiers {
        let _ = writeln!(
            out,
            "{:<24} {:>12} {:>22} {:>12} {:>12} {:>12}",
            tier.label,
            format!("1 in {}", tier.odds),
            format!("{} of {}", tier.remaining, tier.total),
            format!("${:.2}", tier.adjusted_value),
            format!("{:.8}", tier.probability),
            format!("${:.4}", tier.contribution),
        );
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "gross EV: ${:.4}", analysis.ev.gross_ev);
    let _ = writeln!(
        out,
        "net EV:   ${:.4} (per ${:.2} ticket)",
        analysis.ev.net_ev, analysis.ev.ticket_price,
    );
    out
}

/// Render a comparative batch as a plain-text table.
pub fn render_comparison(results: &[ComparativeResult]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>6} {:>6}  {:<28} {:>12} {:>10} {:>11} {:>11} {:>8}",
        "PRICE", "GAME", "NAME", "CLAIMED ODDS", "CALC ODDS", "CLAIMED EV", "CALC EV", "DRIFT",
    );
    for r in results {
        let _ = writeln!(
            out,
            "{:>6} {:>6}  {:<28} {:>12} {:>10.2} {:>11.4} {:>11.4} {:>7.1}%",
            format!("${:.0}", r.ticket_price),
            r.number,
            r.name,
            r.claimed_odds,
            r.calculated_odds,
            r.claimed_net,
            r.calculated_net,
            r.delta_pct,
        );
    }
    let _ = writeln!(out, "\n{} game(s)", results.len());
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn result(name: &str, price: f64, claimed_net: f64, delta: f64) -> ComparativeResult {
        ComparativeResult {
            name: name.to_string(),
            number: format!("{}", name.len()),
            ticket_price: price,
            claimed_odds: "1 in 4.00".to_string(),
            calculated_odds: 4.2,
            claimed_gross: claimed_net + price,
            claimed_net,
            calculated_gross: 0.0,
            calculated_net: claimed_net - 0.1,
            delta_pct: delta,
        }
    }

    #[test]
    fn test_sort_key_from_str() {
        assert_eq!("price".parse::<SortKey>().unwrap(), SortKey::Price);
        assert_eq!("CLAIMED-EV".parse::<SortKey>().unwrap(), SortKey::ClaimedEv);
        assert_eq!("delta".parse::<SortKey>().unwrap(), SortKey::DeltaPct);
        assert!("bogus".parse::<SortKey>().is_err());
    }

    #[test]
    fn test_sort_by_price_ascending() {
        let mut results = vec![
            result("B", 10.0, -2.0, 5.0),
            result("A", 2.0, -1.0, 1.0),
            result("C", 5.0, -3.0, -4.0),
        ];
        sort_results(&mut results, SortKey::Price, false);
        let names: Vec<&str> = results.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["A", "C", "B"]);
    }

    #[test]
    fn test_sort_by_delta_descending() {
        let mut results = vec![
            result("A", 2.0, -1.0, 1.0),
            result("B", 10.0, -2.0, 5.0),
            result("C", 5.0, -3.0, -4.0),
        ];
        sort_results(&mut results, SortKey::DeltaPct, true);
        let names: Vec<&str> = results.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["B", "A", "C"]);
    }

    #[test]
    fn test_sort_equal_keys_keep_input_order() {
        let mut results = vec![
            result("First", 5.0, -1.0, 0.0),
            result("Second", 5.0, -2.0, 0.0),
            result("Third", 5.0, -3.0, 0.0),
        ];
        sort_results(&mut results, SortKey::Price, false);
        let names: Vec<&str> = results.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["First", "Second", "Third"]);
    }

    #[test]
    fn test_render_comparison_contains_fields() {
        let results = vec![result("Gold Rush", 5.0, -1.5, -20.0)];
        let text = render_comparison(&results);
        assert!(text.contains("Gold Rush"));
        assert!(text.contains("$5"));
        assert!(text.contains("1 in 4.00"));
        assert!(text.contains("-20.0%"));
        assert!(text.contains("1 game(s)"));
    }
}
