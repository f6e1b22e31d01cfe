//! JSON file source.
//!
//! Reads a JSON document from disk: either an array of games or a
//! single game object. This is the usual path for hand-entered tier
//! data and for snapshots saved from elsewhere.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::GameSource;
use crate::types::RawGame;

pub struct FileSource {
    path: PathBuf,
    name: String,
}

impl FileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let name = format!("file:{}", path.display());
        Self { path, name }
    }
}

/// Parse a JSON document into games: a top-level array, or a single
/// game object wrapped into a one-element batch.
pub fn parse_games(text: &str) -> Result<Vec<RawGame>> {
    let value: serde_json::Value =
        serde_json::from_str(text).context("document is not valid JSON")?;
    match value {
        serde_json::Value::Array(_) => {
            serde_json::from_value(value).context("JSON array is not a list of games")
        }
        _ => {
            let game: RawGame =
                serde_json::from_value(value).context("JSON object is not a game")?;
            Ok(vec![game])
        }
    }
}

#[async_trait]
impl GameSource for FileSource {
    async fn fetch_games(&self) -> Result<Vec<RawGame>> {
        let text = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        let games = parse_games(&text)
            .with_context(|| format!("failed to parse {}", self.path.display()))?;
        debug!(path = %self.path.display(), games = games.len(), "file source loaded");
        Ok(games)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const GAMES_JSON: &str = r#"[
        {
            "name": "Gold Rush",
            "number": "1507",
            "price": "$2",
            "claimed_odds": "1 in 3.94",
            "tiers": [
                {"prize": "$1,000", "odds": "1 in 62,257", "counts": "137 of 147"},
                {"prize": "Ticket", "odds": "1 in 12", "counts": "646,383 of 732,144"}
            ]
        }
    ]"#;

    #[test]
    fn test_parse_games_array() {
        let games = parse_games(GAMES_JSON).unwrap();
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].name, "Gold Rush");
        assert_eq!(games[0].tiers.len(), 2);
    }

    #[test]
    fn test_parse_games_single_object() {
        let games = parse_games(r#"{"name": "Solo", "price": 5}"#).unwrap();
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].name, "Solo");
    }

    #[test]
    fn test_parse_games_invalid_json() {
        assert!(parse_games("not json").is_err());
        assert!(parse_games("42").is_err());
    }

    #[test]
    fn test_file_source_round_trip() {
        let path = std::env::temp_dir().join(format!("scratchev-file-{}.json", std::process::id()));
        std::fs::write(&path, GAMES_JSON).unwrap();

        let source = FileSource::new(&path);
        assert!(source.name().starts_with("file:"));
        let games = tokio_test::block_on(source.fetch_games()).unwrap();
        assert_eq!(games.len(), 1);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_file_source_missing_file() {
        let source = FileSource::new("/nonexistent/games.json");
        assert!(tokio_test::block_on(source.fetch_games()).is_err());
    }
}
