use anyhow::{Result, anyhow};
use chrono::NaiveDate;
use history_types::{GameRecord, GameResult};
use std::collections::{BTreeMap, HashSet};

use crate::calendar::parse_date_key;

/// Immutable table of games keyed by ISO date. Games keep insertion order.
#[derive(Debug, Clone, Default)]
pub struct GameRepository {
    games_by_date: BTreeMap<String, Vec<GameRecord>>,
}

/// Parses a display date such as "2025.3.15"
pub fn parse_display_date(display: &str) -> Option<NaiveDate> {
    let mut parts = display.trim().split('.');
    let year = parts.next()?.parse().ok()?;
    let month = parts.next()?.parse().ok()?;
    let day = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, day)
}

impl GameRepository {
    /// Builds a repository, checking that keys are valid dates, that every
    /// record's display date matches its key, and that ids are unique.
    pub fn from_entries(entries: Vec<(String, Vec<GameRecord>)>) -> Result<Self> {
        let mut games_by_date: BTreeMap<String, Vec<GameRecord>> = BTreeMap::new();
        let mut seen_ids = HashSet::new();

        for (key, games) in entries {
            let date = parse_date_key(&key)?;

            for game in &games {
                let display_date = parse_display_date(&game.date)
                    .ok_or_else(|| anyhow!("Game {} has invalid display date: {}", game.id, game.date))?;
                if display_date != date {
                    return Err(anyhow!(
                        "Game {} is dated {} but filed under {}",
                        game.id,
                        game.date,
                        key
                    ));
                }
                if !seen_ids.insert(game.id) {
                    return Err(anyhow!("Duplicate game id: {}", game.id));
                }
            }

            games_by_date.entry(key).or_default().extend(games);
        }

        tracing::debug!(
            "Loaded {} games across {} days",
            seen_ids.len(),
            games_by_date.len()
        );

        Ok(Self { games_by_date })
    }

    /// The built-in history shown to every user
    pub fn with_mock_history() -> Self {
        Self::from_entries(mock_history()).unwrap_or_else(|e| {
            tracing::error!("Built-in history is inconsistent: {}", e);
            Self::default()
        })
    }

    /// Games played on `date_key`, in display order
    pub fn lookup(&self, date_key: &str) -> &[GameRecord] {
        self.games_by_date
            .get(date_key)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn has_any(&self, date_key: &str) -> bool {
        self.games_by_date
            .get(date_key)
            .is_some_and(|games| !games.is_empty())
    }

    /// Date keys in chronological order
    pub fn date_keys(&self) -> impl Iterator<Item = &str> {
        self.games_by_date.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.games_by_date.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn game(
    id: u32,
    result: GameResult,
    date: &str,
    opening: &str,
    tag: &str,
    fen: &str,
) -> GameRecord {
    GameRecord {
        id,
        white: "Mike".to_string(),
        black: "Lily".to_string(),
        result,
        date: date.to_string(),
        opening: opening.to_string(),
        tag: tag.to_string(),
        fen: fen.to_string(),
    }
}

fn mock_history() -> Vec<(String, Vec<GameRecord>)> {
    vec![
        (
            "2025-03-15".to_string(),
            vec![
                game(
                    1,
                    GameResult::WhiteWins,
                    "2025.3.15",
                    "Bird Opening",
                    "f4",
                    "rnbqkbnr/pppppppp/8/8/8/5N2/PPPPPPPP/RNBQKB1R b KQkq - 1 1",
                ),
                game(
                    2,
                    GameResult::BlackWins,
                    "2025.3.15",
                    "Queen's Gambit",
                    "d4 d5",
                    "rnbqkbnr/ppp1pppp/8/3p4/3P4/8/PPP1PPPP/RNBQKBNR w KQkq - 0 2",
                ),
                game(
                    3,
                    GameResult::Draw,
                    "2025.3.15",
                    "Ruy Lopez",
                    "e4 e5 Nf3 Nc6 Bb5",
                    "r1bqkbnr/pppp1ppp/2n5/1B2p3/4P3/5N2/PPPP1PPP/RNBQK2R b KQkq - 3 3",
                ),
            ],
        ),
        (
            "2025-03-20".to_string(),
            vec![game(
                4,
                GameResult::WhiteWins,
                "2025.3.20",
                "Queen's Pawn Opening",
                "d4",
                "rnbqkbnr/pppppppp/8/8/3P4/8/PPP1PPPP/RNBQKBNR b KQkq - 0 1",
            )],
        ),
    ]
}
