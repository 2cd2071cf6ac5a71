use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::board::RenderedBoard;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum GameResult {
    WhiteWins,
    BlackWins,
    Draw,
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameResult::WhiteWins => write!(f, "White wins"),
            GameResult::BlackWins => write!(f, "Black wins"),
            GameResult::Draw => write!(f, "Draw"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GameRecord {
    pub id: u32,
    pub white: String,
    pub black: String,
    pub result: GameResult,
    pub date: String, // display date, e.g. "2025.3.15"
    pub opening: String,
    pub tag: String,
    pub fen: String,
}

/// One calendar day as shown in the week strip or the month grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DayCell {
    pub day: u32,
    pub weekday_label: String,
    pub date_key: String, // ISO 8601 date, YYYY-MM-DD
    pub is_selected: bool,
    pub is_in_current_month: Option<bool>, // None in the week strip
    pub has_games: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MonthView {
    pub title: String,
    pub weekday_headers: Vec<String>,
    pub days: Vec<DayCell>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GameCard {
    pub game: GameRecord,
    pub board: RenderedBoard,
}

/// Snapshot of the history screen, rebuilt after every event
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ScreenView {
    pub title: String,
    pub week_title: String,
    pub week: Vec<DayCell>,
    pub month: Option<MonthView>,
    pub selected_date: String,
    pub games: Vec<GameCard>,
    pub empty_message: Option<String>,
}
