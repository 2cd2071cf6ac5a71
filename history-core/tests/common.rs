#![allow(dead_code)]

use chrono::NaiveDate;
use history_core::{GameRepository, ScreenController};
use history_types::{DayCell, GameRecord, GameResult, ScreenEvent};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Creates a test game with the given id and display date
pub fn create_test_game(id: u32, display_date: &str, fen: &str) -> GameRecord {
    GameRecord {
        id,
        white: "Alice".to_string(),
        black: "Bob".to_string(),
        result: GameResult::Draw,
        date: display_date.to_string(),
        opening: "Test Opening".to_string(),
        tag: "e4".to_string(),
        fen: fen.to_string(),
    }
}

/// Repository with games on the given ISO dates, one game per date
pub fn create_repository_with_dates(keys: &[&str]) -> GameRepository {
    let entries = keys
        .iter()
        .enumerate()
        .map(|(index, key)| {
            let date = NaiveDate::parse_from_str(key, "%Y-%m-%d").unwrap();
            let display = date.format("%Y.%-m.%-d").to_string();
            (
                key.to_string(),
                vec![create_test_game(index as u32 + 1, &display, "8/8/8/8/8/8/8/8")],
            )
        })
        .collect();
    GameRepository::from_entries(entries).unwrap()
}

pub fn create_controller_on(y: i32, m: u32, d: u32) -> ScreenController {
    ScreenController::new(date(y, m, d))
}

pub fn apply_all(controller: &mut ScreenController, events: Vec<ScreenEvent>) {
    for event in events {
        controller.apply(event).unwrap();
    }
}

/// Asserts the cells are consecutive calendar days
pub fn assert_consecutive(cells: &[DayCell]) {
    let dates: Vec<NaiveDate> = cells
        .iter()
        .map(|cell| NaiveDate::parse_from_str(&cell.date_key, "%Y-%m-%d").unwrap())
        .collect();
    for pair in dates.windows(2) {
        assert_eq!(
            pair[0].succ_opt().unwrap(),
            pair[1],
            "Expected {} to follow {}",
            pair[1],
            pair[0]
        );
    }
}
