use anyhow::Result;
use chrono::NaiveDate;
use history_types::{GameCard, MonthView, ScreenEvent, ScreenView};

use crate::calendar::{
    MONTH_WEEKDAY_HEADERS, build_month, build_week, date_key, month_title, parse_date_key,
    shift_month, shift_week, start_of_month, week_title,
};
use crate::render::render_board;
use crate::repository::GameRepository;

pub const SCREEN_TITLE: &str = "国际象棋历史记录";
pub const NO_GAMES_MESSAGE: &str = "该日没有棋局记录";
pub const CARD_BOARD_SIZE: f64 = 80.0;

/// UI state of the history screen. Changes only through [`ScreenController::apply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenController {
    selected_date: NaiveDate,
    visible_week: NaiveDate,
    calendar_open: bool,
    visible_month: NaiveDate,
}

impl ScreenController {
    pub fn new(selected_date: NaiveDate) -> Self {
        Self {
            selected_date,
            visible_week: selected_date,
            calendar_open: false,
            visible_month: start_of_month(selected_date),
        }
    }

    pub fn selected_date(&self) -> NaiveDate {
        self.selected_date
    }

    pub fn visible_week(&self) -> NaiveDate {
        self.visible_week
    }

    pub fn visible_month(&self) -> NaiveDate {
        self.visible_month
    }

    pub fn is_calendar_open(&self) -> bool {
        self.calendar_open
    }

    /// Applies one event. An event carrying an unparseable date leaves the state untouched.
    pub fn apply(&mut self, event: ScreenEvent) -> Result<()> {
        tracing::debug!("Applying screen event: {:?}", event);

        match event {
            ScreenEvent::SelectDate { date } => {
                self.selected_date = parse_date_key(&date)?;
            }
            ScreenEvent::PreviousWeek => {
                self.visible_week = shift_week(self.visible_week, -1);
            }
            ScreenEvent::NextWeek => {
                self.visible_week = shift_week(self.visible_week, 1);
            }
            ScreenEvent::ToggleCalendar => {
                if self.calendar_open {
                    self.calendar_open = false;
                } else {
                    self.open_calendar();
                }
            }
            ScreenEvent::CloseCalendar => {
                self.calendar_open = false;
            }
            ScreenEvent::PreviousMonth if self.calendar_open => {
                self.visible_month = shift_month(self.visible_month, -1);
            }
            ScreenEvent::NextMonth if self.calendar_open => {
                self.visible_month = shift_month(self.visible_month, 1);
            }
            ScreenEvent::PreviousMonth | ScreenEvent::NextMonth => {
                tracing::debug!("Ignoring month navigation while the calendar is closed");
            }
            ScreenEvent::PickCalendarDate { date } => {
                let picked = parse_date_key(&date)?;
                self.selected_date = picked;
                self.visible_week = picked;
                self.calendar_open = false;
            }
        }

        Ok(())
    }

    fn open_calendar(&mut self) {
        self.calendar_open = true;
        self.visible_month = start_of_month(self.selected_date);
    }

    /// Rebuilds the whole screen from the current state
    pub fn view(&self, repository: &GameRepository, board_size: f64) -> ScreenView {
        let has_games = |key: &str| repository.has_any(key);

        let month = self.calendar_open.then(|| MonthView {
            title: month_title(self.visible_month),
            weekday_headers: MONTH_WEEKDAY_HEADERS.iter().map(|h| h.to_string()).collect(),
            days: build_month(self.visible_month, self.selected_date, has_games),
        });

        let selected_key = date_key(self.selected_date);
        let games: Vec<GameCard> = repository
            .lookup(&selected_key)
            .iter()
            .map(|game| GameCard {
                board: render_board(&game.fen, board_size),
                game: game.clone(),
            })
            .collect();

        ScreenView {
            title: SCREEN_TITLE.to_string(),
            week_title: week_title(self.visible_week),
            week: build_week(self.visible_week, self.selected_date, has_games),
            month,
            empty_message: games.is_empty().then(|| NO_GAMES_MESSAGE.to_string()),
            selected_date: selected_key,
            games,
        }
    }
}
