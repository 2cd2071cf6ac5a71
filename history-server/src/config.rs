use chrono::NaiveDate;
use std::env;
use std::str::FromStr;

use history_core::{CARD_BOARD_SIZE, parse_date_key};

pub const DEFAULT_INITIAL_DATE: &str = "2025-03-15";

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub session_timeout_seconds: u64,
    pub cleanup_interval_seconds: u64,
    pub initial_date: NaiveDate,
    pub board_size: f64,
    pub clerk_publishable_key: Option<String>,
    pub auth_dev_mode: bool,
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Ignoring invalid {}={:?}, using default", name, raw);
            default
        }),
        Err(_) => default,
    }
}

impl Config {
    pub fn new() -> Self {
        let initial_date = env::var("INITIAL_DATE")
            .unwrap_or_else(|_| DEFAULT_INITIAL_DATE.to_string());
        let initial_date = parse_date_key(&initial_date).unwrap_or_else(|e| {
            tracing::warn!("{}, using {}", e, DEFAULT_INITIAL_DATE);
            default_initial_date()
        });

        let board_size = checked_board_size(env_or("BOARD_SIZE", CARD_BOARD_SIZE));

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env_or("PORT", 8080),
            session_timeout_seconds: env_or("SESSION_TIMEOUT_SECONDS", 1800),
            cleanup_interval_seconds: env_or("CLEANUP_INTERVAL_SECONDS", 30),
            initial_date,
            board_size,
            clerk_publishable_key: env::var("CLERK_PUBLISHABLE_KEY")
                .or_else(|_| env::var("EXPO_PUBLIC_CLERK_PUBLISHABLE_KEY"))
                .ok()
                .filter(|key| !key.trim().is_empty()),
            auth_dev_mode: env_or("AUTH_DEV_MODE", false),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

/// Card boards must have a positive, finite size
fn checked_board_size(size: f64) -> f64 {
    if size.is_finite() && size > 0.0 {
        size
    } else {
        tracing::warn!("Ignoring invalid BOARD_SIZE={}, using {}", size, CARD_BOARD_SIZE);
        CARD_BOARD_SIZE
    }
}

fn default_initial_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 15).unwrap_or_default()
}
