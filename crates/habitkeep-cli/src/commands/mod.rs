pub mod config;
pub mod habit;
pub mod rollover;

use chrono::NaiveDate;
use habitkeep_core::{Clock, Config, FixedClock, SystemClock};
use serde::Serialize;
use tracing::debug;

pub type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// Settings every habit command runs with.
pub struct Context {
    pub today: NaiveDate,
    pub json: bool,
    pub lookahead_days: u32,
}

impl Context {
    /// Resolve today and output mode from the flags and the saved config.
    pub fn load(date: Option<NaiveDate>, json: bool) -> Result<Self, Box<dyn std::error::Error>> {
        let config = Config::load()?;
        let today = match date {
            Some(date) => FixedClock(date).today(),
            None => SystemClock::from_config(&config.calendar)?.today(),
        };
        debug!(%today, pinned = date.is_some(), "resolved today");
        Ok(Self {
            today,
            json: json || config.display.json,
            lookahead_days: config.schedule.lookahead_days,
        })
    }
}

pub fn print_json<T: Serialize>(value: &T) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
