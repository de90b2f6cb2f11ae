use chrono_tz::Tz;
use log::Level;

pub const EVENT_NAME: &str = "CYBERTHON";
pub const HERO_IMAGE: &str = "/hero.svg";

// Countdown target, interpreted in EVENT_TIMEZONE.
pub const EVENT_START_DATE: (i32, u32, u32) = (2024, 12, 20);
pub const EVENT_START_TIME: (u32, u32, u32) = (10, 0, 0);
pub const EVENT_TIMEZONE: Tz = chrono_tz::UTC;

/// Length of the pinned scroll region, in viewport heights ("+=500%").
pub const SCROLL_REGION_VIEWPORTS: f64 = 5.0;

/// How long scrolling must be idle before snapping to a label.
pub const SNAP_IDLE_MS: u32 = 150;
pub const SNAP_MIN_SECS: f64 = 0.2;
pub const SNAP_MAX_SECS: f64 = 0.5;

pub const TICK_INTERVAL_MS: u32 = 1_000;

#[cfg(debug_assertions)]
pub fn log_level() -> Level {
    Level::Debug
}

#[cfg(not(debug_assertions))]
pub fn log_level() -> Level {
    Level::Info
}
