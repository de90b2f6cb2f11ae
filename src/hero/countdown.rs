use std::fmt;
use std::rc::Rc;

use chrono::{DateTime, TimeZone, Utc};

use crate::config;

const MS_PER_MINUTE: i64 = 60_000;
const MS_PER_HOUR: i64 = 3_600_000;
const MS_PER_DAY: i64 = 86_400_000;

/// Source of the current wall-clock time. Injected so ticks can be replayed in tests.
pub type Clock = Rc<dyn Fn() -> DateTime<Utc>>;

pub fn wall_clock() -> Clock {
    Rc::new(Utc::now)
}

/// Time remaining until the event, truncated to whole minutes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CountdownState {
    pub days: i64,
    pub hours: u32,
    pub minutes: u32,
}

impl CountdownState {
    pub const ZERO: CountdownState = CountdownState {
        days: 0,
        hours: 0,
        minutes: 0,
    };

    pub fn total_millis(&self) -> i64 {
        self.days * MS_PER_DAY + self.hours as i64 * MS_PER_HOUR + self.minutes as i64 * MS_PER_MINUTE
    }
}

impl fmt::Display for CountdownState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d:{:02}h:{:02}m", self.days, self.hours, self.minutes)
    }
}

/// Days, hours and minutes from `now` until `target`. Seconds are dropped,
/// and a target in the past yields all zeros.
pub fn time_left<A: TimeZone, B: TimeZone>(now: &DateTime<A>, target: &DateTime<B>) -> CountdownState {
    let distance = target.timestamp_millis() - now.timestamp_millis();
    if distance < 0 {
        return CountdownState::ZERO;
    }

    CountdownState {
        days: distance / MS_PER_DAY,
        hours: ((distance % MS_PER_DAY) / MS_PER_HOUR) as u32,
        minutes: ((distance % MS_PER_HOUR) / MS_PER_MINUTE) as u32,
    }
}

/// The configured event start as an absolute instant.
///
/// `None` only if the configured wall time does not exist in the configured
/// zone (for example inside a DST gap).
pub fn event_start() -> Option<DateTime<Utc>> {
    let (year, month, day) = config::EVENT_START_DATE;
    let (hour, minute, second) = config::EVENT_START_TIME;
    config::EVENT_TIMEZONE
        .with_ymd_and_hms(year, month, day, hour, minute, second)
        .earliest()
        .map(|start| start.with_timezone(&Utc))
}
