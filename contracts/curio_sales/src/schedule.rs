//! Weekly-schedule arithmetic on unix timestamps, pure and storage-free.
//! Days run 1 = Monday through 7 = Sunday; the unix epoch fell on a
//! Thursday, hence the +3 day offset below.

use crate::state::ScheduleWindow;

pub const SECONDS_PER_MINUTE: u64 = 60;
pub const SECONDS_PER_DAY: u64 = 86_400;
pub const SECONDS_PER_WEEK: u64 = 7 * SECONDS_PER_DAY;
pub const MINUTES_PER_WEEK: u64 = SECONDS_PER_WEEK / SECONDS_PER_MINUTE;

pub fn day_of_week(ts: u64) -> u64 {
    (ts / SECONDS_PER_DAY + 3) % 7 + 1
}

/// Minute index into the week, 0 at Monday 00:00.
pub fn minute_of_week(ts: u64) -> u64 {
    let day = day_of_week(ts) - 1;
    let into_day = ts % SECONDS_PER_DAY;
    day * 24 * 60 + into_day / SECONDS_PER_MINUTE
}

pub fn window_minute_of_week(window: &ScheduleWindow) -> u64 {
    (window.day_of_week - 1) * 24 * 60 + window.hour * 60 + window.minute
}

pub fn is_within_window(ts: u64, window: &ScheduleWindow) -> bool {
    window.active && minute_of_week(ts) == window_minute_of_week(window)
}

/// Earliest weekly instant at or after `ts` among the active windows, or
/// None when no window is active.
pub fn next_window_start(ts: u64, windows: &[ScheduleWindow]) -> Option<u64> {
    let week_start = ts - minute_of_week(ts) * SECONDS_PER_MINUTE - ts % SECONDS_PER_MINUTE;
    windows
        .iter()
        .filter(|w| w.active)
        .map(|w| {
            let mut t = week_start + window_minute_of_week(w) * SECONDS_PER_MINUTE;
            if t < ts {
                t += SECONDS_PER_WEEK;
            }
            t
        })
        .min()
}
