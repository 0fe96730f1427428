//! Regular trading hours session check.

use chrono::{DateTime, Datelike, NaiveTime, Utc};
use chrono_tz::America::New_York;

/// Returns true if `now` falls within US equity RTH: weekdays,
/// 09:30-16:00 inclusive, America/New_York wall clock.
///
/// Simplified session model; exchange holidays are not accounted for.
pub fn is_market_open_rth(now: DateTime<Utc>) -> bool {
    let local = now.with_timezone(&New_York);
    if local.weekday().number_from_monday() > 5 {
        return false;
    }
    let open = NaiveTime::from_hms_opt(9, 30, 0).unwrap();
    let close = NaiveTime::from_hms_opt(16, 0, 0).unwrap();
    let t = local.time();
    open <= t && t <= close
}
