//! Manufacturing calendar arithmetic.

use chrono::{Datelike, NaiveDate, Weekday};
use std::collections::HashSet;
use tracing::debug;

use crate::error::{KpiError, Result};

/// Maximum number of days searched backwards before giving up.
pub const MAX_LOOKBACK_DAYS: u32 = 366;

/// A day is a working day unless it falls on a weekend or a listed holiday.
pub fn is_working_day(day: NaiveDate, holidays: &HashSet<NaiveDate>) -> bool {
    !matches!(day.weekday(), Weekday::Sat | Weekday::Sun) && !holidays.contains(&day)
}

/// Most recent working day strictly before `reference`.
///
/// Walks backwards one day at a time, skipping weekends and `holidays`.
/// Fails with [`KpiError::CalendarExhausted`] after [`MAX_LOOKBACK_DAYS`]
/// candidates, or if the calendar runs out of representable dates.
pub fn last_working_day(reference: NaiveDate, holidays: &HashSet<NaiveDate>) -> Result<NaiveDate> {
    let mut cursor = reference;
    for searched in 1..=MAX_LOOKBACK_DAYS {
        let Some(prev) = cursor.pred_opt() else {
            return Err(KpiError::CalendarExhausted {
                reference,
                searched_days: searched - 1,
            });
        };
        cursor = prev;
        if is_working_day(cursor, holidays) {
            debug!(%reference, last_working_day = %cursor, searched, "resolved last working day");
            return Ok(cursor);
        }
    }

    Err(KpiError::CalendarExhausted {
        reference,
        searched_days: MAX_LOOKBACK_DAYS,
    })
}
