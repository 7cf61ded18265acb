use anyhow::{Context, Result};
use chrono::{DateTime, Local, NaiveDate, NaiveTime};

pub struct TimeUtils;

impl TimeUtils {
    pub const MS_IN_S: i64 = 1000;
    pub const S_IN_D: i64 = 60 * 60 * 24;
    pub const STANDARD_TIME_FORMAT: &str = "%Y-%m-%d";
}

/// Parse a `YYYY-MM-DD` calendar day.
pub fn parse_date(text: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), TimeUtils::STANDARD_TIME_FORMAT)
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", text))
}

/// Today's calendar date in local time
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// UTC calendar day of an epoch-seconds timestamp
pub fn epoch_sec_to_date(epoch_sec: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp(epoch_sec, 0).map(|dt| dt.date_naive())
}

/// Epoch seconds at UTC midnight of `date`
pub fn date_to_epoch_sec(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp()
}

pub fn local_now_as_timestamp_ms() -> i64 {
    Local::now().timestamp_millis()
}

pub fn how_many_seconds_ago(past_timestamp_ms: i64) -> i64 {
    // How many seconds ago was the event described by `past_timestamp_ms` ?
    let now_timestamp_ms = local_now_as_timestamp_ms();
    (now_timestamp_ms - past_timestamp_ms) / TimeUtils::MS_IN_S
}
