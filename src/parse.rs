use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};

// Token grammar for date and time arguments.
//
// Accepted dates, tried in this order, case-insensitive:
//   "today", "yesterday", "tomorrow", YYYY-MM-DD, YYYY/MM/DD, MM-DD, MM/DD
// Accepted times, tried in this order, case-insensitive:
//   "now", HH, HH:MM, HH:MM:SS
//
// A bare one/two-digit token is always an hour, never a day of month, so the
// same token classifies identically at every call site.
//
// "No match" is a classification result, not an error: callers probe these
// to decide whether a token is a date, a time, a category or free text.
// The current date/time is always passed in so parsing stays deterministic.

pub fn parse_date(token: &str, today: NaiveDate) -> Option<NaiveDate> {
    match token.to_uppercase().as_str() {
        "TODAY" => return Some(today),
        "YESTERDAY" => return Some(today - Duration::days(1)),
        "TOMORROW" => return Some(today + Duration::days(1)),
        _ => {}
    }

    let parts: Vec<&str> = token.split(['-', '/']).collect();
    match parts.as_slice() {
        [year, month, day] if year.len() == 4 => {
            let year = parse_field(year)?;
            let month = parse_field(month)?;
            let day = parse_field(day)?;
            NaiveDate::from_ymd_opt(year as i32, month, day)
        }
        [month, day] => {
            let month = parse_field(month)?;
            let day = parse_field(day)?;
            NaiveDate::from_ymd_opt(today.year(), month, day)
        }
        _ => None,
    }
}

pub fn parse_time(token: &str, now: NaiveTime) -> Option<NaiveTime> {
    if token.to_uppercase() == "NOW" {
        return Some(now);
    }

    let parts: Vec<&str> = token.split(':').collect();
    match parts.as_slice() {
        [hour] => NaiveTime::from_hms_opt(parse_field(hour)?, 0, 0),
        [hour, minute] => NaiveTime::from_hms_opt(parse_field(hour)?, parse_field(minute)?, 0),
        [hour, minute, second] => NaiveTime::from_hms_opt(
            parse_field(hour)?,
            parse_field(minute)?,
            parse_field(second)?,
        ),
        _ => None,
    }
}

fn parse_field(text: &str) -> Option<u32> {
    if text.is_empty() || text.len() > 4 || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

/// Outcome of probing a token pair as one date and one time. Each half
/// succeeds or fails on its own, so the caller can tell which token was the
/// odd one out and fall back to treating it as a category instead.
#[derive(Debug, Clone, Copy)]
pub struct Combined {
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
}

impl Combined {
    pub fn instant(&self) -> Option<NaiveDateTime> {
        Some(self.date?.and_time(self.time?))
    }
}

/// Probe tokens as (date, time), in that positional order.
pub fn combine_date_then_time(date_tok: &str, time_tok: &str, now: NaiveDateTime) -> Combined {
    Combined {
        date: parse_date(date_tok, now.date()),
        time: parse_time(time_tok, now.time()),
    }
}

/// Probe tokens as (time, date), in that positional order.
pub fn combine_time_then_date(time_tok: &str, date_tok: &str, now: NaiveDateTime) -> Combined {
    Combined {
        date: parse_date(date_tok, now.date()),
        time: parse_time(time_tok, now.time()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    fn now() -> NaiveDateTime {
        today().and_hms_opt(13, 37, 0).unwrap()
    }

    #[test]
    fn keywords_are_one_day_apart() {
        let yesterday = parse_date("yesterday", today()).unwrap();
        let today_d = parse_date("TODAY", today()).unwrap();
        let tomorrow = parse_date("Tomorrow", today()).unwrap();
        assert_eq!(today_d - yesterday, Duration::days(1));
        assert_eq!(tomorrow - today_d, Duration::days(1));
    }

    #[test]
    fn full_date_round_trips() {
        for text in ["2024-03-01", "2023-12-31", "2024-02-29"] {
            let date = parse_date(text, today()).unwrap();
            assert_eq!(date.format("%Y-%m-%d").to_string(), text);
        }
    }

    #[test]
    fn slash_and_short_forms() {
        assert_eq!(
            parse_date("2024/03/01", today()),
            NaiveDate::from_ymd_opt(2024, 3, 1)
        );
        // Year defaults to the current year
        assert_eq!(
            parse_date("03-01", today()),
            NaiveDate::from_ymd_opt(2024, 3, 1)
        );
        assert_eq!(
            parse_date("12/24", today()),
            NaiveDate::from_ymd_opt(2024, 12, 24)
        );
    }

    #[test]
    fn bad_dates_do_not_parse() {
        for text in ["2024-13-01", "2024-02-30", "abc", "15", "2024-03", ""] {
            assert_eq!(parse_date(text, today()), None, "token {:?}", text);
        }
    }

    #[test]
    fn time_forms() {
        assert_eq!(
            parse_time("9", now().time()),
            NaiveTime::from_hms_opt(9, 0, 0)
        );
        assert_eq!(
            parse_time("14:30", now().time()),
            NaiveTime::from_hms_opt(14, 30, 0)
        );
        assert_eq!(
            parse_time("14:30:59", now().time()),
            NaiveTime::from_hms_opt(14, 30, 59)
        );
        assert_eq!(parse_time("noW", now().time()), Some(now().time()));
    }

    #[test]
    fn bad_times_do_not_parse() {
        for text in ["25:00", "12:61", "12:00:61", "abc", "12:", "", "1:2:3:4"] {
            assert_eq!(parse_time(text, now().time()), None, "token {:?}", text);
        }
    }

    #[test]
    fn parsing_is_idempotent() {
        assert_eq!(parse_date("tomorrow", today()), parse_date("tomorrow", today()));
        assert_eq!(parse_time("now", now().time()), parse_time("now", now().time()));
    }

    #[test]
    fn combine_reports_each_half() {
        let both = combine_time_then_date("09:00", "2024-03-01", now());
        assert_eq!(
            both.instant(),
            NaiveDate::from_ymd_opt(2024, 3, 1).and_then(|d| d.and_hms_opt(9, 0, 0))
        );

        let time_only = combine_time_then_date("09:00", "work", now());
        assert!(time_only.time.is_some());
        assert!(time_only.date.is_none());
        assert_eq!(time_only.instant(), None);

        let date_only = combine_date_then_time("2024-03-01", "work", now());
        assert!(date_only.date.is_some());
        assert!(date_only.time.is_none());
    }
}
