use chrono::{DateTime, Datelike, Days, Months, NaiveDate, NaiveDateTime, TimeZone, Utc, Weekday};

use crate::error::{Field, Rule, ValidationError};

/// Parses a due date relative to `now`, in `now`'s time zone.
///
/// Accepts `today`/`tod`, `tomorrow`/`tom`, `eow`, `eom`, `+Nd`/`+Nw`/`+Nm`,
/// weekday names (`fri`, `2:fri`) and absolute `YYYY-MM-DD[ HH:MM[:SS]]`.
/// Forms without a time of day resolve to 23:59:59 of that day.
pub fn parse_due<Tz: TimeZone>(input: &str, now: &DateTime<Tz>) -> Result<DateTime<Utc>, ValidationError> {
    let input = input.trim();
    let tz = now.timezone();
    let today = now.date_naive();
    let invalid = || ValidationError::new(Field::DueDate, Rule::UnknownValue(input.to_string()));

    // 1. Reserved keywords
    match input.to_lowercase().as_str() {
        "" => return Err(invalid()),
        "today" | "tod" => return end_of_day(&tz, today).ok_or_else(invalid),
        "tomorrow" | "tom" => {
            let tomorrow = today.checked_add_days(Days::new(1)).ok_or_else(invalid)?;
            return end_of_day(&tz, tomorrow).ok_or_else(invalid);
        }
        "eow" => {
            // Upcoming Sunday, today included
            let days = 6 - today.weekday().num_days_from_monday() as u64;
            let sunday = today.checked_add_days(Days::new(days)).ok_or_else(invalid)?;
            return end_of_day(&tz, sunday).ok_or_else(invalid);
        }
        "eom" => {
            let first = today.with_day(1).ok_or_else(invalid)?;
            let last = first
                .checked_add_months(Months::new(1))
                .and_then(|d| d.checked_sub_days(Days::new(1)))
                .ok_or_else(invalid)?;
            return end_of_day(&tz, last).ok_or_else(invalid);
        }
        _ => {}
    }

    // 2. Relative format
    if let Some(rest) = input.strip_prefix('+') {
        let target = parse_relative(rest, today).ok_or_else(invalid)?;
        return end_of_day(&tz, target).ok_or_else(invalid);
    }

    // 3. Absolute formats
    for format in ["%Y-%m-%d %H:%M", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(input, format) {
            return local_to_utc(&tz, &dt).ok_or_else(invalid);
        }
    }
    if let Ok(d) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return end_of_day(&tz, d).ok_or_else(invalid);
    }

    // 4. Weekday format
    if let Some((count, weekday)) = parse_weekday_token(input) {
        let mut days_needed = weekday.num_days_from_monday() as i64
            - today.weekday().num_days_from_monday() as i64;
        if days_needed <= 0 {
            days_needed += 7;
        }
        let target = (count - 1)
            .checked_mul(7)
            .and_then(|extra| extra.checked_add(days_needed as u64))
            .and_then(|days| today.checked_add_days(Days::new(days)))
            .ok_or_else(invalid)?;
        return end_of_day(&tz, target).ok_or_else(invalid);
    }

    Err(invalid())
}

fn parse_relative(rest: &str, today: NaiveDate) -> Option<NaiveDate> {
    let unit = rest.chars().last()?;
    let count: u32 = rest[..rest.len() - unit.len_utf8()].parse().ok()?;
    match unit.to_ascii_lowercase() {
        'd' => today.checked_add_days(Days::new(count as u64)),
        'w' => today.checked_add_days(Days::new(count as u64 * 7)),
        // Clamps to the month's last day (Jan 31 + 1m = Feb 28)
        'm' => today.checked_add_months(Months::new(count)),
        _ => None,
    }
}

fn end_of_day<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> Option<DateTime<Utc>> {
    local_to_utc(tz, &date.and_hms_opt(23, 59, 59)?)
}

fn local_to_utc<Tz: TimeZone>(tz: &Tz, local: &NaiveDateTime) -> Option<DateTime<Utc>> {
    tz.from_local_datetime(local)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

/// `fri` is the next Friday; `2:fri` the one after that.
fn parse_weekday_token(input: &str) -> Option<(u64, Weekday)> {
    let (count, day) = match input.split_once(':') {
        Some((count, day)) => (count.parse::<u64>().ok().filter(|c| *c >= 1)?, day),
        None => (1, input),
    };
    Some((count, parse_weekday_str(day)?))
}

fn parse_weekday_str(s: &str) -> Option<Weekday> {
    match s.to_lowercase().as_str() {
        "mon" | "monday" => Some(Weekday::Mon),
        "tue" | "tuesday" => Some(Weekday::Tue),
        "wed" | "wednesday" => Some(Weekday::Wed),
        "thu" | "thursday" => Some(Weekday::Thu),
        "fri" | "friday" => Some(Weekday::Fri),
        "sat" | "saturday" => Some(Weekday::Sat),
        "sun" | "sunday" => Some(Weekday::Sun),
        _ => None,
    }
}
