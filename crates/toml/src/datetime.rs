use std::cmp::Ordering;

/// A calendar date, validated during parsing including leap years.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Date {
    pub year: u16,
    pub month: u8,
    pub day: u8,
}

impl Date {
    pub fn new(year: u16, month: u8, day: u8) -> Self {
        Self { year, month, day }
    }

    /// Days since 1970-01-01, negative before.
    fn days_from_epoch(&self) -> i64 {
        // Shift the year so it starts in march, which puts the leap day at the end.
        let y = self.year as i64 - (self.month <= 2) as i64;
        let era = y.div_euclid(400);
        let yoe = y - era * 400;
        let m = self.month as i64;
        let doy = (153 * (m + if m > 2 { -3 } else { 9 }) + 2) / 5 + self.day as i64 - 1;
        let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
        era * 146_097 + doe - 719_468
    }
}

impl std::fmt::Display for Date {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

pub fn is_leap_year(year: u16) -> bool {
    (year % 4 == 0) && ((year % 100 != 0) || (year % 400 == 0))
}

pub fn days_in_month(year: u16, month: u8) -> u8 {
    match month {
        2 if is_leap_year(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Time {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub nanos: u32,
}

impl Time {
    pub fn new(hour: u8, minute: u8, second: u8, nanos: u32) -> Self {
        Self {
            hour,
            minute,
            second,
            nanos,
        }
    }

    fn seconds_of_day(&self) -> i64 {
        self.hour as i64 * 3600 + self.minute as i64 * 60 + self.second as i64
    }
}

impl std::fmt::Display for Time {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hour, self.minute, self.second)?;
        if self.nanos > 0 {
            let frac = format!("{:09}", self.nanos);
            write!(f, ".{}", frac.trim_end_matches('0'))?;
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LocalDateTime {
    pub date: Date,
    pub time: Time,
}

impl LocalDateTime {
    pub fn new(date: Date, time: Time) -> Self {
        Self { date, time }
    }
}

impl std::fmt::Display for LocalDateTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}T{}", self.date, self.time)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Offset {
    /// Z
    Utc,
    /// Minutes east of UTC
    Custom(i16),
}

impl Offset {
    pub fn minutes(&self) -> i16 {
        match self {
            Offset::Utc => 0,
            Offset::Custom(m) => *m,
        }
    }
}

impl std::fmt::Display for Offset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Offset::Utc => f.write_str("Z"),
            Offset::Custom(minutes) => {
                let sign = if *minutes < 0 { '-' } else { '+' };
                let abs = minutes.unsigned_abs();
                write!(f, "{sign}{:02}:{:02}", abs / 60, abs % 60)
            }
        }
    }
}

/// A date-time with an offset. Two values are equal when they denote the same instant, so
/// `10:00Z` equals `11:00+01:00`.
#[derive(Clone, Copy, Debug)]
pub struct OffsetDateTime {
    pub date: Date,
    pub time: Time,
    pub offset: Offset,
}

impl OffsetDateTime {
    pub fn new(date: Date, time: Time, offset: Offset) -> Self {
        Self { date, time, offset }
    }

    /// Seconds since the unix epoch and the subsecond nanos.
    pub fn unix_timestamp(&self) -> (i64, u32) {
        let secs = self.date.days_from_epoch() * 86_400 + self.time.seconds_of_day()
            - self.offset.minutes() as i64 * 60;
        (secs, self.time.nanos)
    }
}

impl PartialEq for OffsetDateTime {
    fn eq(&self, other: &Self) -> bool {
        self.unix_timestamp() == other.unix_timestamp()
    }
}

impl Eq for OffsetDateTime {}

impl PartialOrd for OffsetDateTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OffsetDateTime {
    fn cmp(&self, other: &Self) -> Ordering {
        self.unix_timestamp().cmp(&other.unix_timestamp())
    }
}

impl std::fmt::Display for OffsetDateTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}T{}{}", self.date, self.time, self.offset)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DateTimeField {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
    OffsetHour,
    OffsetMinute,
}

impl std::fmt::Display for DateTimeField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateTimeField::Year => f.write_str("year"),
            DateTimeField::Month => f.write_str("month"),
            DateTimeField::Day => f.write_str("day"),
            DateTimeField::Hour => f.write_str("hour"),
            DateTimeField::Minute => f.write_str("minute"),
            DateTimeField::Second => f.write_str("second"),
            DateTimeField::OffsetHour => f.write_str("offset-hour"),
            DateTimeField::OffsetMinute => f.write_str("offset-minute"),
        }
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn leap_years() {
        assert!(is_leap_year(2000));
        assert!(is_leap_year(2024));
        assert!(!is_leap_year(1900));
        assert!(!is_leap_year(2023));
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2023, 2), 28);
        assert_eq!(days_in_month(2023, 4), 30);
    }

    #[test]
    fn display_rfc3339() {
        let date = Date::new(1979, 5, 27);
        let time = Time::new(7, 32, 0, 999_000_000);
        assert_eq!(date.to_string(), "1979-05-27");
        assert_eq!(time.to_string(), "07:32:00.999");
        assert_eq!(Time::new(0, 0, 5, 0).to_string(), "00:00:05");
        assert_eq!(
            LocalDateTime::new(date, time).to_string(),
            "1979-05-27T07:32:00.999"
        );
        let odt = OffsetDateTime::new(date, Time::new(0, 32, 0, 0), Offset::Custom(-7 * 60));
        assert_eq!(odt.to_string(), "1979-05-27T00:32:00-07:00");
        let utc = OffsetDateTime::new(date, Time::new(7, 32, 0, 0), Offset::Utc);
        assert_eq!(utc.to_string(), "1979-05-27T07:32:00Z");
    }

    #[test]
    fn offset_date_time_compares_instants() {
        let date = Date::new(1979, 5, 27);
        let utc = OffsetDateTime::new(date, Time::new(7, 32, 0, 0), Offset::Utc);
        let shifted = OffsetDateTime::new(date, Time::new(0, 32, 0, 0), Offset::Custom(-7 * 60));
        assert_eq!(utc, shifted);

        let later = OffsetDateTime::new(date, Time::new(7, 33, 0, 0), Offset::Utc);
        assert!(later > shifted);
    }

    #[test]
    fn epoch() {
        let epoch = OffsetDateTime::new(Date::new(1970, 1, 1), Time::new(0, 0, 0, 0), Offset::Utc);
        assert_eq!(epoch.unix_timestamp(), (0, 0));
        let day = OffsetDateTime::new(Date::new(1970, 1, 2), Time::new(0, 0, 0, 0), Offset::Utc);
        assert_eq!(day.unix_timestamp(), (86_400, 0));
        let leap = OffsetDateTime::new(Date::new(2000, 3, 1), Time::new(0, 0, 0, 0), Offset::Utc);
        assert_eq!(leap.unix_timestamp(), (951_868_800, 0));
    }
}
