//! The four TOML datetime kinds and their canonical string renderings.
//!
//! Typed values have no temporal type, so every datetime crosses the bridge as
//! a string. Offset date-times render as RFC 3339 at whole-second precision
//! with `Z` for a zero offset; local kinds render without an offset and keep
//! any fractional seconds, trailing zeros trimmed. The same renderings feed
//! the content identity.

use chrono::{FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, TimeZone};
use toml::value::{Date, Datetime, Offset, Time};

const LOCAL_DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
const LOCAL_DATE_FORMAT: &str = "%Y-%m-%d";
const LOCAL_TIME_FORMAT: &str = "%H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemporalKind {
    OffsetDateTime,
    LocalDateTime,
    LocalDate,
    LocalTime,
}

impl TemporalKind {
    /// Pick the kind from the components present. Total: a datetime carrying
    /// an offset is always an offset date-time, even if the rest is missing;
    /// [`TemporalKind::render`] is what rejects incomplete values.
    pub fn classify(datetime: &Datetime) -> Self {
        match (&datetime.date, &datetime.time, &datetime.offset) {
            (_, _, Some(_)) => TemporalKind::OffsetDateTime,
            (Some(_), Some(_), None) => TemporalKind::LocalDateTime,
            (Some(_), None, None) => TemporalKind::LocalDate,
            (None, _, None) => TemporalKind::LocalTime,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TemporalKind::OffsetDateTime => "offset date-time",
            TemporalKind::LocalDateTime => "local date-time",
            TemporalKind::LocalDate => "local date",
            TemporalKind::LocalTime => "local time",
        }
    }

    /// Render `datetime` as this kind, or `None` when its components don't
    /// match the kind or don't name a real calendar instant.
    pub fn render(self, datetime: &Datetime) -> Option<String> {
        match (self, &datetime.date, &datetime.time, &datetime.offset) {
            (TemporalKind::OffsetDateTime, Some(date), Some(time), Some(offset)) => {
                let local = NaiveDateTime::new(naive_date(date)?, naive_time(time)?);
                let zone = fixed_offset(offset)?;
                let instant = zone.from_local_datetime(&local).single()?;
                Some(instant.to_rfc3339_opts(SecondsFormat::Secs, true))
            }
            (TemporalKind::LocalDateTime, Some(date), Some(time), None) => {
                let local = NaiveDateTime::new(naive_date(date)?, naive_time(time)?);
                Some(format!(
                    "{}{}",
                    local.format(LOCAL_DATE_TIME_FORMAT),
                    fraction(time.nanosecond)
                ))
            }
            (TemporalKind::LocalDate, Some(date), None, None) => {
                Some(naive_date(date)?.format(LOCAL_DATE_FORMAT).to_string())
            }
            (TemporalKind::LocalTime, None, Some(time), None) => Some(format!(
                "{}{}",
                naive_time(time)?.format(LOCAL_TIME_FORMAT),
                fraction(time.nanosecond)
            )),
            _ => None,
        }
    }
}

/// Fractional seconds with trailing zeros trimmed, or nothing for a whole second.
fn fraction(nanosecond: u32) -> String {
    if nanosecond == 0 {
        return String::new();
    }
    let digits = format!("{nanosecond:09}");
    format!(".{}", digits.trim_end_matches('0'))
}

fn naive_date(date: &Date) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(
        i32::from(date.year),
        u32::from(date.month),
        u32::from(date.day),
    )
}

/// TOML allows `:60` leap seconds; chrono spells those as second 59 with the
/// nanosecond field pushed past one second.
fn naive_time(time: &Time) -> Option<NaiveTime> {
    if time.nanosecond >= 1_000_000_000 {
        return None;
    }
    let (second, nanosecond) = if time.second == 60 {
        (59, time.nanosecond + 1_000_000_000)
    } else {
        (u32::from(time.second), time.nanosecond)
    };
    NaiveTime::from_hms_nano_opt(
        u32::from(time.hour),
        u32::from(time.minute),
        second,
        nanosecond,
    )
}

fn fixed_offset(offset: &Offset) -> Option<FixedOffset> {
    match offset {
        Offset::Z => FixedOffset::east_opt(0),
        Offset::Custom { minutes } => FixedOffset::east_opt(i32::from(*minutes) * 60),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(s: &str) -> Datetime {
        s.parse().unwrap()
    }

    #[test]
    fn classify_by_components() {
        assert_eq!(
            TemporalKind::classify(&dt("1979-05-27T07:32:00Z")),
            TemporalKind::OffsetDateTime
        );
        assert_eq!(
            TemporalKind::classify(&dt("1979-05-27T07:32:00")),
            TemporalKind::LocalDateTime
        );
        assert_eq!(
            TemporalKind::classify(&dt("1979-05-27")),
            TemporalKind::LocalDate
        );
        assert_eq!(
            TemporalKind::classify(&dt("07:32:00")),
            TemporalKind::LocalTime
        );
    }

    #[test]
    fn zero_offset_renders_as_z() {
        let rendered = TemporalKind::OffsetDateTime.render(&dt("1979-05-27T07:32:00+00:00"));
        assert_eq!(rendered.as_deref(), Some("1979-05-27T07:32:00Z"));
    }

    #[test]
    fn offset_date_time_keeps_offset_and_drops_fraction() {
        let rendered =
            TemporalKind::OffsetDateTime.render(&dt("1979-05-27T00:32:00.999999-07:00"));
        assert_eq!(rendered.as_deref(), Some("1979-05-27T00:32:00-07:00"));
    }

    #[test]
    fn local_kinds_keep_fraction() {
        assert_eq!(
            TemporalKind::LocalDateTime
                .render(&dt("1979-05-27T00:32:00.5"))
                .as_deref(),
            Some("1979-05-27T00:32:00.5")
        );
        assert_eq!(
            TemporalKind::LocalTime.render(&dt("07:32:00.5")).as_deref(),
            Some("07:32:00.5")
        );
        assert_eq!(
            TemporalKind::LocalTime.render(&dt("07:32:00.000120")).as_deref(),
            Some("07:32:00.00012")
        );
        assert_eq!(
            TemporalKind::LocalTime.render(&dt("07:32:00")).as_deref(),
            Some("07:32:00")
        );
    }

    #[test]
    fn space_separator_normalizes_to_t() {
        assert_eq!(
            TemporalKind::LocalDateTime
                .render(&dt("1979-05-27 07:32:00"))
                .as_deref(),
            Some("1979-05-27T07:32:00")
        );
    }

    #[test]
    fn mismatched_kind_does_not_render() {
        assert_eq!(TemporalKind::LocalDate.render(&dt("07:32:00")), None);
        assert_eq!(TemporalKind::OffsetDateTime.render(&dt("1979-05-27")), None);
    }

    #[test]
    fn impossible_date_does_not_render() {
        let datetime = Datetime {
            date: Some(Date {
                year: 2023,
                month: 2,
                day: 30,
            }),
            time: None,
            offset: None,
        };
        assert_eq!(TemporalKind::LocalDate.render(&datetime), None);
    }
}
