//! Event time values and their wire renderings.
//!
//! [`EventTime`] covers the three shapes a calendar start or end can take:
//! a pure date (all-day), a wall-clock time with no zone attached yet, and an
//! instant with a fixed UTC offset. Zone names are resolved against the IANA
//! database shipped with `chrono-tz`.

use chrono::{
    DateTime, Duration, FixedOffset, LocalResult, NaiveDate, NaiveDateTime, NaiveTime,
    SecondsFormat, TimeZone, Utc,
};
use chrono_tz::Tz;
use tracing::debug;

use crate::error::{CalendarError, CalendarResult};

/// Basic (compact) local stamp used by `TZID=` recurrence dates.
const BASIC_LOCAL_FORMAT: &str = "%Y%m%dT%H%M%S";
/// Basic UTC stamp used by `UNTIL` and `PERIOD` values.
const BASIC_UTC_FORMAT: &str = "%Y%m%dT%H%M%SZ";
/// ISO local datetime without offset.
const ISO_LOCAL_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";
/// ISO calendar date.
const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// The time of an event boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventTime {
    /// A whole day with no time-of-day.
    Date(NaiveDate),
    /// A wall-clock time that has not been attached to a zone yet.
    Floating(NaiveDateTime),
    /// An instant with a fixed UTC offset.
    Zoned(DateTime<FixedOffset>),
}

impl EventTime {
    /// Creates an all-day value.
    pub fn from_date(date: NaiveDate) -> Self {
        Self::Date(date)
    }

    /// Creates a floating wall-clock value.
    pub fn from_naive(naive: NaiveDateTime) -> Self {
        Self::Floating(naive)
    }

    /// Creates an instant from a datetime in any zone, keeping its offset.
    pub fn from_datetime<Z: TimeZone>(dt: DateTime<Z>) -> Self {
        Self::Zoned(dt.fixed_offset())
    }

    /// Returns `true` for all-day values.
    pub fn is_all_day(&self) -> bool {
        matches!(self, Self::Date(_))
    }

    /// Returns `true` for floating and zoned values.
    pub fn is_instant(&self) -> bool {
        !self.is_all_day()
    }

    /// Returns the calendar date, in the value's own wall clock.
    pub fn date(&self) -> NaiveDate {
        match self {
            Self::Date(d) => *d,
            Self::Floating(n) => n.date(),
            Self::Zoned(dt) => dt.date_naive(),
        }
    }

    /// Returns the wall-clock time; all-day values read as midnight.
    pub fn naive_local(&self) -> NaiveDateTime {
        match self {
            Self::Date(d) => d.and_time(NaiveTime::MIN),
            Self::Floating(n) => *n,
            Self::Zoned(dt) => dt.naive_local(),
        }
    }

    /// Attaches `zone` to a floating value without shifting its wall clock.
    ///
    /// Dates and already-zoned values are returned unchanged. A wall clock
    /// that occurs twice (DST fold) resolves to the earlier instant; one that
    /// never occurs (DST gap) is an error.
    pub fn ensure_zoned(&self, zone: &str) -> CalendarResult<Self> {
        match self {
            Self::Floating(naive) => localize(*naive, zone).map(Self::Zoned),
            other => Ok(*other),
        }
    }

    /// Resolves the value to a UTC instant.
    ///
    /// Dates read as midnight and floating values are localized into `zone`.
    /// Without a zone, floating values and dates are read as UTC.
    pub fn to_utc(&self, zone: Option<&str>) -> CalendarResult<DateTime<Utc>> {
        match (self, zone) {
            (Self::Zoned(dt), _) => Ok(dt.with_timezone(&Utc)),
            (other, Some(zone)) => Ok(localize(other.naive_local(), zone)?.with_timezone(&Utc)),
            (other, None) => Ok(other.naive_local().and_utc()),
        }
    }

    /// Renders the value the way the remote service expects in `date` and
    /// `dateTime` fields.
    ///
    /// Dates render as `YYYY-MM-DD`, instants as RFC 3339 with a numeric
    /// offset, and floating values as ISO local time without offset.
    pub fn to_wire_string(&self) -> String {
        match self {
            Self::Date(d) => d.format(ISO_DATE_FORMAT).to_string(),
            Self::Floating(n) => n.format(ISO_LOCAL_FORMAT).to_string(),
            Self::Zoned(dt) => dt.to_rfc3339_opts(SecondsFormat::AutoSi, false),
        }
    }

    /// Renders the wall clock in `zone` as a basic `YYYYMMDDTHHMMSS` stamp,
    /// returning it together with the zone name for a `TZID=` parameter.
    pub fn to_wire_string_with_zone_id(&self, zone: &str) -> CalendarResult<(String, String)> {
        let local = match self {
            Self::Date(d) => d.and_time(NaiveTime::MIN),
            Self::Floating(n) => localize(*n, zone)?.naive_local(),
            Self::Zoned(dt) => dt.with_timezone(&resolve_zone(zone)?).naive_local(),
        };
        Ok((
            local.format(BASIC_LOCAL_FORMAT).to_string(),
            zone.to_string(),
        ))
    }

    /// Renders the value as a basic UTC stamp with a `Z` suffix.
    pub fn to_utc_stamp(&self, zone: Option<&str>) -> CalendarResult<String> {
        Ok(self.to_utc(zone)?.format(BASIC_UTC_FORMAT).to_string())
    }

    /// The end used when an event is created without one: one day after an
    /// all-day start, one hour after an instant start.
    pub fn default_end(&self) -> CalendarResult<Self> {
        let end = match self {
            Self::Date(d) => d.checked_add_signed(Duration::days(1)).map(Self::Date),
            Self::Floating(n) => n.checked_add_signed(Duration::hours(1)).map(Self::Floating),
            Self::Zoned(dt) => dt.checked_add_signed(Duration::hours(1)).map(Self::Zoned),
        };
        end.ok_or_else(|| {
            CalendarError::validation(
                "end",
                format!("no default end exists after {}", self.to_wire_string()),
            )
        })
    }

    /// Returns `true` when both values are dates or both are instants.
    pub fn same_kind(&self, other: &Self) -> bool {
        self.is_all_day() == other.is_all_day()
    }
}

impl From<NaiveDate> for EventTime {
    fn from(date: NaiveDate) -> Self {
        Self::Date(date)
    }
}

impl From<NaiveDateTime> for EventTime {
    fn from(naive: NaiveDateTime) -> Self {
        Self::Floating(naive)
    }
}

impl From<DateTime<FixedOffset>> for EventTime {
    fn from(dt: DateTime<FixedOffset>) -> Self {
        Self::Zoned(dt)
    }
}

impl From<DateTime<Utc>> for EventTime {
    fn from(dt: DateTime<Utc>) -> Self {
        Self::Zoned(dt.fixed_offset())
    }
}

impl From<DateTime<Tz>> for EventTime {
    fn from(dt: DateTime<Tz>) -> Self {
        Self::Zoned(dt.fixed_offset())
    }
}

/// Looks up an IANA zone name.
pub fn resolve_zone(name: &str) -> CalendarResult<Tz> {
    name.parse::<Tz>()
        .map_err(|_| CalendarError::UnknownTimeZone(name.to_string()))
}

/// Attaches `zone` to a wall-clock time.
pub fn localize(naive: NaiveDateTime, zone: &str) -> CalendarResult<DateTime<FixedOffset>> {
    let tz = resolve_zone(zone)?;
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Ok(dt.fixed_offset()),
        LocalResult::Ambiguous(a, b) => Ok(a.min(b).fixed_offset()),
        LocalResult::None => Err(CalendarError::NonexistentLocalTime {
            time: naive.format(ISO_LOCAL_FORMAT).to_string(),
            zone: zone.to_string(),
        }),
    }
}

/// The host's IANA zone name, or `"UTC"` when it cannot be determined.
pub fn local_zone_name() -> String {
    match iana_time_zone::get_timezone() {
        Ok(name) => name,
        Err(e) => {
            debug!("could not determine local time zone, using UTC: {}", e);
            "UTC".to_string()
        }
    }
}

/// Parses a wire `date` value (`YYYY-MM-DD`).
pub fn parse_wire_date(value: &str) -> CalendarResult<NaiveDate> {
    NaiveDate::parse_from_str(value, ISO_DATE_FORMAT).map_err(|e| {
        CalendarError::validation("date", format!("'{}' is not a YYYY-MM-DD date: {}", value, e))
    })
}

/// Parses a wire `dateTime` value.
///
/// RFC 3339 strings keep their own offset. Strings without an offset are
/// localized into `zone` when one is given and left floating otherwise.
pub fn parse_wire_datetime(value: &str, zone: Option<&str>) -> CalendarResult<EventTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(EventTime::Zoned(dt));
    }
    let naive = NaiveDateTime::parse_from_str(value, ISO_LOCAL_FORMAT).map_err(|e| {
        CalendarError::validation("dateTime", format!("'{}' is not an ISO datetime: {}", value, e))
    })?;
    match zone {
        Some(zone) => localize(naive, zone).map(EventTime::Zoned),
        None => Ok(EventTime::Floating(naive)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn naive(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        date(y, m, d).and_hms_opt(h, min, s).unwrap()
    }

    fn offset(hours: i32) -> FixedOffset {
        FixedOffset::east_opt(hours * 3600).unwrap()
    }

    mod ensure_zoned {
        use super::*;

        #[test]
        fn date_is_unchanged() {
            let d = EventTime::from_date(date(2019, 9, 28));
            assert_eq!(d.ensure_zoned("Europe/Prague").unwrap(), d);
        }

        #[test]
        fn floating_keeps_wall_clock() {
            let t = EventTime::from_naive(naive(2019, 10, 28, 11, 22, 33));
            let zoned = t.ensure_zoned("Pacific/Auckland").unwrap();
            assert_eq!(zoned.to_wire_string(), "2019-10-28T11:22:33+13:00");
        }

        #[test]
        fn zoned_is_unchanged() {
            let dt = offset(2).with_ymd_and_hms(2020, 6, 15, 10, 30, 0).unwrap();
            let t = EventTime::Zoned(dt);
            assert_eq!(t.ensure_zoned("Asia/Tokyo").unwrap(), t);
        }

        #[test]
        fn unknown_zone_fails() {
            let t = EventTime::from_naive(naive(2020, 1, 1, 0, 0, 0));
            assert_eq!(
                t.ensure_zoned("Mars/Olympus"),
                Err(CalendarError::UnknownTimeZone("Mars/Olympus".into()))
            );
        }

        #[test]
        fn fold_takes_earlier_instant() {
            // 02:30 happens twice in Prague on 2020-10-25.
            let t = EventTime::from_naive(naive(2020, 10, 25, 2, 30, 0));
            let zoned = t.ensure_zoned("Europe/Prague").unwrap();
            assert_eq!(zoned.to_wire_string(), "2020-10-25T02:30:00+02:00");
        }

        #[test]
        fn gap_is_an_error() {
            let t = EventTime::from_naive(naive(2020, 3, 29, 2, 30, 0));
            assert!(matches!(
                t.ensure_zoned("Europe/Prague"),
                Err(CalendarError::NonexistentLocalTime { .. })
            ));
        }
    }

    mod wire_strings {
        use super::*;

        #[test]
        fn date_renders_iso() {
            assert_eq!(EventTime::from_date(date(2019, 9, 28)).to_wire_string(), "2019-09-28");
        }

        #[test]
        fn utc_instant_has_numeric_offset() {
            let t: EventTime = Utc.with_ymd_and_hms(2020, 6, 15, 10, 0, 0).unwrap().into();
            assert_eq!(t.to_wire_string(), "2020-06-15T10:00:00+00:00");
        }

        #[test]
        fn floating_has_no_offset() {
            let t = EventTime::from_naive(naive(2020, 6, 15, 10, 0, 0));
            assert_eq!(t.to_wire_string(), "2020-06-15T10:00:00");
        }

        #[test]
        fn zone_id_stamp_converts_zoned_values() {
            let t: EventTime = Utc.with_ymd_and_hms(2020, 6, 15, 8, 30, 0).unwrap().into();
            let (stamp, zone) = t.to_wire_string_with_zone_id("Europe/Prague").unwrap();
            assert_eq!(stamp, "20200615T103000");
            assert_eq!(zone, "Europe/Prague");
        }

        #[test]
        fn zone_id_stamp_puts_dates_at_midnight() {
            let (stamp, _) = EventTime::from_date(date(2020, 7, 17))
                .to_wire_string_with_zone_id("Europe/Prague")
                .unwrap();
            assert_eq!(stamp, "20200717T000000");
        }

        #[test]
        fn utc_stamp_without_zone_reads_floating_as_utc() {
            let t = EventTime::from_naive(naive(2020, 6, 14, 15, 49, 0));
            assert_eq!(t.to_utc_stamp(None).unwrap(), "20200614T154900Z");
        }

        #[test]
        fn utc_stamp_with_zone_localizes_first() {
            let t = EventTime::from_naive(naive(2020, 6, 15, 2, 0, 0));
            assert_eq!(t.to_utc_stamp(Some("Europe/Prague")).unwrap(), "20200615T000000Z");
        }
    }

    mod default_end {
        use super::*;

        #[test]
        fn all_day_adds_one_day() {
            let end = EventTime::from_date(date(2019, 9, 28)).default_end().unwrap();
            assert_eq!(end, EventTime::from_date(date(2019, 9, 29)));
        }

        #[test]
        fn instant_adds_one_hour() {
            let start = EventTime::Zoned(offset(2).with_ymd_and_hms(2020, 6, 15, 23, 30, 0).unwrap());
            assert_eq!(start.default_end().unwrap().to_wire_string(), "2020-06-16T00:30:00+02:00");
        }

        #[test]
        fn end_of_range_fails() {
            let err = EventTime::from_date(NaiveDate::MAX).default_end().unwrap_err();
            assert_eq!(err.field(), Some("end"));
            let err = EventTime::from_naive(NaiveDateTime::MAX).default_end().unwrap_err();
            assert_eq!(err.field(), Some("end"));
        }
    }

    mod parsing {
        use super::*;

        #[test]
        fn rfc3339_keeps_offset() {
            let t = parse_wire_datetime("2019-10-28T11:22:33+13:00", Some("UTC")).unwrap();
            assert_eq!(t.to_wire_string(), "2019-10-28T11:22:33+13:00");
        }

        #[test]
        fn naive_is_localized_into_zone() {
            let t = parse_wire_datetime("2020-06-15T10:00:00", Some("Europe/Prague")).unwrap();
            assert_eq!(t.to_wire_string(), "2020-06-15T10:00:00+02:00");
        }

        #[test]
        fn naive_without_zone_stays_floating() {
            let t = parse_wire_datetime("2020-06-15T10:00:00", None).unwrap();
            assert_eq!(t, EventTime::from_naive(naive(2020, 6, 15, 10, 0, 0)));
        }

        #[test]
        fn garbage_is_rejected() {
            assert!(parse_wire_datetime("tomorrow", None).unwrap_err().is_validation());
            assert!(parse_wire_date("2020-13-01").unwrap_err().is_validation());
        }
    }

    #[test]
    fn local_zone_name_is_resolvable_or_utc() {
        let name = local_zone_name();
        assert!(!name.is_empty());
    }
}
