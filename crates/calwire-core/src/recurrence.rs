//! Recurrence rule encoding (RFC 5545 `RRULE`, `EXRULE`, `RDATE`, `EXDATE`).
//!
//! Builders validate their input completely before producing a string; a
//! rule with any out-of-range part yields an error and no output.
//!
//! ```ignore
//! use calwire_core::recurrence::{Frequency, Recurrence, RecurrenceRule, Weekday};
//!
//! let rule = RecurrenceRule::new(Frequency::Monthly)
//!     .with_by_week_day(Weekday::Thursday.nth(-1))
//!     .with_count(6);
//! assert_eq!(
//!     Recurrence::rule(&rule)?,
//!     "RRULE:FREQ=MONTHLY;COUNT=6;BYDAY=-1TH;WKST=SU"
//! );
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CalendarError, CalendarResult};
use crate::time::EventTime;

/// How often a rule repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Frequency {
    Secondly,
    Minutely,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    /// The `FREQ=` token.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Secondly => "SECONDLY",
            Self::Minutely => "MINUTELY",
            Self::Hourly => "HOURLY",
            Self::Daily => "DAILY",
            Self::Weekly => "WEEKLY",
            Self::Monthly => "MONTHLY",
            Self::Yearly => "YEARLY",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = CalendarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SECONDLY" => Ok(Self::Secondly),
            "MINUTELY" => Ok(Self::Minutely),
            "HOURLY" => Ok(Self::Hourly),
            "DAILY" => Ok(Self::Daily),
            "WEEKLY" => Ok(Self::Weekly),
            "MONTHLY" => Ok(Self::Monthly),
            "YEARLY" => Ok(Self::Yearly),
            other => Err(CalendarError::validation(
                "freq",
                format!(
                    "must be one of SECONDLY, MINUTELY, HOURLY, DAILY, WEEKLY, MONTHLY or YEARLY, got '{}'",
                    other
                ),
            )),
        }
    }
}

/// Day of the week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Weekday {
    /// Two-letter RFC 5545 code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Sunday => "SU",
            Self::Monday => "MO",
            Self::Tuesday => "TU",
            Self::Wednesday => "WE",
            Self::Thursday => "TH",
            Self::Friday => "FR",
            Self::Saturday => "SA",
        }
    }

    /// The `n`th occurrence of this weekday within the period (negative
    /// counts from the end). Checked when the rule is built.
    pub fn nth(self, n: i32) -> WeekdayToken {
        WeekdayToken {
            day: self,
            ordinal: Some(n),
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A weekday, optionally qualified by an occurrence ordinal (`4SU`, `-1SA`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WeekdayToken {
    pub day: Weekday,
    pub ordinal: Option<i32>,
}

impl WeekdayToken {
    fn validate(&self, field: &str) -> CalendarResult<()> {
        match self.ordinal {
            Some(n) if n == 0 || !(-53..=53).contains(&n) => Err(CalendarError::validation(
                field,
                format!("weekday ordinal must be in -53..=53 and nonzero, got {}", n),
            )),
            _ => Ok(()),
        }
    }
}

impl From<Weekday> for WeekdayToken {
    fn from(day: Weekday) -> Self {
        Self { day, ordinal: None }
    }
}

impl fmt::Display for WeekdayToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ordinal {
            Some(n) => write!(f, "{}{}", n, self.day.code()),
            None => f.write_str(self.day.code()),
        }
    }
}

/// A `BY*` value given either as a single item or as a list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OneOrMany<T>(Vec<T>);

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        self.0
    }
}

impl From<i32> for OneOrMany<i32> {
    fn from(value: i32) -> Self {
        Self(vec![value])
    }
}

impl From<WeekdayToken> for OneOrMany<WeekdayToken> {
    fn from(value: WeekdayToken) -> Self {
        Self(vec![value])
    }
}

impl From<Weekday> for OneOrMany<WeekdayToken> {
    fn from(value: Weekday) -> Self {
        Self(vec![value.into()])
    }
}

impl From<Vec<Weekday>> for OneOrMany<WeekdayToken> {
    fn from(values: Vec<Weekday>) -> Self {
        Self(values.into_iter().map(WeekdayToken::from).collect())
    }
}

impl<const N: usize> From<[Weekday; N]> for OneOrMany<WeekdayToken> {
    fn from(values: [Weekday; N]) -> Self {
        Self(values.into_iter().map(WeekdayToken::from).collect())
    }
}

impl<T> From<Vec<T>> for OneOrMany<T> {
    fn from(values: Vec<T>) -> Self {
        Self(values)
    }
}

impl<T, const N: usize> From<[T; N]> for OneOrMany<T> {
    fn from(values: [T; N]) -> Self {
        Self(values.into())
    }
}

/// Whether a builder produces an inclusion (`RRULE`/`RDATE`) or an
/// exclusion (`EXRULE`/`EXDATE`) line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecurrenceKind {
    Inclusion,
    Exclusion,
}

impl RecurrenceKind {
    fn rule_prefix(&self) -> &'static str {
        match self {
            Self::Inclusion => "RRULE",
            Self::Exclusion => "EXRULE",
        }
    }

    fn date_prefix(&self) -> &'static str {
        match self {
            Self::Inclusion => "RDATE",
            Self::Exclusion => "EXDATE",
        }
    }
}

/// A structured recurrence rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurrenceRule {
    pub freq: Frequency,
    pub interval: Option<u32>,
    pub count: Option<u32>,
    pub until: Option<EventTime>,
    pub by_second: Vec<i32>,
    pub by_minute: Vec<i32>,
    pub by_hour: Vec<i32>,
    pub by_week_day: Vec<WeekdayToken>,
    pub by_month_day: Vec<i32>,
    pub by_year_day: Vec<i32>,
    pub by_week_number: Vec<i32>,
    pub by_month: Vec<i32>,
    pub by_set_pos: Vec<i32>,
    /// Falls back to the builder's default (Sunday) when unset.
    pub week_start: Option<WeekdayToken>,
}

impl Default for RecurrenceRule {
    fn default() -> Self {
        Self::new(Frequency::Daily)
    }
}

impl RecurrenceRule {
    /// Creates a rule with only a frequency.
    pub fn new(freq: Frequency) -> Self {
        Self {
            freq,
            interval: None,
            count: None,
            until: None,
            by_second: Vec::new(),
            by_minute: Vec::new(),
            by_hour: Vec::new(),
            by_week_day: Vec::new(),
            by_month_day: Vec::new(),
            by_year_day: Vec::new(),
            by_week_number: Vec::new(),
            by_month: Vec::new(),
            by_set_pos: Vec::new(),
            week_start: None,
        }
    }

    #[must_use]
    pub fn with_interval(mut self, interval: u32) -> Self {
        self.interval = Some(interval);
        self
    }

    #[must_use]
    pub fn with_count(mut self, count: u32) -> Self {
        self.count = Some(count);
        self
    }

    #[must_use]
    pub fn with_until(mut self, until: impl Into<EventTime>) -> Self {
        self.until = Some(until.into());
        self
    }

    #[must_use]
    pub fn with_by_second(mut self, values: impl Into<OneOrMany<i32>>) -> Self {
        self.by_second = values.into().into_vec();
        self
    }

    #[must_use]
    pub fn with_by_minute(mut self, values: impl Into<OneOrMany<i32>>) -> Self {
        self.by_minute = values.into().into_vec();
        self
    }

    #[must_use]
    pub fn with_by_hour(mut self, values: impl Into<OneOrMany<i32>>) -> Self {
        self.by_hour = values.into().into_vec();
        self
    }

    #[must_use]
    pub fn with_by_week_day(mut self, values: impl Into<OneOrMany<WeekdayToken>>) -> Self {
        self.by_week_day = values.into().into_vec();
        self
    }

    #[must_use]
    pub fn with_by_month_day(mut self, values: impl Into<OneOrMany<i32>>) -> Self {
        self.by_month_day = values.into().into_vec();
        self
    }

    #[must_use]
    pub fn with_by_year_day(mut self, values: impl Into<OneOrMany<i32>>) -> Self {
        self.by_year_day = values.into().into_vec();
        self
    }

    #[must_use]
    pub fn with_by_week_number(mut self, values: impl Into<OneOrMany<i32>>) -> Self {
        self.by_week_number = values.into().into_vec();
        self
    }

    #[must_use]
    pub fn with_by_month(mut self, values: impl Into<OneOrMany<i32>>) -> Self {
        self.by_month = values.into().into_vec();
        self
    }

    #[must_use]
    pub fn with_by_set_pos(mut self, values: impl Into<OneOrMany<i32>>) -> Self {
        self.by_set_pos = values.into().into_vec();
        self
    }

    #[must_use]
    pub fn with_week_start(mut self, day: impl Into<WeekdayToken>) -> Self {
        self.week_start = Some(day.into());
        self
    }

    /// Checks every field against its allowed range and the cross-field rules.
    pub fn validate(&self) -> CalendarResult<()> {
        if self.interval == Some(0) {
            return Err(CalendarError::validation("interval", "must be a positive integer"));
        }
        if self.count == Some(0) {
            return Err(CalendarError::validation("count", "must be a positive integer"));
        }
        if self.count.is_some() && self.until.is_some() {
            return Err(CalendarError::validation(
                "count",
                "\"count\" and \"until\" may not both be set",
            ));
        }

        check_range("by_second", &self.by_second, 0, 60, false)?;
        check_range("by_minute", &self.by_minute, 0, 59, false)?;
        check_range("by_hour", &self.by_hour, 0, 23, false)?;
        for token in &self.by_week_day {
            token.validate("by_week_day")?;
        }
        check_range("by_month_day", &self.by_month_day, -31, 31, true)?;
        check_range("by_year_day", &self.by_year_day, -366, 366, true)?;
        check_range("by_week_number", &self.by_week_number, -53, 53, true)?;
        check_range("by_month", &self.by_month, 1, 12, false)?;
        check_range("by_set_pos", &self.by_set_pos, -366, 366, true)?;

        if !self.by_set_pos.is_empty() && !self.has_other_by_part() {
            return Err(CalendarError::validation(
                "by_set_pos",
                "can only be used together with another by_* part",
            ));
        }

        if let Some(start) = &self.week_start {
            if start.ordinal.is_some() {
                return Err(CalendarError::validation(
                    "week_start",
                    format!("must be a plain weekday, got '{}'", start),
                ));
            }
        }
        Ok(())
    }

    fn has_other_by_part(&self) -> bool {
        !(self.by_second.is_empty()
            && self.by_minute.is_empty()
            && self.by_hour.is_empty()
            && self.by_week_day.is_empty()
            && self.by_month_day.is_empty()
            && self.by_year_day.is_empty()
            && self.by_week_number.is_empty()
            && self.by_month.is_empty())
    }

    /// Renders the rule body (`FREQ=...;WKST=..`) after validating it.
    pub fn to_rule_string(&self, default_week_start: Weekday) -> CalendarResult<String> {
        self.validate()?;

        let mut parts = vec![format!("FREQ={}", self.freq)];
        if let Some(interval) = self.interval {
            parts.push(format!("INTERVAL={}", interval));
        }
        if let Some(count) = self.count {
            parts.push(format!("COUNT={}", count));
        }
        if let Some(until) = &self.until {
            parts.push(format!("UNTIL={}", until.to_utc_stamp(None)?));
        }
        push_list(&mut parts, "BYSECOND", &self.by_second);
        push_list(&mut parts, "BYMINUTE", &self.by_minute);
        push_list(&mut parts, "BYHOUR", &self.by_hour);
        push_list(&mut parts, "BYDAY", &self.by_week_day);
        push_list(&mut parts, "BYMONTHDAY", &self.by_month_day);
        push_list(&mut parts, "BYYEARDAY", &self.by_year_day);
        push_list(&mut parts, "BYWEEKNO", &self.by_week_number);
        push_list(&mut parts, "BYMONTH", &self.by_month);
        push_list(&mut parts, "BYSETPOS", &self.by_set_pos);
        let week_start = self
            .week_start
            .map(|t| t.day)
            .unwrap_or(default_week_start);
        parts.push(format!("WKST={}", week_start));

        Ok(parts.join(";"))
    }
}

fn check_range(field: &str, values: &[i32], low: i32, high: i32, nonzero: bool) -> CalendarResult<()> {
    for &v in values {
        if !(low..=high).contains(&v) || (nonzero && v == 0) {
            let qualifier = if nonzero { " and nonzero" } else { "" };
            return Err(CalendarError::validation(
                field,
                format!("values must be in range {}..={}{}, got {}", low, high, qualifier, v),
            ));
        }
    }
    Ok(())
}

fn push_list<T: fmt::Display>(parts: &mut Vec<String>, key: &str, values: &[T]) {
    if values.is_empty() {
        return;
    }
    let joined = values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",");
    parts.push(format!("{}={}", key, joined));
}

/// An RFC 5545 duration (`P1W2DT3H4M5S`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PeriodDuration {
    pub weeks: u32,
    pub days: u32,
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
}

impl PeriodDuration {
    pub fn new(weeks: u32, days: u32, hours: u32, minutes: u32, seconds: u32) -> Self {
        Self {
            weeks,
            days,
            hours,
            minutes,
            seconds,
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

impl fmt::Display for PeriodDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("P")?;
        if self.weeks > 0 {
            write!(f, "{}W", self.weeks)?;
        }
        if self.days > 0 {
            write!(f, "{}D", self.days)?;
        }
        if self.hours > 0 || self.minutes > 0 || self.seconds > 0 {
            f.write_str("T")?;
        }
        if self.hours > 0 {
            write!(f, "{}H", self.hours)?;
        }
        if self.minutes > 0 {
            write!(f, "{}M", self.minutes)?;
        }
        if self.seconds > 0 {
            write!(f, "{}S", self.seconds)?;
        }
        Ok(())
    }
}

/// The end of a [`Period`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodEnd {
    At(EventTime),
    After(PeriodDuration),
}

/// A span of time given by a start and either an end or a duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    pub start: EventTime,
    pub end: PeriodEnd,
}

impl Period {
    pub fn between(start: impl Into<EventTime>, end: impl Into<EventTime>) -> Self {
        Self {
            start: start.into(),
            end: PeriodEnd::At(end.into()),
        }
    }

    pub fn lasting(start: impl Into<EventTime>, duration: PeriodDuration) -> Self {
        Self {
            start: start.into(),
            end: PeriodEnd::After(duration),
        }
    }

    fn render(&self, zone: &str) -> CalendarResult<String> {
        let start = self.start.to_utc(Some(zone))?;
        let end = match &self.end {
            PeriodEnd::At(end) => {
                let end = end.to_utc(Some(zone))?;
                if end < start {
                    return Err(CalendarError::validation(
                        "periods",
                        "period end precedes its start",
                    ));
                }
                end.format("%Y%m%dT%H%M%SZ").to_string()
            }
            PeriodEnd::After(duration) => {
                if duration.is_zero() {
                    return Err(CalendarError::validation(
                        "periods",
                        "period duration must not be zero",
                    ));
                }
                duration.to_string()
            }
        };
        Ok(format!("{}/{}", start.format("%Y%m%dT%H%M%SZ"), end))
    }
}

fn require_non_empty<T>(field: &str, values: &[T]) -> CalendarResult<()> {
    if values.is_empty() {
        return Err(CalendarError::validation(field, "at least one value is required"));
    }
    Ok(())
}

/// Builds an `RRULE:`/`EXRULE:` line, defaulting `WKST` to Sunday.
pub fn build_rule(kind: RecurrenceKind, rule: &RecurrenceRule) -> CalendarResult<String> {
    build_rule_with_week_start(kind, rule, Weekday::Sunday)
}

/// Builds an `RRULE:`/`EXRULE:` line with an explicit default week start.
pub fn build_rule_with_week_start(
    kind: RecurrenceKind,
    rule: &RecurrenceRule,
    default_week_start: Weekday,
) -> CalendarResult<String> {
    Ok(format!(
        "{}:{}",
        kind.rule_prefix(),
        rule.to_rule_string(default_week_start)?
    ))
}

/// Builds an `RDATE;VALUE=DATE:`/`EXDATE;VALUE=DATE:` line. Instants are
/// truncated to their own calendar date.
pub fn build_dates(kind: RecurrenceKind, dates: &[EventTime]) -> CalendarResult<String> {
    require_non_empty("dates", dates)?;
    let rendered = dates
        .iter()
        .map(|d| d.date().format("%Y%m%d").to_string())
        .collect::<Vec<_>>()
        .join(",");
    Ok(format!("{};VALUE=DATE:{}", kind.date_prefix(), rendered))
}

/// Builds an `RDATE;TZID=<zone>:`/`EXDATE;TZID=<zone>:` line with every
/// value rendered on the wall clock of `zone`.
pub fn build_times(kind: RecurrenceKind, times: &[EventTime], zone: &str) -> CalendarResult<String> {
    require_non_empty("times", times)?;
    let rendered = times
        .iter()
        .map(|t| t.to_wire_string_with_zone_id(zone).map(|(stamp, _)| stamp))
        .collect::<CalendarResult<Vec<_>>>()?
        .join(",");
    Ok(format!("{};TZID={}:{}", kind.date_prefix(), zone, rendered))
}

/// Builds an `RDATE;VALUE=PERIOD:`/`EXDATE;VALUE=PERIOD:` line. Period
/// boundaries are localized into `zone` and written in UTC.
pub fn build_periods(kind: RecurrenceKind, periods: &[Period], zone: &str) -> CalendarResult<String> {
    require_non_empty("periods", periods)?;
    let rendered = periods
        .iter()
        .map(|p| p.render(zone))
        .collect::<CalendarResult<Vec<_>>>()?
        .join(",");
    Ok(format!("{};VALUE=PERIOD:{}", kind.date_prefix(), rendered))
}

/// Named inclusion and exclusion builders.
pub struct Recurrence;

impl Recurrence {
    pub fn rule(rule: &RecurrenceRule) -> CalendarResult<String> {
        build_rule(RecurrenceKind::Inclusion, rule)
    }

    pub fn exclude_rule(rule: &RecurrenceRule) -> CalendarResult<String> {
        build_rule(RecurrenceKind::Exclusion, rule)
    }

    pub fn dates(dates: &[EventTime]) -> CalendarResult<String> {
        build_dates(RecurrenceKind::Inclusion, dates)
    }

    pub fn exclude_dates(dates: &[EventTime]) -> CalendarResult<String> {
        build_dates(RecurrenceKind::Exclusion, dates)
    }

    pub fn times(times: &[EventTime], zone: &str) -> CalendarResult<String> {
        build_times(RecurrenceKind::Inclusion, times, zone)
    }

    pub fn exclude_times(times: &[EventTime], zone: &str) -> CalendarResult<String> {
        build_times(RecurrenceKind::Exclusion, times, zone)
    }

    pub fn periods(periods: &[Period], zone: &str) -> CalendarResult<String> {
        build_periods(RecurrenceKind::Inclusion, periods, zone)
    }

    pub fn exclude_periods(periods: &[Period], zone: &str) -> CalendarResult<String> {
        build_periods(RecurrenceKind::Exclusion, periods, zone)
    }
}
