//! The user's calendar settings.

use crate::error::{CalendarError, CalendarResult};

/// Settings the user can change from the calendar UI.
///
/// Settings are read-only through the service; the defaults mirror what it
/// reports for a fresh account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub auto_add_hangouts: bool,
    /// Order of day, month and year when displaying dates, e.g. `MDY`.
    pub date_field_order: String,
    /// Length in minutes of events created without an explicit duration.
    pub default_event_length: u32,
    pub format_24_hour_time: bool,
    pub hide_invitations: bool,
    pub hide_weekends: bool,
    pub locale: String,
    pub remind_on_responded_events_only: bool,
    pub show_declined_events: bool,
    pub timezone: String,
    pub use_keyboard_shortcuts: bool,
    week_start: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            auto_add_hangouts: false,
            date_field_order: "MDY".to_string(),
            default_event_length: 60,
            format_24_hour_time: false,
            hide_invitations: false,
            hide_weekends: false,
            locale: "en".to_string(),
            remind_on_responded_events_only: false,
            show_declined_events: true,
            timezone: "Etc/GMT".to_string(),
            use_keyboard_shortcuts: true,
            week_start: 0,
        }
    }
}

impl Settings {
    /// First day of the week: 0 for Sunday, 1 for Monday, 6 for Saturday.
    pub fn week_start(&self) -> u32 {
        self.week_start
    }

    pub fn with_week_start(mut self, week_start: u32) -> CalendarResult<Self> {
        if !matches!(week_start, 0 | 1 | 6) {
            return Err(CalendarError::validation(
                "week_start",
                format!("must be 0 (Sunday), 1 (Monday) or 6 (Saturday), got {}", week_start),
            ));
        }
        self.week_start = week_start;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let settings = Settings::default();
        assert_eq!(settings.default_event_length, 60);
        assert_eq!(settings.week_start(), 0);
        assert!(settings.show_declined_events);
        assert_eq!(settings.timezone, "Etc/GMT");
    }

    #[test]
    fn week_start_values() {
        assert_eq!(Settings::default().with_week_start(6).unwrap().week_start(), 6);
        let err = Settings::default().with_week_start(3).unwrap_err();
        assert_eq!(err.field(), Some("week_start"));
    }
}
