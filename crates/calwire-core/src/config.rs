//! Codec configuration.
//!
//! Settings live in a small TOML file:
//!
//! ```toml
//! default_timezone = "Europe/Prague"
//! week_start = "monday"
//! strict_mime_types = true
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CalendarError, CalendarResult};
use crate::recurrence::{RecurrenceKind, RecurrenceRule, Weekday, build_rule_with_week_start};
use crate::time::{local_zone_name, resolve_zone};

/// Defaults applied while encoding and decoding calendar values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Zone for naive instants and for decoded instants missing `timeZone`.
    /// The host zone is used when unset.
    pub default_timezone: Option<String>,

    /// Week start for rules that do not set one.
    pub week_start: Weekday,

    /// Reject attachments with unsupported MIME types instead of logging them.
    pub strict_mime_types: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            default_timezone: None,
            week_start: Weekday::Sunday,
            strict_mime_types: false,
        }
    }
}

impl CodecConfig {
    /// Parses a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> CalendarResult<Self> {
        let config: Self = toml::from_str(text)
            .map_err(|e| CalendarError::Config(format!("failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a configuration file.
    pub fn load_from(path: &Path) -> CalendarResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CalendarError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    fn validate(&self) -> CalendarResult<()> {
        if let Some(zone) = &self.default_timezone {
            resolve_zone(zone)?;
        }
        Ok(())
    }

    #[must_use]
    pub fn with_default_timezone(mut self, zone: impl Into<String>) -> Self {
        self.default_timezone = Some(zone.into());
        self
    }

    #[must_use]
    pub fn with_week_start(mut self, day: Weekday) -> Self {
        self.week_start = day;
        self
    }

    #[must_use]
    pub fn with_strict_mime_types(mut self, strict: bool) -> Self {
        self.strict_mime_types = strict;
        self
    }

    /// The configured zone, or the host zone.
    pub fn resolved_timezone(&self) -> String {
        self.default_timezone.clone().unwrap_or_else(local_zone_name)
    }

    /// Builds a rule line using the configured week start as default.
    pub fn build_rule(&self, kind: RecurrenceKind, rule: &RecurrenceRule) -> CalendarResult<String> {
        build_rule_with_week_start(kind, rule, self.week_start)
    }
}
