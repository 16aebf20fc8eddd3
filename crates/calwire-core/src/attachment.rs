//! File attachments on events.

use tracing::warn;

use crate::error::{CalendarError, CalendarResult};

/// MIME types the calendar service renders natively.
pub const SUPPORTED_MIME_TYPES: [&str; 16] = [
    "application/vnd.google-apps.audio",
    "application/vnd.google-apps.document",
    "application/vnd.google-apps.drawing",
    "application/vnd.google-apps.file",
    "application/vnd.google-apps.folder",
    "application/vnd.google-apps.form",
    "application/vnd.google-apps.fusiontable",
    "application/vnd.google-apps.map",
    "application/vnd.google-apps.photo",
    "application/vnd.google-apps.presentation",
    "application/vnd.google-apps.script",
    "application/vnd.google-apps.site",
    "application/vnd.google-apps.spreadsheet",
    "application/vnd.google-apps.unknown",
    "application/vnd.google-apps.video",
    "application/vnd.google-apps.drive-sdk",
];

/// Returns `true` if `mime_type` is on the supported list.
pub fn is_supported_mime_type(mime_type: &str) -> bool {
    SUPPORTED_MIME_TYPES.contains(&mime_type)
}

/// A file attached to an event.
///
/// Unsupported MIME types are accepted and logged; callers that need them
/// rejected use [`Attachment::check_mime_type`] in strict mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub file_url: String,
    pub title: Option<String>,
    pub mime_type: Option<String>,
    /// Read-only; set by the service.
    pub icon_link: Option<String>,
    /// Read-only; set by the service.
    pub file_id: Option<String>,
}

impl Attachment {
    pub fn new(file_url: impl Into<String>) -> Self {
        Self {
            file_url: file_url.into(),
            title: None,
            mime_type: None,
            icon_link: None,
            file_id: None,
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        let mime_type = mime_type.into();
        if !is_supported_mime_type(&mime_type) {
            warn!(
                file_url = %self.file_url,
                "unsupported attachment mime type {}",
                mime_type
            );
        }
        self.mime_type = Some(mime_type);
        self
    }

    #[must_use]
    pub fn with_icon_link(mut self, icon_link: impl Into<String>) -> Self {
        self.icon_link = Some(icon_link.into());
        self
    }

    #[must_use]
    pub fn with_file_id(mut self, file_id: impl Into<String>) -> Self {
        self.file_id = Some(file_id.into());
        self
    }

    /// `true` when no MIME type is set or the set one is supported.
    pub fn has_supported_mime_type(&self) -> bool {
        self.mime_type.as_deref().is_none_or(is_supported_mime_type)
    }

    /// In strict mode, fails for unsupported MIME types.
    pub fn check_mime_type(&self, strict: bool) -> CalendarResult<()> {
        if strict && !self.has_supported_mime_type() {
            return Err(CalendarError::validation(
                "mime_type",
                format!(
                    "'{}' is not a supported attachment type",
                    self.mime_type.as_deref().unwrap_or_default()
                ),
            ));
        }
        Ok(())
    }
}
