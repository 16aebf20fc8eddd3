//! Attachment wire format.

use calwire_core::{Attachment, CodecConfig};
use serde_json::json;

use crate::contract::{Fields, Serializer, WireObject, wire_object};
use crate::error::ProtocolResult;

pub struct AttachmentSerializer;

impl Serializer for AttachmentSerializer {
    type Target = Attachment;
    const TYPE_NAME: &'static str = "Attachment";
    const PARAM_NAME: &'static str = "attachment";

    fn to_json(attachment: &Attachment) -> ProtocolResult<WireObject> {
        Ok(wire_object([
            ("fileUrl", json!(attachment.file_url)),
            ("title", json!(attachment.title)),
            ("mimeType", json!(attachment.mime_type)),
            ("iconLink", json!(attachment.icon_link)),
            ("fileId", json!(attachment.file_id)),
        ]))
    }

    /// Unsupported MIME types are logged, or rejected when
    /// `strict_mime_types` is set.
    fn to_object_with(json: &WireObject, config: &CodecConfig) -> ProtocolResult<Attachment> {
        let f = Fields::new(Self::TYPE_NAME, json);
        let mut attachment = Attachment::new(f.require_str("fileUrl")?);
        attachment.title = f.str("title")?;
        if let Some(mime_type) = f.str("mimeType")? {
            attachment = attachment.with_mime_type(mime_type);
        }
        attachment.icon_link = f.str("iconLink")?;
        attachment.file_id = f.str("fileId")?;
        attachment.check_mime_type(config.strict_mime_types)?;
        Ok(attachment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProtocolError;
    use serde_json::Value;

    #[test]
    fn encode_omits_unset_fields() {
        let attachment = Attachment::new("https://docs.example.com/d/1").with_title("Agenda");
        let json = AttachmentSerializer::encode(&attachment).unwrap();
        assert_eq!(
            Value::Object(json),
            json!({"fileUrl": "https://docs.example.com/d/1", "title": "Agenda"})
        );
    }

    #[test]
    fn decode_reads_read_only_fields() {
        let attachment = AttachmentSerializer::decode(json!({
            "fileUrl": "https://docs.example.com/d/1",
            "mimeType": "application/vnd.google-apps.document",
            "iconLink": "https://icons.example.com/doc.png",
            "fileId": "abc123",
        }))
        .unwrap();
        assert_eq!(attachment.file_id.as_deref(), Some("abc123"));
        assert!(attachment.has_supported_mime_type());
    }

    #[test]
    fn missing_file_url() {
        let err = AttachmentSerializer::decode(json!({"title": "x"})).unwrap_err();
        assert!(matches!(err, ProtocolError::MissingField { field: "fileUrl", .. }));
    }

    mod mime_types {
        use super::*;

        fn pdf() -> Value {
            json!({"fileUrl": "https://example.com/a.pdf", "mimeType": "application/pdf"})
        }

        #[test]
        fn lenient_by_default() {
            let attachment = AttachmentSerializer::decode(pdf()).unwrap();
            assert_eq!(attachment.mime_type.as_deref(), Some("application/pdf"));
        }

        #[test]
        fn strict_rejects_unsupported() {
            let config = CodecConfig::default().with_strict_mime_types(true);
            let err = AttachmentSerializer::decode_with(pdf(), &config).unwrap_err();
            assert_eq!(err.as_domain().and_then(|e| e.field()), Some("mime_type"));
        }
    }
}
