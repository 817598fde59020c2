//! Request and response types for the ZeptoMail API.
//!
//! Field names follow the provider's JSON contract. Optional request fields
//! are left out of the encoded body entirely when unset.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A mailbox: address plus optional display name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailAddress {
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl EmailAddress {
    /// An address without a display name.
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            name: None,
        }
    }

    /// Set the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// A recipient in `to`, `cc` or `bcc`.
///
/// `merge_info` holds per-recipient placeholder values for batch sends.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    pub email_address: EmailAddress,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub merge_info: BTreeMap<String, String>,
}

impl Recipient {
    /// A recipient with no merge values.
    pub fn new(email_address: EmailAddress) -> Self {
        Self {
            email_address,
            merge_info: BTreeMap::new(),
        }
    }

    /// Add one merge placeholder value for this recipient.
    pub fn merge(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.merge_info.insert(key.into(), value.into());
        self
    }
}

impl From<EmailAddress> for Recipient {
    fn from(email_address: EmailAddress) -> Self {
        Recipient::new(email_address)
    }
}

/// An attachment, either a file cache key from a previous upload or inline
/// base64 content with its MIME type and file name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_cache_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Attachment {
    /// Reference a file previously uploaded with
    /// [`EmailClient::file_cache_upload`](crate::EmailClient::file_cache_upload).
    pub fn from_cache_key(file_cache_key: impl Into<String>) -> Self {
        Self {
            file_cache_key: Some(file_cache_key.into()),
            ..Self::default()
        }
    }

    /// Carry already base64-encoded content in the request.
    pub fn from_base64(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            file_cache_key: None,
            content: Some(content.into()),
            mime_type: Some(mime_type.into()),
            name: Some(name.into()),
        }
    }
}

/// An image referenced from the HTML body through `cid:<cid>`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineImage {
    pub cid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_cache_key: Option<String>,
}

/// Body for [`EmailClient::send_email`](crate::EmailClient::send_email) and
/// [`EmailClient::send_batch_email`](crate::EmailClient::send_batch_email).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailRequest {
    pub from: EmailAddress,
    #[serde(default)]
    pub to: Vec<Recipient>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cc: Vec<Recipient>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bcc: Vec<Recipient>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reply_to: Vec<EmailAddress>,
    #[serde(default)]
    pub subject: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub htmlbody: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub textbody: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inline_images: Vec<InlineImage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounce_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track_clicks: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track_opens: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_reference: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub mime_headers: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub merge_info: BTreeMap<String, String>,
}

impl EmailRequest {
    /// Start a request with sender and subject; add recipients with [`EmailRequest::to`].
    pub fn new(from: EmailAddress, subject: impl Into<String>) -> Self {
        Self {
            from,
            subject: subject.into(),
            ..Self::default()
        }
    }

    /// Add a `to` recipient.
    pub fn to(mut self, recipient: impl Into<Recipient>) -> Self {
        self.to.push(recipient.into());
        self
    }

    /// Add a `cc` recipient.
    pub fn cc(mut self, recipient: impl Into<Recipient>) -> Self {
        self.cc.push(recipient.into());
        self
    }

    /// Add a `bcc` recipient.
    pub fn bcc(mut self, recipient: impl Into<Recipient>) -> Self {
        self.bcc.push(recipient.into());
        self
    }

    /// Add a reply-to address.
    pub fn reply_to(mut self, address: EmailAddress) -> Self {
        self.reply_to.push(address);
        self
    }

    /// Set the HTML body.
    pub fn html_body(mut self, html: impl Into<String>) -> Self {
        self.htmlbody = Some(html.into());
        self
    }

    /// Set the plain-text body.
    pub fn text_body(mut self, text: impl Into<String>) -> Self {
        self.textbody = Some(text.into());
        self
    }

    /// Add an attachment.
    pub fn attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    /// Add an image referenced from the HTML body by `cid`.
    pub fn inline_image(mut self, image: InlineImage) -> Self {
        self.inline_images.push(image);
        self
    }

    /// Turn click tracking on or off for this message.
    pub fn track_clicks(mut self, enabled: bool) -> Self {
        self.track_clicks = Some(enabled);
        self
    }

    /// Turn open tracking on or off for this message.
    pub fn track_opens(mut self, enabled: bool) -> Self {
        self.track_opens = Some(enabled);
        self
    }
}

/// Body for [`EmailClient::send_template_email`](crate::EmailClient::send_template_email)
/// and [`EmailClient::send_batch_template_email`](crate::EmailClient::send_batch_template_email).
///
/// Identify the template by `template_key` or `template_alias`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_alias: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounce_address: Option<String>,
    pub from: EmailAddress,
    #[serde(default)]
    pub to: Vec<Recipient>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cc: Vec<Recipient>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bcc: Vec<Recipient>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reply_to: Vec<EmailAddress>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub htmlbody: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub textbody: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inline_images: Vec<InlineImage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track_clicks: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track_opens: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_reference: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub mime_headers: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub merge_info: BTreeMap<String, String>,
}

impl TemplateRequest {
    /// Start a templated send using the template's key.
    pub fn with_key(template_key: impl Into<String>, from: EmailAddress) -> Self {
        Self {
            template_key: Some(template_key.into()),
            from,
            ..Self::default()
        }
    }

    /// Start a templated send using the template's alias.
    pub fn with_alias(template_alias: impl Into<String>, from: EmailAddress) -> Self {
        Self {
            template_alias: Some(template_alias.into()),
            from,
            ..Self::default()
        }
    }

    /// Add a `to` recipient.
    pub fn to(mut self, recipient: impl Into<Recipient>) -> Self {
        self.to.push(recipient.into());
        self
    }

    /// Set the address bounces are reported to.
    pub fn bounce_address(mut self, address: impl Into<String>) -> Self {
        self.bounce_address = Some(address.into());
        self
    }

    /// Add a message-wide merge value.
    pub fn merge(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.merge_info.insert(key.into(), value.into());
        self
    }
}

/// Body for creating or updating a template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTemplateRequest {
    pub template_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_alias: Option<String>,
    pub subject: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub htmlbody: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub textbody: Option<String>,
}

/// Create and update share one payload.
pub type UpdateTemplateRequest = CreateTemplateRequest;

/// Pagination for [`TemplatesClient::list_templates`](crate::TemplatesClient::list_templates).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListTemplatesParams {
    pub offset: u32,
    pub limit: u32,
}

impl Default for ListTemplatesParams {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 10,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdditionalInfo {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub code: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,
}

/// Per-message outcome inside a success response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseData {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub additional_info: Vec<AdditionalInfo>,
    #[serde(default)]
    pub message: String,
}

/// Response of the send endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuccessResponse {
    #[serde(default)]
    pub data: Vec<ResponseData>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub request_id: String,
    #[serde(default)]
    pub object: String,
}

/// Response of the file cache upload endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileUploadResponse {
    #[serde(default)]
    pub file_cache_key: String,
    #[serde(default)]
    pub data: Vec<ResponseData>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub object: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateAttachment {
    #[serde(default)]
    pub file_cache_key: String,
    #[serde(default)]
    pub content_type: String,
    #[serde(default)]
    pub file_name: String,
}

/// A stored template as returned by create, update and get.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateData {
    #[serde(default)]
    pub htmlbody: String,
    #[serde(default)]
    pub created_time: String,
    #[serde(default)]
    pub modified_time: String,
    #[serde(default)]
    pub template_name: String,
    #[serde(default)]
    pub template_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_alias: Option<String>,
    #[serde(default)]
    pub subject: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<TemplateAttachment>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub sample_merge_info: BTreeMap<String, String>,
}

/// Response of create and update template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTemplateResponse {
    #[serde(default)]
    pub data: Vec<TemplateData>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub object: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetTemplateResponse {
    #[serde(default)]
    pub data: TemplateData,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub object: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListTemplatesMetadata {
    #[serde(default)]
    pub offset: u32,
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub limit: u32,
}

/// Summary row of a template listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateListItem {
    #[serde(default)]
    pub created_time: String,
    #[serde(default)]
    pub template_name: String,
    #[serde(default)]
    pub template_key: String,
    #[serde(default)]
    pub modified_time: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_alias: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListTemplatesResponse {
    #[serde(default)]
    pub metadata: ListTemplatesMetadata,
    #[serde(default)]
    pub data: Vec<TemplateListItem>,
    #[serde(default)]
    pub message: String,
}

/// Error envelope: `{"error": {...}}`.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorResponse {
    #[serde(default)]
    pub error: ErrorBody,
}

/// Every field is optional so that `null`s from the provider do not push an
/// otherwise valid error body onto the fallback path.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub details: Option<Vec<crate::ErrorDetail>>,
    #[serde(default)]
    pub request_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    #[test]
    fn attachment_with_cache_key_only() {
        let encoded = serde_json::to_string(&Attachment::from_cache_key("abc-123")).unwrap();
        assert_eq!(encoded, r#"{"file_cache_key":"abc-123"}"#);
    }

    #[test]
    fn attachment_with_base64_content_omits_cache_key() {
        let value = serde_json::to_value(Attachment::from_base64(
            "hello.txt",
            "text/plain",
            "SGVsbG8=",
        ))
        .unwrap();
        assert_eq!(
            value,
            json!({"content": "SGVsbG8=", "mime_type": "text/plain", "name": "hello.txt"})
        );
    }

    #[test]
    fn inline_image_keeps_cid() {
        let image = InlineImage {
            cid: "logo".to_string(),
            file_cache_key: Some("fck-456".to_string()),
            ..InlineImage::default()
        };
        assert_eq!(
            serde_json::to_value(image).unwrap(),
            json!({"cid": "logo", "file_cache_key": "fck-456"})
        );
    }

    #[test]
    fn minimal_email_request_omits_optional_fields() {
        let request = EmailRequest::new(EmailAddress::new("a@b.com"), "hi")
            .to(EmailAddress::new("c@d.com"));
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "from": {"address": "a@b.com"},
                "to": [{"email_address": {"address": "c@d.com"}}],
                "subject": "hi"
            })
        );
    }

    #[test]
    fn explicit_false_tracking_is_sent() {
        let request = EmailRequest::new(EmailAddress::new("a@b.com"), "hi").track_opens(false);
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["track_opens"], Value::Bool(false));
        assert!(value.get("track_clicks").is_none());
    }

    #[test]
    fn full_email_request_survives_decode_and_reencode() {
        let document = json!({
            "from": {"address": "a@b.com", "name": "Sender"},
            "to": [{"email_address": {"address": "c@d.com", "name": "Paul"}, "merge_info": {"company": "Zylker"}}],
            "cc": [{"email_address": {"address": "cc@d.com"}}],
            "bcc": [{"email_address": {"address": "bcc@d.com"}}],
            "reply_to": [{"address": "reply@b.com"}],
            "subject": "Invoice",
            "htmlbody": "<b>hi</b>",
            "textbody": "hi",
            "attachments": [{"file_cache_key": "fck-1"}],
            "inline_images": [{"cid": "logo", "content": "iVBOR", "mime_type": "image/png"}],
            "bounce_address": "bounce@b.com",
            "track_clicks": true,
            "track_opens": false,
            "client_reference": "ref-1",
            "mime_headers": {"X-Test": "1"},
            "merge_info": {"contact": "98"}
        });
        let request: EmailRequest = serde_json::from_value(document.clone()).unwrap();
        assert_eq!(serde_json::to_value(&request).unwrap(), document);
    }

    #[test]
    fn template_request_omits_subject_when_unset() {
        let request = TemplateRequest::with_key("tpl-1", EmailAddress::new("a@b.com"))
            .to(EmailAddress::new("c@d.com"))
            .merge("meeting_link", "https://example.com");
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["template_key"], "tpl-1");
        assert_eq!(value["merge_info"]["meeting_link"], "https://example.com");
        assert!(value.get("subject").is_none());
        assert!(value.get("template_alias").is_none());
        assert!(value.get("bounce_address").is_none());
    }

    #[test]
    fn create_template_request_required_fields_always_present() {
        let value = serde_json::to_value(CreateTemplateRequest::default()).unwrap();
        assert_eq!(value, json!({"template_name": "", "subject": ""}));
    }

    #[test]
    fn success_response_tolerates_missing_fields() {
        let response: SuccessResponse =
            serde_json::from_str(r#"{"message":"OK","request_id":"req-1"}"#).unwrap();
        assert_eq!(response.request_id, "req-1");
        assert!(response.data.is_empty());
        assert!(response.object.is_empty());
    }

    #[test]
    fn list_templates_response_decodes() {
        let response: ListTemplatesResponse = serde_json::from_value(json!({
            "metadata": {"offset": 0, "count": 1, "limit": 10},
            "data": [{
                "created_time": "2024-01-01",
                "template_name": "Welcome",
                "template_key": "tpl-1",
                "modified_time": "2024-01-02",
                "subject": "Hi"
            }],
            "message": "OK"
        }))
        .unwrap();
        assert_eq!(response.metadata.count, 1);
        assert_eq!(response.data[0].template_key, "tpl-1");
        assert_eq!(response.data[0].template_alias, None);
    }

    #[test]
    fn list_params_default_page() {
        let params = ListTemplatesParams::default();
        assert_eq!((params.offset, params.limit), (0, 10));
    }
}
