//! # ZeptoMail Client
//! Asynchronous wrapper around the ZeptoMail transactional email REST API: send single, batch and templated emails with [`EmailClient`], upload attachments to the file cache, and manage stored templates with [`TemplatesClient`]. Both are configured through [`ClientBuilder`].
//!
//! ## Audience and uses
//! For Rust services that send transactional mail (sign-up confirmations, receipts, password resets) through ZeptoMail and want typed request bodies and typed errors instead of hand-built JSON.
//!
//! ## Runtime requirements
//! Async-only; run inside a Tokio (v1) runtime. HTTP calls use `reqwest`. Every operation is exactly one HTTP round trip; nothing is retried, queued or cached.
//!
//! ## Authentication
//! Sending and file uploads use a Send Mail token (`Authorization: Zoho-enczapikey <key>`). Template management uses an OAuth token (`Authorization: Zoho-oauthtoken <token>`). The mode is fixed per client.
//!
//! ## Errors
//! Provider rejections (any non-2xx status) surface as [`Error::Api`] carrying an [`ApiError`]. Network, TLS, timeout and cancellation failures surface as [`Error::Request`] or [`Error::Cancelled`]; a malformed success body becomes [`Error::ResponseParse`]. Use [`Error::is_api`] and [`Error::is_transport`] to tell "the server said no" from "the request never completed". The crate-wide [`Result`] alias wraps these errors.
//!
//! ## Logging
//! Requests and responses are traced at `debug` level through `tracing`; credentials are never logged. Install a subscriber in your application to see them.
//!
//! ## Example
//! ```no_run
//! use zeptomail_client::{EmailAddress, EmailClient, EmailRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), zeptomail_client::Error> {
//!     let client = EmailClient::new("your-send-mail-token")?;
//!
//!     let request = EmailRequest::new(EmailAddress::new("noreply@example.com"), "Test Email")
//!         .to(EmailAddress::new("paula@example.com").with_name("Paula"))
//!         .html_body("<h1>Hello from Rust!</h1>");
//!
//!     match client.send_email(&request).await {
//!         Ok(response) => println!("Sent: {}", response.request_id),
//!         Err(zeptomail_client::Error::Api(err)) => println!("Rejected: {} - {}", err.code, err.message),
//!         Err(err) => return Err(err),
//!     }
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod models;
mod response;
pub mod sniff;
mod transport;

pub use client::{ClientBuilder, DEFAULT_BASE_URL, EmailClient, TemplatesClient};
pub use error::{ApiError, Error, ErrorDetail};
pub use models::{
    AdditionalInfo, Attachment, CreateTemplateRequest, CreateTemplateResponse, EmailAddress,
    EmailRequest, FileUploadResponse, GetTemplateResponse, InlineImage, ListTemplatesMetadata,
    ListTemplatesParams, ListTemplatesResponse, Recipient, ResponseData, SuccessResponse,
    TemplateAttachment, TemplateData, TemplateListItem, TemplateRequest, UpdateTemplateRequest,
};
pub use tokio_util::sync::CancellationToken;
pub use transport::AuthMode;

/// Result type alias for ZeptoMail operations.
///
/// This is equivalent to `std::result::Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
