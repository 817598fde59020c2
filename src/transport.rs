//! Authenticated HTTP plumbing shared by both clients.

use crate::{Error, Result, sniff};
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderValue};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::Serialize;
use std::fmt;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use url::Url;

const JSON: &str = "application/json";

/// Body placeholder for requests that carry no payload.
pub(crate) const NO_BODY: Option<&()> = None;

/// How a transport authenticates. Fixed for the lifetime of a transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// `Authorization: Zoho-enczapikey <key>`, used for sending mail.
    ApiKey,
    /// `Authorization: Zoho-oauthtoken <token>`, used for template management.
    OAuth,
}

impl AuthMode {
    /// Scheme prefix placed before the credential.
    pub fn scheme(self) -> &'static str {
        match self {
            AuthMode::ApiKey => "Zoho-enczapikey",
            AuthMode::OAuth => "Zoho-oauthtoken",
        }
    }
}

/// Status and body of a completed HTTP exchange, before interpretation.
#[derive(Debug, Clone)]
pub(crate) struct RawResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

/// Performs authenticated calls against the ZeptoMail base URL.
///
/// Holds only immutable configuration, so clones share the underlying
/// connection pool and can be used from many tasks at once.
#[derive(Clone)]
pub(crate) struct Transport {
    http: reqwest::Client,
    base_url: Url,
    auth: AuthMode,
    authorization: HeaderValue,
    cancel: Option<CancellationToken>,
}

impl Transport {
    pub(crate) fn new(
        http: reqwest::Client,
        base_url: Url,
        auth: AuthMode,
        credential: &str,
        cancel: Option<CancellationToken>,
    ) -> Result<Self> {
        if base_url.cannot_be_a_base() {
            return Err(Error::Config(format!(
                "base url `{base_url}` cannot carry path segments"
            )));
        }
        if credential.trim().is_empty() {
            return Err(Error::Config(format!(
                "missing credential for {} authentication",
                auth.scheme()
            )));
        }

        let mut authorization = HeaderValue::from_str(&format!("{} {credential}", auth.scheme()))
            .map_err(|_| {
                Error::Config("credential contains characters not allowed in a header".to_string())
            })?;
        authorization.set_sensitive(true);

        Ok(Self {
            http,
            base_url,
            auth,
            authorization,
            cancel,
        })
    }

    pub(crate) fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Same configuration, aborted when `token` is cancelled.
    pub(crate) fn with_cancellation(&self, token: CancellationToken) -> Self {
        Self {
            cancel: Some(token),
            ..self.clone()
        }
    }

    /// Build an absolute URL under the base URL.
    ///
    /// Each segment is percent-encoded on its own, so a `/` inside a
    /// caller-supplied identifier stays inside that segment. `.` and `..`
    /// cannot be kept as segments by any URL serializer and are rejected.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        if let Some(dot) = segments.iter().find(|s| matches!(**s, "." | "..")) {
            return Err(Error::InvalidIdentifier((*dot).to_string()));
        }
        let mut url = self.base_url.clone();
        // `new` rejected cannot-be-a-base URLs, so this always succeeds.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    /// Send a JSON request and return the raw status and body.
    pub(crate) async fn request<B>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> Result<RawResponse>
    where
        B: Serialize + ?Sized,
    {
        debug!(%method, %url, auth = self.auth.scheme(), "sending request");

        let mut builder = self
            .http
            .request(method, url)
            .header(ACCEPT, JSON)
            .header(CONTENT_TYPE, JSON)
            .header(AUTHORIZATION, self.authorization.clone());

        if let Some(body) = body {
            let encoded = serde_json::to_vec(body).map_err(Error::Serialize)?;
            builder = builder.body(encoded);
        }

        self.execute(builder).await
    }

    /// Post raw bytes with a sniffed `Content-Type` and the file name in the
    /// `name` query parameter.
    pub(crate) async fn upload(
        &self,
        url: Url,
        filename: &str,
        content: Vec<u8>,
    ) -> Result<RawResponse> {
        let url = with_file_name(url, filename);
        let content_type = sniff::detect_content_type(&content);

        debug!(
            %url,
            content_type,
            size = content.len(),
            auth = self.auth.scheme(),
            "uploading file"
        );

        let builder = self
            .http
            .post(url)
            .header(CONTENT_TYPE, content_type)
            .header(AUTHORIZATION, self.authorization.clone())
            .body(content);

        self.execute(builder).await
    }

    async fn execute(&self, builder: RequestBuilder) -> Result<RawResponse> {
        let call = async {
            let response = builder.send().await?;
            let status = response.status();
            let body = response.bytes().await?.to_vec();
            debug!(status = status.as_u16(), bytes = body.len(), "received response");
            Ok::<_, Error>(RawResponse { status, body })
        };

        match &self.cancel {
            Some(token) => tokio::select! {
                biased;
                _ = token.cancelled() => {
                    debug!("request cancelled");
                    Err(Error::Cancelled)
                }
                result = call => result,
            },
            None => call.await,
        }
    }
}

/// Append `?name=<filename>`, form-encoded.
fn with_file_name(mut url: Url, filename: &str) -> Url {
    url.query_pairs_mut().append_pair("name", filename);
    url
}

impl fmt::Debug for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transport")
            .field("base_url", &self.base_url.as_str())
            .field("auth", &self.auth)
            .field("authorization", &"[REDACTED]")
            .field("cancellable", &self.cancel.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transport(base_url: &str, auth: AuthMode) -> Transport {
        Transport::new(
            reqwest::Client::new(),
            Url::parse(base_url).unwrap(),
            auth,
            "secret-key",
            None,
        )
        .unwrap()
    }

    #[test]
    fn endpoint_appends_to_versioned_base() {
        let transport = transport("https://api.zeptomail.com/v1.1", AuthMode::ApiKey);
        assert_eq!(
            transport.endpoint(&["email", "batch"]).unwrap().as_str(),
            "https://api.zeptomail.com/v1.1/email/batch"
        );
    }

    #[test]
    fn endpoint_ignores_trailing_slash_on_base() {
        let transport = transport("http://127.0.0.1:8080/", AuthMode::ApiKey);
        assert_eq!(
            transport.endpoint(&["files"]).unwrap().as_str(),
            "http://127.0.0.1:8080/files"
        );
    }

    #[test]
    fn endpoint_encodes_each_segment() {
        let transport = transport("https://api.zeptomail.com/v1.1", AuthMode::OAuth);
        let url = transport.endpoint(&["mailagents", "ops team", "templates", "a/b"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.zeptomail.com/v1.1/mailagents/ops%20team/templates/a%2Fb"
        );
    }

    #[test]
    fn empty_segment_leaves_trailing_slash() {
        let transport = transport("https://api.zeptomail.com/v1.1", AuthMode::OAuth);
        let url = transport.endpoint(&["mailagents", "alias", "templates", ""]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.zeptomail.com/v1.1/mailagents/alias/templates/"
        );
    }

    #[test]
    fn endpoint_rejects_dot_segments() {
        let transport = transport("https://api.zeptomail.com/v1.1", AuthMode::OAuth);
        for dot in [".", ".."] {
            let err = transport
                .endpoint(&["mailagents", "agent", "templates", dot])
                .unwrap_err();
            assert!(matches!(err, Error::InvalidIdentifier(ref id) if id == dot));
        }
        let err = transport
            .endpoint(&["mailagents", "..", "templates", "tpl"])
            .unwrap_err();
        assert!(matches!(err, Error::InvalidIdentifier(_)));
    }

    #[test]
    fn dots_inside_a_segment_are_kept() {
        let transport = transport("https://api.zeptomail.com/v1.1", AuthMode::OAuth);
        let url = transport
            .endpoint(&["mailagents", "agent", "templates", "...", "v1.2"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.zeptomail.com/v1.1/mailagents/agent/templates/.../v1.2"
        );
    }

    #[test]
    fn file_name_is_form_encoded() {
        let transport = transport("https://api.zeptomail.com/v1.1", AuthMode::ApiKey);
        let url = with_file_name(transport.endpoint(&["files"]).unwrap(), "my file (1).txt");
        assert_eq!(
            url.as_str(),
            "https://api.zeptomail.com/v1.1/files?name=my+file+%281%29.txt"
        );
    }

    #[test]
    fn authorization_uses_mode_scheme() {
        let api = transport("https://api.zeptomail.com/v1.1", AuthMode::ApiKey);
        assert_eq!(api.authorization, "Zoho-enczapikey secret-key");
        assert!(api.authorization.is_sensitive());

        let oauth = transport("https://api.zeptomail.com/v1.1", AuthMode::OAuth);
        assert_eq!(oauth.authorization, "Zoho-oauthtoken secret-key");
    }

    #[test]
    fn debug_hides_credential() {
        let transport = transport("https://api.zeptomail.com/v1.1", AuthMode::ApiKey);
        let rendered = format!("{transport:?}");
        assert!(!rendered.contains("secret-key"));
        assert!(rendered.contains("REDACTED"));
    }

    #[test]
    fn rejects_empty_credential() {
        let err = Transport::new(
            reqwest::Client::new(),
            Url::parse("https://api.zeptomail.com/v1.1").unwrap(),
            AuthMode::ApiKey,
            "  ",
            None,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn rejects_non_hierarchical_base() {
        let err = Transport::new(
            reqwest::Client::new(),
            Url::parse("mailto:ops@example.com").unwrap(),
            AuthMode::ApiKey,
            "key",
            None,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn rejects_header_breaking_credential() {
        let err = Transport::new(
            reqwest::Client::new(),
            Url::parse("https://api.zeptomail.com/v1.1").unwrap(),
            AuthMode::ApiKey,
            "key\nInjected: yes",
            None,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
