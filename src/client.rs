//! ZeptoMail async clients and their shared builder.

use crate::models::{
    CreateTemplateRequest, CreateTemplateResponse, EmailRequest, FileUploadResponse,
    GetTemplateResponse, ListTemplatesParams, ListTemplatesResponse, SuccessResponse,
    TemplateRequest, UpdateTemplateRequest,
};
use crate::response::{check_status, classify};
use crate::transport::{AuthMode, NO_BODY, Transport};
use crate::{Error, Result};
use reqwest::Method;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Production API root.
pub const DEFAULT_BASE_URL: &str = "https://api.zeptomail.com/v1.1";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const USER_AGENT_VALUE: &str = concat!("zeptomail-client/", env!("CARGO_PKG_VERSION"));

const API_KEY_ENV: &str = "ZEPTOMAIL_API_KEY";
const OAUTH_TOKEN_ENV: &str = "ZEPTOMAIL_OAUTH_TOKEN";
const BASE_URL_ENV: &str = "ZEPTOMAIL_BASE_URL";

/// Async client for the ZeptoMail sending and file cache endpoints.
///
/// Authenticates with a Send Mail token (`Zoho-enczapikey`). Cloning is cheap
/// and clones share one connection pool.
#[derive(Debug, Clone)]
pub struct EmailClient {
    transport: Transport,
}

impl EmailClient {
    /// Create a builder for configuring the client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Create a client with default settings.
    ///
    /// # Examples
    /// ```no_run
    /// # use zeptomail_client::EmailClient;
    /// # fn main() -> Result<(), zeptomail_client::Error> {
    /// let client = EmailClient::new("your-send-mail-token")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        ClientBuilder::new().build_email_client(api_key)
    }

    /// Create a client from `ZEPTOMAIL_API_KEY`, honouring `ZEPTOMAIL_BASE_URL`
    /// when set.
    pub fn from_env() -> Result<Self> {
        let api_key = required_env(API_KEY_ENV)?;
        ClientBuilder::from_env().build_email_client(api_key)
    }

    /// A clone of this client whose requests fail with [`Error::Cancelled`]
    /// once `token` is cancelled.
    pub fn with_cancellation(&self, token: CancellationToken) -> Self {
        Self {
            transport: self.transport.with_cancellation(token),
        }
    }

    /// The API root requests are sent to.
    pub fn base_url(&self) -> &str {
        self.transport.base_url().as_str()
    }

    /// Send a single email.
    ///
    /// # Examples
    /// ```no_run
    /// # use zeptomail_client::{EmailAddress, EmailClient, EmailRequest};
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), zeptomail_client::Error> {
    /// let client = EmailClient::new("your-send-mail-token")?;
    /// let request = EmailRequest::new(EmailAddress::new("noreply@example.com"), "Welcome")
    ///     .to(EmailAddress::new("paula@example.com").with_name("Paula"))
    ///     .html_body("<h1>Hello!</h1>");
    /// let response = client.send_email(&request).await?;
    /// println!("{}", response.request_id);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn send_email(&self, request: &EmailRequest) -> Result<SuccessResponse> {
        self.send(&["email"], request).await
    }

    /// Send one email per recipient, each with its own `merge_info`.
    pub async fn send_batch_email(&self, request: &EmailRequest) -> Result<SuccessResponse> {
        self.send(&["email", "batch"], request).await
    }

    /// Send an email rendered from a stored template.
    ///
    /// # Examples
    /// ```no_run
    /// # use zeptomail_client::{EmailAddress, EmailClient, TemplateRequest};
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), zeptomail_client::Error> {
    /// let client = EmailClient::new("your-send-mail-token")?;
    /// let request = TemplateRequest::with_key("template-key", EmailAddress::new("rebecca@example.com"))
    ///     .to(EmailAddress::new("paula@example.com"))
    ///     .merge("meeting_link", "https://meeting.example.com/join?key=1234");
    /// client.send_template_email(&request).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn send_template_email(&self, request: &TemplateRequest) -> Result<SuccessResponse> {
        self.send(&["email", "template"], request).await
    }

    /// Templated send to many recipients, each with its own `merge_info`.
    pub async fn send_batch_template_email(
        &self,
        request: &TemplateRequest,
    ) -> Result<SuccessResponse> {
        self.send(&["email", "template", "batch"], request).await
    }

    /// Upload a file to the ZeptoMail file cache.
    ///
    /// The returned `file_cache_key` can be attached to any number of later
    /// sends with [`Attachment::from_cache_key`](crate::Attachment::from_cache_key).
    /// The content type is sniffed from the bytes.
    ///
    /// # Examples
    /// ```no_run
    /// # use zeptomail_client::EmailClient;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), zeptomail_client::Error> {
    /// let client = EmailClient::new("your-send-mail-token")?;
    /// let uploaded = client.file_cache_upload("report.pdf", b"%PDF-1.7 ...".to_vec()).await?;
    /// println!("{}", uploaded.file_cache_key);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn file_cache_upload(
        &self,
        filename: &str,
        content: impl Into<Vec<u8>>,
    ) -> Result<FileUploadResponse> {
        let url = self.transport.endpoint(&["files"])?;
        let response = self.transport.upload(url, filename, content.into()).await?;
        classify(&response)
    }

    async fn send<B>(&self, segments: &[&str], request: &B) -> Result<SuccessResponse>
    where
        B: serde::Serialize,
    {
        let url = self.transport.endpoint(segments)?;
        let response = self
            .transport
            .request(Method::POST, url, Some(request))
            .await?;
        classify(&response)
    }
}

/// Async client for the ZeptoMail template management endpoints.
///
/// Authenticates with an OAuth token (`Zoho-oauthtoken`). Templates are
/// scoped to a mail agent, identified by its alias.
/// Aliases and keys are sent as single path segments; an empty, `.` or `..`
/// identifier fails with [`Error::InvalidIdentifier`] before any request.
#[derive(Debug, Clone)]
pub struct TemplatesClient {
    transport: Transport,
}

impl TemplatesClient {
    /// Create a builder for configuring the client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Create a client with default settings.
    pub fn new(oauth_token: impl Into<String>) -> Result<Self> {
        ClientBuilder::new().build_templates_client(oauth_token)
    }

    /// Create a client from `ZEPTOMAIL_OAUTH_TOKEN`, honouring
    /// `ZEPTOMAIL_BASE_URL` when set.
    pub fn from_env() -> Result<Self> {
        let token = required_env(OAUTH_TOKEN_ENV)?;
        ClientBuilder::from_env().build_templates_client(token)
    }

    /// A clone of this client whose requests fail with [`Error::Cancelled`]
    /// once `token` is cancelled.
    pub fn with_cancellation(&self, token: CancellationToken) -> Self {
        Self {
            transport: self.transport.with_cancellation(token),
        }
    }

    /// The API root requests are sent to.
    pub fn base_url(&self) -> &str {
        self.transport.base_url().as_str()
    }

    /// Create a template under a mail agent.
    ///
    /// # Examples
    /// ```no_run
    /// # use zeptomail_client::{CreateTemplateRequest, TemplatesClient};
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), zeptomail_client::Error> {
    /// let client = TemplatesClient::new("your-oauth-token")?;
    /// let request = CreateTemplateRequest {
    ///     template_name: "Welcome".to_string(),
    ///     subject: "Welcome, {{name}}".to_string(),
    ///     htmlbody: Some("<p>Hi {{name}}</p>".to_string()),
    ///     ..Default::default()
    /// };
    /// let created = client.create_template("my-agent", &request).await?;
    /// for template in created.data {
    ///     println!("{}", template.template_key);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn create_template(
        &self,
        mail_agent_alias: &str,
        request: &CreateTemplateRequest,
    ) -> Result<CreateTemplateResponse> {
        let alias = identifier(mail_agent_alias)?;
        let url = self
            .transport
            .endpoint(&["mailagents", alias, "templates"])?;
        let response = self
            .transport
            .request(Method::POST, url, Some(request))
            .await?;
        classify(&response)
    }

    /// Fetch one template by key.
    pub async fn get_template(
        &self,
        mail_agent_alias: &str,
        template_key: &str,
    ) -> Result<GetTemplateResponse> {
        let url = self.template_url(mail_agent_alias, template_key)?;
        let response = self.transport.request(Method::GET, url, NO_BODY).await?;
        classify(&response)
    }

    /// Replace a template's name, alias, subject and bodies.
    pub async fn update_template(
        &self,
        mail_agent_alias: &str,
        template_key: &str,
        request: &UpdateTemplateRequest,
    ) -> Result<CreateTemplateResponse> {
        let url = self.template_url(mail_agent_alias, template_key)?;
        let response = self
            .transport
            .request(Method::PUT, url, Some(request))
            .await?;
        classify(&response)
    }

    /// List one page of a mail agent's templates.
    ///
    /// # Examples
    /// ```no_run
    /// # use zeptomail_client::{ListTemplatesParams, TemplatesClient};
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), zeptomail_client::Error> {
    /// let client = TemplatesClient::new("your-oauth-token")?;
    /// let page = client
    ///     .list_templates("my-agent", ListTemplatesParams { offset: 0, limit: 25 })
    ///     .await?;
    /// println!("{} templates", page.metadata.count);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn list_templates(
        &self,
        mail_agent_alias: &str,
        params: ListTemplatesParams,
    ) -> Result<ListTemplatesResponse> {
        let alias = identifier(mail_agent_alias)?;
        let mut url = self
            .transport
            .endpoint(&["mailagents", alias, "templates", ""])?;
        url.query_pairs_mut()
            .append_pair("offset", &params.offset.to_string())
            .append_pair("limit", &params.limit.to_string());
        let response = self.transport.request(Method::GET, url, NO_BODY).await?;
        classify(&response)
    }

    /// Delete a template. The success body is discarded.
    pub async fn delete_template(&self, mail_agent_alias: &str, template_key: &str) -> Result<()> {
        let url = self.template_url(mail_agent_alias, template_key)?;
        let response = self.transport.request(Method::DELETE, url, NO_BODY).await?;
        check_status(&response)
    }

    fn template_url(&self, mail_agent_alias: &str, template_key: &str) -> Result<Url> {
        let alias = identifier(mail_agent_alias)?;
        let key = identifier(template_key)?;
        self.transport
            .endpoint(&["mailagents", alias, "templates", key])
    }
}

/// An empty alias or key would collapse its path segment.
fn identifier(value: &str) -> Result<&str> {
    if value.is_empty() {
        return Err(Error::InvalidIdentifier(value.to_string()));
    }
    Ok(value)
}

fn required_env(name: &str) -> Result<String> {
    std::env::var(name).map_err(|_| Error::Config(format!("environment variable {name} is not set")))
}

/// Builder for configuring a ZeptoMail client.
///
/// Start with [`EmailClient::builder`] or [`TemplatesClient::builder`] to
/// override defaults, then finish with [`ClientBuilder::build_email_client`]
/// or [`ClientBuilder::build_templates_client`].
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    base_url: String,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    proxy: Option<String>,
    danger_accept_invalid_certs: bool,
    user_agent: String,
    http: Option<reqwest::Client>,
    cancellation: Option<CancellationToken>,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientBuilder {
    /// Create a new builder with default settings.
    ///
    /// Defaults:
    /// - Base URL `https://api.zeptomail.com/v1.1`
    /// - 30 second request timeout, no connect timeout
    /// - No proxy
    /// - `danger_accept_invalid_certs = false`
    /// - User agent `zeptomail-client/<version>`
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Some(DEFAULT_TIMEOUT),
            connect_timeout: None,
            proxy: None,
            danger_accept_invalid_certs: false,
            user_agent: USER_AGENT_VALUE.to_string(),
            http: None,
            cancellation: None,
        }
    }

    fn from_env() -> Self {
        match std::env::var(BASE_URL_ENV) {
            Ok(base_url) if !base_url.is_empty() => Self::new().base_url(base_url),
            _ => Self::new(),
        }
    }

    /// Override the API root, e.g. to point at a local stub server.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Total time allowed per request. `None` disables the timeout.
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Time allowed to establish a connection.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Set a proxy URL (e.g., "http://127.0.0.1:8080" or "socks5://127.0.0.1:1080").
    ///
    /// This uses reqwest's proxy support for all requests.
    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Control whether to accept invalid TLS certificates (default: false).
    pub fn danger_accept_invalid_certs(mut self, value: bool) -> Self {
        self.danger_accept_invalid_certs = value;
        self
    }

    /// Override the default user agent string.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Use a preconfigured HTTP client.
    ///
    /// Timeout, proxy, TLS and user agent settings on this builder are then
    /// ignored in favour of the client's own.
    pub fn http_client(mut self, http: reqwest::Client) -> Self {
        self.http = Some(http);
        self
    }

    /// Abort in-flight requests with [`Error::Cancelled`] once `token` fires.
    pub fn cancellation_token(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Build a client for the sending endpoints, authenticated with an API key.
    ///
    /// # Examples
    /// ```no_run
    /// # use std::time::Duration;
    /// # use zeptomail_client::EmailClient;
    /// # fn main() -> Result<(), zeptomail_client::Error> {
    /// let client = EmailClient::builder()
    ///     .timeout(Some(Duration::from_secs(60)))
    ///     .user_agent("my-app/1.0")
    ///     .build_email_client("your-send-mail-token")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn build_email_client(self, api_key: impl Into<String>) -> Result<EmailClient> {
        let transport = self.build_transport(AuthMode::ApiKey, &api_key.into())?;
        Ok(EmailClient { transport })
    }

    /// Build a client for template management, authenticated with an OAuth token.
    pub fn build_templates_client(self, oauth_token: impl Into<String>) -> Result<TemplatesClient> {
        let transport = self.build_transport(AuthMode::OAuth, &oauth_token.into())?;
        Ok(TemplatesClient { transport })
    }

    fn build_transport(self, auth: AuthMode, credential: &str) -> Result<Transport> {
        let base_url = Url::parse(&self.base_url)
            .map_err(|err| Error::Config(format!("invalid base url `{}`: {err}", self.base_url)))?;

        let http = match self.http {
            Some(http) => http,
            None => {
                let mut builder = reqwest::Client::builder()
                    .user_agent(self.user_agent)
                    .danger_accept_invalid_certs(self.danger_accept_invalid_certs);

                if let Some(timeout) = self.timeout {
                    builder = builder.timeout(timeout);
                }
                if let Some(timeout) = self.connect_timeout {
                    builder = builder.connect_timeout(timeout);
                }
                if let Some(proxy_url) = &self.proxy {
                    let proxy = reqwest::Proxy::all(proxy_url)
                        .map_err(|err| Error::Config(format!("invalid proxy `{proxy_url}`: {err}")))?;
                    builder = builder.proxy(proxy);
                }

                builder.build()?
            }
        };

        Transport::new(http, base_url, auth, credential, self.cancellation)
    }
}
