#![allow(dead_code)]

use httpmock::MockServer;
use zeptomail_client::{EmailClient, TemplatesClient};

pub const API_KEY: &str = "test-api-key";
pub const OAUTH_TOKEN: &str = "test-oauth-token";

pub const API_KEY_AUTH: &str = "Zoho-enczapikey test-api-key";
pub const OAUTH_AUTH: &str = "Zoho-oauthtoken test-oauth-token";

pub const SUCCESS_JSON: &str = r#"{"data":[{"code":"EM_104","message":"Email request received","additional_info":[]}],"message":"OK","request_id":"req-1","object":"email"}"#;
pub const ERROR_JSON: &str = r#"{"error":{"code":"INVALID_DATA","message":"bad request","details":[{"code":"REQUIRED","message":"to is required","target":"to"}],"request_id":"req-err"}}"#;

pub fn email_client(server: &MockServer) -> EmailClient {
    EmailClient::builder()
        .base_url(server.base_url())
        .build_email_client(API_KEY)
        .expect("email client")
}

pub fn templates_client(server: &MockServer) -> TemplatesClient {
    TemplatesClient::builder()
        .base_url(server.base_url())
        .build_templates_client(OAUTH_TOKEN)
        .expect("templates client")
}
