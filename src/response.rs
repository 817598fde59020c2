//! Turns a raw HTTP exchange into a typed success value or an [`ApiError`].

use crate::models::ErrorResponse;
use crate::transport::RawResponse;
use crate::{ApiError, Error, Result};
use serde::de::DeserializeOwned;
use tracing::warn;

/// Error bodies that are not ZeptoMail JSON are cut to this many bytes.
const MAX_ERROR_BODY_LEN: usize = 512;

/// Decode a 2xx response into `T`, or turn anything else into an error.
pub(crate) fn classify<T: DeserializeOwned>(response: &RawResponse) -> Result<T> {
    check_status(response)?;
    serde_json::from_slice(&response.body).map_err(Error::ResponseParse)
}

/// `Ok(())` for 2xx, [`Error::Api`] otherwise. The body of a success is not read.
pub(crate) fn check_status(response: &RawResponse) -> Result<()> {
    if response.status.is_success() {
        return Ok(());
    }
    Err(api_error(response).into())
}

fn api_error(response: &RawResponse) -> ApiError {
    let http_status = response.status.as_u16();

    if let Ok(envelope) = serde_json::from_slice::<ErrorResponse>(&response.body) {
        let error = envelope.error;
        if let Some(code) = error.code.filter(|code| !code.is_empty()) {
            return ApiError {
                http_status,
                code,
                message: error.message.unwrap_or_default(),
                details: error.details.unwrap_or_default(),
                request_id: error.request_id.filter(|id| !id.is_empty()),
            };
        }
    }

    warn!(
        status = http_status,
        bytes = response.body.len(),
        "error response without a ZeptoMail error body"
    );

    let end = response.body.len().min(MAX_ERROR_BODY_LEN);
    ApiError {
        http_status,
        code: response
            .status
            .canonical_reason()
            .unwrap_or_default()
            .to_string(),
        message: String::from_utf8_lossy(&response.body[..end]).into_owned(),
        details: Vec::new(),
        request_id: None,
    }
}
