//! Request envelopes and response decoding.
//!
//! Binary payloads never travel raw: every outbound payload is base64
//! encoded into a form field, and every binary answer is base64 decoded.

use base64::Engine as _;
use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD};
use base64::engine::DecodePaddingMode;
use url::Url;

use crate::error::{SignerError, SignerResult};
use crate::operation::{Operation, SIGNATURE_VALID};

/// Decoder for response bodies: padding optional, stray trailing bits ignored.
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// HTTP method of an envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// Body-less retrieval
    Get,
    /// Submission with a body
    Post,
}

/// Body of a POST envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestBody {
    /// Fields sent as `application/x-www-form-urlencoded`
    Form(Vec<(&'static str, String)>),
    /// Pre-encoded body sent unchanged
    Raw(String),
}

/// Everything needed to issue one request. Built fresh for each call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestEnvelope {
    /// Resource path appended to the base URL
    pub resource: &'static str,
    /// Query parameters, in order
    pub query: Vec<(String, String)>,
    /// HTTP method
    pub method: Method,
    /// Body, present only for POST
    pub body: Option<RequestBody>,
}

impl RequestEnvelope {
    /// POST envelope carrying form fields.
    #[must_use]
    pub const fn post(resource: &'static str, fields: Vec<(&'static str, String)>) -> Self {
        Self {
            resource,
            query: Vec::new(),
            method: Method::Post,
            body: Some(RequestBody::Form(fields)),
        }
    }

    /// GET envelope with no body.
    #[must_use]
    pub const fn get(resource: &'static str) -> Self {
        Self {
            resource,
            query: Vec::new(),
            method: Method::Get,
            body: None,
        }
    }

    /// Envelope for `operation`, one payload per required field.
    ///
    /// Payloads are paired with [`Operation::required_fields`] in order and
    /// base64 encoded.
    ///
    /// # Panics
    ///
    /// Panics if the payload count differs from the operation's field count.
    pub(crate) fn for_operation(operation: Operation, payloads: &[&[u8]]) -> Self {
        assert_eq!(
            payloads.len(),
            operation.required_fields().len(),
            "{operation} takes {} payloads",
            operation.required_fields().len()
        );
        let fields = operation
            .required_fields()
            .iter()
            .zip(payloads)
            .map(|(name, payload)| (*name, STANDARD.encode(payload)))
            .collect();
        Self::post(operation.resource(), fields)
    }

    /// Append a query parameter.
    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Replace the body with a pre-encoded string. Turns the envelope into a POST.
    #[must_use]
    pub fn with_raw_body(mut self, body: impl Into<String>) -> Self {
        self.method = Method::Post;
        self.body = Some(RequestBody::Raw(body.into()));
        self
    }

    /// Value of a form field, if the body is a form containing it.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&str> {
        match &self.body {
            Some(RequestBody::Form(fields)) => fields
                .iter()
                .find(|(field, _)| *field == name)
                .map(|(_, value)| value.as_str()),
            _ => None,
        }
    }
}

/// Compose the target URL for an envelope.
///
/// All trailing `/` are stripped from `base` before the resource path is
/// appended. The query string is only added when parameters exist.
///
/// # Errors
///
/// Returns [`SignerError::InvalidConfig`] if the result is not a valid URL.
pub fn target_url(base: &str, envelope: &RequestEnvelope) -> SignerResult<Url> {
    let joined = format!("{}{}", base.trim_end_matches('/'), envelope.resource);
    let mut url = Url::parse(&joined)
        .map_err(|e| SignerError::invalid_config(format!("Invalid target URL {joined}: {e}")))?;
    if !envelope.query.is_empty() {
        url.query_pairs_mut().extend_pairs(&envelope.query);
    }
    Ok(url)
}

/// Decode a base64 response body for `operation`.
///
/// Surrounding ASCII whitespace is ignored, so a trailing newline from the
/// service is harmless. Padding is optional. An empty body decodes to no
/// bytes.
///
/// # Errors
///
/// Returns [`SignerError::Decode`] if the body is not valid base64.
pub fn decode_payload(operation: Operation, body: &[u8]) -> SignerResult<Vec<u8>> {
    LENIENT
        .decode(body.trim_ascii())
        .map_err(|e| SignerError::decode(operation, e))
}

/// Whether a `checkSign` body reports a valid signature.
#[must_use]
pub fn is_signature_valid(body: &[u8]) -> bool {
    body == SIGNATURE_VALID.as_bytes()
}
