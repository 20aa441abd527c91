//! Stub signing service and request helpers.

use std::collections::HashMap;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use signer_client::TOKEN_HEADER;
use signer_client::operation::{DATA_FIELD, SIGNATURE_FIELD};
use wiremock::matchers::{header, method};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

/// Signature the stub hands out by default.
pub const FIXED_SIGNATURE: &[u8] = b"\x30\x45\x02\x21stub-signature\x00\xff";

/// Token the stub accepts by default.
pub const STUB_TOKEN: &str = "stub-token";

/// In-process stand-in for the remote signing service.
///
/// - `/sign` answers with a fixed signature, whatever the data
/// - `/checkSign` answers `true` iff the submitted signature is that one
/// - `/encrypt` and `/decrypt` echo the submitted data, so a round trip
///   returns the original plaintext
///
/// Requests missing the expected token fall through to wiremock's 404.
#[derive(Debug, Clone)]
pub struct StubSigningService {
    signature: Vec<u8>,
}

impl Default for StubSigningService {
    fn default() -> Self {
        Self::new(FIXED_SIGNATURE)
    }
}

impl StubSigningService {
    /// Stub handing out `signature`.
    #[must_use]
    pub fn new(signature: &[u8]) -> Self {
        Self {
            signature: signature.to_vec(),
        }
    }

    /// Signature this stub signs with.
    #[must_use]
    pub fn signature(&self) -> &[u8] {
        &self.signature
    }

    /// Mount on `server`, answering only requests carrying `token`.
    pub async fn mount(self, server: &MockServer, token: &str) {
        Mock::given(method("POST"))
            .and(header(TOKEN_HEADER, token))
            .respond_with(self)
            .mount(server)
            .await;
    }

    /// Start a server with the default stub mounted for [`STUB_TOKEN`].
    pub async fn start() -> MockServer {
        let server = MockServer::start().await;
        Self::default().mount(&server, STUB_TOKEN).await;
        server
    }
}

impl Respond for StubSigningService {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let fields = form_fields(request);
        let data = fields.get(DATA_FIELD).cloned().unwrap_or_default();

        match request.url.path() {
            "/sign" => ResponseTemplate::new(200).set_body_string(STANDARD.encode(&self.signature)),
            "/checkSign" => {
                let submitted = fields
                    .get(SIGNATURE_FIELD)
                    .and_then(|s| STANDARD.decode(s).ok());
                let valid = submitted.as_deref() == Some(self.signature.as_slice());
                ResponseTemplate::new(200).set_body_string(valid.to_string())
            }
            "/encrypt" | "/decrypt" => ResponseTemplate::new(200).set_body_string(data),
            _ => ResponseTemplate::new(404),
        }
    }
}

/// Decode a request's form body into field name and value pairs.
#[must_use]
pub fn form_fields(request: &Request) -> HashMap<String, String> {
    url::form_urlencoded::parse(&request.body)
        .into_owned()
        .collect()
}

/// URL of a local port nothing listens on.
///
/// # Panics
///
/// Panics if no local port can be bound.
#[must_use]
pub fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}
