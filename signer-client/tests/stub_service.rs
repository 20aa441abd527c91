//! Integration tests against a stubbed signing service.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use signer_client::{
    Operation, SignerClient, SignerConfig, SignerError, SignerProvider, TOKEN_HEADER,
    TransportErrorKind,
};
use signer_test_utils::fixtures::{FIXED_SIGNATURE, STUB_TOKEN};
use signer_test_utils::{StubSigningService, closed_port_url, form_fields};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(base_url: impl Into<String>, token: &str) -> SignerClient {
    SignerClient::new(SignerConfig::new(base_url, token)).unwrap()
}

async fn call(client: &SignerClient, operation: Operation) -> Result<(), SignerError> {
    match operation {
        Operation::Encrypt => client.encrypt(b"payload").await.map(drop),
        Operation::Decrypt => client.decrypt(b"payload").await.map(drop),
        Operation::Sign => client.sign(b"payload").await.map(drop),
        Operation::CheckSign => client.check_sign(b"payload", b"sig").await.map(drop),
    }
}

#[tokio::test]
async fn test_sign_then_check_sign() {
    let server = StubSigningService::start().await;
    let client = client(server.uri(), STUB_TOKEN);

    let signature = client.sign(b"invoice #42").await.unwrap();
    assert_eq!(signature, FIXED_SIGNATURE);
    assert!(client.check_sign(b"invoice #42", &signature).await.unwrap());
    assert!(!client.check_sign(b"invoice #42", b"forged").await.unwrap());
    assert!(!client.check_sign(b"invoice #42", b"").await.unwrap());
}

#[tokio::test]
async fn test_encrypt_decrypt_round_trip() {
    let server = StubSigningService::start().await;
    let client = client(server.uri(), STUB_TOKEN);

    let plaintext = b"\x00\x01binary\xfe\xff";
    let ciphertext = client.encrypt(plaintext).await.unwrap();
    assert_eq!(client.decrypt(&ciphertext).await.unwrap(), plaintext);
}

#[tokio::test]
async fn test_request_shape() {
    let server = StubSigningService::start().await;
    let client = client(format!("{}///", server.uri()), STUB_TOKEN);

    client.check_sign(b"doc", b"\xff\x00").await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.method.as_str(), "POST");
    assert_eq!(request.url.path(), "/checkSign");
    assert!(request.url.query().is_none());
    assert_eq!(
        request.headers.get("content-type").unwrap(),
        "application/x-www-form-urlencoded"
    );

    let fields = form_fields(request);
    assert_eq!(fields.len(), 2);
    assert_eq!(STANDARD.decode(&fields["data"]).unwrap(), b"doc");
    assert_eq!(STANDARD.decode(&fields["sign"]).unwrap(), b"\xff\x00");
}

#[tokio::test]
async fn test_token_sent_on_every_operation() {
    let server = StubSigningService::start().await;
    let client = client(server.uri(), STUB_TOKEN);

    for operation in Operation::ALL {
        call(&client, operation).await.unwrap();
    }

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), Operation::ALL.len());
    for (request, operation) in requests.iter().zip(Operation::ALL) {
        assert_eq!(request.url.path(), operation.resource());
        let tokens: Vec<_> = request.headers.get_all(TOKEN_HEADER).iter().collect();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0], STUB_TOKEN);
    }
}

#[tokio::test]
async fn test_wrong_token_is_rejected() {
    let server = StubSigningService::start().await;
    let client = client(server.uri(), "someone-else");

    let err = client.sign(b"x").await.unwrap_err();
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn test_server_error_on_every_operation() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("signer exploded"))
        .mount(&server)
        .await;
    let client = client(server.uri(), "t");

    for operation in Operation::ALL {
        match call(&client, operation).await.unwrap_err() {
            SignerError::HttpStatus { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "signer exploded");
            }
            other => panic!("{operation}: expected HttpStatus, got {other:?}"),
        }
    }
}

#[tokio::test]
async fn test_unreachable_service_on_every_operation() {
    let client = client(closed_port_url(), "t");

    for operation in Operation::ALL {
        match call(&client, operation).await.unwrap_err() {
            SignerError::Transport { kind, .. } => {
                assert_eq!(kind, TransportErrorKind::Connect, "{operation}");
            }
            other => panic!("{operation}: expected Transport, got {other:?}"),
        }
    }
}

#[tokio::test]
async fn test_refused_connection_keeps_os_code_and_cause() {
    let client = client(closed_port_url(), "t");

    match client.sign(b"x").await.unwrap_err() {
        SignerError::Transport { kind, code, message } => {
            assert_eq!(kind, TransportErrorKind::Connect);
            assert_eq!(code, Some(111));
            assert!(message.to_lowercase().contains("refused"), "{message}");
        }
        other => panic!("expected Transport, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unresolvable_host_names_dns_failure() {
    let client = client("http://no-such-host.invalid", "t");

    match client.encrypt(b"x").await.unwrap_err() {
        SignerError::Transport { kind, code, message } => {
            assert_eq!(kind, TransportErrorKind::Connect);
            assert!(code.is_none());
            assert!(message.to_lowercase().contains("dns"), "{message}");
        }
        other => panic!("expected Transport, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unpadded_response_decodes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/sign"))
        .respond_with(ResponseTemplate::new(200).set_body_string("aGVsbG8"))
        .mount(&server)
        .await;
    let client = client(server.uri(), "t");

    assert_eq!(client.sign(b"x").await.unwrap(), b"hello");
}

#[tokio::test]
async fn test_no_content_yields_empty_bytes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;
    let client = client(server.uri(), "t");

    assert!(client.encrypt(b"x").await.unwrap().is_empty());
    assert!(client.decrypt(b"x").await.unwrap().is_empty());
    assert!(client.sign(b"x").await.unwrap().is_empty());
    assert!(!client.check_sign(b"x", b"y").await.unwrap());
}

#[tokio::test]
async fn test_check_sign_requires_exact_literal() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/checkSign"))
        .respond_with(ResponseTemplate::new(200).set_body_string("true\n"))
        .mount(&server)
        .await;
    let client = client(server.uri(), "t");

    assert!(!client.check_sign(b"x", b"y").await.unwrap());
}

#[tokio::test]
async fn test_timeout_is_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("AA==")
                .set_delay(std::time::Duration::from_millis(500)),
        )
        .mount(&server)
        .await;
    let config = SignerConfig::new(server.uri(), "t")
        .with_timeout(std::time::Duration::from_millis(50));
    let client = SignerClient::new(config).unwrap();

    let err = client.sign(b"x").await.unwrap_err();
    assert!(matches!(
        err,
        SignerError::Transport {
            kind: TransportErrorKind::Timeout,
            ..
        }
    ));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_client_usable_through_provider_trait() {
    async fn sign_and_verify<P: SignerProvider>(provider: &P, data: &[u8]) -> bool {
        let Ok(signature) = provider.sign(data).await else {
            return false;
        };
        provider.check_sign(data, &signature).await.unwrap_or(false)
    }

    let server = StubSigningService::start().await;
    let client = client(server.uri(), STUB_TOKEN);
    assert!(sign_and_verify(&client, b"contract").await);

    let mock = signer_test_utils::MockSignerProvider::new();
    assert!(sign_and_verify(&mock, b"contract").await);
}

#[tokio::test]
async fn test_concurrent_calls_share_one_client() {
    let server = StubSigningService::start().await;
    let client = client(server.uri(), STUB_TOKEN);

    let handles: Vec<_> = (0u8..8)
        .map(|i| {
            let client = client.clone();
            tokio::spawn(async move {
                let plaintext = vec![i; usize::from(i) + 1];
                let ciphertext = client.encrypt(&plaintext).await.unwrap();
                assert_eq!(client.decrypt(&ciphertext).await.unwrap(), plaintext);
            })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap();
    }
    assert_eq!(server.received_requests().await.unwrap().len(), 16);
}
