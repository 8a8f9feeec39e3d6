//! Integration tests for the request pipeline.
//!
//! These tests verify header composition, HTTP-status mapping, envelope
//! parsing, and GraphQL error classification against a mock server.

use std::time::Duration;

use frank_energie::{ApiConfig, FrankEnergie, FrankEnergieError};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a client pointed at the mock server.
fn client_for(server: &MockServer) -> FrankEnergie {
    FrankEnergie::with_config(ApiConfig::default().with_endpoint(server.uri()))
}

// ============================================================================
// HTTP-status mapping
// ============================================================================

async fn status_error(status: u16) -> FrankEnergieError {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(status))
        .mount(&server)
        .await;

    let client = client_for(&server);
    client
        .prices(None, None)
        .await
        .expect_err("non-2xx status must map to an error")
}

#[tokio::test]
async fn test_http_401_maps_to_auth_required() {
    assert!(matches!(
        status_error(401).await,
        FrankEnergieError::AuthRequired
    ));
}

#[tokio::test]
async fn test_http_403_maps_to_invalid_credentials() {
    assert!(matches!(
        status_error(403).await,
        FrankEnergieError::Auth(msg) if msg == "Forbidden: Invalid credentials."
    ));
}

#[tokio::test]
async fn test_http_400_maps_to_invalid_query() {
    assert!(matches!(
        status_error(400).await,
        FrankEnergieError::Request(msg) if msg == "Bad request: Invalid query."
    ));
}

#[tokio::test]
async fn test_http_500_maps_to_internal_server_error() {
    assert!(matches!(
        status_error(500).await,
        FrankEnergieError::Auth(msg) if msg == "Internal server error."
    ));
}

#[tokio::test]
async fn test_other_non_2xx_maps_to_generic_fallback() {
    for status in [404, 418, 429, 503] {
        assert!(matches!(
            status_error(status).await,
            FrankEnergieError::Auth(msg) if msg.starts_with("Unexpected response:")
        ));
    }
}

// ============================================================================
// Envelope handling
// ============================================================================

#[tokio::test]
async fn test_empty_body_is_not_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("", "application/json"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let prices = client.prices(None, None).await.unwrap();
    assert!(prices.electricity.is_empty());
    assert!(prices.gas.is_empty());
}

#[tokio::test]
async fn test_malformed_json_body_is_a_network_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("not json", "application/json"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert!(matches!(
        client.prices(None, None).await,
        Err(FrankEnergieError::Network(_))
    ));
}

#[tokio::test]
async fn test_graphql_auth_required_error_is_classified() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errors": [{"message": "user-error:auth-required"}]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert!(matches!(
        client.prices(None, None).await,
        Err(FrankEnergieError::AuthRequired)
    ));
}

#[tokio::test]
async fn test_no_marketprices_error_is_swallowed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errors": [{"message": "No marketprices found for segment GAS"}]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let prices = client.prices(None, None).await.unwrap();
    assert!(prices.electricity.is_empty());
    assert!(prices.gas.is_empty());
}

#[tokio::test]
async fn test_unrecognized_graphql_error_fails_open() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "marketPricesElectricity": [],
                "marketPricesGas": []
            },
            "errors": [{"message": "something the client has never seen"}]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert!(client.prices(None, None).await.is_ok());
}

// ============================================================================
// Header composition
// ============================================================================

#[tokio::test]
async fn test_json_content_type_and_payload_shape() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/"))
        .and(header("Content-Type", "application/json"))
        .and(header("Accept", "application/json"))
        .and(body_partial_json(json!({"operationName": "MarketPrices"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"marketPricesElectricity": [], "marketPricesGas": []}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.prices(None, None).await.unwrap();
}

#[tokio::test]
async fn test_bearer_token_is_sent_when_authenticated() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/"))
        .and(header("Authorization", "Bearer token-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"userSites": []}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).with_tokens("token-123", "refresh-123");
    client.user_sites().await.unwrap();
}

#[tokio::test]
async fn test_no_authorization_header_without_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"marketPricesElectricity": [], "marketPricesGas": []}
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.prices(None, None).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let has_authorization = requests[0]
        .headers
        .iter()
        .any(|(name, _)| name.as_str().eq_ignore_ascii_case("authorization"));
    assert!(!has_authorization);
}

#[tokio::test]
async fn test_extra_headers_are_applied() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/"))
        .and(header("x-country", "BE"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"marketPrices": {"electricityPrices": [], "gasPrices": []}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.be_prices(None).await.unwrap();
}

// ============================================================================
// Transport failures
// ============================================================================

#[tokio::test]
async fn test_timeout_maps_to_network_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"data": {}}))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let config = ApiConfig::default()
        .with_endpoint(server.uri())
        .with_timeout(Duration::from_millis(100));
    let client = FrankEnergie::with_config(config);

    assert!(matches!(
        client.prices(None, None).await,
        Err(FrankEnergieError::Network(_))
    ));
}

#[tokio::test]
async fn test_connection_failure_maps_to_network_error() {
    // Nothing listens on this port.
    let config = ApiConfig::default().with_endpoint("http://127.0.0.1:1/");
    let client = FrankEnergie::with_config(config);

    assert!(matches!(
        client.prices(None, None).await,
        Err(FrankEnergieError::Network(_))
    ));
}
