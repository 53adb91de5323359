//! End-to-end registration flow against a mocked registry.

use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use nameport_client::pipeline::{FailureKind, RegistrationPipeline, RegistrationState};
use nameport_client::registrar::RegistrarClient;
use nameport_client::{Identity, Session};
use nameport_core::{NameKey, WalletAddress};
use nameport_integration_tests::{test_config, TEST_WALLET};

fn signed_in_session() -> Session {
    let mut session = Session::new();
    session.set_identity(Identity::new(
        WalletAddress::parse_evm(TEST_WALLET).expect("test wallet should parse"),
    ));
    session
}

async fn mount_availability_and_options(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/partner/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"sld": "alice", "tld": "core", "status": "available", "usdPrice": "4.99"}
        ])))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/partner/recommendations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "pageItems": [
                {"sld": "alicehq", "tld": "core", "status": "available", "usdPrice": "2.99"}
            ]
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/partner/payment/options"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "options": [
                {"chainId": 1116, "contractAddress": "0xcontract",
                 "tokenAddress": "0x0000000000000000000000000000000000000000",
                 "symbol": "CORE", "price": "12"}
            ]
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn full_registration_happy_path() {
    let server = MockServer::start().await;
    mount_availability_and_options(&server).await;

    Mock::given(method("POST"))
        .and(path("/partner/order"))
        .and(body_partial_json(json!({
            "buyer": TEST_WALLET,
            "names": [{"sld": "alice", "tld": "core", "autoRenew": false, "domainLength": 5}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "order-77"})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/partner/mint"))
        .and(body_partial_json(json!({
            "sld": "alice",
            "tld": "core",
            "user": {"wallet": TEST_WALLET, "email": ""}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "42", "chainId": 1116, "contractAddress": "0xcontract"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let registrar = RegistrarClient::new(&test_config(&server));
    let mut pipeline = RegistrationPipeline::new(registrar);
    let mut session = signed_in_session();

    pipeline.check_availability("alice", "core").await.unwrap();
    assert_eq!(pipeline.state(), RegistrationState::Available);
    assert_eq!(pipeline.recommendations().len(), 1);

    pipeline.request_payment_options().await.unwrap();
    pipeline.select_payment_option(0).unwrap();

    pipeline.place_order(&session).await.unwrap();
    assert_eq!(pipeline.order_receipt().unwrap().order_id, "order-77");

    pipeline.mint(&mut session).await.unwrap();
    assert_eq!(pipeline.state(), RegistrationState::Minted);
    assert_eq!(pipeline.mint_receipt().unwrap().token_id, "42");
    assert_eq!(
        session.identity().unwrap().registered_names(),
        &[NameKey::parse("alice.core").unwrap()]
    );
}

#[tokio::test]
async fn mint_failure_parks_pipeline_and_keeps_order() {
    let server = MockServer::start().await;
    mount_availability_and_options(&server).await;

    Mock::given(method("POST"))
        .and(path("/partner/order"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "order-88"})))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/partner/mint"))
        .respond_with(ResponseTemplate::new(500).set_body_string("mint backend down"))
        .mount(&server)
        .await;

    let registrar = RegistrarClient::new(&test_config(&server));
    let mut pipeline = RegistrationPipeline::new(registrar);
    let mut session = signed_in_session();

    pipeline.check_availability("alice", "core").await.unwrap();
    pipeline.request_payment_options().await.unwrap();
    pipeline.select_payment_option(0).unwrap();
    pipeline.place_order(&session).await.unwrap();

    pipeline.mint(&mut session).await.unwrap_err();

    assert_eq!(
        pipeline.state(),
        RegistrationState::Failed(FailureKind::Mint)
    );
    // The order is not rolled back; its id stays readable for recovery.
    assert_eq!(pipeline.order_receipt().unwrap().order_id, "order-88");
    assert!(session.identity().unwrap().registered_names().is_empty());
}

#[tokio::test]
async fn unavailable_name_stops_before_payment() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/partner/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"sld": "taken", "tld": "core", "status": "registered"}
        ])))
        .mount(&server)
        .await;

    let registrar = RegistrarClient::new(&test_config(&server));
    let mut pipeline = RegistrationPipeline::new(registrar);

    pipeline.check_availability("taken", "core").await.unwrap();
    assert_eq!(pipeline.state(), RegistrationState::Unavailable);

    let err = pipeline.request_payment_options().await.unwrap_err();
    assert!(err.to_string().contains("not valid"));
}
