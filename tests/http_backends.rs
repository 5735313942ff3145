//! HTTP backends against mock servers: IPFS, ledger REST and the wallet bridge.

use serde_json::json;
use wiremock::matchers::{basic_auth, body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use anonex_client::config::{NetworkConfig, ProgramsConfig, StorageConfig};
use anonex_client::content::{ContentError, ContentStore, IpfsClient};
use anonex_client::network::{LedgerClient, NetworkError, ProgramQueries};
use anonex_client::wallet::{
    BridgeWallet, ConnectRequest, DecryptPermission, Transition, WalletAdapter, WalletError,
    WalletTransaction,
};

fn storage(server: &MockServer, credentials: bool) -> StorageConfig {
    StorageConfig {
        gateway: format!("{}/ipfs/", server.uri()),
        api_url: server.uri(),
        project_id: credentials.then(|| "project".to_string()),
        project_secret: credentials.then(|| "secret".to_string()),
        timeout_secs: 5,
        pin_after_upload: false,
    }
}

fn network(primary: &MockServer, failover: Option<&MockServer>) -> NetworkConfig {
    NetworkConfig {
        rpc_url: primary.uri(),
        failover_urls: failover.map(|s| vec![s.uri()]).unwrap_or_default(),
        rpc_timeout_secs: 5,
    }
}

// ---- IPFS ----

#[tokio::test]
async fn test_ipfs_upload_with_auth_and_string_size() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v0/add"))
        .and(basic_auth("project", "secret"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "Hash": "QmTest", "Size": "128" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = IpfsClient::new(&storage(&server, true)).unwrap();
    let result = client.upload(b"{\"version\":1}".to_vec()).await.unwrap();

    assert_eq!(result.address, "QmTest");
    assert_eq!(result.size, 128);
    assert_eq!(result.url, format!("{}/ipfs/QmTest", server.uri()));
}

#[tokio::test]
async fn test_ipfs_upload_failure_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v0/add"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = IpfsClient::new(&storage(&server, false)).unwrap();
    let err = client.upload(b"bytes".to_vec()).await.unwrap_err();
    assert!(matches!(err, ContentError::StorageUploadFailed(_)));
}

#[tokio::test]
async fn test_ipfs_fetch_through_gateway() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ipfs/QmTest"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"stored".to_vec()))
        .mount(&server)
        .await;

    let client = IpfsClient::new(&storage(&server, false)).unwrap();
    assert_eq!(client.fetch("QmTest").await.unwrap(), b"stored");

    let err = client.fetch("QmMissing").await.unwrap_err();
    assert!(matches!(err, ContentError::Fetch(_)));
}

#[tokio::test]
async fn test_ipfs_pin_and_unpin() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v0/pin/add"))
        .and(query_param("arg", "QmTest"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "Pins": ["QmTest"] })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v0/pin/rm"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = IpfsClient::new(&storage(&server, false)).unwrap();
    assert!(client.pin("QmTest").await.unwrap());
    assert!(!client.unpin("QmTest").await.unwrap());
}

// ---- Ledger ----

#[tokio::test]
async fn test_ledger_block_height() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/latest/block/height"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(123456)))
        .mount(&server)
        .await;

    let client = LedgerClient::new(&network(&server, None)).unwrap();
    assert_eq!(client.latest_block_height().await.unwrap(), 123456);
}

#[tokio::test]
async fn test_missing_mapping_value_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/program/anonex_post.aleo/mapping/posts/9field"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = LedgerClient::new(&network(&server, None)).unwrap();
    let value = client
        .mapping_value("anonex_post.aleo", "posts", "9field")
        .await
        .unwrap();
    assert!(value.is_none());
}

#[tokio::test]
async fn test_ledger_fails_over_on_server_error() {
    let primary = MockServer::start().await;
    let backup = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&primary)
        .await;
    Mock::given(method("GET"))
        .and(path("/latest/block/height"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(42)))
        .expect(1)
        .mount(&backup)
        .await;

    let client = LedgerClient::new(&network(&primary, Some(&backup))).unwrap();
    assert_eq!(client.latest_block_height().await.unwrap(), 42);
}

#[tokio::test]
async fn test_ledger_all_endpoints_failed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let client = LedgerClient::new(&network(&server, None)).unwrap();
    let err = client.latest_block_height().await.unwrap_err();
    assert!(matches!(err, NetworkError::AllEndpointsFailed(_)));
}

#[tokio::test]
async fn test_program_queries_parse_counts() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/program/anonex_reaction.aleo/mapping/like_counts/5field"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!("17u64")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/program/anonex_identity.aleo/mapping/verified_users/3field"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!("true")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/program/anonex_follow.aleo/mapping/follower_counts/8field"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(null)))
        .mount(&server)
        .await;

    let queries = ProgramQueries::new(
        LedgerClient::new(&network(&server, None)).unwrap(),
        ProgramsConfig::default(),
    );
    assert_eq!(queries.like_count("5field").await.unwrap(), 17);
    assert!(queries.is_verified("3field").await.unwrap());
    assert_eq!(queries.follower_count("8field").await.unwrap(), 0);
    assert_eq!(queries.member_count("1field").await.unwrap(), 0);
}

// ---- Wallet bridge ----

fn connect_request() -> ConnectRequest {
    ConnectRequest {
        decrypt_permission: DecryptPermission::UponRequest,
        network: "testnetbeta".to_string(),
        programs: ProgramsConfig::default().all(),
    }
}

#[tokio::test]
async fn test_bridge_connect() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "jsonrpc": "2.0",
            "method": "connect",
            "params": { "decryptPermission": "UponRequest", "network": "testnetbeta" }
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "jsonrpc": "2.0", "id": 1, "result": { "address": "aleo1bridge" } })),
        )
        .mount(&server)
        .await;

    let bridge = BridgeWallet::new("Bridge Wallet", server.uri(), 5).unwrap();
    assert_eq!(bridge.connect(&connect_request()).await.unwrap(), "aleo1bridge");
}

#[tokio::test]
async fn test_bridge_user_rejection() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": { "code": 4001, "message": "User rejected the request" }
        })))
        .mount(&server)
        .await;

    let bridge = BridgeWallet::new("Bridge Wallet", server.uri(), 5).unwrap();
    assert_eq!(
        bridge.connect(&connect_request()).await.unwrap_err(),
        WalletError::UserRejected("User rejected the request".to_string())
    );
}

#[tokio::test]
async fn test_bridge_missing_capability() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": { "code": -32601, "message": "Method not found" }
        })))
        .mount(&server)
        .await;

    let bridge = BridgeWallet::new("Bridge Wallet", server.uri(), 5).unwrap();
    let err = bridge.sign_message(b"hello").await.unwrap_err();
    assert_eq!(err.to_string(), "Wallet does not support message signing");
}

#[tokio::test]
async fn test_bridge_request_transaction() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "method": "requestTransaction",
            "params": { "address": "aleo1bridge", "chainId": "testnetbeta", "fee": 100000 }
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "jsonrpc": "2.0", "id": 1, "result": "at1bridgetx" })),
        )
        .mount(&server)
        .await;

    let transaction = WalletTransaction {
        address: "aleo1bridge".to_string(),
        chain_id: "testnetbeta".to_string(),
        transitions: vec![Transition {
            program: "anonex_follow.aleo".to_string(),
            function_name: "follow_user".to_string(),
            inputs: vec!["5field".to_string(), "1700000000u64".to_string()],
        }],
        fee: 100_000,
        private_fee: false,
    };

    let bridge = BridgeWallet::new("Bridge Wallet", server.uri(), 5).unwrap();
    assert_eq!(bridge.request_transaction(&transaction).await.unwrap(), "at1bridgetx");
}

#[tokio::test]
async fn test_unreachable_bridge_is_unavailable() {
    let bridge = BridgeWallet::new("Bridge Wallet", "http://127.0.0.1:9", 1).unwrap();
    let err = bridge.connect(&connect_request()).await.unwrap_err();
    assert!(matches!(
        err,
        WalletError::WalletUnavailable(_) | WalletError::NetworkTimeout(_)
    ));
}
