// tests/pool_check_tests.rs
use lb_pool_check::config::{CheckConfig, PartialConfig, RetryConfig};
use lb_pool_check::health::Status;
use lb_pool_check::probe;
use serde_json::json;

const POOL_PATH: &str = "/mgmt/tm/ltm/pool/~Common~pool1/stats";
const MEMBERS_PATH: &str = "/mgmt/tm/ltm/pool/~Common~pool1/members/stats";
// monitor:secret
const AUTHORIZATION: &str = "Basic bW9uaXRvcjpzZWNyZXQ=";

fn config(host: String, overlay: PartialConfig) -> CheckConfig {
    PartialConfig {
        host: Some(host),
        user: Some("monitor".to_string()),
        password: Some("secret".to_string()),
        pool: Some("pool1".to_string()),
        warning: Some(40.0),
        critical: Some(80.0),
        timeout_secs: Some(5),
        ..PartialConfig::default()
    }
    .merge(overlay)
    .build()
    .unwrap()
}

fn pool_stats(availability: &str, active: u64, total: u64, current: u64, max: u64) -> String {
    json!({
        "kind": "tm:ltm:pool:poolstats",
        "selfLink": "https://localhost/mgmt/tm/ltm/pool/~Common~pool1/stats?ver=13.1.0",
        "entries": {
            "https://localhost/mgmt/tm/ltm/pool/~Common~pool1/stats": {
                "nestedStats": {
                    "entries": {
                        "activeMemberCnt": { "value": active },
                        "memberCnt": { "value": total },
                        "serverside.curConns": { "value": current },
                        "serverside.maxConns": { "value": max },
                        "status.availabilityState": { "description": availability },
                        "status.enabledState": { "description": "enabled" },
                        "tmName": { "description": "/Common/pool1" }
                    }
                }
            }
        }
    })
    .to_string()
}

fn member_stats() -> String {
    json!({
        "kind": "tm:ltm:pool:members:membersstats",
        "entries": {
            "https://localhost/mgmt/tm/ltm/pool/~Common~pool1/members/~Common~web01:80/stats": {
                "nestedStats": { "entries": {
                    "nodeName": { "description": "/Common/web01" },
                    "serverside.curConns": { "value": 30 }
                } }
            },
            "https://localhost/mgmt/tm/ltm/pool/~Common~pool1/members/~Common~web02:80/stats": {
                "nestedStats": { "entries": {
                    "nodeName": { "description": "/Common/web02" },
                    "serverside.curConns": { "value": 20 }
                } }
            }
        }
    })
    .to_string()
}

#[tokio::test]
async fn test_inactive_members_and_warning_load() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", POOL_PATH)
        .match_header("authorization", AUTHORIZATION)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(pool_stats("available", 3, 4, 50, 100))
        .create_async()
        .await;

    let report = probe::run(&config(server.url(), PartialConfig::default())).await;

    mock.assert_async().await;
    assert_eq!(report.status, Status::Warning);
    assert_eq!(report.exit_code(), 1);
    assert_eq!(
        report.to_string(),
        "WARNING -- 'pool1' active members is less than total members. \
         -- 'pool1' current connections are over 40% of pool maximum"
    );
}

#[tokio::test]
async fn test_critical_load_with_inactive_members() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", POOL_PATH)
        .with_status(200)
        .with_body(pool_stats("available", 3, 4, 85, 100))
        .create_async()
        .await;

    let report = probe::run(&config(server.url(), PartialConfig::default())).await;

    assert_eq!(report.status, Status::Critical);
    assert!(report.message.contains("active members is less than total members."));
    assert!(report.message.contains("current connections are over 80% of pool maximum"));
}

#[tokio::test]
async fn test_offline_pool() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", POOL_PATH)
        .with_status(200)
        .with_body(pool_stats("offline", 4, 4, 0, 100))
        .create_async()
        .await;

    let report = probe::run(&config(server.url(), PartialConfig::default())).await;

    assert_eq!(report.to_string(), "CRITICAL -- 'pool1' pool is not available");
    assert_eq!(report.exit_code(), 2);
}

#[tokio::test]
async fn test_healthy_pool_verbose() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", POOL_PATH)
        .with_status(200)
        .with_body(pool_stats("available", 4, 4, 12, 100))
        .create_async()
        .await;
    let overlay = PartialConfig {
        verbose: Some(true),
        ..PartialConfig::default()
    };

    let report = probe::run(&config(server.url(), overlay)).await;

    assert_eq!(
        report.to_string(),
        "OK -- ( active:4, total:4 ) --  (12 / 100)"
    );
    assert_eq!(report.exit_code(), 0);
}

#[tokio::test]
async fn test_member_breakdown() {
    let mut server = mockito::Server::new_async().await;
    let _pool = server
        .mock("GET", POOL_PATH)
        .with_status(200)
        .with_body(pool_stats("available", 2, 2, 50, 1000))
        .create_async()
        .await;
    let members = server
        .mock("GET", MEMBERS_PATH)
        .match_header("authorization", AUTHORIZATION)
        .with_status(200)
        .with_body(member_stats())
        .create_async()
        .await;
    let overlay = PartialConfig {
        members: Some(true),
        ..PartialConfig::default()
    };

    let report = probe::run(&config(server.url(), overlay)).await;

    members.assert_async().await;
    assert_eq!(report.status, Status::Ok);
    assert_eq!(report.to_string(), "OK -- pool1\n\tweb01: 30\n\tweb02: 20");
}

#[tokio::test]
async fn test_member_fetch_failure_is_unknown() {
    let mut server = mockito::Server::new_async().await;
    let _pool = server
        .mock("GET", POOL_PATH)
        .with_status(200)
        .with_body(pool_stats("available", 2, 2, 0, 100))
        .create_async()
        .await;
    let _members = server
        .mock("GET", MEMBERS_PATH)
        .with_status(404)
        .create_async()
        .await;
    let overlay = PartialConfig {
        members: Some(true),
        ..PartialConfig::default()
    };

    let report = probe::run(&config(server.url(), overlay)).await;

    assert_eq!(report.status, Status::Unknown);
    assert_eq!(report.exit_code(), 3);
}

#[tokio::test]
async fn test_non_json_body() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", POOL_PATH)
        .with_status(200)
        .with_body("<html>login required</html>")
        .create_async()
        .await;

    let report = probe::run(&config(server.url(), PartialConfig::default())).await;

    assert_eq!(report.to_string(), "UNKNOWN -- No JSON object could be decoded");
}

#[tokio::test]
async fn test_unexpected_payload_is_unknown() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", POOL_PATH)
        .with_status(200)
        .with_body(r#"{"entries": {}}"#)
        .create_async()
        .await;

    let report = probe::run(&config(server.url(), PartialConfig::default())).await;

    assert_eq!(report.status, Status::Unknown);
    assert!(report.message.starts_with(" -- an error occurred"));
}

#[tokio::test]
async fn test_unauthorized_is_not_retried() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", POOL_PATH)
        .with_status(401)
        .expect(1)
        .create_async()
        .await;
    let overlay = PartialConfig {
        retry: Some(RetryConfig {
            max_attempts: 3,
            backoff_base_ms: 1,
            backoff_max_ms: 5,
        }),
        ..PartialConfig::default()
    };

    let report = probe::run(&config(server.url(), overlay)).await;

    mock.assert_async().await;
    assert_eq!(report.status, Status::Unknown);
    assert!(report.message.contains("401"));
}

#[tokio::test]
async fn test_unavailable_api_is_retried() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", POOL_PATH)
        .with_status(503)
        .expect(2)
        .create_async()
        .await;
    let overlay = PartialConfig {
        retry: Some(RetryConfig {
            max_attempts: 2,
            backoff_base_ms: 1,
            backoff_max_ms: 5,
        }),
        ..PartialConfig::default()
    };

    let report = probe::run(&config(server.url(), overlay)).await;

    mock.assert_async().await;
    assert_eq!(report.status, Status::Unknown);
}

#[tokio::test]
async fn test_unreachable_host_is_unknown() {
    // Nothing listens on the discard port.
    let report = probe::run(&config(
        "http://127.0.0.1:9".to_string(),
        PartialConfig::default(),
    ))
    .await;

    assert_eq!(report.status, Status::Unknown);
    assert!(report.message.starts_with(" -- an error occurred"));
}
