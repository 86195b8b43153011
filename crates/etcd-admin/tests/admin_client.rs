//! Exercises `EtcdAdminClient` against an in-process stand-in for the etcd
//! members API.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get};
use axum::{Json, Router};
use proven_etcd_admin::{AdminClientOptions, EtcdAdminClient};
use proven_etcd_membership::{AdminApi, AdminError, AdminOperation, Member};
use serde_json::{Value, json};
use tokio::net::TcpListener;

#[derive(Clone, Default)]
struct Recorder {
    added: Arc<Mutex<Vec<Value>>>,
    removed: Arc<Mutex<Vec<String>>>,
}

async fn serve(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    format!("http://{addr}")
}

fn client() -> EtcdAdminClient {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    EtcdAdminClient::new(&AdminClientOptions {
        timeout: Duration::from_millis(500),
        ..AdminClientOptions::default()
    })
    .unwrap()
}

fn at(client_url: &str) -> Member {
    Member::expected("i-healthy", client_url, "http://127.0.0.1:2380")
}

async fn health_with(status: StatusCode, body: &'static str) -> bool {
    let url = serve(Router::new().route("/health", get(move || async move { (status, body) }))).await;

    client().check_health(&at(&url)).await
}

#[tokio::test]
async fn healthy_payload_is_healthy() {
    assert!(health_with(StatusCode::OK, r#"{"health":"true","reason":""}"#).await);
}

#[tokio::test]
async fn unhealthy_payload_is_not_healthy() {
    assert!(!health_with(StatusCode::OK, r#"{"health":"false"}"#).await);
}

#[tokio::test]
async fn malformed_payload_is_not_healthy() {
    assert!(!health_with(StatusCode::OK, "starting up").await);
    assert!(!health_with(StatusCode::OK, r#"{"health":true}"#).await);
}

#[tokio::test]
async fn error_status_is_not_healthy() {
    assert!(!health_with(StatusCode::SERVICE_UNAVAILABLE, r#"{"health":"true"}"#).await);
}

#[tokio::test]
async fn unreachable_member_is_not_healthy() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    assert!(!client().check_health(&at(&format!("http://{addr}"))).await);
}

#[tokio::test]
async fn slow_member_times_out_as_unhealthy() {
    let url = serve(Router::new().route(
        "/health",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            r#"{"health":"true"}"#
        }),
    ))
    .await;

    assert!(!client().check_health(&at(&url)).await);
}

#[tokio::test]
async fn lists_members_keeping_first_urls() {
    let url = serve(Router::new().route(
        "/v2/members",
        get(|| async {
            Json(json!({"members": [
                {
                    "id": "8e9e05c52164694d",
                    "name": "i-a",
                    "clientURLs": ["http://10.0.0.1:2379", "http://127.0.0.1:2379"],
                    "peerURLs": ["http://10.0.0.1:2380"]
                },
                {
                    "id": "91bc3c398fb3c146",
                    "name": "",
                    "clientURLs": [],
                    "peerURLs": ["http://10.0.0.2:2380"]
                }
            ]}))
        }),
    ))
    .await;

    let roster = client().list_members(&at(&url)).await.unwrap();

    assert_eq!(roster.len(), 2);
    let first = roster.get("i-a").unwrap();
    assert_eq!(first.id, "8e9e05c52164694d");
    assert_eq!(first.client_url, "http://10.0.0.1:2379");
    assert_eq!(first.peer_url, "http://10.0.0.1:2380");
    assert_eq!(roster.members()[1].client_url, "");
}

#[tokio::test]
async fn list_failure_is_a_failed_request() {
    let url = serve(Router::new().route(
        "/v2/members",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
    ))
    .await;

    let result = client().list_members(&at(&url)).await;

    assert!(matches!(
        result,
        Err(AdminError::RequestFailed {
            operation: AdminOperation::List,
            ..
        })
    ));
}

#[tokio::test]
async fn undecodable_member_list_is_a_failed_request() {
    let url = serve(Router::new().route("/v2/members", get(|| async { "not json" }))).await;

    assert!(client().list_members(&at(&url)).await.is_err());
}

#[tokio::test]
async fn adds_member_with_name_and_peer_url() {
    let recorder = Recorder::default();
    let router = Router::new()
        .route(
            "/v2/members",
            axum::routing::post(
                |State(recorder): State<Recorder>, Json(body): Json<Value>| async move {
                    recorder.added.lock().unwrap().push(body);
                    StatusCode::CREATED
                },
            ),
        )
        .with_state(recorder.clone());
    let url = serve(router).await;

    let new_member = Member::expected("i-b", "http://10.0.0.2:2379", "http://10.0.0.2:2380");
    client().add_member(&at(&url), &new_member).await.unwrap();

    assert_eq!(
        *recorder.added.lock().unwrap(),
        vec![json!({"name": "i-b", "peerURLs": ["http://10.0.0.2:2380"]})]
    );
}

#[tokio::test]
async fn rejected_add_is_a_failed_request() {
    let url = serve(Router::new().route(
        "/v2/members",
        axum::routing::post(|| async { StatusCode::CONFLICT }),
    ))
    .await;

    let new_member = Member::expected("i-b", "", "http://10.0.0.2:2380");
    let result = client().add_member(&at(&url), &new_member).await;

    assert!(matches!(
        result,
        Err(AdminError::RequestFailed {
            operation: AdminOperation::Add,
            ..
        })
    ));
}

#[tokio::test]
async fn removes_member_by_id() {
    let recorder = Recorder::default();
    let router = Router::new()
        .route(
            "/v2/members/{id}",
            delete(
                |State(recorder): State<Recorder>, Path(id): Path<String>| async move {
                    recorder.removed.lock().unwrap().push(id);
                    StatusCode::NO_CONTENT
                },
            ),
        )
        .with_state(recorder.clone());
    let url = serve(router).await;

    let victim = Member {
        id: "91bc3c398fb3c146".to_string(),
        name: "i-stale".to_string(),
        client_url: String::new(),
        peer_url: "http://10.0.0.9:2380".to_string(),
    };
    client().remove_member(&at(&url), &victim).await.unwrap();

    assert_eq!(
        *recorder.removed.lock().unwrap(),
        vec!["91bc3c398fb3c146".to_string()]
    );
}

#[tokio::test]
async fn removal_requires_cluster_id() {
    let recorder = Recorder::default();
    let router = Router::new()
        .route(
            "/v2/members/{id}",
            delete(
                |State(recorder): State<Recorder>, Path(id): Path<String>| async move {
                    recorder.removed.lock().unwrap().push(id);
                    StatusCode::NO_CONTENT
                },
            ),
        )
        .with_state(recorder.clone());
    let url = serve(router).await;

    let victim = Member::expected("i-stale", "", "http://10.0.0.9:2380");
    let result = client().remove_member(&at(&url), &victim).await;

    assert!(matches!(result, Err(AdminError::MissingMemberId(name)) if name == "i-stale"));
    assert!(recorder.removed.lock().unwrap().is_empty());
}
