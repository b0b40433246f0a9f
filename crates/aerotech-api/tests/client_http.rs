// Client tests against an in-process HTTP stub.
//
// Each stub accepts one connection, records the request line and body, and
// replies with a canned JSON response.

use aerotech_api::{ApiClient, ApiError, MaintenanceApi};
use aerotech_core::models::resources::{Personnel, ResourceKind, ResourceRecord, ToolStatus};
use aerotech_core::models::sprint::SprintStartRequest;
use aerotech_core::models::user::{User, UserFilter, UserRole};
use aerotech_core::models::work_package::{WorkPackagePatch, WorkPackageStatus};
use serde_json::Value;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

// ===========================================================================
// Stub server
// ===========================================================================

#[derive(Debug)]
struct Recorded {
    method: String,
    target: String,
    body: String,
}

impl Recorded {
    fn json(&self) -> Value {
        serde_json::from_str(&self.body).expect("request body is JSON")
    }
}

/// Serve one request with `status` (e.g. "200 OK") and `body`. Returns the
/// API base URL and a handle resolving to the recorded request.
async fn stub(status: &'static str, body: &'static str) -> (String, JoinHandle<Recorded>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();

        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        let header_end = loop {
            let n = socket.read(&mut chunk).await.unwrap();
            assert!(n > 0, "client closed before sending headers");
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = find(&buf, b"\r\n\r\n") {
                break pos + 4;
            }
        };

        let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
        let content_length = head
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                name.eq_ignore_ascii_case("content-length")
                    .then(|| value.trim().parse::<usize>().ok())
                    .flatten()
            })
            .unwrap_or(0);

        while buf.len() < header_end + content_length {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
        }

        let mut request_line = head.lines().next().unwrap_or_default().split_whitespace();
        let method = request_line.next().unwrap_or_default().to_string();
        let target = request_line.next().unwrap_or_default().to_string();
        let request_body = String::from_utf8_lossy(&buf[header_end..]).to_string();

        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.flush().await.unwrap();

        Recorded {
            method,
            target,
            body: request_body,
        }
    });

    (format!("http://{addr}/api"), handle)
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

// ===========================================================================
// Reads
// ===========================================================================

#[tokio::test]
async fn users_sends_filters_and_unwraps_envelope() {
    let (base, server) = stub(
        "200 OK",
        r#"{"users":[{"id":"u1","name":"Ayse","role":"lead","device_type":"desktop"}]}"#,
    )
    .await;
    let client = ApiClient::new(&base).unwrap();

    let filter = UserFilter {
        role: Some("lead".into()),
        device_type: Some("desktop".into()),
    };
    let users = client.users(&filter).await.unwrap();
    let req = server.await.unwrap();

    assert_eq!(req.method, "GET");
    assert_eq!(req.target, "/api/users?role=lead&device_type=desktop");
    assert_eq!(users.len(), 1);
    assert!(users[0].role.is_lead());
}

#[tokio::test]
async fn unfiltered_users_has_no_query() {
    let (base, server) = stub("200 OK", r#"{"users":[]}"#).await;
    let client = ApiClient::new(&base).unwrap();

    let users = client.users(&UserFilter::default()).await.unwrap();
    let req = server.await.unwrap();

    assert_eq!(req.target, "/api/users");
    assert!(users.is_empty());
}

#[tokio::test]
async fn missing_envelope_key_is_empty_list() {
    let (base, server) = stub("200 OK", r#"{"count":0}"#).await;
    let client = ApiClient::new(&base).unwrap();

    let tools = client.tools().await.unwrap();
    let req = server.await.unwrap();

    assert_eq!(req.target, "/api/resources/tools");
    assert!(tools.is_empty());
}

#[tokio::test]
async fn monthly_efficiency_unwraps_monthly() {
    let (base, server) = stub(
        "200 OK",
        r#"{"monthly":[{"month":"2026-08","completed":12,"planned":15},{"month":"2026-09","completed":14,"planned":14}]}"#,
    )
    .await;
    let client = ApiClient::new(&base).unwrap();

    let months = client.efficiency_monthly().await.unwrap();
    let req = server.await.unwrap();

    assert_eq!(req.target, "/api/efficiency/monthly");
    assert_eq!(months.len(), 2);
    assert_eq!(months[1].month, "2026-09");
}

#[tokio::test]
async fn null_answer_reads_as_empty_string() {
    let (base, server) = stub("200 OK", r#"{"answer":null,"part_diagram":null}"#).await;
    let client = ApiClient::new(&base).unwrap();

    let answer = client.ask("What torque for the trim actuator bolts?").await.unwrap();
    let req = server.await.unwrap();

    assert_eq!(req.method, "POST");
    assert_eq!(req.target, "/api/qa");
    assert_eq!(req.json()["question"], "What torque for the trim actuator bolts?");
    assert_eq!(answer.answer, "");
    assert!(answer.part_diagram.is_none());
}

#[tokio::test]
async fn user_work_packages_encodes_id() {
    let (base, server) = stub("200 OK", r#"{"work_packages":[{"id":"WP-7","title":"Aileron hinge","status":"in_progress"}]}"#).await;
    let client = ApiClient::new(&base).unwrap();

    let packages = client.user_work_packages("tech 01").await.unwrap();
    let req = server.await.unwrap();

    assert_eq!(req.target, "/api/users/tech%2001/work-packages");
    assert_eq!(packages[0].status, WorkPackageStatus::InProgress);
}

// ===========================================================================
// Single records (called through the trait the orchestrator uses)
// ===========================================================================

#[tokio::test]
async fn single_tool_is_fetched_by_kind_and_encoded_id() {
    let (base, server) = stub("200 OK", r#"{"id":"T 1","name":"Torque wrench","status":"in_use"}"#).await;
    let client = ApiClient::new(&base).unwrap();

    let record = MaintenanceApi::resource(&client, ResourceKind::Tools, "T 1").await.unwrap();
    let req = server.await.unwrap();

    assert_eq!(req.method, "GET");
    assert_eq!(req.target, "/api/resources/tools/T%201");
    match record {
        ResourceRecord::Tool(tool) => {
            assert_eq!(tool.name, "Torque wrench");
            assert_eq!(tool.status, ToolStatus::InUse);
        }
        other => panic!("expected a tool, got {other:?}"),
    }
}

#[tokio::test]
async fn single_work_package_is_fetched_by_encoded_id() {
    let (base, server) = stub("200 OK", r#"{"id":"WP/7","title":"Aileron hinge","status":"approved"}"#).await;
    let client = ApiClient::new(&base).unwrap();

    let wp = MaintenanceApi::work_package(&client, "WP/7").await.unwrap();
    let req = server.await.unwrap();

    assert_eq!(req.method, "GET");
    assert_eq!(req.target, "/api/work-packages/WP%2F7");
    assert_eq!(wp.title, "Aileron hinge");
    assert_eq!(wp.status, WorkPackageStatus::Approved);
}

#[tokio::test]
async fn single_user_is_fetched_by_encoded_id() {
    let (base, server) = stub("200 OK", r#"{"id":"tech 02","name":"Deniz","role":"technician"}"#).await;
    let client = ApiClient::new(&base).unwrap();

    let user = MaintenanceApi::user(&client, "tech 02").await.unwrap();
    let req = server.await.unwrap();

    assert_eq!(req.method, "GET");
    assert_eq!(req.target, "/api/users/tech%2002");
    assert_eq!(user.name, "Deniz");
    assert_eq!(user.role, UserRole::Technician);
}

fn deniz() -> User {
    User {
        id: "tech 02".into(),
        name: "Deniz".into(),
        role: UserRole::Technician,
        device_type: Some("mobile".into()),
    }
}

#[tokio::test]
async fn create_user_posts_to_collection() {
    let (base, server) = stub("201 Created", r#"{"id":"tech 02"}"#).await;
    let client = ApiClient::new(&base).unwrap();

    MaintenanceApi::create_user(&client, &deniz()).await.unwrap();
    let req = server.await.unwrap();

    assert_eq!(req.method, "POST");
    assert_eq!(req.target, "/api/users");
    let body = req.json();
    assert_eq!(body["name"], "Deniz");
    assert_eq!(body["role"], "technician");
    assert_eq!(body["device_type"], "mobile");
}

#[tokio::test]
async fn update_user_puts_to_encoded_id() {
    let (base, server) = stub("200 OK", r#"{"ok":true}"#).await;
    let client = ApiClient::new(&base).unwrap();

    MaintenanceApi::update_user(&client, "tech 02", &deniz()).await.unwrap();
    let req = server.await.unwrap();

    assert_eq!(req.method, "PUT");
    assert_eq!(req.target, "/api/users/tech%2002");
    assert_eq!(req.json()["id"], "tech 02");
}

#[tokio::test]
async fn delete_user_targets_encoded_id() {
    let (base, server) = stub("200 OK", "").await;
    let client = ApiClient::new(&base).unwrap();

    MaintenanceApi::delete_user(&client, "tech/02").await.unwrap();
    let req = server.await.unwrap();

    assert_eq!(req.method, "DELETE");
    assert_eq!(req.target, "/api/users/tech%2F02");
}

// ===========================================================================
// Writes
// ===========================================================================

#[tokio::test]
async fn start_sprint_sends_nulls_for_blank_fields() {
    let (base, server) = stub("200 OK", r#"{"status":"active"}"#).await;
    let client = ApiClient::new(&base).unwrap();

    let request = SprintStartRequest::new("Sprint 12", "", "  ", "", None, 14);
    client.start_sprint(&request).await.unwrap();
    let req = server.await.unwrap();

    assert_eq!(req.target, "/api/sprint/start");
    let body = req.json();
    assert_eq!(body["name"], "Sprint 12");
    assert!(body["goal"].is_null());
    assert!(body["start_date"].is_null());
    assert!(body["end_date"].is_null());
    assert_eq!(body["duration_days"], 14);
}

#[tokio::test]
async fn status_move_sends_only_status() {
    let (base, server) = stub("200 OK", r#"{"ok":true}"#).await;
    let client = ApiClient::new(&base).unwrap();

    let patch = WorkPackagePatch::status(WorkPackageStatus::Approved);
    client.update_work_package("WP/42", &patch).await.unwrap();
    let req = server.await.unwrap();

    assert_eq!(req.method, "PUT");
    assert_eq!(req.target, "/api/work-packages/WP%2F42");
    assert_eq!(req.json(), serde_json::json!({"status": "approved"}));
}

#[tokio::test]
async fn create_personnel_posts_to_collection() {
    let (base, server) = stub("201 Created", r#"{"id":"P-9"}"#).await;
    let client = ApiClient::new(&base).unwrap();

    let record = ResourceRecord::Personnel(Personnel {
        id: "P-9".into(),
        name: "Mehmet".into(),
        role: "B1 Technician".into(),
        ratings: vec!["A320".into()],
        shift: "day".into(),
        availability: "available".into(),
        ..Default::default()
    });
    client.create_resource(&record).await.unwrap();
    let req = server.await.unwrap();

    assert_eq!(req.method, "POST");
    assert_eq!(req.target, "/api/resources/personnel");
    assert_eq!(req.json()["ratings"][0], "A320");
}

#[tokio::test]
async fn delete_with_empty_body_succeeds() {
    let (base, server) = stub("200 OK", "").await;
    let client = ApiClient::new(&base).unwrap();

    client.delete_resource(ResourceKind::Parts, "PRT-3").await.unwrap();
    let req = server.await.unwrap();

    assert_eq!(req.method, "DELETE");
    assert_eq!(req.target, "/api/resources/parts/PRT-3");
}

#[tokio::test]
async fn sprint_plan_decodes_operation() {
    let (base, server) = stub(
        "200 OK",
        r#"{"operation":"create_items","created":["B-1","B-2"],"backlog_size":9}"#,
    )
    .await;
    let client = ApiClient::new(&base).unwrap();

    let result = client.sprint_plan("add two inspection tasks").await.unwrap();
    let req = server.await.unwrap();

    assert_eq!(req.json()["request"], "add two inspection tasks");
    assert!(result.mutates_backlog());
    assert_eq!(result.created, vec!["B-1", "B-2"]);
}

// ===========================================================================
// Errors
// ===========================================================================

#[tokio::test]
async fn detail_string_becomes_error_message() {
    let (base, server) = stub("404 Not Found", r#"{"detail":"Work package not found"}"#).await;
    let client = ApiClient::new(&base).unwrap();

    let err = client.delete_work_package("WP-404").await.unwrap_err();
    let _ = server.await;

    match err {
        ApiError::Status { status, message } => {
            assert_eq!(status.as_u16(), 404);
            assert_eq!(message, "Work package not found");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn validation_detail_list_is_joined() {
    let (base, server) = stub(
        "422 Unprocessable Entity",
        r#"{"detail":[{"msg":"field required"},{"msg":"invalid date"}]}"#,
    )
    .await;
    let client = ApiClient::new(&base).unwrap();

    let err = client.end_sprint().await.unwrap_err();
    let _ = server.await;

    assert_eq!(err.to_string(), "field required; invalid date");
}

#[tokio::test]
async fn bare_failure_uses_operation_fallback() {
    let (base, server) = stub("500 Internal Server Error", "{}").await;
    let client = ApiClient::new(&base).unwrap();

    let err = client.scrum_dashboard().await.unwrap_err();
    let _ = server.await;

    assert_eq!(err.to_string(), "Scrum dashboard fetch failed (500)");
}

#[tokio::test]
async fn connection_refused_is_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = ApiClient::new(&format!("http://{addr}/api")).unwrap();
    let err = client.sprint_state().await.unwrap_err();

    assert!(matches!(err, ApiError::Transport(_)));
}
