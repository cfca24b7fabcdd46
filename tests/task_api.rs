//! HTTP mock tests for the auth and task API facades.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use taskhub_client::models::{
    CreateTaskRequest, GroupRequest, LoginRequest, Priority, RegisterRequest, ResourceId,
    UpdateTaskRequest,
};
use taskhub_client::services::ReqwestTransport;
use taskhub_client::session::{MemoryStore, Session};
use taskhub_client::{AuthApi, ClientError, SessionClient, TaskApi};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct Harness {
    store: Arc<MemoryStore>,
    auth: AuthApi,
    tasks: TaskApi,
}

fn harness(server: &MockServer, access: Option<&str>, refresh: Option<&str>) -> Harness {
    let store = Arc::new(MemoryStore::with_tokens(access, refresh));
    let transport = ReqwestTransport::new(&server.uri(), Duration::from_secs(5)).unwrap();
    let client = Arc::new(SessionClient::with_transport(
        Arc::new(transport),
        Arc::new(Session::new(store.clone())),
    ));
    Harness {
        store,
        auth: AuthApi::new(client.clone()),
        tasks: TaskApi::new(client),
    }
}

fn task_json(id: i64, title: &str, done: bool) -> serde_json::Value {
    json!({
        "id": id,
        "title": title,
        "description": null,
        "priority": "Medium",
        "group": 3,
        "due_date": "2024-01-10",
        "is_complete": done,
        "created_at": "2024-01-01T10:00:00Z",
        "updated_at": "2024-01-02T10:00:00Z"
    })
}

// =============================================================================
// Auth Tests
// =============================================================================

#[tokio::test]
async fn test_login_stores_token_pair() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login/"))
        .and(body_json(json!({ "email": "me@example.com", "password": "hunter2" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "tokens": { "access": "a1", "refresh": "r1" },
            "user": { "id": 9, "email": "me@example.com", "first_name": "Ada" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&server, None, None);
    let user = h
        .auth
        .login(&LoginRequest {
            email: "me@example.com".to_string(),
            password: "hunter2".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(user.id, ResourceId::Number(9));
    let saved = h.store.snapshot();
    assert_eq!(saved.access_token.as_deref(), Some("a1"));
    assert_eq!(saved.refresh_token.as_deref(), Some("r1"));
}

#[tokio::test]
async fn test_register_requires_email_and_password() {
    let server = MockServer::start().await;
    let h = harness(&server, None, None);

    let err = h
        .auth
        .register(&RegisterRequest {
            email: String::new(),
            password: "x".to_string(),
            first_name: None,
            last_name: None,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Invalid(_)));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_check_auth_without_tokens_makes_no_request() {
    let server = MockServer::start().await;
    let h = harness(&server, None, None);

    assert!(h.auth.check_auth().await.unwrap().is_none());
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_check_auth_clears_rejected_session() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/auth/user"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/token/refresh/"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&server, Some("a1"), Some("r1"));
    assert!(h.auth.check_auth().await.unwrap().is_none());
    assert!(h.store.snapshot().is_empty());
}

#[tokio::test]
async fn test_check_auth_returns_user() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/auth/user"))
        .and(header("Authorization", "Bearer a1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "id": "u-1", "email": "me@example.com" })),
        )
        .mount(&server)
        .await;

    let h = harness(&server, Some("a1"), Some("r1"));
    let user = h.auth.check_auth().await.unwrap().unwrap();
    assert_eq!(user.id, ResourceId::Text("u-1".to_string()));
}

#[tokio::test]
async fn test_logout_clears_store_without_request() {
    let server = MockServer::start().await;
    let h = harness(&server, Some("a1"), Some("r1"));

    h.auth.logout().await.unwrap();

    assert!(h.store.snapshot().is_empty());
    assert!(server.received_requests().await.unwrap().is_empty());
}

// =============================================================================
// Task Tests
// =============================================================================

#[tokio::test]
async fn test_list_tasks_by_group_uses_query() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/tasks/"))
        .and(query_param("group", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([task_json(1, "A", false)])))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&server, Some("a1"), Some("r1"));
    let tasks = h.tasks.list_tasks_by_group(&ResourceId::Number(3)).await.unwrap();

    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].group, Some(ResourceId::Number(3)));
}

#[tokio::test]
async fn test_create_task_posts_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/tasks/"))
        .and(body_json(json!({
            "title": "File taxes",
            "priority": "High",
            "due_date": "2024-04-15"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(task_json(2, "File taxes", false)))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&server, Some("a1"), Some("r1"));
    let mut request = CreateTaskRequest::new("File taxes");
    request.priority = Priority::High;
    request.due_date = chrono::NaiveDate::from_ymd_opt(2024, 4, 15);

    let task = h.tasks.create_task(&request).await.unwrap();
    assert_eq!(task.id, ResourceId::Number(2));
}

#[tokio::test]
async fn test_blank_title_is_rejected_locally() {
    let server = MockServer::start().await;
    let h = harness(&server, Some("a1"), Some("r1"));

    let err = h.tasks.create_task(&CreateTaskRequest::new("  ")).await.unwrap_err();

    assert!(matches!(err, ClientError::Invalid(_)));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_update_sends_only_set_fields() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/tasks/2/"))
        .and(body_json(json!({ "title": "Renamed" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(task_json(2, "Renamed", false)))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&server, Some("a1"), Some("r1"));
    let changes = UpdateTaskRequest {
        title: Some("Renamed".to_string()),
        ..Default::default()
    };
    let task = h.tasks.update_task(&ResourceId::Number(2), &changes).await.unwrap();
    assert_eq!(task.title, "Renamed");
}

#[tokio::test]
async fn test_update_can_clear_due_date_and_group() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/tasks/2/"))
        .and(body_json(json!({ "due_date": null, "group": null })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 2,
            "title": "Loose end",
            "group": null,
            "due_date": null,
            "created_at": "2024-01-01T10:00:00Z"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&server, Some("a1"), Some("r1"));
    let changes = UpdateTaskRequest {
        due_date: Some(None),
        group: Some(None),
        ..Default::default()
    };
    let task = h.tasks.update_task(&ResourceId::Number(2), &changes).await.unwrap();

    assert_eq!(task.due_date, None);
    assert_eq!(task.group, None);
}

#[tokio::test]
async fn test_set_complete_sends_title_and_flag() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/tasks/1/"))
        .and(body_json(json!({ "is_complete": true, "title": "A" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(task_json(1, "A", true)))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&server, Some("a1"), Some("r1"));
    let task: taskhub_client::models::Task = serde_json::from_value(task_json(1, "A", false)).unwrap();
    let updated = h.tasks.set_complete(&task, true).await.unwrap();
    assert!(updated.is_complete);
}

#[tokio::test]
async fn test_delete_task_accepts_empty_body() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/tasks/4/"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&server, Some("a1"), Some("r1"));
    h.tasks.delete_task(&ResourceId::Number(4)).await.unwrap();
}

#[tokio::test]
async fn test_find_task_scans_list() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/tasks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            task_json(1, "A", false),
            task_json(2, "B", true)
        ])))
        .mount(&server)
        .await;

    let h = harness(&server, Some("a1"), Some("r1"));
    let found = h.tasks.find_task(&ResourceId::Number(2)).await.unwrap();
    assert_eq!(found.map(|t| t.title), Some("B".to_string()));
    assert!(h.tasks.find_task(&ResourceId::Number(9)).await.unwrap().is_none());
}

#[tokio::test]
async fn test_dashboard_fetches_stats_and_due_today() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/tasks/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_tasks": 5, "total_done": 2, "total_pending": 3
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/tasks/due_today"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([task_json(1, "A", false)])))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&server, Some("a1"), Some("r1"));
    let dashboard = h.tasks.dashboard().await.unwrap();

    assert_eq!(dashboard.stats.total_tasks, 5);
    assert_eq!(dashboard.stats.total_pending, 3);
    assert_eq!(dashboard.due_today.len(), 1);
}

// =============================================================================
// Group Tests
// =============================================================================

#[tokio::test]
async fn test_group_crud_paths() {
    let server = MockServer::start().await;
    let group = json!({ "id": 3, "name": "Home", "total_tasks": 4, "completed_tasks": 1 });

    Mock::given(method("GET"))
        .and(path("/task-groups"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([group.clone()])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/task-groups/"))
        .and(body_json(json!({ "name": "Home" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(group.clone()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/task-groups/3/"))
        .and(body_json(json!({ "name": "House", "description": "chores" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(group.clone()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/task-groups/3/"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&server, Some("a1"), Some("r1"));
    let id = ResourceId::Number(3);

    let groups = h.tasks.list_groups().await.unwrap();
    assert_eq!(groups[0].progress_percent(), 25.0);

    h.tasks
        .create_group(&GroupRequest {
            name: "Home".to_string(),
            description: None,
        })
        .await
        .unwrap();
    h.tasks
        .update_group(
            &id,
            &GroupRequest {
                name: "House".to_string(),
                description: Some("chores".to_string()),
            },
        )
        .await
        .unwrap();
    h.tasks.delete_group(&id).await.unwrap();
}

#[tokio::test]
async fn test_group_stats_keeps_extra_fields() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/task-groups/3/group_stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_tasks": 4,
            "completed_tasks": 1,
            "pending_tasks": 3,
            "overdue_tasks": 2
        })))
        .mount(&server)
        .await;

    let h = harness(&server, Some("a1"), Some("r1"));
    let stats = h.tasks.group_stats(&ResourceId::Number(3)).await.unwrap();

    assert_eq!(stats.pending_tasks, 3);
    assert_eq!(stats.extra.get("overdue_tasks"), Some(&json!(2)));
}

#[tokio::test]
async fn test_api_error_body_is_kept() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/task-groups/"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "name": ["This field is required."] })),
        )
        .mount(&server)
        .await;

    let h = harness(&server, Some("a1"), Some("r1"));
    let err = h
        .tasks
        .create_group(&GroupRequest {
            name: "x".to_string(),
            description: None,
        })
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(400));
    assert!(err.to_string().contains("This field is required."));
}
