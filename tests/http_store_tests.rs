use emptasks::config::Config;
use emptasks::error::TransportError;
use emptasks::models::TaskPayload;
use emptasks::store::{HttpTaskStore, TaskStore};
use mockito::Matcher;
use serde_json::json;

fn payload() -> TaskPayload {
    TaskPayload {
        employee_name: "Alice".into(),
        task_description: "Painting".into(),
        date: "2024-05-01".into(),
        hours_spent: 10.0,
        hourly_rate: 15.5,
        additional_charges: 2.25,
        total_remuneration: 157.25,
    }
}

fn task_json(id: u64) -> serde_json::Value {
    json!({
        "id": id,
        "employee_name": "Alice",
        "task_description": "Painting",
        "date": "2024-05-01",
        "hours_spent": 10.0,
        "hourly_rate": 15.5,
        "additional_charges": 2.25,
        "total_remuneration": 157.25
    })
}

fn store_for(server: &mockito::Server) -> HttpTaskStore {
    HttpTaskStore::new(&Config::with_endpoint(server.url())).unwrap()
}

#[tokio::test]
async fn test_list_tasks() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/tasks")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!([task_json(1), task_json(2)]).to_string())
        .create_async()
        .await;

    let tasks = store_for(&server).list_tasks().await.unwrap();

    mock.assert_async().await;
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[1].id, 2);
    assert_eq!(tasks[0].total_remuneration, 157.25);
}

#[tokio::test]
async fn test_create_posts_payload() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/tasks")
        .match_body(Matcher::PartialJson(json!({
            "employee_name": "Alice",
            "total_remuneration": 157.25
        })))
        .with_status(201)
        .with_body(task_json(7).to_string())
        .create_async()
        .await;

    let task = store_for(&server).create_task(&payload()).await.unwrap();

    mock.assert_async().await;
    assert_eq!(task.id, 7);
}

#[tokio::test]
async fn test_update_puts_to_item_path() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("PUT", "/api/tasks/3")
        .with_status(200)
        .with_body(task_json(3).to_string())
        .create_async()
        .await;

    let task = store_for(&server).update_task(3, &payload()).await.unwrap();

    mock.assert_async().await;
    assert_eq!(task.id, 3);
}

#[tokio::test]
async fn test_update_missing_is_not_found() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server.mock("PUT", "/api/tasks/9").with_status(404).create_async().await;

    let err = store_for(&server).update_task(9, &payload()).await.unwrap_err();

    assert!(matches!(err, TransportError::NotFound { id: 9 }));
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn test_delete_accepts_empty_body() {
    let mut server = mockito::Server::new_async().await;
    let mock = server.mock("DELETE", "/api/tasks/4").with_status(204).create_async().await;

    store_for(&server).delete_task(4).await.unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_server_error_carries_status() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/tasks")
        .with_status(500)
        .with_body("database unavailable")
        .create_async()
        .await;

    let err = store_for(&server).list_tasks().await.unwrap_err();

    match err {
        TransportError::Status { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "database unavailable");
        }
        other => panic!("expected status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_bad_json_is_decode_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/tasks")
        .with_status(200)
        .with_body("{\"not\": \"a list\"}")
        .create_async()
        .await;

    let err = store_for(&server).list_tasks().await.unwrap_err();

    assert!(matches!(err, TransportError::Decode(_)));
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn test_custom_resource_path() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/v2/employee-tasks")
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;

    let mut config = Config::with_endpoint(format!("{}/", server.url()));
    config.resource_path = "/v2/employee-tasks".into();
    let tasks = HttpTaskStore::new(&config).unwrap().list_tasks().await.unwrap();

    mock.assert_async().await;
    assert!(tasks.is_empty());
}
