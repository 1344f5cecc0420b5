use axum::Router;
use logsink::{
    app::AppState,
    db::{LogStore, SqliteLogStore},
    http,
};
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::task::JoinHandle;

async fn start_server() -> (String, Arc<dyn LogStore>, JoinHandle<()>) {
    let store = SqliteLogStore::connect("sqlite::memory:", 1)
        .await
        .expect("connect memory sqlite");
    store.init_schema().await.expect("init schema");
    let store: Arc<dyn LogStore> = Arc::new(store);
    let app: Router = http::build_router(AppState::new(store.clone()));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{}", addr), store, handle)
}

async fn post_log(client: &reqwest::Client, base: &str, body: Value) -> reqwest::Response {
    client
        .post(format!("{}/logs", base))
        .json(&body)
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn health_reports_database_state() {
    let (base, _store, _srv) = start_server().await;
    let res = reqwest::get(format!("{}/health", base)).await.unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::OK);
    let v: Value = res.json().await.unwrap();
    assert_eq!(v["status"], "healthy");
    assert_eq!(v["database"], "connected");
    assert!(v["timestamp"].is_string());
}

#[tokio::test]
async fn add_log_echoes_fields() {
    let (base, _store, _srv) = start_server().await;
    let client = reqwest::Client::new();

    let res = post_log(
        &client,
        &base,
        json!({
            "level": "info",
            "message": "Test log message",
            "service": "test_service",
            "data": {"key": "value"},
        }),
    )
    .await;
    assert_eq!(res.status(), reqwest::StatusCode::CREATED);
    let v: Value = res.json().await.unwrap();
    assert_eq!(v["success"], true);
    assert_eq!(v["log"]["level"], "info");
    assert_eq!(v["log"]["message"], "Test log message");
    assert_eq!(v["log"]["service"], "test_service");
    assert_eq!(v["log"]["data"], json!({"key": "value"}));
    assert!(v["log"]["id"].as_i64().is_some());
    assert!(v["log"]["created_at"].is_string());
}

#[tokio::test]
async fn unrecognized_fields_get_defaults() {
    let (base, _store, _srv) = start_server().await;
    let client = reqwest::Client::new();

    for body in [json!({"invalid_field": "test"}), json!({})] {
        let res = post_log(&client, &base, body).await;
        assert_eq!(res.status(), reqwest::StatusCode::CREATED);
        let v: Value = res.json().await.unwrap();
        assert_eq!(v["success"], true);
        assert_eq!(v["log"]["level"], "info");
        assert_eq!(v["log"]["message"], "");
        assert_eq!(v["log"]["service"], "unknown");
        assert_eq!(v["log"]["data"], json!({}));
    }
}

#[tokio::test]
async fn malformed_json_is_rejected() {
    let (base, _store, _srv) = start_server().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/logs", base))
        .header("content-type", "application/json")
        .body("{\"level\": ")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::BAD_REQUEST);
    let v: Value = res.json().await.unwrap();
    assert!(v["error"].is_string());

    let res = client.get(format!("{}/logs", base)).send().await.unwrap();
    let v: Value = res.json().await.unwrap();
    assert_eq!(v["total"], 0);
}

#[tokio::test]
async fn list_paginates_newest_first() {
    let (base, _store, _srv) = start_server().await;
    let client = reqwest::Client::new();

    for i in 0..3 {
        let res = post_log(&client, &base, json!({"message": format!("entry {i}")})).await;
        assert_eq!(res.status(), reqwest::StatusCode::CREATED);
    }

    let res = client.get(format!("{}/logs", base)).send().await.unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::OK);
    let v: Value = res.json().await.unwrap();
    assert_eq!(v["total"], 3);
    assert_eq!(v["returned"], 3);
    assert_eq!(v["limit"], 100);
    assert_eq!(v["offset"], 0);
    let messages: Vec<&str> = v["logs"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["message"].as_str().unwrap())
        .collect();
    assert_eq!(messages, ["entry 2", "entry 1", "entry 0"]);

    let res = client
        .get(format!("{}/logs?limit=1&offset=0", base))
        .send()
        .await
        .unwrap();
    let v: Value = res.json().await.unwrap();
    assert_eq!(v["returned"], 1);
    assert_eq!(v["logs"].as_array().unwrap().len(), 1);
    assert_eq!(v["total"], 3);

    let res = client
        .get(format!("{}/logs?limit=2&offset=2", base))
        .send()
        .await
        .unwrap();
    let v: Value = res.json().await.unwrap();
    assert_eq!(v["returned"], 1);
    assert_eq!(v["logs"][0]["message"], "entry 0");
}

#[tokio::test]
async fn bad_pagination_values_fall_back() {
    let (base, _store, _srv) = start_server().await;
    let client = reqwest::Client::new();
    post_log(&client, &base, json!({"message": "only"})).await;

    let res = client
        .get(format!("{}/logs?limit=abc&offset=-4", base))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::OK);
    let v: Value = res.json().await.unwrap();
    assert_eq!(v["limit"], 100);
    assert_eq!(v["offset"], 0);
    assert_eq!(v["returned"], 1);
}

#[tokio::test]
async fn data_round_trips_through_listing() {
    let (base, _store, _srv) = start_server().await;
    let client = reqwest::Client::new();
    let data = json!({
        "user": {"id": 42, "roles": ["admin", "ops"]},
        "latency_ms": 12.5,
        "ok": false,
        "note": null,
    });

    post_log(&client, &base, json!({"message": "with data", "data": data.clone()})).await;

    let res = client.get(format!("{}/logs", base)).send().await.unwrap();
    let v: Value = res.json().await.unwrap();
    assert_eq!(v["logs"][0]["data"], data);
}

#[tokio::test]
async fn stats_group_by_level_and_service() {
    let (base, _store, _srv) = start_server().await;
    let client = reqwest::Client::new();

    let res = client.get(format!("{}/stats", base)).send().await.unwrap();
    let v: Value = res.json().await.unwrap();
    assert_eq!(v["total_logs"], 0);
    assert!(v["last_log"].is_null());

    for (level, message, service) in [
        ("info", "Test log 1", "service1"),
        ("error", "Test log 2", "service2"),
        ("warning", "Test log 3", "service1"),
    ] {
        post_log(
            &client,
            &base,
            json!({"level": level, "message": message, "service": service}),
        )
        .await;
    }

    let res = client.get(format!("{}/stats", base)).send().await.unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::OK);
    let v: Value = res.json().await.unwrap();
    assert_eq!(v["total_logs"], 3);
    assert_eq!(v["levels"], json!({"error": 1, "info": 1, "warning": 1}));
    assert_eq!(v["services"], json!({"service1": 2, "service2": 1}));
    assert_eq!(v["last_log"]["message"], "Test log 3");
}

#[tokio::test]
async fn clear_is_idempotent() {
    let (base, _store, _srv) = start_server().await;
    let client = reqwest::Client::new();
    post_log(&client, &base, json!({"message": "Test log to be cleared"})).await;
    post_log(&client, &base, json!({"message": "another"})).await;

    let res = client
        .delete(format!("{}/logs/clear", base))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::OK);
    let v: Value = res.json().await.unwrap();
    assert_eq!(v["success"], true);
    assert_eq!(v["deleted"], 2);

    let res = client
        .delete(format!("{}/logs/clear", base))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::OK);
    let v: Value = res.json().await.unwrap();
    assert_eq!(v["success"], true);
    assert_eq!(v["deleted"], 0);

    let res = client.get(format!("{}/logs", base)).send().await.unwrap();
    let v: Value = res.json().await.unwrap();
    assert_eq!(v["total"], 0);
    assert_eq!(v["logs"], json!([]));
}

#[tokio::test]
async fn closed_database_degrades_health_and_fails_queries() {
    let (base, store, _srv) = start_server().await;
    let client = reqwest::Client::new();
    store.close().await;

    let res = client.get(format!("{}/health", base)).send().await.unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::OK);
    let v: Value = res.json().await.unwrap();
    assert_eq!(v["status"], "unhealthy");
    assert_eq!(v["database"], "disconnected");

    let res = client.get(format!("{}/logs", base)).send().await.unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::INTERNAL_SERVER_ERROR);
    let v: Value = res.json().await.unwrap();
    assert!(v["error"].as_str().unwrap().contains("connection"));

    let res = post_log(&client, &base, json!({"message": "lost"})).await;
    assert_eq!(res.status(), reqwest::StatusCode::INTERNAL_SERVER_ERROR);
}
