//! End-to-end integration tests for the nested session endpoints.
//!
//! Sessions are always addressed through their owning course. These tests
//! exercise the flattened listing, the placeholder module synthesized on
//! first creation, duplicate handling, and updates, all against a real
//! server writing to a JSON data file.

use std::net::TcpListener;
use std::path::{Path, PathBuf};
use std::time::Duration;

use cursus_api::{create_router, AppState};
use cursus_store::{JsonFileStore, StoreHandle};
use serde_json::{json, Value};

/// Helper to find an available port for testing.
fn find_available_port() -> u16 {
    TcpListener::bind("127.0.0.1:0")
        .expect("Failed to bind to port")
        .local_addr()
        .expect("Failed to get local addr")
        .port()
}

/// Creates a unique path for a test's data file, clearing any leftover
/// from a previous aborted run.
fn temp_data_file(name: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "cursus-it-sessions-{}-{}.json",
        name,
        std::process::id()
    ));
    let _ = std::fs::remove_file(&path);
    path
}

/// Spawns the catalog server backed by the given data file and returns
/// the base URL of the API.
async fn spawn_test_server(data_path: &Path) -> (String, tokio::task::JoinHandle<()>) {
    let port = find_available_port();
    let addr = format!("127.0.0.1:{port}");
    let base_url = format!("http://{addr}/api");

    let store = StoreHandle::new(JsonFileStore::new(data_path));
    let router = create_router(AppState::new(store));
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind");

    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.expect("Server failed");
    });

    // Give the server a moment to start
    tokio::time::sleep(Duration::from_millis(50)).await;

    (base_url, handle)
}

/// Creates a course through the API, asserting success.
async fn create_course(client: &reqwest::Client, base_url: &str, course: Value) {
    let response = client
        .post(format!("{base_url}/courses"))
        .json(&course)
        .send()
        .await
        .expect("Failed to send POST");
    assert_eq!(response.status().as_u16(), 201, "Course creation failed");
}

/// Sends a GET request and returns the status code with the parsed body.
async fn get_json(client: &reqwest::Client, url: &str) -> (u16, Value) {
    let response = client.get(url).send().await.expect("Failed to send GET");
    let status = response.status().as_u16();
    let body = response.json().await.expect("Failed to parse body");
    (status, body)
}

// ============================================================================
// Listing
// ============================================================================

/// Tests that listing sessions of an unknown course yields 404.
#[tokio::test]
async fn test_list_sessions_for_unknown_course_returns_404() {
    let data_path = temp_data_file("list-unknown");
    let (base_url, _handle) = spawn_test_server(&data_path).await;
    let client = reqwest::Client::new();

    let (status, body) = get_json(&client, &format!("{base_url}/courses/42/sessions")).await;

    assert_eq!(status, 404);
    assert_eq!(body["message"], "Cours non trouvé.");

    let _ = std::fs::remove_file(&data_path);
}

/// Tests that a course without modules has an empty session list.
#[tokio::test]
async fn test_list_sessions_starts_empty() {
    let data_path = temp_data_file("list-empty");
    let (base_url, _handle) = spawn_test_server(&data_path).await;
    let client = reqwest::Client::new();

    create_course(&client, &base_url, json!({ "id": 1, "titre": "Rust" })).await;

    let (status, body) = get_json(&client, &format!("{base_url}/courses/1/sessions")).await;

    assert_eq!(status, 200);
    assert_eq!(body, json!({ "seances": [] }));

    let _ = std::fs::remove_file(&data_path);
}

/// Tests that the listing flattens sessions across modules in order.
#[tokio::test]
async fn test_sessions_listed_across_modules() {
    let data_path = temp_data_file("list-across");
    let (base_url, _handle) = spawn_test_server(&data_path).await;
    let client = reqwest::Client::new();

    create_course(
        &client,
        &base_url,
        json!({
            "id": 1,
            "titre": "Rust",
            "modules": [
                { "id": "m1", "seances": [{ "id": 10, "titre": "Ownership" }] },
                { "id": "m2", "seances": [{ "id": 20, "titre": "Traits" }] },
            ],
        }),
    )
    .await;

    let (status, body) = get_json(&client, &format!("{base_url}/courses/1/sessions")).await;

    assert_eq!(status, 200);
    let ids: Vec<i64> = body["seances"]
        .as_array()
        .expect("Missing seances array")
        .iter()
        .map(|session| session["id"].as_i64().expect("Session id is not a number"))
        .collect();
    assert_eq!(ids, [10, 20]);

    let _ = std::fs::remove_file(&data_path);
}

// ============================================================================
// Creation
// ============================================================================

/// Tests that creating a session in a course without modules synthesizes
/// the placeholder module in the data file.
#[tokio::test]
async fn test_create_session_synthesizes_placeholder_module() {
    let data_path = temp_data_file("placeholder");
    let (base_url, _handle) = spawn_test_server(&data_path).await;
    let client = reqwest::Client::new();

    create_course(&client, &base_url, json!({ "id": 1, "titre": "Rust" })).await;

    let response = client
        .post(format!("{base_url}/courses/1/sessions"))
        .json(&json!({ "id": 10, "titre": "Introduction" }))
        .send()
        .await
        .expect("Failed to send POST");

    assert_eq!(response.status().as_u16(), 201);
    let body: Value = response.json().await.expect("Failed to parse body");
    assert_eq!(body["message"], "Séance créée avec succès.");
    assert_eq!(body["seance"]["id"], 10);

    // The synthesized module is visible in the persisted document
    let contents = std::fs::read_to_string(&data_path).expect("Failed to read data file");
    let parsed: Value = serde_json::from_str(&contents).expect("Data file is not valid JSON");
    let module = &parsed["cours"][0]["modules"][0];
    assert_eq!(module["id"], "module_1");
    assert_eq!(module["titre"], "Nouveau module");
    assert_eq!(module["seances"][0]["id"], 10);

    let _ = std::fs::remove_file(&data_path);
}

/// Tests that new sessions land in the first module when modules exist.
#[tokio::test]
async fn test_new_sessions_append_to_first_module() {
    let data_path = temp_data_file("append-first");
    let (base_url, _handle) = spawn_test_server(&data_path).await;
    let client = reqwest::Client::new();

    create_course(
        &client,
        &base_url,
        json!({
            "id": 1,
            "titre": "Rust",
            "modules": [
                { "id": "m1", "seances": [{ "id": 10 }] },
                { "id": "m2", "seances": [{ "id": 20 }] },
            ],
        }),
    )
    .await;

    let response = client
        .post(format!("{base_url}/courses/1/sessions"))
        .json(&json!({ "id": 30, "titre": "Lifetimes" }))
        .send()
        .await
        .expect("Failed to send POST");
    assert_eq!(response.status().as_u16(), 201);

    let contents = std::fs::read_to_string(&data_path).expect("Failed to read data file");
    let parsed: Value = serde_json::from_str(&contents).expect("Data file is not valid JSON");
    let modules = parsed["cours"][0]["modules"]
        .as_array()
        .expect("Missing modules array");

    let first_ids: Vec<i64> = modules[0]["seances"]
        .as_array()
        .expect("Missing seances array")
        .iter()
        .map(|session| session["id"].as_i64().expect("Session id is not a number"))
        .collect();
    assert_eq!(first_ids, [10, 30]);
    assert_eq!(modules[1]["seances"].as_array().map(Vec::len), Some(1));

    let _ = std::fs::remove_file(&data_path);
}

/// Tests that a duplicate session id is refused wherever it lives.
#[tokio::test]
async fn test_duplicate_session_rejected_across_modules() {
    let data_path = temp_data_file("duplicate");
    let (base_url, _handle) = spawn_test_server(&data_path).await;
    let client = reqwest::Client::new();

    create_course(
        &client,
        &base_url,
        json!({
            "id": 1,
            "titre": "Rust",
            "modules": [
                { "id": "m1", "seances": [{ "id": 10 }] },
                { "id": "m2", "seances": [{ "id": 20 }] },
            ],
        }),
    )
    .await;

    // Session 20 lives in the second module; the check still finds it
    let response = client
        .post(format!("{base_url}/courses/1/sessions"))
        .json(&json!({ "id": 20 }))
        .send()
        .await
        .expect("Failed to send POST");

    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json().await.expect("Failed to parse body");
    assert_eq!(
        body["message"],
        "Une séance avec cet ID existe déjà dans le cours."
    );

    let _ = std::fs::remove_file(&data_path);
}

/// Tests that session ids are only unique within their course.
#[tokio::test]
async fn test_same_session_id_allowed_in_another_course() {
    let data_path = temp_data_file("scoped");
    let (base_url, _handle) = spawn_test_server(&data_path).await;
    let client = reqwest::Client::new();

    create_course(
        &client,
        &base_url,
        json!({
            "id": 1,
            "titre": "Rust",
            "modules": [{ "id": "m1", "seances": [{ "id": 10 }] }],
        }),
    )
    .await;
    create_course(&client, &base_url, json!({ "id": 2, "titre": "Go" })).await;

    let response = client
        .post(format!("{base_url}/courses/2/sessions"))
        .json(&json!({ "id": 10, "titre": "Goroutines" }))
        .send()
        .await
        .expect("Failed to send POST");

    assert_eq!(response.status().as_u16(), 201);

    let _ = std::fs::remove_file(&data_path);
}

/// Tests that creating a session in an unknown course yields 404.
#[tokio::test]
async fn test_create_session_in_unknown_course_returns_404() {
    let data_path = temp_data_file("create-unknown");
    let (base_url, _handle) = spawn_test_server(&data_path).await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{base_url}/courses/9/sessions"))
        .json(&json!({ "id": 1 }))
        .send()
        .await
        .expect("Failed to send POST");

    assert_eq!(response.status().as_u16(), 404);
    let body: Value = response.json().await.expect("Failed to parse body");
    assert_eq!(body["message"], "Cours non trouvé.");

    let _ = std::fs::remove_file(&data_path);
}

// ============================================================================
// Updates
// ============================================================================

/// Tests that updating a session merges the provided fields.
#[tokio::test]
async fn test_update_session_merges_fields() {
    let data_path = temp_data_file("update");
    let (base_url, _handle) = spawn_test_server(&data_path).await;
    let client = reqwest::Client::new();

    create_course(
        &client,
        &base_url,
        json!({
            "id": 1,
            "titre": "Rust",
            "modules": [{ "id": "m1", "seances": [{ "id": 10, "titre": "Intro" }] }],
        }),
    )
    .await;

    let response = client
        .put(format!("{base_url}/courses/1/sessions/10"))
        .json(&json!({ "titre": "Nouvelle intro", "duree": 90 }))
        .send()
        .await
        .expect("Failed to send PUT");

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.expect("Failed to parse body");
    assert_eq!(body["message"], "Séance mise à jour avec succès.");
    assert_eq!(body["seance"]["titre"], "Nouvelle intro");
    assert_eq!(body["seance"]["duree"], 90);
    assert_eq!(body["seance"]["id"], 10);

    let (_, listing) = get_json(&client, &format!("{base_url}/courses/1/sessions")).await;
    assert_eq!(listing["seances"][0]["titre"], "Nouvelle intro");

    let _ = std::fs::remove_file(&data_path);
}

/// Tests that updating an unknown session yields 404.
#[tokio::test]
async fn test_update_unknown_session_returns_404() {
    let data_path = temp_data_file("update-unknown");
    let (base_url, _handle) = spawn_test_server(&data_path).await;
    let client = reqwest::Client::new();

    create_course(&client, &base_url, json!({ "id": 1, "titre": "Rust" })).await;

    let response = client
        .put(format!("{base_url}/courses/1/sessions/99"))
        .json(&json!({ "titre": "Fantôme" }))
        .send()
        .await
        .expect("Failed to send PUT");

    assert_eq!(response.status().as_u16(), 404);
    let body: Value = response.json().await.expect("Failed to parse body");
    assert_eq!(body["message"], "Séance non trouvée.");

    let _ = std::fs::remove_file(&data_path);
}

/// Tests that updating a session of an unknown course yields 404.
#[tokio::test]
async fn test_update_session_in_unknown_course_returns_404() {
    let data_path = temp_data_file("update-no-course");
    let (base_url, _handle) = spawn_test_server(&data_path).await;
    let client = reqwest::Client::new();

    let response = client
        .put(format!("{base_url}/courses/9/sessions/10"))
        .json(&json!({ "titre": "Perdu" }))
        .send()
        .await
        .expect("Failed to send PUT");

    assert_eq!(response.status().as_u16(), 404);
    let body: Value = response.json().await.expect("Failed to parse body");
    assert_eq!(body["message"], "Cours non trouvé.");

    let _ = std::fs::remove_file(&data_path);
}

/// Tests that sessions cannot be deleted through the API.
#[tokio::test]
async fn test_session_delete_not_supported() {
    let data_path = temp_data_file("no-delete");
    let (base_url, _handle) = spawn_test_server(&data_path).await;
    let client = reqwest::Client::new();

    create_course(
        &client,
        &base_url,
        json!({
            "id": 1,
            "titre": "Rust",
            "modules": [{ "id": "m1", "seances": [{ "id": 10 }] }],
        }),
    )
    .await;

    let response = client
        .delete(format!("{base_url}/courses/1/sessions/10"))
        .send()
        .await
        .expect("Failed to send DELETE");

    // The session route only accepts PUT
    assert_eq!(response.status().as_u16(), 405);

    // The session is still there
    let (_, listing) = get_json(&client, &format!("{base_url}/courses/1/sessions")).await;
    assert_eq!(listing["seances"].as_array().map(Vec::len), Some(1));

    let _ = std::fs::remove_file(&data_path);
}
