//! End-to-end tests for the `/Filme` routes
//!
//! The router runs against the in-memory store and is driven through
//! `tower::ServiceExt::oneshot`, so no server or database is needed.

use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
    response::Response,
};
use filmes::{
    models::ReadFilmeDto, repositories::InMemoryFilmeRepository, routes, state::AppState,
};
use serde_json::{Value, json};
use tower::ServiceExt;

fn test_app() -> Router {
    let state = AppState::new(Arc::new(InMemoryFilmeRepository::new()));
    routes::app(state, Duration::from_secs(30))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> Response {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    app.clone().oneshot(request).await.unwrap()
}

async fn json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn matrix() -> Value {
    json!({
        "title": "Matrix",
        "genre": "Sci-Fi",
        "duration": 136,
        "release_date": "1999-03-31"
    })
}

async fn create(app: &Router, body: Value) -> ReadFilmeDto {
    let response = send(app, "POST", "/Filme", Some(body)).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    serde_json::from_value(json_body(response).await).unwrap()
}

async fn fetch(app: &Router, id: i32) -> ReadFilmeDto {
    let response = send(app, "GET", &format!("/Filme/{}", id), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    serde_json::from_value(json_body(response).await).unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let app = test_app();

    let response = send(&app, "GET", "/health", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["status"], "ok");
}

#[tokio::test]
async fn test_create_then_get_returns_equivalent_projection() {
    let app = test_app();

    let response = send(&app, "POST", "/Filme", Some(matrix())).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(response.headers()[header::LOCATION], "/Filme/1");

    let created: ReadFilmeDto = serde_json::from_value(json_body(response).await).unwrap();
    assert_eq!(created.id, 1);

    let fetched = fetch(&app, created.id).await;
    assert_eq!(fetched, created);
    assert_eq!(fetched.title, "Matrix");
    assert_eq!(fetched.genre, "Sci-Fi");
    assert_eq!(fetched.duration, 136);
    assert_eq!(fetched.release_date.unwrap().to_string(), "1999-03-31");
}

#[tokio::test]
async fn test_create_rejects_invalid_fields() {
    let app = test_app();

    let response = send(
        &app,
        "POST",
        "/Filme",
        Some(json!({ "title": "", "genre": "Sci-Fi", "duration": 20 })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = json_body(response).await;
    assert!(body["errors"]["title"].is_array());
    assert!(body["errors"]["duration"].is_array());

    let list = json_body(send(&app, "GET", "/Filme", None).await).await;
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn test_create_rejects_missing_required_field() {
    let app = test_app();

    let response = send(
        &app,
        "POST",
        "/Filme",
        Some(json!({ "title": "Matrix", "duration": 136 })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_create_rejects_malformed_json() {
    let app = test_app();

    let request = Request::builder()
        .method("POST")
        .uri("/Filme")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"title\": "))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_unknown_id_returns_404() {
    let app = test_app();

    let response = send(&app, "GET", "/Filme/404", None).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_non_numeric_id_returns_400() {
    let app = test_app();

    let response = send(&app, "GET", "/Filme/matrix", None).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_defaults_to_first_fifty_in_insertion_order() {
    let app = test_app();
    for n in 0..55 {
        create(
            &app,
            json!({ "title": format!("Filme {}", n), "genre": "Drama", "duration": 90 }),
        )
        .await;
    }

    let response = send(&app, "GET", "/Filme", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let items: Vec<ReadFilmeDto> = serde_json::from_value(json_body(response).await).unwrap();
    assert_eq!(items.len(), 50);
    let ids: Vec<i32> = items.iter().map(|f| f.id).collect();
    assert_eq!(ids, (1..=50).collect::<Vec<_>>());
}

#[tokio::test]
async fn test_list_honours_skip_and_take() {
    let app = test_app();
    for title in ["A", "B", "C", "D"] {
        create(
            &app,
            json!({ "title": title, "genre": "Drama", "duration": 90 }),
        )
        .await;
    }

    let items: Vec<ReadFilmeDto> = serde_json::from_value(
        json_body(send(&app, "GET", "/Filme?skip=1&take=2", None).await).await,
    )
    .unwrap();
    let titles: Vec<&str> = items.iter().map(|f| f.title.as_str()).collect();
    assert_eq!(titles, ["B", "C"]);

    let empty = json_body(send(&app, "GET", "/Filme?take=-1", None).await).await;
    assert_eq!(empty, json!([]));

    let response = send(&app, "GET", "/Filme?skip=abc", None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_put_replaces_all_fields() {
    let app = test_app();
    let created = create(&app, matrix()).await;

    let response = send(
        &app,
        "PUT",
        &format!("/Filme/{}", created.id),
        Some(json!({ "title": "Matrix Reloaded", "genre": "Action", "duration": 138 })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let fetched = fetch(&app, created.id).await;
    assert_eq!(fetched.id, created.id);
    assert_eq!(fetched.title, "Matrix Reloaded");
    assert_eq!(fetched.genre, "Action");
    assert_eq!(fetched.duration, 138);
    assert_eq!(fetched.release_date, None);
}

#[tokio::test]
async fn test_put_accepts_the_fetched_projection_back() {
    let app = test_app();
    let created = create(&app, matrix()).await;

    let mut body = serde_json::to_value(fetch(&app, created.id).await).unwrap();
    body["title"] = json!("The Matrix");
    let response = send(&app, "PUT", &format!("/Filme/{}", created.id), Some(body)).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let fetched = fetch(&app, created.id).await;
    assert_eq!(fetched.id, created.id);
    assert_eq!(fetched.title, "The Matrix");
    assert_eq!(fetched.release_date, created.release_date);
}

#[tokio::test]
async fn test_put_ignores_a_conflicting_id_in_the_body() {
    let app = test_app();
    let created = create(&app, matrix()).await;

    let response = send(
        &app,
        "PUT",
        &format!("/Filme/{}", created.id),
        Some(json!({ "id": 42, "title": "Matrix", "genre": "Action", "duration": 136 })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    assert_eq!(fetch(&app, created.id).await.genre, "Action");
    let response = send(&app, "GET", "/Filme/42", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_put_unknown_id_returns_404_without_mutation() {
    let app = test_app();
    let created = create(&app, matrix()).await;

    let response = send(
        &app,
        "PUT",
        "/Filme/99",
        Some(json!({ "title": "Ghost", "genre": "Horror", "duration": 90 })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let list: Vec<ReadFilmeDto> =
        serde_json::from_value(json_body(send(&app, "GET", "/Filme", None).await).await).unwrap();
    assert_eq!(list, vec![created]);
}

#[tokio::test]
async fn test_put_invalid_payload_returns_422() {
    let app = test_app();
    let created = create(&app, matrix()).await;

    let response = send(
        &app,
        "PUT",
        &format!("/Filme/{}", created.id),
        Some(json!({ "title": "Matrix", "genre": "Sci-Fi", "duration": 1000 })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(fetch(&app, created.id).await, created);
}

#[tokio::test]
async fn test_patch_updates_selected_fields() {
    let app = test_app();
    let created = create(&app, matrix()).await;

    let response = send(
        &app,
        "PATCH",
        &format!("/Filme/{}", created.id),
        Some(json!([
            { "op": "test", "path": "/title", "value": "Matrix" },
            { "op": "replace", "path": "/title", "value": "The Matrix" },
            { "op": "remove", "path": "/release_date" }
        ])),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let fetched = fetch(&app, created.id).await;
    assert_eq!(fetched.title, "The Matrix");
    assert_eq!(fetched.genre, created.genre);
    assert_eq!(fetched.duration, created.duration);
    assert_eq!(fetched.release_date, None);
}

#[tokio::test]
async fn test_patch_accepts_json_patch_content_type() {
    let app = test_app();
    let created = create(&app, matrix()).await;

    let request = Request::builder()
        .method("PATCH")
        .uri(format!("/Filme/{}", created.id))
        .header(header::CONTENT_TYPE, "application/json-patch+json")
        .body(Body::from(
            json!([{ "op": "replace", "path": "/duration", "value": 150 }]).to_string(),
        ))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(fetch(&app, created.id).await.duration, 150);
}

#[tokio::test]
async fn test_patch_constraint_violation_returns_422_and_keeps_entity() {
    let app = test_app();
    let created = create(&app, matrix()).await;

    let response = send(
        &app,
        "PATCH",
        &format!("/Filme/{}", created.id),
        Some(json!([
            { "op": "replace", "path": "/title", "value": "Changed" },
            { "op": "replace", "path": "/duration", "value": 5 }
        ])),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = json_body(response).await;
    assert_eq!(body["status"], 422);
    assert_eq!(
        body["errors"]["duration"][0],
        "The duration must be between 70 and 600 minutes"
    );
    assert_eq!(fetch(&app, created.id).await, created);
}

#[tokio::test]
async fn test_patch_removing_required_field_returns_422() {
    let app = test_app();
    let created = create(&app, matrix()).await;

    let response = send(
        &app,
        "PATCH",
        &format!("/Filme/{}", created.id),
        Some(json!([{ "op": "remove", "path": "/title" }])),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(fetch(&app, created.id).await, created);
}

#[tokio::test]
async fn test_patch_cannot_touch_identifier() {
    let app = test_app();
    let created = create(&app, matrix()).await;

    let response = send(
        &app,
        "PATCH",
        &format!("/Filme/{}", created.id),
        Some(json!([{ "op": "add", "path": "/id", "value": 77 }])),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(json_body(response).await["errors"]["id"].is_array());
    assert_eq!(fetch(&app, created.id).await, created);
    let response = send(&app, "GET", "/Filme/77", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_patch_missing_path_returns_422() {
    let app = test_app();
    let created = create(&app, matrix()).await;

    let response = send(
        &app,
        "PATCH",
        &format!("/Filme/{}", created.id),
        Some(json!([{ "op": "replace", "path": "/director", "value": "Wachowski" }])),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = json_body(response).await;
    assert!(body["errors"]["director"].is_array());
}

#[tokio::test]
async fn test_patch_unknown_id_returns_404() {
    let app = test_app();

    let response = send(
        &app,
        "PATCH",
        "/Filme/12",
        Some(json!([{ "op": "replace", "path": "/duration", "value": 100 }])),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_then_get_returns_404() {
    let app = test_app();
    let created = create(&app, json!({ "title": "Matrix", "genre": "Sci-Fi", "duration": 136 })).await;
    assert_eq!(created.id, 1);

    let response = send(&app, "DELETE", "/Filme/1", None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = send(&app, "GET", "/Filme/1", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(&app, "DELETE", "/Filme/1", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
