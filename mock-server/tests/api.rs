use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, Todo};
use tower::{Service, ServiceExt};

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(String::new())
        .unwrap()
}

// --- list ---

#[tokio::test]
async fn list_todos_empty() {
    let resp = app().oneshot(empty_request("GET", "/todos")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let todos: Vec<Todo> = body_json(resp).await;
    assert!(todos.is_empty());
}

// --- create ---

#[tokio::test]
async fn create_todo_returns_201_with_defaults() {
    let resp = app()
        .oneshot(json_request("POST", "/todos", r#"{"text":"Buy milk"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let todo: Todo = body_json(resp).await;
    assert_eq!(todo.text, "Buy milk");
    assert!(!todo.completed);
    assert!(!todo.id.is_empty());
}

#[tokio::test]
async fn create_todo_malformed_json_returns_422() {
    let resp = app()
        .oneshot(json_request("POST", "/todos", r#"{"title":1}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn create_todo_blank_text_returns_400() {
    let resp = app()
        .oneshot(json_request("POST", "/todos", r#"{"text":"   "}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- unknown ids ---

#[tokio::test]
async fn update_text_not_found() {
    let resp = app()
        .oneshot(json_request("PATCH", "/todos/nope", r#"{"text":"Nope"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn toggle_not_found() {
    let resp = app().oneshot(empty_request("PUT", "/todos/nope")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_not_found() {
    let resp = app()
        .oneshot(empty_request("DELETE", "/todos/nope"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- full lifecycle ---

#[tokio::test]
async fn lifecycle_keeps_insertion_order() {
    let mut app = app().into_service();

    let mut ids = Vec::new();
    for text in ["first", "second", "third"] {
        let body = format!(r#"{{"text":"{text}"}}"#);
        let resp = ServiceExt::ready(&mut app)
            .await
            .unwrap()
            .call(json_request("POST", "/todos", &body))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        let created: Todo = body_json(resp).await;
        ids.push(created.id);
    }

    // toggle the second one, twice
    for expected in [true, false] {
        let resp = ServiceExt::ready(&mut app)
            .await
            .unwrap()
            .call(empty_request("PUT", &format!("/todos/{}", ids[1])))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let toggled: Todo = body_json(resp).await;
        assert_eq!(toggled.completed, expected);
    }

    // rename the third
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "PATCH",
            &format!("/todos/{}", ids[2]),
            r#"{"text":"third, renamed"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let renamed: Todo = body_json(resp).await;
    assert_eq!(renamed.text, "third, renamed");
    assert_eq!(renamed.id, ids[2]);

    // delete the first
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("DELETE", &format!("/todos/{}", ids[0])))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(body_bytes(resp).await.is_empty());

    // list reflects every change, in insertion order
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("GET", "/todos"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let todos: Vec<Todo> = body_json(resp).await;
    let texts: Vec<&str> = todos.iter().map(|t| t.text.as_str()).collect();
    assert_eq!(texts, ["second", "third, renamed"]);
    assert!(!todos[0].completed);
}
