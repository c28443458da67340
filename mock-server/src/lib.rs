//! In-memory implementation of the `/todos` REST API.
//!
//! Records keep insertion order and carry a server-assigned `_id`. Used by
//! the client's integration tests and for running the CLI against a local
//! backend.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Todo {
    #[serde(rename = "_id")]
    pub id: String,
    pub text: String,
    pub completed: bool,
}

/// Body of `POST /todos` and `PATCH /todos/{id}`.
#[derive(Deserialize)]
pub struct TextInput {
    pub text: String,
}

pub type Db = Arc<RwLock<Vec<Todo>>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Vec::new()));
    Router::new()
        .route("/todos", get(list_todos).post(create_todo))
        .route(
            "/todos/{id}",
            patch(update_text).put(toggle_todo).delete(delete_todo),
        )
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn list_todos(State(db): State<Db>) -> Json<Vec<Todo>> {
    Json(db.read().await.clone())
}

async fn create_todo(
    State(db): State<Db>,
    Json(input): Json<TextInput>,
) -> Result<(StatusCode, Json<Todo>), StatusCode> {
    if input.text.trim().is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }
    let todo = Todo {
        id: Uuid::new_v4().simple().to_string(),
        text: input.text,
        completed: false,
    };
    info!(id = %todo.id, "created todo");
    db.write().await.push(todo.clone());
    Ok((StatusCode::CREATED, Json(todo)))
}

async fn update_text(
    State(db): State<Db>,
    Path(id): Path<String>,
    Json(input): Json<TextInput>,
) -> Result<Json<Todo>, StatusCode> {
    if input.text.trim().is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }
    let mut todos = db.write().await;
    let todo = todos
        .iter_mut()
        .find(|todo| todo.id == id)
        .ok_or(StatusCode::NOT_FOUND)?;
    todo.text = input.text;
    info!(%id, "updated todo text");
    Ok(Json(todo.clone()))
}

async fn toggle_todo(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<Json<Todo>, StatusCode> {
    let mut todos = db.write().await;
    let todo = todos
        .iter_mut()
        .find(|todo| todo.id == id)
        .ok_or(StatusCode::NOT_FOUND)?;
    todo.completed = !todo.completed;
    info!(%id, completed = todo.completed, "toggled todo");
    Ok(Json(todo.clone()))
}

async fn delete_todo(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> StatusCode {
    let mut todos = db.write().await;
    let before = todos.len();
    todos.retain(|todo| todo.id != id);
    if todos.len() == before {
        return StatusCode::NOT_FOUND;
    }
    info!(%id, "deleted todo");
    StatusCode::NO_CONTENT
}
