//! HTTP server exposing the todo list as a Relay-style GraphQL API.
//!
//! # Design
//! The router owns a `TodoSchema` built over an injected `SharedStore`.
//! `POST /graphql` takes a standard GraphQL JSON request and returns the
//! JSON response; `GET /schema` returns the schema SDL. `app()` starts from
//! an empty in-memory store, `app_with_store` lets tests and embedders
//! supply their own.

pub mod config;
pub mod schema;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use relay_todo_core::{MemoryStore, SharedStore};
use tokio::net::TcpListener;

pub use config::{ConfigError, ServerConfig};
pub use schema::{build_schema, TodoSchema};

pub fn app() -> Router {
    app_with_store(MemoryStore::shared())
}

pub fn app_with_store(store: SharedStore) -> Router {
    Router::new()
        .route("/graphql", post(graphql))
        .route("/schema", get(sdl))
        .with_state(build_schema(store))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn graphql(
    State(schema): State<TodoSchema>,
    Json(request): Json<async_graphql::Request>,
) -> Json<async_graphql::Response> {
    Json(schema.execute(request).await)
}

async fn sdl(State(schema): State<TodoSchema>) -> String {
    schema.sdl()
}
