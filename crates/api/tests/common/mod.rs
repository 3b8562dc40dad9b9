#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use scriptline_api::config::ServerConfig;
use scriptline_api::router::build_app_router;
use scriptline_api::state::AppState;
use scriptline_api::trigger::RunnerCommand;

/// A runner command that executes `script` with `sh -c`.
pub fn sh_runner(script: &str) -> RunnerCommand {
    RunnerCommand {
        program: "sh".to_string(),
        args: vec!["-c".to_string(), script.to_string()],
        working_directory: None,
    }
}

/// Build a test `ServerConfig` with safe defaults and the given runner.
pub fn test_config(runner: RunnerCommand) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        runner,
    }
}

/// Build the production router around `runner`.
pub fn build_test_app(runner: RunnerCommand) -> Router {
    let config = test_config(runner);
    let state = AppState {
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

pub async fn send(app: Router, method: Method, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri).await
}

pub async fn post(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::POST, uri).await
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
