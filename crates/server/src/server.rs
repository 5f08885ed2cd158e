use axum::{
    Router,
    extract::Request,
    http::Method,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};

use std::{sync::Arc, time::Instant};
use tower_http::cors::{AllowHeaders, Any, CorsLayer};

use crate::{ledger, statistics, user};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

/// Log method, path, status and latency of every request.
async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(request).await;

    let status = response.status();
    let elapsed_ms = started.elapsed().as_millis();
    if status.is_server_error() {
        tracing::warn!(%method, %path, %status, elapsed_ms, "request failed");
    } else {
        tracing::info!(%method, %path, %status, elapsed_ms, "request served");
    }
    response
}

/// Browser dashboards call the API from another origin.
fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::HEAD,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
        ])
        .allow_headers(AllowHeaders::mirror_request())
}

/// Build the API router around `engine`.
pub fn router(engine: Engine) -> Router {
    let state = ServerState {
        engine: Arc::new(engine),
    };

    Router::new()
        .route("/login", post(user::login))
        .route("/register", post(user::register))
        .route("/change-password", post(user::change_password))
        .route("/ledger", get(ledger::list).post(ledger::create))
        .route(
            "/ledger/stats",
            get(statistics::get_stats).post(statistics::post_stats),
        )
        .route(
            "/ledger/{id}",
            get(ledger::get).put(ledger::update).delete(ledger::delete),
        )
        .layer(middleware::from_fn(log_request))
        .layer(cors())
        .with_state(state)
}

pub async fn run_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router(engine)).await
}
