use axum::{
    extract::State,
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

use survey_api_rust::config::{AppConfig, SecurityConfig};
use survey_api_rust::database::manager;
use survey_api_rust::handlers::public::surveys;
use survey_api_rust::state::AppState;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = AppConfig::from_env();
    tracing::info!("Starting Survey API in {:?} mode", config.environment);

    let pool = manager::connect(&config.database)
        .unwrap_or_else(|e| panic!("failed to create database pool: {}", e));

    // Bootstrap the schema in the background; /health reports degraded
    // until the database is reachable.
    let bootstrap_pool = pool.clone();
    tokio::spawn(async move {
        if let Err(e) = manager::ensure_schema(&bootstrap_pool).await {
            warn!("Schema bootstrap failed: {}", e);
        }
    });

    let app = app(AppState::new(pool, config));

    // Allow tests or deployments to override port via env
    let port = std::env::var("SURVEY_API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    println!("🚀 Survey API server listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}

fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.config.security);
    let enable_request_logging = state.config.api.enable_request_logging;

    let mut router = Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        // Survey endpoints (token optional for viewing, required to respond)
        .merge(survey_routes())
        .with_state(state)
        // Global middleware
        .layer(cors);

    if enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router
}

fn survey_routes() -> Router<AppState> {
    Router::new()
        .route("/surveys/:id", get(surveys::survey_get))
        .route("/surveys/:id/respond", post(surveys::survey_respond))
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if !security.enable_cors {
        return CorsLayer::new();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    if origins.is_empty() {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "success": true,
        "data": {
            "name": "Survey API (Rust)",
            "version": version,
            "description": "Survey response collection backend built with Rust (Axum)",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "survey": "GET /surveys/:id (public - token optional)",
                "respond": "POST /surveys/:id/respond (token required)",
            }
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match manager::health_check(&state.db).await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "success": false,
                "error": "database unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string()
                }
            })),
        ),
    }
}
