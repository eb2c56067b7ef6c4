use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Request, StatusCode},
    middleware::{from_fn, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tower_governor::governor::GovernorConfigBuilder;
use tower_governor::GovernorLayer;
use tower_http::cors::CorsLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use in_kind_tracker::{auth, db, routes, AppState};

const DONATION_IMPORT_LIMIT: usize = 5 * 1024 * 1024;
const INDIVIDUAL_IMPORT_LIMIT: usize = 2 * 1024 * 1024;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if it exists
    dotenvy::dotenv().ok();

    // Ensure critical environment variables are set
    env::var("JWT_SECRET").expect("JWT_SECRET must be set");

    // Initialize Tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "in_kind_tracker=info,tower_http=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting In-Kind Tracker API...");

    // Database Setup
    tracing::info!("Initializing database connection pool...");
    let db_pool = db::init_pool().await?;
    tracing::info!("Database connection pool initialized successfully");

    let state = AppState { db: db_pool };

    let governor_config = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(
                env::var("RATE_LIMIT_PER_SECOND")
                    .ok()
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(1200),
            )
            .burst_size(
                env::var("RATE_LIMIT_BURST")
                    .ok()
                    .and_then(|v| v.parse::<u32>().ok())
                    .unwrap_or(2400),
            )
            .finish()
            .expect("governor config"),
    );

    // CORS configuration (no permissive mode)
    let cors = {
        let env_mode = env::var("RUST_ENV").unwrap_or_else(|_| "development".to_string());
        let origins = env::var("ALLOWED_ORIGINS")
            .ok()
            .map(|v| {
                v.split(',')
                    .filter_map(|s| {
                        let trimmed = s.trim();
                        if trimmed.is_empty() {
                            return None;
                        }
                        match trimmed.parse::<HeaderValue>() {
                            Ok(value) => Some(value),
                            Err(_) => {
                                tracing::warn!(
                                    "Ignoring invalid ALLOWED_ORIGINS entry: {}",
                                    trimmed
                                );
                                None
                            }
                        }
                    })
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();

        let origins = if origins.is_empty() {
            if env_mode == "production" {
                panic!("ALLOWED_ORIGINS must contain at least one valid origin in production")
            }
            vec![
                HeaderValue::from_static("http://localhost:3000"),
                HeaderValue::from_static("http://127.0.0.1:3000"),
            ]
        } else {
            origins
        };

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::PATCH,
                axum::http::Method::DELETE,
                axum::http::Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
            .allow_credentials(true)
    };

    // Router Setup
    let app = Router::new()
        .route("/health", get(health_check))
        .route(
            "/donation",
            get(routes::donations::list).post(routes::donations::create),
        )
        .route(
            "/donation/import",
            post(routes::donations::import).layer(DefaultBodyLimit::max(DONATION_IMPORT_LIMIT)),
        )
        .route(
            "/donation/{donation_id}",
            get(routes::donations::get)
                .patch(routes::donations::update)
                .delete(routes::donations::delete),
        )
        .route(
            "/individual",
            get(routes::individuals::list).post(routes::individuals::create),
        )
        .route(
            "/individual/import",
            post(routes::individuals::import)
                .layer(DefaultBodyLimit::max(INDIVIDUAL_IMPORT_LIMIT)),
        )
        .route(
            "/individual/{individual_id}",
            get(routes::individuals::get)
                .patch(routes::individuals::update)
                .delete(routes::individuals::delete),
        )
        .route(
            "/organization",
            get(routes::organizations::list).post(routes::organizations::create),
        )
        .route(
            "/organization/{organization_code}",
            get(routes::organizations::get)
                .patch(routes::organizations::update)
                .delete(routes::organizations::delete),
        )
        .route(
            "/ministry",
            get(routes::ministries::list).post(routes::ministries::create),
        )
        .route(
            "/ministry/{ministry_code}",
            get(routes::ministries::get)
                .patch(routes::ministries::update)
                .delete(routes::ministries::delete),
        )
        .route(
            "/wish-list",
            get(routes::wish_list::list).post(routes::wish_list::create),
        )
        .route(
            "/wish-list/{wishlist_id}",
            get(routes::wish_list::get)
                .patch(routes::wish_list::update)
                .delete(routes::wish_list::delete),
        )
        .route("/reports/years", get(routes::reports::list_available_years))
        .route("/reports/export", get(routes::reports::export_csv))
        .route("/me", get(auth::me))
        // Auth Routes
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .layer(from_fn(require_auth))
        .layer(cors)
        .layer(GovernorLayer::new(governor_config))
        .layer(TraceLayer::new_for_http())
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::STRICT_TRANSPORT_SECURITY,
            HeaderValue::from_static("max-age=31536000; includeSubDomains"),
        ))
        .with_state(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], 8080));
    tracing::info!("listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("signal received, starting graceful shutdown");
}

async fn health_check() -> &'static str {
    "OK"
}

async fn require_auth(req: Request<Body>, next: Next) -> Response {
    let path = req.uri().path();
    if req.method() == axum::http::Method::OPTIONS
        || path == "/health"
        || path.starts_with("/auth/")
    {
        return next.run(req).await;
    }

    if let Some(token) = auth::extract_token_from_headers(req.headers()) {
        if auth::validate_token_str(&token).is_ok() {
            return next.run(req).await;
        }
    }

    (StatusCode::UNAUTHORIZED, "Unauthorized").into_response()
}
