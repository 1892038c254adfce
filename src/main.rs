use axum::{
    routing::{get, post},
    Router,
};
use assessment_backend::{
    config::Config, database::pool::create_pool, middleware::auth,
    middleware::rate_limit::{rps_middleware, RateLimiter},
    routes, AppState,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let config = Config::from_env()?;

    let pool = create_pool(&config).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let app_state = AppState::new(pool, config.clone());

    let base_routes = Router::new().route("/health", get(routes::health::health));

    let admission_api = Router::new()
        .route(
            "/api/admission/:token",
            get(routes::admission::resolve_admission),
        )
        .route(
            "/api/admission/:token/check",
            post(routes::admission::check_admission),
        )
        .layer(axum::middleware::from_fn_with_state(
            RateLimiter::new(config.public_rps),
            rps_middleware,
        ));

    let session_api = Router::new()
        .route("/api/session/start", post(routes::session::start_session))
        .route("/api/session/end", post(routes::session::end_session))
        .route(
            "/api/session/complete",
            post(routes::session::complete_session),
        )
        .route(
            "/api/session/status",
            get(routes::session::get_session_status),
        )
        .layer(axum::middleware::from_fn_with_state(
            app_state.clone(),
            auth::require_candidate,
        ))
        .layer(axum::middleware::from_fn_with_state(
            RateLimiter::new(config.public_rps),
            rps_middleware,
        ));

    let integration_api = Router::new()
        .route(
            "/api/integration/sessions",
            get(routes::dashboard::list_sessions),
        )
        .route(
            "/api/integration/sessions/:identity",
            get(routes::dashboard::get_session_by_identity),
        )
        .layer(axum::middleware::from_fn_with_state(
            app_state.clone(),
            auth::require_reviewer,
        ))
        .layer(axum::middleware::from_fn_with_state(
            RateLimiter::new(config.integration_rps),
            rps_middleware,
        ));

    let app = base_routes
        .merge(admission_api)
        .merge(session_api)
        .merge(integration_api)
        .with_state(app_state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
