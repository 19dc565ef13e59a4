mod core;
mod features;
mod modules;
mod shared;

use std::sync::Arc;
use std::time::Duration;

use axum::middleware::from_fn_with_state;
use axum::Router;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::core::config::Config;
use crate::core::openapi::ApiDoc;
use crate::core::{database, middleware};
use crate::features::auth::handlers::AuthState;
use crate::features::auth::routes as auth_routes;
use crate::features::auth::services::{AuthService, TokenService};
use crate::features::drafts::{routes as drafts_routes, DraftService, PgDraftStore};
use crate::features::files::{routes as files_routes, FileService};
use crate::features::maintenance::handlers::MaintenanceState;
use crate::features::maintenance::{
    routes as maintenance_routes, PgWorkflowStore, TaskService, WorkflowService,
};
use crate::features::rate_limits::RateLimitService;
use crate::features::reports::handlers::ReportState;
use crate::features::reports::{routes as reports_routes, ReportService};
use crate::features::users::{routes as users_routes, UserService};
use crate::modules::storage::LocalStorage;
use crate::shared::constants::DRAFT_TTL_SECS;

fn main() -> anyhow::Result<()> {
    let workers = worker_thread_count();

    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(workers)
        .max_blocking_threads(workers * 4)
        .enable_all()
        .build()?
        .block_on(run(workers))
}

/// TOKIO_WORKER_THREADS override, otherwise one worker per core
fn worker_thread_count() -> usize {
    std::env::var("TOKIO_WORKER_THREADS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(4)
        })
}

async fn run(workers: usize) -> anyhow::Result<()> {
    // .env first, so RUST_LOG is in place before the subscriber reads it
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;
    tracing::info!(
        "Starting up: pid={}, tokio_worker_threads={}",
        std::process::id(),
        workers
    );

    let pool = database::create_pool(&config.database).await?;
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;
    tracing::info!("Database ready, migrations applied");

    let token_service = Arc::new(TokenService::new(&config.auth));
    let auth_service = Arc::new(AuthService::new(pool.clone(), Arc::clone(&token_service)));

    let rate_limiter = Arc::new(RateLimitService::new(&config.rate_limit));
    tracing::info!(
        "Rate limiter ready: {} request(s) per {}s window",
        config.rate_limit.max_requests,
        config.rate_limit.window.as_secs()
    );

    let storage = Arc::new(LocalStorage::new(&config.storage));
    let file_service = Arc::new(FileService::new(storage));
    tracing::info!("File storage ready at {}", config.storage.root_dir);

    let user_service = Arc::new(UserService::new(pool.clone()));

    // The workflow engine owns every lifecycle mutation; report and task
    // services are read-side only.
    let workflow_store = Arc::new(PgWorkflowStore::new(pool.clone()));
    let workflow_service = Arc::new(WorkflowService::new(workflow_store));
    let report_service = Arc::new(ReportService::new(pool.clone()));
    let task_service = Arc::new(TaskService::new(pool.clone()));

    let draft_store = Arc::new(PgDraftStore::new(pool.clone()));
    let draft_service = Arc::new(DraftService::new(
        draft_store,
        Duration::from_secs(DRAFT_TTL_SECS),
    ));
    tracing::info!("Workflow, report and draft services ready");

    let auth_state = AuthState {
        auth: auth_service,
        rate_limiter: Arc::clone(&rate_limiter),
    };

    let report_state = ReportState {
        reports: report_service,
        workflow: Arc::clone(&workflow_service),
        drafts: Arc::clone(&draft_service),
        rate_limiter: Arc::clone(&rate_limiter),
    };

    let maintenance_state = MaintenanceState {
        workflow: workflow_service,
        tasks: task_service,
        drafts: Arc::clone(&draft_service),
        rate_limiter,
    };

    let protected = Router::new()
        .merge(auth_routes::protected_routes(auth_state.clone()))
        .merge(users_routes::routes(user_service))
        .merge(reports_routes::routes(report_state))
        .merge(maintenance_routes::routes(maintenance_state))
        .merge(drafts_routes::routes(draft_service))
        .merge(files_routes::routes(file_service))
        .route_layer(from_fn_with_state(
            token_service,
            middleware::require_bearer_auth,
        ));

    let app = Router::new()
        .merge(swagger_router(&config))
        .merge(protected)
        .merge(auth_routes::public_routes(auth_state))
        .route("/health", axum::routing::get(health))
        .layer(middleware::cors_layer(
            config.app.cors_allowed_origins.clone(),
        ))
        .layer(axum::extract::DefaultBodyLimit::max(
            config.app.max_request_body_size,
        ))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(middleware::RequestSpan)
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::x_request_id(middleware::UuidRequestId));

    let addr = config.app.server_address();
    let listener = bind_listener(&addr)?;
    tracing::info!("Server listening on http://{}", addr);
    tracing::info!("Swagger UI at http://{}/swagger-ui/", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

async fn health() -> axum::http::StatusCode {
    axum::http::StatusCode::OK
}

/// Swagger UI router, info patched from config, basic auth when configured
fn swagger_router(config: &Config) -> Router {
    let mut openapi = ApiDoc::openapi();
    openapi.info.title = config.swagger.title.clone();
    openapi.info.version = config.swagger.version.clone();
    openapi.info.description = Some(config.swagger.description.clone());

    let ui = SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi);

    match config.swagger.credentials() {
        Some(credentials) => {
            tracing::info!("Swagger UI basic auth enabled");
            Router::new().merge(ui).layer(from_fn_with_state(
                Arc::new(credentials),
                middleware::swagger_basic_auth,
            ))
        }
        None => {
            tracing::info!("Swagger UI basic auth disabled (no credentials configured)");
            Router::new().merge(ui)
        }
    }
}

/// Bind with socket options tuned for many short-lived connections
fn bind_listener(addr: &str) -> anyhow::Result<tokio::net::TcpListener> {
    let socket_addr: std::net::SocketAddr = addr
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid address '{}': {}", addr, e))?;

    let socket = socket2::Socket::new(
        socket2::Domain::for_address(socket_addr),
        socket2::Type::STREAM,
        Some(socket2::Protocol::TCP),
    )?;

    socket.set_reuse_address(true)?;
    #[cfg(unix)]
    socket.set_reuse_port(true)?;
    socket.set_nodelay(true)?;
    socket.set_recv_buffer_size(256 * 1024)?;
    socket.set_send_buffer_size(256 * 1024)?;

    #[cfg(target_os = "linux")]
    {
        let keepalive = socket2::TcpKeepalive::new()
            .with_time(std::time::Duration::from_secs(60))
            .with_interval(std::time::Duration::from_secs(10))
            .with_retries(3);
        socket.set_tcp_keepalive(&keepalive)?;
    }
    #[cfg(not(target_os = "linux"))]
    {
        let keepalive = socket2::TcpKeepalive::new().with_time(std::time::Duration::from_secs(60));
        socket.set_tcp_keepalive(&keepalive)?;
    }

    socket.set_nonblocking(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(65535)?;

    Ok(tokio::net::TcpListener::from_std(socket.into())?)
}
