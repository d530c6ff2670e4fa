//! # Server Configuration
//!
//! Router assembly, shared state and the OpenAPI document for the CSA LOOP directory API.

use std::sync::Arc;

use anyhow::Context;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware::from_fn,
    routing::{get, post},
};
use sea_orm::DatabaseConnection;
use tower_http::{services::ServeDir, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::auth::SessionCodec;
use crate::config::AppConfig;
use crate::handlers;
use crate::telemetry::trace_context_middleware;
use crate::upload::{BlobStore, LocalBlobStore};

/// Multipart framing allowance on top of the configured file size limit.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db: Arc<DatabaseConnection>,
    pub sessions: Arc<SessionCodec>,
    pub blob_store: Arc<dyn BlobStore>,
}

impl AppState {
    /// Builds state from validated configuration, storing uploads on the local filesystem.
    pub fn new(config: AppConfig, db: DatabaseConnection) -> anyhow::Result<Self> {
        let sessions = SessionCodec::from_config(&config).context("invalid session key")?;
        let blob_store = LocalBlobStore::new(&config.upload_dir, &config.blob_url_prefix);

        Ok(Self {
            config: Arc::new(config),
            db: Arc::new(db),
            sessions: Arc::new(sessions),
            blob_store: Arc::new(blob_store),
        })
    }
}

/// Creates and configures the Axum application router
pub fn create_app(state: AppState) -> Router {
    let upload_limit = state
        .config
        .upload_max_bytes
        .saturating_add(MULTIPART_OVERHEAD_BYTES);
    let uploads = ServeDir::new(&state.config.upload_dir);

    let upload_routes = Router::new()
        .route("/upload", post(handlers::upload::upload_image))
        .layer(DefaultBodyLimit::max(upload_limit));

    Router::new()
        .route("/", get(handlers::root))
        .route("/healthz", get(handlers::healthz))
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/logout", post(handlers::auth::logout))
        .route("/auth/me", get(handlers::auth::me))
        .route("/bases", get(handlers::bases::list_bases))
        .route("/communities", get(handlers::communities::list_communities))
        .route("/communities/{id}", get(handlers::communities::get_community))
        .route(
            "/profile/communities",
            get(handlers::profile::list_owned_communities),
        )
        .route(
            "/profile/communities/create",
            post(handlers::profile::create_community),
        )
        .route(
            "/profile/communities/{id}",
            get(handlers::profile::get_community_for_edit).put(handlers::profile::update_community),
        )
        .merge(upload_routes)
        .with_state(state)
        .nest_service("/uploads", uploads)
        .merge(SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(from_fn(trace_context_middleware))
}

/// Starts the server with the given configuration
pub async fn run_server(config: AppConfig, db: DatabaseConnection) -> anyhow::Result<()> {
    let addr = config
        .bind_addr()
        .with_context(|| format!("invalid server address '{}'", config.api_bind_addr))?;
    let profile = config.profile.clone();

    let app = create_app(AppState::new(config, db)?);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, %profile, "Server listening");

    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::root,
        crate::handlers::healthz,
        crate::handlers::auth::register,
        crate::handlers::auth::login,
        crate::handlers::auth::logout,
        crate::handlers::auth::me,
        crate::handlers::bases::list_bases,
        crate::handlers::communities::list_communities,
        crate::handlers::communities::get_community,
        crate::handlers::profile::create_community,
        crate::handlers::profile::get_community_for_edit,
        crate::handlers::profile::update_community,
        crate::handlers::profile::list_owned_communities,
        crate::handlers::upload::upload_image,
    ),
    components(
        schemas(
            crate::models::ServiceInfo,
            crate::error::ApiError,
            crate::auth::Session,
            crate::repositories::PublicUser,
            crate::repositories::BaseOption,
            crate::repositories::FarmerSummary,
            crate::repositories::FarmerDetail,
            crate::repositories::SeasonalProductView,
            crate::handlers::types::MessageResponse,
            crate::handlers::types::SavedResponse,
            crate::handlers::types::HealthResponse,
            crate::handlers::auth::RegisterRequest,
            crate::handlers::auth::LoginRequest,
            crate::handlers::auth::UserResponse,
            crate::handlers::auth::MeResponse,
            crate::handlers::bases::BasesResponse,
            crate::handlers::communities::CommunitiesResponse,
            crate::handlers::communities::CommunityResponse,
            crate::handlers::profile::FarmerPayload,
            crate::handlers::profile::CustomBasePayload,
            crate::handlers::profile::SeasonalProductPayload,
            crate::handlers::profile::OwnedCommunitiesResponse,
            crate::handlers::upload::UploadForm,
            crate::handlers::upload::UploadResponse,
        )
    ),
    tags(
        (name = "auth", description = "Registration and cookie sessions"),
        (name = "communities", description = "Public directory"),
        (name = "profile", description = "Community management for the logged-in user"),
    ),
    info(
        title = "CSA LOOP Directory API",
        description = "Community-supported agriculture directory: farmers, pickup bases and seasonal products",
        version = env!("CARGO_PKG_VERSION"),
    )
)]
pub struct ApiDoc;

/// State for router tests: a fixed session key is filled in when `config` has none.
pub fn create_test_app_state(
    mut config: AppConfig,
    db: DatabaseConnection,
) -> anyhow::Result<AppState> {
    if config.session_key.is_none() {
        config.session_key = Some(vec![7u8; 32]);
    }
    AppState::new(config, db)
}
