// secpoint-backend/src/main.rs
use axum::http::{header, HeaderValue, Method};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod api;
mod config;
mod db;
mod domain;
mod error;
mod logging;
mod middleware;
mod repository;
mod service;
mod utils;

use crate::api::handlers::{
    auth_handler::auth_router, group_handler::group_router,
    security_point_handler::security_point_router, server_event_handler::server_event_router,
    user_handler::user_router, AppState,
};
use crate::config::Config;
use crate::db::create_db_pool;
use crate::logging::logging_middleware;
use crate::middleware::security_headers::security_headers_middleware;
use crate::repository::api_key_repository::ApiKeyRepository;
use crate::repository::group_repository::GroupRepository;
use crate::repository::security_point_repository::SecurityPointRepository;
use crate::repository::server_event_repository::ServerEventRepository;
use crate::repository::user_repository::UserRepository;
use crate::service::auth_service::AuthService;
use crate::service::group_service::GroupService;
use crate::service::permission_service::PermissionService;
use crate::service::security_point_service::SecurityPointService;
use crate::service::seed_service::SeedService;
use crate::service::server_event_service::{ServerEventService, ServerRunId};
use crate::service::user_service::UserService;
use crate::utils::jwt::JwtManager;
use crate::utils::password::PasswordManager;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // トレーシングの設定
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "secpoint_backend=info,tower_http=info".into()),
        )
        .with(fmt::layer())
        .init();

    tracing::info!("Starting secpoint backend server...");

    // 設定を読み込む
    let app_config = Config::from_env().expect("Failed to load configuration");
    tracing::info!("Configuration loaded: {:?}", app_config);

    // データベース接続を作成
    let db_pool = create_db_pool(&app_config)
        .await
        .expect("Failed to create database pool");
    tracing::info!("Database pool created successfully.");

    // リポジトリ
    let user_repo = Arc::new(UserRepository::new(db_pool.clone()));
    let group_repo = Arc::new(GroupRepository::new(db_pool.clone()));
    let sec_point_repo = Arc::new(SecurityPointRepository::new(db_pool.clone()));
    let api_key_repo = Arc::new(ApiKeyRepository::new(db_pool.clone()));
    let server_event_repo = Arc::new(ServerEventRepository::new(db_pool.clone()));

    // 起動識別子と監査イベントサービス
    let run_id = ServerRunId::generate();
    tracing::info!(server_run_id = %run_id, "Server run id assigned");
    let event_service = Arc::new(ServerEventService::new(server_event_repo, run_id));
    event_service.record_server_start().await;

    // 認証系マネージャー
    let jwt_manager = Arc::new(JwtManager::from_env().expect("Failed to configure JWT"));
    let password_manager = Arc::new(PasswordManager::from_env());

    // サービス
    let permission_service = Arc::new(PermissionService::new(
        user_repo.clone(),
        group_repo.clone(),
        event_service.clone(),
    ));
    let auth_service = Arc::new(AuthService::new(
        user_repo.clone(),
        api_key_repo.clone(),
        password_manager.clone(),
        jwt_manager.clone(),
        permission_service.clone(),
        event_service.clone(),
    ));
    let user_service = Arc::new(UserService::new(
        user_repo.clone(),
        group_repo.clone(),
        sec_point_repo.clone(),
        permission_service.clone(),
        event_service.clone(),
    ));
    let group_service = Arc::new(GroupService::new(group_repo.clone()));
    let security_point_service = Arc::new(SecurityPointService::new(sec_point_repo.clone()));

    // カタログをシード
    let seed_service = SeedService::new(
        sec_point_repo.clone(),
        group_repo.clone(),
        event_service.clone(),
    );
    seed_service
        .apply()
        .await
        .expect("Failed to seed security point catalogue");
    tracing::info!("Security point catalogue seeded.");

    let state = AppState {
        auth_service,
        user_service,
        group_service,
        security_point_service,
        server_event_service: event_service,
        permission_service,
        user_repository: user_repo,
        jwt_manager,
        access_token_cookie_name: app_config.access_token_cookie_name.clone(),
    };

    // CORSの設定
    let origins: Vec<HeaderValue> = app_config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
        .max_age(Duration::from_secs(12 * 60 * 60));

    // ルーターの設定
    let app_router = auth_router(state.clone())
        .merge(user_router(state.clone()))
        .merge(group_router(state.clone()))
        .merge(security_point_router(state.clone()))
        .merge(server_event_router(state))
        .layer(axum::middleware::from_fn(logging_middleware))
        .layer(axum::middleware::from_fn(security_headers_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    // サーバーの起動
    tracing::info!(
        "Router configured. Server listening on {}",
        app_config.server_addr
    );

    let listener = TcpListener::bind(&app_config.server_addr).await?;
    axum::serve(listener, app_router.into_make_service()).await?;

    Ok(())
}
