// secpoint-backend/src/api/handlers/mod.rs

pub mod auth_handler;
pub mod group_handler;
pub mod security_point_handler;
pub mod server_event_handler;
pub mod user_handler;

use crate::repository::user_repository::UserRepository;
use crate::service::auth_service::AuthService;
use crate::service::group_service::GroupService;
use crate::service::permission_service::PermissionService;
use crate::service::security_point_service::SecurityPointService;
use crate::service::server_event_service::ServerEventService;
use crate::service::user_service::UserService;
use crate::utils::jwt::JwtManager;
use std::sync::Arc;

/// 全ハンドラーで共有するアプリケーション状態
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
    pub user_service: Arc<UserService>,
    pub group_service: Arc<GroupService>,
    pub security_point_service: Arc<SecurityPointService>,
    pub server_event_service: Arc<ServerEventService>,
    pub permission_service: Arc<PermissionService>,
    pub user_repository: Arc<UserRepository>,
    pub jwt_manager: Arc<JwtManager>,
    pub access_token_cookie_name: String,
}
