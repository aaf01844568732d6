// secpoint-backend/src/api/handlers/user_handler.rs
use crate::api::dto::common::ApiResponse;
use crate::api::dto::user_dto::{UserCommandRequest, UserProfileResponse};
use crate::api::handlers::AppState;
use crate::domain::security_point_model::well_known;
use crate::error::AppResult;
use crate::middleware::auth::{jwt_auth_middleware, AuthenticatedUser};
use axum::{
    extract::{Extension, Json, Path, State},
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};

/// ユーザープロフィールを取得 (要 manage_users ポイント)
pub async fn get_user_handler(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(username): Path<String>,
) -> AppResult<Json<ApiResponse<UserProfileResponse>>> {
    state
        .permission_service
        .ensure(&auth_user.claims, well_known::MANAGE_USERS)
        .await?;

    let profile = state.user_service.get_profile(&username).await?;
    Ok(Json(ApiResponse::success("User profile", profile)))
}

/// ユーザー更新コマンドを実行 (要 manage_users、ポイント操作は追加で
/// manage_user_sec_points ポイント)
pub async fn user_command_handler(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(username): Path<String>,
    Json(payload): Json<UserCommandRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    state
        .permission_service
        .ensure(&auth_user.claims, well_known::MANAGE_USERS)
        .await?;

    if payload.command.touches_sec_points() {
        state
            .permission_service
            .ensure(&auth_user.claims, well_known::MANAGE_USER_SEC_POINTS)
            .await?;
    }

    let message = state
        .user_service
        .execute_command(&auth_user.claims, &username, payload)
        .await?;

    Ok(Json(ApiResponse::<()>::success_message(message)))
}

/// ユーザー管理ルーター
pub fn user_router(state: AppState) -> Router {
    Router::new()
        .route("/auth/users/{username}", get(get_user_handler))
        .route("/auth/users/{username}/commands", post(user_command_handler))
        .route_layer(from_fn_with_state(state.clone(), jwt_auth_middleware))
        .with_state(state)
}
