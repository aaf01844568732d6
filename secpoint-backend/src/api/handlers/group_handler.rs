// secpoint-backend/src/api/handlers/group_handler.rs
use crate::api::dto::common::ApiResponse;
use crate::api::dto::group_dto::{GroupDetailResponse, GroupListResponse};
use crate::api::handlers::AppState;
use crate::domain::security_point_model::well_known;
use crate::error::AppResult;
use crate::middleware::auth::{jwt_auth_middleware, AuthenticatedUser};
use axum::{
    extract::{Extension, Json, Path, State},
    middleware::from_fn_with_state,
    routing::get,
    Router,
};

/// グループ詳細を取得 (要 manage_users ポイント)
pub async fn get_group_handler(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(group_id): Path<i32>,
) -> AppResult<Json<ApiResponse<GroupDetailResponse>>> {
    state
        .permission_service
        .ensure(&auth_user.claims, well_known::MANAGE_USERS)
        .await?;

    let group = state.group_service.get_group(group_id).await?;
    Ok(Json(ApiResponse::success("Group detail", group)))
}

/// グループ一覧を取得 (要 manage_users ポイント)
pub async fn list_groups_handler(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
) -> AppResult<Json<ApiResponse<GroupListResponse>>> {
    state
        .permission_service
        .ensure(&auth_user.claims, well_known::MANAGE_USERS)
        .await?;

    let groups = state.group_service.list_groups().await?;
    Ok(Json(ApiResponse::success("Groups", groups)))
}

/// グループ参照ルーター
pub fn group_router(state: AppState) -> Router {
    Router::new()
        .route("/auth/groups", get(list_groups_handler))
        .route("/auth/groups/{group_id}", get(get_group_handler))
        .route_layer(from_fn_with_state(state.clone(), jwt_auth_middleware))
        .with_state(state)
}
