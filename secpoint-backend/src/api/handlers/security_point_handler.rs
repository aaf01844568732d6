// secpoint-backend/src/api/handlers/security_point_handler.rs
use crate::api::dto::common::ApiResponse;
use crate::api::dto::security_point_dto::{
    SecurityPointDetailResponse, SecurityPointListResponse,
};
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

/// セキュリティポイント詳細を取得 (要 manage_users ポイント)
pub async fn get_security_point_handler(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(sec_point_id): Path<i32>,
) -> AppResult<Json<ApiResponse<SecurityPointDetailResponse>>> {
    state
        .permission_service
        .ensure(&auth_user.claims, well_known::MANAGE_USERS)
        .await?;

    let point = state.security_point_service.get_point(sec_point_id).await?;
    Ok(Json(ApiResponse::success("Security point detail", point)))
}

/// カタログ一覧を取得 (要 manage_users ポイント)
pub async fn list_security_points_handler(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
) -> AppResult<Json<ApiResponse<SecurityPointListResponse>>> {
    state
        .permission_service
        .ensure(&auth_user.claims, well_known::MANAGE_USERS)
        .await?;

    let points = state.security_point_service.list_points().await?;
    Ok(Json(ApiResponse::success("Security points", points)))
}

/// セキュリティポイント参照ルーター
pub fn security_point_router(state: AppState) -> Router {
    Router::new()
        .route("/auth/security-points", get(list_security_points_handler))
        .route(
            "/auth/security-points/{sec_point_id}",
            get(get_security_point_handler),
        )
        .route_layer(from_fn_with_state(state.clone(), jwt_auth_middleware))
        .with_state(state)
}
