// secpoint-backend/src/api/handlers/server_event_handler.rs
use crate::api::dto::common::ApiResponse;
use crate::api::dto::server_event_dto::{ServerEventQuery, ServerEventsResponse};
use crate::api::handlers::AppState;
use crate::domain::security_point_model::well_known;
use crate::error::AppResult;
use crate::middleware::auth::{jwt_auth_middleware, AuthenticatedUser};
use crate::repository::server_event_repository::ServerEventFilter;
use axum::{
    extract::{Extension, Json, Query, State},
    middleware::from_fn_with_state,
    routing::get,
    Router,
};

/// サーバーイベントを検索 (要 view_server_events ポイント)
pub async fn list_server_events_handler(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Query(query): Query<ServerEventQuery>,
) -> AppResult<Json<ApiResponse<ServerEventsResponse>>> {
    state
        .permission_service
        .ensure(&auth_user.claims, well_known::VIEW_SERVER_EVENTS)
        .await?;

    let limit = query.limit.unwrap_or(10);
    let events = state
        .server_event_service
        .list(ServerEventFilter {
            limit: Some(limit),
            event_type: query.event_type,
            server_run_id: query.server_run_id,
        })
        .await?;

    Ok(Json(ApiResponse::success(
        "Server events",
        ServerEventsResponse { limit, events },
    )))
}

/// サーバーイベントルーター
pub fn server_event_router(state: AppState) -> Router {
    Router::new()
        .route("/api/server-events", get(list_server_events_handler))
        .route_layer(from_fn_with_state(state.clone(), jwt_auth_middleware))
        .with_state(state)
}
