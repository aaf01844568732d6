// secpoint-backend/src/api/handlers/auth_handler.rs
use crate::api::dto::auth_dto::*;
use crate::api::dto::common::ApiResponse;
use crate::api::handlers::AppState;
use crate::domain::security_point_model::well_known;
use crate::error::AppResult;
use crate::middleware::auth::{jwt_auth_middleware, AuthenticatedUser};
use axum::{
    extract::{Extension, Json, State},
    http::StatusCode,
    middleware::from_fn_with_state,
    routing::{post, put},
    Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tracing::info;

/// ユーザー登録 (要 create_users ポイント)
pub async fn signup_handler(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Json(payload): Json<SignupRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<AuthTokenResponse>>)> {
    state
        .permission_service
        .ensure(&auth_user.claims, well_known::CREATE_USERS)
        .await?;

    let response = state.auth_service.signup(payload).await?;
    info!(
        created = %response.user.username,
        by = %auth_user.username(),
        "User created"
    );

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("User created", response)),
    ))
}

/// ログイン。アクセストークンをボディとクッキーの両方で返す
pub async fn signin_handler(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<SigninRequest>,
) -> AppResult<(CookieJar, Json<ApiResponse<AuthTokenResponse>>)> {
    let response = state.auth_service.signin(payload).await?;

    let cookie = Cookie::build((
        state.access_token_cookie_name.clone(),
        response.access_token.clone(),
    ))
    .path("/")
    .http_only(true)
    .same_site(SameSite::Lax)
    .build();

    Ok((
        jar.add(cookie),
        Json(ApiResponse::success("Signed in successfully", response)),
    ))
}

/// APIキーからJWTを発行
pub async fn token_from_api_key_handler(
    State(state): State<AppState>,
    Json(payload): Json<TokenFromApiKeyRequest>,
) -> AppResult<Json<ApiResponse<AuthTokenResponse>>> {
    let response = state.auth_service.token_from_api_key(payload).await?;
    Ok(Json(ApiResponse::success("Token issued", response)))
}

/// 自分のパスワードを変更
pub async fn change_password_handler(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Json(payload): Json<ChangePasswordRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    state
        .auth_service
        .change_password(auth_user.user_id(), payload)
        .await?;
    Ok(Json(ApiResponse::<()>::success_message(
        "Password changed successfully",
    )))
}

/// 自分用のAPIキーを発行 (要 generate_api_keys ポイント)
pub async fn generate_api_key_handler(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Json(payload): Json<GenerateApiKeyRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<GenerateApiKeyResponse>>)> {
    state
        .permission_service
        .ensure(&auth_user.claims, well_known::GENERATE_API_KEYS)
        .await?;

    let response = state
        .auth_service
        .generate_api_key(auth_user.user_id(), payload)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("API key generated", response)),
    ))
}

/// 認証ルーター
pub fn auth_router(state: AppState) -> Router {
    let public = Router::new()
        .route("/auth/signin", post(signin_handler))
        .route("/auth/token", post(token_from_api_key_handler));

    let protected = Router::new()
        .route("/auth/signup", post(signup_handler))
        .route("/auth/change-password", put(change_password_handler))
        .route("/auth/api-key", post(generate_api_key_handler))
        .route_layer(from_fn_with_state(state.clone(), jwt_auth_middleware));

    public.merge(protected).with_state(state)
}
