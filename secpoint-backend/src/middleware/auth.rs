// secpoint-backend/src/middleware/auth.rs

use crate::api::handlers::AppState;
use crate::domain::user_model::UserClaims;
use crate::error::AppError;
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::warn;

/// 認証済みユーザー情報を格納するエクステンション
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub claims: UserClaims,
}

impl AuthenticatedUser {
    pub fn new(claims: UserClaims) -> Self {
        Self { claims }
    }

    pub fn user_id(&self) -> uuid::Uuid {
        self.claims.user_id
    }

    pub fn username(&self) -> &str {
        &self.claims.username
    }
}

/// JWT認証ミドルウェア
///
/// Bearerヘッダーまたはクッキーのトークンを検証し、DB上のユーザーが
/// 現存してアクティブであることまで確認してからリクエストを通す。
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    cookie_jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = request.uri().path().to_string();

    let token = extract_token(&headers, &cookie_jar, &state.access_token_cookie_name)
        .ok_or_else(|| {
            warn!(path = %path, "Missing authentication token");
            AppError::Unauthorized("Authentication required".to_string())
        })?;

    let access_claims = state.jwt_manager.verify_access_token(&token).map_err(|e| {
        warn!(path = %path, error = %e, "Invalid access token");
        AppError::Unauthorized("Invalid or expired token".to_string())
    })?;

    // トークン発行後にユーザーが消えたり無効化されていないかをDBで確認する
    let user = state
        .user_repository
        .find_by_id(access_claims.user.user_id)
        .await?
        .ok_or_else(|| {
            warn!(path = %path, user_id = %access_claims.user.user_id, "Token user not found");
            AppError::Unauthorized("Username not found".to_string())
        })?;

    if !user.can_authenticate() {
        warn!(
            path = %path,
            username = %user.username,
            "Access attempt with deactivated account"
        );
        return Err(AppError::Forbidden("User is disabled".to_string()));
    }

    request
        .extensions_mut()
        .insert(AuthenticatedUser::new(user.to_claims()));

    Ok(next.run(request).await)
}

/// Authorization ヘッダー、なければクッキーからトークンを取り出す
fn extract_token(
    headers: &HeaderMap,
    cookie_jar: &CookieJar,
    cookie_name: &str,
) -> Option<String> {
    if let Some(token) = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
    {
        return Some(token.to_string());
    }

    cookie_jar
        .get(cookie_name)
        .map(|cookie| cookie.value().to_string())
}
