// secpoint-backend/src/api/dto/auth_dto.rs

use crate::domain::user_model::SafeUser;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

// --- リクエストDTO ---

/// ユーザー登録リクエスト
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(length(min = 3, max = 30, message = "Username must be between 3 and 30 characters"))]
    pub username: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,

    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// ログインリクエスト
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SigninRequest {
    #[validate(length(min = 1, message = "Email or username is required"))]
    pub identifier: String, // email or username

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// APIキーからJWTを取得するリクエスト
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TokenFromApiKeyRequest {
    #[validate(length(min = 1, message = "API key is required"))]
    pub key: String,
}

/// パスワード変更リクエスト
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,

    #[validate(length(min = 8, message = "New password must be at least 8 characters"))]
    pub new_password: String,
}

/// APIキー発行リクエスト
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct GenerateApiKeyRequest {
    #[validate(length(min = 1, max = 200, message = "Description is required"))]
    pub description: String,
}

// --- レスポンスDTO ---

/// 認証成功レスポンス
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthTokenResponse {
    pub user: SafeUser,
    pub access_token: String,
    pub token_type: String,
    pub expires_in_minutes: i64,
}

/// APIキー発行レスポンス。キー本体はこのレスポンスでしか見えない
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateApiKeyResponse {
    pub user: String,
    pub api_key: String,
    pub description: String,
    pub expires_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signup_request_validation() {
        let valid = SignupRequest {
            username: "newuser".to_string(),
            email: "new@example.com".to_string(),
            first_name: "New".to_string(),
            last_name: "User".to_string(),
            password: "Password1".to_string(),
        };
        assert!(valid.validate().is_ok());

        let bad_email = SignupRequest {
            email: "not-an-email".to_string(),
            ..valid.clone()
        };
        assert!(bad_email.validate().is_err());

        let short_username = SignupRequest {
            username: "ab".to_string(),
            ..valid
        };
        assert!(short_username.validate().is_err());
    }

    #[test]
    fn test_signin_request_requires_fields() {
        let empty = SigninRequest {
            identifier: String::new(),
            password: String::new(),
        };
        assert!(empty.validate().is_err());
    }
}
