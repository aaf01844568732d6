// secpoint-backend/src/service/auth_service.rs
use crate::api::dto::auth_dto::*;
use crate::domain::security_point_model::well_known;
use crate::domain::server_event_model::status;
use crate::error::{AppError, AppResult};
use crate::repository::api_key_repository::{ApiKeyRepository, CreateApiKey};
use crate::repository::user_repository::{CreateUser, UserRepository};
use crate::service::permission_service::PermissionService;
use crate::service::server_event_service::ServerEventService;
use crate::utils::api_key::generate_api_key_value;
use crate::utils::jwt::JwtManager;
use crate::utils::password::{PasswordError, PasswordManager};
use chrono::{Duration, Months, Utc};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

/// 認証サービス
pub struct AuthService {
    user_repo: Arc<UserRepository>,
    api_key_repo: Arc<ApiKeyRepository>,
    password_manager: Arc<PasswordManager>,
    jwt_manager: Arc<JwtManager>,
    permissions: Arc<PermissionService>,
    events: Arc<ServerEventService>,
}

impl AuthService {
    pub fn new(
        user_repo: Arc<UserRepository>,
        api_key_repo: Arc<ApiKeyRepository>,
        password_manager: Arc<PasswordManager>,
        jwt_manager: Arc<JwtManager>,
        permissions: Arc<PermissionService>,
        events: Arc<ServerEventService>,
    ) -> Self {
        Self {
            user_repo,
            api_key_repo,
            password_manager,
            jwt_manager,
            permissions,
            events,
        }
    }

    // --- ユーザー登録・ログイン ---

    /// ユーザー登録
    pub async fn signup(&self, signup_data: SignupRequest) -> AppResult<AuthTokenResponse> {
        signup_data.validate()?;

        // ユーザー名とメールアドレスの重複チェック
        if self
            .user_repo
            .is_username_taken(&signup_data.username)
            .await?
        {
            return Err(AppError::Conflict("User already exists".to_string()));
        }
        if self.user_repo.is_email_taken(&signup_data.email).await? {
            return Err(AppError::Conflict(
                "Email address is already registered".to_string(),
            ));
        }

        let password_hash = self
            .password_manager
            .hash_password(&signup_data.password)
            .map_err(|e| match e {
                PasswordError::WeakPassword(msg) => AppError::ValidationError(msg),
                other => {
                    tracing::error!(error = %other, "Password hashing failed");
                    AppError::InternalServerError("Error creating user".to_string())
                }
            })?;

        let user = self
            .user_repo
            .create(CreateUser {
                username: signup_data.username,
                email: signup_data.email,
                first_name: signup_data.first_name,
                last_name: signup_data.last_name,
                password_hash,
            })
            .await?;

        self.events
            .log(
                "CreateUser",
                format!("User created: {}", user.username),
                status::INFO,
            )
            .await;

        let access_token = self
            .jwt_manager
            .generate_access_token(user.to_claims())
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to generate access token");
                AppError::InternalServerError("Unable to generate token".to_string())
            })?;

        Ok(AuthTokenResponse {
            user: user.to_safe_user(),
            access_token,
            token_type: "Bearer".to_string(),
            expires_in_minutes: self.jwt_manager.access_token_expiry_minutes(),
        })
    }

    /// ログイン
    ///
    /// パスワード照合に加えて、Webログイン用セキュリティポイントの保持を要求する。
    pub async fn signin(&self, signin_data: SigninRequest) -> AppResult<AuthTokenResponse> {
        signin_data.validate()?;

        let user = match self
            .user_repo
            .find_by_email_or_username(&signin_data.identifier)
            .await?
        {
            Some(user) => user,
            None => {
                self.events
                    .log(
                        "UserLogin:UserNotFound",
                        format!("User not found: {}", signin_data.identifier),
                        status::LOGIN,
                    )
                    .await;
                return Err(AppError::Unauthorized("Invalid credentials".to_string()));
            }
        };

        if !user.can_authenticate() {
            self.events
                .log(
                    "UserLogin:UserDeactivated",
                    format!("User deactivated: {}", user.username),
                    status::LOGIN,
                )
                .await;
            return Err(AppError::Unauthorized("Invalid credentials".to_string()));
        }

        if self
            .password_manager
            .verify_password(&signin_data.password, &user.password_hash)
            .is_err()
        {
            self.events
                .log(
                    "UserLogin:InvalidPassword",
                    format!("Invalid password for user: {}", user.username),
                    status::LOGIN,
                )
                .await;
            return Err(AppError::Unauthorized("Invalid credentials".to_string()));
        }

        // ログイン権限チェック
        let claims = user.to_claims();
        if !self
            .permissions
            .check(&claims, well_known::WEB_LOGIN)
            .await?
            .is_allowed()
        {
            self.events
                .log(
                    "UserLogin:Unauthorized",
                    format!("User not authorized for web login: {}", user.username),
                    status::LOGIN,
                )
                .await;
            return Err(AppError::Forbidden(format!(
                "Unauthorized login: missing security point {}",
                well_known::WEB_LOGIN
            )));
        }

        self.user_repo.update_last_login(user.id).await?;

        let access_token = self
            .jwt_manager
            .generate_access_token(claims)
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to generate access token");
                AppError::InternalServerError("Unable to generate token".to_string())
            })?;

        self.events
            .log(
                "UserLogin:UserLoggedIn",
                format!("User logged in: {}", user.username),
                status::LOGIN,
            )
            .await;

        Ok(AuthTokenResponse {
            user: user.to_safe_user(),
            access_token,
            token_type: "Bearer".to_string(),
            expires_in_minutes: self.jwt_manager.access_token_expiry_minutes(),
        })
    }

    /// APIキーからJWTを発行
    pub async fn token_from_api_key(
        &self,
        request: TokenFromApiKeyRequest,
    ) -> AppResult<AuthTokenResponse> {
        request.validate()?;

        let api_key = match self
            .api_key_repo
            .find_valid_by_value(&request.key, Utc::now())
            .await?
        {
            Some(api_key) => api_key,
            None => {
                self.events
                    .log(
                        "TokenFromApiKey:KeyNotFound",
                        "API key not found or expired".to_string(),
                        status::ERROR,
                    )
                    .await;
                return Err(AppError::NotFound("API key not found".to_string()));
            }
        };

        let user = self
            .user_repo
            .find_by_id(api_key.user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User for API key not found".to_string()))?;

        if !user.can_authenticate() {
            return Err(AppError::Unauthorized("User is deactivated".to_string()));
        }

        let access_token = self
            .jwt_manager
            .generate_access_token(user.to_claims())
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to generate access token");
                AppError::InternalServerError("Unable to generate token".to_string())
            })?;

        Ok(AuthTokenResponse {
            user: user.to_safe_user(),
            access_token,
            token_type: "Bearer".to_string(),
            expires_in_minutes: self.jwt_manager.access_token_expiry_minutes(),
        })
    }

    /// パスワード変更
    pub async fn change_password(
        &self,
        user_id: Uuid,
        request: ChangePasswordRequest,
    ) -> AppResult<()> {
        request.validate()?;

        let user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        if self
            .password_manager
            .verify_password(&request.current_password, &user.password_hash)
            .is_err()
        {
            return Err(AppError::Unauthorized(
                "Current password is incorrect".to_string(),
            ));
        }

        let password_hash = self
            .password_manager
            .hash_password(&request.new_password)
            .map_err(|e| match e {
                PasswordError::WeakPassword(msg) => AppError::ValidationError(msg),
                other => {
                    tracing::error!(error = %other, "Password hashing failed");
                    AppError::InternalServerError("Error changing password".to_string())
                }
            })?;

        self.user_repo.update_password(user.id, password_hash).await?;

        self.events
            .log(
                "ChangeUserPassword",
                format!("Password changed: {}", user.username),
                status::INFO,
            )
            .await;

        Ok(())
    }

    /// APIキーを発行。有効期限は1ヶ月
    pub async fn generate_api_key(
        &self,
        user_id: Uuid,
        request: GenerateApiKeyRequest,
    ) -> AppResult<GenerateApiKeyResponse> {
        request.validate()?;

        let user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let key_value = generate_api_key_value();
        let expires_at = Utc::now()
            .checked_add_months(Months::new(1))
            .unwrap_or_else(|| Utc::now() + Duration::days(30));

        let api_key = self
            .api_key_repo
            .create(CreateApiKey {
                user_id: user.id,
                key_value: key_value.clone(),
                description: request.description,
                expires_at,
            })
            .await?;

        self.events
            .log(
                "GenerateApiKey",
                format!("API key generated for user: {}", user.username),
                status::INFO,
            )
            .await;

        Ok(GenerateApiKeyResponse {
            user: user.username,
            api_key: key_value,
            description: api_key.description,
            expires_at: api_key.expires_at,
        })
    }
}
