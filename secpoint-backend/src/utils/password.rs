// secpoint-backend/src/utils/password.rs

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use std::env;
use thiserror::Error;

/// パスワード関連のエラー
#[derive(Error, Debug)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    HashingError(#[from] argon2::password_hash::Error),

    #[error("Password verification failed")]
    VerificationFailed,

    #[error("Weak password: {0}")]
    WeakPassword(String),

    #[error("Password configuration error: {0}")]
    ConfigurationError(String),
}

/// パスワード強度要件
#[derive(Debug, Clone)]
pub struct PasswordPolicy {
    /// 最小文字数
    pub min_length: usize,
    /// 最大文字数
    pub max_length: usize,
    /// 大文字が必要
    pub require_uppercase: bool,
    /// 数字が必要
    pub require_digit: bool,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 8,
            max_length: 128,
            require_uppercase: true,
            require_digit: true,
        }
    }
}

impl PasswordPolicy {
    /// 環境変数から設定を読み込み
    pub fn from_env() -> Self {
        let min_length = env::var("PASSWORD_MIN_LENGTH")
            .unwrap_or_else(|_| "8".to_string())
            .parse()
            .unwrap_or(8);

        let max_length = env::var("PASSWORD_MAX_LENGTH")
            .unwrap_or_else(|_| "128".to_string())
            .parse()
            .unwrap_or(128);

        let require_uppercase = env::var("PASSWORD_REQUIRE_UPPERCASE")
            .unwrap_or_else(|_| "true".to_string())
            .parse()
            .unwrap_or(true);

        let require_digit = env::var("PASSWORD_REQUIRE_DIGIT")
            .unwrap_or_else(|_| "true".to_string())
            .parse()
            .unwrap_or(true);

        Self {
            min_length,
            max_length,
            require_uppercase,
            require_digit,
        }
    }

    /// パスワードがポリシーを満たすかチェック
    pub fn check(&self, password: &str) -> Result<(), PasswordError> {
        if password.len() < self.min_length {
            return Err(PasswordError::WeakPassword(format!(
                "Password must be at least {} characters",
                self.min_length
            )));
        }

        if password.len() > self.max_length {
            return Err(PasswordError::WeakPassword(format!(
                "Password cannot exceed {} characters",
                self.max_length
            )));
        }

        if self.require_uppercase && !password.chars().any(|c| c.is_ascii_uppercase()) {
            return Err(PasswordError::WeakPassword(
                "Password must contain an uppercase letter".to_string(),
            ));
        }

        if self.require_digit && !password.chars().any(|c| c.is_ascii_digit()) {
            return Err(PasswordError::WeakPassword(
                "Password must contain a digit".to_string(),
            ));
        }

        Ok(())
    }
}

/// パスワードハッシュマネージャー
pub struct PasswordManager {
    argon2: Argon2<'static>,
    policy: PasswordPolicy,
}

impl Default for PasswordManager {
    fn default() -> Self {
        Self::new(PasswordPolicy::default())
    }
}

impl PasswordManager {
    pub fn new(policy: PasswordPolicy) -> Self {
        Self {
            argon2: Argon2::default(),
            policy,
        }
    }

    /// 環境変数からポリシーを読み込んで作成
    pub fn from_env() -> Self {
        Self::new(PasswordPolicy::from_env())
    }

    /// ポリシーを検査した上でパスワードをハッシュ化
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.policy.check(password)?;

        let salt = SaltString::generate(&mut OsRng);
        let hash = self.argon2.hash_password(password.as_bytes(), &salt)?;
        Ok(hash.to_string())
    }

    /// パスワードをハッシュと照合
    pub fn verify_password(&self, password: &str, hash: &str) -> Result<(), PasswordError> {
        let parsed_hash =
            PasswordHash::new(hash).map_err(|_| PasswordError::VerificationFailed)?;

        self.argon2
            .verify_password(password.as_bytes(), &parsed_hash)
            .map_err(|_| PasswordError::VerificationFailed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_roundtrip() {
        let manager = PasswordManager::default();
        let hash = manager.hash_password("Correct1Horse").unwrap();

        assert!(manager.verify_password("Correct1Horse", &hash).is_ok());
        assert!(manager.verify_password("Wrong1Password", &hash).is_err());
    }

    #[test]
    fn test_policy_rejects_short_password() {
        let manager = PasswordManager::default();
        assert!(matches!(
            manager.hash_password("Ab1"),
            Err(PasswordError::WeakPassword(_))
        ));
    }

    #[test]
    fn test_policy_rejects_missing_uppercase() {
        let manager = PasswordManager::default();
        assert!(manager.hash_password("lowercase1only").is_err());
    }

    #[test]
    fn test_policy_rejects_missing_digit() {
        let manager = PasswordManager::default();
        assert!(manager.hash_password("NoDigitsHere").is_err());
    }

    #[test]
    fn test_verify_rejects_malformed_hash() {
        let manager = PasswordManager::default();
        assert!(matches!(
            manager.verify_password("Whatever1", "not-a-phc-string"),
            Err(PasswordError::VerificationFailed)
        ));
    }
}
