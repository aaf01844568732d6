// secpoint-backend/src/utils/api_key.rs

use rand::Rng;

/// APIキー本体の長さ
pub const API_KEY_LENGTH: usize = 64;

/// APIキー文字列を生成
///
/// 長寿命の資格情報なのでOS由来の乱数を使う。
pub fn generate_api_key_value() -> String {
    const CHARSET: &[u8] =
        b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_";
    let mut rng = rand::rngs::OsRng;

    (0..API_KEY_LENGTH)
        .map(|_| {
            let idx = rng.gen_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_key_shape() {
        let key = generate_api_key_value();
        assert_eq!(key.len(), API_KEY_LENGTH);
        assert!(key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_'));
    }

    #[test]
    fn test_generated_keys_differ() {
        assert_ne!(generate_api_key_value(), generate_api_key_value());
    }
}
