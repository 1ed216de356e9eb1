use common::config;
use std::sync::{Arc, RwLock};

/// 認証情報の置き場所
///
/// クローンは同じトークンを共有する。各 API 呼び出しはリクエストを組み立てる時点の
/// 値を読むので、ログアウト後の呼び出しには資格情報が付かない。
#[derive(Debug, Clone, Default)]
pub struct Session {
    token: Arc<RwLock<Option<String>>>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        let session = Self::default();
        session.set_token(token);
        session
    }

    /// `DASHBOARD_API_TOKEN` があれば読み込んだ状態で開始する
    pub fn from_config() -> Self {
        match config::get("DASHBOARD_API_TOKEN") {
            Ok(token) => Self::with_token(&token),
            Err(_) => Self::anonymous(),
        }
    }

    pub fn token(&self) -> Option<String> {
        match self.token.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// 空文字は未ログインとして扱う
    pub fn set_token(&self, token: &str) {
        let value = (!token.is_empty()).then(|| token.to_string());
        match self.token.write() {
            Ok(mut guard) => *guard = value,
            Err(poisoned) => *poisoned.into_inner() = value,
        }
    }

    pub fn clear(&self) {
        match self.token.write() {
            Ok(mut guard) => *guard = None,
            Err(poisoned) => *poisoned.into_inner() = None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::config::ConfigGuard;
    use serial_test::serial;

    #[test]
    fn test_clones_share_credential() {
        let session = Session::anonymous();
        let shared = session.clone();
        session.set_token("tok");
        assert_eq!(shared.token().as_deref(), Some("tok"));
        shared.clear();
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_empty_token_is_anonymous() {
        assert!(!Session::with_token("").is_authenticated());
    }

    #[test]
    #[serial]
    fn test_from_config() {
        {
            let _guard = ConfigGuard::new("DASHBOARD_API_TOKEN", "from-config");
            assert_eq!(Session::from_config().token().as_deref(), Some("from-config"));
        }
        // 空値は未設定扱い
        let _guard = ConfigGuard::new("DASHBOARD_API_TOKEN", "");
        assert!(!Session::from_config().is_authenticated());
    }
}
