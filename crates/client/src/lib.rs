//! パイプライン API との通信層
//!
//! 画面側は `PipelineApi` / `ChurnApi` / `AuthApi` の各トレイトにだけ依存し、
//! 実体の `HttpClient` は `reqwest` で実装する。認証情報は `Session` が一元管理する。

pub mod http;
pub mod session;
pub mod traits;

pub use self::http::HttpClient;
pub use self::session::Session;
pub use self::traits::{AuthApi, ChurnApi, PipelineApi, UploadFile};

use common::config;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ApiError>;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/api/v1";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// API 呼び出しのエラー
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),
    /// サーバーが非 2xx を返した。`detail` はレスポンスの `detail` をそのまま保持する
    #[error("Request rejected ({status}): {detail}")]
    Rejected { status: u16, detail: String },
    #[error("Parse error: {0}")]
    Parse(String),
}

impl ApiError {
    /// 利用者に見せるメッセージ。拒否された場合はサーバーの文言をそのまま返す
    pub fn detail(&self) -> &str {
        match self {
            ApiError::Network(msg) | ApiError::Parse(msg) => msg,
            ApiError::Rejected { detail, .. } => detail,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiClientConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ApiClientConfig {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            ..Default::default()
        }
    }

    /// `DASHBOARD_API_BASE_URL` / `DASHBOARD_HTTP_TIMEOUT` から組み立てる
    pub fn from_config() -> Self {
        let base_url =
            config::get("DASHBOARD_API_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self {
            base_url,
            timeout: config::get_duration("DASHBOARD_HTTP_TIMEOUT", DEFAULT_TIMEOUT),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
