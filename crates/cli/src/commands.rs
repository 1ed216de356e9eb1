pub mod churn;
pub mod detail;
pub mod forecast;
pub mod history;
pub mod login;
pub mod upload;

use analytics::{LookbackWindow, StatusFilter};
use anyhow::Result;
use client::HttpClient;
use std::sync::Arc;

/// 設定から組み立てた共有クライアント
pub(crate) fn http_client() -> Arc<HttpClient> {
    Arc::new(HttpClient::from_config())
}

/// `--days` / `--status` の解釈。未指定の期間は設定値
pub(crate) fn view_options(days: Option<u32>, status: &str) -> Result<(LookbackWindow, StatusFilter)> {
    let window = match days {
        Some(days) => LookbackWindow::new(days)?,
        None => LookbackWindow::from_config(),
    };
    Ok((window, status.parse()?))
}
