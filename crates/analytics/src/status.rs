use crate::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 画面に表示する4値のステータス
///
/// バックエンドの生ステータス（`started` / `completed` / `failed`）とは別物。
/// `Other` のレコードは件数には含めるが、分布と日別系列には数えない。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum UiStatus {
    Running,
    Success,
    Failed,
    Other,
}

impl UiStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            UiStatus::Running => "Running",
            UiStatus::Success => "Success",
            UiStatus::Failed => "Failed",
            UiStatus::Other => "Other",
        }
    }
}

impl fmt::Display for UiStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// 生ステータスを UI ステータスに写像する。未知の文字列（空文字含む）は `Other`
pub fn normalize(raw_status: &str) -> UiStatus {
    match raw_status {
        "started" => UiStatus::Running,
        "completed" => UiStatus::Success,
        "failed" => UiStatus::Failed,
        _ => UiStatus::Other,
    }
}

/// ステータス絞り込み条件
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StatusFilter {
    #[default]
    All,
    Only(UiStatus),
}

impl StatusFilter {
    pub fn matches(&self, status: UiStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(expected) => *expected == status,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::All => f.write_str("all"),
            StatusFilter::Only(status) => fmt::Display::fmt(status, f),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(StatusFilter::All),
            "running" => Ok(StatusFilter::Only(UiStatus::Running)),
            "success" => Ok(StatusFilter::Only(UiStatus::Success)),
            "failed" => Ok(StatusFilter::Only(UiStatus::Failed)),
            "other" => Ok(StatusFilter::Only(UiStatus::Other)),
            _ => Err(Error::UnknownStatusFilter(s.to_string())),
        }
    }
}
