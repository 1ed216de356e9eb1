use serde::{Deserialize, Serialize};

/// パイプライン履歴の1レコード（`GET pipeline/history` の要素）
///
/// `created_at` は `"2025-10-01 13:45:41.632457"` のような空白区切りか、
/// `T` 区切りのどちらでも届く。ここでは解釈せずそのまま保持する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRecord {
    pub upload_id: i64,
    #[serde(rename = "status", default)]
    pub raw_status: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub message: Option<String>,
}

impl RunRecord {
    pub fn new(upload_id: i64, raw_status: &str, created_at: &str) -> Self {
        Self {
            upload_id,
            raw_status: raw_status.to_string(),
            created_at: created_at.to_string(),
            message: None,
        }
    }

    pub fn with_message(mut self, message: &str) -> Self {
        self.message = Some(message.to_string());
        self
    }
}
