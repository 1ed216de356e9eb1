use super::lenient;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// `POST preprocess/{upload_id}` のレスポンス
///
/// `forecast[i]` は i+1 日先の予測数量。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreprocessSummary {
    #[serde(default)]
    pub upload_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient::numbers")]
    pub forecast: Vec<f64>,
    #[serde(default)]
    pub anomaly_count: u64,
    #[serde(default)]
    pub record_count: u64,
    #[serde(default)]
    pub column_count: u64,
    #[serde(default)]
    pub summary_stats: BTreeMap<String, ColumnStats>,
}

/// 列ごとの記述統計
///
/// 非数値列では min/max が文字列で返ってくるため、数値以外は `None` にする。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnStats {
    #[serde(default, deserialize_with = "lenient::number")]
    pub count: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub mean: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub min: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub max: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub std: Option<f64>,
}
