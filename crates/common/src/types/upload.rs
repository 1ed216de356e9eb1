use super::lenient;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// `POST upload` の受付結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadReceipt {
    pub upload_id: i64,
    #[serde(default)]
    pub status: String,
}

/// `GET upload/{id}/result`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UploadResult {
    #[serde(default)]
    pub upload_id: Option<i64>,
    #[serde(default)]
    pub summary: AnalysisSummary,
    #[serde(default)]
    pub insights: Insights,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    #[serde(default)]
    pub rows: Option<u64>,
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    pub last_order_date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Insights {
    /// SKU → 合計数量
    #[serde(default, deserialize_with = "lenient::number_map")]
    pub top_skus: BTreeMap<String, f64>,
    #[serde(default)]
    pub anomalies: Vec<AnomalyPoint>,
    #[serde(default, deserialize_with = "lenient::numbers")]
    pub predictions: Vec<f64>,
    #[serde(default)]
    pub churn_at_risk_count: Option<u64>,
}

/// 価格の外れ値（SKU ごとの平均 ± 3σ の外側）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyPoint {
    pub sku: String,
    pub row_index: u64,
    pub price: f64,
}
