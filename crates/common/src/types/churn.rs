use super::lenient;
use serde::{Deserialize, Serialize};

/// `GET churn/models` の要素。学習サービスが所有し、ここでは表示のみ行う
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelRecord {
    pub id: i64,
    #[serde(default)]
    pub version: String,
    /// 評価前のモデルは null
    #[serde(default, deserialize_with = "lenient::number")]
    pub accuracy: Option<f64>,
    #[serde(default)]
    pub training_date: Option<String>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub training_data_size: Option<u64>,
}

/// チャーン予測1件
///
/// `POST churn/predict` では `prediction` / `prediction_id`、
/// `GET churn/predictions` では `id` と顧客情報が付く。どちらも受け付ける。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChurnPrediction {
    #[serde(rename = "churn_probability")]
    pub probability: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub confidence: Option<f64>,
    #[serde(rename = "prediction", default)]
    pub label: String,
    #[serde(alias = "id", default)]
    pub prediction_id: i64,
    #[serde(default)]
    pub customer_id: Option<String>,
    #[serde(default)]
    pub model_id: Option<i64>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// 予測リクエストの顧客特徴量
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomerFeatures {
    pub customer_id: String,
    pub age: u32,
    pub gender: String,
    pub segment: String,
    pub subscription_length: u32,
    pub last_login_date: String,
    pub total_orders: u32,
    pub total_spent: f64,
    pub avg_order_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainResponse {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub model_id: Option<i64>,
    #[serde(default)]
    pub metrics: TrainMetrics,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainMetrics {
    #[serde(default)]
    pub accuracy: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictResponse {
    #[serde(default)]
    pub message: String,
    pub prediction: ChurnPrediction,
    #[serde(default)]
    pub model_info: Option<ModelInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub model_id: i64,
    #[serde(default)]
    pub version: String,
    #[serde(default, deserialize_with = "lenient::number")]
    pub accuracy: Option<f64>,
}
