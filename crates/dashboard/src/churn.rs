use analytics::{RiskTier, tier};
use client::{ApiError, ChurnApi};
use common::types::{ChurnPrediction, CustomerFeatures, ModelInfo, ModelRecord};
use futures_util::future::join;
use logging::*;
use std::result::Result;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// 0〜1 の比率を小数1桁のパーセント表記にする
pub fn percent(ratio: f64) -> String {
    format!("{:.1}%", ratio * 100.0)
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrainReport {
    pub message: String,
    pub model_id: Option<i64>,
    /// サーバーが返さなければ `None`
    pub accuracy: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PredictionView {
    pub prediction: ChurnPrediction,
    pub tier: RiskTier,
    pub model: Option<ModelInfo>,
}

impl From<ChurnPrediction> for PredictionView {
    fn from(prediction: ChurnPrediction) -> Self {
        Self {
            tier: tier(prediction.probability),
            prediction,
            model: None,
        }
    }
}

#[derive(Default)]
struct ChurnState {
    models: Vec<ModelRecord>,
    predictions: Vec<ChurnPrediction>,
    last_prediction: Option<PredictionView>,
}

/// チャーン画面の状態
///
/// 学習・予測が成功したら対応する一覧を取り直す。取り直しの失敗は警告だけ出し、
/// 学習・予測の結果は成功として返す。
pub struct ChurnBoard {
    api: Arc<dyn ChurnApi>,
    state: Mutex<ChurnState>,
    log: Logger,
}

impl ChurnBoard {
    pub fn new(api: Arc<dyn ChurnApi>) -> Self {
        Self {
            api,
            state: Mutex::new(ChurnState::default()),
            log: DEFAULT.new(o!("component" => "churn_board")),
        }
    }

    pub fn with_logger(mut self, log: Logger) -> Self {
        self.log = log;
        self
    }

    fn state(&self) -> MutexGuard<'_, ChurnState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// モデル一覧と予測履歴を同時に読み込む。片方が失敗してももう片方は反映する
    pub async fn load(&self) -> Result<(), ApiError> {
        let (models, predictions) = join(self.reload_models(), self.reload_predictions()).await;
        models.and(predictions).map(|_| ())
    }

    pub async fn reload_models(&self) -> Result<usize, ApiError> {
        let models = self.api.models().await.inspect_err(|e| {
            warn!(self.log, "model list fetch failed"; "error" => %e);
        })?;
        let count = models.len();
        self.state().models = models;
        debug!(self.log, "models loaded"; "count" => count);
        Ok(count)
    }

    pub async fn reload_predictions(&self) -> Result<usize, ApiError> {
        let predictions = self.api.predictions().await.inspect_err(|e| {
            warn!(self.log, "prediction history fetch failed"; "error" => %e);
        })?;
        let count = predictions.len();
        self.state().predictions = predictions;
        debug!(self.log, "predictions loaded"; "count" => count);
        Ok(count)
    }

    pub fn models(&self) -> Vec<ModelRecord> {
        self.state().models.clone()
    }

    pub fn active_model(&self) -> Option<ModelRecord> {
        self.state().models.iter().find(|m| m.is_active).cloned()
    }

    /// 予測履歴。各行にリスク区分を付ける
    pub fn predictions(&self) -> Vec<PredictionView> {
        self.state()
            .predictions
            .iter()
            .cloned()
            .map(PredictionView::from)
            .collect()
    }

    pub fn last_prediction(&self) -> Option<PredictionView> {
        self.state().last_prediction.clone()
    }

    /// 失敗時はサーバーの `detail` をそのまま持つ `ApiError` を返す
    pub async fn train(&self) -> Result<TrainReport, ApiError> {
        let response = self.api.train().await.inspect_err(|e| {
            warn!(self.log, "training failed"; "detail" => e.detail());
        })?;
        let report = TrainReport {
            message: response.message,
            model_id: response.model_id,
            accuracy: response.metrics.accuracy,
        };
        info!(self.log, "model trained";
            "model_id" => ?report.model_id, "accuracy" => ?report.accuracy
        );
        // 一覧の取り直しは学習結果に影響させない
        if let Err(e) = self.reload_models().await {
            debug!(self.log, "model list kept as is after training"; "error" => %e);
        }
        Ok(report)
    }

    pub async fn predict(&self, features: &CustomerFeatures) -> Result<PredictionView, ApiError> {
        let response = self.api.predict(features).await.inspect_err(|e| {
            warn!(self.log, "prediction failed";
                "customer_id" => &features.customer_id, "detail" => e.detail()
            );
        })?;
        let view = PredictionView {
            model: response.model_info,
            ..PredictionView::from(response.prediction)
        };
        info!(self.log, "churn predicted";
            "customer_id" => &features.customer_id,
            "probability" => view.prediction.probability,
            "tier" => %view.tier
        );
        self.state().last_prediction = Some(view.clone());
        if let Err(e) = self.reload_predictions().await {
            debug!(self.log, "prediction history kept as is after predict"; "error" => %e);
        }
        Ok(view)
    }
}
