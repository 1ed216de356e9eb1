//! テスト用のインメモリ API

use async_trait::async_trait;
use client::{ApiError, ChurnApi, PipelineApi, UploadFile};
use common::types::{
    ChurnPrediction, CustomerFeatures, ModelRecord, PredictResponse, PreprocessSummary, RunRecord,
    TrainMetrics, TrainResponse, UploadReceipt, UploadResult,
};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

type Reply<T> = (Duration, Result<T, ApiError>);

pub fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

pub fn summary_with_forecast(forecast: &[f64]) -> PreprocessSummary {
    PreprocessSummary {
        forecast: forecast.to_vec(),
        ..Default::default()
    }
}

/// 呼び出し順に台本どおりの応答を返す
///
/// 履歴の台本が尽きたら `fallback_history` を返し続ける。
#[derive(Default)]
pub struct FakePipeline {
    histories: Mutex<VecDeque<Reply<Vec<RunRecord>>>>,
    fallback_history: Mutex<Vec<RunRecord>>,
    preprocess: Mutex<HashMap<i64, Reply<PreprocessSummary>>>,
    upload: Mutex<Option<Reply<UploadReceipt>>>,
    results: Mutex<HashMap<i64, Reply<UploadResult>>>,
    history_calls: AtomicUsize,
    pub preprocess_calls: Mutex<Vec<i64>>,
    pub uploaded: Mutex<Vec<String>>,
}

impl FakePipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_history(self, delay: Duration, records: Vec<RunRecord>) -> Self {
        self.histories
            .lock()
            .unwrap()
            .push_back((delay, Ok(records)));
        self
    }

    pub fn push_history_error(self, error: ApiError) -> Self {
        self.histories
            .lock()
            .unwrap()
            .push_back((Duration::ZERO, Err(error)));
        self
    }

    pub fn with_fallback(self, records: Vec<RunRecord>) -> Self {
        *self.fallback_history.lock().unwrap() = records;
        self
    }

    pub fn with_preprocess(self, upload_id: i64, delay: Duration, summary: PreprocessSummary) -> Self {
        self.preprocess
            .lock()
            .unwrap()
            .insert(upload_id, (delay, Ok(summary)));
        self
    }

    pub fn with_preprocess_error(self, upload_id: i64, error: ApiError) -> Self {
        self.preprocess
            .lock()
            .unwrap()
            .insert(upload_id, (Duration::ZERO, Err(error)));
        self
    }

    pub fn with_upload(self, delay: Duration, reply: Result<UploadReceipt, ApiError>) -> Self {
        *self.upload.lock().unwrap() = Some((delay, reply));
        self
    }

    pub fn with_result(self, upload_id: i64, delay: Duration, reply: Result<UploadResult, ApiError>) -> Self {
        self.results
            .lock()
            .unwrap()
            .insert(upload_id, (delay, reply));
        self
    }

    pub fn history_calls(&self) -> usize {
        self.history_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PipelineApi for FakePipeline {
    async fn history(&self) -> Result<Vec<RunRecord>, ApiError> {
        self.history_calls.fetch_add(1, Ordering::SeqCst);
        let scripted = self.histories.lock().unwrap().pop_front();
        let (delay, reply) = match scripted {
            Some(scripted) => scripted,
            None => (Duration::ZERO, Ok(self.fallback_history.lock().unwrap().clone())),
        };
        tokio::time::sleep(delay).await;
        reply
    }

    async fn preprocess(&self, upload_id: i64) -> Result<PreprocessSummary, ApiError> {
        self.preprocess_calls.lock().unwrap().push(upload_id);
        let scripted = self.preprocess.lock().unwrap().get(&upload_id).cloned();
        let (delay, reply) =
            scripted.unwrap_or((Duration::ZERO, Ok(PreprocessSummary::default())));
        tokio::time::sleep(delay).await;
        reply
    }

    async fn upload(&self, file: UploadFile) -> Result<UploadReceipt, ApiError> {
        self.uploaded.lock().unwrap().push(file.name);
        let scripted = self.upload.lock().unwrap().clone();
        let (delay, reply) = scripted.unwrap_or((
            Duration::ZERO,
            Err(ApiError::Network("no upload scripted".to_string())),
        ));
        tokio::time::sleep(delay).await;
        reply
    }

    async fn upload_result(&self, upload_id: i64) -> Result<UploadResult, ApiError> {
        let scripted = self.results.lock().unwrap().get(&upload_id).cloned();
        let (delay, reply) = scripted.unwrap_or((Duration::ZERO, Ok(UploadResult::default())));
        tokio::time::sleep(delay).await;
        reply
    }
}

/// チャーン API の偽物。学習・予測の成功時にリストへ追記する
#[derive(Default)]
pub struct FakeChurn {
    pub models: Mutex<Vec<ModelRecord>>,
    pub predictions: Mutex<Vec<ChurnPrediction>>,
    pub train_reply: Mutex<Option<Result<TrainResponse, ApiError>>>,
    pub predict_reply: Mutex<Option<Result<PredictResponse, ApiError>>>,
    pub fail_lists: Mutex<Option<ApiError>>,
    pub model_calls: AtomicUsize,
    pub prediction_calls: AtomicUsize,
}

impl FakeChurn {
    pub fn model(id: i64, accuracy: f64, is_active: bool) -> ModelRecord {
        ModelRecord {
            id,
            version: format!("v{id}"),
            accuracy: Some(accuracy),
            training_date: Some("2025-10-01T09:00:00".to_string()),
            is_active,
            training_data_size: Some(120),
        }
    }

    pub fn prediction(id: i64, probability: f64) -> ChurnPrediction {
        ChurnPrediction {
            probability,
            confidence: Some((probability - 0.5).abs() * 2.0),
            label: if probability > 0.5 { "Churn" } else { "Stay" }.to_string(),
            prediction_id: id,
            customer_id: Some(format!("CUST_{id:03}")),
            model_id: Some(1),
            created_at: None,
        }
    }

    pub fn trained(accuracy: Option<f64>) -> TrainResponse {
        TrainResponse {
            message: "Model trained".to_string(),
            model_id: Some(7),
            metrics: TrainMetrics { accuracy },
        }
    }
}

#[async_trait]
impl ChurnApi for FakeChurn {
    async fn models(&self) -> Result<Vec<ModelRecord>, ApiError> {
        self.model_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.fail_lists.lock().unwrap().clone() {
            return Err(err);
        }
        Ok(self.models.lock().unwrap().clone())
    }

    async fn predictions(&self) -> Result<Vec<ChurnPrediction>, ApiError> {
        self.prediction_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.fail_lists.lock().unwrap().clone() {
            return Err(err);
        }
        Ok(self.predictions.lock().unwrap().clone())
    }

    async fn train(&self) -> Result<TrainResponse, ApiError> {
        let reply = self
            .train_reply
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| Ok(Self::trained(Some(0.9))));
        if let Ok(response) = &reply {
            let id = response.model_id.unwrap_or_default();
            let mut models = self.models.lock().unwrap();
            for model in models.iter_mut() {
                model.is_active = false;
            }
            let mut trained = Self::model(id, 0.0, true);
            trained.accuracy = response.metrics.accuracy;
            models.push(trained);
        }
        reply
    }

    async fn predict(&self, features: &CustomerFeatures) -> Result<PredictResponse, ApiError> {
        let reply = self.predict_reply.lock().unwrap().clone().unwrap_or_else(|| {
            Ok(PredictResponse {
                message: "ok".to_string(),
                prediction: Self::prediction(99, 0.5),
                model_info: None,
            })
        });
        if let Ok(response) = &reply {
            let mut stored = response.prediction.clone();
            stored.customer_id = Some(features.customer_id.clone());
            self.predictions.lock().unwrap().push(stored);
        }
        reply
    }
}
