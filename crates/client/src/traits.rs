use crate::Result;
use async_trait::async_trait;
use common::types::{
    ChurnPrediction, CustomerFeatures, LoginRequest, LoginResponse, ModelRecord,
    PreprocessSummary, PredictResponse, RunRecord, TrainResponse, UploadReceipt, UploadResult,
};
use std::path::Path;

/// アップロードするファイル。内容は検証せずそのまま転送する
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(name: &str, bytes: Vec<u8>) -> Self {
        Self {
            name: name.to_string(),
            bytes,
        }
    }

    pub async fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload.csv".to_string());
        Ok(Self { name, bytes })
    }
}

/// パイプライン履歴・前処理・アップロード
#[async_trait]
pub trait PipelineApi: Send + Sync {
    /// 並び順は保証されない
    async fn history(&self) -> Result<Vec<RunRecord>>;

    async fn preprocess(&self, upload_id: i64) -> Result<PreprocessSummary>;

    async fn upload(&self, file: UploadFile) -> Result<UploadReceipt>;

    async fn upload_result(&self, upload_id: i64) -> Result<UploadResult>;
}

/// チャーンモデルの学習・予測
#[async_trait]
pub trait ChurnApi: Send + Sync {
    async fn models(&self) -> Result<Vec<ModelRecord>>;

    async fn predictions(&self) -> Result<Vec<ChurnPrediction>>;

    async fn train(&self) -> Result<TrainResponse>;

    async fn predict(&self, features: &CustomerFeatures) -> Result<PredictResponse>;
}

#[async_trait]
pub trait AuthApi: Send + Sync {
    /// 成功したらトークンをセッションに読み込む
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse>;

    fn logout(&self);
}
