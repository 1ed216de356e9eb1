use crate::session::Session;
use crate::traits::{AuthApi, ChurnApi, PipelineApi, UploadFile};
use crate::{ApiClientConfig, ApiError, Result};
use async_trait::async_trait;
use common::types::{
    ChurnPrediction, CustomerFeatures, LoginRequest, LoginResponse, ModelRecord,
    PreprocessSummary, PredictResponse, RunRecord, TrainResponse, UploadReceipt, UploadResult,
};
use logging::*;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;

/// FastAPI 形式のエラーボディ `{"detail": ...}`
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

/// パイプライン API の HTTP 実装
pub struct HttpClient {
    client: Client,
    config: ApiClientConfig,
    session: Session,
    log: Logger,
}

impl HttpClient {
    pub fn new(config: ApiClientConfig, session: Session) -> Self {
        Self {
            client: Client::new(),
            config,
            session,
            log: DEFAULT.new(o!("component" => "http_client")),
        }
    }

    /// 設定ファイル・環境変数から組み立てる
    pub fn from_config() -> Self {
        Self::new(ApiClientConfig::from_config(), Session::from_config())
    }

    pub fn with_logger(mut self, log: Logger) -> Self {
        self.log = log;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// トークンが無ければヘッダを付けずに送る
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self
            .client
            .request(method, self.url(path))
            .timeout(self.config.timeout);
        match self.session.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, path: &str, request: RequestBuilder) -> Result<Response> {
        trace!(self.log, "sending request"; "path" => path);
        let response = request.send().await.map_err(|e| {
            warn!(self.log, "request failed"; "path" => path, "error" => %e);
            ApiError::Network(e.to_string())
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let detail = match serde_json::from_str::<ErrorBody>(&text) {
            Ok(ErrorBody {
                detail: serde_json::Value::String(detail),
            }) => detail,
            Ok(ErrorBody { detail }) => detail.to_string(),
            Err(_) if !text.is_empty() => text,
            Err(_) => status.canonical_reason().unwrap_or("error").to_string(),
        };
        debug!(self.log, "request rejected"; "path" => path, "status" => status.as_u16(), "detail" => &detail);
        Err(ApiError::Rejected {
            status: status.as_u16(),
            detail,
        })
    }

    /// 本文が壊れていても既定値で続行する
    async fn fetch_or_default<T>(&self, path: &str, request: RequestBuilder) -> Result<T>
    where
        T: DeserializeOwned + Default,
    {
        let response = self.send(path, request).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        match serde_json::from_slice(&bytes) {
            Ok(value) => Ok(value),
            Err(e) => {
                warn!(self.log, "malformed response body, using empty value";
                    "path" => path,
                    "error" => %e
                );
                Ok(T::default())
            }
        }
    }

    /// 本文が必須のエンドポイント用
    async fn fetch_strict<T>(&self, path: &str, request: RequestBuilder) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let response = self.send(path, request).await?;
        response
            .json()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    }
}

#[async_trait]
impl PipelineApi for HttpClient {
    async fn history(&self) -> Result<Vec<RunRecord>> {
        let path = "pipeline/history";
        let records: Vec<RunRecord> = self
            .fetch_or_default(path, self.request(Method::GET, path))
            .await?;
        debug!(self.log, "history fetched"; "count" => records.len());
        Ok(records)
    }

    async fn preprocess(&self, upload_id: i64) -> Result<PreprocessSummary> {
        let path = format!("preprocess/{upload_id}");
        self.fetch_or_default(&path, self.request(Method::POST, &path))
            .await
    }

    async fn upload(&self, file: UploadFile) -> Result<UploadReceipt> {
        let path = "upload";
        let size = file.bytes.len();
        let part = reqwest::multipart::Part::bytes(file.bytes).file_name(file.name.clone());
        let form = reqwest::multipart::Form::new().part("file", part);
        let receipt: UploadReceipt = self
            .fetch_strict(path, self.request(Method::POST, path).multipart(form))
            .await?;
        info!(self.log, "upload accepted";
            "upload_id" => receipt.upload_id,
            "file" => &file.name,
            "bytes" => size
        );
        Ok(receipt)
    }

    async fn upload_result(&self, upload_id: i64) -> Result<UploadResult> {
        let path = format!("upload/{upload_id}/result");
        self.fetch_or_default(&path, self.request(Method::GET, &path))
            .await
    }
}

#[async_trait]
impl ChurnApi for HttpClient {
    async fn models(&self) -> Result<Vec<ModelRecord>> {
        let path = "churn/models";
        self.fetch_or_default(path, self.request(Method::GET, path))
            .await
    }

    async fn predictions(&self) -> Result<Vec<ChurnPrediction>> {
        let path = "churn/predictions";
        self.fetch_or_default(path, self.request(Method::GET, path))
            .await
    }

    async fn train(&self) -> Result<TrainResponse> {
        let path = "churn/train";
        self.fetch_strict(path, self.request(Method::POST, path))
            .await
    }

    async fn predict(&self, features: &CustomerFeatures) -> Result<PredictResponse> {
        let path = "churn/predict";
        self.fetch_strict(path, self.request(Method::POST, path).json(features))
            .await
    }
}

#[async_trait]
impl AuthApi for HttpClient {
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse> {
        let path = "auth/login";
        let response: LoginResponse = self
            .fetch_strict(path, self.request(Method::POST, path).json(request))
            .await?;
        self.session.set_token(&response.access_token);
        info!(self.log, "logged in"; "email" => &request.email, "tenant_id" => ?response.tenant_id);
        Ok(response)
    }

    fn logout(&self) {
        self.session.clear();
        info!(self.log, "logged out");
    }
}
