pub mod auth;
pub mod churn;
pub mod lenient;
pub mod preprocess;
pub mod run;
pub mod upload;

pub use self::auth::{LoginRequest, LoginResponse};
pub use self::churn::{
    ChurnPrediction, CustomerFeatures, ModelInfo, ModelRecord, PredictResponse, TrainMetrics,
    TrainResponse,
};
pub use self::preprocess::{ColumnStats, PreprocessSummary};
pub use self::run::RunRecord;
pub use self::upload::{AnalysisSummary, AnomalyPoint, Insights, UploadReceipt, UploadResult};
