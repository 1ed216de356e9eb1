//! ダッシュボードの状態を持つ部分
//!
//! 純粋な集計は `analytics` に任せ、ここでは取得の順序付け・キャンセル・
//! アップロード後の再取得といった副作用のある流れだけを扱う。

pub mod churn;
pub mod detail;
pub mod errors;
pub mod history;
pub mod refresh;

#[cfg(test)]
mod fakes;

pub use self::churn::{ChurnBoard, PredictionView, TrainReport, percent};
pub use self::detail::{UploadDetail, load_detail};
pub use self::errors::Error;
pub use self::history::{Cascade, HistoryBoard, LatestSummary, Refresh};
pub use self::refresh::{Consistency, RefreshPolicy, UploadOutcome, UploadRefresher, UploadState};

type Result<T> = std::result::Result<T, Error>;
