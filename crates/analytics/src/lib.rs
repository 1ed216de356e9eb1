//! パイプライン実行履歴のクライアント側集計
//!
//! 生の `RunRecord` を UI 向けの状態に正規化し、期間・ステータスで絞り込み、
//! ステータス分布と日別系列に集約する。予測ベクトルの要約とチャーン確率の
//! リスク区分もここで扱う。どの関数も副作用を持たず、入力を変更しない。

pub mod day;
pub mod distribution;
pub mod errors;
pub mod forecast;
pub mod risk;
pub mod run;
pub mod series;
pub mod snapshot;
pub mod status;
pub mod window;

pub use self::day::{TimestampPolicy, day_of, parse_instant};
pub use self::distribution::{StatusDistribution, distribution};
pub use self::errors::Error;
pub use self::forecast::{ForecastSummary, summarize};
pub use self::risk::{RiskTier, tier};
pub use self::run::{NormalizedRun, latest, normalize_runs};
pub use self::series::{DailySeriesPoint, daily_series};
pub use self::snapshot::DashboardSnapshot;
pub use self::status::{StatusFilter, UiStatus, normalize};
pub use self::window::{LookbackWindow, filter, filter_now};

type Result<T> = std::result::Result<T, Error>;
