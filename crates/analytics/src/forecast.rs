use serde::{Deserialize, Serialize};

/// 予測ベクトルの要約
///
/// 空のベクトルでは `average` / `max` / `next_period` が `None` になる。
/// 呼び出し側は 0 と表示せず「データなし」を出すこと（予測値 0 と区別できなくなるため）。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastSummary {
    pub average: Option<f64>,
    /// 全要素の合計。通常は7日分だが長さは仮定しない
    pub weekly_total: f64,
    pub max: Option<f64>,
    /// 先頭要素（翌日分）
    pub next_period: Option<f64>,
    pub horizon: usize,
}

impl ForecastSummary {
    pub fn has_data(&self) -> bool {
        self.horizon > 0
    }
}

pub fn summarize(forecast: &[f64]) -> ForecastSummary {
    let weekly_total: f64 = forecast.iter().sum();
    let horizon = forecast.len();
    let average = (horizon > 0).then(|| weekly_total / horizon as f64);
    let max = forecast.iter().copied().reduce(f64::max);

    ForecastSummary {
        average,
        weekly_total,
        max,
        next_period: forecast.first().copied(),
        horizon,
    }
}
