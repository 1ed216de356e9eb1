use crate::distribution::{StatusDistribution, distribution};
use crate::run::NormalizedRun;
use crate::series::{DailySeriesPoint, daily_series};
use crate::status::StatusFilter;
use crate::window::{LookbackWindow, filter};
use chrono::NaiveDateTime;

/// 1回の描画に必要な集計結果一式
///
/// 元のレコード列からコピーを取って作るため、後から入力が差し替わっても影響しない。
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSnapshot {
    pub window: LookbackWindow,
    pub status: StatusFilter,
    pub runs: Vec<NormalizedRun>,
    pub distribution: StatusDistribution,
    pub daily_series: Vec<DailySeriesPoint>,
}

impl DashboardSnapshot {
    pub fn build(
        runs: &[NormalizedRun],
        window: LookbackWindow,
        status: StatusFilter,
        now: NaiveDateTime,
    ) -> Self {
        let filtered = filter(runs, window, status, now);
        Self {
            window,
            status,
            distribution: distribution(filtered.iter().copied()),
            daily_series: daily_series(filtered.iter().copied()),
            runs: filtered.into_iter().cloned().collect(),
        }
    }

    /// 絞り込み後の件数。`Other` も含むので分布の合計とは一致しないことがある
    pub fn total_filtered(&self) -> usize {
        self.runs.len()
    }
}
