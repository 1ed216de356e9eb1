use crate::distribution::StatusDistribution;
use crate::run::NormalizedRun;
use crate::status::UiStatus;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 1日分の件数
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailySeriesPoint {
    pub day: String,
    #[serde(flatten)]
    pub counts: StatusDistribution,
}

impl DailySeriesPoint {
    pub fn get(&self, status: UiStatus) -> usize {
        self.counts.get(status)
    }
}

/// 日ごとに集計し、日付の昇順で返す。
///
/// `day` が空のレコードは飛ばす。`Other` しかない日も点は作る（件数はすべて 0）。
/// キーは常に `YYYY-MM-DD` なので文字列比較の順序がそのまま日付順になる。
pub fn daily_series<'a, I>(runs: I) -> Vec<DailySeriesPoint>
where
    I: IntoIterator<Item = &'a NormalizedRun>,
{
    let mut by_day: BTreeMap<&str, StatusDistribution> = BTreeMap::new();
    for run in runs {
        if run.day().is_empty() {
            continue;
        }
        by_day.entry(run.day()).or_default().record(run.ui_status());
    }
    by_day
        .into_iter()
        .map(|(day, counts)| DailySeriesPoint {
            day: day.to_string(),
            counts,
        })
        .collect()
}
