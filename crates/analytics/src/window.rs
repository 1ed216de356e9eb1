use crate::run::NormalizedRun;
use crate::status::StatusFilter;
use crate::{Error, Result};
use chrono::{Days, Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 遡る日数。画面で選べるのは `PRESETS` だが、任意の正の日数で動作する
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LookbackWindow(u32);

impl LookbackWindow {
    pub const WEEK: LookbackWindow = LookbackWindow(7);
    pub const MONTH: LookbackWindow = LookbackWindow(30);
    pub const QUARTER: LookbackWindow = LookbackWindow(90);
    pub const YEAR: LookbackWindow = LookbackWindow(365);

    pub const PRESETS: [LookbackWindow; 4] = [Self::WEEK, Self::MONTH, Self::QUARTER, Self::YEAR];

    pub fn new(days: u32) -> Result<Self> {
        if days == 0 {
            return Err(Error::ZeroLookback);
        }
        Ok(Self(days))
    }

    /// 設定 `DEFAULT_LOOKBACK_DAYS`。未設定や 0 なら 30 日
    pub fn from_config() -> Self {
        common::config::get("DEFAULT_LOOKBACK_DAYS")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .and_then(|days| Self::new(days).ok())
            .unwrap_or(Self::MONTH)
    }

    pub fn days(&self) -> u32 {
        self.0
    }

    /// `now` から暦日で `days` 日戻した時刻。時刻部分はそのまま
    pub fn cutoff(&self, now: NaiveDateTime) -> NaiveDateTime {
        now.checked_sub_days(Days::new(u64::from(self.0)))
            .unwrap_or(NaiveDateTime::MIN)
    }
}

impl Default for LookbackWindow {
    fn default() -> Self {
        Self::MONTH
    }
}

impl fmt::Display for LookbackWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} days", self.0)
    }
}

/// 期間とステータスで絞り込む。入力順を保った安定な選択で、並べ替えはしない。
///
/// 時刻を解釈できなかったレコードは期間内とはみなさない。
pub fn filter<'a>(
    runs: &'a [NormalizedRun],
    window: LookbackWindow,
    status: StatusFilter,
    now: NaiveDateTime,
) -> Vec<&'a NormalizedRun> {
    let cutoff = window.cutoff(now);
    runs.iter()
        .filter(|run| run.parsed_at().is_some_and(|at| at >= cutoff))
        .filter(|run| status.matches(run.ui_status()))
        .collect()
}

/// 現在のローカル時刻を基準にした `filter`
pub fn filter_now(
    runs: &[NormalizedRun],
    window: LookbackWindow,
    status: StatusFilter,
) -> Vec<&NormalizedRun> {
    filter(runs, window, status, Local::now().naive_local())
}
