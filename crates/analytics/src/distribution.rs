use crate::run::NormalizedRun;
use crate::status::UiStatus;
use serde::{Deserialize, Serialize};

/// 3種のステータス件数。`Other` は含めない
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusDistribution {
    #[serde(rename = "Success")]
    pub success: usize,
    #[serde(rename = "Failed")]
    pub failed: usize,
    #[serde(rename = "Running")]
    pub running: usize,
}

impl StatusDistribution {
    pub(crate) fn record(&mut self, status: UiStatus) {
        match status {
            UiStatus::Success => self.success += 1,
            UiStatus::Failed => self.failed += 1,
            UiStatus::Running => self.running += 1,
            UiStatus::Other => {}
        }
    }

    pub fn total(&self) -> usize {
        self.success + self.failed + self.running
    }

    pub fn get(&self, status: UiStatus) -> usize {
        match status {
            UiStatus::Success => self.success,
            UiStatus::Failed => self.failed,
            UiStatus::Running => self.running,
            UiStatus::Other => 0,
        }
    }

    /// 表示順（Success, Failed, Running）のペア
    pub fn entries(&self) -> [(UiStatus, usize); 3] {
        [
            (UiStatus::Success, self.success),
            (UiStatus::Failed, self.failed),
            (UiStatus::Running, self.running),
        ]
    }
}

pub fn distribution<'a, I>(runs: I) -> StatusDistribution
where
    I: IntoIterator<Item = &'a NormalizedRun>,
{
    let mut counts = StatusDistribution::default();
    for run in runs {
        counts.record(run.ui_status());
    }
    counts
}
