use crate::day::{Resolved, TimestampPolicy, day_of};
use crate::status::{UiStatus, normalize};
use crate::{Error, Result};
use chrono::NaiveDateTime;
use common::types::RunRecord;

/// 正規化済みの実行レコード
///
/// `ui_status` は `raw_status` のみから、`day` は `created_at` のみから決まる。
/// 直接は組み立てず、`from_record` / `normalize_runs` を通す。
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRun {
    record: RunRecord,
    ui_status: UiStatus,
    day: String,
    parsed_at: Option<NaiveDateTime>,
}

impl NormalizedRun {
    pub fn from_record(record: RunRecord, policy: TimestampPolicy) -> Result<Self> {
        let parsed_at = match policy.resolve(&record.created_at) {
            Resolved::Parsed(dt) => Some(dt),
            Resolved::Unparsed => None,
            Resolved::Rejected => {
                return Err(Error::UnparseableTimestamp {
                    upload_id: record.upload_id,
                    created_at: record.created_at,
                });
            }
        };
        Ok(Self {
            ui_status: normalize(&record.raw_status),
            day: day_of(&record.created_at),
            parsed_at,
            record,
        })
    }

    pub fn record(&self) -> &RunRecord {
        &self.record
    }

    pub fn upload_id(&self) -> i64 {
        self.record.upload_id
    }

    pub fn ui_status(&self) -> UiStatus {
        self.ui_status
    }

    pub fn day(&self) -> &str {
        &self.day
    }

    /// 解釈できなかったタイムスタンプは `None`
    pub fn parsed_at(&self) -> Option<NaiveDateTime> {
        self.parsed_at
    }
}

/// レコード列をまとめて正規化する。
///
/// `Reject` ポリシーで落としたレコードはエラーとして別に返す。入力の順序は保つ。
pub fn normalize_runs<'a, I>(records: I, policy: TimestampPolicy) -> (Vec<NormalizedRun>, Vec<Error>)
where
    I: IntoIterator<Item = &'a RunRecord>,
{
    let mut runs = Vec::new();
    let mut rejected = Vec::new();
    for record in records {
        match NormalizedRun::from_record(record.clone(), policy) {
            Ok(run) => runs.push(run),
            Err(e) => rejected.push(e),
        }
    }
    (runs, rejected)
}

/// 最新のレコード。サーバー側の並び順は仮定しない。
///
/// 時刻の新しいものを優先し、同時刻や時刻不明は upload_id の大きい方を採る。
pub fn latest<'a, I>(runs: I) -> Option<&'a NormalizedRun>
where
    I: IntoIterator<Item = &'a NormalizedRun>,
{
    runs.into_iter().max_by_key(|run| (run.parsed_at, run.record.upload_id))
}
