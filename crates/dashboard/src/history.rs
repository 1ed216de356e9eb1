use crate::{Error, Result};
use analytics::{
    DashboardSnapshot, ForecastSummary, LookbackWindow, NormalizedRun, StatusFilter,
    TimestampPolicy, latest, normalize_runs, summarize,
};
use chrono::{Local, NaiveDateTime};
use client::{ApiError, PipelineApi};
use common::types::PreprocessSummary;
use logging::*;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::task::{AbortHandle, JoinHandle};

/// 最新レコードの前処理結果
#[derive(Debug, Clone, PartialEq)]
pub struct LatestSummary {
    pub upload_id: i64,
    pub summary: PreprocessSummary,
}

impl LatestSummary {
    pub fn forecast(&self) -> ForecastSummary {
        summarize(&self.summary.forecast)
    }
}

/// 履歴取得に続く前処理結果の取得がどうなったか
#[derive(Debug, Clone, PartialEq)]
pub enum Cascade {
    /// 履歴が空で対象なし
    NoRuns,
    Loaded { upload_id: i64 },
    /// 失敗しても履歴の反映は取り消さない
    Failed { upload_id: i64, error: ApiError },
    /// より新しい履歴が反映済みなので捨てた
    Superseded,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Refresh {
    Applied { seq: u64, runs: usize, cascade: Cascade },
    /// 後から発行した取得が先に反映されていたため捨てた
    Stale { seq: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Fetched {
    pub seq: u64,
    pub stale: bool,
    pub runs: usize,
}

#[derive(Default)]
struct BoardState {
    closed: bool,
    applied_seq: u64,
    runs: Arc<Vec<NormalizedRun>>,
    rejected: Vec<analytics::Error>,
    summary: Option<LatestSummary>,
    tasks: Vec<AbortHandle>,
}

/// 実行履歴ビューの状態
///
/// 取得ごとに単調増加の番号を振り、既に反映した番号より古い応答は捨てる。
/// `close` 以降はどの応答も反映しない。読み出しは `Arc` のスナップショットを返すので、
/// 集計中に状態が差し替わっても影響を受けない。
pub struct HistoryBoard {
    api: Arc<dyn PipelineApi>,
    policy: TimestampPolicy,
    next_seq: AtomicU64,
    state: Mutex<BoardState>,
    log: Logger,
}

impl HistoryBoard {
    pub fn new(api: Arc<dyn PipelineApi>, policy: TimestampPolicy) -> Self {
        Self {
            api,
            policy,
            next_seq: AtomicU64::new(0),
            state: Mutex::new(BoardState::default()),
            log: DEFAULT.new(o!("component" => "history_board")),
        }
    }

    pub fn from_config(api: Arc<dyn PipelineApi>) -> Self {
        Self::new(api, TimestampPolicy::from_config())
    }

    pub fn with_logger(mut self, log: Logger) -> Self {
        self.log = log;
        self
    }

    fn state(&self) -> MutexGuard<'_, BoardState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// 履歴を取り直し、最新レコードの前処理結果まで続けて取得する
    pub async fn refresh(&self) -> Result<Refresh> {
        let fetched = self.refresh_history().await?;
        if fetched.stale {
            return Ok(Refresh::Stale { seq: fetched.seq });
        }
        let cascade = self.load_latest_summary(fetched.seq).await?;
        Ok(Refresh::Applied {
            seq: fetched.seq,
            runs: fetched.runs,
            cascade,
        })
    }

    /// `refresh` をタスクとして起動する。`close` で中断される
    pub fn spawn_refresh(self: &Arc<Self>) -> JoinHandle<Result<Refresh>> {
        let board = Arc::clone(self);
        let handle = tokio::spawn(async move { board.refresh().await });
        let mut state = self.state();
        state.tasks.retain(|task| !task.is_finished());
        if state.closed {
            handle.abort();
        } else {
            state.tasks.push(handle.abort_handle());
        }
        handle
    }

    pub(crate) async fn refresh_history(&self) -> Result<Fetched> {
        if self.is_closed() {
            return Err(Error::Closed);
        }
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let records = self.api.history().await.map_err(|e| {
            warn!(self.log, "history fetch failed"; "seq" => seq, "error" => %e);
            Error::from(e)
        })?;
        let (runs, rejected) = normalize_runs(&records, self.policy);
        for err in &rejected {
            debug!(self.log, "run dropped by timestamp policy"; "error" => %err);
        }

        let mut state = self.state();
        if state.closed {
            debug!(self.log, "history response after close discarded"; "seq" => seq);
            return Err(Error::Closed);
        }
        if seq <= state.applied_seq {
            debug!(self.log, "stale history response discarded";
                "seq" => seq, "applied" => state.applied_seq
            );
            return Ok(Fetched {
                seq,
                stale: true,
                runs: 0,
            });
        }
        let count = runs.len();
        // 前処理結果は最新レコードが変わらない場合だけ引き継ぐ
        let latest_id = latest(runs.iter()).map(NormalizedRun::upload_id);
        if state.summary.as_ref().map(|s| s.upload_id) != latest_id {
            state.summary = None;
        }
        state.applied_seq = seq;
        state.runs = Arc::new(runs);
        state.rejected = rejected;
        info!(self.log, "history applied";
            "seq" => seq, "count" => count, "rejected" => state.rejected.len()
        );
        Ok(Fetched {
            seq,
            stale: false,
            runs: count,
        })
    }

    /// `seq` の履歴がまだ最新であるあいだだけ結果を反映する
    pub(crate) async fn load_latest_summary(&self, seq: u64) -> Result<Cascade> {
        let upload_id = {
            let state = self.state();
            if state.closed {
                return Err(Error::Closed);
            }
            if state.applied_seq != seq {
                return Ok(Cascade::Superseded);
            }
            match latest(state.runs.iter()) {
                Some(run) => run.upload_id(),
                None => return Ok(Cascade::NoRuns),
            }
        };

        match self.api.preprocess(upload_id).await {
            Ok(summary) => {
                let mut state = self.state();
                if state.closed {
                    return Err(Error::Closed);
                }
                if state.applied_seq != seq {
                    debug!(self.log, "preprocess result for old history discarded";
                        "seq" => seq, "upload_id" => upload_id
                    );
                    return Ok(Cascade::Superseded);
                }
                state.summary = Some(LatestSummary { upload_id, summary });
                Ok(Cascade::Loaded { upload_id })
            }
            Err(error) => {
                warn!(self.log, "preprocess fetch failed, history kept";
                    "upload_id" => upload_id, "error" => %error
                );
                Ok(Cascade::Failed { upload_id, error })
            }
        }
    }

    /// 以降の応答を捨て、起動中のタスクを中断する
    pub fn close(&self) {
        let mut state = self.state();
        state.closed = true;
        for task in state.tasks.drain(..) {
            task.abort();
        }
        debug!(self.log, "board closed"; "applied" => state.applied_seq);
    }

    pub fn is_closed(&self) -> bool {
        self.state().closed
    }

    pub fn runs(&self) -> Arc<Vec<NormalizedRun>> {
        Arc::clone(&self.state().runs)
    }

    /// `Reject` ポリシーで落としたレコード
    pub fn rejected(&self) -> Vec<analytics::Error> {
        self.state().rejected.clone()
    }

    pub fn contains(&self, upload_id: i64) -> bool {
        self.state()
            .runs
            .iter()
            .any(|run| run.upload_id() == upload_id)
    }

    pub fn latest_run(&self) -> Option<NormalizedRun> {
        latest(self.state().runs.iter()).cloned()
    }

    /// 現在の履歴の最新レコードに対応する前処理結果。取得前や失敗時は `None`
    pub fn latest_summary(&self) -> Option<LatestSummary> {
        self.state().summary.clone()
    }

    pub fn applied_seq(&self) -> u64 {
        self.state().applied_seq
    }

    pub fn snapshot(&self, window: LookbackWindow, status: StatusFilter) -> DashboardSnapshot {
        self.snapshot_at(window, status, Local::now().naive_local())
    }

    pub fn snapshot_at(
        &self,
        window: LookbackWindow,
        status: StatusFilter,
        now: NaiveDateTime,
    ) -> DashboardSnapshot {
        let runs = self.runs();
        DashboardSnapshot::build(&runs, window, status, now)
    }
}
