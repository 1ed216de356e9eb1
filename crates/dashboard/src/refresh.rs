use crate::history::{Cascade, HistoryBoard};
use crate::{Error, Result};
use client::{ApiError, PipelineApi, UploadFile};
use common::config;
use common::types::UploadReceipt;
use logging::*;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// アップロードから履歴再取得までの状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadState {
    Idle,
    Uploading,
    WaitingForConsistency,
    Refreshing,
    Failed,
}

/// アップロード後に履歴へ反映されるまで待つ方針
///
/// 最初に `initial_delay` 待ち、その後 `poll_interval` 間隔で最大 `max_attempts` 回
/// 履歴を取り直す。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshPolicy {
    pub initial_delay: Duration,
    pub poll_interval: Duration,
    pub max_attempts: u32,
}

impl Default for RefreshPolicy {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(2),
            poll_interval: Duration::from_secs(1),
            max_attempts: 5,
        }
    }
}

impl RefreshPolicy {
    pub fn from_config() -> Self {
        let default = Self::default();
        Self {
            initial_delay: config::get_duration("UPLOAD_REFRESH_DELAY", default.initial_delay),
            poll_interval: config::get_duration("UPLOAD_POLL_INTERVAL", default.poll_interval),
            max_attempts: config::get("UPLOAD_POLL_MAX_ATTEMPTS")
                .ok()
                .and_then(|v| v.parse::<u32>().ok())
                .filter(|n| *n > 0)
                .unwrap_or(default.max_attempts),
        }
    }
}

/// アップロードしたレコードが履歴に現れたか
#[derive(Debug, Clone, PartialEq)]
pub enum Consistency {
    Observed { attempts: u32 },
    /// 試行回数を使い切った。最後に取れた履歴はそのまま反映してある
    Exhausted { attempts: u32 },
    /// 履歴の取得自体に失敗した。再試行はしない
    Unavailable { attempts: u32, error: ApiError },
}

#[derive(Debug, Clone, PartialEq)]
pub struct UploadOutcome {
    pub receipt: UploadReceipt,
    pub consistency: Consistency,
    /// 履歴が取れなかった場合は `None`
    pub cascade: Option<Cascade>,
}

/// 処理中の印。どの経路で抜けても `Idle` に戻す
struct InFlight<'a>(&'a watch::Sender<UploadState>);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.send_replace(UploadState::Idle);
    }
}

/// アップロードと、その後の履歴再取得を順に行う
///
/// 同時に走るアップロードは1本だけで、処理中の `submit` は `Error::Busy` になる。
pub struct UploadRefresher {
    api: Arc<dyn PipelineApi>,
    board: Arc<HistoryBoard>,
    policy: RefreshPolicy,
    state: watch::Sender<UploadState>,
    log: Logger,
}

impl UploadRefresher {
    pub fn new(api: Arc<dyn PipelineApi>, board: Arc<HistoryBoard>, policy: RefreshPolicy) -> Self {
        let (state, _) = watch::channel(UploadState::Idle);
        Self {
            api,
            board,
            policy,
            state,
            log: DEFAULT.new(o!("component" => "upload_refresher")),
        }
    }

    pub fn from_config(api: Arc<dyn PipelineApi>, board: Arc<HistoryBoard>) -> Self {
        Self::new(api, board, RefreshPolicy::from_config())
    }

    pub fn with_logger(mut self, log: Logger) -> Self {
        self.log = log;
        self
    }

    pub fn state(&self) -> UploadState {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<UploadState> {
        self.state.subscribe()
    }

    pub fn policy(&self) -> RefreshPolicy {
        self.policy
    }

    pub async fn submit(&self, file: UploadFile) -> Result<UploadOutcome> {
        if self.board.is_closed() {
            return Err(Error::Closed);
        }
        let claimed = self.state.send_if_modified(|state| {
            if *state == UploadState::Idle {
                *state = UploadState::Uploading;
                true
            } else {
                false
            }
        });
        if !claimed {
            warn!(self.log, "upload rejected, another one is in flight"; "state" => ?self.state());
            return Err(Error::Busy);
        }
        let _in_flight = InFlight(&self.state);

        let name = file.name.clone();
        let receipt = match self.api.upload(file).await {
            Ok(receipt) => receipt,
            Err(e) => {
                self.state.send_replace(UploadState::Failed);
                warn!(self.log, "upload failed"; "file" => &name, "error" => %e);
                return Err(e.into());
            }
        };
        info!(self.log, "upload accepted, waiting for history";
            "upload_id" => receipt.upload_id, "delay" => ?self.policy.initial_delay
        );

        let (consistency, seq) = self.await_consistency(receipt.upload_id).await?;
        let cascade = match seq {
            Some(seq) => Some(self.board.load_latest_summary(seq).await?),
            None => None,
        };
        Ok(UploadOutcome {
            receipt,
            consistency,
            cascade,
        })
    }

    /// 履歴に `upload_id` が現れるまで取り直す。最後に取った履歴の番号も返す
    async fn await_consistency(&self, upload_id: i64) -> Result<(Consistency, Option<u64>)> {
        self.state.send_replace(UploadState::WaitingForConsistency);
        tokio::time::sleep(self.policy.initial_delay).await;

        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempts = 0;
        loop {
            attempts += 1;
            self.state.send_replace(UploadState::Refreshing);
            let fetched = match self.board.refresh_history().await {
                Ok(fetched) => fetched,
                Err(Error::Api(error)) => {
                    warn!(self.log, "history unavailable after upload";
                        "upload_id" => upload_id, "attempt" => attempts, "error" => %error
                    );
                    return Ok((Consistency::Unavailable { attempts, error }, None));
                }
                Err(e) => return Err(e),
            };

            let found = self.board.contains(upload_id);
            debug!(self.log, "poll attempt";
                "upload_id" => upload_id, "attempt" => attempts, "found" => found
            );
            if found {
                return Ok((Consistency::Observed { attempts }, Some(fetched.seq)));
            }
            if attempts >= max_attempts {
                warn!(self.log, "uploaded record not visible yet, giving up";
                    "upload_id" => upload_id, "attempts" => attempts
                );
                return Ok((Consistency::Exhausted { attempts }, Some(fetched.seq)));
            }
            self.state.send_replace(UploadState::WaitingForConsistency);
            tokio::time::sleep(self.policy.poll_interval).await;
        }
    }
}
