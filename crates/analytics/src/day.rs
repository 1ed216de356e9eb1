use crate::Error;
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// `"YYYY-MM-DD"` 部分（先頭10文字）を日バケットのキーとして返す。
///
/// 残りの部分は検証しない。壊れたタイムスタンプならそのまま切り詰めた文字列を返すので、
/// 除外したい場合は呼び出し側で `TimestampPolicy` を使うこと。
pub fn day_of(created_at: &str) -> String {
    created_at.chars().take(10).collect()
}

/// タイムスタンプをローカル時刻の `NaiveDateTime` として解釈する。
///
/// 受け付ける表記:
/// - `YYYY-MM-DD HH:MM:SS[.ffffff]`（最初の空白を `T` に置換してから解釈）
/// - `YYYY-MM-DDTHH:MM:SS[.ffffff]`
/// - オフセット付き RFC 3339（ローカル時刻に変換）
/// - `YYYY-MM-DD`（その日の 00:00）
pub fn parse_instant(created_at: &str) -> Option<NaiveDateTime> {
    let normalized = created_at.trim().replacen(' ', "T", 1);

    if let Ok(dt) = NaiveDateTime::parse_from_str(&normalized, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(&normalized, "%Y-%m-%dT%H:%M") {
        return Some(dt);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(&normalized) {
        return Some(dt.with_timezone(&Local).naive_local());
    }
    NaiveDate::parse_from_str(&normalized, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN))
}

/// 解釈できないタイムスタンプの扱い
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimestampPolicy {
    /// レコードは残すが時刻なしとする。期間フィルタでは常に除外される
    #[default]
    PassThrough,
    /// 先頭10文字が日付として読めればその日の 00:00 とみなす。読めなければ `PassThrough` と同じ
    Coerce,
    /// 正規化の段階でレコードを落とす
    Reject,
}

impl TimestampPolicy {
    /// 設定 `TIMESTAMP_POLICY` から読む。未設定・不正値ならデフォルト
    pub fn from_config() -> Self {
        common::config::get("TIMESTAMP_POLICY")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_default()
    }

    pub(crate) fn resolve(&self, created_at: &str) -> Resolved {
        if let Some(dt) = parse_instant(created_at) {
            return Resolved::Parsed(dt);
        }
        match self {
            TimestampPolicy::PassThrough => Resolved::Unparsed,
            TimestampPolicy::Coerce => NaiveDate::parse_from_str(&day_of(created_at), "%Y-%m-%d")
                .map(|d| Resolved::Parsed(d.and_time(NaiveTime::MIN)))
                .unwrap_or(Resolved::Unparsed),
            TimestampPolicy::Reject => Resolved::Rejected,
        }
    }
}

pub(crate) enum Resolved {
    Parsed(NaiveDateTime),
    Unparsed,
    Rejected,
}

impl FromStr for TimestampPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pass_through" | "passthrough" => Ok(TimestampPolicy::PassThrough),
            "coerce" => Ok(TimestampPolicy::Coerce),
            "reject" => Ok(TimestampPolicy::Reject),
            _ => Err(Error::UnknownTimestampPolicy(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests;
