use analytics::{ForecastSummary, summarize};
use client::{ApiError, PipelineApi};
use common::types::{AnalysisSummary, AnomalyPoint, ColumnStats, PreprocessSummary, UploadResult};
use futures_util::future::join;
use logging::*;
use std::collections::BTreeMap;
use std::result::Result;

const TOP_SKUS: usize = 5;
const SHOWN_ANOMALIES: usize = 5;
const SHOWN_PREDICTIONS: usize = 6;

/// アップロード1件の詳細画面
#[derive(Debug, Clone, PartialEq)]
pub struct UploadDetail {
    pub upload_id: i64,
    pub summary: AnalysisSummary,
    /// 数量の多い順。同数は SKU 名順
    pub top_skus: Vec<(String, f64)>,
    pub anomalies: Vec<AnomalyPoint>,
    /// 表示しきれなかった異常値の件数
    pub remaining_anomalies: usize,
    pub predictions: Vec<f64>,
    pub churn_at_risk_count: u64,
    pub forecast: ForecastSummary,
    pub anomaly_count: u64,
    pub column_stats: BTreeMap<String, ColumnStats>,
    /// 前処理結果が取れなかった
    pub preprocess_missing: bool,
}

impl UploadDetail {
    pub fn from_parts(upload_id: i64, result: UploadResult, preprocess: Option<PreprocessSummary>) -> Self {
        let insights = result.insights;

        let mut top_skus: Vec<(String, f64)> = insights.top_skus.into_iter().collect();
        top_skus.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        top_skus.truncate(TOP_SKUS);

        let total_anomalies = insights.anomalies.len();
        let anomalies: Vec<AnomalyPoint> =
            insights.anomalies.into_iter().take(SHOWN_ANOMALIES).collect();

        let preprocess_missing = preprocess.is_none();
        let preprocess = preprocess.unwrap_or_default();
        let anomaly_count = if preprocess_missing {
            total_anomalies as u64
        } else {
            preprocess.anomaly_count
        };

        Self {
            upload_id,
            summary: result.summary,
            top_skus,
            remaining_anomalies: total_anomalies - anomalies.len(),
            anomalies,
            predictions: insights
                .predictions
                .into_iter()
                .take(SHOWN_PREDICTIONS)
                .collect(),
            churn_at_risk_count: insights.churn_at_risk_count.unwrap_or(0),
            forecast: summarize(&preprocess.forecast),
            anomaly_count,
            column_stats: preprocess.summary_stats,
            preprocess_missing,
        }
    }
}

/// 分析結果と前処理結果を同時に取得して詳細画面を組み立てる
///
/// 分析結果の失敗はそのまま返す。前処理側の失敗は予測・統計が空になるだけ。
pub async fn load_detail(
    api: &dyn PipelineApi,
    upload_id: i64,
    log: &Logger,
) -> Result<UploadDetail, ApiError> {
    let (result, preprocess) = join(api.upload_result(upload_id), api.preprocess(upload_id)).await;
    let result = result?;
    let preprocess = match preprocess {
        Ok(summary) => Some(summary),
        Err(e) => {
            warn!(log, "preprocess fetch failed"; "upload_id" => upload_id, "error" => %e);
            None
        }
    };
    Ok(UploadDetail::from_parts(upload_id, result, preprocess))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::{FakePipeline, ms};
    use common::types::Insights;
    use std::time::Instant;

    fn result_with(insights: Insights) -> UploadResult {
        UploadResult {
            upload_id: Some(4),
            summary: AnalysisSummary {
                rows: Some(250),
                columns: vec!["sku".to_string(), "quantity".to_string(), "price".to_string()],
                last_order_date: Some("2025-09-30".to_string()),
            },
            insights,
        }
    }

    fn anomaly(i: u64) -> AnomalyPoint {
        AnomalyPoint {
            sku: format!("SKU-{i}"),
            row_index: i,
            price: 1000.0 + i as f64,
        }
    }

    #[test]
    fn test_top_skus_by_quantity() {
        let insights = Insights {
            top_skus: [
                ("A", 3.0),
                ("B", 40.0),
                ("C", 12.5),
                ("D", 12.5),
                ("E", 1.0),
                ("F", 7.0),
            ]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect(),
            ..Default::default()
        };
        let detail = UploadDetail::from_parts(4, result_with(insights), None);
        let names: Vec<&str> = detail.top_skus.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(names, vec!["B", "C", "D", "F", "A"]);
    }

    #[test]
    fn test_anomalies_truncated_with_remaining_count() {
        let insights = Insights {
            anomalies: (0..8).map(anomaly).collect(),
            predictions: (0..10).map(|i| i as f64).collect(),
            ..Default::default()
        };
        let detail = UploadDetail::from_parts(4, result_with(insights), None);
        assert_eq!(detail.anomalies.len(), 5);
        assert_eq!(detail.anomalies[0].sku, "SKU-0");
        assert_eq!(detail.remaining_anomalies, 3);
        assert_eq!(detail.predictions, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
        // 前処理なしなら異常値リストの件数
        assert_eq!(detail.anomaly_count, 8);
        assert_eq!(detail.churn_at_risk_count, 0);
        assert!(detail.preprocess_missing);
        assert!(!detail.forecast.has_data());
    }

    #[test]
    fn test_preprocess_takes_precedence() {
        let insights = Insights {
            anomalies: vec![anomaly(1)],
            churn_at_risk_count: Some(3),
            ..Default::default()
        };
        let preprocess = PreprocessSummary {
            forecast: vec![10.0, 12.0, 8.0, 9.0, 11.0, 13.0, 7.0],
            anomaly_count: 4,
            ..Default::default()
        };
        let detail = UploadDetail::from_parts(4, result_with(insights), Some(preprocess));
        assert_eq!(detail.anomaly_count, 4);
        assert_eq!(detail.churn_at_risk_count, 3);
        assert_eq!(detail.forecast.weekly_total, 70.0);
        assert_eq!(detail.forecast.next_period, Some(10.0));
        assert_eq!(detail.remaining_anomalies, 0);
    }

    #[tokio::test]
    async fn test_load_fetches_concurrently() {
        let api = FakePipeline::new()
            .with_result(7, ms(60), Ok(result_with(Insights::default())))
            .with_preprocess(7, ms(60), PreprocessSummary::default());

        let started = Instant::now();
        let detail = load_detail(&api, 7, &logging::discard()).await.unwrap();

        assert!(started.elapsed() < ms(110));
        assert_eq!(detail.upload_id, 7);
        assert_eq!(detail.summary.rows, Some(250));
        assert!(!detail.preprocess_missing);
    }

    #[tokio::test]
    async fn test_load_tolerates_preprocess_failure() {
        let api = FakePipeline::new()
            .with_result(7, ms(0), Ok(result_with(Insights::default())))
            .with_preprocess_error(7, ApiError::Network("down".to_string()));

        let detail = load_detail(&api, 7, &logging::discard()).await.unwrap();

        assert!(detail.preprocess_missing);
        assert!(detail.column_stats.is_empty());
    }

    #[tokio::test]
    async fn test_load_fails_when_result_fails() {
        let api = FakePipeline::new().with_result(
            7,
            ms(0),
            Err(ApiError::Rejected {
                status: 404,
                detail: "Upload bulunamadı".to_string(),
            }),
        );
        let err = load_detail(&api, 7, &logging::discard()).await.unwrap_err();
        assert_eq!(err.detail(), "Upload bulunamadı");
    }
}
