//! 画面の代わりのテキスト出力。集計はしない

use analytics::{DashboardSnapshot, ForecastSummary, UiStatus};
use common::types::ModelRecord;
use dashboard::{
    Cascade, Consistency, LatestSummary, PredictionView, TrainReport, UploadDetail, UploadOutcome,
    percent,
};

fn number(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.1}"))
}

pub fn snapshot(snapshot: &DashboardSnapshot) -> String {
    let mut lines = vec![format!(
        "Last {}, status {}: {} runs",
        snapshot.window,
        snapshot.status,
        snapshot.total_filtered()
    )];
    if snapshot.runs.is_empty() {
        lines.push("No runs in the selected window.".to_string());
        return lines.join("\n");
    }

    lines.push(
        snapshot
            .distribution
            .entries()
            .iter()
            .map(|(status, count)| format!("{status} {count}"))
            .collect::<Vec<_>>()
            .join(" | "),
    );
    lines.push("Daily:".to_string());
    for point in &snapshot.daily_series {
        lines.push(format!(
            "  {}  success {}  failed {}  running {}",
            point.day,
            point.get(UiStatus::Success),
            point.get(UiStatus::Failed),
            point.get(UiStatus::Running)
        ));
    }
    lines.push("Runs:".to_string());
    for run in &snapshot.runs {
        let record = run.record();
        let mut line = format!(
            "  #{:<5} {:<8} {}",
            run.upload_id(),
            run.ui_status(),
            record.created_at
        );
        if let Some(message) = record.message.as_deref().filter(|m| !m.is_empty()) {
            line.push_str("  ");
            line.push_str(message);
        }
        lines.push(line);
    }
    lines.join("\n")
}

pub fn forecast(summary: &ForecastSummary) -> String {
    if !summary.has_data() {
        return "Forecast: no data".to_string();
    }
    [
        format!("Forecast ({} days)", summary.horizon),
        format!("  Next period:  {}", number(summary.next_period)),
        format!("  Average:      {}", number(summary.average)),
        format!("  Weekly total: {:.1}", summary.weekly_total),
        format!("  Max:          {}", number(summary.max)),
    ]
    .join("\n")
}

pub fn latest_summary(latest: &LatestSummary) -> String {
    let summary = &latest.summary;
    [
        format!(
            "Latest upload #{}: {} records, {} columns, {} anomalies",
            latest.upload_id, summary.record_count, summary.column_count, summary.anomaly_count
        ),
        forecast(&latest.forecast()),
    ]
    .join("\n")
}

pub fn upload_outcome(outcome: &UploadOutcome) -> String {
    let mut lines = vec![format!(
        "Upload #{} accepted ({})",
        outcome.receipt.upload_id, outcome.receipt.status
    )];
    lines.push(match &outcome.consistency {
        Consistency::Observed { attempts } => {
            format!("Visible in history after {attempts} attempt(s)")
        }
        Consistency::Exhausted { attempts } => {
            format!("Not visible in history after {attempts} attempt(s); showing latest data")
        }
        Consistency::Unavailable { error, .. } => format!("History unavailable: {error}"),
    });
    match &outcome.cascade {
        Some(Cascade::Failed { upload_id, error }) => {
            lines.push(format!("Summary for upload #{upload_id} unavailable: {error}"));
        }
        Some(Cascade::NoRuns) => lines.push("History is empty".to_string()),
        _ => {}
    }
    lines.join("\n")
}

pub fn detail(detail: &UploadDetail) -> String {
    let summary = &detail.summary;
    let mut lines = vec![
        format!("Upload #{}", detail.upload_id),
        format!("  Rows:          {}", summary.rows.unwrap_or(0)),
        format!("  Columns:       {}", summary.columns.len()),
        format!(
            "  Last order:    {}",
            summary.last_order_date.as_deref().unwrap_or("N/A")
        ),
        format!("  Churn at risk: {}", detail.churn_at_risk_count),
        format!("  Anomalies:     {}", detail.anomaly_count),
    ];

    if !detail.top_skus.is_empty() {
        lines.push("Top SKUs:".to_string());
        for (rank, (sku, quantity)) in detail.top_skus.iter().enumerate() {
            lines.push(format!("  #{} {sku}  {quantity:.0}", rank + 1));
        }
    }

    if !detail.anomalies.is_empty() {
        lines.push("Price anomalies:".to_string());
        for anomaly in &detail.anomalies {
            lines.push(format!(
                "  {}  row {}  {:.2}",
                anomaly.sku, anomaly.row_index, anomaly.price
            ));
        }
        if detail.remaining_anomalies > 0 {
            lines.push(format!("  ... and {} more", detail.remaining_anomalies));
        }
    }

    if !detail.predictions.is_empty() {
        let values: Vec<String> = detail.predictions.iter().map(|p| format!("{p:.1}")).collect();
        lines.push(format!("Predictions: {}", values.join(", ")));
    }

    lines.push(forecast(&detail.forecast));
    if detail.preprocess_missing {
        lines.push("(preprocessing result unavailable)".to_string());
    }

    if !detail.column_stats.is_empty() {
        lines.push("Column stats:".to_string());
        lines.push(format!(
            "  {:<16} {:>8} {:>10} {:>10} {:>10} {:>10}",
            "column", "count", "mean", "min", "max", "std"
        ));
        for (column, stats) in &detail.column_stats {
            lines.push(format!(
                "  {:<16} {:>8} {:>10} {:>10} {:>10} {:>10}",
                column,
                stats.count.map_or_else(|| "-".to_string(), |c| format!("{c:.0}")),
                two_places(stats.mean),
                two_places(stats.min),
                two_places(stats.max),
                two_places(stats.std)
            ));
        }
    }
    lines.join("\n")
}

/// 値が無ければ "-"
fn maybe_percent(ratio: Option<f64>) -> String {
    ratio.map_or_else(|| "-".to_string(), percent)
}

fn two_places(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.2}"))
}

pub fn models(models: &[ModelRecord]) -> String {
    if models.is_empty() {
        return "No trained models".to_string();
    }
    let mut lines = vec![format!(
        "{:<5} {:<10} {:>8} {:<20} {:>6} {}",
        "id", "version", "accuracy", "trained", "rows", "state"
    )];
    for model in models {
        lines.push(format!(
            "{:<5} {:<10} {:>8} {:<20} {:>6} {}",
            model.id,
            model.version,
            maybe_percent(model.accuracy),
            model.training_date.as_deref().unwrap_or("-"),
            model
                .training_data_size
                .map_or_else(|| "-".to_string(), |n| n.to_string()),
            if model.is_active { "active" } else { "inactive" }
        ));
    }
    lines.join("\n")
}

pub fn predictions(views: &[PredictionView]) -> String {
    if views.is_empty() {
        return "No predictions yet".to_string();
    }
    views
        .iter()
        .map(|view| {
            let p = &view.prediction;
            format!(
                "{} #{:<5} {:<12} {:>7} (confidence {}) {}",
                view.tier.icon(),
                p.prediction_id,
                p.customer_id.as_deref().unwrap_or("-"),
                percent(p.probability),
                maybe_percent(p.confidence),
                p.created_at.as_deref().unwrap_or("")
            )
            .trim_end()
            .to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn prediction(view: &PredictionView) -> String {
    let p = &view.prediction;
    let mut lines = vec![
        format!("{} Churn risk: {}", view.tier.icon(), view.tier.label()),
        format!("  Probability: {}", percent(p.probability)),
        format!("  Confidence:  {}", maybe_percent(p.confidence)),
    ];
    if !p.label.is_empty() {
        lines.push(format!("  Prediction:  {}", p.label));
    }
    if let Some(model) = &view.model {
        lines.push(format!(
            "  Model:       #{} {} ({})",
            model.model_id,
            model.version,
            maybe_percent(model.accuracy)
        ));
    }
    lines.join("\n")
}

pub fn train_report(report: &TrainReport) -> String {
    let accuracy = report
        .accuracy
        .map_or_else(|| "N/A".to_string(), percent);
    let mut line = format!("{} (accuracy {accuracy})", report.message);
    if let Some(id) = report.model_id {
        line.push_str(&format!(", model #{id}"));
    }
    line
}
