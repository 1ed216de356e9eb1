use super::{http_client, view_options};
use crate::render;
use anyhow::{Context, Result};
use clap::Args;
use dashboard::{Cascade, HistoryBoard, Refresh};

#[derive(Debug, Args)]
pub struct HistoryArgs {
    /// 遡る日数（7 / 30 / 90 / 365 など）。省略時は設定値
    #[arg(long)]
    pub days: Option<u32>,

    /// all / running / success / failed / other
    #[arg(long, default_value = "all")]
    pub status: String,
}

pub async fn run(args: HistoryArgs) -> Result<()> {
    let (window, status) = view_options(args.days, &args.status)?;
    let board = HistoryBoard::from_config(http_client());

    let refresh = board
        .refresh()
        .await
        .context("Failed to fetch pipeline history")?;
    if let Refresh::Applied {
        cascade: Cascade::Failed { upload_id, error },
        ..
    } = &refresh
    {
        eprintln!("Summary for upload #{upload_id} unavailable: {error}");
    }
    for err in board.rejected() {
        eprintln!("Skipped: {err}");
    }

    println!("{}", render::snapshot(&board.snapshot(window, status)));
    if let Some(latest) = board.latest_summary() {
        println!();
        println!("{}", render::latest_summary(&latest));
    }
    Ok(())
}
