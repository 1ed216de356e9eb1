use super::{http_client, view_options};
use crate::render;
use anyhow::{Context, Result};
use clap::Args;
use client::UploadFile;
use dashboard::{HistoryBoard, UploadRefresher};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Args)]
pub struct UploadArgs {
    /// アップロードする CSV
    pub file: PathBuf,

    #[arg(long)]
    pub days: Option<u32>,

    #[arg(long, default_value = "all")]
    pub status: String,
}

pub async fn run(args: UploadArgs) -> Result<()> {
    let (window, status) = view_options(args.days, &args.status)?;
    let file = UploadFile::from_path(&args.file)
        .await
        .with_context(|| format!("Failed to read {}", args.file.display()))?;

    let api = http_client();
    let board = Arc::new(HistoryBoard::from_config(api.clone()));
    let refresher = UploadRefresher::from_config(api, board.clone());

    println!("Uploading {} ({} bytes)...", file.name, file.bytes.len());
    let outcome = refresher.submit(file).await.context("Upload failed")?;

    println!("{}", render::upload_outcome(&outcome));
    println!();
    println!("{}", render::snapshot(&board.snapshot(window, status)));
    if let Some(latest) = board.latest_summary() {
        println!();
        println!("{}", render::latest_summary(&latest));
    }
    Ok(())
}
