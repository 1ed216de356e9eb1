use super::http_client;
use crate::render;
use anyhow::{Context, Result};
use clap::Args;
use dashboard::load_detail;
use logging::*;

#[derive(Debug, Args)]
pub struct DetailArgs {
    pub upload_id: i64,
}

pub async fn run(args: DetailArgs) -> Result<()> {
    let log = DEFAULT.new(o!("function" => "detail", "upload_id" => args.upload_id));
    let api = http_client();
    let detail = load_detail(&*api, args.upload_id, &log)
        .await
        .with_context(|| format!("Failed to load upload #{}", args.upload_id))?;
    println!("{}", render::detail(&detail));
    Ok(())
}
