use crate::render;
use analytics::summarize;
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct ForecastArgs {
    /// i 日先の予測数量（先頭が翌日）
    #[arg(allow_negative_numbers = true)]
    pub values: Vec<f64>,
}

pub fn run(args: ForecastArgs) -> Result<()> {
    println!("{}", render::forecast(&summarize(&args.values)));
    Ok(())
}
